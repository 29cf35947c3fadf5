//! Composer picker - selection management without HTTP
//!
//! The selection is owned by the client and sent back with every request;
//! nothing here is stored between requests.

use crate::domain::{DomainError, Person, PersonInput, PersonRepository};

/// Most composers a search returns
pub const SEARCH_LIMIT: u64 = 20;

/// Everything the picker fragments render.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerState {
    /// Selected composers, ordered by last name then first name
    pub selected: Vec<Person>,
    /// Search results, never containing a selected composer
    pub results: Vec<Person>,
    pub query: String,
}

impl PickerState {
    pub fn selected_ids(&self) -> Vec<i32> {
        self.selected.iter().map(|p| p.id).collect()
    }
}

/// Composers matching `query` (first or last name, case-insensitive),
/// excluding `selected`. An empty query lists the first composers by name.
pub async fn search(
    repo: &dyn PersonRepository,
    query: &str,
    selected: &[i32],
) -> Result<Vec<Person>, DomainError> {
    repo.search(query, selected, SEARCH_LIMIT).await
}

/// Drop ids that do not name an existing composer.
pub async fn resolve(
    repo: &dyn PersonRepository,
    selected: &[i32],
) -> Result<Vec<Person>, DomainError> {
    repo.find_many(selected).await
}

/// Current selection plus search results for `query`.
pub async fn refresh(
    repo: &dyn PersonRepository,
    selected: &[i32],
    query: &str,
) -> Result<PickerState, DomainError> {
    let selected = resolve(repo, selected).await?;
    let ids: Vec<i32> = selected.iter().map(|p| p.id).collect();
    let results = search(repo, query, &ids).await?;
    Ok(PickerState {
        selected,
        results,
        query: query.trim().to_string(),
    })
}

/// Add `composer_id` to the selection. Adding a composer twice is a no-op.
pub async fn add(
    repo: &dyn PersonRepository,
    selected: &[i32],
    composer_id: i32,
    query: &str,
) -> Result<PickerState, DomainError> {
    repo.find_by_id(composer_id)
        .await?
        .ok_or(DomainError::NotFound)?;
    let mut ids = selected.to_vec();
    if !ids.contains(&composer_id) {
        ids.push(composer_id);
    }
    refresh(repo, &ids, query).await
}

/// Remove `composer_id` from the selection, if present.
pub async fn remove(
    repo: &dyn PersonRepository,
    selected: &[i32],
    composer_id: i32,
    query: &str,
) -> Result<PickerState, DomainError> {
    let ids: Vec<i32> = selected
        .iter()
        .copied()
        .filter(|&id| id != composer_id)
        .collect();
    refresh(repo, &ids, query).await
}

/// Persist a new composer and add it to the selection.
pub async fn save_new(
    repo: &dyn PersonRepository,
    selected: &[i32],
    input: PersonInput,
    query: &str,
) -> Result<(Person, PickerState), DomainError> {
    let composer = repo.create(input).await?;
    let mut ids = selected.to_vec();
    ids.push(composer.id);
    let state = refresh(repo, &ids, query).await?;
    Ok((composer, state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::SeaOrmComposerRepository;
    use crate::infrastructure::db;

    async fn repo_with(names: &[(&str, &str)]) -> (SeaOrmComposerRepository, Vec<i32>) {
        let conn = db::init_db("sqlite::memory:").await.unwrap();
        let repo = SeaOrmComposerRepository::new(conn);
        let mut ids = Vec::new();
        for (first, last) in names {
            let p = repo
                .create(PersonInput {
                    first_name: Some(first.to_string()),
                    last_name: last.to_string(),
                    ..Default::default()
                })
                .await
                .unwrap();
            ids.push(p.id);
        }
        (repo, ids)
    }

    #[tokio::test]
    async fn add_is_idempotent_and_hides_selected_from_results() {
        let (repo, ids) = repo_with(&[("Gustav", "Mahler"), ("Yo-Yo", "Ma")]).await;
        let once = add(&repo, &[], ids[0], "").await.unwrap();
        let twice = add(&repo, &once.selected_ids(), ids[0], "").await.unwrap();

        assert_eq!(twice.selected_ids(), vec![ids[0]]);
        assert!(twice.results.iter().all(|p| p.id != ids[0]));
        assert_eq!(twice.results.len(), 1);
    }

    #[tokio::test]
    async fn add_unknown_composer_is_not_found() {
        let (repo, _) = repo_with(&[("Gustav", "Mahler")]).await;
        assert!(matches!(
            add(&repo, &[], 404, "").await,
            Err(DomainError::NotFound)
        ));
    }

    #[tokio::test]
    async fn remove_absent_id_is_a_noop() {
        let (repo, ids) = repo_with(&[("Gustav", "Mahler")]).await;
        let state = remove(&repo, &[ids[0]], 77, "").await.unwrap();
        assert_eq!(state.selected_ids(), vec![ids[0]]);
    }

    #[tokio::test]
    async fn stale_ids_are_dropped_from_selection() {
        let (repo, ids) = repo_with(&[("Gustav", "Mahler")]).await;
        let state = refresh(&repo, &[ids[0], 999], "").await.unwrap();
        assert_eq!(state.selected_ids(), vec![ids[0]]);
    }

    #[tokio::test]
    async fn search_caps_results() {
        let names: Vec<(String, String)> = (0..25)
            .map(|i| ("Anna".to_string(), format!("Composer{:02}", i)))
            .collect();
        let refs: Vec<(&str, &str)> = names
            .iter()
            .map(|(f, l)| (f.as_str(), l.as_str()))
            .collect();
        let (repo, ids) = repo_with(&refs).await;

        let results = search(&repo, "", &[]).await.unwrap();
        assert_eq!(results.len(), SEARCH_LIMIT as usize);
        assert_eq!(results[0].id, ids[0]);

        let results = search(&repo, "composer2", &[ids[20]]).await.unwrap();
        let found: Vec<i32> = results.iter().map(|p| p.id).collect();
        assert_eq!(found, ids[21..25].to_vec());
    }
}
