//! Concert Service - concert and venue writes that also touch poster files

use crate::domain::{Concert, ConcertInput, DomainError, FieldErrors};
use crate::forms::concerts::{CleanedConcert, PosterUpload};
use crate::infrastructure::{AppState, media};

pub const POSTER_NOT_SAVED: &str = "The poster could not be saved. Please try again.";

/// Create a concert, then store its poster if one was uploaded. The concert
/// is removed again when its poster cannot be stored.
pub async fn create_concert(
    state: &AppState,
    cleaned: CleanedConcert,
) -> Result<Concert, DomainError> {
    let concert = state.concert_repo.create(cleaned.input).await?;
    let id = concert.id;
    match attach_poster(state, concert, cleaned.poster).await {
        Ok(concert) => Ok(concert),
        Err(e) => {
            if let Err(undo) = state.concert_repo.delete(id).await {
                tracing::error!("Could not remove concert #{} after a failed poster: {}", id, undo);
            }
            discard_posters(state, &[id]).await;
            Err(e)
        }
    }
}

/// Update a concert. Without a new upload the current poster is kept. When a
/// new poster cannot be stored the previous field values are written back.
pub async fn update_concert(
    state: &AppState,
    id: i32,
    cleaned: CleanedConcert,
) -> Result<Concert, DomainError> {
    let previous = state
        .concert_repo
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound)?;
    let concert = state.concert_repo.update(id, cleaned.input).await?;
    match attach_poster(state, concert, cleaned.poster).await {
        Ok(concert) => Ok(concert),
        Err(e) => {
            if let Err(undo) = state.concert_repo.update(id, input_of(&previous)).await {
                tracing::error!("Could not restore concert #{} after a failed poster: {}", id, undo);
            }
            Err(e)
        }
    }
}

fn input_of(concert: &Concert) -> ConcertInput {
    ConcertInput {
        name: concert.name.clone(),
        date: concert.date,
        time: concert.time,
        venue_id: concert.venue_id,
        conductor_ids: concert.conductors.iter().map(|p| p.id).collect(),
        guest_ids: concert.guests.iter().map(|p| p.id).collect(),
        description: concert.description.clone(),
    }
}

async fn attach_poster(
    state: &AppState,
    mut concert: Concert,
    poster: Option<PosterUpload>,
) -> Result<Concert, DomainError> {
    let Some(upload) = poster else {
        return Ok(concert);
    };
    let path = match media::store_poster(
        &state.media_root,
        concert.id,
        &upload.file_name,
        &upload.bytes,
    )
    .await
    {
        Ok(path) => path,
        Err(e) => {
            tracing::error!("Failed to store poster for concert #{}: {}", concert.id, e);
            let mut errors = FieldErrors::new();
            errors.add_non_field(POSTER_NOT_SAVED);
            return Err(errors.into());
        }
    };
    state
        .concert_repo
        .set_poster(concert.id, Some(path.clone()))
        .await?;
    concert.poster = Some(path);
    Ok(concert)
}

pub async fn delete_concert(state: &AppState, id: i32) -> Result<(), DomainError> {
    state.concert_repo.delete(id).await?;
    discard_posters(state, &[id]).await;
    Ok(())
}

/// Delete a venue together with its concerts and their posters.
pub async fn delete_venue(state: &AppState, id: i32) -> Result<(), DomainError> {
    let concert_ids = state.venue_repo.delete(id).await?;
    if !concert_ids.is_empty() {
        tracing::info!(
            "Venue #{} removed along with {} concert(s)",
            id,
            concert_ids.len()
        );
    }
    discard_posters(state, &concert_ids).await;
    Ok(())
}

// Rows are already gone at this point, so a leftover file is only logged.
async fn discard_posters(state: &AppState, concert_ids: &[i32]) {
    for &concert_id in concert_ids {
        if let Err(e) = media::remove_posters(&state.media_root, concert_id).await {
            tracing::warn!("Could not remove posters of concert #{}: {}", concert_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VenueInput;
    use crate::infrastructure::db;
    use axum::body::Bytes;
    use chrono::{NaiveDate, NaiveTime};

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    async fn state(root: &std::path::Path) -> AppState {
        let conn = db::init_db("sqlite::memory:").await.unwrap();
        AppState::new(conn, root.to_path_buf())
    }

    async fn cleaned(state: &AppState, poster: bool) -> CleanedConcert {
        let venue = state
            .venue_repo
            .create(VenueInput {
                name: "Civic Hall".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        CleanedConcert {
            input: ConcertInput {
                name: "Spring Gala".into(),
                date: NaiveDate::from_ymd_opt(2025, 4, 12).unwrap(),
                time: NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
                venue_id: venue.id,
                conductor_ids: vec![],
                guest_ids: vec![],
                description: String::new(),
            },
            poster: poster.then(|| PosterUpload {
                file_name: "gala.png".into(),
                bytes: Bytes::from_static(PNG),
            }),
        }
    }

    #[tokio::test]
    async fn poster_is_stored_under_concert_directory() {
        let root = tempfile::tempdir().unwrap();
        let state = state(root.path()).await;
        let concert = create_concert(&state, cleaned(&state, true).await)
            .await
            .unwrap();

        let expected = format!("posters/concert_{}/gala.png", concert.id);
        assert_eq!(concert.poster.as_deref(), Some(expected.as_str()));
        assert!(root.path().join(&expected).exists());

        let stored = state.concert_repo.find_by_id(concert.id).await.unwrap().unwrap();
        assert_eq!(stored.poster, concert.poster);
    }

    #[tokio::test]
    async fn update_without_upload_keeps_poster() {
        let root = tempfile::tempdir().unwrap();
        let state = state(root.path()).await;
        let concert = create_concert(&state, cleaned(&state, true).await)
            .await
            .unwrap();

        let mut edit = cleaned(&state, false).await;
        edit.input.name = "Autumn Gala".into();
        let updated = update_concert(&state, concert.id, edit).await.unwrap();

        assert_eq!(updated.name, "Autumn Gala");
        assert_eq!(updated.poster, concert.poster);
    }

    #[tokio::test]
    async fn deleting_venue_removes_concert_posters() {
        let root = tempfile::tempdir().unwrap();
        let state = state(root.path()).await;
        let concert = create_concert(&state, cleaned(&state, true).await)
            .await
            .unwrap();

        delete_venue(&state, concert.venue_id).await.unwrap();

        assert!(state.concert_repo.find_by_id(concert.id).await.unwrap().is_none());
        assert!(!root.path().join(media::poster_dir(concert.id)).exists());
    }

    #[tokio::test]
    async fn failed_poster_leaves_no_concert_behind() {
        // A regular file where the media directory should be
        let root = tempfile::NamedTempFile::new().unwrap();
        let state = state(root.path()).await;

        let err = create_concert(&state, cleaned(&state, true).await)
            .await
            .unwrap_err();

        match err {
            DomainError::Validation(errors) => {
                assert_eq!(errors.non_field(), [POSTER_NOT_SAVED.to_string()]);
            }
            other => panic!("expected a validation error, got {:?}", other),
        }
        assert_eq!(state.concert_repo.list_page(1).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn failed_poster_keeps_previous_concert_values() {
        let root = tempfile::NamedTempFile::new().unwrap();
        let state = state(root.path()).await;
        let concert = create_concert(&state, cleaned(&state, false).await)
            .await
            .unwrap();

        let mut edit = cleaned(&state, true).await;
        edit.input.name = "Autumn Gala".into();
        let result = update_concert(&state, concert.id, edit).await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        let stored = state.concert_repo.find_by_id(concert.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Spring Gala");
        assert_eq!(stored.venue_id, concert.venue_id);
        assert!(stored.poster.is_none());
    }

    #[tokio::test]
    async fn updating_missing_concert_is_not_found() {
        let root = tempfile::tempdir().unwrap();
        let state = state(root.path()).await;
        let edit = cleaned(&state, false).await;
        assert!(matches!(
            update_concert(&state, 999, edit).await,
            Err(DomainError::NotFound)
        ));
    }
}
