//! SeaORM implementations of PersonRepository, one per person table

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

use crate::domain::{
    DomainError, Page, PAGE_SIZE, Person, PersonInput, PersonKind, PersonRepository, check_page,
};

/// `LIKE` pattern matching names that contain `query` literally.
fn contains_pattern(query: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    LikeExpr::new(escaped).escape('\\')
}

/// The four person tables share `id`, `first_name` and `last_name`, so one
/// implementation serves them all. `$junction` is the association table whose
/// `$fk` column points back at the person.
macro_rules! person_repository {
    ($repo:ident, $model:ident, $kind:expr, $junction:ident, $fk:ident) => {
        pub struct $repo {
            db: DatabaseConnection,
        }

        impl $repo {
            pub fn new(db: DatabaseConnection) -> Self {
                Self { db }
            }
        }

        #[async_trait]
        impl PersonRepository for $repo {
            fn kind(&self) -> PersonKind {
                $kind
            }

            async fn list_page(&self, page: u64) -> Result<Page<Person>, DomainError> {
                use crate::models::$model::{Column, Entity};

                let paginator = Entity::find()
                    .order_by_asc(Column::LastName)
                    .order_by_asc(Column::FirstName)
                    .order_by_asc(Column::Id)
                    .paginate(&self.db, PAGE_SIZE);
                let total = paginator.num_items().await?;
                let num_pages = check_page(page, total)?;
                let items = paginator.fetch_page(page - 1).await?;

                Ok(Page {
                    items: items.into_iter().map(Person::from).collect(),
                    number: page,
                    num_pages,
                    total,
                })
            }

            async fn find_all(&self) -> Result<Vec<Person>, DomainError> {
                use crate::models::$model::{Column, Entity};

                let rows = Entity::find()
                    .order_by_asc(Column::LastName)
                    .order_by_asc(Column::FirstName)
                    .order_by_asc(Column::Id)
                    .all(&self.db)
                    .await?;
                Ok(rows.into_iter().map(Person::from).collect())
            }

            async fn find_by_id(&self, id: i32) -> Result<Option<Person>, DomainError> {
                use crate::models::$model::Entity;

                let row = Entity::find_by_id(id).one(&self.db).await?;
                Ok(row.map(Person::from))
            }

            async fn find_many(&self, ids: &[i32]) -> Result<Vec<Person>, DomainError> {
                use crate::models::$model::{Column, Entity};

                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                let rows = Entity::find()
                    .filter(Column::Id.is_in(ids.to_vec()))
                    .order_by_asc(Column::LastName)
                    .order_by_asc(Column::FirstName)
                    .order_by_asc(Column::Id)
                    .all(&self.db)
                    .await?;
                Ok(rows.into_iter().map(Person::from).collect())
            }

            async fn search(
                &self,
                query: &str,
                exclude: &[i32],
                limit: u64,
            ) -> Result<Vec<Person>, DomainError> {
                use crate::models::$model::{Column, Entity};

                let mut select = Entity::find();
                let query = query.trim();
                if !query.is_empty() {
                    // SQLite LIKE is case-insensitive for ASCII
                    let pattern = contains_pattern(query);
                    select = select.filter(
                        Condition::any()
                            .add(Expr::col(Column::FirstName).like(pattern.clone()))
                            .add(Expr::col(Column::LastName).like(pattern)),
                    );
                }
                if !exclude.is_empty() {
                    select = select.filter(Column::Id.is_not_in(exclude.to_vec()));
                }
                let rows = select
                    .order_by_asc(Column::LastName)
                    .order_by_asc(Column::FirstName)
                    .order_by_asc(Column::Id)
                    .limit(limit)
                    .all(&self.db)
                    .await?;
                Ok(rows.into_iter().map(Person::from).collect())
            }

            async fn count(&self) -> Result<u64, DomainError> {
                use crate::models::$model::Entity;

                Ok(Entity::find().count(&self.db).await?)
            }

            async fn create(&self, input: PersonInput) -> Result<Person, DomainError> {
                use crate::models::$model::ActiveModel;

                let mut person = ActiveModel {
                    ..Default::default()
                };
                person.apply(&input);
                let result = person.insert(&self.db).await?;

                tracing::info!("Created {} #{}", $kind.model_name(), result.id);
                Ok(Person::from(result))
            }

            async fn update(&self, id: i32, input: PersonInput) -> Result<Person, DomainError> {
                use crate::models::$model::Entity;

                let existing = Entity::find_by_id(id)
                    .one(&self.db)
                    .await?
                    .ok_or(DomainError::NotFound)?;
                let mut person = existing.into_active_model();
                person.apply(&input);
                let result = person.update(&self.db).await?;

                tracing::info!("Updated {} #{}", $kind.model_name(), id);
                Ok(Person::from(result))
            }

            async fn delete(&self, id: i32) -> Result<(), DomainError> {
                use crate::models::$model::Entity;
                use crate::models::$junction;

                let txn = self.db.begin().await?;
                $junction::Entity::delete_many()
                    .filter($junction::Column::$fk.eq(id))
                    .exec(&txn)
                    .await?;
                let result = Entity::delete_by_id(id).exec(&txn).await?;
                if result.rows_affected == 0 {
                    txn.rollback().await?;
                    return Err(DomainError::NotFound);
                }
                txn.commit().await?;

                tracing::info!("Deleted {} #{}", $kind.model_name(), id);
                Ok(())
            }
        }
    };
}

person_repository!(
    SeaOrmComposerRepository,
    composer,
    PersonKind::Composer,
    piece_composer,
    ComposerId
);
person_repository!(
    SeaOrmArrangerRepository,
    arranger,
    PersonKind::Arranger,
    piece_arranger,
    ArrangerId
);
person_repository!(
    SeaOrmConductorRepository,
    conductor,
    PersonKind::Conductor,
    concert_conductor,
    ConductorId
);
person_repository!(
    SeaOrmGuestRepository,
    guest,
    PersonKind::Guest,
    concert_guest,
    GuestId
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db;

    fn composer(first: &str, last: &str) -> PersonInput {
        PersonInput {
            first_name: Some(first.to_string()),
            last_name: last.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn search_matches_either_name_and_excludes_selection() {
        let conn = db::init_db("sqlite::memory:").await.unwrap();
        let repo = SeaOrmComposerRepository::new(conn);
        let mahler = repo.create(composer("Gustav", "Mahler")).await.unwrap();
        let marsalis = repo.create(composer("Wynton", "Marsalis")).await.unwrap();
        repo.create(composer("Claude", "Debussy")).await.unwrap();
        let ma = repo.create(composer("Yo-Yo", "Ma")).await.unwrap();

        let found = repo.search("ma", &[], 20).await.unwrap();
        let ids: Vec<i32> = found.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![ma.id, mahler.id, marsalis.id]);

        let found = repo.search("MA", &[mahler.id], 20).await.unwrap();
        assert!(found.iter().all(|p| p.id != mahler.id));
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let conn = db::init_db("sqlite::memory:").await.unwrap();
        let repo = SeaOrmComposerRepository::new(conn);
        repo.create(composer("Gustav", "Mahler")).await.unwrap();
        repo.create(composer("Claude", "Debussy")).await.unwrap();
        let unknown = repo.create(composer("", "Anon_100%")).await.unwrap();

        for query in ["%", "_", "0%", "Anon_1"] {
            let found = repo.search(query, &[], 20).await.unwrap();
            let ids: Vec<i32> = found.iter().map(|p| p.id).collect();
            assert_eq!(ids, vec![unknown.id], "query {:?}", query);
        }
        assert!(repo.search("M_h", &[], 20).await.unwrap().is_empty());
        assert!(repo.search("%", &[unknown.id], 20).await.unwrap().is_empty());
        assert!(repo.search("\\", &[], 20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_page_rejects_out_of_range() {
        let conn = db::init_db("sqlite::memory:").await.unwrap();
        let repo = SeaOrmArrangerRepository::new(conn);
        for i in 0..21 {
            repo.create(composer("A", &format!("Name{:02}", i)))
                .await
                .unwrap();
        }
        let second = repo.list_page(2).await.unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.num_pages, 2);
        assert!(matches!(
            repo.list_page(3).await,
            Err(DomainError::NotFound)
        ));
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let conn = db::init_db("sqlite::memory:").await.unwrap();
        let repo = SeaOrmGuestRepository::new(conn);
        assert!(matches!(repo.delete(99).await, Err(DomainError::NotFound)));
    }
}
