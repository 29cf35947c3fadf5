//! SeaORM implementation of GenreRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};

use crate::domain::{DomainError, Genre, GenreInput, GenreRepository, PAGE_SIZE, Page, check_page};
use crate::models::genre::{ActiveModel, Column, Entity as GenreEntity};
use crate::models::piece_genre;

pub struct SeaOrmGenreRepository {
    db: DatabaseConnection,
}

impl SeaOrmGenreRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GenreRepository for SeaOrmGenreRepository {
    async fn list_page(&self, page: u64) -> Result<Page<Genre>, DomainError> {
        let paginator = GenreEntity::find()
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .paginate(&self.db, PAGE_SIZE);
        let total = paginator.num_items().await?;
        let num_pages = check_page(page, total)?;
        let items = paginator.fetch_page(page - 1).await?;

        Ok(Page {
            items: items.into_iter().map(Genre::from).collect(),
            number: page,
            num_pages,
            total,
        })
    }

    async fn find_all(&self) -> Result<Vec<Genre>, DomainError> {
        let rows = GenreEntity::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Genre::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Genre>, DomainError> {
        Ok(GenreEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Genre::from))
    }

    async fn create(&self, input: GenreInput) -> Result<Genre, DomainError> {
        let mut genre = ActiveModel {
            ..Default::default()
        };
        genre.apply(&input);
        let result = genre.insert(&self.db).await?;

        tracing::info!("Created genre #{}", result.id);
        Ok(Genre::from(result))
    }

    async fn update(&self, id: i32, input: GenreInput) -> Result<Genre, DomainError> {
        let existing = GenreEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;
        let mut genre = existing.into_active_model();
        genre.apply(&input);
        let result = genre.update(&self.db).await?;

        tracing::info!("Updated genre #{}", id);
        Ok(Genre::from(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;
        piece_genre::Entity::delete_many()
            .filter(piece_genre::Column::GenreId.eq(id))
            .exec(&txn)
            .await?;
        let result = GenreEntity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(DomainError::NotFound);
        }
        txn.commit().await?;

        tracing::info!("Deleted genre #{}", id);
        Ok(())
    }
}
