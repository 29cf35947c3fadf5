//! SeaORM implementation of PublisherRepository

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};

use crate::domain::{
    DomainError, PAGE_SIZE, Page, Publisher, PublisherInput, PublisherRepository, check_page,
};
use crate::models::piece;
use crate::models::publisher::{ActiveModel, Column, Entity as PublisherEntity};

pub struct SeaOrmPublisherRepository {
    db: DatabaseConnection,
}

impl SeaOrmPublisherRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PublisherRepository for SeaOrmPublisherRepository {
    async fn list_page(&self, page: u64) -> Result<Page<Publisher>, DomainError> {
        let paginator = PublisherEntity::find()
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .paginate(&self.db, PAGE_SIZE);
        let total = paginator.num_items().await?;
        let num_pages = check_page(page, total)?;
        let items = paginator.fetch_page(page - 1).await?;

        Ok(Page {
            items: items.into_iter().map(Publisher::from).collect(),
            number: page,
            num_pages,
            total,
        })
    }

    async fn find_all(&self) -> Result<Vec<Publisher>, DomainError> {
        let rows = PublisherEntity::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Publisher::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Publisher>, DomainError> {
        Ok(PublisherEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Publisher::from))
    }

    async fn create(&self, input: PublisherInput) -> Result<Publisher, DomainError> {
        let mut publisher = ActiveModel {
            ..Default::default()
        };
        publisher.apply(&input);
        let result = publisher.insert(&self.db).await?;

        tracing::info!("Created publisher #{}", result.id);
        Ok(Publisher::from(result))
    }

    async fn update(&self, id: i32, input: PublisherInput) -> Result<Publisher, DomainError> {
        let existing = PublisherEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;
        let mut publisher = existing.into_active_model();
        publisher.apply(&input);
        let result = publisher.update(&self.db).await?;

        tracing::info!("Updated publisher #{}", id);
        Ok(Publisher::from(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;
        // Pieces outlive their publisher
        piece::Entity::update_many()
            .col_expr(piece::Column::PublisherId, Expr::value(Option::<i32>::None))
            .filter(piece::Column::PublisherId.eq(id))
            .exec(&txn)
            .await?;
        let result = PublisherEntity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(DomainError::NotFound);
        }
        txn.commit().await?;

        tracing::info!("Deleted publisher #{}", id);
        Ok(())
    }
}
