//! SeaORM implementation of VenueRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

use crate::domain::{DomainError, PAGE_SIZE, Page, Venue, VenueInput, VenueRepository, check_page};
use crate::models::venue::{ActiveModel, Column, Entity as VenueEntity};
use crate::models::{concert, concert_conductor, concert_guest};

pub struct SeaOrmVenueRepository {
    db: DatabaseConnection,
}

impl SeaOrmVenueRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VenueRepository for SeaOrmVenueRepository {
    async fn list_page(&self, page: u64) -> Result<Page<Venue>, DomainError> {
        let paginator = VenueEntity::find()
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .paginate(&self.db, PAGE_SIZE);
        let total = paginator.num_items().await?;
        let num_pages = check_page(page, total)?;
        let items = paginator.fetch_page(page - 1).await?;

        Ok(Page {
            items: items.into_iter().map(Venue::from).collect(),
            number: page,
            num_pages,
            total,
        })
    }

    async fn find_all(&self) -> Result<Vec<Venue>, DomainError> {
        let rows = VenueEntity::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Venue::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Venue>, DomainError> {
        Ok(VenueEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Venue::from))
    }

    async fn create(&self, input: VenueInput) -> Result<Venue, DomainError> {
        let mut venue = ActiveModel {
            ..Default::default()
        };
        venue.apply(&input);
        let result = venue.insert(&self.db).await?;

        tracing::info!("Created venue #{}", result.id);
        Ok(Venue::from(result))
    }

    async fn update(&self, id: i32, input: VenueInput) -> Result<Venue, DomainError> {
        let existing = VenueEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;
        let mut venue = existing.into_active_model();
        venue.apply(&input);
        let result = venue.update(&self.db).await?;

        tracing::info!("Updated venue #{}", id);
        Ok(Venue::from(result))
    }

    async fn delete(&self, id: i32) -> Result<Vec<i32>, DomainError> {
        let txn = self.db.begin().await?;

        let concert_ids: Vec<i32> = concert::Entity::find()
            .select_only()
            .column(concert::Column::Id)
            .filter(concert::Column::VenueId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;

        if !concert_ids.is_empty() {
            concert_conductor::Entity::delete_many()
                .filter(concert_conductor::Column::ConcertId.is_in(concert_ids.clone()))
                .exec(&txn)
                .await?;
            concert_guest::Entity::delete_many()
                .filter(concert_guest::Column::ConcertId.is_in(concert_ids.clone()))
                .exec(&txn)
                .await?;
            concert::Entity::delete_many()
                .filter(concert::Column::VenueId.eq(id))
                .exec(&txn)
                .await?;
        }

        let result = VenueEntity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(DomainError::NotFound);
        }
        txn.commit().await?;

        tracing::info!(
            "Deleted venue #{} and {} concert(s)",
            id,
            concert_ids.len()
        );
        Ok(concert_ids)
    }
}
