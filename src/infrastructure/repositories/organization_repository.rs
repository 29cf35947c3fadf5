//! SeaORM implementations of OrganizationRepository, one per organization table

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};

use crate::domain::{
    DomainError, Organization, OrganizationInput, OrganizationKind, OrganizationRepository,
    PAGE_SIZE, Page, check_page,
};
use crate::models::piece_organization_relationship as relationship;

macro_rules! organization_repository {
    ($repo:ident, $model:ident, $kind:expr) => {
        pub struct $repo {
            db: DatabaseConnection,
        }

        impl $repo {
            pub fn new(db: DatabaseConnection) -> Self {
                Self { db }
            }
        }

        #[async_trait]
        impl OrganizationRepository for $repo {
            fn kind(&self) -> OrganizationKind {
                $kind
            }

            async fn list_page(&self, page: u64) -> Result<Page<Organization>, DomainError> {
                use crate::models::$model::{Column, Entity};

                let paginator = Entity::find()
                    .order_by_asc(Column::Name)
                    .order_by_asc(Column::Id)
                    .paginate(&self.db, PAGE_SIZE);
                let total = paginator.num_items().await?;
                let num_pages = check_page(page, total)?;
                let items = paginator.fetch_page(page - 1).await?;

                Ok(Page {
                    items: items.into_iter().map(Organization::from).collect(),
                    number: page,
                    num_pages,
                    total,
                })
            }

            async fn find_all(&self) -> Result<Vec<Organization>, DomainError> {
                use crate::models::$model::{Column, Entity};

                let rows = Entity::find()
                    .order_by_asc(Column::Name)
                    .order_by_asc(Column::Id)
                    .all(&self.db)
                    .await?;
                Ok(rows.into_iter().map(Organization::from).collect())
            }

            async fn find_by_id(&self, id: i32) -> Result<Option<Organization>, DomainError> {
                use crate::models::$model::Entity;

                let row = Entity::find_by_id(id).one(&self.db).await?;
                Ok(row.map(Organization::from))
            }

            async fn create(&self, input: OrganizationInput) -> Result<Organization, DomainError> {
                use crate::models::$model::ActiveModel;

                let mut organization = ActiveModel {
                    ..Default::default()
                };
                organization.apply(&input);
                let result = organization.insert(&self.db).await?;

                tracing::info!("Created {} #{}", $kind.model_name(), result.id);
                Ok(Organization::from(result))
            }

            async fn update(
                &self,
                id: i32,
                input: OrganizationInput,
            ) -> Result<Organization, DomainError> {
                use crate::models::$model::Entity;

                let existing = Entity::find_by_id(id)
                    .one(&self.db)
                    .await?
                    .ok_or(DomainError::NotFound)?;
                let mut organization = existing.into_active_model();
                organization.apply(&input);
                let result = organization.update(&self.db).await?;

                tracing::info!("Updated {} #{}", $kind.model_name(), id);
                Ok(Organization::from(result))
            }

            async fn delete(&self, id: i32) -> Result<(), DomainError> {
                use crate::models::$model::Entity;

                let txn = self.db.begin().await?;
                let detached = relationship::Entity::delete_many()
                    .filter(relationship::Column::OrganizationKind.eq($kind.as_str()))
                    .filter(relationship::Column::OrganizationId.eq(id))
                    .exec(&txn)
                    .await?;
                let result = Entity::delete_by_id(id).exec(&txn).await?;
                if result.rows_affected == 0 {
                    txn.rollback().await?;
                    return Err(DomainError::NotFound);
                }
                txn.commit().await?;

                tracing::info!(
                    "Deleted {} #{} ({} piece relationships removed)",
                    $kind.model_name(),
                    id,
                    detached.rows_affected
                );
                Ok(())
            }
        }
    };
}

organization_repository!(
    SeaOrmRentalOrganizationRepository,
    rental_organization,
    OrganizationKind::Rental
);
organization_repository!(
    SeaOrmLoaningOrganizationRepository,
    loaning_organization,
    OrganizationKind::Loaning
);
organization_repository!(
    SeaOrmBorrowingOrganizationRepository,
    borrowing_organization,
    OrganizationKind::Borrowing
);
