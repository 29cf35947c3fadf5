//! SeaORM implementation of ConcertRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::domain::{
    Concert, ConcertInput, ConcertRepository, DomainError, PAGE_SIZE, Page, Person, check_page,
};
use crate::models::concert::{ActiveModel, Column, Entity as ConcertEntity, Model};
use crate::models::{concert_conductor, concert_guest, conductor, guest, venue};

pub struct SeaOrmConcertRepository {
    db: DatabaseConnection,
}

impl SeaOrmConcertRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Attach venue names, conductors and guests to concert rows.
    async fn hydrate(&self, rows: Vec<Model>) -> Result<Vec<Concert>, DomainError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let concert_ids: Vec<i32> = rows.iter().map(|c| c.id).collect();
        let venue_ids: Vec<i32> = rows.iter().map(|c| c.venue_id).collect();

        let venues: HashMap<i32, String> = venue::Entity::find()
            .filter(venue::Column::Id.is_in(venue_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|v| (v.id, v.name))
            .collect();

        let conductor_links = concert_conductor::Entity::find()
            .filter(concert_conductor::Column::ConcertId.is_in(concert_ids.clone()))
            .all(&self.db)
            .await?;
        let conductors: HashMap<i32, Person> = conductor::Entity::find()
            .filter(
                conductor::Column::Id
                    .is_in(conductor_links.iter().map(|l| l.conductor_id).collect::<Vec<_>>()),
            )
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, Person::from(c)))
            .collect();

        let guest_links = concert_guest::Entity::find()
            .filter(concert_guest::Column::ConcertId.is_in(concert_ids))
            .all(&self.db)
            .await?;
        let guests: HashMap<i32, Person> = guest::Entity::find()
            .filter(
                guest::Column::Id
                    .is_in(guest_links.iter().map(|l| l.guest_id).collect::<Vec<_>>()),
            )
            .all(&self.db)
            .await?
            .into_iter()
            .map(|g| (g.id, Person::from(g)))
            .collect();

        Ok(rows
            .into_iter()
            .map(|c| {
                let mut concert_conductors: Vec<Person> = conductor_links
                    .iter()
                    .filter(|l| l.concert_id == c.id)
                    .filter_map(|l| conductors.get(&l.conductor_id).cloned())
                    .collect();
                concert_conductors.sort_by(|a, b| a.display_name().cmp(&b.display_name()));
                let mut concert_guests: Vec<Person> = guest_links
                    .iter()
                    .filter(|l| l.concert_id == c.id)
                    .filter_map(|l| guests.get(&l.guest_id).cloned())
                    .collect();
                concert_guests.sort_by(|a, b| a.display_name().cmp(&b.display_name()));

                Concert {
                    id: c.id,
                    venue_name: venues.get(&c.venue_id).cloned().unwrap_or_default(),
                    name: c.name,
                    date: c.date,
                    time: c.time,
                    venue_id: c.venue_id,
                    conductors: concert_conductors,
                    guests: concert_guests,
                    description: c.description,
                    poster: c.poster,
                }
            })
            .collect())
    }

    async fn load(&self, id: i32) -> Result<Concert, DomainError> {
        let row = ConcertEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;
        self.hydrate(vec![row])
            .await?
            .pop()
            .ok_or(DomainError::NotFound)
    }
}

async fn clear_performers<C: ConnectionTrait>(
    conn: &C,
    concert_id: i32,
) -> Result<(), DomainError> {
    concert_conductor::Entity::delete_many()
        .filter(concert_conductor::Column::ConcertId.eq(concert_id))
        .exec(conn)
        .await?;
    concert_guest::Entity::delete_many()
        .filter(concert_guest::Column::ConcertId.eq(concert_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Replace the performer sets of one concert.
async fn write_performers<C: ConnectionTrait>(
    conn: &C,
    concert_id: i32,
    input: &ConcertInput,
) -> Result<(), DomainError> {
    clear_performers(conn, concert_id).await?;

    if !input.conductor_ids.is_empty() {
        concert_conductor::Entity::insert_many(input.conductor_ids.iter().map(|&conductor_id| {
            concert_conductor::ActiveModel {
                concert_id: Set(concert_id),
                conductor_id: Set(conductor_id),
            }
        }))
        .exec_without_returning(conn)
        .await?;
    }
    if !input.guest_ids.is_empty() {
        concert_guest::Entity::insert_many(input.guest_ids.iter().map(|&guest_id| {
            concert_guest::ActiveModel {
                concert_id: Set(concert_id),
                guest_id: Set(guest_id),
            }
        }))
        .exec_without_returning(conn)
        .await?;
    }
    Ok(())
}

#[async_trait]
impl ConcertRepository for SeaOrmConcertRepository {
    async fn list_page(&self, page: u64) -> Result<Page<Concert>, DomainError> {
        let paginator = ConcertEntity::find()
            .order_by_asc(Column::Date)
            .order_by_asc(Column::Time)
            .order_by_asc(Column::Id)
            .paginate(&self.db, PAGE_SIZE);
        let total = paginator.num_items().await?;
        let num_pages = check_page(page, total)?;
        let rows = paginator.fetch_page(page - 1).await?;

        Ok(Page {
            items: self.hydrate(rows).await?,
            number: page,
            num_pages,
            total,
        })
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Concert>, DomainError> {
        match self.load(id).await {
            Ok(concert) => Ok(Some(concert)),
            Err(DomainError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create(&self, input: ConcertInput) -> Result<Concert, DomainError> {
        let txn = self.db.begin().await?;
        let mut concert = ActiveModel {
            poster: Set(None),
            ..Default::default()
        };
        concert.apply(&input);
        let result = concert.insert(&txn).await?;
        write_performers(&txn, result.id, &input).await?;
        txn.commit().await?;

        tracing::info!("Created concert #{} ({})", result.id, result.name);
        self.load(result.id).await
    }

    async fn update(&self, id: i32, input: ConcertInput) -> Result<Concert, DomainError> {
        let txn = self.db.begin().await?;
        let existing = ConcertEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(DomainError::NotFound)?;
        let mut concert = existing.into_active_model();
        concert.apply(&input);
        concert.update(&txn).await?;
        write_performers(&txn, id, &input).await?;
        txn.commit().await?;

        tracing::info!("Updated concert #{}", id);
        self.load(id).await
    }

    async fn set_poster(&self, id: i32, poster: Option<String>) -> Result<(), DomainError> {
        let result = ConcertEntity::update_many()
            .col_expr(Column::Poster, Expr::value(poster))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;
        clear_performers(&txn, id).await?;
        let result = ConcertEntity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(DomainError::NotFound);
        }
        txn.commit().await?;

        tracing::info!("Deleted concert #{}", id);
        Ok(())
    }
}
