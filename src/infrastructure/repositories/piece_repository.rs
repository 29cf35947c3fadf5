//! SeaORM implementation of PieceRepository
//!
//! A piece spans several tables: the `pieces` row, three association tables
//! and at most one `piece_organization_relationships` row. Writes replace all
//! of them inside one transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::domain::{
    Difficulty, DomainError, FieldErrors, Genre, OrganizationKind, OrganizationRef, PAGE_SIZE,
    Page, Person, Piece, PieceInput, PieceRepository, PieceStatus, Publisher, check_page,
};
use crate::models::piece::{ActiveModel, Column, Entity as PieceEntity, Model};
use crate::models::piece_organization_relationship as relationship;
use crate::models::{
    arranger, borrowing_organization, composer, genre, loaning_organization, piece_arranger,
    piece_composer, piece_genre, publisher, rental_organization,
};

pub struct SeaOrmPieceRepository {
    db: DatabaseConnection,
}

impl SeaOrmPieceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn organization_names(
        &self,
        refs: &[OrganizationRef],
    ) -> Result<HashMap<OrganizationRef, String>, DomainError> {
        let ids_of = |kind: OrganizationKind| -> Vec<i32> {
            refs.iter()
                .filter(|r| r.kind == kind)
                .map(|r| r.organization_id)
                .collect()
        };
        let mut names = HashMap::new();

        let rental = ids_of(OrganizationKind::Rental);
        if !rental.is_empty() {
            for org in rental_organization::Entity::find()
                .filter(rental_organization::Column::Id.is_in(rental))
                .all(&self.db)
                .await?
            {
                names.insert(OrganizationRef::new(OrganizationKind::Rental, org.id), org.name);
            }
        }
        let loaning = ids_of(OrganizationKind::Loaning);
        if !loaning.is_empty() {
            for org in loaning_organization::Entity::find()
                .filter(loaning_organization::Column::Id.is_in(loaning))
                .all(&self.db)
                .await?
            {
                names.insert(OrganizationRef::new(OrganizationKind::Loaning, org.id), org.name);
            }
        }
        let borrowing = ids_of(OrganizationKind::Borrowing);
        if !borrowing.is_empty() {
            for org in borrowing_organization::Entity::find()
                .filter(borrowing_organization::Column::Id.is_in(borrowing))
                .all(&self.db)
                .await?
            {
                names.insert(
                    OrganizationRef::new(OrganizationKind::Borrowing, org.id),
                    org.name,
                );
            }
        }
        Ok(names)
    }

    /// Attach people, genres, publisher and relationship to piece rows.
    async fn hydrate(&self, rows: Vec<Model>) -> Result<Vec<Piece>, DomainError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let piece_ids: Vec<i32> = rows.iter().map(|p| p.id).collect();

        let composer_links = piece_composer::Entity::find()
            .filter(piece_composer::Column::PieceId.is_in(piece_ids.clone()))
            .all(&self.db)
            .await?;
        let composers: HashMap<i32, Person> = composer::Entity::find()
            .filter(
                composer::Column::Id
                    .is_in(composer_links.iter().map(|l| l.composer_id).collect::<Vec<_>>()),
            )
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, Person::from(c)))
            .collect();

        let arranger_links = piece_arranger::Entity::find()
            .filter(piece_arranger::Column::PieceId.is_in(piece_ids.clone()))
            .all(&self.db)
            .await?;
        let arrangers: HashMap<i32, Person> = arranger::Entity::find()
            .filter(
                arranger::Column::Id
                    .is_in(arranger_links.iter().map(|l| l.arranger_id).collect::<Vec<_>>()),
            )
            .all(&self.db)
            .await?
            .into_iter()
            .map(|a| (a.id, Person::from(a)))
            .collect();

        let genre_links = piece_genre::Entity::find()
            .filter(piece_genre::Column::PieceId.is_in(piece_ids.clone()))
            .all(&self.db)
            .await?;
        let genres: HashMap<i32, Genre> = genre::Entity::find()
            .filter(
                genre::Column::Id
                    .is_in(genre_links.iter().map(|l| l.genre_id).collect::<Vec<_>>()),
            )
            .all(&self.db)
            .await?
            .into_iter()
            .map(|g| (g.id, Genre::from(g)))
            .collect();

        let publishers: HashMap<i32, Publisher> = publisher::Entity::find()
            .filter(
                publisher::Column::Id
                    .is_in(rows.iter().filter_map(|p| p.publisher_id).collect::<Vec<_>>()),
            )
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| (p.id, Publisher::from(p)))
            .collect();

        let relationships: HashMap<i32, relationship::Model> = relationship::Entity::find()
            .filter(relationship::Column::PieceId.is_in(piece_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|r| (r.piece_id, r))
            .collect();
        let refs: Vec<OrganizationRef> = relationships
            .values()
            .filter_map(|r| r.to_domain())
            .map(|r| r.organization())
            .collect();
        let organization_names = self.organization_names(&refs).await?;

        let by_name = |a: &Person, b: &Person| a.display_name().cmp(&b.display_name());

        Ok(rows
            .into_iter()
            .map(|p| {
                let mut piece_composers: Vec<Person> = composer_links
                    .iter()
                    .filter(|l| l.piece_id == p.id)
                    .filter_map(|l| composers.get(&l.composer_id).cloned())
                    .collect();
                piece_composers.sort_by(by_name);
                let mut piece_arrangers: Vec<Person> = arranger_links
                    .iter()
                    .filter(|l| l.piece_id == p.id)
                    .filter_map(|l| arrangers.get(&l.arranger_id).cloned())
                    .collect();
                piece_arrangers.sort_by(by_name);
                let mut piece_genres: Vec<Genre> = genre_links
                    .iter()
                    .filter(|l| l.piece_id == p.id)
                    .filter_map(|l| genres.get(&l.genre_id).cloned())
                    .collect();
                piece_genres.sort_by(|a, b| a.name.cmp(&b.name));

                let relationship = relationships.get(&p.id).and_then(|r| {
                    let domain = r.to_domain();
                    if domain.is_none() {
                        tracing::warn!("Ignoring inconsistent relationship row #{}", r.id);
                    }
                    domain
                });
                let relationship_organization = relationship
                    .as_ref()
                    .and_then(|r| organization_names.get(&r.organization()).cloned());

                Piece {
                    id: p.id,
                    title: p.title,
                    composers: piece_composers,
                    arrangers: piece_arrangers,
                    genres: piece_genres,
                    publisher: p.publisher_id.and_then(|id| publishers.get(&id).cloned()),
                    difficulty: Difficulty::parse(&p.difficulty),
                    status: PieceStatus::parse(&p.status),
                    relationship,
                    relationship_organization,
                    location_drawer: p.location_drawer,
                    location_number: p.location_number,
                    copyright_date: p.copyright_date,
                    purchase_date: p.purchase_date,
                    notes: p.notes,
                    created_at: p.created_at,
                    updated_at: p.updated_at,
                }
            })
            .collect())
    }

    async fn load(&self, id: i32) -> Result<Piece, DomainError> {
        let row = PieceEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;
        self.hydrate(vec![row])
            .await?
            .pop()
            .ok_or(DomainError::NotFound)
    }
}

fn check_input(input: &PieceInput) -> Result<(), DomainError> {
    let mut errors = FieldErrors::new();
    if input.composer_ids.is_empty() {
        errors.add("composers", "This field is required.");
    }
    if let Err(e) = input.check_status() {
        errors.add("status", e.to_string());
    }
    errors.into_result(()).map_err(DomainError::from)
}

async fn clear_links<C: ConnectionTrait>(conn: &C, piece_id: i32) -> Result<(), DomainError> {
    piece_composer::Entity::delete_many()
        .filter(piece_composer::Column::PieceId.eq(piece_id))
        .exec(conn)
        .await?;
    piece_arranger::Entity::delete_many()
        .filter(piece_arranger::Column::PieceId.eq(piece_id))
        .exec(conn)
        .await?;
    piece_genre::Entity::delete_many()
        .filter(piece_genre::Column::PieceId.eq(piece_id))
        .exec(conn)
        .await?;
    relationship::Entity::delete_many()
        .filter(relationship::Column::PieceId.eq(piece_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Replace association sets and the relationship record of one piece.
async fn write_links<C: ConnectionTrait>(
    conn: &C,
    piece_id: i32,
    input: &PieceInput,
) -> Result<(), DomainError> {
    clear_links(conn, piece_id).await?;

    if !input.composer_ids.is_empty() {
        piece_composer::Entity::insert_many(input.composer_ids.iter().map(|&composer_id| {
            piece_composer::ActiveModel {
                piece_id: Set(piece_id),
                composer_id: Set(composer_id),
            }
        }))
        .exec_without_returning(conn)
        .await?;
    }
    if !input.arranger_ids.is_empty() {
        piece_arranger::Entity::insert_many(input.arranger_ids.iter().map(|&arranger_id| {
            piece_arranger::ActiveModel {
                piece_id: Set(piece_id),
                arranger_id: Set(arranger_id),
            }
        }))
        .exec_without_returning(conn)
        .await?;
    }
    if !input.genre_ids.is_empty() {
        piece_genre::Entity::insert_many(input.genre_ids.iter().map(|&genre_id| {
            piece_genre::ActiveModel {
                piece_id: Set(piece_id),
                genre_id: Set(genre_id),
            }
        }))
        .exec_without_returning(conn)
        .await?;
    }
    if let Some(rel) = &input.relationship {
        let organization = rel.organization();
        relationship::ActiveModel {
            piece_id: Set(piece_id),
            relationship_type: Set(rel.relationship_type().as_str().to_string()),
            organization_kind: Set(organization.kind.as_str().to_string()),
            organization_id: Set(organization.organization_id),
            start_date: Set(rel.start_date()),
            end_date: Set(rel.end_date()),
            rental_cost_cents: Set(rel.rental_cost_cents()),
            ..Default::default()
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}

#[async_trait]
impl PieceRepository for SeaOrmPieceRepository {
    async fn list_page(&self, page: u64) -> Result<Page<Piece>, DomainError> {
        let paginator = PieceEntity::find()
            .order_by_asc(Column::Title)
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

    async fn find_by_id(&self, id: i32) -> Result<Option<Piece>, DomainError> {
        match self.load(id).await {
            Ok(piece) => Ok(Some(piece)),
            Err(DomainError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create(&self, input: PieceInput) -> Result<Piece, DomainError> {
        check_input(&input)?;
        let now = chrono::Utc::now().to_rfc3339();

        let txn = self.db.begin().await?;
        let mut piece = ActiveModel {
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        piece.apply(&input);
        let result = piece.insert(&txn).await?;
        write_links(&txn, result.id, &input).await?;
        txn.commit().await?;

        tracing::info!("Created piece #{} ({})", result.id, result.title);
        self.load(result.id).await
    }

    async fn update(&self, id: i32, input: PieceInput) -> Result<Piece, DomainError> {
        check_input(&input)?;

        let txn = self.db.begin().await?;
        let existing = PieceEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(DomainError::NotFound)?;
        let mut piece = existing.into_active_model();
        piece.apply(&input);
        piece.updated_at = Set(chrono::Utc::now().to_rfc3339());
        piece.update(&txn).await?;
        write_links(&txn, id, &input).await?;
        txn.commit().await?;

        tracing::info!("Updated piece #{}", id);
        self.load(id).await
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;
        clear_links(&txn, id).await?;
        let result = PieceEntity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(DomainError::NotFound);
        }
        txn.commit().await?;

        tracing::info!("Deleted piece #{}", id);
        Ok(())
    }
}
