//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::catalog::{Genre, GenreInput, Publisher, PublisherInput};
use super::concerts::{Concert, ConcertInput, Venue, VenueInput};
use super::organizations::{Organization, OrganizationInput, OrganizationKind};
use super::people::{Person, PersonInput, PersonKind};
use super::piece::{Piece, PieceInput};
use super::DomainError;

/// Rows per list page
pub const PAGE_SIZE: u64 = 20;

/// One page of a list view, 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
        }
    }
}

/// Page count for `total` rows; an empty table still has one (empty) page.
pub fn num_pages(total: u64) -> u64 {
    total.div_ceil(PAGE_SIZE).max(1)
}

/// Rejects page numbers outside `1..=num_pages(total)`.
pub fn check_page(number: u64, total: u64) -> Result<u64, DomainError> {
    let pages = num_pages(total);
    if number == 0 || number > pages {
        return Err(DomainError::NotFound);
    }
    Ok(pages)
}

/// Repository for one person table (composers, arrangers, conductors or guests)
#[async_trait]
pub trait PersonRepository: Send + Sync {
    fn kind(&self) -> PersonKind;

    /// Page of people ordered by last name, then first name
    async fn list_page(&self, page: u64) -> Result<Page<Person>, DomainError>;

    /// Every row, same order as the list (used for select widgets)
    async fn find_all(&self) -> Result<Vec<Person>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Person>, DomainError>;

    /// Rows for the given ids that exist, ordered by last name, then first name
    async fn find_many(&self, ids: &[i32]) -> Result<Vec<Person>, DomainError>;

    /// Case-insensitive substring match on first or last name, excluding
    /// `exclude`, capped at `limit`. An empty query matches everyone.
    async fn search(
        &self,
        query: &str,
        exclude: &[i32],
        limit: u64,
    ) -> Result<Vec<Person>, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;

    async fn create(&self, input: PersonInput) -> Result<Person, DomainError>;

    async fn update(&self, id: i32, input: PersonInput) -> Result<Person, DomainError>;

    /// Delete the person and the association rows pointing at them
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Repository for one organization table
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    fn kind(&self) -> OrganizationKind;

    async fn list_page(&self, page: u64) -> Result<Page<Organization>, DomainError>;

    async fn find_all(&self) -> Result<Vec<Organization>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Organization>, DomainError>;

    async fn create(&self, input: OrganizationInput) -> Result<Organization, DomainError>;

    async fn update(&self, id: i32, input: OrganizationInput)
    -> Result<Organization, DomainError>;

    /// Delete the organization and every piece relationship referencing it
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

#[async_trait]
pub trait GenreRepository: Send + Sync {
    async fn list_page(&self, page: u64) -> Result<Page<Genre>, DomainError>;

    async fn find_all(&self) -> Result<Vec<Genre>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Genre>, DomainError>;

    async fn create(&self, input: GenreInput) -> Result<Genre, DomainError>;

    async fn update(&self, id: i32, input: GenreInput) -> Result<Genre, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

#[async_trait]
pub trait PublisherRepository: Send + Sync {
    async fn list_page(&self, page: u64) -> Result<Page<Publisher>, DomainError>;

    async fn find_all(&self) -> Result<Vec<Publisher>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Publisher>, DomainError>;

    async fn create(&self, input: PublisherInput) -> Result<Publisher, DomainError>;

    async fn update(&self, id: i32, input: PublisherInput) -> Result<Publisher, DomainError>;

    /// Delete the publisher; its pieces keep existing without one
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

#[async_trait]
pub trait VenueRepository: Send + Sync {
    async fn list_page(&self, page: u64) -> Result<Page<Venue>, DomainError>;

    async fn find_all(&self) -> Result<Vec<Venue>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Venue>, DomainError>;

    async fn create(&self, input: VenueInput) -> Result<Venue, DomainError>;

    async fn update(&self, id: i32, input: VenueInput) -> Result<Venue, DomainError>;

    /// Delete the venue and its concerts. Returns the ids of the removed
    /// concerts so their posters can be cleaned up.
    async fn delete(&self, id: i32) -> Result<Vec<i32>, DomainError>;
}

#[async_trait]
pub trait ConcertRepository: Send + Sync {
    /// Page of concerts ordered by date, then time
    async fn list_page(&self, page: u64) -> Result<Page<Concert>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Concert>, DomainError>;

    async fn create(&self, input: ConcertInput) -> Result<Concert, DomainError>;

    async fn update(&self, id: i32, input: ConcertInput) -> Result<Concert, DomainError>;

    /// Record (or clear) the poster path, relative to the media root
    async fn set_poster(&self, id: i32, poster: Option<String>) -> Result<(), DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

#[async_trait]
pub trait PieceRepository: Send + Sync {
    /// Page of pieces ordered by title
    async fn list_page(&self, page: u64) -> Result<Page<Piece>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Piece>, DomainError>;

    /// Insert the piece, its association sets and its relationship record
    /// in one transaction
    async fn create(&self, input: PieceInput) -> Result<Piece, DomainError>;

    /// Replace every field, association set and the relationship record
    async fn update(&self, id: i32, input: PieceInput) -> Result<Piece, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}
