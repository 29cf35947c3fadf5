//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM, no Axum).
//! Record types, validation rules, repository traits and domain error types.

pub mod catalog;
pub mod concerts;
pub mod errors;
pub mod organizations;
pub mod people;
pub mod piece;
pub mod repositories;

pub use catalog::{Genre, GenreInput, Publisher, PublisherInput};
pub use concerts::{Concert, ConcertInput, Venue, VenueInput};
pub use errors::{DomainError, FieldErrors};
pub use organizations::{Organization, OrganizationInput, OrganizationKind, OrganizationRef};
pub use people::{Person, PersonInput, PersonKind};
pub use piece::{
    Difficulty, Piece, PieceInput, PieceRelationship, PieceStatus, RelationshipError,
    RelationshipType, StatusError, validate_status,
};
pub use repositories::*;
