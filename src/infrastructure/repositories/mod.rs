//! Repository implementations using SeaORM

pub mod concert_repository;
pub mod genre_repository;
pub mod organization_repository;
pub mod person_repository;
pub mod piece_repository;
pub mod publisher_repository;
pub mod venue_repository;

pub use concert_repository::SeaOrmConcertRepository;
pub use genre_repository::SeaOrmGenreRepository;
pub use organization_repository::{
    SeaOrmBorrowingOrganizationRepository, SeaOrmLoaningOrganizationRepository,
    SeaOrmRentalOrganizationRepository,
};
pub use person_repository::{
    SeaOrmArrangerRepository, SeaOrmComposerRepository, SeaOrmConductorRepository,
    SeaOrmGuestRepository,
};
pub use piece_repository::SeaOrmPieceRepository;
pub use publisher_repository::SeaOrmPublisherRepository;
pub use venue_repository::SeaOrmVenueRepository;
