//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::{
    ConcertRepository, GenreRepository, OrganizationKind, OrganizationRepository, PersonKind,
    PersonRepository, PieceRepository, PublisherRepository, VenueRepository,
};
use crate::infrastructure::{
    SeaOrmArrangerRepository, SeaOrmBorrowingOrganizationRepository, SeaOrmComposerRepository,
    SeaOrmConcertRepository, SeaOrmConductorRepository, SeaOrmGenreRepository,
    SeaOrmGuestRepository, SeaOrmLoaningOrganizationRepository, SeaOrmPieceRepository,
    SeaOrmPublisherRepository, SeaOrmRentalOrganizationRepository, SeaOrmVenueRepository,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    /// Uploaded files live under this directory
    pub media_root: PathBuf,
    pub composer_repo: Arc<dyn PersonRepository>,
    pub arranger_repo: Arc<dyn PersonRepository>,
    pub conductor_repo: Arc<dyn PersonRepository>,
    pub guest_repo: Arc<dyn PersonRepository>,
    pub rental_repo: Arc<dyn OrganizationRepository>,
    pub loaning_repo: Arc<dyn OrganizationRepository>,
    pub borrowing_repo: Arc<dyn OrganizationRepository>,
    pub genre_repo: Arc<dyn GenreRepository>,
    pub publisher_repo: Arc<dyn PublisherRepository>,
    pub piece_repo: Arc<dyn PieceRepository>,
    pub venue_repo: Arc<dyn VenueRepository>,
    pub concert_repo: Arc<dyn ConcertRepository>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection, media_root: PathBuf) -> Self {
        Self {
            composer_repo: Arc::new(SeaOrmComposerRepository::new(db.clone())),
            arranger_repo: Arc::new(SeaOrmArrangerRepository::new(db.clone())),
            conductor_repo: Arc::new(SeaOrmConductorRepository::new(db.clone())),
            guest_repo: Arc::new(SeaOrmGuestRepository::new(db.clone())),
            rental_repo: Arc::new(SeaOrmRentalOrganizationRepository::new(db.clone())),
            loaning_repo: Arc::new(SeaOrmLoaningOrganizationRepository::new(db.clone())),
            borrowing_repo: Arc::new(SeaOrmBorrowingOrganizationRepository::new(db.clone())),
            genre_repo: Arc::new(SeaOrmGenreRepository::new(db.clone())),
            publisher_repo: Arc::new(SeaOrmPublisherRepository::new(db.clone())),
            piece_repo: Arc::new(SeaOrmPieceRepository::new(db.clone())),
            venue_repo: Arc::new(SeaOrmVenueRepository::new(db.clone())),
            concert_repo: Arc::new(SeaOrmConcertRepository::new(db.clone())),
            media_root,
            db,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn people(&self, kind: PersonKind) -> Arc<dyn PersonRepository> {
        match kind {
            PersonKind::Composer => self.composer_repo.clone(),
            PersonKind::Arranger => self.arranger_repo.clone(),
            PersonKind::Conductor => self.conductor_repo.clone(),
            PersonKind::Guest => self.guest_repo.clone(),
        }
    }

    pub fn organizations(&self, kind: OrganizationKind) -> Arc<dyn OrganizationRepository> {
        match kind {
            OrganizationKind::Rental => self.rental_repo.clone(),
            OrganizationKind::Loaning => self.loaning_repo.clone(),
            OrganizationKind::Borrowing => self.borrowing_repo.clone(),
        }
    }
}

// Implement FromRef to allow extracting DatabaseConnection from AppState
impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
