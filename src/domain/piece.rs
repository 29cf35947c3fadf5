//! Sheet-music pieces, their ownership status and the organization
//! relationship that rented / on-loan / borrowed pieces must carry.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use super::catalog::{Genre, Publisher};
use super::organizations::{OrganizationKind, OrganizationRef};
use super::people::Person;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PieceStatus {
    Owned,
    Rented,
    OnLoan,
    Borrowed,
    Archived,
}

impl PieceStatus {
    pub const ALL: [PieceStatus; 5] = [
        PieceStatus::Owned,
        PieceStatus::Rented,
        PieceStatus::OnLoan,
        PieceStatus::Borrowed,
        PieceStatus::Archived,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PieceStatus::Owned => "OWNED",
            PieceStatus::Rented => "RENTED",
            PieceStatus::OnLoan => "ON_LOAN",
            PieceStatus::Borrowed => "BORROWED",
            PieceStatus::Archived => "ARCHIVED",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PieceStatus::Owned => "Owned",
            PieceStatus::Rented => "Rented",
            PieceStatus::OnLoan => "On Loan",
            PieceStatus::Borrowed => "Borrowed",
            PieceStatus::Archived => "Archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    /// The relationship type a piece in this status must carry, if any.
    pub fn required_relationship(self) -> Option<RelationshipType> {
        match self {
            PieceStatus::Rented => Some(RelationshipType::Rented),
            PieceStatus::OnLoan => Some(RelationshipType::OnLoan),
            PieceStatus::Borrowed => Some(RelationshipType::Borrowed),
            PieceStatus::Owned | PieceStatus::Archived => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Difficulty {
    Easy,
    ModeratelyEasy,
    Moderate,
    ModeratelyDifficult,
    Difficult,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Easy,
        Difficulty::ModeratelyEasy,
        Difficulty::Moderate,
        Difficulty::ModeratelyDifficult,
        Difficulty::Difficult,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::ModeratelyEasy => "MOD_EASY",
            Difficulty::Moderate => "MODERATE",
            Difficulty::ModeratelyDifficult => "MOD_DIFFICULT",
            Difficulty::Difficult => "DIFFICULT",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::ModeratelyEasy => "Moderately Easy",
            Difficulty::Moderate => "Moderate",
            Difficulty::ModeratelyDifficult => "Moderately Difficult",
            Difficulty::Difficult => "Difficult",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RelationshipType {
    Rented,
    OnLoan,
    Borrowed,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 3] = [
        RelationshipType::Rented,
        RelationshipType::OnLoan,
        RelationshipType::Borrowed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RelationshipType::Rented => "RENTED",
            RelationshipType::OnLoan => "ON_LOAN",
            RelationshipType::Borrowed => "BORROWED",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RelationshipType::Rented => "Rented",
            RelationshipType::OnLoan => "On Loan",
            RelationshipType::Borrowed => "Borrowed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }

    /// The only organization table a relationship of this type may point at.
    pub fn organization_kind(self) -> OrganizationKind {
        match self {
            RelationshipType::Rented => OrganizationKind::Rental,
            RelationshipType::OnLoan => OrganizationKind::Loaning,
            RelationshipType::Borrowed => OrganizationKind::Borrowing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationshipError {
    KindMismatch {
        relationship_type: RelationshipType,
        found: OrganizationKind,
    },
    RentalCostOutsideRental,
    EndBeforeStart,
}

impl fmt::Display for RelationshipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipError::KindMismatch {
                relationship_type,
                found,
            } => write!(
                f,
                "A {} relationship must reference a {}, not a {}.",
                relationship_type.label().to_lowercase(),
                relationship_type.organization_kind().verbose_name().to_lowercase(),
                found.verbose_name().to_lowercase()
            ),
            RelationshipError::RentalCostOutsideRental => {
                write!(f, "A rental cost can only be recorded for rented pieces.")
            }
            RelationshipError::EndBeforeStart => {
                write!(f, "The end date cannot be before the start date.")
            }
        }
    }
}

/// A piece's link to the organization it is rented from, loaned to or
/// borrowed from. Only constructible in a consistent state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieceRelationship {
    relationship_type: RelationshipType,
    organization: OrganizationRef,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    rental_cost_cents: Option<i64>,
}

impl PieceRelationship {
    pub fn new(
        relationship_type: RelationshipType,
        organization: OrganizationRef,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        rental_cost_cents: Option<i64>,
    ) -> Result<Self, RelationshipError> {
        if organization.kind != relationship_type.organization_kind() {
            return Err(RelationshipError::KindMismatch {
                relationship_type,
                found: organization.kind,
            });
        }
        if rental_cost_cents.is_some() && relationship_type != RelationshipType::Rented {
            return Err(RelationshipError::RentalCostOutsideRental);
        }
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                return Err(RelationshipError::EndBeforeStart);
            }
        }
        Ok(Self {
            relationship_type,
            organization,
            start_date,
            end_date,
            rental_cost_cents,
        })
    }

    pub fn relationship_type(&self) -> RelationshipType {
        self.relationship_type
    }

    pub fn organization(&self) -> OrganizationRef {
        self.organization
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn rental_cost_cents(&self) -> Option<i64> {
        self.rental_cost_cents
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusError {
    /// Status needs a relationship and none was given
    MissingRelationship(PieceStatus),
    /// Status needs a relationship of another type
    Mismatch {
        status: PieceStatus,
        found: RelationshipType,
    },
    /// Status admits no relationship but one was given
    UnexpectedRelationship(RelationshipType),
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusError::MissingRelationship(status) => write!(
                f,
                "A piece marked {} needs a {} relationship.",
                status.label(),
                status
                    .required_relationship()
                    .map(|t| t.organization_kind().verbose_name().to_lowercase())
                    .unwrap_or_default()
            ),
            StatusError::Mismatch { status, found } => write!(
                f,
                "A piece marked {} cannot carry a {} relationship.",
                status.label(),
                found.label().to_lowercase()
            ),
            StatusError::UnexpectedRelationship(found) => write!(
                f,
                "Only rented, on-loan or borrowed pieces can carry a relationship (found {}).",
                found.label().to_lowercase()
            ),
        }
    }
}

/// Status/relationship consistency, independent of any previous state.
pub fn validate_status(
    status: Option<PieceStatus>,
    relationship: Option<RelationshipType>,
) -> Result<(), StatusError> {
    let required = status.and_then(PieceStatus::required_relationship);
    match (required, relationship) {
        (None, None) => Ok(()),
        (Some(expected), Some(found)) if expected == found => Ok(()),
        (Some(_), None) => Err(StatusError::MissingRelationship(
            status.unwrap_or(PieceStatus::Owned),
        )),
        (Some(_), Some(found)) => Err(StatusError::Mismatch {
            status: status.unwrap_or(PieceStatus::Owned),
            found,
        }),
        (None, Some(found)) => Err(StatusError::UnexpectedRelationship(found)),
    }
}

/// `1250` -> `"12.50"`
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Piece {
    pub id: i32,
    pub title: String,
    pub composers: Vec<Person>,
    pub arrangers: Vec<Person>,
    pub genres: Vec<Genre>,
    pub publisher: Option<Publisher>,
    pub difficulty: Option<Difficulty>,
    pub status: Option<PieceStatus>,
    pub relationship: Option<PieceRelationship>,
    /// Name of the organization the relationship points at
    pub relationship_organization: Option<String>,
    pub location_drawer: String,
    pub location_number: String,
    pub copyright_date: Option<NaiveDate>,
    pub purchase_date: Option<NaiveDate>,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Piece {
    pub fn absolute_url(&self) -> String {
        format!("/pieces/{}/", self.id)
    }

    pub fn composer_names(&self) -> String {
        self.composers
            .iter()
            .map(Person::full_name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PieceInput {
    pub title: String,
    pub composer_ids: Vec<i32>,
    pub arranger_ids: Vec<i32>,
    pub genre_ids: Vec<i32>,
    pub publisher_id: Option<i32>,
    pub difficulty: Option<Difficulty>,
    pub status: Option<PieceStatus>,
    pub relationship: Option<PieceRelationship>,
    pub location_drawer: String,
    pub location_number: String,
    pub copyright_date: Option<NaiveDate>,
    pub purchase_date: Option<NaiveDate>,
    pub notes: String,
}

impl PieceInput {
    pub fn check_status(&self) -> Result<(), StatusError> {
        validate_status(
            self.status,
            self.relationship
                .as_ref()
                .map(PieceRelationship::relationship_type),
        )
    }
}
