use chrono::{NaiveDate, NaiveTime};

use crate::domain::{
    ConcertInput, Difficulty, DomainError, GenreInput, OrganizationInput, PersonInput, PieceInput,
    PieceRelationship, PieceStatus, PublisherInput, RelationshipType, VenueInput,
};
use crate::infrastructure::AppState;

fn person(first: &str, last: &str, instrument: &str) -> PersonInput {
    PersonInput {
        first_name: Some(first.to_owned()),
        last_name: last.to_owned(),
        instrument: instrument.to_owned(),
        ..Default::default()
    }
}

fn organization(name: &str, contact: &str, email: &str) -> OrganizationInput {
    OrganizationInput {
        name: name.to_owned(),
        contact_name: contact.to_owned(),
        contact_email: email.to_owned(),
        ..Default::default()
    }
}

/// Populate an empty database with a small demo season. Does nothing when
/// composers already exist.
pub async fn seed_demo_data(state: &AppState) -> Result<(), DomainError> {
    if state.composer_repo.count().await? > 0 {
        tracing::info!("Database already has data, skipping demo seed");
        return Ok(());
    }

    // 1. People
    let mut composer_ids = Vec::new();
    for (first, last, year) in [
        ("Ludwig van", "Beethoven", 1770),
        ("Gustav", "Mahler", 1860),
        ("Antonín", "Dvořák", 1841),
        ("Florence", "Price", 1887),
        ("John", "Williams", 1932),
    ] {
        let composer = state
            .composer_repo
            .create(PersonInput {
                birth_year: Some(year),
                ..person(first, last, "")
            })
            .await?;
        composer_ids.push(composer.id);
    }

    let arranger = state
        .arranger_repo
        .create(person("Calvin", "Custer", ""))
        .await?;

    let conductor = state
        .conductor_repo
        .create(PersonInput {
            honorific: "Maestra".to_owned(),
            middle_initial: "J".to_owned(),
            description: "Music director since 2015.".to_owned(),
            ..person("Marin", "Alsop", "")
        })
        .await?;

    let guest = state
        .guest_repo
        .create(PersonInput {
            description: "Principal cellist, guest soloist.".to_owned(),
            ..person("Yo-Yo", "Ma", "Cello")
        })
        .await?;

    // 2. Catalog
    let mut genre_ids = Vec::new();
    for name in ["Symphony", "Film Score", "Overture"] {
        let genre = state
            .genre_repo
            .create(GenreInput {
                name: name.to_owned(),
            })
            .await?;
        genre_ids.push(genre.id);
    }

    let publisher = state
        .publisher_repo
        .create(PublisherInput {
            name: "Hal Leonard".to_owned(),
            website: "https://www.halleonard.com".to_owned(),
        })
        .await?;

    // 3. Organizations
    let rental = state
        .rental_repo
        .create(organization(
            "Stanton's Sheet Music",
            "Front Desk",
            "rentals@example.org",
        ))
        .await?;
    state
        .loaning_repo
        .create(organization("Valley Youth Orchestra", "Librarian", ""))
        .await?;
    state
        .borrowing_repo
        .create(organization("County Library", "", "music@example.org"))
        .await?;

    // 4. Pieces
    state
        .piece_repo
        .create(PieceInput {
            title: "Symphony No. 5".to_owned(),
            composer_ids: vec![composer_ids[0]],
            genre_ids: vec![genre_ids[0]],
            publisher_id: Some(publisher.id),
            difficulty: Some(Difficulty::ModeratelyDifficult),
            status: Some(PieceStatus::Owned),
            location_drawer: "A".to_owned(),
            location_number: "12".to_owned(),
            ..Default::default()
        })
        .await?;

    let rental_terms = PieceRelationship::new(
        RelationshipType::Rented,
        rental.reference(),
        NaiveDate::from_ymd_opt(2025, 9, 1),
        NaiveDate::from_ymd_opt(2025, 12, 15),
        Some(35000),
    )
    .map_err(|e| DomainError::Internal(e.to_string()))?;
    state
        .piece_repo
        .create(PieceInput {
            title: "Star Wars Suite".to_owned(),
            composer_ids: vec![composer_ids[4]],
            arranger_ids: vec![arranger.id],
            genre_ids: vec![genre_ids[1]],
            difficulty: Some(Difficulty::Moderate),
            status: Some(PieceStatus::Rented),
            relationship: Some(rental_terms),
            ..Default::default()
        })
        .await?;

    // 5. Concerts
    let venue = state
        .venue_repo
        .create(VenueInput {
            name: "Civic Auditorium".to_owned(),
            address: "100 Main St".to_owned(),
            city: "Springfield".to_owned(),
            state: "IL".to_owned(),
            zip_code: "62701".to_owned(),
            ..Default::default()
        })
        .await?;

    if let (Some(date), Some(time)) = (
        NaiveDate::from_ymd_opt(2025, 12, 14),
        NaiveTime::from_hms_opt(19, 30, 0),
    ) {
        state
            .concert_repo
            .create(ConcertInput {
                name: "Winter Pops".to_owned(),
                date,
                time,
                venue_id: venue.id,
                conductor_ids: vec![conductor.id],
                guest_ids: vec![guest.id],
                description: "Holiday favorites and film music.".to_owned(),
            })
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db;

    #[tokio::test]
    async fn seeding_runs_once() {
        let conn = db::init_db("sqlite::memory:").await.unwrap();
        let state = AppState::new(conn, std::env::temp_dir());

        seed_demo_data(&state).await.unwrap();
        seed_demo_data(&state).await.unwrap();

        assert_eq!(state.composer_repo.count().await.unwrap(), 5);
        let pieces = state.piece_repo.list_page(1).await.unwrap();
        assert_eq!(pieces.total, 2);
        let rented = pieces
            .items
            .iter()
            .find(|p| p.status == Some(PieceStatus::Rented))
            .unwrap();
        assert_eq!(
            rented.relationship.as_ref().and_then(|r| r.rental_cost_cents()),
            Some(35000)
        );
    }
}
