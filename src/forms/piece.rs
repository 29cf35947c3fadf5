//! Piece form, including the organization relationship and its
//! status consistency rules.

use super::FormData;
use super::fields::{
    choice, model_choice, model_multiple_choice, optional_date, optional_money_cents,
    optional_text, required_text,
};
use super::selection::{SELECTED_IDS, parse_selected};
use super::widgets::{Choice, Field, Widget};
use crate::domain::{
    Difficulty, FieldErrors, Genre, Organization, OrganizationRef, Person, Piece, PieceInput,
    PieceRelationship, PieceStatus, Publisher, RelationshipError, RelationshipType,
    piece::format_cents, validate_status,
};

/// First year offered by the copyright date control.
pub const EARLIEST_COPYRIGHT_YEAR: i32 = 1450;

/// Rows a piece form may reference.
#[derive(Debug, Clone, Default)]
pub struct PieceChoices {
    pub composers: Vec<Person>,
    pub arrangers: Vec<Person>,
    pub genres: Vec<Genre>,
    pub publishers: Vec<Publisher>,
    /// All three organization kinds
    pub organizations: Vec<Organization>,
}

fn people_choices(people: &[Person]) -> Vec<Choice> {
    people
        .iter()
        .map(|p| Choice::new(p.id, p.display_name()))
        .collect()
}

/// `picker` is the rendered composer picker standing in for the composers
/// control.
pub fn fields(choices: &PieceChoices, picker: String) -> Vec<Field> {
    let genres = choices
        .genres
        .iter()
        .map(|g| Choice::new(g.id, g.name.clone()))
        .collect();
    let mut publishers = vec![Choice::blank()];
    publishers.extend(
        choices
            .publishers
            .iter()
            .map(|p| Choice::new(p.id, p.name.clone())),
    );
    let mut difficulties = vec![Choice::blank()];
    difficulties.extend(
        Difficulty::ALL
            .iter()
            .map(|d| Choice::new(d.as_str(), d.label())),
    );
    let mut statuses = vec![Choice::blank()];
    statuses.extend(
        PieceStatus::ALL
            .iter()
            .map(|s| Choice::new(s.as_str(), s.label())),
    );
    let mut relationship_types = vec![Choice::blank()];
    relationship_types.extend(
        RelationshipType::ALL
            .iter()
            .map(|t| Choice::new(t.as_str(), t.label())),
    );
    let mut organizations = vec![Choice::blank()];
    organizations.extend(choices.organizations.iter().map(|o| {
        Choice::new(
            o.reference(),
            format!("{}: {}", o.kind.verbose_name(), o.name),
        )
    }));

    vec![
        Field::new("title", "Title", Widget::text(200)).required(),
        Field::new("composers", "Composers", Widget::Custom(picker)).required(),
        Field::new(
            "arrangers",
            "Arrangers",
            Widget::MultiSelect(people_choices(&choices.arrangers)),
        ),
        Field::new("genres", "Genres", Widget::MultiSelect(genres)),
        Field::new("publisher", "Publisher", Widget::Select(publishers)),
        Field::new("difficulty", "Difficulty", Widget::Select(difficulties)),
        Field::new("status", "Status", Widget::Select(statuses)).help(
            "Rented, on-loan and borrowed pieces need a matching organization relationship.",
        ),
        Field::new(
            "relationship_type",
            "Relationship",
            Widget::Select(relationship_types),
        ),
        Field::new(
            "relationship_organization",
            "Organization",
            Widget::Select(organizations),
        ),
        Field::new("relationship_start_date", "Start date", Widget::Date),
        Field::new("relationship_end_date", "End date", Widget::Date),
        Field::new("rental_cost", "Rental cost", Widget::text(13)).help("Rentals only"),
        Field::new("location_drawer", "Location drawer", Widget::text(100)),
        Field::new("location_number", "Location number", Widget::text(100)),
        Field::new(
            "copyright_date",
            "Copyright date",
            Widget::select_date_since(EARLIEST_COPYRIGHT_YEAR),
        ),
        Field::new("purchase_date", "Purchase date", Widget::select_date(50, 1)),
        Field::new("notes", "Notes", Widget::TextArea),
    ]
}

/// Unbound create form.
pub fn new_initial() -> FormData {
    FormData::new().with("status", PieceStatus::Owned.as_str())
}

pub fn initial(piece: &Piece) -> FormData {
    let mut data = FormData::new()
        .with("title", piece.title.clone())
        .with(
            "difficulty",
            piece.difficulty.map(Difficulty::as_str).unwrap_or_default(),
        )
        .with(
            "status",
            piece.status.map(PieceStatus::as_str).unwrap_or_default(),
        )
        .with("location_drawer", piece.location_drawer.clone())
        .with("location_number", piece.location_number.clone())
        .with("notes", piece.notes.clone());
    data.set_all(
        SELECTED_IDS,
        piece.composers.iter().map(|c| c.id.to_string()),
    );
    data.set_all("arrangers", piece.arrangers.iter().map(|a| a.id.to_string()));
    data.set_all("genres", piece.genres.iter().map(|g| g.id.to_string()));
    if let Some(publisher) = &piece.publisher {
        data.push("publisher", publisher.id.to_string());
    }
    for (key, date) in [
        ("copyright_date", piece.copyright_date),
        ("purchase_date", piece.purchase_date),
    ] {
        if let Some(date) = date {
            data.push(key, date.format("%Y-%m-%d").to_string());
        }
    }
    if let Some(rel) = &piece.relationship {
        data.push("relationship_type", rel.relationship_type().as_str());
        data.push("relationship_organization", rel.organization().to_string());
        if let Some(start) = rel.start_date() {
            data.push("relationship_start_date", start.format("%Y-%m-%d").to_string());
        }
        if let Some(end) = rel.end_date() {
            data.push("relationship_end_date", end.format("%Y-%m-%d").to_string());
        }
        if let Some(cents) = rel.rental_cost_cents() {
            data.push("rental_cost", format_cents(cents));
        }
    }
    data
}

fn clean_relationship(
    data: &FormData,
    choices: &PieceChoices,
    errors: &mut FieldErrors,
) -> Option<PieceRelationship> {
    let relationship_type = choice(
        data,
        "relationship_type",
        RelationshipType::parse,
        false,
        errors,
    );
    let organization = choice(
        data,
        "relationship_organization",
        |v| {
            v.parse::<OrganizationRef>()
                .ok()
                .filter(|r| choices.organizations.iter().any(|o| o.reference() == *r))
        },
        false,
        errors,
    );
    let start_date = optional_date(data, "relationship_start_date", errors);
    let end_date = optional_date(data, "relationship_end_date", errors);
    let rental_cost = optional_money_cents(data, "rental_cost", 10, errors);

    let details_given = start_date.is_some() || end_date.is_some() || rental_cost.is_some();
    match (relationship_type, organization) {
        (None, None) => {
            if details_given && !errors.has("relationship_type") {
                errors.add(
                    "relationship_type",
                    "Choose a relationship to record dates or a rental cost.",
                );
            }
            None
        }
        (Some(_), None) => {
            if !errors.has("relationship_organization") {
                errors.add("relationship_organization", super::fields::REQUIRED);
            }
            None
        }
        (None, Some(_)) => {
            if !errors.has("relationship_type") {
                errors.add("relationship_type", super::fields::REQUIRED);
            }
            None
        }
        (Some(relationship_type), Some(organization)) => match PieceRelationship::new(
            relationship_type,
            organization,
            start_date,
            end_date,
            rental_cost,
        ) {
            Ok(rel) => Some(rel),
            Err(e) => {
                let field = match e {
                    RelationshipError::KindMismatch { .. } => "relationship_organization",
                    RelationshipError::RentalCostOutsideRental => "rental_cost",
                    RelationshipError::EndBeforeStart => "relationship_end_date",
                };
                errors.add(field, e.to_string());
                None
            }
        },
    }
}

pub fn clean(data: &FormData, choices: &PieceChoices) -> Result<PieceInput, FieldErrors> {
    let mut errors = FieldErrors::new();
    let known = |people: &[Person]| -> Vec<i32> { people.iter().map(|p| p.id).collect() };
    let submitted = |key: &str| -> Vec<String> {
        data.get_all(key).into_iter().map(str::to_string).collect()
    };
    let known_genres: Vec<i32> = choices.genres.iter().map(|g| g.id).collect();
    let known_publishers: Vec<i32> = choices.publishers.iter().map(|p| p.id).collect();

    let title = required_text(data, "title", 200, &mut errors);
    let composer_ids = model_multiple_choice(
        &parse_selected(data, SELECTED_IDS),
        "composers",
        &known(&choices.composers),
        true,
        &mut errors,
    );
    let arranger_ids = model_multiple_choice(
        &submitted("arrangers"),
        "arrangers",
        &known(&choices.arrangers),
        false,
        &mut errors,
    );
    let genre_ids = model_multiple_choice(
        &submitted("genres"),
        "genres",
        &known_genres,
        false,
        &mut errors,
    );
    let publisher_id = model_choice(data, "publisher", &known_publishers, false, &mut errors);
    let difficulty = choice(data, "difficulty", Difficulty::parse, false, &mut errors);
    let status = choice(data, "status", PieceStatus::parse, false, &mut errors);
    let relationship = clean_relationship(data, choices, &mut errors);

    // Only meaningful once the relationship fields themselves are valid
    let relationship_ok = !errors.has("relationship_type")
        && !errors.has("relationship_organization")
        && !errors.has("rental_cost")
        && !errors.has("relationship_end_date");
    if relationship_ok
        && !errors.has("status")
        && let Err(e) = validate_status(
            status,
            relationship.as_ref().map(PieceRelationship::relationship_type),
        )
    {
        errors.add("status", e.to_string());
    }

    let input = PieceInput {
        title,
        composer_ids,
        arranger_ids,
        genre_ids,
        publisher_id,
        difficulty,
        status,
        relationship,
        location_drawer: optional_text(data, "location_drawer", Some(100), &mut errors),
        location_number: optional_text(data, "location_number", Some(100), &mut errors),
        copyright_date: optional_date(data, "copyright_date", &mut errors),
        purchase_date: optional_date(data, "purchase_date", &mut errors),
        notes: optional_text(data, "notes", None, &mut errors),
    };
    errors.into_result(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrganizationKind, PersonKind};

    fn person(id: i32, kind: PersonKind, last: &str) -> Person {
        Person {
            id,
            kind,
            first_name: None,
            last_name: last.into(),
            instrument: String::new(),
            birth_year: None,
            honorific: String::new(),
            middle_initial: String::new(),
            description: String::new(),
        }
    }

    fn organization(id: i32, kind: OrganizationKind) -> Organization {
        Organization {
            id,
            kind,
            name: format!("Org {}", id),
            contact_name: String::new(),
            contact_email: String::new(),
            contact_phone: String::new(),
            website: String::new(),
            notes: String::new(),
        }
    }

    fn choices() -> PieceChoices {
        PieceChoices {
            composers: vec![person(1, PersonKind::Composer, "Holst")],
            arrangers: vec![person(2, PersonKind::Arranger, "Custer")],
            organizations: vec![
                organization(1, OrganizationKind::Rental),
                organization(1, OrganizationKind::Loaning),
                organization(1, OrganizationKind::Borrowing),
            ],
            ..Default::default()
        }
    }

    fn base() -> FormData {
        FormData::new()
            .with("title", "The Planets")
            .with(SELECTED_IDS, "1")
    }

    #[test]
    fn owned_piece_without_relationship_is_valid() {
        let input = clean(&base().with("status", "OWNED"), &choices()).unwrap();
        assert_eq!(input.status, Some(PieceStatus::Owned));
        assert_eq!(input.composer_ids, vec![1]);
        assert!(input.relationship.is_none());
    }

    #[test]
    fn composer_is_required() {
        let data = FormData::new().with("title", "Untitled");
        assert!(clean(&data, &choices()).unwrap_err().has("composers"));
    }

    #[test]
    fn rented_status_without_relationship_fails() {
        let errors = clean(&base().with("status", "RENTED"), &choices()).unwrap_err();
        assert!(errors.has("status"));
    }

    #[test]
    fn rented_status_with_rental_relationship_passes() {
        let data = base()
            .with("status", "RENTED")
            .with("relationship_type", "RENTED")
            .with("relationship_organization", "rental:1")
            .with("rental_cost", "120.00");
        let input = clean(&data, &choices()).unwrap();
        let rel = input.relationship.unwrap();
        assert_eq!(rel.relationship_type(), RelationshipType::Rented);
        assert_eq!(rel.rental_cost_cents(), Some(12000));
    }

    #[test]
    fn mismatched_relationship_type_fails() {
        let data = base()
            .with("status", "RENTED")
            .with("relationship_type", "BORROWED")
            .with("relationship_organization", "borrowing:1");
        let errors = clean(&data, &choices()).unwrap_err();
        assert!(errors.has("status"));
    }

    #[test]
    fn organization_of_wrong_kind_fails() {
        let data = base()
            .with("status", "ON_LOAN")
            .with("relationship_type", "ON_LOAN")
            .with("relationship_organization", "rental:1");
        let errors = clean(&data, &choices()).unwrap_err();
        assert!(errors.has("relationship_organization"));
    }

    #[test]
    fn owned_piece_with_relationship_fails() {
        let data = base()
            .with("status", "OWNED")
            .with("relationship_type", "BORROWED")
            .with("relationship_organization", "borrowing:1");
        assert!(clean(&data, &choices()).unwrap_err().has("status"));
    }

    #[test]
    fn rental_cost_on_loan_fails() {
        let data = base()
            .with("status", "ON_LOAN")
            .with("relationship_type", "ON_LOAN")
            .with("relationship_organization", "loaning:1")
            .with("rental_cost", "10");
        assert!(clean(&data, &choices()).unwrap_err().has("rental_cost"));
    }

    #[test]
    fn new_form_defaults_to_owned() {
        assert_eq!(new_initial().get("status"), Some("OWNED"));
    }

    #[test]
    fn unknown_arranger_is_rejected() {
        let data = base().with("status", "OWNED").with("arrangers", "99");
        assert!(clean(&data, &choices()).unwrap_err().has("arrangers"));
    }
}
