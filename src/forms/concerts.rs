//! Venue and concert forms.

use axum::body::Bytes;

use super::FormData;
use super::fields::{
    model_choice, model_multiple_choice, optional_text, optional_url, required_date,
    required_text, required_time,
};
use super::widgets::{Choice, Field, Widget};
use crate::domain::{Concert, ConcertInput, FieldErrors, Person, Venue, VenueInput};
use crate::infrastructure::media::{sanitize_file_name, sniff_image};

pub fn venue_fields() -> Vec<Field> {
    vec![
        Field::new("name", "Name", Widget::text(100)).required(),
        Field::new("contact_name", "Contact name", Widget::text(100)),
        Field::new("address", "Address", Widget::text(200)),
        Field::new("city", "City", Widget::text(100)),
        Field::new("state", "State", Widget::text(2)).help("Two-letter abbreviation"),
        Field::new("zip_code", "Zip code", Widget::text(5)),
        Field::new("phone", "Phone", Widget::text(100)),
        Field::new("website", "Website", Widget::Url),
        Field::new("notes", "Notes", Widget::TextArea),
    ]
}

pub fn venue_initial(venue: &Venue) -> FormData {
    FormData::new()
        .with("name", venue.name.clone())
        .with("contact_name", venue.contact_name.clone())
        .with("address", venue.address.clone())
        .with("city", venue.city.clone())
        .with("state", venue.state.clone())
        .with("zip_code", venue.zip_code.clone())
        .with("phone", venue.phone.clone())
        .with("website", venue.website.clone())
        .with("notes", venue.notes.clone())
}

pub fn clean_venue(data: &FormData) -> Result<VenueInput, FieldErrors> {
    let mut errors = FieldErrors::new();
    let input = VenueInput {
        name: required_text(data, "name", 100, &mut errors),
        contact_name: optional_text(data, "contact_name", Some(100), &mut errors),
        address: optional_text(data, "address", Some(200), &mut errors),
        city: optional_text(data, "city", Some(100), &mut errors),
        state: optional_text(data, "state", Some(2), &mut errors),
        zip_code: optional_text(data, "zip_code", Some(5), &mut errors),
        phone: optional_text(data, "phone", Some(100), &mut errors),
        website: optional_url(data, "website", &mut errors),
        notes: optional_text(data, "notes", None, &mut errors),
    };
    errors.into_result(input)
}

/// Rows a concert form may reference.
#[derive(Debug, Clone, Default)]
pub struct ConcertChoices {
    pub venues: Vec<Venue>,
    pub conductors: Vec<Person>,
    pub guests: Vec<Person>,
}

/// A validated poster upload, not yet written to disk
#[derive(Debug, Clone)]
pub struct PosterUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone)]
pub struct CleanedConcert {
    pub input: ConcertInput,
    pub poster: Option<PosterUpload>,
}

pub fn concert_fields(choices: &ConcertChoices) -> Vec<Field> {
    let mut venues = vec![Choice::blank()];
    venues.extend(choices.venues.iter().map(|v| Choice::new(v.id, v.name.clone())));
    let conductors = choices
        .conductors
        .iter()
        .map(|c| Choice::new(c.id, c.display_name()))
        .collect();
    let guests = choices
        .guests
        .iter()
        .map(|g| Choice::new(g.id, g.display_name()))
        .collect();

    vec![
        Field::new("name", "Name", Widget::text(100)).required(),
        Field::new("date", "Date", Widget::Date).required(),
        Field::new("time", "Time", Widget::Time).required(),
        Field::new("venue", "Venue", Widget::Select(venues)).required(),
        Field::new("conductors", "Conductors", Widget::MultiSelect(conductors)),
        Field::new("guests", "Guests", Widget::MultiSelect(guests)),
        Field::new("description", "Description", Widget::TextArea),
        Field::new(
            "poster",
            "Poster",
            Widget::File {
                accept: "image/png,image/jpeg,image/gif,image/webp",
            },
        ),
    ]
}

pub fn concert_initial(concert: &Concert) -> FormData {
    let mut data = FormData::new()
        .with("name", concert.name.clone())
        .with("date", concert.date.format("%Y-%m-%d").to_string())
        .with("time", concert.time.format("%H:%M").to_string())
        .with("venue", concert.venue_id.to_string())
        .with("description", concert.description.clone());
    for c in &concert.conductors {
        data.push("conductors", c.id.to_string());
    }
    for g in &concert.guests {
        data.push("guests", g.id.to_string());
    }
    data
}

fn clean_poster(data: &FormData, errors: &mut FieldErrors) -> Option<PosterUpload> {
    let file = data.file("poster")?;
    let Some(file_name) = sanitize_file_name(&file.file_name) else {
        errors.add("poster", "No file was submitted. Check the encoding type on the form.");
        return None;
    };
    if sniff_image(&file.bytes).is_none() {
        tracing::warn!("Rejected poster upload '{}'", file_name);
        errors.add(
            "poster",
            "Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
        );
        return None;
    }
    Some(PosterUpload {
        file_name,
        bytes: file.bytes.clone(),
    })
}

pub fn clean_concert(
    data: &FormData,
    choices: &ConcertChoices,
) -> Result<CleanedConcert, FieldErrors> {
    let mut errors = FieldErrors::new();
    let known_venues: Vec<i32> = choices.venues.iter().map(|v| v.id).collect();
    let known_conductors: Vec<i32> = choices.conductors.iter().map(|c| c.id).collect();
    let known_guests: Vec<i32> = choices.guests.iter().map(|g| g.id).collect();
    let submitted = |key: &str| -> Vec<String> {
        data.get_all(key).into_iter().map(str::to_string).collect()
    };

    let name = required_text(data, "name", 100, &mut errors);
    let date = required_date(data, "date", &mut errors);
    let time = required_time(data, "time", &mut errors);
    let venue_id = model_choice(data, "venue", &known_venues, true, &mut errors);
    let conductor_ids = model_multiple_choice(
        &submitted("conductors"),
        "conductors",
        &known_conductors,
        false,
        &mut errors,
    );
    let guest_ids = model_multiple_choice(
        &submitted("guests"),
        "guests",
        &known_guests,
        false,
        &mut errors,
    );
    let description = optional_text(data, "description", None, &mut errors);
    let poster = clean_poster(data, &mut errors);

    match (date, time, venue_id) {
        (Some(date), Some(time), Some(venue_id)) if errors.is_empty() => Ok(CleanedConcert {
            input: ConcertInput {
                name,
                date,
                time,
                venue_id,
                conductor_ids,
                guest_ids,
                description,
            },
            poster,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::UploadedFile;

    fn choices() -> ConcertChoices {
        ConcertChoices {
            venues: vec![Venue {
                id: 1,
                name: "Civic".into(),
                contact_name: String::new(),
                address: String::new(),
                city: String::new(),
                state: String::new(),
                zip_code: String::new(),
                phone: String::new(),
                website: String::new(),
                notes: String::new(),
            }],
            ..Default::default()
        }
    }

    fn valid() -> FormData {
        FormData::new()
            .with("name", "Spring Gala")
            .with("date", "2025-04-12")
            .with("time", "19:30")
            .with("venue", "1")
    }

    #[test]
    fn date_time_and_venue_are_required() {
        let errors = clean_concert(&FormData::new().with("name", "X"), &choices()).unwrap_err();
        assert!(errors.has("date"));
        assert!(errors.has("time"));
        assert!(errors.has("venue"));
    }

    #[test]
    fn unknown_venue_is_rejected() {
        let data = valid().with("venue", "9");
        assert!(clean_concert(&data, &choices()).unwrap_err().has("venue"));
    }

    #[test]
    fn non_image_poster_is_rejected() {
        let mut data = valid();
        data.attach(
            "poster",
            UploadedFile {
                file_name: "../poster.txt".into(),
                content_type: Some("text/plain".into()),
                bytes: Bytes::from_static(b"hello"),
            },
        );
        assert!(clean_concert(&data, &choices()).unwrap_err().has("poster"));
    }

    #[test]
    fn valid_concert_cleans() {
        let cleaned = clean_concert(&valid(), &choices()).unwrap();
        assert_eq!(cleaned.input.venue_id, 1);
        assert!(cleaned.poster.is_none());
    }
}
