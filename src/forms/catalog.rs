//! Genre and publisher forms.

use super::FormData;
use super::fields::{optional_url, required_text};
use super::widgets::{Field, Widget};
use crate::domain::{FieldErrors, Genre, GenreInput, Publisher, PublisherInput};

pub fn genre_fields() -> Vec<Field> {
    vec![Field::new("name", "Name", Widget::text(100)).required()]
}

pub fn genre_initial(genre: &Genre) -> FormData {
    FormData::new().with("name", genre.name.clone())
}

pub fn clean_genre(data: &FormData) -> Result<GenreInput, FieldErrors> {
    let mut errors = FieldErrors::new();
    let input = GenreInput {
        name: required_text(data, "name", 100, &mut errors),
    };
    errors.into_result(input)
}

pub fn publisher_fields() -> Vec<Field> {
    vec![
        Field::new("name", "Name", Widget::text(100)).required(),
        Field::new("website", "Website", Widget::Url),
    ]
}

pub fn publisher_initial(publisher: &Publisher) -> FormData {
    FormData::new()
        .with("name", publisher.name.clone())
        .with("website", publisher.website.clone())
}

pub fn clean_publisher(data: &FormData) -> Result<PublisherInput, FieldErrors> {
    let mut errors = FieldErrors::new();
    let input = PublisherInput {
        name: required_text(data, "name", 100, &mut errors),
        website: optional_url(data, "website", &mut errors),
    };
    errors.into_result(input)
}
