//! Genres and publishers.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

impl Genre {
    pub fn absolute_url(&self) -> String {
        format!("/genres/{}/", self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreInput {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Publisher {
    pub id: i32,
    pub name: String,
    pub website: String,
}

impl Publisher {
    pub fn absolute_url(&self) -> String {
        format!("/publishers/{}/", self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublisherInput {
    pub name: String,
    pub website: String,
}
