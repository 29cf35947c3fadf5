//! Venues and the concerts held at them.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use super::people::Person;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Venue {
    pub id: i32,
    pub name: String,
    pub contact_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub website: String,
    pub notes: String,
}

impl Venue {
    pub fn absolute_url(&self) -> String {
        format!("/venues/{}/", self.id)
    }

    /// "City, ST 12345" with whichever parts are present.
    pub fn locality(&self) -> String {
        let region = [self.state.as_str(), self.zip_code.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        match (self.city.is_empty(), region.is_empty()) {
            (false, false) => format!("{}, {}", self.city, region),
            (false, true) => self.city.clone(),
            (true, _) => region,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueInput {
    pub name: String,
    pub contact_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub website: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Concert {
    pub id: i32,
    pub name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub venue_id: i32,
    pub venue_name: String,
    pub conductors: Vec<Person>,
    pub guests: Vec<Person>,
    pub description: String,
    /// Path relative to the media root
    pub poster: Option<String>,
}

impl Concert {
    pub fn absolute_url(&self) -> String {
        format!("/concerts/{}/", self.id)
    }

    pub fn poster_url(&self) -> Option<String> {
        self.poster.as_ref().map(|p| format!("/media/{}", p))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcertInput {
    pub name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub venue_id: i32,
    pub conductor_ids: Vec<i32>,
    pub guest_ids: Vec<i32>,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue(city: &str, state: &str, zip: &str) -> Venue {
        Venue {
            id: 1,
            name: "Hall".into(),
            contact_name: String::new(),
            address: String::new(),
            city: city.into(),
            state: state.into(),
            zip_code: zip.into(),
            phone: String::new(),
            website: String::new(),
            notes: String::new(),
        }
    }

    #[test]
    fn locality_skips_missing_parts() {
        assert_eq!(venue("Boise", "ID", "83702").locality(), "Boise, ID 83702");
        assert_eq!(venue("Boise", "", "").locality(), "Boise");
        assert_eq!(venue("", "ID", "").locality(), "ID");
    }
}
