//! Person-family records: composers, arrangers, conductors and guests.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonKind {
    Composer,
    Arranger,
    Conductor,
    Guest,
}

impl PersonKind {
    pub const ALL: [PersonKind; 4] = [
        PersonKind::Composer,
        PersonKind::Arranger,
        PersonKind::Conductor,
        PersonKind::Guest,
    ];

    pub fn verbose_name(self) -> &'static str {
        match self {
            PersonKind::Composer => "Composer",
            PersonKind::Arranger => "Arranger",
            PersonKind::Conductor => "Conductor",
            PersonKind::Guest => "Guest",
        }
    }

    pub fn verbose_name_plural(self) -> &'static str {
        match self {
            PersonKind::Composer => "Composers",
            PersonKind::Arranger => "Arrangers",
            PersonKind::Conductor => "Conductors",
            PersonKind::Guest => "Guests",
        }
    }

    /// Lower-case name used in route names and templates ("composer").
    pub fn model_name(self) -> &'static str {
        match self {
            PersonKind::Composer => "composer",
            PersonKind::Arranger => "arranger",
            PersonKind::Conductor => "conductor",
            PersonKind::Guest => "guest",
        }
    }

    /// First path segment of the kind's routes ("composers").
    pub fn url_segment(self) -> &'static str {
        match self {
            PersonKind::Composer => "composers",
            PersonKind::Arranger => "arrangers",
            PersonKind::Conductor => "conductors",
            PersonKind::Guest => "guests",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    pub id: i32,
    pub kind: PersonKind,
    pub first_name: Option<String>,
    pub last_name: String,
    pub instrument: String,
    /// Composers only
    pub birth_year: Option<i32>,
    /// Conductors only
    pub honorific: String,
    /// Conductors only
    pub middle_initial: String,
    /// Conductors and guests
    pub description: String,
}

impl Person {
    /// "Last, First", or just the last name when no first name is recorded.
    pub fn display_name(&self) -> String {
        match self.first_name.as_deref().filter(|f| !f.is_empty()) {
            Some(first) => format!("{}, {}", self.last_name, first),
            None => self.last_name.clone(),
        }
    }

    /// "First Last", or just the last name when no first name is recorded.
    pub fn full_name(&self) -> String {
        match self.first_name.as_deref().filter(|f| !f.is_empty()) {
            Some(first) => format!("{} {}", first, self.last_name),
            None => self.last_name.clone(),
        }
    }

    pub fn absolute_url(&self) -> String {
        format!("/{}/{}/", self.kind.url_segment(), self.id)
    }
}

/// Submitted person fields. Fields a kind does not carry are ignored when
/// persisting that kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonInput {
    pub first_name: Option<String>,
    pub last_name: String,
    pub instrument: String,
    pub birth_year: Option<i32>,
    pub honorific: String,
    pub middle_initial: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(first: Option<&str>, last: &str) -> Person {
        Person {
            id: 4,
            kind: PersonKind::Conductor,
            first_name: first.map(str::to_string),
            last_name: last.to_string(),
            instrument: String::new(),
            birth_year: None,
            honorific: String::new(),
            middle_initial: String::new(),
            description: String::new(),
        }
    }

    #[test]
    fn names_follow_last_first_contract() {
        let pairs = [
            ("Leonard", "Bernstein"),
            ("Yo-Yo", "Ma"),
            ("Gustav", "Mahler"),
            ("Nadia", "Boulanger"),
        ];
        for (first, last) in pairs {
            let p = person(Some(first), last);
            assert_eq!(p.display_name(), format!("{}, {}", last, first));
            assert_eq!(p.full_name(), format!("{} {}", first, last));
        }
    }

    #[test]
    fn missing_first_name_falls_back_to_last_name() {
        let p = person(None, "Anonymous");
        assert_eq!(p.display_name(), "Anonymous");
        assert_eq!(p.full_name(), "Anonymous");
    }

    #[test]
    fn absolute_url_uses_kind_segment() {
        assert_eq!(person(Some("A"), "B").absolute_url(), "/conductors/4/");
    }
}
