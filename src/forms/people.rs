use super::FormData;
use super::fields::{optional_int, optional_text, required_text};
use super::widgets::{Field, Widget};
use crate::domain::{FieldErrors, Person, PersonInput, PersonKind};

pub fn fields(kind: PersonKind) -> Vec<Field> {
    let mut fields = Vec::new();
    if kind == PersonKind::Conductor {
        fields.push(
            Field::new("honorific", "Honorific", Widget::text(100)).help("e.g. Dr., Maestro"),
        );
    }
    fields.push(Field::new("first_name", "First name", Widget::text(100)));
    if kind == PersonKind::Conductor {
        fields.push(Field::new("middle_initial", "Middle initial", Widget::text(1)));
    }
    fields.push(Field::new("last_name", "Last name", Widget::text(100)).required());
    fields.push(Field::new("instrument", "Instrument", Widget::text(100)));
    match kind {
        PersonKind::Composer => {
            fields.push(Field::new("birth_year", "Birth year", Widget::Number));
        }
        PersonKind::Conductor | PersonKind::Guest => {
            fields.push(Field::new("description", "Description", Widget::TextArea));
        }
        PersonKind::Arranger => {}
    }
    fields
}

pub fn initial(person: &Person) -> FormData {
    let mut data = FormData::new()
        .with("first_name", person.first_name.clone().unwrap_or_default())
        .with("last_name", person.last_name.clone())
        .with("instrument", person.instrument.clone());
    match person.kind {
        PersonKind::Composer => {
            if let Some(year) = person.birth_year {
                data.push("birth_year", year.to_string());
            }
        }
        PersonKind::Conductor => {
            data.push("honorific", person.honorific.clone());
            data.push("middle_initial", person.middle_initial.clone());
            data.push("description", person.description.clone());
        }
        PersonKind::Guest => data.push("description", person.description.clone()),
        PersonKind::Arranger => {}
    }
    data
}

/// Validate a person form. Fields the kind does not carry are ignored.
pub fn clean(kind: PersonKind, data: &FormData) -> Result<PersonInput, FieldErrors> {
    let mut errors = FieldErrors::new();

    let first_name = optional_text(data, "first_name", Some(100), &mut errors);
    let mut input = PersonInput {
        first_name: (!first_name.is_empty()).then_some(first_name),
        last_name: required_text(data, "last_name", 100, &mut errors),
        instrument: optional_text(data, "instrument", Some(100), &mut errors),
        ..Default::default()
    };
    match kind {
        PersonKind::Composer => {
            input.birth_year = optional_int(data, "birth_year", &mut errors);
        }
        PersonKind::Conductor => {
            input.honorific = optional_text(data, "honorific", Some(100), &mut errors);
            input.middle_initial = optional_text(data, "middle_initial", Some(1), &mut errors);
            input.description = optional_text(data, "description", None, &mut errors);
        }
        PersonKind::Guest => {
            input.description = optional_text(data, "description", None, &mut errors);
        }
        PersonKind::Arranger => {}
    }

    errors.into_result(input)
}
