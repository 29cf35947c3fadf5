use super::FormData;
use super::fields::{optional_email, optional_text, optional_url, required_text};
use super::widgets::{Field, Widget};
use crate::domain::{FieldErrors, Organization, OrganizationInput};

pub fn fields() -> Vec<Field> {
    vec![
        Field::new("name", "Name", Widget::text(100)).required(),
        Field::new("contact_name", "Contact name", Widget::text(100)),
        Field::new("contact_email", "Contact email", Widget::Email),
        Field::new("contact_phone", "Contact phone", Widget::text(100)),
        Field::new("website", "Website", Widget::Url),
        Field::new("notes", "Notes", Widget::TextArea),
    ]
}

pub fn initial(organization: &Organization) -> FormData {
    FormData::new()
        .with("name", organization.name.clone())
        .with("contact_name", organization.contact_name.clone())
        .with("contact_email", organization.contact_email.clone())
        .with("contact_phone", organization.contact_phone.clone())
        .with("website", organization.website.clone())
        .with("notes", organization.notes.clone())
}

pub fn clean(data: &FormData) -> Result<OrganizationInput, FieldErrors> {
    let mut errors = FieldErrors::new();
    let input = OrganizationInput {
        name: required_text(data, "name", 100, &mut errors),
        contact_name: optional_text(data, "contact_name", Some(100), &mut errors),
        contact_email: optional_email(data, "contact_email", &mut errors),
        contact_phone: optional_text(data, "contact_phone", Some(100), &mut errors),
        website: optional_url(data, "website", &mut errors),
        notes: optional_text(data, "notes", None, &mut errors),
    };
    errors.into_result(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_checked_when_present() {
        let data = FormData::new()
            .with("name", "County Library")
            .with("contact_email", "nobody");
        assert!(clean(&data).unwrap_err().has("contact_email"));

        let data = FormData::new().with("name", "County Library");
        assert_eq!(clean(&data).unwrap().contact_email, "");
    }
}
