//! Composers, arrangers, conductors and guests.

use axum::async_trait;

use super::crud::CrudResource;
use super::html::text_or_dash;
use crate::domain::{DomainError, FieldErrors, Page, Person, PersonInput, PersonKind};
use crate::forms::widgets::Field;
use crate::forms::{FormData, people};
use crate::infrastructure::AppState;
use crate::utils::html::escape;

pub struct PeopleResource {
    kind: PersonKind,
}

impl PeopleResource {
    pub fn new(kind: PersonKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl CrudResource for PeopleResource {
    type Item = Person;
    type Input = PersonInput;
    type Choices = ();

    fn verbose_name(&self) -> &'static str {
        self.kind.verbose_name()
    }

    fn verbose_name_plural(&self) -> &'static str {
        self.kind.verbose_name_plural()
    }

    fn url_segment(&self) -> &'static str {
        self.kind.url_segment()
    }

    fn id(&self, item: &Person) -> i32 {
        item.id
    }

    fn label(&self, item: &Person) -> String {
        item.full_name()
    }

    fn list_columns(&self) -> &'static [&'static str] {
        &["Name", "Instrument"]
    }

    fn list_cells(&self, item: &Person) -> Vec<String> {
        vec![escape(&item.display_name()), text_or_dash(&item.instrument)]
    }

    fn detail_rows(&self, item: &Person) -> Vec<(&'static str, String)> {
        let mut rows = Vec::new();
        if self.kind == PersonKind::Conductor {
            rows.push(("Honorific", text_or_dash(&item.honorific)));
        }
        rows.push((
            "First name",
            text_or_dash(item.first_name.as_deref().unwrap_or_default()),
        ));
        if self.kind == PersonKind::Conductor {
            rows.push(("Middle initial", text_or_dash(&item.middle_initial)));
        }
        rows.push(("Last name", escape(&item.last_name)));
        rows.push(("Instrument", text_or_dash(&item.instrument)));
        match self.kind {
            PersonKind::Composer => rows.push((
                "Birth year",
                item.birth_year
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| text_or_dash("")),
            )),
            PersonKind::Conductor | PersonKind::Guest => {
                rows.push(("Description", text_or_dash(&item.description)));
            }
            PersonKind::Arranger => {}
        }
        rows
    }

    async fn list_page(&self, app: &AppState, page: u64) -> Result<Page<Person>, DomainError> {
        app.people(self.kind).list_page(page).await
    }

    async fn find(&self, app: &AppState, id: i32) -> Result<Option<Person>, DomainError> {
        app.people(self.kind).find_by_id(id).await
    }

    async fn choices(&self, _app: &AppState, _data: &FormData) -> Result<(), DomainError> {
        Ok(())
    }

    fn fields(&self, _choices: &()) -> Vec<Field> {
        people::fields(self.kind)
    }

    fn initial(&self, item: &Person) -> FormData {
        people::initial(item)
    }

    fn clean(&self, data: &FormData, _choices: &()) -> Result<PersonInput, FieldErrors> {
        people::clean(self.kind, data)
    }

    async fn create(&self, app: &AppState, input: PersonInput) -> Result<Person, DomainError> {
        app.people(self.kind).create(input).await
    }

    async fn update(
        &self,
        app: &AppState,
        id: i32,
        input: PersonInput,
    ) -> Result<Person, DomainError> {
        app.people(self.kind).update(id, input).await
    }

    async fn delete(&self, app: &AppState, id: i32) -> Result<(), DomainError> {
        app.people(self.kind).delete(id).await
    }
}
