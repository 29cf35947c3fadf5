//! Rental, loaning and borrowing organizations.

use axum::async_trait;

use super::crud::CrudResource;
use super::html::{link, text_or_dash};
use crate::domain::{
    DomainError, FieldErrors, Organization, OrganizationInput, OrganizationKind, Page,
};
use crate::forms::widgets::Field;
use crate::forms::{FormData, organizations};
use crate::infrastructure::AppState;
use crate::utils::html::escape;

pub struct OrganizationResource {
    kind: OrganizationKind,
}

impl OrganizationResource {
    pub fn new(kind: OrganizationKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl CrudResource for OrganizationResource {
    type Item = Organization;
    type Input = OrganizationInput;
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

    fn id(&self, item: &Organization) -> i32 {
        item.id
    }

    fn label(&self, item: &Organization) -> String {
        item.name.clone()
    }

    fn list_columns(&self) -> &'static [&'static str] {
        &["Name", "Contact", "Phone"]
    }

    fn list_cells(&self, item: &Organization) -> Vec<String> {
        vec![
            escape(&item.name),
            text_or_dash(&item.contact_name),
            text_or_dash(&item.contact_phone),
        ]
    }

    fn detail_rows(&self, item: &Organization) -> Vec<(&'static str, String)> {
        let email = if item.contact_email.is_empty() {
            text_or_dash("")
        } else {
            link(&format!("mailto:{}", item.contact_email), &item.contact_email)
        };
        let website = if item.website.is_empty() {
            text_or_dash("")
        } else {
            link(&item.website, &item.website)
        };
        vec![
            ("Name", escape(&item.name)),
            ("Contact name", text_or_dash(&item.contact_name)),
            ("Contact email", email),
            ("Contact phone", text_or_dash(&item.contact_phone)),
            ("Website", website),
            ("Notes", text_or_dash(&item.notes)),
        ]
    }

    async fn list_page(
        &self,
        app: &AppState,
        page: u64,
    ) -> Result<Page<Organization>, DomainError> {
        app.organizations(self.kind).list_page(page).await
    }

    async fn find(&self, app: &AppState, id: i32) -> Result<Option<Organization>, DomainError> {
        app.organizations(self.kind).find_by_id(id).await
    }

    async fn choices(&self, _app: &AppState, _data: &FormData) -> Result<(), DomainError> {
        Ok(())
    }

    fn fields(&self, _choices: &()) -> Vec<Field> {
        organizations::fields()
    }

    fn initial(&self, item: &Organization) -> FormData {
        organizations::initial(item)
    }

    fn clean(&self, data: &FormData, _choices: &()) -> Result<OrganizationInput, FieldErrors> {
        organizations::clean(data)
    }

    async fn create(
        &self,
        app: &AppState,
        input: OrganizationInput,
    ) -> Result<Organization, DomainError> {
        app.organizations(self.kind).create(input).await
    }

    async fn update(
        &self,
        app: &AppState,
        id: i32,
        input: OrganizationInput,
    ) -> Result<Organization, DomainError> {
        app.organizations(self.kind).update(id, input).await
    }

    async fn delete(&self, app: &AppState, id: i32) -> Result<(), DomainError> {
        app.organizations(self.kind).delete(id).await
    }
}
