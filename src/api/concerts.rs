//! Venues and concerts. Writes go through the concert service so poster
//! files follow their rows.

use axum::async_trait;

use super::crud::CrudResource;
use super::html::{link, name_list, text_or_dash};
use crate::domain::{Concert, DomainError, FieldErrors, Page, Venue, VenueInput};
use crate::forms::concerts::{self, CleanedConcert, ConcertChoices};
use crate::forms::widgets::Field;
use crate::forms::FormData;
use crate::infrastructure::AppState;
use crate::services::concert_service;
use crate::utils::html::escape;

pub struct VenueResource;

#[async_trait]
impl CrudResource for VenueResource {
    type Item = Venue;
    type Input = VenueInput;
    type Choices = ();

    fn verbose_name(&self) -> &'static str {
        "Venue"
    }

    fn verbose_name_plural(&self) -> &'static str {
        "Venues"
    }

    fn url_segment(&self) -> &'static str {
        "venues"
    }

    fn id(&self, item: &Venue) -> i32 {
        item.id
    }

    fn label(&self, item: &Venue) -> String {
        item.name.clone()
    }

    fn list_columns(&self) -> &'static [&'static str] {
        &["Name", "Location", "Phone"]
    }

    fn list_cells(&self, item: &Venue) -> Vec<String> {
        vec![
            escape(&item.name),
            text_or_dash(&item.locality()),
            text_or_dash(&item.phone),
        ]
    }

    fn detail_rows(&self, item: &Venue) -> Vec<(&'static str, String)> {
        let website = if item.website.is_empty() {
            text_or_dash("")
        } else {
            link(&item.website, &item.website)
        };
        vec![
            ("Name", escape(&item.name)),
            ("Contact name", text_or_dash(&item.contact_name)),
            ("Address", text_or_dash(&item.address)),
            ("City", text_or_dash(&item.locality())),
            ("Phone", text_or_dash(&item.phone)),
            ("Website", website),
            ("Notes", text_or_dash(&item.notes)),
        ]
    }

    async fn list_page(&self, app: &AppState, page: u64) -> Result<Page<Venue>, DomainError> {
        app.venue_repo.list_page(page).await
    }

    async fn find(&self, app: &AppState, id: i32) -> Result<Option<Venue>, DomainError> {
        app.venue_repo.find_by_id(id).await
    }

    async fn choices(&self, _app: &AppState, _data: &FormData) -> Result<(), DomainError> {
        Ok(())
    }

    fn fields(&self, _choices: &()) -> Vec<Field> {
        concerts::venue_fields()
    }

    fn initial(&self, item: &Venue) -> FormData {
        concerts::venue_initial(item)
    }

    fn clean(&self, data: &FormData, _choices: &()) -> Result<VenueInput, FieldErrors> {
        concerts::clean_venue(data)
    }

    async fn create(&self, app: &AppState, input: VenueInput) -> Result<Venue, DomainError> {
        app.venue_repo.create(input).await
    }

    async fn update(&self, app: &AppState, id: i32, input: VenueInput) -> Result<Venue, DomainError> {
        app.venue_repo.update(id, input).await
    }

    async fn delete(&self, app: &AppState, id: i32) -> Result<(), DomainError> {
        concert_service::delete_venue(app, id).await
    }
}

pub struct ConcertResource;

#[async_trait]
impl CrudResource for ConcertResource {
    type Item = Concert;
    type Input = CleanedConcert;
    type Choices = ConcertChoices;

    fn verbose_name(&self) -> &'static str {
        "Concert"
    }

    fn verbose_name_plural(&self) -> &'static str {
        "Concerts"
    }

    fn url_segment(&self) -> &'static str {
        "concerts"
    }

    fn id(&self, item: &Concert) -> i32 {
        item.id
    }

    fn label(&self, item: &Concert) -> String {
        item.name.clone()
    }

    fn list_columns(&self) -> &'static [&'static str] {
        &["Name", "Date", "Time", "Venue"]
    }

    fn list_cells(&self, item: &Concert) -> Vec<String> {
        vec![
            escape(&item.name),
            item.date.format("%B %-d, %Y").to_string(),
            item.time.format("%-I:%M %p").to_string(),
            escape(&item.venue_name),
        ]
    }

    fn detail_rows(&self, item: &Concert) -> Vec<(&'static str, String)> {
        let names = |people: &[crate::domain::Person]| -> Vec<String> {
            people.iter().map(|p| p.full_name()).collect()
        };
        let poster = match item.poster_url() {
            Some(url) => format!(
                r#"<img src="{}" alt="Poster for {}" class="max-h-96 rounded shadow">"#,
                escape(&url),
                escape(&item.name)
            ),
            None => text_or_dash(""),
        };
        vec![
            ("Name", escape(&item.name)),
            ("Date", item.date.format("%B %-d, %Y").to_string()),
            ("Time", item.time.format("%-I:%M %p").to_string()),
            (
                "Venue",
                link(&format!("/venues/{}/", item.venue_id), &item.venue_name),
            ),
            ("Conductors", name_list(&names(&item.conductors))),
            ("Guests", name_list(&names(&item.guests))),
            ("Description", text_or_dash(&item.description)),
            ("Poster", poster),
        ]
    }

    fn multipart(&self) -> bool {
        true
    }

    async fn list_page(&self, app: &AppState, page: u64) -> Result<Page<Concert>, DomainError> {
        app.concert_repo.list_page(page).await
    }

    async fn find(&self, app: &AppState, id: i32) -> Result<Option<Concert>, DomainError> {
        app.concert_repo.find_by_id(id).await
    }

    async fn choices(
        &self,
        app: &AppState,
        _data: &FormData,
    ) -> Result<ConcertChoices, DomainError> {
        Ok(ConcertChoices {
            venues: app.venue_repo.find_all().await?,
            conductors: app.conductor_repo.find_all().await?,
            guests: app.guest_repo.find_all().await?,
        })
    }

    fn fields(&self, choices: &ConcertChoices) -> Vec<Field> {
        concerts::concert_fields(choices)
    }

    fn initial(&self, item: &Concert) -> FormData {
        concerts::concert_initial(item)
    }

    fn clean(
        &self,
        data: &FormData,
        choices: &ConcertChoices,
    ) -> Result<CleanedConcert, FieldErrors> {
        concerts::clean_concert(data, choices)
    }

    async fn create(&self, app: &AppState, input: CleanedConcert) -> Result<Concert, DomainError> {
        concert_service::create_concert(app, input).await
    }

    async fn update(
        &self,
        app: &AppState,
        id: i32,
        input: CleanedConcert,
    ) -> Result<Concert, DomainError> {
        concert_service::update_concert(app, id, input).await
    }

    async fn delete(&self, app: &AppState, id: i32) -> Result<(), DomainError> {
        concert_service::delete_concert(app, id).await
    }
}
