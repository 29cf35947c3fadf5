//! Genres and publishers.

use axum::async_trait;

use super::crud::CrudResource;
use super::html::{link, text_or_dash};
use crate::domain::{
    DomainError, FieldErrors, Genre, GenreInput, Page, Publisher, PublisherInput,
};
use crate::forms::widgets::Field;
use crate::forms::{FormData, catalog};
use crate::infrastructure::AppState;
use crate::utils::html::escape;

pub struct GenreResource;

#[async_trait]
impl CrudResource for GenreResource {
    type Item = Genre;
    type Input = GenreInput;
    type Choices = ();

    fn verbose_name(&self) -> &'static str {
        "Genre"
    }

    fn verbose_name_plural(&self) -> &'static str {
        "Genres"
    }

    fn url_segment(&self) -> &'static str {
        "genres"
    }

    fn id(&self, item: &Genre) -> i32 {
        item.id
    }

    fn label(&self, item: &Genre) -> String {
        item.name.clone()
    }

    fn list_columns(&self) -> &'static [&'static str] {
        &["Name"]
    }

    fn list_cells(&self, item: &Genre) -> Vec<String> {
        vec![escape(&item.name)]
    }

    fn detail_rows(&self, item: &Genre) -> Vec<(&'static str, String)> {
        vec![("Name", escape(&item.name))]
    }

    async fn list_page(&self, app: &AppState, page: u64) -> Result<Page<Genre>, DomainError> {
        app.genre_repo.list_page(page).await
    }

    async fn find(&self, app: &AppState, id: i32) -> Result<Option<Genre>, DomainError> {
        app.genre_repo.find_by_id(id).await
    }

    async fn choices(&self, _app: &AppState, _data: &FormData) -> Result<(), DomainError> {
        Ok(())
    }

    fn fields(&self, _choices: &()) -> Vec<Field> {
        catalog::genre_fields()
    }

    fn initial(&self, item: &Genre) -> FormData {
        catalog::genre_initial(item)
    }

    fn clean(&self, data: &FormData, _choices: &()) -> Result<GenreInput, FieldErrors> {
        catalog::clean_genre(data)
    }

    async fn create(&self, app: &AppState, input: GenreInput) -> Result<Genre, DomainError> {
        app.genre_repo.create(input).await
    }

    async fn update(&self, app: &AppState, id: i32, input: GenreInput) -> Result<Genre, DomainError> {
        app.genre_repo.update(id, input).await
    }

    async fn delete(&self, app: &AppState, id: i32) -> Result<(), DomainError> {
        app.genre_repo.delete(id).await
    }
}

pub struct PublisherResource;

#[async_trait]
impl CrudResource for PublisherResource {
    type Item = Publisher;
    type Input = PublisherInput;
    type Choices = ();

    fn verbose_name(&self) -> &'static str {
        "Publisher"
    }

    fn verbose_name_plural(&self) -> &'static str {
        "Publishers"
    }

    fn url_segment(&self) -> &'static str {
        "publishers"
    }

    fn id(&self, item: &Publisher) -> i32 {
        item.id
    }

    fn label(&self, item: &Publisher) -> String {
        item.name.clone()
    }

    fn list_columns(&self) -> &'static [&'static str] {
        &["Name", "Website"]
    }

    fn list_cells(&self, item: &Publisher) -> Vec<String> {
        vec![escape(&item.name), text_or_dash(&item.website)]
    }

    fn detail_rows(&self, item: &Publisher) -> Vec<(&'static str, String)> {
        let website = if item.website.is_empty() {
            text_or_dash("")
        } else {
            link(&item.website, &item.website)
        };
        vec![("Name", escape(&item.name)), ("Website", website)]
    }

    async fn list_page(&self, app: &AppState, page: u64) -> Result<Page<Publisher>, DomainError> {
        app.publisher_repo.list_page(page).await
    }

    async fn find(&self, app: &AppState, id: i32) -> Result<Option<Publisher>, DomainError> {
        app.publisher_repo.find_by_id(id).await
    }

    async fn choices(&self, _app: &AppState, _data: &FormData) -> Result<(), DomainError> {
        Ok(())
    }

    fn fields(&self, _choices: &()) -> Vec<Field> {
        catalog::publisher_fields()
    }

    fn initial(&self, item: &Publisher) -> FormData {
        catalog::publisher_initial(item)
    }

    fn clean(&self, data: &FormData, _choices: &()) -> Result<PublisherInput, FieldErrors> {
        catalog::clean_publisher(data)
    }

    async fn create(
        &self,
        app: &AppState,
        input: PublisherInput,
    ) -> Result<Publisher, DomainError> {
        app.publisher_repo.create(input).await
    }

    async fn update(
        &self,
        app: &AppState,
        id: i32,
        input: PublisherInput,
    ) -> Result<Publisher, DomainError> {
        app.publisher_repo.update(id, input).await
    }

    async fn delete(&self, app: &AppState, id: i32) -> Result<(), DomainError> {
        app.publisher_repo.delete(id).await
    }
}
