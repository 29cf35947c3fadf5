//! Pieces, with the composer picker standing in for the composers field.

use axum::async_trait;

use super::composer_picker::{SEARCH_FIELD, render_picker};
use super::crud::CrudResource;
use super::html::{link, name_list, text_or_dash};
use crate::domain::piece::format_cents;
use crate::domain::{
    DomainError, FieldErrors, OrganizationKind, Page, Person, Piece, PieceInput,
};
use crate::forms::piece::{self, PieceChoices};
use crate::forms::selection::{SELECTED_IDS, parse_selected_ids};
use crate::forms::widgets::Field;
use crate::forms::FormData;
use crate::infrastructure::AppState;
use crate::services::composer_picker::{self, PickerState};
use crate::utils::html::escape;

pub struct PieceResource;

pub struct PieceFormChoices {
    choices: PieceChoices,
    picker: PickerState,
}

fn people_links(people: &[Person]) -> String {
    if people.is_empty() {
        return name_list(&[]);
    }
    people
        .iter()
        .map(|p| link(&p.absolute_url(), &p.full_name()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn date_or_dash(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| text_or_dash(""))
}

fn relationship_summary(item: &Piece) -> String {
    let Some(rel) = &item.relationship else {
        return text_or_dash("");
    };
    let organization = item
        .relationship_organization
        .clone()
        .unwrap_or_else(|| rel.organization().to_string());
    let mut html = format!(
        "{}: {}",
        escape(rel.relationship_type().label()),
        escape(&organization)
    );
    match (rel.start_date(), rel.end_date()) {
        (Some(start), Some(end)) => html.push_str(&format!(" ({} to {})", start, end)),
        (Some(start), None) => html.push_str(&format!(" (from {})", start)),
        (None, Some(end)) => html.push_str(&format!(" (until {})", end)),
        (None, None) => {}
    }
    if let Some(cents) = rel.rental_cost_cents() {
        html.push_str(&format!(", cost ${}", format_cents(cents)));
    }
    html
}

#[async_trait]
impl CrudResource for PieceResource {
    type Item = Piece;
    type Input = PieceInput;
    type Choices = PieceFormChoices;

    fn verbose_name(&self) -> &'static str {
        "Piece"
    }

    fn verbose_name_plural(&self) -> &'static str {
        "Pieces"
    }

    fn url_segment(&self) -> &'static str {
        "pieces"
    }

    fn id(&self, item: &Piece) -> i32 {
        item.id
    }

    fn label(&self, item: &Piece) -> String {
        item.title.clone()
    }

    fn list_columns(&self) -> &'static [&'static str] {
        &["Title", "Composers", "Status"]
    }

    fn list_cells(&self, item: &Piece) -> Vec<String> {
        vec![
            escape(&item.title),
            text_or_dash(&item.composer_names()),
            text_or_dash(item.status.map(|s| s.label()).unwrap_or_default()),
        ]
    }

    fn detail_rows(&self, item: &Piece) -> Vec<(&'static str, String)> {
        let genres: Vec<String> = item.genres.iter().map(|g| g.name.clone()).collect();
        let publisher = item
            .publisher
            .as_ref()
            .map(|p| link(&p.absolute_url(), &p.name))
            .unwrap_or_else(|| text_or_dash(""));
        vec![
            ("Title", escape(&item.title)),
            ("Composers", people_links(&item.composers)),
            ("Arrangers", people_links(&item.arrangers)),
            ("Genres", name_list(&genres)),
            ("Publisher", publisher),
            (
                "Difficulty",
                text_or_dash(item.difficulty.map(|d| d.label()).unwrap_or_default()),
            ),
            (
                "Status",
                text_or_dash(item.status.map(|s| s.label()).unwrap_or_default()),
            ),
            ("Relationship", relationship_summary(item)),
            ("Location drawer", text_or_dash(&item.location_drawer)),
            ("Location number", text_or_dash(&item.location_number)),
            ("Copyright date", date_or_dash(item.copyright_date)),
            ("Purchase date", date_or_dash(item.purchase_date)),
            ("Notes", text_or_dash(&item.notes)),
            ("Created", escape(&item.created_at)),
            ("Updated", escape(&item.updated_at)),
        ]
    }

    async fn list_page(&self, app: &AppState, page: u64) -> Result<Page<Piece>, DomainError> {
        app.piece_repo.list_page(page).await
    }

    async fn find(&self, app: &AppState, id: i32) -> Result<Option<Piece>, DomainError> {
        app.piece_repo.find_by_id(id).await
    }

    /// Lookup rows, plus the picker state for the selection carried by
    /// `data`. An empty selection lists the first composers by name.
    async fn choices(
        &self,
        app: &AppState,
        data: &FormData,
    ) -> Result<PieceFormChoices, DomainError> {
        let mut organizations = Vec::new();
        for kind in OrganizationKind::ALL {
            organizations.extend(app.organizations(kind).find_all().await?);
        }
        let picker = composer_picker::refresh(
            app.composer_repo.as_ref(),
            &parse_selected_ids(data, SELECTED_IDS),
            &data.text(SEARCH_FIELD),
        )
        .await?;

        Ok(PieceFormChoices {
            choices: PieceChoices {
                composers: app.composer_repo.find_all().await?,
                arrangers: app.arranger_repo.find_all().await?,
                genres: app.genre_repo.find_all().await?,
                publishers: app.publisher_repo.find_all().await?,
                organizations,
            },
            picker,
        })
    }

    fn fields(&self, choices: &PieceFormChoices) -> Vec<Field> {
        piece::fields(&choices.choices, render_picker(&choices.picker))
    }

    fn blank(&self) -> FormData {
        piece::new_initial()
    }

    fn initial(&self, item: &Piece) -> FormData {
        piece::initial(item)
    }

    fn clean(
        &self,
        data: &FormData,
        choices: &PieceFormChoices,
    ) -> Result<PieceInput, FieldErrors> {
        piece::clean(data, &choices.choices)
    }

    async fn create(&self, app: &AppState, input: PieceInput) -> Result<Piece, DomainError> {
        app.piece_repo.create(input).await
    }

    async fn update(&self, app: &AppState, id: i32, input: PieceInput) -> Result<Piece, DomainError> {
        app.piece_repo.update(id, input).await
    }

    async fn delete(&self, app: &AppState, id: i32) -> Result<(), DomainError> {
        app.piece_repo.delete(id).await
    }
}
