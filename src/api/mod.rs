//! HTTP layer: HTML pages for every entity family, the composer picker
//! fragments and a JSON health check.

pub mod catalog;
pub mod composer_picker;
pub mod concerts;
pub mod crud;
pub mod error;
pub mod html;
pub mod organizations;
pub mod people;
pub mod pieces;

use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::domain::{OrganizationKind, PersonKind};
use crate::infrastructure::AppState;

pub fn router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(index))
        .route("/health", get(health_check));

    for kind in PersonKind::ALL {
        router = router.merge(crud::routes(state.clone(), people::PeopleResource::new(kind)));
    }
    for kind in OrganizationKind::ALL {
        router = router.merge(crud::routes(
            state.clone(),
            organizations::OrganizationResource::new(kind),
        ));
    }

    router
        .merge(crud::routes(state.clone(), catalog::GenreResource))
        .merge(crud::routes(state.clone(), catalog::PublisherResource))
        .merge(crud::routes(state.clone(), pieces::PieceResource))
        .merge(crud::routes(state.clone(), concerts::VenueResource))
        .merge(crud::routes(state.clone(), concerts::ConcertResource))
        .merge(composer_picker::routes(state))
}

pub async fn index() -> Html<String> {
    let mut sections: Vec<(&str, Vec<(&str, String)>)> = vec![(
        "People",
        PersonKind::ALL
            .iter()
            .map(|k| (k.verbose_name_plural(), format!("/{}/", k.url_segment())))
            .collect(),
    )];
    sections.push((
        "Organizations",
        OrganizationKind::ALL
            .iter()
            .map(|k| (k.verbose_name_plural(), format!("/{}/", k.url_segment())))
            .collect(),
    ));
    sections.push((
        "Library",
        vec![
            ("Pieces", "/pieces/".to_string()),
            ("Genres", "/genres/".to_string()),
            ("Publishers", "/publishers/".to_string()),
        ],
    ));
    sections.push((
        "Performances",
        vec![
            ("Concerts", "/concerts/".to_string()),
            ("Venues", "/venues/".to_string()),
        ],
    ));

    let cards: String = sections
        .iter()
        .map(|(title, links)| {
            let items: String = links
                .iter()
                .map(|(label, href)| format!("<li>{}</li>", html::link(href, label)))
                .collect();
            format!(
                r#"<section class="rounded-md bg-white p-4 shadow"><h2 class="mb-2 font-semibold text-gray-800">{}</h2><ul class="space-y-1">{}</ul></section>"#,
                title, items
            )
        })
        .collect();
    html::page(
        "Orchestra Records",
        &format!(r#"<div class="grid gap-4 sm:grid-cols-2">{}</div>"#, cards),
    )
}

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "orchestra-records",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
