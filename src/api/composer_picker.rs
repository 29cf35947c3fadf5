//! HTMX composer picker.
//!
//! Fragments share three swap targets: `#selected-composers` (the hidden
//! `selected_ids` inputs plus remove buttons), `#composer-results` (search
//! hits with add buttons) and `#modal-container` (the create dialog). The
//! selection lives only in those hidden inputs.

use axum::extract::{RawQuery, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;

use crate::domain::{DomainError, FieldErrors, PersonKind};
use crate::forms::selection::{SELECTED_IDS, parse_selected_ids};
use crate::forms::widgets::render_fields;
use crate::forms::{FormData, people};
use crate::infrastructure::AppState;
use crate::services::composer_picker::{self, PickerState};
use crate::utils::html::escape;

pub const SEARCH_FIELD: &str = "composer_search";

pub fn routes(app: AppState) -> Router {
    Router::new()
        .route("/composer-picker/search/", post(search))
        .route("/composer-picker/add/", post(add))
        .route("/composer-picker/remove/", post(remove))
        .route("/composer-picker/create/", get(create_modal))
        .route("/composer-picker/save/", post(save))
        .with_state(app)
}

fn oob_attr(oob: bool) -> &'static str {
    if oob { r#" hx-swap-oob="true""# } else { "" }
}

fn hidden_selection(ids: &[i32]) -> String {
    ids.iter()
        .map(|id| format!(r#"<input type="hidden" name="{}" value="{}">"#, SELECTED_IDS, id))
        .collect()
}

/// A picker button posting `composer_id` along with the whole picker.
fn action_button(action: &str, composer_id: i32, label: &str, class: &str) -> String {
    format!(
        r##"<button type="button" hx-post="/composer-picker/{action}/" hx-vals='{{"composer_id": "{id}"}}' hx-include="#composer-picker" hx-swap="none" class="{class}">{label}</button>"##,
        action = action,
        id = composer_id,
        class = class,
        label = label,
    )
}

pub fn render_selected(state: &PickerState, oob: bool) -> String {
    let items: String = state
        .selected
        .iter()
        .map(|c| {
            format!(
                r#"<li class="flex items-center justify-between py-1"><span>{}</span>{}</li>"#,
                escape(&c.display_name()),
                action_button("remove", c.id, "Remove", "text-sm text-red-600 hover:underline"),
            )
        })
        .collect();
    let list = if items.is_empty() {
        r#"<p class="text-sm text-gray-500">No composers selected.</p>"#.to_string()
    } else {
        format!(r#"<ul class="divide-y">{}</ul>"#, items)
    };
    format!(
        r#"<div id="selected-composers"{oob}>{hidden}{list}</div>"#,
        oob = oob_attr(oob),
        hidden = hidden_selection(&state.selected_ids()),
        list = list,
    )
}

pub fn render_results(state: &PickerState, oob: bool) -> String {
    let items: String = state
        .results
        .iter()
        .map(|c| {
            format!(
                r#"<li class="flex items-center justify-between py-1"><span>{}</span>{}</li>"#,
                escape(&c.display_name()),
                action_button("add", c.id, "Add", "text-sm text-indigo-600 hover:underline"),
            )
        })
        .collect();
    let list = if items.is_empty() {
        r#"<p class="text-sm text-gray-500">No composers found.</p>"#.to_string()
    } else {
        format!(r#"<ul class="divide-y">{}</ul>"#, items)
    };
    format!(
        r#"<div id="composer-results" class="mt-2 max-h-64 overflow-y-auto"{oob}>{list}</div>"#,
        oob = oob_attr(oob),
        list = list,
    )
}

/// The complete widget embedded in the piece form.
pub fn render_picker(state: &PickerState) -> String {
    format!(
        r##"<div id="composer-picker" class="rounded-md border border-gray-300 p-3">
{selected}
<div class="mt-3 flex gap-2">
<input type="search" name="{search}" value="{query}" placeholder="Search composers" autocomplete="off" hx-post="/composer-picker/search/" hx-trigger="input changed delay:300ms, search" hx-target="#composer-results" hx-swap="outerHTML" hx-include="#composer-picker" class="block w-full rounded-md border-gray-300 shadow-sm focus:border-indigo-500 focus:ring-indigo-500 sm:text-sm">
<button type="button" hx-get="/composer-picker/create/" hx-include="#composer-picker" hx-target="#modal-container" hx-swap="outerHTML" class="whitespace-nowrap rounded-md bg-gray-100 px-3 py-2 text-sm hover:bg-gray-200">New composer</button>
</div>
{results}
</div>"##,
        selected = render_selected(state, false),
        search = SEARCH_FIELD,
        query = escape(&state.query),
        results = render_results(state, false),
    )
}

/// The create dialog, carrying the selection and query it was opened with.
pub fn render_modal(data: &FormData, errors: &FieldErrors, selected: &[i32], query: &str) -> String {
    format!(
        r##"<div id="modal-container">
<div class="fixed inset-0 z-10 flex items-center justify-center bg-black/40">
<form hx-post="/composer-picker/save/" hx-target="#modal-container" hx-swap="outerHTML" class="w-full max-w-lg rounded-md bg-white p-6 shadow-lg">
<h2 class="mb-4 text-lg font-semibold">New composer</h2>
{hidden}<input type="hidden" name="{search}" value="{query}">
{fields}
<div class="flex gap-3">
<button type="submit" class="rounded-md bg-indigo-600 px-4 py-2 text-sm font-medium text-white hover:bg-indigo-700">Save</button>
<button type="button" onclick="document.getElementById('modal-container').innerHTML = ''" class="px-4 py-2 text-sm text-gray-600 hover:underline">Cancel</button>
</div>
</form>
</div>
</div>"##,
        hidden = hidden_selection(selected),
        search = SEARCH_FIELD,
        query = escape(query),
        fields = render_fields(&people::fields(PersonKind::Composer), data, errors),
    )
}

/// Both list fragments, swapped out of band.
fn refreshed(state: &PickerState) -> String {
    format!("{}{}", render_selected(state, true), render_results(state, true))
}

/// Missing or non-integer ids cannot name a composer.
fn composer_id(data: &FormData) -> Option<i32> {
    data.get("composer_id").and_then(|v| v.trim().parse().ok())
}

pub async fn search(
    State(app): State<AppState>,
    data: FormData,
) -> Result<Html<String>, DomainError> {
    let selected = parse_selected_ids(&data, SELECTED_IDS);
    let state =
        composer_picker::refresh(app.composer_repo.as_ref(), &selected, &data.text(SEARCH_FIELD))
            .await?;
    Ok(Html(render_results(&state, false)))
}

pub async fn add(
    State(app): State<AppState>,
    data: FormData,
) -> Result<Html<String>, DomainError> {
    let id = composer_id(&data).ok_or(DomainError::NotFound)?;
    let selected = parse_selected_ids(&data, SELECTED_IDS);
    let state = composer_picker::add(
        app.composer_repo.as_ref(),
        &selected,
        id,
        &data.text(SEARCH_FIELD),
    )
    .await?;
    Ok(Html(refreshed(&state)))
}

pub async fn remove(
    State(app): State<AppState>,
    data: FormData,
) -> Result<Html<String>, DomainError> {
    let selected = parse_selected_ids(&data, SELECTED_IDS);
    let query = data.text(SEARCH_FIELD);
    let repo = app.composer_repo.as_ref();
    // Nothing to drop without a usable id; the lists are still refreshed
    let state = match composer_id(&data) {
        Some(id) => composer_picker::remove(repo, &selected, id, &query).await?,
        None => composer_picker::refresh(repo, &selected, &query).await?,
    };
    Ok(Html(refreshed(&state)))
}

pub async fn create_modal(RawQuery(query): RawQuery) -> Html<String> {
    let data = FormData::from_query(query.as_deref());
    Html(render_modal(
        &FormData::new(),
        &FieldErrors::new(),
        &parse_selected_ids(&data, SELECTED_IDS),
        &data.text(SEARCH_FIELD),
    ))
}

pub async fn save(
    State(app): State<AppState>,
    data: FormData,
) -> Result<Html<String>, DomainError> {
    let selected = parse_selected_ids(&data, SELECTED_IDS);
    let query = data.text(SEARCH_FIELD);

    match people::clean(PersonKind::Composer, &data) {
        Ok(input) => {
            let (composer, state) =
                composer_picker::save_new(app.composer_repo.as_ref(), &selected, input, &query)
                    .await?;
            tracing::info!("Created composer #{} from the picker", composer.id);
            Ok(Html(format!(
                r#"<div id="modal-container"></div>{}"#,
                refreshed(&state)
            )))
        }
        Err(errors) => Ok(Html(render_modal(&data, &errors, &selected, &query))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Person;

    fn composer(id: i32, first: &str, last: &str) -> Person {
        Person {
            id,
            kind: PersonKind::Composer,
            first_name: Some(first.into()),
            last_name: last.into(),
            instrument: String::new(),
            birth_year: None,
            honorific: String::new(),
            middle_initial: String::new(),
            description: String::new(),
        }
    }

    #[test]
    fn selected_fragment_carries_hidden_ids() {
        let state = PickerState {
            selected: vec![composer(3, "Gustav", "Mahler"), composer(7, "Yo-Yo", "Ma")],
            results: vec![],
            query: String::new(),
        };
        let html = render_selected(&state, true);
        assert!(html.starts_with(r#"<div id="selected-composers" hx-swap-oob="true">"#));
        assert!(html.contains(r#"name="selected_ids" value="3""#));
        assert!(html.contains(r#"name="selected_ids" value="7""#));
        assert!(html.contains("Mahler, Gustav"));
    }

    #[test]
    fn empty_results_say_so() {
        let state = PickerState {
            selected: vec![],
            results: vec![],
            query: "zzz".into(),
        };
        assert!(render_results(&state, false).contains("No composers found."));
        assert!(render_picker(&state).contains(r#"value="zzz""#));
    }

    #[test]
    fn composer_id_must_be_an_integer() {
        let data = FormData::new().with("composer_id", "abc");
        assert_eq!(composer_id(&data), None);
        assert_eq!(composer_id(&FormData::new()), None);
        let data = FormData::new().with("composer_id", " 12 ");
        assert_eq!(composer_id(&data), Some(12));
    }
}
