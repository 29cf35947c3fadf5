//! Generic list / detail / create / update / delete views.
//!
//! Every entity family implements [`CrudResource`]; [`routes`] mounts the five
//! standard pages for it under `/{url_segment}/`.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use super::html;
use crate::domain::{DomainError, FieldErrors, Page};
use crate::forms::FormData;
use crate::forms::widgets::{Field, render_fields};
use crate::infrastructure::AppState;
use crate::utils::html::escape;

/// What a family supplies to the generic views.
#[async_trait]
pub trait CrudResource: Send + Sync + 'static {
    type Item: Send + Sync;
    type Input: Send;
    /// Lookup rows a form needs (select options and the like)
    type Choices: Send + Sync;

    fn verbose_name(&self) -> &'static str;
    fn verbose_name_plural(&self) -> &'static str;
    /// First path segment, e.g. `composers`
    fn url_segment(&self) -> &'static str;

    fn id(&self, item: &Self::Item) -> i32;
    /// Human name of one row, used in titles and the delete confirmation
    fn label(&self, item: &Self::Item) -> String;

    fn list_columns(&self) -> &'static [&'static str];
    /// One escaped HTML cell per list column
    fn list_cells(&self, item: &Self::Item) -> Vec<String>;
    /// `(label, escaped HTML)` rows of the detail page
    fn detail_rows(&self, item: &Self::Item) -> Vec<(&'static str, String)>;

    /// Forms with file inputs are posted as multipart
    fn multipart(&self) -> bool {
        false
    }

    async fn list_page(&self, app: &AppState, page: u64) -> Result<Page<Self::Item>, DomainError>;
    async fn find(&self, app: &AppState, id: i32) -> Result<Option<Self::Item>, DomainError>;

    /// `data` is the form being rendered or validated
    async fn choices(&self, app: &AppState, data: &FormData)
    -> Result<Self::Choices, DomainError>;
    fn fields(&self, choices: &Self::Choices) -> Vec<Field>;

    /// Values of an unbound create form
    fn blank(&self) -> FormData {
        FormData::new()
    }
    fn initial(&self, item: &Self::Item) -> FormData;
    fn clean(&self, data: &FormData, choices: &Self::Choices)
    -> Result<Self::Input, FieldErrors>;

    async fn create(&self, app: &AppState, input: Self::Input) -> Result<Self::Item, DomainError>;
    async fn update(
        &self,
        app: &AppState,
        id: i32,
        input: Self::Input,
    ) -> Result<Self::Item, DomainError>;
    async fn delete(&self, app: &AppState, id: i32) -> Result<(), DomainError>;
}

pub struct CrudContext<R> {
    pub app: AppState,
    pub resource: Arc<R>,
}

impl<R> Clone for CrudContext<R> {
    fn clone(&self) -> Self {
        Self {
            app: self.app.clone(),
            resource: self.resource.clone(),
        }
    }
}

pub fn list_url<R: CrudResource>(resource: &R) -> String {
    format!("/{}/", resource.url_segment())
}

pub fn routes<R: CrudResource>(app: AppState, resource: R) -> Router {
    let base = list_url(&resource);
    let ctx = CrudContext {
        app,
        resource: Arc::new(resource),
    };
    Router::new()
        .route(&base, get(list::<R>))
        .route(
            &format!("{}create/", base),
            get(create_form::<R>).post(create::<R>),
        )
        .route(&format!("{}:id/", base), get(detail::<R>))
        .route(
            &format!("{}:id/update/", base),
            get(update_form::<R>).post(update::<R>),
        )
        .route(
            &format!("{}:id/delete/", base),
            get(delete_confirm::<R>).post(delete::<R>),
        )
        .with_state(ctx)
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

/// 1-based page number; anything unparsable is a missing page.
fn page_number(params: &PageParams) -> Result<u64, DomainError> {
    match params.page.as_deref().map(str::trim) {
        None | Some("") => Ok(1),
        Some(raw) => raw.parse().map_err(|_| DomainError::NotFound),
    }
}

/// Path ids that are not integers cannot name a row.
fn parse_id(raw: &str) -> Result<i32, DomainError> {
    raw.parse().map_err(|_| DomainError::NotFound)
}

async fn find_or_404<R: CrudResource>(ctx: &CrudContext<R>, id: i32) -> Result<R::Item, DomainError> {
    ctx.resource
        .find(&ctx.app, id)
        .await?
        .ok_or(DomainError::NotFound)
}

pub async fn list<R: CrudResource>(
    State(ctx): State<CrudContext<R>>,
    Query(params): Query<PageParams>,
) -> Result<Html<String>, DomainError> {
    let r = &*ctx.resource;
    let page = r.list_page(&ctx.app, page_number(&params)?).await?;
    let base = list_url(r);

    let head: String = r
        .list_columns()
        .iter()
        .map(|c| format!(r#"<th class="px-4 py-2 text-left">{}</th>"#, c))
        .collect();
    let rows: String = page
        .items
        .iter()
        .map(|item| {
            let cells: String = r
                .list_cells(item)
                .into_iter()
                .enumerate()
                .map(|(i, cell)| {
                    // First column links to the detail page
                    let cell = if i == 0 {
                        format!(
                            r#"<a href="{}{}/" class="text-indigo-600 hover:underline">{}</a>"#,
                            base,
                            r.id(item),
                            cell
                        )
                    } else {
                        cell
                    };
                    format!(r#"<td class="px-4 py-2">{}</td>"#, cell)
                })
                .collect();
            format!(r#"<tr class="border-t">{}</tr>"#, cells)
        })
        .collect();
    let table = if page.items.is_empty() {
        format!(
            r#"<p class="text-gray-500">No {} yet.</p>"#,
            r.verbose_name_plural().to_lowercase()
        )
    } else {
        format!(
            r#"<table class="min-w-full rounded-md bg-white shadow"><thead class="bg-gray-100"><tr>{}</tr></thead><tbody>{}</tbody></table>"#,
            head, rows
        )
    };

    let content = format!(
        r#"<div class="mb-4">{}</div>{}{}"#,
        html::button_link(
            &format!("{}create/", base),
            &format!("Add {}", r.verbose_name().to_lowercase())
        ),
        table,
        html::pagination(&page, &base),
    );
    Ok(html::page(r.verbose_name_plural(), &content))
}

pub async fn detail<R: CrudResource>(
    State(ctx): State<CrudContext<R>>,
    Path(id): Path<String>,
) -> Result<Html<String>, DomainError> {
    let r = &*ctx.resource;
    let item = find_or_404(&ctx, parse_id(&id)?).await?;
    let base = list_url(r);

    let rows: String = r
        .detail_rows(&item)
        .into_iter()
        .map(|(label, value)| {
            format!(
                r#"<div class="py-2 sm:grid sm:grid-cols-3 sm:gap-4"><dt class="text-sm font-medium text-gray-500">{}</dt><dd class="text-sm text-gray-900 sm:col-span-2">{}</dd></div>"#,
                label, value
            )
        })
        .collect();
    let content = format!(
        r#"<dl class="mb-6 divide-y rounded-md bg-white px-4 shadow">{rows}</dl>
<div class="flex gap-3">{edit} {delete} <a href="{base}" class="px-4 py-2 text-sm text-gray-600 hover:underline">Back to list</a></div>"#,
        rows = rows,
        edit = html::button_link(&format!("{}{}/update/", base, r.id(&item)), "Edit"),
        delete = html::button_link(&format!("{}{}/delete/", base, r.id(&item)), "Delete"),
        base = base,
    );
    Ok(html::page(&r.label(&item), &content))
}

/// The entity form, filled from `data`, with `errors` shown inline.
fn form_page<R: CrudResource>(
    r: &R,
    title: &str,
    action: &str,
    fields: &[Field],
    data: &FormData,
    errors: &FieldErrors,
) -> Html<String> {
    let enctype = if r.multipart() {
        r#" enctype="multipart/form-data""#
    } else {
        ""
    };
    let content = format!(
        r#"<form method="post" action="{action}"{enctype} class="max-w-2xl rounded-md bg-white p-6 shadow">
{fields}
<div class="flex gap-3">
<button type="submit" class="rounded-md bg-indigo-600 px-4 py-2 text-sm font-medium text-white hover:bg-indigo-700">Save</button>
<a href="{cancel}" class="px-4 py-2 text-sm text-gray-600 hover:underline">Cancel</a>
</div>
</form>"#,
        action = action,
        enctype = enctype,
        fields = render_fields(fields, data, errors),
        cancel = list_url(r),
    );
    html::page(title, &content)
}

fn invalid_form<R: CrudResource>(
    r: &R,
    title: &str,
    action: &str,
    fields: &[Field],
    data: &FormData,
    errors: &FieldErrors,
) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        form_page(r, title, action, fields, data, errors),
    )
        .into_response()
}

pub async fn create_form<R: CrudResource>(
    State(ctx): State<CrudContext<R>>,
) -> Result<Html<String>, DomainError> {
    let r = &*ctx.resource;
    let data = r.blank();
    let choices = r.choices(&ctx.app, &data).await?;
    Ok(form_page(
        r,
        &format!("New {}", r.verbose_name().to_lowercase()),
        &format!("{}create/", list_url(r)),
        &r.fields(&choices),
        &data,
        &FieldErrors::new(),
    ))
}

pub async fn create<R: CrudResource>(
    State(ctx): State<CrudContext<R>>,
    data: FormData,
) -> Result<Response, DomainError> {
    let r = &*ctx.resource;
    let choices = r.choices(&ctx.app, &data).await?;
    let title = format!("New {}", r.verbose_name().to_lowercase());
    let action = format!("{}create/", list_url(r));

    let errors = match r.clean(&data, &choices) {
        Ok(input) => match r.create(&ctx.app, input).await {
            Ok(item) => {
                tracing::info!("Created {} #{}", r.verbose_name(), r.id(&item));
                return Ok(Redirect::to(&list_url(r)).into_response());
            }
            Err(DomainError::Validation(errors)) => errors,
            Err(e) => return Err(e),
        },
        Err(errors) => errors,
    };
    tracing::debug!("Rejected {} form: {}", r.verbose_name(), errors);
    Ok(invalid_form(r, &title, &action, &r.fields(&choices), &data, &errors))
}

pub async fn update_form<R: CrudResource>(
    State(ctx): State<CrudContext<R>>,
    Path(id): Path<String>,
) -> Result<Html<String>, DomainError> {
    let r = &*ctx.resource;
    let item = find_or_404(&ctx, parse_id(&id)?).await?;
    let data = r.initial(&item);
    let choices = r.choices(&ctx.app, &data).await?;
    Ok(form_page(
        r,
        &format!("Edit {}", r.label(&item)),
        &format!("{}{}/update/", list_url(r), r.id(&item)),
        &r.fields(&choices),
        &data,
        &FieldErrors::new(),
    ))
}

pub async fn update<R: CrudResource>(
    State(ctx): State<CrudContext<R>>,
    Path(id): Path<String>,
    data: FormData,
) -> Result<Response, DomainError> {
    let r = &*ctx.resource;
    let item = find_or_404(&ctx, parse_id(&id)?).await?;
    let id = r.id(&item);
    let choices = r.choices(&ctx.app, &data).await?;
    let title = format!("Edit {}", r.label(&item));
    let action = format!("{}{}/update/", list_url(r), id);

    let errors = match r.clean(&data, &choices) {
        Ok(input) => match r.update(&ctx.app, id, input).await {
            Ok(_) => {
                tracing::info!("Updated {} #{}", r.verbose_name(), id);
                return Ok(Redirect::to(&list_url(r)).into_response());
            }
            Err(DomainError::Validation(errors)) => errors,
            Err(e) => return Err(e),
        },
        Err(errors) => errors,
    };
    tracing::debug!("Rejected {} form: {}", r.verbose_name(), errors);
    Ok(invalid_form(r, &title, &action, &r.fields(&choices), &data, &errors))
}

pub async fn delete_confirm<R: CrudResource>(
    State(ctx): State<CrudContext<R>>,
    Path(id): Path<String>,
) -> Result<Html<String>, DomainError> {
    let r = &*ctx.resource;
    let item = find_or_404(&ctx, parse_id(&id)?).await?;
    let content = format!(
        r#"<form method="post" class="max-w-xl rounded-md bg-white p-6 shadow">
<p class="mb-6 text-gray-800">Are you sure you want to delete the {kind} "{label}"?</p>
<div class="flex gap-3">
<button type="submit" class="rounded-md bg-red-600 px-4 py-2 text-sm font-medium text-white hover:bg-red-700">Yes, delete</button>
<a href="{cancel}{id}/" class="px-4 py-2 text-sm text-gray-600 hover:underline">Cancel</a>
</div>
</form>"#,
        kind = r.verbose_name().to_lowercase(),
        label = escape(&r.label(&item)),
        cancel = list_url(r),
        id = r.id(&item),
    );
    Ok(html::page(&format!("Delete {}", r.verbose_name().to_lowercase()), &content))
}

pub async fn delete<R: CrudResource>(
    State(ctx): State<CrudContext<R>>,
    Path(id): Path<String>,
) -> Result<Redirect, DomainError> {
    let r = &*ctx.resource;
    let id = parse_id(&id)?;
    r.delete(&ctx.app, id).await?;
    tracing::info!("Deleted {} #{}", r.verbose_name(), id);
    Ok(Redirect::to(&list_url(r)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_numbers_default_to_first() {
        assert_eq!(page_number(&PageParams { page: None }).ok(), Some(1));
        assert_eq!(
            page_number(&PageParams {
                page: Some("3".into())
            })
            .ok(),
            Some(3)
        );
        assert!(matches!(
            page_number(&PageParams {
                page: Some("last-ish".into())
            }),
            Err(DomainError::NotFound)
        ));
    }

    #[test]
    fn non_numeric_ids_are_not_found() {
        assert!(matches!(parse_id("abc"), Err(DomainError::NotFound)));
        assert_eq!(parse_id("12").ok(), Some(12));
    }
}
