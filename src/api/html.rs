//! Page chrome shared by every HTML response.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::domain::Page;
use crate::domain::{OrganizationKind, PersonKind};
use crate::utils::html::escape;

/// Top navigation, `(label, href)`
fn nav_links() -> Vec<(&'static str, String)> {
    let mut links: Vec<(&'static str, String)> = PersonKind::ALL
        .iter()
        .map(|k| (k.verbose_name_plural(), format!("/{}/", k.url_segment())))
        .collect();
    links.extend(
        OrganizationKind::ALL
            .iter()
            .map(|k| (k.verbose_name_plural(), format!("/{}/", k.url_segment()))),
    );
    for (label, segment) in [
        ("Genres", "genres"),
        ("Publishers", "publishers"),
        ("Pieces", "pieces"),
        ("Venues", "venues"),
        ("Concerts", "concerts"),
    ] {
        links.push((label, format!("/{}/", segment)));
    }
    links
}

/// Full HTML document around `content`. The empty `#modal-container`
/// receives composer picker dialogs.
pub fn layout(title: &str, content: &str) -> String {
    let nav: String = nav_links()
        .iter()
        .map(|(label, href)| {
            format!(
                r#"<a href="{}" class="px-2 py-1 text-sm text-indigo-100 hover:text-white">{}</a>"#,
                href, label
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Orchestra Records</title>
<script src="https://cdn.tailwindcss.com"></script>
<script src="https://unpkg.com/htmx.org@1.9.12"></script>
</head>
<body class="min-h-screen bg-gray-50">
<nav class="bg-indigo-700 px-4 py-3">
<div class="mx-auto flex max-w-6xl flex-wrap items-center gap-2">
<a href="/" class="mr-4 font-semibold text-white">Orchestra Records</a>
{nav}
</div>
</nav>
<main class="mx-auto max-w-6xl px-4 py-8">
<h1 class="mb-6 text-2xl font-bold text-gray-900">{title}</h1>
{content}
</main>
<div id="modal-container"></div>
</body>
</html>"#,
        title = escape(title),
        nav = nav,
        content = content,
    )
}

pub fn page(title: &str, content: &str) -> Html<String> {
    Html(layout(title, content))
}

pub fn status_page(status: StatusCode, title: &str, message: &str) -> Response {
    let content = format!(r#"<p class="text-gray-700">{}</p>"#, escape(message));
    (status, page(title, &content)).into_response()
}

/// Previous / next links for a list page rooted at `base`.
pub fn pagination<T>(page: &Page<T>, base: &str) -> String {
    if page.num_pages <= 1 {
        return String::new();
    }
    let link = |number: u64, label: &str| {
        format!(
            r#"<a href="{}?page={}" class="rounded border px-3 py-1 text-sm hover:bg-gray-100">{}</a>"#,
            base, number, label
        )
    };
    let mut html = String::from(r#"<div class="mt-4 flex items-center gap-2">"#);
    if page.has_previous() {
        html.push_str(&link(1, "&laquo; first"));
        html.push_str(&link(page.number - 1, "previous"));
    }
    html.push_str(&format!(
        r#"<span class="text-sm text-gray-600">Page {} of {}</span>"#,
        page.number, page.num_pages
    ));
    if page.has_next() {
        html.push_str(&link(page.number + 1, "next"));
        html.push_str(&link(page.num_pages, "last &raquo;"));
    }
    html.push_str("</div>");
    html
}

pub fn button_link(href: &str, label: &str) -> String {
    format!(
        r#"<a href="{}" class="inline-block rounded-md bg-indigo-600 px-4 py-2 text-sm font-medium text-white hover:bg-indigo-700">{}</a>"#,
        href,
        escape(label)
    )
}

/// Comma-separated names, or a placeholder when there are none.
pub fn name_list(names: &[String]) -> String {
    if names.is_empty() {
        return r#"<span class="text-gray-400">None</span>"#.to_string();
    }
    escape(&names.join(", "))
}

/// Escaped text, or a placeholder for an empty value.
pub fn text_or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        r#"<span class="text-gray-400">-</span>"#.to_string()
    } else {
        escape(value)
    }
}

pub fn link(href: &str, label: &str) -> String {
    format!(
        r#"<a href="{}" class="text-indigo-600 hover:underline">{}</a>"#,
        href,
        escape(label)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(number: u64, num_pages: u64) -> Page<()> {
        Page {
            items: vec![],
            number,
            num_pages,
            total: num_pages * 20,
        }
    }

    #[test]
    fn single_page_has_no_pagination() {
        assert_eq!(pagination(&page_of(1, 1), "/genres/"), "");
    }

    #[test]
    fn middle_page_links_both_ways() {
        let html = pagination(&page_of(2, 3), "/genres/");
        assert!(html.contains(r#"href="/genres/?page=1""#));
        assert!(html.contains(r#"href="/genres/?page=3""#));
        assert!(html.contains("Page 2 of 3"));
    }

    #[test]
    fn layout_escapes_title() {
        let html = layout("<Rondo>", "");
        assert!(html.contains("&lt;Rondo&gt; | Orchestra Records"));
        assert!(html.contains(r#"id="modal-container""#));
    }
}
