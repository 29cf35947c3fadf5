//! Request-body decoding and per-entity form definitions.
//!
//! Every form works on a [`FormData`]: the raw submitted values (or, for an
//! unbound update form, the entity's current values). Each entity module
//! provides `fields()` for rendering, `initial()` for prefill and `clean()`
//! turning the data into a typed input or a set of [`FieldErrors`].
//!
//! [`FieldErrors`]: crate::domain::FieldErrors

pub mod catalog;
pub mod concerts;
pub mod fields;
pub mod organizations;
pub mod people;
pub mod piece;
pub mod selection;
pub mod widgets;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};

/// A file part of a multipart submission
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Submitted form values in submission order. Keys may repeat.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    pairs: Vec<(String, String)>,
    files: Vec<(String, UploadedFile)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            files: Vec::new(),
        }
    }

    /// Decode an `application/x-www-form-urlencoded` body or query string.
    pub fn from_urlencoded(raw: &[u8]) -> Self {
        Self::from_pairs(url::form_urlencoded::parse(raw).into_owned())
    }

    pub fn from_query(raw: Option<&str>) -> Self {
        raw.map(|q| Self::from_urlencoded(q.as_bytes()))
            .unwrap_or_default()
    }

    /// Last submitted value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every submitted value of `key`, in order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Trimmed value of `key`, empty when absent.
    pub fn text(&self, key: &str) -> String {
        self.get(key).map(str::trim).unwrap_or_default().to_string()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn file(&self, key: &str) -> Option<&UploadedFile> {
        self.files.iter().find(|(k, _)| k == key).map(|(_, f)| f)
    }

    /// Append a value.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Builder form of [`FormData::push`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// Replace every value of `key` with `values`.
    pub fn set_all(&mut self, key: &str, values: impl IntoIterator<Item = String>) {
        self.pairs.retain(|(k, _)| k != key);
        for value in values {
            self.pairs.push((key.to_string(), value));
        }
    }

    pub fn attach(&mut self, key: impl Into<String>, file: UploadedFile) {
        self.files.push((key.into(), file));
    }
}

fn bad_request(message: impl std::fmt::Display) -> Response {
    (StatusCode::BAD_REQUEST, message.to_string()).into_response()
}

#[async_trait]
impl<S> FromRequest<S> for FormData
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("multipart/form-data"));

        if !is_multipart {
            let body = Bytes::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            return Ok(Self::from_urlencoded(&body));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        let mut data = FormData::new();
        while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await.map_err(bad_request)?;
                    // Browsers send an empty part for an untouched file input
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    data.attach(
                        name,
                        UploadedFile {
                            file_name,
                            content_type,
                            bytes,
                        },
                    );
                }
                None => {
                    let value = field.text().await.map_err(bad_request)?;
                    data.push(name, value);
                }
            }
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urlencoded_keeps_repeated_keys() {
        let data = FormData::from_urlencoded(b"selected_ids=3&selected_ids=7&q=Ma+ler");
        assert_eq!(data.get_all("selected_ids"), vec!["3", "7"]);
        assert_eq!(data.get("q"), Some("Ma ler"));
        assert_eq!(data.text("missing"), "");
    }

    #[test]
    fn last_value_wins_for_get() {
        let data = FormData::new().with("a", "1").with("a", "2");
        assert_eq!(data.get("a"), Some("2"));
    }

    #[test]
    fn set_all_replaces_values() {
        let mut data = FormData::new().with("ids", "1").with("other", "x");
        data.set_all("ids", vec!["4".to_string(), "5".to_string()]);
        assert_eq!(data.get_all("ids"), vec!["4", "5"]);
        assert_eq!(data.get("other"), Some("x"));
    }
}
