mod common;

use axum::http::StatusCode;
use common::{get, post_form, setup_test_app};

#[tokio::test]
async fn test_health_and_index() {
    let app = setup_test_app().await;

    let health = get(&app, "/health").await;
    assert_eq!(health.status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&health.body).unwrap();
    assert_eq!(json["status"], "ok");

    let index = get(&app, "/").await;
    assert_eq!(index.status, StatusCode::OK);
    for path in ["/composers/", "/loaning_organizations/", "/pieces/", "/concerts/"] {
        assert!(index.body.contains(path));
    }
}

#[tokio::test]
async fn test_loaning_organization_crud() {
    let app = setup_test_app().await;

    let invalid = post_form(
        &app,
        "/loaning_organizations/create/",
        &[("name", "County Library"), ("contact_email", "not-an-email")],
    )
    .await;
    assert_eq!(invalid.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(invalid.body.contains(r#"value="County Library""#));

    let created = post_form(
        &app,
        "/loaning_organizations/create/",
        &[
            ("name", "County Library"),
            ("contact_name", "Pat Doe"),
            ("contact_email", "pat@example.org"),
        ],
    )
    .await;
    assert_eq!(created.status, StatusCode::SEE_OTHER);
    assert_eq!(created.location.as_deref(), Some("/loaning_organizations/"));

    let org = app.state.loaning_repo.find_all().await.unwrap()[0].clone();
    let detail = get(&app, &format!("/loaning_organizations/{}/", org.id)).await;
    assert!(detail.body.contains("mailto:pat@example.org"));

    // Ids are per table
    let other = get(&app, &format!("/rental_organizations/{}/", org.id)).await;
    assert_eq!(other.status, StatusCode::NOT_FOUND);

    let deleted = post_form(&app, &format!("/loaning_organizations/{}/delete/", org.id), &[]).await;
    assert_eq!(deleted.status, StatusCode::SEE_OTHER);
    assert!(app.state.loaning_repo.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_genre_and_publisher_pages() {
    let app = setup_test_app().await;

    let response = post_form(&app, "/genres/create/", &[("name", "March")]).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert!(get(&app, "/genres/").await.body.contains("March"));

    let response = post_form(
        &app,
        "/publishers/create/",
        &[("name", "Boosey"), ("website", "ftp://example.com")],
    )
    .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);

    let response = post_form(
        &app,
        "/publishers/create/",
        &[("name", "Boosey"), ("website", "https://www.boosey.com")],
    )
    .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
}
