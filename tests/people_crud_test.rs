mod common;

use axum::http::StatusCode;
use common::{get, post_form, setup_test_app};
use orchestra_records::domain::{PersonInput, PersonKind};

#[tokio::test]
async fn test_conductor_create_detail_delete() {
    let app = setup_test_app().await;

    let response = post_form(
        &app,
        "/conductors/create/",
        &[
            ("honorific", "Maestro"),
            ("first_name", "Leonard"),
            ("last_name", "Bernstein"),
            ("instrument", "Piano"),
        ],
    )
    .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/conductors/"));

    let conductors = app.state.conductor_repo.find_all().await.unwrap();
    assert_eq!(conductors.len(), 1);
    let id = conductors[0].id;

    let detail = get(&app, &format!("/conductors/{}/", id)).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.body.contains("Leonard Bernstein"));
    assert!(detail.body.contains("Maestro"));

    let list = get(&app, "/conductors/").await;
    assert!(list.body.contains("Bernstein, Leonard"));

    let confirm = get(&app, &format!("/conductors/{}/delete/", id)).await;
    assert_eq!(confirm.status, StatusCode::OK);
    assert!(confirm.body.contains("Leonard Bernstein"));

    let before = app.state.conductor_repo.count().await.unwrap();
    let response = post_form(&app, &format!("/conductors/{}/delete/", id), &[]).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/conductors/"));
    assert_eq!(app.state.conductor_repo.count().await.unwrap(), before - 1);

    let detail = get(&app, &format!("/conductors/{}/", id)).await;
    assert_eq!(detail.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_person_form_is_rerendered() {
    let app = setup_test_app().await;

    let response = post_form(
        &app,
        "/composers/create/",
        &[("first_name", "Clara"), ("birth_year", "eighteen")],
    )
    .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("This field is required."));
    assert!(response.body.contains(r#"value="Clara""#));
    assert_eq!(app.state.composer_repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_prefills_and_saves() {
    let app = setup_test_app().await;
    let guest = app
        .state
        .people(PersonKind::Guest)
        .create(PersonInput {
            first_name: Some("Hilary".into()),
            last_name: "Hahn".into(),
            instrument: "Violin".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    let form = get(&app, &format!("/guests/{}/update/", guest.id)).await;
    assert_eq!(form.status, StatusCode::OK);
    assert!(form.body.contains(r#"value="Hahn""#));

    let response = post_form(
        &app,
        &format!("/guests/{}/update/", guest.id),
        &[
            ("first_name", "Hilary"),
            ("last_name", "Hahn"),
            ("instrument", "Baroque violin"),
        ],
    )
    .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let updated = app.state.guest_repo.find_by_id(guest.id).await.unwrap().unwrap();
    assert_eq!(updated.instrument, "Baroque violin");
}

#[tokio::test]
async fn test_unknown_ids_and_pages_are_not_found() {
    let app = setup_test_app().await;

    assert_eq!(get(&app, "/arrangers/").await.status, StatusCode::OK);
    assert_eq!(get(&app, "/arrangers/?page=1").await.status, StatusCode::OK);
    assert_eq!(
        get(&app, "/arrangers/?page=2").await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        get(&app, "/arrangers/?page=abc").await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(get(&app, "/arrangers/999/").await.status, StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/arrangers/abc/").await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        get(&app, "/arrangers/999/update/").await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        post_form(&app, "/arrangers/999/delete/", &[]).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_list_is_paginated() {
    let app = setup_test_app().await;
    for i in 0..25 {
        app.state
            .composer_repo
            .create(PersonInput {
                last_name: format!("Composer{:02}", i),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    let first = get(&app, "/composers/").await;
    assert!(first.body.contains("Composer00"));
    assert!(!first.body.contains("Composer20"));
    assert!(first.body.contains("Page 1 of 2"));

    let second = get(&app, "/composers/?page=2").await;
    assert_eq!(second.status, StatusCode::OK);
    assert!(second.body.contains("Composer24"));
    assert!(!second.body.contains("Composer19"));
}
