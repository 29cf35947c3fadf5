mod common;

use axum::http::StatusCode;
use common::{TestApp, get, post_form, setup_test_app};
use orchestra_records::domain::PersonInput;

async fn composer(app: &TestApp, first: &str, last: &str) -> i32 {
    app.state
        .composer_repo
        .create(PersonInput {
            first_name: Some(first.into()),
            last_name: last.into(),
            ..Default::default()
        })
        .await
        .unwrap()
        .id
}

fn hidden(id: i32) -> String {
    format!(r#"name="selected_ids" value="{}""#, id)
}

#[tokio::test]
async fn test_search_is_case_insensitive_and_excludes_selection() {
    let app = setup_test_app().await;
    let mahler = composer(&app, "Gustav", "Mahler").await;
    let ma = composer(&app, "Yo-Yo", "Ma").await;
    let martha = composer(&app, "Martha", "Argerich").await;
    composer(&app, "Claude", "Debussy").await;

    let response = post_form(&app, "/composer-picker/search/", &[("composer_search", "MA")]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.starts_with(r#"<div id="composer-results""#));
    assert!(response.body.contains("Mahler, Gustav"));
    assert!(response.body.contains("Ma, Yo-Yo"));
    assert!(response.body.contains("Argerich, Martha"));
    assert!(!response.body.contains("Debussy"));

    let selected = mahler.to_string();
    let response = post_form(
        &app,
        "/composer-picker/search/",
        &[("composer_search", "ma"), ("selected_ids", &selected)],
    )
    .await;
    assert!(!response.body.contains("Mahler"));
    assert!(response.body.contains(&format!(r#""composer_id": "{}""#, ma)));
    assert!(response.body.contains(&format!(r#""composer_id": "{}""#, martha)));
}

#[tokio::test]
async fn test_search_returns_at_most_twenty() {
    let app = setup_test_app().await;
    for i in 0..25 {
        composer(&app, "Anna", &format!("Composer{:02}", i)).await;
    }

    let response = post_form(&app, "/composer-picker/search/", &[("composer_search", "")]).await;
    assert_eq!(response.body.matches("/composer-picker/add/").count(), 20);
    assert!(response.body.contains("Composer19"));
    assert!(!response.body.contains("Composer20"));
}

#[tokio::test]
async fn test_search_wildcards_match_literally() {
    let app = setup_test_app().await;
    composer(&app, "Gustav", "Mahler").await;
    composer(&app, "Claude", "Debussy").await;

    for query in ["%", "M_h"] {
        let response =
            post_form(&app, "/composer-picker/search/", &[("composer_search", query)]).await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.contains("No composers found."), "query {:?}", query);
        assert!(!response.body.contains("Mahler"));
        assert!(!response.body.contains("Debussy"));
    }
}

#[tokio::test]
async fn test_add_unknown_composer_is_not_found() {
    let app = setup_test_app().await;
    let response = post_form(&app, "/composer-picker/add/", &[("composer_id", "999")]).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = post_form(&app, "/composer-picker/add/", &[("composer_id", "abc")]).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_twice_keeps_one_occurrence() {
    let app = setup_test_app().await;
    let ravel = composer(&app, "Maurice", "Ravel").await;
    let id = ravel.to_string();

    let first = post_form(&app, "/composer-picker/add/", &[("composer_id", &id)]).await;
    assert_eq!(first.status, StatusCode::OK);
    assert!(first.body.contains(r#"<div id="selected-composers" hx-swap-oob="true">"#));
    assert_eq!(first.body.matches(&hidden(ravel)).count(), 1);

    let second = post_form(
        &app,
        "/composer-picker/add/",
        &[("composer_id", &id), ("selected_ids", &id)],
    )
    .await;
    assert_eq!(second.body.matches(&hidden(ravel)).count(), 1);
    assert!(second.body.contains("No composers found."));
}

#[tokio::test]
async fn test_remove_drops_only_that_composer() {
    let app = setup_test_app().await;
    let ravel = composer(&app, "Maurice", "Ravel").await;
    let satie = composer(&app, "Erik", "Satie").await;
    let selection = format!("[{}, {}]", ravel, satie);

    let response = post_form(
        &app,
        "/composer-picker/remove/",
        &[("composer_id", &ravel.to_string()), ("selected_ids", &selection)],
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(!response.body.contains(&hidden(ravel)));
    assert!(response.body.contains(&hidden(satie)));
    // Ravel is back among the results
    assert!(response.body.contains("Ravel, Maurice"));
}

#[tokio::test]
async fn test_remove_without_usable_id_keeps_selection() {
    let app = setup_test_app().await;
    let ravel = composer(&app, "Maurice", "Ravel").await;
    let satie = composer(&app, "Erik", "Satie").await;
    let selection = format!("[{}, {}]", ravel, satie);

    for form in [
        vec![("composer_id", "abc"), ("selected_ids", selection.as_str())],
        vec![("selected_ids", selection.as_str())],
        vec![("composer_id", "999"), ("selected_ids", selection.as_str())],
    ] {
        let response = post_form(&app, "/composer-picker/remove/", &form).await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.contains(r#"<div id="selected-composers" hx-swap-oob="true">"#));
        assert!(response.body.contains(&hidden(ravel)));
        assert!(response.body.contains(&hidden(satie)));
    }
}

#[tokio::test]
async fn test_create_modal_carries_selection() {
    let app = setup_test_app().await;
    let response = get(
        &app,
        "/composer-picker/create/?selected_ids=4&selected_ids=9&composer_search=ba",
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.starts_with(r#"<div id="modal-container">"#));
    assert!(response.body.contains(&hidden(4)));
    assert!(response.body.contains(&hidden(9)));
    assert!(response.body.contains(r#"name="composer_search" value="ba""#));
}

#[tokio::test]
async fn test_save_new_composer() {
    let app = setup_test_app().await;
    let ravel = composer(&app, "Maurice", "Ravel").await;
    let id = ravel.to_string();

    let invalid = post_form(
        &app,
        "/composer-picker/save/",
        &[("first_name", "Lili"), ("selected_ids", &id)],
    )
    .await;
    assert_eq!(invalid.status, StatusCode::OK);
    assert!(invalid.body.contains("This field is required."));
    assert!(invalid.body.contains(&hidden(ravel)));
    assert_eq!(app.state.composer_repo.count().await.unwrap(), 1);

    let saved = post_form(
        &app,
        "/composer-picker/save/",
        &[
            ("first_name", "Lili"),
            ("last_name", "Boulanger"),
            ("selected_ids", &id),
        ],
    )
    .await;
    assert_eq!(saved.status, StatusCode::OK);
    assert!(saved.body.starts_with(r#"<div id="modal-container"></div>"#));

    let all = app.state.composer_repo.find_all().await.unwrap();
    let lili = all.iter().find(|c| c.last_name == "Boulanger").unwrap();
    assert!(saved.body.contains(&hidden(ravel)));
    assert!(saved.body.contains(&hidden(lili.id)));
}
