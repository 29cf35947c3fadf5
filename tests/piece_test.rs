mod common;

use axum::http::StatusCode;
use common::{TestApp, get, post_form, setup_test_app};
use orchestra_records::domain::{OrganizationInput, OrganizationKind, PersonInput, PieceStatus};

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

async fn organization(app: &TestApp, kind: OrganizationKind, name: &str) -> i32 {
    app.state
        .organizations(kind)
        .create(OrganizationInput {
            name: name.into(),
            ..Default::default()
        })
        .await
        .unwrap()
        .id
}

async fn piece_count(app: &TestApp) -> u64 {
    app.state.piece_repo.list_page(1).await.unwrap().total
}

#[tokio::test]
async fn test_create_owned_piece_with_json_selection() {
    let app = setup_test_app().await;
    let mahler = composer(&app, "Gustav", "Mahler").await;
    let ravel = composer(&app, "Maurice", "Ravel").await;
    let selection = format!(r#"["{}","{}"]"#, mahler, ravel);

    let response = post_form(
        &app,
        "/pieces/create/",
        &[
            ("title", "Symphony No. 1"),
            ("selected_ids", &selection),
            ("status", "OWNED"),
            ("difficulty", "DIFFICULT"),
        ],
    )
    .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/pieces/"));

    let page = app.state.piece_repo.list_page(1).await.unwrap();
    assert_eq!(page.total, 1);
    let piece = &page.items[0];
    assert_eq!(piece.status, Some(PieceStatus::Owned));
    let ids: Vec<i32> = piece.composers.iter().map(|c| c.id).collect();
    assert!(ids.contains(&mahler) && ids.contains(&ravel));

    let detail = get(&app, &format!("/pieces/{}/", piece.id)).await;
    assert!(detail.body.contains("Gustav Mahler"));
    assert!(detail.body.contains("Maurice Ravel"));
}

#[tokio::test]
async fn test_rented_status_without_relationship_is_rejected() {
    let app = setup_test_app().await;
    let id = composer(&app, "Gustav", "Mahler").await.to_string();

    let response = post_form(
        &app,
        "/pieces/create/",
        &[("title", "Symphony No. 5"), ("selected_ids", &id), ("status", "RENTED")],
    )
    .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Symphony No. 5"));
    assert_eq!(piece_count(&app).await, 0);
}

#[tokio::test]
async fn test_mismatched_relationship_type_is_rejected() {
    let app = setup_test_app().await;
    let id = composer(&app, "Gustav", "Mahler").await.to_string();
    let lender = organization(&app, OrganizationKind::Loaning, "County Library").await;
    let reference = format!("loaning:{}", lender);

    let response = post_form(
        &app,
        "/pieces/create/",
        &[
            ("title", "Symphony No. 2"),
            ("selected_ids", &id),
            ("status", "RENTED"),
            ("relationship_type", "ON_LOAN"),
            ("relationship_organization", &reference),
        ],
    )
    .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(piece_count(&app).await, 0);
}

#[tokio::test]
async fn test_composers_are_required() {
    let app = setup_test_app().await;
    composer(&app, "Gustav", "Mahler").await;

    let response = post_form(
        &app,
        "/pieces/create/",
        &[("title", "Untitled"), ("status", "OWNED")],
    )
    .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("This field is required."));
}

#[tokio::test]
async fn test_rented_piece_and_organization_delete() {
    let app = setup_test_app().await;
    let id = composer(&app, "Gustav", "Mahler").await.to_string();
    let rental = organization(&app, OrganizationKind::Rental, "Score Rentals Inc").await;
    let reference = format!("rental:{}", rental);

    let response = post_form(
        &app,
        "/pieces/create/",
        &[
            ("title", "Symphony No. 3"),
            ("selected_ids", &id),
            ("status", "RENTED"),
            ("relationship_type", "RENTED"),
            ("relationship_organization", &reference),
            ("relationship_start_date", "2025-01-10"),
            ("relationship_end_date", "2025-03-01"),
            ("rental_cost", "350.00"),
        ],
    )
    .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let piece = app.state.piece_repo.list_page(1).await.unwrap().items[0].clone();
    let relationship = piece.relationship.clone().unwrap();
    assert_eq!(relationship.rental_cost_cents(), Some(35000));
    assert_eq!(piece.relationship_organization.as_deref(), Some("Score Rentals Inc"));

    let detail = get(&app, &format!("/pieces/{}/", piece.id)).await;
    assert!(detail.body.contains("Score Rentals Inc"));
    assert!(detail.body.contains("350.00"));

    let response = post_form(&app, &format!("/rental_organizations/{}/delete/", rental), &[]).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let piece = app.state.piece_repo.find_by_id(piece.id).await.unwrap().unwrap();
    assert!(piece.relationship.is_none());
}

#[tokio::test]
async fn test_create_form_lists_first_composers_in_picker() {
    let app = setup_test_app().await;
    composer(&app, "Gustav", "Mahler").await;

    let response = get(&app, "/pieces/create/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains(r#"id="composer-picker""#));
    assert!(response.body.contains("Mahler, Gustav"));
    assert!(response.body.contains("No composers selected."));
}

#[tokio::test]
async fn test_update_form_keeps_selection() {
    let app = setup_test_app().await;
    let mahler = composer(&app, "Gustav", "Mahler").await;
    let id = mahler.to_string();
    post_form(
        &app,
        "/pieces/create/",
        &[("title", "Das Lied"), ("selected_ids", &id), ("status", "OWNED")],
    )
    .await;
    let piece = app.state.piece_repo.list_page(1).await.unwrap().items[0].clone();

    let form = get(&app, &format!("/pieces/{}/update/", piece.id)).await;
    assert!(form.body.contains(&format!(
        r#"name="selected_ids" value="{}""#,
        mahler
    )));

    let response = post_form(
        &app,
        &format!("/pieces/{}/update/", piece.id),
        &[("title", "Das Lied von der Erde"), ("selected_ids", &id), ("status", "ARCHIVED")],
    )
    .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let piece = app.state.piece_repo.find_by_id(piece.id).await.unwrap().unwrap();
    assert_eq!(piece.title, "Das Lied von der Erde");
    assert_eq!(piece.status, Some(PieceStatus::Archived));
}

#[tokio::test]
async fn test_old_copyright_date_round_trips_through_edit_form() {
    let app = setup_test_app().await;
    let id = composer(&app, "Johann Sebastian", "Bach").await.to_string();

    let response = post_form(
        &app,
        "/pieces/create/",
        &[
            ("title", "Brandenburg Concerto No. 3"),
            ("selected_ids", &id),
            ("status", "OWNED"),
            ("copyright_date_year", "1721"),
            ("copyright_date_month", "3"),
            ("copyright_date_day", "24"),
        ],
    )
    .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let piece = app.state.piece_repo.list_page(1).await.unwrap().items[0].clone();
    assert_eq!(
        piece.copyright_date,
        chrono::NaiveDate::from_ymd_opt(1721, 3, 24)
    );

    let form = get(&app, &format!("/pieces/{}/update/", piece.id)).await;
    assert!(form.body.contains(r#"<option value="1721" selected>1721</option>"#));
    assert!(form.body.contains(r#"<option value="1450">1450</option>"#));
}
