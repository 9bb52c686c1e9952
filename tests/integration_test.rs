use std::sync::Arc;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use chrono::{DateTime, Duration, TimeZone, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, Set,
};

use review_server::api::AppState;
use review_server::create_app;
use review_server::db::entities::review::ReviewStatus;
use review_server::db::entities::{discussion, review, review_tag, tag, user};
use review_server::db::{self, queries};
use review_server::web_ui::routes::utils::csrf_token_for;

async fn setup() -> (TestServer, Arc<AppState>) {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_owned());
    opts.max_connections(1);
    let conn = Database::connect(opts).await.unwrap();
    db::create_tables(&conn).await.unwrap();

    let state = Arc::new(AppState::new(conn));
    let server = TestServer::new(create_app(state.clone())).unwrap();
    (server, state)
}

/// Register an account and open a session for it.
/// Returns the account row, its session cookie, and a matching form token.
async fn signed_in(state: &AppState, name: &str) -> (user::Model, String, String) {
    let account = state
        .auth
        .register_user(name, "password", None)
        .await
        .unwrap();
    let token = state.auth.authenticate(name, "password").await.unwrap();
    let cookie = format!("token={}", token.token);
    let csrf = csrf_token_for(&token.token);
    (account, cookie, csrf)
}

fn day(year: i32, month: u32, dom: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, dom, 12, 0, 0).unwrap()
}

async fn seed_review(
    db: &DatabaseConnection,
    author_id: i32,
    title: &str,
    slug: &str,
    status: ReviewStatus,
    created: DateTime<Utc>,
) -> review::Model {
    review::ActiveModel {
        title: Set(title.to_string()),
        slug: Set(slug.to_string()),
        author_id: Set(author_id),
        body: Set(format!("{} body text", title)),
        status: Set(status),
        created_on: Set(created),
        updated_on: Set(created),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

async fn seed_discussion(
    db: &DatabaseConnection,
    review_id: i32,
    user_id: i32,
    body: &str,
    is_active: bool,
) -> discussion::Model {
    let now = Utc::now();
    discussion::ActiveModel {
        review_id: Set(review_id),
        user_id: Set(user_id),
        body: Set(body.to_string()),
        created_on: Set(now),
        updated_on: Set(now),
        is_active: Set(is_active),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

async fn discussion_count(db: &DatabaseConnection, review_id: i32) -> u64 {
    discussion::Entity::find()
        .filter(discussion::Column::ReviewId.eq(review_id))
        .count(db)
        .await
        .unwrap()
}

fn cookie_header(cookie: &str) -> HeaderValue {
    HeaderValue::from_str(cookie).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _state) = setup().await;

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_detail_end_to_end() {
    let (server, state) = setup().await;
    let (author, _, _) = signed_in(&state, "alice").await;
    seed_review(
        &state.db,
        author.id,
        "First Post",
        "first-post",
        ReviewStatus::Published,
        day(2024, 1, 1),
    )
    .await;

    let response = server.get("/2024/01/01/first-post").await;
    response.assert_status_ok();
    let text = response.text();
    assert!(text.contains("First Post"));
    assert!(text.contains("No discussions yet"));
    // Signed-out readers get a sign-in prompt instead of the form
    assert!(text.contains("Sign in"));
    assert!(!text.contains("name=\"body\""));
}

#[tokio::test]
async fn test_detail_shows_form_when_signed_in() {
    let (server, state) = setup().await;
    let (author, cookie, _) = signed_in(&state, "alice").await;
    seed_review(
        &state.db,
        author.id,
        "First Post",
        "first-post",
        ReviewStatus::Published,
        day(2024, 1, 1),
    )
    .await;

    let response = server
        .get("/2024/01/01/first-post")
        .add_header(header::COOKIE, cookie_header(&cookie))
        .await;
    response.assert_status_ok();
    let text = response.text();
    assert!(text.contains("name=\"body\""));
    assert!(text.contains("name=\"csrf_token\""));
}

#[tokio::test]
async fn test_draft_reviews_are_invisible() {
    let (server, state) = setup().await;
    let (author, _, _) = signed_in(&state, "alice").await;
    seed_review(
        &state.db,
        author.id,
        "Secret Draft",
        "secret-draft",
        ReviewStatus::Draft,
        day(2024, 1, 1),
    )
    .await;

    let listing = server.get("/").await;
    listing.assert_status_ok();
    assert!(!listing.text().contains("Secret Draft"));

    let detail = server.get("/2024/01/01/secret-draft").await;
    detail.assert_status_not_found();
}

#[tokio::test]
async fn test_detail_requires_exact_creation_day() {
    let (server, state) = setup().await;
    let (author, _, _) = signed_in(&state, "alice").await;
    seed_review(
        &state.db,
        author.id,
        "First Post",
        "first-post",
        ReviewStatus::Published,
        day(2024, 1, 1),
    )
    .await;

    server
        .get("/2024/01/02/first-post")
        .await
        .assert_status_not_found();
    server
        .get("/2024/13/01/first-post")
        .await
        .assert_status_not_found();
    server
        .get("/abcd/01/01/first-post")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_same_slug_on_different_days() {
    let (server, state) = setup().await;
    let (author, _, _) = signed_in(&state, "alice").await;
    seed_review(
        &state.db,
        author.id,
        "January Take",
        "hot-take",
        ReviewStatus::Published,
        day(2024, 1, 1),
    )
    .await;
    seed_review(
        &state.db,
        author.id,
        "February Take",
        "hot-take",
        ReviewStatus::Published,
        day(2024, 2, 1),
    )
    .await;

    let jan = server.get("/2024/01/01/hot-take").await;
    jan.assert_status_ok();
    assert!(jan.text().contains("January Take"));

    let feb = server.get("/2024/02/01/hot-take").await;
    feb.assert_status_ok();
    assert!(feb.text().contains("February Take"));
}

const PAGED_TITLES: [&str; 7] = [
    "Argon", "Boron", "Cesium", "Dysprosium", "Erbium", "Fermium", "Gallium",
];

/// Seven published reviews with ascending update times; listing pages are
/// three wide, most recently updated first.
async fn seed_paged(state: &AppState) -> Vec<review::Model> {
    let (author, _, _) = signed_in(state, "alice").await;
    let base = day(2024, 3, 1);
    let mut seeded = Vec::new();
    for (i, title) in PAGED_TITLES.iter().enumerate() {
        let r = seed_review(
            &state.db,
            author.id,
            title,
            &title.to_lowercase(),
            ReviewStatus::Published,
            base + Duration::minutes(i as i64),
        )
        .await;
        seeded.push(r);
    }
    seeded
}

#[tokio::test]
async fn test_listing_pages_are_three_wide_newest_first() {
    let (server, state) = setup().await;
    seed_paged(&state).await;

    // Assertions target article bodies: the most-discussed sidebar lists
    // titles, so titles alone cannot prove which page a review landed on.
    let first = server.get("/").await;
    first.assert_status_ok();
    let text = first.text();
    for shown in ["Gallium body text", "Fermium body text", "Erbium body text"] {
        assert!(text.contains(shown), "page 1 should show {}", shown);
    }
    assert!(!text.contains("Dysprosium body text"));

    // Most recently updated first
    let gallium = text.find("Gallium body text").unwrap();
    let fermium = text.find("Fermium body text").unwrap();
    let erbium = text.find("Erbium body text").unwrap();
    assert!(gallium < fermium && fermium < erbium);

    let last = server.get("/?page=3").await;
    last.assert_status_ok();
    let text = last.text();
    assert!(text.contains("Argon body text"));
    assert!(!text.contains("Boron body text"));
}

#[tokio::test]
async fn test_non_integer_page_falls_back_to_first() {
    let (server, state) = setup().await;
    seed_paged(&state).await;

    let response = server.get("/?page=abc").await;
    response.assert_status_ok();
    let text = response.text();
    assert!(text.contains("Gallium body text"));
    assert!(!text.contains("Argon body text"));
    assert!(text.contains("Page 1 of 3"));
}

#[tokio::test]
async fn test_out_of_range_page_clamps_to_last() {
    let (server, state) = setup().await;
    seed_paged(&state).await;

    let response = server.get("/?page=999999").await;
    response.assert_status_ok();
    let text = response.text();
    assert!(text.contains("Argon body text"));
    assert!(!text.contains("Gallium body text"));
    assert!(text.contains("Page 3 of 3"));
}

#[tokio::test]
async fn test_tag_filter_and_unknown_tag() {
    let (server, state) = setup().await;
    let (author, _, _) = signed_in(&state, "alice").await;
    let tagged = seed_review(
        &state.db,
        author.id,
        "Tagged Review",
        "tagged-review",
        ReviewStatus::Published,
        day(2024, 4, 1),
    )
    .await;
    seed_review(
        &state.db,
        author.id,
        "Plain Review",
        "plain-review",
        ReviewStatus::Published,
        day(2024, 4, 2),
    )
    .await;

    let rust_tag = tag::ActiveModel {
        name: Set("Rust".to_string()),
        slug: Set("rust".to_string()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .unwrap();
    review_tag::ActiveModel {
        review_id: Set(tagged.id),
        tag_id: Set(rust_tag.id),
    }
    .insert(&state.db)
    .await
    .unwrap();

    let response = server.get("/tag/rust").await;
    response.assert_status_ok();
    let text = response.text();
    // Body text only renders in the article column, not the sidebar
    assert!(text.contains("Tagged Review body text"));
    assert!(!text.contains("Plain Review body text"));

    server.get("/tag/zig").await.assert_status_not_found();
}

#[tokio::test]
async fn test_most_discussed_ranks_by_total_count() {
    let (_server, state) = setup().await;
    let (author, _, _) = signed_in(&state, "alice").await;
    let busy = seed_review(
        &state.db,
        author.id,
        "Busy",
        "busy",
        ReviewStatus::Published,
        day(2024, 5, 1),
    )
    .await;
    let quiet = seed_review(
        &state.db,
        author.id,
        "Quiet",
        "quiet",
        ReviewStatus::Published,
        day(2024, 5, 2),
    )
    .await;
    let silent = seed_review(
        &state.db,
        author.id,
        "Silent",
        "silent",
        ReviewStatus::Published,
        day(2024, 5, 3),
    )
    .await;
    let draft = seed_review(
        &state.db,
        author.id,
        "Hidden Draft",
        "hidden-draft",
        ReviewStatus::Draft,
        day(2024, 5, 4),
    )
    .await;

    for i in 0..5 {
        // Hidden entries still count toward the ranking
        seed_discussion(&state.db, busy.id, author.id, &format!("b{}", i), i % 2 == 0).await;
    }
    for i in 0..2 {
        seed_discussion(&state.db, quiet.id, author.id, &format!("q{}", i), true).await;
    }
    for i in 0..10 {
        seed_discussion(&state.db, draft.id, author.id, &format!("d{}", i), true).await;
    }

    let ranked = queries::most_discussed(&state.db, 3).await.unwrap();
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0].id, busy.id);
    assert_eq!(ranked[0].discussion_count, 5);
    assert_eq!(ranked[1].id, quiet.id);
    assert_eq!(ranked[1].discussion_count, 2);
    assert_eq!(ranked[2].id, silent.id);
    assert_eq!(ranked[2].discussion_count, 0);
    assert!(ranked.iter().all(|r| r.id != draft.id));
}

#[tokio::test]
async fn test_create_discussion() {
    let (server, state) = setup().await;
    let (author, cookie, csrf) = signed_in(&state, "alice").await;
    let r = seed_review(
        &state.db,
        author.id,
        "Open Review",
        "open-review",
        ReviewStatus::Published,
        day(2024, 6, 1),
    )
    .await;

    let response = server
        .post(&format!("/reviews/{}/discuss", r.id))
        .add_header(header::COOKIE, cookie_header(&cookie))
        .form(&[("body", "Nice work"), ("csrf_token", csrf.as_str())])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        response.header("location").to_str().unwrap(),
        "/2024/06/01/open-review"
    );
    assert_eq!(discussion_count(&state.db, r.id).await, 1);

    let detail = server.get("/2024/06/01/open-review").await;
    assert!(detail.text().contains("Nice work"));
}

#[tokio::test]
async fn test_discussion_body_length_boundary() {
    let (server, state) = setup().await;
    let (author, cookie, csrf) = signed_in(&state, "alice").await;
    let r = seed_review(
        &state.db,
        author.id,
        "Bounded",
        "bounded",
        ReviewStatus::Published,
        day(2024, 6, 2),
    )
    .await;

    let exactly_800 = "x".repeat(800);
    let response = server
        .post(&format!("/reviews/{}/discuss", r.id))
        .add_header(header::COOKIE, cookie_header(&cookie))
        .form(&[("body", exactly_800.as_str()), ("csrf_token", csrf.as_str())])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(discussion_count(&state.db, r.id).await, 1);

    let over_800 = "x".repeat(801);
    let response = server
        .post(&format!("/reviews/{}/discuss", r.id))
        .add_header(header::COOKIE, cookie_header(&cookie))
        .form(&[("body", over_800.as_str()), ("csrf_token", csrf.as_str())])
        .await;
    // Validation failures re-render the detail page and persist nothing
    response.assert_status_ok();
    assert!(response.text().contains("characters or fewer"));
    assert_eq!(discussion_count(&state.db, r.id).await, 1);

    let blank = server
        .post(&format!("/reviews/{}/discuss", r.id))
        .add_header(header::COOKIE, cookie_header(&cookie))
        .form(&[("body", "   "), ("csrf_token", csrf.as_str())])
        .await;
    blank.assert_status_ok();
    assert!(blank.text().contains("required"));
    assert_eq!(discussion_count(&state.db, r.id).await, 1);
}

#[tokio::test]
async fn test_create_discussion_requires_login() {
    let (server, state) = setup().await;
    let (author, _, _) = signed_in(&state, "alice").await;
    let r = seed_review(
        &state.db,
        author.id,
        "Open Review",
        "open-review",
        ReviewStatus::Published,
        day(2024, 6, 3),
    )
    .await;

    let response = server
        .post(&format!("/reviews/{}/discuss", r.id))
        .form(&[("body", "anonymous"), ("csrf_token", "whatever")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert!(response
        .header("location")
        .to_str()
        .unwrap()
        .starts_with("/-/login"));
    assert_eq!(discussion_count(&state.db, r.id).await, 0);
}

#[tokio::test]
async fn test_create_discussion_rejects_bad_csrf() {
    let (server, state) = setup().await;
    let (author, cookie, _) = signed_in(&state, "alice").await;
    let r = seed_review(
        &state.db,
        author.id,
        "Open Review",
        "open-review",
        ReviewStatus::Published,
        day(2024, 6, 4),
    )
    .await;

    let response = server
        .post(&format!("/reviews/{}/discuss", r.id))
        .add_header(header::COOKIE, cookie_header(&cookie))
        .form(&[("body", "hello"), ("csrf_token", "forged")])
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(discussion_count(&state.db, r.id).await, 0);
}

#[tokio::test]
async fn test_create_discussion_on_draft_is_not_found() {
    let (server, state) = setup().await;
    let (author, cookie, csrf) = signed_in(&state, "alice").await;
    let r = seed_review(
        &state.db,
        author.id,
        "Unpublished",
        "unpublished",
        ReviewStatus::Draft,
        day(2024, 6, 5),
    )
    .await;

    let response = server
        .post(&format!("/reviews/{}/discuss", r.id))
        .add_header(header::COOKIE, cookie_header(&cookie))
        .form(&[("body", "sneaky"), ("csrf_token", csrf.as_str())])
        .await;
    response.assert_status_not_found();
    assert_eq!(discussion_count(&state.db, r.id).await, 0);
}

#[tokio::test]
async fn test_non_owner_gets_not_found_and_record_is_unchanged() {
    let (server, state) = setup().await;
    let (alice, _, _) = signed_in(&state, "alice").await;
    let (_bob, bob_cookie, bob_csrf) = signed_in(&state, "bob").await;
    let r = seed_review(
        &state.db,
        alice.id,
        "Contested",
        "contested",
        ReviewStatus::Published,
        day(2024, 7, 1),
    )
    .await;
    let d = seed_discussion(&state.db, r.id, alice.id, "original text", true).await;

    let edit_page = server
        .get(&format!("/discussions/{}/edit", d.id))
        .add_header(header::COOKIE, cookie_header(&bob_cookie))
        .await;
    edit_page.assert_status_not_found();

    let edit = server
        .post(&format!("/discussions/{}/edit", d.id))
        .add_header(header::COOKIE, cookie_header(&bob_cookie))
        .form(&[("body", "defaced"), ("csrf_token", bob_csrf.as_str())])
        .await;
    edit.assert_status_not_found();

    let delete = server
        .post(&format!("/discussions/{}/delete", d.id))
        .add_header(header::COOKIE, cookie_header(&bob_cookie))
        .form(&[("csrf_token", bob_csrf.as_str())])
        .await;
    delete.assert_status_not_found();

    let unchanged = discussion::Entity::find_by_id(d.id)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.body, "original text");
}

#[tokio::test]
async fn test_owner_can_edit_and_delete() {
    let (server, state) = setup().await;
    let (alice, cookie, csrf) = signed_in(&state, "alice").await;
    let r = seed_review(
        &state.db,
        alice.id,
        "Mine",
        "mine",
        ReviewStatus::Published,
        day(2024, 7, 2),
    )
    .await;
    let d = seed_discussion(&state.db, r.id, alice.id, "first draft", true).await;

    // The edit form comes pre-filled
    let form = server
        .get(&format!("/discussions/{}/edit", d.id))
        .add_header(header::COOKIE, cookie_header(&cookie))
        .await;
    form.assert_status_ok();
    assert!(form.text().contains("first draft"));

    let edit = server
        .post(&format!("/discussions/{}/edit", d.id))
        .add_header(header::COOKIE, cookie_header(&cookie))
        .form(&[("body", "second thoughts"), ("csrf_token", csrf.as_str())])
        .await;
    edit.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        edit.header("location").to_str().unwrap(),
        "/2024/07/02/mine"
    );

    let updated = discussion::Entity::find_by_id(d.id)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.body, "second thoughts");
    assert_eq!(updated.created_on, d.created_on);
    assert!(updated.updated_on > d.updated_on);

    // The confirmation page deletes nothing by itself
    let confirm = server
        .get(&format!("/discussions/{}/delete", d.id))
        .add_header(header::COOKIE, cookie_header(&cookie))
        .await;
    confirm.assert_status_ok();
    assert_eq!(discussion_count(&state.db, r.id).await, 1);

    let delete = server
        .post(&format!("/discussions/{}/delete", d.id))
        .add_header(header::COOKIE, cookie_header(&cookie))
        .form(&[("csrf_token", csrf.as_str())])
        .await;
    delete.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(discussion_count(&state.db, r.id).await, 0);
}

#[tokio::test]
async fn test_deleting_review_cascades_to_discussions() {
    let (_server, state) = setup().await;
    let (alice, _, _) = signed_in(&state, "alice").await;
    let r = seed_review(
        &state.db,
        alice.id,
        "Doomed",
        "doomed",
        ReviewStatus::Published,
        day(2024, 8, 1),
    )
    .await;
    seed_discussion(&state.db, r.id, alice.id, "one", true).await;
    seed_discussion(&state.db, r.id, alice.id, "two", false).await;
    assert_eq!(discussion_count(&state.db, r.id).await, 2);

    review::Entity::delete_by_id(r.id)
        .exec(&state.db)
        .await
        .unwrap();

    assert_eq!(discussion_count(&state.db, r.id).await, 0);
}

#[tokio::test]
async fn test_hidden_discussions_are_excluded_from_detail() {
    let (server, state) = setup().await;
    let (alice, _, _) = signed_in(&state, "alice").await;
    let r = seed_review(
        &state.db,
        alice.id,
        "Moderated",
        "moderated",
        ReviewStatus::Published,
        day(2024, 8, 2),
    )
    .await;
    seed_discussion(&state.db, r.id, alice.id, "visible entry", true).await;
    seed_discussion(&state.db, r.id, alice.id, "hidden entry", false).await;

    let detail = server.get("/2024/08/02/moderated").await;
    detail.assert_status_ok();
    let text = detail.text();
    assert!(text.contains("visible entry"));
    assert!(!text.contains("hidden entry"));
}

#[tokio::test]
async fn test_signup_and_login_flow() {
    let (server, _state) = setup().await;

    let signup = server
        .post("/-/signup")
        .form(&[
            ("username", "carol"),
            ("password", "secret99"),
            ("email", ""),
        ])
        .await;
    signup.assert_status(StatusCode::SEE_OTHER);
    assert!(signup
        .header("location")
        .to_str()
        .unwrap()
        .starts_with("/-/login"));

    let login = server
        .post("/-/login")
        .form(&[("username", "carol"), ("password", "secret99")])
        .await;
    login.assert_status(StatusCode::SEE_OTHER);
    let set_cookie = login.header("set-cookie").to_str().unwrap().to_string();
    assert!(set_cookie.starts_with("token="));

    let bad_login = server
        .post("/-/login")
        .form(&[("username", "carol"), ("password", "wrong")])
        .await;
    bad_login.assert_status(StatusCode::SEE_OTHER);
    assert!(bad_login
        .header("location")
        .to_str()
        .unwrap()
        .contains("error"));
}

async fn admin_session(state: &AppState) -> (String, String) {
    state.auth.ensure_admin_user("admin", "admin").await.unwrap();
    let token = state.auth.authenticate("admin", "admin").await.unwrap();
    (
        format!("token={}", token.token),
        csrf_token_for(&token.token),
    )
}

#[tokio::test]
async fn test_admin_section_is_not_found_for_others() {
    let (server, state) = setup().await;
    let (_reader, cookie, _) = signed_in(&state, "reader").await;

    server.get("/admin/reviews").await.assert_status_not_found();
    server
        .get("/admin/reviews")
        .add_header(header::COOKIE, cookie_header(&cookie))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_admin_creates_and_publishes_review() {
    let (server, state) = setup().await;
    let (cookie, csrf) = admin_session(&state).await;

    let response = server
        .post("/admin/reviews/new")
        .add_header(header::COOKIE, cookie_header(&cookie))
        .form(&[
            ("title", "Fresh Off The Desk"),
            ("slug", ""),
            ("body", "A review written from the admin desk."),
            ("status", "PB"),
            ("tags", "Rust, Web"),
            ("csrf_token", csrf.as_str()),
        ])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);

    // Slug is derived from the title when left blank
    let created = review::Entity::find()
        .filter(review::Column::Slug.eq("fresh-off-the-desk"))
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(created.status, ReviewStatus::Published);

    let listing = server.get("/").await;
    assert!(listing.text().contains("Fresh Off The Desk"));

    // Tags were created and linked on first use
    let tagged = server.get("/tag/rust").await;
    tagged.assert_status_ok();
    assert!(tagged.text().contains("Fresh Off The Desk"));
}

#[tokio::test]
async fn test_admin_sees_drafts_and_can_publish() {
    let (server, state) = setup().await;
    let (alice, _, _) = signed_in(&state, "alice").await;
    let draft = seed_review(
        &state.db,
        alice.id,
        "Waiting Room",
        "waiting-room",
        ReviewStatus::Draft,
        day(2024, 9, 1),
    )
    .await;
    let (cookie, csrf) = admin_session(&state).await;

    let listing = server
        .get("/admin/reviews")
        .add_header(header::COOKIE, cookie_header(&cookie))
        .await;
    listing.assert_status_ok();
    assert!(listing.text().contains("Waiting Room"));

    let publish = server
        .post(&format!("/admin/reviews/{}/edit", draft.id))
        .add_header(header::COOKIE, cookie_header(&cookie))
        .form(&[
            ("title", "Waiting Room"),
            ("slug", "waiting-room"),
            ("body", "Waiting Room body text"),
            ("status", "PB"),
            ("tags", ""),
            ("csrf_token", csrf.as_str()),
        ])
        .await;
    publish.assert_status(StatusCode::SEE_OTHER);

    let updated = review::Entity::find_by_id(draft.id)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, ReviewStatus::Published);
    assert_eq!(updated.created_on, draft.created_on);
    assert!(updated.updated_on > draft.updated_on);

    server
        .get("/2024/09/01/waiting-room")
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_admin_toggles_discussion_visibility() {
    let (server, state) = setup().await;
    let (alice, _, _) = signed_in(&state, "alice").await;
    let r = seed_review(
        &state.db,
        alice.id,
        "Toggled",
        "toggled",
        ReviewStatus::Published,
        day(2024, 9, 2),
    )
    .await;
    let d = seed_discussion(&state.db, r.id, alice.id, "borderline entry", true).await;
    let (cookie, csrf) = admin_session(&state).await;

    let toggle = server
        .post(&format!("/admin/discussions/{}/toggle", d.id))
        .add_header(header::COOKIE, cookie_header(&cookie))
        .form(&[("csrf_token", csrf.as_str())])
        .await;
    toggle.assert_status(StatusCode::SEE_OTHER);

    let hidden = discussion::Entity::find_by_id(d.id)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert!(!hidden.is_active);

    // Hidden from the public page, still present in the record set
    let detail = server.get("/2024/09/02/toggled").await;
    assert!(!detail.text().contains("borderline entry"));
    assert_eq!(discussion_count(&state.db, r.id).await, 1);
}
