use actix_web::middleware::{NormalizePath, TrailingSlash};
use actix_web::{http::header, http::StatusCode, test, web, App};
use serde_json::{json, Value};

use blog_service::db::MemoryStore;
use blog_service::services::AuthService;
use blog_service::{routes, AppState};

const PASSWORD: &str = "correct horse battery staple";

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .wrap(NormalizePath::new(TrailingSlash::Always))
                .configure(routes::configure),
        )
        .await
    };
}

struct Fixture {
    store: MemoryStore,
    state: AppState,
    alice: String,
    bob: String,
}

async fn fixture() -> Fixture {
    let store = MemoryStore::new();
    let state = AppState::memory(store.clone());
    let auth = AuthService::new(state.credentials.clone());

    auth.create_user("alice", PASSWORD).await.unwrap();
    auth.create_user("bob", PASSWORD).await.unwrap();
    let alice = auth.issue_token(Some("alice"), Some(PASSWORD)).await.unwrap();
    let bob = auth.issue_token(Some("bob"), Some(PASSWORD)).await.unwrap();

    Fixture {
        store,
        state,
        alice,
        bob,
    }
}

fn auth(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Token {}", token))
}

#[actix_web::test]
async fn test_author_scoped_writes_and_publication_visibility() {
    let fx = fixture().await;
    let app = init_app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/")
        .insert_header(auth(&fx.alice))
        .set_json(json!({"title": "Hello", "body": "First draft"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let post: Value = test::read_body_json(resp).await;
    assert_eq!(post["author"], "alice");
    assert_eq!(post["is_published"], false);
    let post_id = post["id"].as_i64().unwrap();

    // Anonymous readers do not see drafts
    let req = test::TestRequest::get().uri("/api/v1/posts/").to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list.as_array().unwrap().len(), 0);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/posts/{}/", post_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Any authenticated user does
    let req = test::TestRequest::get()
        .uri("/api/v1/posts/")
        .insert_header(auth(&fx.bob))
        .to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    // Bob cannot change Alice's post
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/posts/{}/", post_id))
        .insert_header(auth(&fx.bob))
        .set_json(json!({"title": "Hijacked"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/posts/{}/", post_id))
        .insert_header(auth(&fx.bob))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Alice publishes it
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/posts/{}/", post_id))
        .insert_header(auth(&fx.alice))
        .set_json(json!({"is_published": true}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["is_published"], true);
    assert_eq!(updated["title"], "Hello");

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/posts/{}/", post_id))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["title"], "Hello");
    assert_eq!(fetched["author"], "alice");
}

#[actix_web::test]
async fn test_author_is_taken_from_token() {
    let fx = fixture().await;
    let app = init_app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/")
        .insert_header(auth(&fx.alice))
        .set_json(json!({"title": "Mine", "body": "text", "author": "bob"}))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(post["author"], "alice");

    // Changing the author through an update is not possible either
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/posts/{}/", post["id"]))
        .insert_header(auth(&fx.alice))
        .set_json(json!({"title": "Mine", "body": "new text", "author": "bob"}))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(post["author"], "alice");
    assert_eq!(post["body"], "new text");
}

#[actix_web::test]
async fn test_put_requires_title_and_body() {
    let fx = fixture().await;
    let app = init_app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/")
        .insert_header(auth(&fx.alice))
        .set_json(json!({"title": "T", "body": "B"}))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/posts/{}/", post["id"]))
        .insert_header(auth(&fx.alice))
        .set_json(json!({"title": "Only title"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_post_field_validation() {
    let fx = fixture().await;
    let app = init_app!(fx.state);

    for body in [
        json!({"title": "   ", "body": "text"}),
        json!({"title": "x".repeat(201), "body": "text"}),
        json!({"title": "ok", "body": ""}),
        json!({"body": "missing title"}),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/v1/posts/")
            .insert_header(auth(&fx.alice))
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/")
        .insert_header(auth(&fx.alice))
        .set_json(json!({"title": "x".repeat(200), "body": "text"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let fx = fixture().await;
    let app = init_app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/")
        .insert_header(auth(&fx.alice))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_posts_listed_newest_first() {
    let fx = fixture().await;
    let app = init_app!(fx.state);

    for title in ["first", "second", "third"] {
        let req = test::TestRequest::post()
            .uri("/api/v1/posts/")
            .insert_header(auth(&fx.alice))
            .set_json(json!({"title": title, "body": "b", "is_published": true}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get().uri("/api/v1/posts/").to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    let titles: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
}

#[actix_web::test]
async fn test_path_without_trailing_slash_is_routed() {
    let fx = fixture().await;
    let app = init_app!(fx.state);

    let req = test::TestRequest::get().uri("/api/v1/posts").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_unknown_and_non_numeric_ids_are_not_found() {
    let fx = fixture().await;
    let app = init_app!(fx.state);

    for uri in [
        "/api/v1/posts/999/",
        "/api/v1/posts/abc/",
        "/api/v1/comments/999/",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
    }

    let req = test::TestRequest::delete()
        .uri("/api/v1/posts/999/")
        .insert_header(auth(&fx.alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_writes_require_authentication() {
    let fx = fixture().await;
    let app = init_app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/")
        .set_json(json!({"title": "Anon", "body": "text"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Token"
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/comments/")
        .set_json(json!({"post": 1, "body": "text"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_invalid_token_rejected_even_on_reads() {
    let fx = fixture().await;
    let app = init_app!(fx.state);

    for value in [
        "Token not-a-real-token",
        "Token",
        "Token two parts",
        "Basic abc",
    ] {
        let req = test::TestRequest::get()
            .uri("/api/v1/posts/")
            .insert_header((header::AUTHORIZATION, value))
            .to_request();
        // Rejected by the auth middleware before any handler runs
        let err = test::try_call_service(&app, req).await.unwrap_err();
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", value);
        assert_eq!(resp.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Token");
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/posts/")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", fx.alice)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_inactive_user_token_rejected() {
    let fx = fixture().await;
    let app = init_app!(fx.state);

    let bob = fx
        .state
        .credentials
        .find_user_by_username("bob")
        .await
        .unwrap()
        .unwrap();
    fx.store.set_user_active(bob.id, false).await.unwrap();

    let req = test::TestRequest::get()
        .uri("/api/v1/posts/")
        .insert_header(auth(&fx.bob))
        .to_request();
    let err = test::try_call_service(&app, req).await.unwrap_err();
    assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/token/")
        .set_json(json!({"username": "bob", "password": PASSWORD}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_token_issuance_is_idempotent() {
    let fx = fixture().await;
    let app = init_app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/token/")
        .set_json(json!({"username": "alice", "password": PASSWORD}))
        .to_request();
    let first: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(first["token"], fx.alice.as_str());

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/token/")
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload("username=alice&password=correct+horse+battery+staple")
        .to_request();
    let second: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(first, second);
}

#[actix_web::test]
async fn test_bad_credentials_are_indistinguishable() {
    let fx = fixture().await;
    let app = init_app!(fx.state);

    let mut bodies = Vec::new();
    for payload in [
        json!({"username": "alice", "password": "wrong"}),
        json!({"username": "nobody", "password": PASSWORD}),
        json!({"username": "alice"}),
        json!({}),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/token/")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        bodies.push(body);
    }

    assert!(bodies.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(bodies[0]["error"], "Unable to log in with provided credentials");
}

#[actix_web::test]
async fn test_only_approved_comments_are_visible() {
    let fx = fixture().await;
    let app = init_app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/")
        .insert_header(auth(&fx.alice))
        .set_json(json!({"title": "T", "body": "B", "is_published": true}))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let post_id = post["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/comments/")
        .insert_header(auth(&fx.bob))
        .set_json(json!({"post": post_id, "body": "pending"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let pending: Value = test::read_body_json(resp).await;
    assert_eq!(pending["author"], "bob");
    assert_eq!(pending["post"], post_id);
    assert_eq!(pending["is_approved"], false);

    let req = test::TestRequest::post()
        .uri("/api/v1/comments/")
        .insert_header(auth(&fx.bob))
        .set_json(json!({"post": post_id, "body": "visible", "is_approved": true}))
        .to_request();
    let approved: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::get().uri("/api/v1/comments/").to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["body"], "visible");

    // Unapproved comments are hidden from their author too
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/comments/{}/", pending["id"]))
        .insert_header(auth(&fx.bob))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/comments/{}/", pending["id"]))
        .insert_header(auth(&fx.bob))
        .set_json(json!({"body": "edit"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/comments/{}/", approved["id"]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_comment_post_filter() {
    let fx = fixture().await;
    let app = init_app!(fx.state);

    let mut post_ids = Vec::new();
    for title in ["one", "two"] {
        let req = test::TestRequest::post()
            .uri("/api/v1/posts/")
            .insert_header(auth(&fx.alice))
            .set_json(json!({"title": title, "body": "B", "is_published": true}))
            .to_request();
        let post: Value = test::call_and_read_body_json(&app, req).await;
        post_ids.push(post["id"].as_i64().unwrap());
    }

    let mut comment_ids = Vec::new();
    for post_id in &post_ids {
        let req = test::TestRequest::post()
            .uri("/api/v1/comments/")
            .insert_header(auth(&fx.alice))
            .set_json(json!({"post": post_id, "body": "c", "is_approved": true}))
            .to_request();
        let comment: Value = test::call_and_read_body_json(&app, req).await;
        comment_ids.push(comment["id"].as_i64().unwrap());
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/comments/?post={}", post_ids[1]))
        .to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["post"], post_ids[1]);

    // An empty filter is no filter
    let req = test::TestRequest::get()
        .uri("/api/v1/comments/?post=")
        .to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list.as_array().unwrap().len(), 2);

    let req = test::TestRequest::get()
        .uri("/api/v1/comments/?post=abc")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // The filter applies to single-comment routes as well
    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/comments/{}/?post={}",
            comment_ids[0], post_ids[1]
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_comment_on_unknown_post_rejected() {
    let fx = fixture().await;
    let app = init_app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/comments/")
        .insert_header(auth(&fx.alice))
        .set_json(json!({"post": 4242, "body": "orphan"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_comment_author_scoped_updates() {
    let fx = fixture().await;
    let app = init_app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/")
        .insert_header(auth(&fx.alice))
        .set_json(json!({"title": "T", "body": "B", "is_published": true}))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/comments/")
        .insert_header(auth(&fx.bob))
        .set_json(json!({"post": post["id"], "body": "by bob", "is_approved": true}))
        .to_request();
    let comment: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/v1/comments/{}/", comment["id"]);

    // The post's author has no say over other people's comments
    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(auth(&fx.alice))
        .set_json(json!({"body": "rewritten", "is_approved": true}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(auth(&fx.bob))
        .set_json(json!({"body": " rewritten ", "is_approved": true}))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["body"], "rewritten");
    assert_eq!(updated["post"], post["id"]);

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(auth(&fx.bob))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_deleting_post_removes_its_comments() {
    let fx = fixture().await;
    let app = init_app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/")
        .insert_header(auth(&fx.alice))
        .set_json(json!({"title": "T", "body": "B", "is_published": true}))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/comments/")
        .insert_header(auth(&fx.bob))
        .set_json(json!({"post": post["id"], "body": "c", "is_approved": true}))
        .to_request();
    let comment: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/posts/{}/", post["id"]))
        .insert_header(auth(&fx.alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/posts/{}/", post["id"]))
        .insert_header(auth(&fx.alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/comments/{}/", comment["id"]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_health_reports_ok() {
    let fx = fixture().await;
    let app = init_app!(fx.state);

    let req = test::TestRequest::get().uri("/api/v1/health/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_non_author_writes_are_forbidden_and_change_nothing() {
    let fx = fixture().await;
    let app = init_app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/")
        .insert_header(auth(&fx.alice))
        .set_json(json!({"title": "Alice's", "body": "original", "is_published": true}))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let post_uri = format!("/api/v1/posts/{}/", post["id"]);

    let req = test::TestRequest::post()
        .uri("/api/v1/comments/")
        .insert_header(auth(&fx.alice))
        .set_json(json!({"post": post["id"], "body": "by alice", "is_approved": true}))
        .to_request();
    let comment: Value = test::call_and_read_body_json(&app, req).await;
    let comment_uri = format!("/api/v1/comments/{}/", comment["id"]);

    let post_writes = [
        test::TestRequest::put()
            .uri(&post_uri)
            .set_json(json!({"title": "Bob's now", "body": "replaced"})),
        test::TestRequest::patch()
            .uri(&post_uri)
            .set_json(json!({"title": "Bob's now"})),
        test::TestRequest::delete().uri(&post_uri),
    ];
    for write in post_writes {
        let req = write.insert_header(auth(&fx.bob)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    let comment_writes = [
        test::TestRequest::put()
            .uri(&comment_uri)
            .set_json(json!({"body": "replaced", "is_approved": true})),
        test::TestRequest::patch()
            .uri(&comment_uri)
            .set_json(json!({"body": "edited"})),
        test::TestRequest::delete().uri(&comment_uri),
    ];
    for write in comment_writes {
        let req = write.insert_header(auth(&fx.bob)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    let req = test::TestRequest::get().uri(&post_uri).to_request();
    let after: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(after, post);

    let req = test::TestRequest::get().uri(&comment_uri).to_request();
    let after: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(after, comment);
}

#[actix_web::test]
async fn test_explicit_null_fields_rejected() {
    let fx = fixture().await;
    let app = init_app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/")
        .insert_header(auth(&fx.alice))
        .set_json(json!({"title": "Keep me", "body": "B", "is_published": true}))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let post_uri = format!("/api/v1/posts/{}/", post["id"]);

    for body in [json!({"title": null}), json!({"is_published": null})] {
        let req = test::TestRequest::patch()
            .uri(&post_uri)
            .insert_header(auth(&fx.alice))
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/comments/")
        .insert_header(auth(&fx.alice))
        .set_json(json!({"post": post["id"], "body": "c", "is_approved": true}))
        .to_request();
    let comment: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/comments/{}/", comment["id"]))
        .insert_header(auth(&fx.alice))
        .set_json(json!({"body": null}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri(&post_uri).to_request();
    let after: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(after["title"], "Keep me");
    assert_eq!(after["is_published"], true);
}
