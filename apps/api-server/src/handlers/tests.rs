use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web};
use async_trait::async_trait;
use serde_json::{Value, json};

use animoshi_core::ports::{ChallengeScore, HumanVerifier, VerifierError};
use animoshi_core::services::{InteractionService, Repositories};
use animoshi_infra::InMemoryStore;

use crate::middleware::client_ip::ForwardedHeaders;
use crate::middleware::cors::cors;
use crate::state::AppState;

struct StaticVerifier(f64);

#[async_trait]
impl HumanVerifier for StaticVerifier {
    async fn score(&self, _token: &str) -> Result<ChallengeScore, VerifierError> {
        Ok(ChallengeScore {
            success: true,
            score: self.0,
        })
    }
}

fn state(score: f64) -> AppState {
    let store = Arc::new(InMemoryStore::new());
    let repos = Repositories {
        posts: store.clone(),
        comments: store.clone(),
        likes: store.clone(),
        waifus: store,
    };

    AppState {
        interactions: Arc::new(InteractionService::new(
            repos,
            Arc::new(StaticVerifier(score)),
            None,
        )),
        #[cfg(feature = "rate-limit")]
        rate_limiter: Arc::new(
            animoshi_infra::InMemoryRateLimiter::new(animoshi_infra::RateLimitConfig {
                per_second: 1000,
                burst: 1000,
            })
            .unwrap(),
        ),
    }
}

macro_rules! app {
    ($score:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(state($score)))
                .configure(super::configure_routes),
        )
        .await
    };
}

const BOUNDARY: &str = "animoshi-test-boundary";

fn text_part(name: &str, value: &str) -> String {
    format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
}

fn file_part(filename: &str, content_type: &str, data: &str) -> String {
    format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n{data}\r\n"
    )
}

fn multipart_post(parts: &[String]) -> test::TestRequest {
    let mut body = parts.concat();
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    test::TestRequest::post()
        .uri("/post")
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
}

fn post_form(fields: &[(&str, &str)]) -> test::TestRequest {
    let parts: Vec<String> = fields
        .iter()
        .map(|(name, value)| text_part(name, value))
        .collect();
    multipart_post(&parts)
}

fn like_from(ip: &str, post_id: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/likePost")
        .insert_header(("X-Forwarded-For", ip))
        .set_json(json!({
            "postId": post_id,
            "userId": "someone",
            "recaptchaToken": "token"
        }))
}

#[actix_web::test]
async fn test_root_reports_ok() {
    let app = app!(0.9);

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(body, json!({ "message": "OK" }));
}

#[actix_web::test]
async fn test_post_comment_like_flow() {
    let app = app!(0.9);

    let resp = test::call_service(
        &app,
        post_form(&[
            ("title", "Hello"),
            ("content", "World"),
            ("nsfwToggle", "1"),
            ("userId", "user-1"),
            ("recaptchaToken", "token"),
        ])
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let post: Value = test::read_body_json(resp).await;
    assert_eq!(post["likes"], 0);
    assert_eq!(post["nsfw"], true);
    let post_id = post["id"].as_str().unwrap().to_string();

    let comment = test::TestRequest::post()
        .uri("/comment")
        .insert_header(("X-Forwarded-For", "1.2.3.4"))
        .set_json(json!({
            "postId": post_id,
            "userId": "user-2",
            "text": "<b>nice</b>",
            "recaptchaToken": "token"
        }))
        .to_request();
    let comment: Value = test::call_and_read_body_json(&app, comment).await;
    assert_eq!(comment["text"], "bnice/b");
    assert!(comment.get("userIp").is_none());

    let like = test::call_service(&app, like_from("1.2.3.4", &post_id).to_request()).await;
    assert_eq!(like.status(), StatusCode::OK);
    let like: Value = test::read_body_json(like).await;
    assert_eq!(like["userId"], "Anonymous");

    let repeat = test::call_service(&app, like_from("1.2.3.4", &post_id).to_request()).await;
    assert_eq!(repeat.status(), StatusCode::CONFLICT);

    let other = test::call_service(&app, like_from("5.6.7.8", &post_id).to_request()).await;
    assert_eq!(other.status(), StatusCode::OK);

    let post: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/post?id={post_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(post["likes"], 2);
    assert_eq!(post["comments"], 1);
}

#[actix_web::test]
async fn test_low_score_is_forbidden() {
    let app = app!(0.49);

    let resp = test::call_service(
        &app,
        post_form(&[("title", "Hello"), ("recaptchaToken", "token")]).to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_list_parameters_are_required_and_capped() {
    let app = app!(0.9);

    let status = |uri: &'static str| test::TestRequest::get().uri(uri).to_request();

    assert_eq!(
        test::call_service(&app, status("/posts?limit=20&offset=0")).await.status(),
        StatusCode::OK
    );
    assert_eq!(
        test::call_service(&app, status("/posts?limit=21&offset=0")).await.status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        test::call_service(&app, status("/posts?limit=5")).await.status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        test::call_service(&app, status("/posts?limit=abc&offset=0")).await.status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        test::call_service(&app, status("/postsByUserId?limit=5&offset=0")).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn test_post_count_by_user() {
    let app = app!(0.9);

    for title in ["one", "two"] {
        let resp = test::call_service(
            &app,
            post_form(&[("title", title), ("userId", "user-9"), ("recaptchaToken", "t")])
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let count: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/postCountByUserId?userId=user-9")
            .to_request(),
    )
    .await;

    assert_eq!(count, json!(2));
}

#[actix_web::test]
async fn test_unknown_and_malformed_ids() {
    let app = app!(0.9);

    let missing = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/waifu?id={}", uuid::Uuid::new_v4()))
            .to_request(),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let malformed = test::call_service(
        &app,
        test::TestRequest::get().uri("/post?id=nope").to_request(),
    )
    .await;
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(malformed).await;
    assert_eq!(body["field"], "id");
}

#[actix_web::test]
async fn test_missing_token_wins_over_form_errors() {
    let app = app!(0.9);

    let oversized = "x".repeat(20 * 1024);
    let resp = test::call_service(
        &app,
        post_form(&[("title", "Hello"), ("content", &oversized)]).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        post_form(&[("title", "Hello"), ("recaptchaToken", "token"), ("content", &oversized)])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_file_must_follow_token() {
    let app = app!(0.9);

    let early = multipart_post(&[
        text_part("title", "Hello"),
        file_part("cat.png", "image/png", "not really a png"),
        text_part("recaptchaToken", "token"),
    ]);
    let resp = test::call_service(&app, early.to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["field"], "file");

    let tokenless = multipart_post(&[
        text_part("title", "Hello"),
        file_part("cat.png", "image/png", "not really a png"),
    ]);
    let resp = test::call_service(&app, tokenless.to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Accepted in order; no media store is configured here.
    let ordered = multipart_post(&[
        text_part("title", "Hello"),
        text_part("recaptchaToken", "token"),
        file_part("cat.png", "image/png", "not really a png"),
    ]);
    let resp = test::call_service(&app, ordered.to_request()).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn test_offset_beyond_storage_range_is_rejected() {
    let app = app!(0.9);

    for uri in [
        "/posts?limit=20&offset=18446744073709551615",
        "/waifus?limit=20&offset=9223372036854775808",
    ] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["field"], "offset");
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/posts?limit=20&offset=9223372036854775807")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_untrusted_forwarding_headers_share_peer_identity() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(0.9)))
            .app_data(ForwardedHeaders { trusted: false })
            .configure(super::configure_routes),
    )
    .await;

    let post: Value = test::call_and_read_body_json(
        &app,
        post_form(&[
            ("title", "Hello"),
            ("content", "World"),
            ("userId", "user-1"),
            ("recaptchaToken", "token"),
        ])
        .to_request(),
    )
    .await;
    let post_id = post["id"].as_str().unwrap().to_string();
    let peer = "10.0.0.9:5000".parse().unwrap();

    let first = test::call_service(
        &app,
        like_from("1.2.3.4", &post_id).peer_addr(peer).to_request(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let spoofed = test::call_service(
        &app,
        like_from("5.6.7.8", &post_id).peer_addr(peer).to_request(),
    )
    .await;
    assert_eq!(spoofed.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_cors_allows_configured_origins_only() {
    let origins = vec!["http://localhost:5173".to_string()];
    let app = test::init_service(
        App::new()
            .wrap(cors(&origins))
            .app_data(web::Data::new(state(0.9)))
            .configure(super::configure_routes),
    )
    .await;

    let allowed = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/")
            .insert_header(("Origin", "http://localhost:5173"))
            .to_request(),
    )
    .await;
    assert_eq!(allowed.status(), StatusCode::OK);
    assert_eq!(
        allowed.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );

    let preflight = test::call_service(
        &app,
        test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/post")
            .insert_header(("Origin", "http://localhost:5173"))
            .insert_header(("Access-Control-Request-Method", "POST"))
            .to_request(),
    )
    .await;
    assert!(preflight.status().is_success());

    let foreign = test::try_call_service(
        &app,
        test::TestRequest::get()
            .uri("/")
            .insert_header(("Origin", "https://evil.example"))
            .to_request(),
    )
    .await;
    if let Ok(resp) = foreign {
        assert!(resp.headers().get("access-control-allow-origin").is_none());
    }
}
