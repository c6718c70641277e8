mod common;

use actix_web::{
    dev::{Service, ServiceResponse},
    error::{ErrorInternalServerError, InternalError},
    http::StatusCode,
    test, web, App, HttpRequest, HttpResponse,
};
use actix_web::web::Data;
use csp_nonce::{
    configure_csp, render::extract_payload, routes, use_nonce, CspConfig, CspConfigBuilder,
    CspExtensions, CspPolicyBuilder, Environment, NonceMiddleware, RequestNonce, RouteError,
    Source,
};
use serde_json::json;
use std::collections::HashSet;

async fn echo_nonce(req: HttpRequest) -> HttpResponse {
    HttpResponse::Ok().body(req.get_nonce().unwrap_or_default())
}

async fn extract_nonce(nonce: RequestNonce) -> HttpResponse {
    HttpResponse::Ok().body(nonce.into_inner())
}

async fn optional_nonce(nonce: Option<RequestNonce>) -> HttpResponse {
    HttpResponse::Ok().body(if nonce.is_some() { "some" } else { "none" })
}

#[actix_web::test]
async fn production_sets_enforcing_header_and_protections() {
    let app = test::init_service(routes::app(common::config(Environment::Production))).await;
    let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
    let headers = res.headers();
    assert!(headers.contains_key("content-security-policy"));
    assert!(!headers.contains_key("content-security-policy-report-only"));
    assert_eq!(headers.get("strict-transport-security").unwrap(), "max-age=3600");
    assert_eq!(headers.get("x-frame-options").unwrap(), "SAMEORIGIN");
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
}

#[actix_web::test]
async fn development_reports_only() {
    let app = test::init_service(routes::app(common::config(Environment::Development))).await;
    let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    let headers = res.headers();
    assert!(!headers.contains_key("content-security-policy"));
    let policy = headers
        .get("content-security-policy-report-only")
        .unwrap()
        .to_str()
        .unwrap();
    if cfg!(feature = "reporting") {
        assert!(policy.contains("report-uri /csp-report"));
    }
}

#[actix_web::test]
async fn custom_policy_header_follows_environment() {
    for (env, expected, absent) in [
        (
            Environment::Development,
            "content-security-policy-report-only",
            "content-security-policy",
        ),
        (
            Environment::Production,
            "content-security-policy",
            "content-security-policy-report-only",
        ),
    ] {
        // The policy asks for the opposite of what the environment wants.
        let policy = CspPolicyBuilder::new()
            .default_src([Source::Self_])
            .script_src([Source::Self_, Source::RequestNonce])
            .report_only(env.is_production())
            .build()
            .unwrap();
        let config = CspConfigBuilder::new()
            .environment(env)
            .policy(policy)
            .build();
        let app = test::init_service(
            App::new()
                .wrap(NonceMiddleware::new(config))
                .route("/", web::get().to(echo_nonce)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(res.headers().contains_key(expected), "{:?}", env);
        assert!(!res.headers().contains_key(absent), "{:?}", env);
    }
}

#[actix_web::test]
async fn zero_nonce_length_is_raised_to_the_minimum() {
    let config = CspConfigBuilder::new()
        .environment(Environment::Production)
        .with_nonce_length(0)
        .build();
    let app = test::init_service(
        App::new()
            .wrap(NonceMiddleware::new(config))
            .route("/", web::get().to(echo_nonce)),
    )
    .await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    let policy = common::csp_header(&res).unwrap();
    assert!(!policy.contains("'nonce-'"));
    // 8 random bytes, unpadded base64url.
    assert_eq!(common::nonce_in_policy(&policy).unwrap().len(), 11);
}

#[actix_web::test]
async fn header_nonce_matches_rendered_payload() {
    let app = test::init_service(routes::app(common::config(Environment::Production))).await;

    for _ in 0..5 {
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let header_nonce = common::nonce_in_policy(&common::csp_header(&res).unwrap()).unwrap();

        let body = test::read_body(res).await;
        let html = std::str::from_utf8(&body).unwrap();
        let payload = extract_payload(html).unwrap();

        assert_eq!(use_nonce(&payload).as_deref(), Some(header_nonce.as_str()));
        assert!(html.contains(&format!("<script nonce=\"{}\">", header_nonce)));
    }
}

#[actix_web::test]
async fn policy_nonce_appears_in_script_and_style_directives() {
    let app = test::init_service(routes::app(common::config(Environment::Production))).await;
    let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    let policy = common::csp_header(&res).unwrap();
    let nonce = common::nonce_in_policy(&policy).unwrap();
    let source = format!("'nonce-{}'", nonce);

    let script_src = policy.split("; ").find(|d| d.starts_with("script-src ")).unwrap();
    let style_src = policy.split("; ").find(|d| d.starts_with("style-src ")).unwrap();
    assert!(script_src.contains(&source));
    assert!(style_src.contains(&source));
}

#[actix_web::test]
async fn every_request_gets_a_fresh_nonce() {
    let app = test::init_service(
        App::new()
            .wrap(NonceMiddleware::new(common::config(Environment::Production)))
            .route("/", web::get().to(echo_nonce)),
    )
    .await;

    let mut seen = HashSet::new();
    for _ in 0..200 {
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let header_nonce = common::nonce_in_policy(&common::csp_header(&res).unwrap()).unwrap();
        let body = test::read_body(res).await;

        assert_eq!(body, header_nonce.as_bytes());
        assert!(seen.insert(header_nonce), "nonce reused across requests");
    }
}

#[actix_web::test]
async fn concurrent_requests_never_share_a_nonce() {
    let app = test::init_service(
        App::new()
            .wrap(NonceMiddleware::new(common::config(Environment::Production)))
            .route("/", web::get().to(echo_nonce)),
    )
    .await;

    let requests = (0..64).map(|_| test::call_service(&app, test::TestRequest::get().uri("/").to_request()));
    let responses = futures::future::join_all(requests).await;

    let mut seen = HashSet::new();
    for res in responses {
        let nonce = common::nonce_in_policy(&common::csp_header(&res).unwrap()).unwrap();
        assert!(seen.insert(nonce));
    }
    assert_eq!(seen.len(), 64);
}

#[actix_web::test]
async fn nonce_extractor_reads_request_scope() {
    let app = test::init_service(
        App::new()
            .wrap(NonceMiddleware::new(common::config(Environment::Production)))
            .route("/", web::get().to(extract_nonce)),
    )
    .await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    let header_nonce = common::nonce_in_policy(&common::csp_header(&res).unwrap()).unwrap();
    let body = test::read_body(res).await;
    assert_eq!(body, header_nonce.as_bytes());
}

#[actix_web::test]
async fn extractor_without_middleware_fails_but_option_does_not() {
    let app = test::init_service(
        App::new()
            .route("/required", web::get().to(extract_nonce))
            .route("/optional", web::get().to(optional_nonce)),
    )
    .await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/required").to_request()).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let res = test::call_service(&app, test::TestRequest::get().uri("/optional").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(test::read_body(res).await, "none");
}

#[actix_web::test]
async fn error_responses_still_carry_security_headers() {
    let app = test::init_service(routes::app(common::config(Environment::Production))).await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/missing").to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().contains_key("content-security-policy"));
    assert_eq!(res.headers().get("x-frame-options").unwrap(), "SAMEORIGIN");

    let res = test::call_service(&app, test::TestRequest::get().uri("/boom").to_request()).await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(res.headers().contains_key("content-security-policy"));
}

#[actix_web::test]
async fn handler_headers_are_overridden() {
    async fn permissive() -> HttpResponse {
        HttpResponse::Ok()
            .insert_header(("content-security-policy", "default-src *"))
            .insert_header(("x-frame-options", "ALLOWALL"))
            .finish()
    }

    let app = test::init_service(
        App::new()
            .wrap(NonceMiddleware::new(common::config(Environment::Production)))
            .route("/", web::get().to(permissive)),
    )
    .await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    let policy = common::csp_header(&res).unwrap();
    assert!(policy.starts_with("default-src 'self'"));
    assert_eq!(res.headers().get("x-frame-options").unwrap(), "SAMEORIGIN");
}

#[actix_web::test]
async fn configure_csp_shares_config_with_handlers() {
    async fn env_name(config: Data<CspConfig>) -> HttpResponse {
        HttpResponse::Ok().body(format!("{:?}", config.environment()))
    }

    let config = common::config(Environment::Production);
    let app = test::init_service(
        App::new()
            .wrap(NonceMiddleware::new(config.clone()))
            .configure(configure_csp(config))
            .route("/", web::get().to(env_name)),
    )
    .await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(test::read_body(res).await, "Production");
}

async fn call_for_error<S>(app: &S) -> actix_web::Error
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    match app.call(test::TestRequest::get().uri("/").to_request()).await {
        Ok(res) => panic!("expected an error, got {}", res.status()),
        Err(err) => err,
    }
}

#[actix_web::test]
async fn routed_error_is_reraised_with_its_data() {
    let app = test::init_service(
        App::new()
            .wrap_fn(|_req, _srv| async {
                Err::<ServiceResponse, actix_web::Error>(
                    RouteError::new(StatusCode::IM_A_TEAPOT, "I'm a teapot")
                        .with_data(json!({ "k": 1 }))
                        .into(),
                )
            })
            .wrap(NonceMiddleware::new(common::config(Environment::Production)))
            .route("/", web::get().to(echo_nonce)),
    )
    .await;

    let err = call_for_error(&app).await;
    let route_error = err.as_error::<RouteError>().unwrap();
    assert_eq!(route_error.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(route_error.status_text(), "I'm a teapot");
    assert_eq!(route_error.data(), &json!({ "k": 1 }));
    assert_eq!(err.as_response_error().status_code(), StatusCode::IM_A_TEAPOT);
}

#[actix_web::test]
async fn other_errors_pass_through_unchanged() {
    let app = test::init_service(
        App::new()
            .wrap_fn(|_req, _srv| async {
                Err::<ServiceResponse, actix_web::Error>(ErrorInternalServerError("db down"))
            })
            .wrap(NonceMiddleware::new(common::config(Environment::Production)))
            .route("/", web::get().to(echo_nonce)),
    )
    .await;

    let err = call_for_error(&app).await;
    assert!(err.as_error::<RouteError>().is_none());
    assert!(err.as_error::<InternalError<&'static str>>().is_some());
    assert_eq!(err.to_string(), "db down");
    assert_eq!(
        err.as_response_error().status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[actix_web::test]
async fn client_entry_is_served_with_security_headers() {
    let app = test::init_service(routes::app(common::config(Environment::Production))).await;
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(csp_nonce::render::CLIENT_ENTRY)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "text/javascript; charset=utf-8"
    );
    assert!(res.headers().contains_key("content-security-policy"));
    let body = test::read_body(res).await;
    assert!(std::str::from_utf8(&body).unwrap().contains("__RENDER_CONTEXT__"));
}
