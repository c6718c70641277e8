use crate::client::ClientNonce;
use crate::core::config::CspConfig;
use crate::error::{CspError, RouteError};
use crate::middleware::csp::NonceMiddleware;
#[cfg(feature = "reporting")]
use crate::middleware::reporting::configure_csp_reporting;
use crate::render::{pages, render_route, CLIENT_ENTRY};
use actix_service::ServiceFactory;
use actix_web::{
    dev::{ServiceRequest, ServiceResponse},
    error::ErrorInternalServerError,
    http::StatusCode,
    http::header::{HeaderValue, CONTENT_TYPE},
    web::{self, Data},
    App, HttpRequest, HttpResponse,
};

const CLIENT_ENTRY_JS: &str = include_str!("../assets/entry.client.js");

pub async fn index(
    req: HttpRequest,
    config: Data<CspConfig>,
) -> Result<HttpResponse, CspError> {
    // The server never renders hydrated output.
    let client = ClientNonce::new(None);
    let body = pages::welcome(&client).map_err(actix_web::Error::from);
    render_route(&req, config.environment(), body)
}

/// The module script every page loads.
pub async fn client_entry() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((
            CONTENT_TYPE,
            HeaderValue::from_static("text/javascript; charset=utf-8"),
        ))
        .body(CLIENT_ENTRY_JS)
}

/// A routed failure with a status of its own.
pub async fn boom(
    req: HttpRequest,
    config: Data<CspConfig>,
) -> Result<HttpResponse, CspError> {
    let error = RouteError::new(StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable");
    render_route(&req, config.environment(), Err(error.into()))
}

/// An unexpected failure; details are only shown in development.
pub async fn crash(
    req: HttpRequest,
    config: Data<CspConfig>,
) -> Result<HttpResponse, CspError> {
    let error = ErrorInternalServerError("loader failed: upstream closed the connection");
    render_route(&req, config.environment(), Err(error))
}

pub async fn not_found(
    req: HttpRequest,
    config: Data<CspConfig>,
) -> Result<HttpResponse, CspError> {
    render_route(&req, config.environment(), Err(RouteError::not_found().into()))
}

/// The demo application: nonce middleware around the demo routes, the
/// violation report endpoint, and a 404 fallback rendered through the error
/// boundary.
pub fn app(
    config: CspConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new().wrap(NonceMiddleware::new(config.clone()));
    #[cfg(feature = "reporting")]
    let app = app.configure(configure_csp_reporting(&config));

    app.app_data(Data::new(config))
        .route("/", web::get().to(index))
        .route(CLIENT_ENTRY, web::get().to(client_entry))
        .route("/boom", web::get().to(boom))
        .route("/crash", web::get().to(crash))
        .default_service(web::to(not_found))
}
