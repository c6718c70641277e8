use actix_web::{middleware::Logger, HttpServer};
use csp_nonce::{routes, CspConfigBuilder, Environment};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let environment = Environment::from_env();
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned());
    let config = CspConfigBuilder::new()
        .environment(environment)
        .try_build()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    log::info!(
        "serving CSP nonce demo on http://{} ({:?}, {} header)",
        bind_addr,
        environment,
        config.header_name()
    );

    HttpServer::new(move || routes::app(config.clone()).wrap(Logger::default()))
        .bind(bind_addr)?
        .run()
        .await
}
