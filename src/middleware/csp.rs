use crate::core::config::CspConfig;
use crate::error::RouteError;
use crate::middleware::extensions::RequestId;
use crate::security::headers::SecurityHeaders;
use actix_service::{Service, Transform};
use actix_web::{
    dev::{forward_ready, ServiceRequest, ServiceResponse},
    web::{self, Data},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::{rc::Rc, sync::Arc};
use uuid::Uuid;

/// Assigns every request a fresh nonce, stores it in the request extensions
/// for handlers and templates, and attaches the security headers carrying
/// that same nonce to the response.
#[derive(Clone)]
pub struct NonceMiddleware {
    config: Arc<CspConfig>,
}

impl NonceMiddleware {
    #[inline]
    pub fn new(config: CspConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for NonceMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = NonceMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(NonceMiddlewareService {
            service: Rc::new(service),
            config: self.config.clone(),
        }))
    }
}

pub struct NonceMiddlewareService<S> {
    service: Rc<S>,
    config: Arc<CspConfig>,
}

impl<S, B> Service<ServiceRequest> for NonceMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let config = self.config.clone();

        Box::pin(async move {
            let request_id = Uuid::new_v4()
                .hyphenated()
                .encode_lower(&mut Uuid::encode_buffer())
                .to_owned();

            let nonce = config.nonce_generator().generate()?;
            // Built up front so the header and the rendered page can only
            // ever see the same nonce.
            let headers = SecurityHeaders::for_request(config.policy(), &nonce)?;

            log::debug!(
                "request {} {} {} assigned nonce",
                request_id,
                req.method(),
                req.path()
            );

            req.extensions_mut().insert(RequestId(request_id.clone()));
            req.extensions_mut().insert(nonce);

            match service.call(req).await {
                Ok(mut res) => {
                    if let Some(route_error) = res
                        .response()
                        .error()
                        .and_then(|e| e.as_error::<RouteError>())
                    {
                        log_route_error(&request_id, route_error);
                    }
                    headers.apply(res.headers_mut());
                    Ok(res)
                }
                Err(err) => {
                    if let Some(route_error) = err.as_error::<RouteError>() {
                        log_route_error(&request_id, route_error);
                        return Err(route_error.clone().into());
                    }
                    Err(err)
                }
            }
        })
    }
}

fn log_route_error(request_id: &str, error: &RouteError) {
    log::error!(
        "Route error response: {} {} (request {})",
        error.status().as_u16(),
        error.status_text(),
        request_id
    );
}

/// Shares the config with handlers so they can render with the same
/// environment the middleware uses.
pub fn configure_csp(config: CspConfig) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(Data::new(config));
    }
}
