//! One structured log line per completed request.
//!
//! Runs inside the `RequestTrace` scope, so the trace id comes from the
//! task-local context. Rejections that surface as service errors are logged
//! with the status their response will carry.

use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::{error, info, warn};

use crate::trace_ctx;

pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let method = req.method().to_string();
        let path = req.path().to_string();
        let started = Instant::now();

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            let status = match &result {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            let code = status.as_u16();
            let duration_us = started.elapsed().as_micros() as u64;
            let trace_id = trace_ctx::trace_id();

            if status.is_server_error() {
                error!(
                    http.method = %method,
                    url.path = %path,
                    http.status_code = code,
                    duration_us,
                    %trace_id,
                    "request_completed"
                );
            } else if status.is_client_error() {
                warn!(
                    http.method = %method,
                    url.path = %path,
                    http.status_code = code,
                    duration_us,
                    %trace_id,
                    "request_completed"
                );
            } else {
                info!(
                    http.method = %method,
                    url.path = %path,
                    http.status_code = code,
                    duration_us,
                    %trace_id,
                    "request_completed"
                );
            }

            result
        })
    }
}
