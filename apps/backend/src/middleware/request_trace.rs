//! Trace-id middleware.
//!
//! Assigns each request a trace id, runs the rest of the pipeline inside the
//! matching `trace_ctx` scope, and echoes the id back as `x-request-id`.
//! A caller-supplied `x-request-id` is honored when it is a well-formed
//! UUID; anything else is replaced rather than propagated. Wire this
//! outermost so error responses and audit events carry the same id.

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::Error;
use futures_util::future::{ready, LocalBoxFuture, Ready};
use uuid::Uuid;

use crate::trace_ctx;

fn request_id_header() -> HeaderName {
    HeaderName::from_static("x-request-id")
}

pub struct RequestTrace;

impl<S, B> Transform<S, ServiceRequest> for RequestTrace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestTraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTraceMiddleware { service }))
    }
}

pub struct RequestTraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestTraceMiddleware<S>
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
        let trace_id = incoming_request_id(&req).unwrap_or_else(|| Uuid::new_v4().to_string());

        let fut = self.service.call(req);

        Box::pin(trace_ctx::with_trace_id(trace_id.clone(), async move {
            let mut res = fut.await?;

            if let Ok(value) = HeaderValue::from_str(&trace_id) {
                res.headers_mut().insert(request_id_header(), value);
            }

            Ok(res)
        }))
    }
}

/// Accept a caller-provided request id only if it is a UUID; free-form
/// values would end up verbatim in logs and response headers.
fn incoming_request_id(req: &ServiceRequest) -> Option<String> {
    let value = req.headers().get(request_id_header())?.to_str().ok()?;
    Uuid::parse_str(value).ok().map(|id| id.to_string())
}
