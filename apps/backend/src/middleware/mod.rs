pub mod auth_gate;
pub mod cors;
pub mod request_trace;
pub mod structured_logger;

pub use auth_gate::RequireAuth;
pub use cors::cors_middleware;
pub use request_trace::RequestTrace;
pub use structured_logger::StructuredLogger;
