use std::env;

use actix_cors::Cors;
use actix_web::http::header;

/// CORS policy for browser clients.
///
/// Origins come from `CORS_ALLOWED_ORIGINS` (comma-separated); with nothing
/// valid configured, only localhost development origins are allowed. The
/// `Authorization` response header is exposed because login returns the
/// token there.
pub fn cors_middleware() -> Cors {
    let configured = env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default();
    let origins = parse_origins(&configured);

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .expose_headers(vec![
            header::AUTHORIZATION,
            header::HeaderName::from_static("x-trace-id"),
            header::HeaderName::from_static("x-request-id"),
        ])
        .max_age(3600);

    for origin in &origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}

/// Split and lightly validate the configured origin list; empty, "null",
/// and non-http(s) entries are dropped. Falls back to localhost dev origins
/// when nothing survives.
fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
        .collect();

    if origins.is_empty() {
        vec![
            "http://localhost:3000".to_string(),
            "http://127.0.0.1:3000".to_string(),
        ]
    } else {
        origins
    }
}

#[cfg(test)]
mod tests {
    use super::parse_origins;

    #[test]
    fn configured_origins_are_kept() {
        let origins = parse_origins("https://app.gatehouse.dev, http://localhost:3000");
        assert_eq!(
            origins,
            vec!["https://app.gatehouse.dev", "http://localhost:3000"]
        );
    }

    #[test]
    fn junk_entries_are_dropped() {
        let origins = parse_origins("null, ftp://x, ,https://ok.example");
        assert_eq!(origins, vec!["https://ok.example"]);
    }

    #[test]
    fn empty_config_falls_back_to_localhost() {
        let origins = parse_origins("");
        assert!(origins.iter().all(|o| o.contains("localhost") || o.contains("127.0.0.1")));
    }
}
