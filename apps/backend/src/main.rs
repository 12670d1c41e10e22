use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use actix_web::{web, App, HttpServer};
use backend::auth::directory::{InMemoryDirectory, SeedUser, UserDirectory};
use backend::auth::revocation::RevocationRegistry;
use backend::middleware::cors::cors_middleware;
use backend::middleware::request_trace::RequestTrace;
use backend::middleware::structured_logger::StructuredLogger;
use backend::routes;
use backend::state::app_state::AppState;
use backend::state::security_config::SecurityConfig;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "8000".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("❌ BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        });

    // The signing key has no default anywhere in code; a missing key is
    // startup-fatal, never a silent weak fallback.
    let jwt = match std::env::var("BACKEND_JWT_SECRET") {
        Ok(jwt) => jwt,
        Err(_) => {
            eprintln!("❌ BACKEND_JWT_SECRET must be set");
            std::process::exit(1);
        }
    };
    let mut security_config = SecurityConfig::new(jwt.as_bytes());

    if let Ok(raw_ttl) = std::env::var("BACKEND_TOKEN_TTL_SECS") {
        let ttl = raw_ttl.parse::<i64>().ok().filter(|t| *t > 0);
        match ttl {
            Some(ttl) => security_config = security_config.with_ttl_secs(ttl),
            None => {
                eprintln!("❌ BACKEND_TOKEN_TTL_SECS must be a positive integer");
                std::process::exit(1);
            }
        }
    }

    // Seed the in-memory user directory from BACKEND_USERS (JSON array of
    // {email, password, sub?, role?, enabled?}).
    let directory: Arc<dyn UserDirectory> = match std::env::var("BACKEND_USERS") {
        Ok(raw) => {
            let seed: Vec<SeedUser> = match serde_json::from_str(&raw) {
                Ok(seed) => seed,
                Err(e) => {
                    eprintln!("❌ BACKEND_USERS is not valid JSON: {e}");
                    std::process::exit(1);
                }
            };
            println!("✅ Seeded {} directory entries", seed.len());
            Arc::new(InMemoryDirectory::from_seed(seed))
        }
        Err(_) => {
            println!("⚠️  BACKEND_USERS not set; directory is empty, every login will fail");
            Arc::new(InMemoryDirectory::new())
        }
    };

    let revocations = Arc::new(RevocationRegistry::with_max_ttl(
        security_config.access_ttl_secs,
    ));

    // Background housekeeping: expired revocation entries are dropped once
    // expiry alone would reject their tokens.
    let pruner_registry = Arc::clone(&revocations);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs() as i64)
                .unwrap_or(0);
            pruner_registry.prune(now);
        }
    });

    let app_state = AppState::new(security_config, directory, revocations);

    println!("🚀 Starting Gatehouse backend on http://{}:{}", host, port);

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .app_data(routes::json_config())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
