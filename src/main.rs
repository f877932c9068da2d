use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use apoteka::config::Settings;
use apoteka::routes::{self, AppState};
use apoteka::services::{CityDirectory, CitySource, PharmacyApiClient};
use apoteka::sync::SyncOrchestrator;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn io_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration before logging so the [logging] section applies
    let settings = Settings::load().map_err(|e| io_error("Configuration error", e))?;

    // Initialize logging, LOG_LEVEL / LOG_FORMAT still win
    let logging = settings.logging.clone().with_env_overrides();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&logging.level))
        .with_target(false)
        .with_level(true);

    if logging.is_pretty() {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }

    info!("Starting Apoteka service...");
    info!("Configuration loaded successfully");

    let api = Arc::new(
        PharmacyApiClient::new(
            settings.upstream.base_url.clone(),
            settings.upstream.admin_key.clone(),
            Duration::from_secs(settings.upstream.timeout_secs),
        )
        .map_err(|e| io_error("HTTP client error", e))?,
    );

    info!("Pharmacy API client initialized ({})", settings.upstream.base_url);

    let directory = Arc::new(
        CityDirectory::new(
            Some(api.clone() as Arc<dyn CitySource>),
            Duration::from_secs(settings.directory.ttl_secs),
        )
        .map_err(|e| {
            error!("Failed to load city directory: {}", e);
            io_error("City directory error", e)
        })?,
    );

    info!("City directory initialized (TTL: {}s)", settings.directory.ttl_secs);

    let sync_options = settings.sync.options();
    let orchestrator = Arc::new(SyncOrchestrator::new(api.clone(), sync_options));

    info!("Sync orchestrator initialized with options: {:?}", sync_options);

    if settings.admin.api_key.is_empty() {
        tracing::warn!("No admin key configured, admin routes are disabled");
    }

    // Build application state
    let app_state = AppState {
        api,
        directory,
        orchestrator,
        region: settings.region.home_region(),
        default_origin: settings.geolocation.default_origin(),
        admin_key: settings.admin.api_key.clone(),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
