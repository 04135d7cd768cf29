mod error;
mod handlers;
mod history;
mod inference;
mod models;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpResponse, HttpServer};
use log::{error, info, warn};

use history::PredictionHistory;
use inference::{RiskModel, DEFAULT_THRESHOLD};
use models::ApiResponse;

fn risk_threshold_from_env() -> f32 {
    match std::env::var("RISK_THRESHOLD") {
        Ok(raw) => match raw.parse::<f32>() {
            Ok(t) if (0.0..=1.0).contains(&t) => t,
            _ => {
                warn!(
                    "RISK_THRESHOLD '{}' is not a probability, using {}",
                    raw, DEFAULT_THRESHOLD
                );
                DEFAULT_THRESHOLD
            }
        },
        Err(_) => DEFAULT_THRESHOLD,
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let model_path = std::env::var("MODEL_PATH").unwrap_or_else(|_| "model.onnx".to_string());
    let threshold = risk_threshold_from_env();

    // The artifact is static; without it there is nothing to serve.
    let model = match RiskModel::load(&model_path, threshold) {
        Ok(model) => {
            info!("model loaded from {} (threshold={})", model_path, threshold);
            model
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let model_data = web::Data::new(model);
    let history_data = web::Data::new(PredictionHistory::default());

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_address = format!("{}:{}", host, port);

    info!("fire-risk prediction server on http://{}", bind_address);
    info!("  GET  /                    - input form");
    info!("  GET  /api/health          - liveness");
    info!("  GET  /api/model-info      - model metadata");
    info!("  POST /api/predict         - risk classification");
    info!("  GET  /api/history         - served predictions");
    info!("  GET  /api/history/export  - history as CSV");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        // Malformed bodies (bad JSON, non-numeric fields) are validation
        // failures, not server errors.
        let json_config = web::JsonConfig::default().error_handler(|err, _req| {
            let message = format!("invalid request body: {}", err);
            actix_web::error::InternalError::from_response(
                err,
                HttpResponse::BadRequest().json(ApiResponse::<()>::error(&message)),
            )
            .into()
        });

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(model_data.clone())
            .app_data(history_data.clone())
            .app_data(json_config)
            .route("/", web::get().to(handlers::index))
            .route("/api/health", web::get().to(handlers::health))
            .route("/api/model-info", web::get().to(handlers::model_info))
            .route("/api/predict", web::post().to(handlers::predict))
            .route("/api/history", web::get().to(handlers::history))
            .route("/api/history/export", web::get().to(handlers::export_history))
            .service(Files::new("/static", "./static").prefer_utf8(true))
            .default_service(web::route().to(handlers::not_found))
    })
    .bind(&bind_address)?
    .run()
    .await
}
