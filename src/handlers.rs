use actix_files::NamedFile;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use log::{error, info};

use crate::error::PredictError;
use crate::history::PredictionHistory;
use crate::inference::RiskModel;
use crate::models::{ApiResponse, ClimateReading, PredictionResult};

pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::success("fire-risk prediction API"))
}

pub async fn model_info(model: web::Data<RiskModel>) -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::success(model.info()))
}

/// Run one risk classification and record the outcome.
pub async fn predict(
    model: web::Data<RiskModel>,
    history: web::Data<PredictionHistory>,
    payload: web::Json<ClimateReading>,
) -> impl Responder {
    let reading = payload.into_inner();

    match model.predict(&reading) {
        Ok(result) => {
            info!(
                "prediction: {:?} (p={:.3}, confidence={:.3})",
                result.risk_label, result.risk_probability, result.confidence
            );
            history.record(&reading, &result);
            HttpResponse::Ok().json(ApiResponse::success(result))
        }
        Err(PredictError::Validation(e)) => {
            info!("rejected reading: {}", e);
            HttpResponse::BadRequest().json(ApiResponse::<PredictionResult>::error(&e.to_string()))
        }
        Err(PredictError::Model(e)) => {
            error!("inference failed: {}", e);
            HttpResponse::InternalServerError()
                .json(ApiResponse::<PredictionResult>::error(&e.to_string()))
        }
    }
}

pub async fn history(history: web::Data<PredictionHistory>) -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::success(history.snapshot()))
}

pub async fn export_history(history: web::Data<PredictionHistory>) -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            "attachment; filename=\"prediction_history.csv\"",
        ))
        .body(history.to_csv())
}

pub async fn index(req: HttpRequest) -> impl Responder {
    match NamedFile::open_async("./static/index.html").await {
        Ok(file) => file.into_response(&req),
        Err(e) => {
            error!("form page unavailable: {}", e);
            HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("form page unavailable"))
        }
    }
}

pub async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(ApiResponse::<()>::error("endpoint not found"))
}
