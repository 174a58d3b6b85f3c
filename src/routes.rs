use actix_web::middleware::DefaultHeaders;
use actix_web::{web, HttpResponse, Responder};
use log::{debug, error};
use serde_json::json;

use crate::error::PredictionError;
use crate::inference::LinearModel;
use crate::models::{PredictionRequest, PredictionResponse, WelcomeResponse};

pub async fn welcome() -> impl Responder {
    HttpResponse::Ok().json(WelcomeResponse::default())
}

pub async fn predict(
    model: web::Data<LinearModel>,
    body: web::Bytes,
) -> actix_web::Result<HttpResponse> {
    let request = PredictionRequest::decode(&body).inspect_err(|e| {
        debug!("rejected prediction request: {:?}", e.detail);
    })?;

    let features = request.to_array();
    let prediction = model.predict(features);
    if !prediction.is_finite() {
        let err = PredictionError {
            features,
            value: prediction,
        };
        error!("{err}");
        return Err(err.into());
    }
    debug!(
        "prediction for ({}, {}) = {}",
        request.feature1, request.feature2, prediction
    );
    Ok(HttpResponse::Ok().json(PredictionResponse { prediction }))
}

pub async fn model_info(model: web::Data<LinearModel>) -> impl Responder {
    HttpResponse::Ok().json(model.get_model_info())
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "detail": "Not Found" }))
}

pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(json!({ "detail": "Method Not Allowed" }))
}

pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new().add(("X-Content-Type-Options", "nosniff"))
}

/// Registers every endpoint. The fitted model must already be in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .route(web::get().to(welcome))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/predict/")
            .route(web::post().to(predict))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/model-info")
            .route(web::get().to(model_info))
            .default_service(web::to(method_not_allowed)),
    );
}
