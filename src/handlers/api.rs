use actix_web::{http::Method, web, HttpRequest, HttpResponse, Responder};
use chrono::Utc;
use serde::Deserialize;

use crate::handlers::ApiResponse;
use crate::timeinfo::TimeInfo;
use crate::{timeparse, timezone};

#[derive(Deserialize)]
pub struct ConvertRequest {
    #[serde(default)]
    input: String,
    #[serde(default)]
    timezone: String,
}

#[derive(Deserialize)]
pub struct NowQuery {
    #[serde(default)]
    timezone: String,
}

/// `POST /api/convert`. Wrong methods and malformed bodies get an in-band
/// error under HTTP 200, matching the envelope contract.
pub async fn convert_handler(req: HttpRequest, body: web::Bytes) -> impl Responder {
    if req.method() != Method::POST {
        return HttpResponse::Ok().json(ApiResponse::err("Method not allowed"));
    }

    let request: ConvertRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(_) => return HttpResponse::Ok().json(ApiResponse::err("Invalid request")),
    };

    HttpResponse::Ok().json(convert(&request.input, &request.timezone))
}

/// `GET /api/now`.
pub async fn now_handler(query: web::Query<NowQuery>) -> impl Responder {
    HttpResponse::Ok().json(now(&query.timezone))
}

fn convert(input: &str, timezone: &str) -> ApiResponse {
    let tz = match timezone::resolve(timezone) {
        Ok(tz) => tz,
        Err(e) => return ApiResponse::err(e.to_string()),
    };

    let now = Utc::now();
    timeparse::parse(input, now.with_timezone(&tz), tz)
        .and_then(|instant| TimeInfo::project(instant, tz))
        .map_or_else(|e| ApiResponse::err(e.to_string()), ApiResponse::ok)
}

fn now(timezone: &str) -> ApiResponse {
    let tz = match timezone::resolve(timezone) {
        Ok(tz) => tz,
        Err(e) => return ApiResponse::err(e.to_string()),
    };

    TimeInfo::project(Utc::now(), tz)
        .map_or_else(|e| ApiResponse::err(e.to_string()), ApiResponse::ok)
}
