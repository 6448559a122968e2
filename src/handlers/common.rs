use actix_web_httpauth::extractors::basic::{BasicAuth, Config};
use actix_web_httpauth::extractors::AuthenticationError;
use serde::Serialize;

use crate::timeinfo::TimeInfo;

/// In-band JSON envelope for the API. Errors travel in the body and the
/// HTTP status stays 200, so clients always read one shape.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<TimeInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: TimeInfo) -> ApiResponse {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> ApiResponse {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

// Authentication validator function
pub async fn validator(
    req: actix_web::dev::ServiceRequest,
    credentials: Option<BasicAuth>,
) -> Result<actix_web::dev::ServiceRequest, (actix_web::Error, actix_web::dev::ServiceRequest)> {
    // Allow metrics and healthz requests to pass through
    if req.path() == "/api/metrics" || req.path() == "/healthz" {
        return Ok(req);
    }

    // Get auth credentials from environment
    let expected_username = std::env::var("BASIC_AUTH_USERNAME").unwrap_or_default();
    let expected_password = std::env::var("BASIC_AUTH_PASSWORD").unwrap_or_default();

    // If auth environment variables are not set, don't enforce authentication
    if expected_username.is_empty() || expected_password.is_empty() {
        return Ok(req);
    }

    let credentials = if let Some(credentials) = credentials {
        credentials
    } else {
        return Err((
            actix_web::error::ErrorBadRequest("no basic auth header"),
            req,
        ));
    };

    // Check if credentials match
    let password = credentials.password().unwrap_or_default();
    if credentials.user_id() == expected_username && password == expected_password {
        Ok(req)
    } else {
        // Return 401 Unauthorized with proper WWW-Authenticate header
        let config = req
            .app_data::<Config>()
            .cloned()
            .unwrap_or_default()
            .realm("easytime");

        Err((AuthenticationError::from(config).into(), req))
    }
}
