use serde::Serialize;

/// JSON envelope returned by every `/api` route.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: &str) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.to_string()),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EstimateData {
    pub estimate: f64,
    pub formatted: String,
}

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: &'static str,
    pub model_loaded: bool,
    pub chat_model: String,
    pub active_sessions: usize,
}
