use axum::{
    extract::{ Query, State },
    http::{ header, HeaderMap, HeaderValue, StatusCode },
    response::{ Html, IntoResponse, Response },
    routing::{ get, post },
    Form,
    Json,
    Router,
};
use log::{ info, warn };
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{ Any, CorsLayer };
use uuid::Uuid;

use super::page::{ self, PageView, Tab };
use crate::chat::{ SessionStore, TurnOutcome };
use crate::error::PredictionError;
use crate::llm::chat::ChatClient;
use crate::models::api::{ ApiResponse, EstimateData, HealthData };
use crate::models::prediction::{ PredictForm, PredictionInput };
use crate::predictor::{ format_currency, Predictor };

pub const SESSION_COOKIE: &str = "fa_session";

#[derive(Clone)]
pub struct AppState {
    pub predictor: Predictor,
    pub chat_client: Arc<dyn ChatClient>,
    pub sessions: Arc<SessionStore>,
    /// Marks the session cookie `Secure`; set when serving over TLS.
    pub secure_cookie: bool,
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub tab: Option<String>,
}

#[derive(Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/predict", post(api_predict_handler))
        .layer(cors);

    Router::new()
        .route("/", get(index_handler))
        .route("/predict", post(predict_handler))
        .route("/chat", post(chat_handler))
        .merge(api)
        .with_state(state)
}

fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

fn page_response(body: String, new_session: Option<Uuid>, secure: bool) -> Response {
    let mut response = Html(body).into_response();
    if let Some(id) = new_session {
        let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id);
        if secure {
            cookie.push_str("; Secure");
        }
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
    }
    response
}

async fn index_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Response {
    let tab = Tab::from_query(query.tab.as_deref());
    let form = PredictForm::default();

    // The predictor tab never waits on a chat turn in progress.
    if tab == Tab::Predictor {
        let body = page::render(&PageView {
            tab,
            form: &form,
            prediction: None,
            history: &[],
            chat_error: None,
        });
        return page_response(body, None, state.secure_cookie);
    }

    let (id, session, created) = state.sessions.get_or_create(session_id(&headers));
    let session = session.lock().await;
    let body = page::render(&PageView {
        tab,
        form: &form,
        prediction: None,
        history: session.history(),
        chat_error: None,
    });
    page_response(body, created.then_some(id), state.secure_cookie)
}

async fn predict_handler(
    State(state): State<AppState>,
    Form(form): Form<PredictForm>,
) -> Response {
    let result = PredictionInput::try_from(&form).and_then(|input| state.predictor.predict(&input));
    match &result {
        Ok(estimate) => info!("Prediction succeeded: {}", format_currency(*estimate)),
        Err(e) => warn!("Prediction failed: {}", e),
    }

    let body = page::render(&PageView {
        tab: Tab::Predictor,
        form: &form,
        prediction: Some(&result),
        history: &[],
        chat_error: None,
    });
    page_response(body, None, state.secure_cookie)
}

async fn chat_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(chat): Form<ChatForm>,
) -> Response {
    let (id, session, created) = state.sessions.get_or_create(session_id(&headers));
    let mut session = session.lock().await;

    let outcome = session.submit(state.chat_client.as_ref(), &chat.message).await;
    let chat_error = match &outcome {
        TurnOutcome::Failed(e) => Some(e),
        TurnOutcome::Replied | TurnOutcome::Ignored => None,
    };

    let form = PredictForm::default();
    let body = page::render(&PageView {
        tab: Tab::Chat,
        form: &form,
        prediction: None,
        history: session.history(),
        chat_error,
    });
    page_response(body, created.then_some(id), state.secure_cookie)
}

async fn api_predict_handler(
    State(state): State<AppState>,
    Json(input): Json<PredictionInput>,
) -> impl IntoResponse {
    let result = input.validate().and_then(|_| state.predictor.predict(&input));
    match result {
        Ok(estimate) => {
            info!("API prediction succeeded: {}", format_currency(estimate));
            let data = EstimateData { estimate, formatted: format_currency(estimate) };
            (StatusCode::OK, Json(ApiResponse::success(data)))
        }
        Err(e) => {
            warn!("API prediction failed: {}", e);
            let code = match e {
                PredictionError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (code, Json(ApiResponse::<EstimateData>::error(&e.to_string())))
        }
    }
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(
        ApiResponse::success(HealthData {
            status: "ok",
            model_loaded: state.predictor.is_loaded(),
            chat_model: state.chat_client.get_model(),
            active_sessions: state.sessions.active(),
        })
    )
}
