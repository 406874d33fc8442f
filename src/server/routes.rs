//! Axum route handlers for the EchoType HTTP API.
//!
//! # Routes
//!
//! - `GET  /api/health`               - `{"status": "healthy", "service": "EchoType API", "version"}`
//! - `GET  /api/questions/:test_type` - questions of a variant in presentation order
//! - `POST /api/predict`              - answers plus optional text, returns the type

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::catalog::{Question, TestVariant};
use crate::descriptions::describe;
use crate::dimension::{PerDimension, PersonalityType, ScoreVector};
use crate::error::Error;
use crate::predictor::{DimensionOutcome, Prediction, Predictor};

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<Predictor>,
}

impl AppState {
    pub fn new(predictor: Predictor) -> Self {
        Self {
            predictor: Arc::new(predictor),
        }
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/questions/:test_type", get(questions_handler))
        .route("/api/predict", post(predict_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

type ApiError = (StatusCode, Json<Value>);

/// GET /api/health - liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "EchoType API",
        "version": crate::VERSION,
    }))
}

#[derive(Serialize)]
struct QuestionsResponse<'a> {
    test_type: TestVariant,
    total_questions: usize,
    questions: &'a [Question],
}

/// GET /api/questions/:test_type
async fn questions_handler(
    State(state): State<AppState>,
    Path(test_type): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let variant: TestVariant = test_type.parse().map_err(|e: Error| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": e.to_string() })),
        )
    })?;
    let questions = state.predictor.catalog().set(variant).questions();
    let body = QuestionsResponse {
        test_type: variant,
        total_questions: questions.len(),
        questions,
    };
    serde_json::to_value(body)
        .map(Json)
        .map_err(|e| internal_error(&Error::from(e)))
}

fn default_test_type() -> String {
    TestVariant::Short.as_str().to_string()
}

/// Body of `POST /api/predict`.
///
/// `answers` stays untyped so that non-integer entries are reported with
/// their position rather than as a generic body rejection.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub answers: Option<Value>,
    #[serde(default = "default_test_type")]
    pub test_type: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    #[serde(rename = "type")]
    pub personality_type: PersonalityType,
    pub description: &'static str,
    pub scores: ScoreVector,
    pub dimensions: PerDimension<DimensionOutcome>,
    pub text_used: bool,
}

impl From<&Prediction> for PredictResponse {
    fn from(prediction: &Prediction) -> Self {
        Self {
            success: true,
            personality_type: prediction.personality_type,
            description: describe(&prediction.personality_type),
            scores: prediction.scores,
            dimensions: prediction.dimensions(),
            text_used: prediction.text_used(),
        }
    }
}

/// POST /api/predict
async fn predict_handler(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|rejection| bad_request(format!("Invalid request body: {}", rejection.body_text())))?;

    let answers = match request.answers {
        None | Some(Value::Null) => return Err(bad_request("Answers required".into())),
        Some(Value::Array(values)) if values.is_empty() => {
            return Err(bad_request("Answers required".into()))
        }
        Some(Value::Array(values)) => parse_answers(&values).map_err(|e| caller_error(&e))?,
        Some(_) => return Err(bad_request("Answers must be a list".into())),
    };

    let prediction = state
        .predictor
        .predict_lenient(&answers, &request.test_type, request.text.as_deref())
        .map_err(|e| {
            if e.is_caller_error() {
                caller_error(&e)
            } else {
                internal_error(&e)
            }
        })?;

    Ok(Json(PredictResponse::from(&prediction)))
}

/// Accept only JSON integers; anything else is reported with its position.
fn parse_answers(values: &[Value]) -> Result<Vec<i64>, Error> {
    values
        .iter()
        .enumerate()
        .map(|(position, value)| {
            value.as_i64().ok_or_else(|| Error::InvalidAnswerValue {
                position,
                value: value.to_string(),
            })
        })
        .collect()
}

fn bad_request(message: String) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "error": message })),
    )
}

fn caller_error(e: &Error) -> ApiError {
    bad_request(e.to_string())
}

fn internal_error(e: &Error) -> ApiError {
    error!(error = %e, "prediction failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "error": format!("Prediction failed: {}", e) })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::testing::{predictor_with, FixedClassifier};
    use crate::text::{TextClassifier, TextPrediction};
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::atomic::Ordering;
    use tower::ServiceExt;

    fn app() -> Router {
        app_router(AppState::new(predictor_with(Arc::new(FixedClassifier::default()), 0.7)))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 1 << 20)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn post_predict(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/predict")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], "EchoType API");
        assert_eq!(json["version"], crate::VERSION);
    }

    #[tokio::test]
    async fn test_questions_endpoint() {
        let request = Request::builder()
            .uri("/api/questions/short")
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["test_type"], "short");
        assert_eq!(json["total_questions"], 20);
        let questions = json["questions"].as_array().unwrap();
        assert_eq!(questions.len(), 20);
        assert_eq!(questions[0]["dimension"], "I-E");
        assert!(questions[0]["question"].is_string());
        assert!(questions[0]["reverse"].is_boolean());
        assert_eq!(questions[19]["dimension"], "J-P");
    }

    #[tokio::test]
    async fn test_questions_unknown_variant() {
        let request = Request::builder()
            .uri("/api/questions/medium")
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("medium"));
    }

    #[tokio::test]
    async fn test_predict_neutral_answers() {
        let (status, json) = send(app(), post_predict(json!({ "answers": vec![3; 20] }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["type"], "ESFP");
        assert!(json["description"].as_str().unwrap().starts_with("The Entertainer"));
        assert_eq!(json["scores"]["I-E"], 0.5);
        assert_eq!(json["dimensions"]["T-F"]["trait"], "F");
        assert_eq!(json["dimensions"]["I-E"]["name"], "Introversion ↔ Extraversion");
        assert_eq!(json["text_used"], false);
    }

    #[tokio::test]
    async fn test_predict_with_text() {
        let classifier = Arc::new(FixedClassifier::default());
        let app = app_router(AppState::new(predictor_with(classifier.clone(), 0.7)));
        let body = json!({
            "answers": vec![3; 20],
            "test_type": "short",
            "text": "I prefer long solitary walks where I can plan projects and think about ideas.",
        });
        let (status, json) = send(app, post_predict(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["type"], "INTJ");
        assert_eq!(json["text_used"], true);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_predict_text_without_words_falls_back() {
        let body = json!({ "answers": vec![3; 20], "text": "12345 67890 ".repeat(6) });
        let (status, json) = send(app(), post_predict(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["type"], "ESFP");
        assert_eq!(json["text_used"], false);
    }

    #[tokio::test]
    async fn test_predict_caller_errors() {
        let cases = [
            json!({}),
            json!({ "answers": [] }),
            json!({ "answers": "3,3,3" }),
            json!({ "answers": vec![3; 19] }),
            json!({ "answers": vec![3; 20], "test_type": "medium" }),
            json!({ "answers": [3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 6] }),
            json!({ "answers": [3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 2.5] }),
            json!({ "answers": [3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, "4"] }),
        ];
        for body in cases {
            let (status, json) = send(app(), post_predict(body.clone())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
            assert_eq!(json["success"], false);
            assert!(json["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_predict_malformed_json() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/predict")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, json) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
    }

    struct BrokenClassifier;

    impl TextClassifier for BrokenClassifier {
        fn classify(&self, _text: &str) -> crate::error::Result<TextPrediction> {
            Err(Error::Inference {
                stage: "vectorize",
                message: "feature width mismatch".into(),
            })
        }
    }

    #[tokio::test]
    async fn test_predict_internal_failure_is_500() {
        let predictor = Predictor::new(
            Arc::new(crate::catalog::QuestionCatalog::builtin().unwrap()),
            Arc::new(BrokenClassifier),
            Default::default(),
        )
        .unwrap();
        let body = json!({ "answers": vec![3; 20], "text": "a".repeat(10) + &" words here".repeat(8) });
        let (status, json) = send(app_router(AppState::new(predictor)), post_predict(body)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("vectorize"));
    }
}
