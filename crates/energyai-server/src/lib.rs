//! EnergyAI Web Server
//!
//! Axum-based REST API for the EnergyAI consumption tracker.
//!
//! Security features:
//! - Bearer-token authentication (HS256 JWT issued at signup/login)
//! - Restrictive CORS policy
//! - Input validation (pagination limits, threshold ranges)
//! - Sanitized error responses
//!
//! Collaborators (weather, ML prediction service, mail relay) are constructed
//! once from the environment at router creation and shared through
//! [`AppState`]; alert emails are dispatched fire-and-forget so transport
//! latency never blocks a request.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use energyai_core::alerts::AlertDispatcher;
use energyai_core::db::Database;
use energyai_core::prediction::PredictionClient;
use energyai_core::weather::WeatherClient;

mod handlers;

/// Maximum pagination limit for prediction listings
pub const MAX_PAGE_LIMIT: usize = 100;

/// Maximum rows in a CSV export
pub const MAX_EXPORT_LIMIT: usize = 10_000;

/// Environment variable holding the JWT signing secret
pub const JWT_SECRET_ENV: &str = "ENERGYAI_JWT_SECRET";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Secret for signing and validating bearer tokens
    pub jwt_secret: String,
    /// Allowed CORS origins (empty = same-origin only in production)
    pub allowed_origins: Vec<String>,
    /// Token lifetime in days
    pub token_ttl_days: i64,
}

impl ServerConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            allowed_origins: vec![],
            token_ttl_days: 30,
        }
    }

    /// Read configuration from environment variables
    ///
    /// `ENERGYAI_JWT_SECRET` is required: tokens signed with a guessable
    /// default would make every account public.
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = std::env::var(JWT_SECRET_ENV)
            .map_err(|_| anyhow::anyhow!("{} must be set to issue login tokens", JWT_SECRET_ENV))?;

        let allowed_origins = std::env::var("ENERGYAI_ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            allowed_origins,
            ..Self::new(jwt_secret)
        })
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    /// Weather collaborator; handlers fall back to the fixed reading when absent
    pub weather: Option<WeatherClient>,
    /// ML prediction collaborator; /api/predict answers 503 when absent
    pub predictor: Option<PredictionClient>,
    /// Mail dispatch; threshold alerts are silently skipped when absent
    pub dispatcher: Option<AlertDispatcher>,
}

/// Bearer token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i64,
    /// Email at issue time, used as the alert destination
    pub email: String,
    /// Expiry (seconds since epoch)
    pub exp: usize,
}

/// Issue a signed bearer token for a user
pub fn issue_token(user_id: i64, email: &str, config: &ServerConfig) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let exp = (chrono::Utc::now() + chrono::Duration::days(config.token_ttl_days)).timestamp();
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        exp: exp as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;
    Ok(token)
}

/// Validate a bearer token and return its claims
pub fn decode_token(token: &str, config: &ServerConfig) -> Result<Claims, String> {
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| format!("Invalid token: {}", e))?;

    Ok(data.claims)
}

fn claims_from_parts(parts: &Parts, config: &ServerConfig) -> Option<Claims> {
    let token = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))?;

    match decode_token(token, config) {
        Ok(claims) => Some(claims),
        Err(e) => {
            warn!(error = %e, "Rejected bearer token");
            None
        }
    }
}

/// Extractor for handlers that require an authenticated user
pub struct AuthUser(pub Claims);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        claims_from_parts(parts, &state.config)
            .map(AuthUser)
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

/// Extractor for handlers where a user is optional
///
/// Prediction submissions without a token are stored anonymously, matching
/// the original service's behavior.
pub struct MaybeUser(pub Option<Claims>);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(claims_from_parts(parts, &state.config)))
    }
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router, building collaborators from the environment
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let weather = WeatherClient::from_env();
    match &weather {
        Some(client) => info!("Weather collaborator configured: {}", client.host()),
        None => info!("Weather collaborator not configured (set WEATHER_API_KEY); using fallback readings"),
    }

    let predictor = PredictionClient::from_env();
    match &predictor {
        Some(client) => info!("Prediction service configured: {}", client.host()),
        None => info!("Prediction service not configured (set PREDICT_API_URL); /api/predict disabled"),
    }

    let dispatcher = AlertDispatcher::from_env();
    match &dispatcher {
        Some(d) => info!("Mail transport configured: {}", d.host()),
        None => info!("Mail transport not configured (set MAIL_RELAY_URL); alert emails disabled"),
    }

    create_router_with_collaborators(db, static_dir, config, weather, predictor, dispatcher)
}

/// Create the application router with explicit collaborators (for testing)
pub fn create_router_with_collaborators(
    db: Database,
    static_dir: Option<&str>,
    config: ServerConfig,
    weather: Option<WeatherClient>,
    predictor: Option<PredictionClient>,
    dispatcher: Option<AlertDispatcher>,
) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
        weather,
        predictor,
        dispatcher,
    });

    let api_routes = Router::new()
        // Auth
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login))
        .route("/me", get(handlers::get_me))
        .route("/profile", put(handlers::update_profile))
        // Predictions
        .route(
            "/predictions",
            get(handlers::list_predictions).post(handlers::store_prediction),
        )
        .route("/predict", post(handlers::predict))
        // Analytics
        .route("/analytics/insights", get(handlers::get_insights))
        .route("/analytics/efficiency", get(handlers::get_efficiency))
        .route(
            "/analytics/recommendations",
            get(handlers::get_recommendations),
        )
        .route("/analytics/anomalies", get(handlers::get_anomalies))
        .route("/analytics/carbon", get(handlers::get_carbon))
        // Settings
        .route(
            "/settings",
            get(handlers::get_settings).put(handlers::update_settings),
        )
        // Weather
        .route("/weather/current", get(handlers::get_current_weather))
        .route("/weather/forecast", get(handlers::get_forecast))
        // Export
        .route("/export/csv", get(handlers::export_csv));

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server
pub async fn serve(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn service_unavailable(msg: &str) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<energyai_core::Error> for AppError {
    fn from(err: energyai_core::Error) -> Self {
        use energyai_core::Error as CoreError;

        match err {
            CoreError::NotFound(msg) => Self::not_found(&msg),
            CoreError::EmailTaken => Self::bad_request("Email already exists"),
            CoreError::InvalidData(msg) => Self::bad_request(&msg),
            CoreError::Prediction(_) => Self {
                status: StatusCode::BAD_GATEWAY,
                message: "Prediction service unavailable".to_string(),
                internal: Some(err.into()),
            },
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                // Return generic message to client
                message: "An internal error occurred".to_string(),
                // Keep full error for logging
                internal: Some(other.into()),
            },
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "An internal error occurred".to_string(),
            internal: Some(err),
        }
    }
}
