use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use neobrief_core::config::Settings;
use neobrief_core::domain::brief::{briefs_from_feed, NeoBrief};
use neobrief_core::domain::range::{effective_end_date, validate_query};
use neobrief_core::error::ServiceError;
use neobrief_core::feed::provider::{HttpNeoFeedProvider, NeoFeedProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let provider = Arc::new(HttpNeoFeedProvider::from_settings(&settings)?);
    let state = AppState { provider };

    let app = Router::new()
        .route("/", get(root_info))
        .route("/near-earth-objects", get(get_near_earth_objects))
        .route("/docs", get(docs_page))
        .route("/docs/openapi.json", get(openapi_spec))
        .with_state(state)
        .layer(cors_layer(&settings))
        .layer(TraceLayer::new_for_http());

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port()));
    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[derive(Clone)]
struct AppState {
    provider: Arc<dyn NeoFeedProvider>,
}

async fn root_info() -> Json<InfoBody> {
    Json(InfoBody {
        message: "NEO feed facade is up. Use /near-earth-objects endpoint.",
    })
}

#[derive(Debug, Serialize)]
struct InfoBody {
    message: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BriefListBody {
    start_date: NaiveDate,
    end_date: NaiveDate,
    count: usize,
    items: Vec<NeoBrief>,
}

async fn get_near_earth_objects(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Json<BriefListBody>, ApiFailure> {
    let range = validate_query(&params)?;
    // Resolved once; the same date goes upstream and into the response.
    let end_date = effective_end_date(range.start, range.end);

    let feed = state.provider.fetch_feed(range.start, end_date).await?;
    let items = briefs_from_feed(&feed);

    Ok(Json(BriefListBody {
        start_date: range.start,
        end_date,
        count: items.len(),
        items,
    }))
}

async fn docs_page() -> Html<&'static str> {
    Html(include_str!("../assets/docs.html"))
}

async fn openapi_spec() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        include_str!("../assets/openapi.json"),
    )
}

#[derive(Debug)]
struct ApiFailure(ServiceError);

impl From<ServiceError> for ApiFailure {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        match &self.0 {
            ServiceError::Validation { .. } => {}
            err => {
                tracing::error!(error = %err, "neo brief request failed");
                sentry::capture_error(err);
            }
        }

        let (status, body) = response_parts(self.0);
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(untagged)]
enum ErrorBody {
    Validation {
        error: &'static str,
        message: String,
    },
    Failure {
        error: &'static str,
        detail: String,
    },
}

fn response_parts(err: ServiceError) -> (StatusCode, ErrorBody) {
    match err {
        ServiceError::Validation { violations } => (
            StatusCode::BAD_REQUEST,
            ErrorBody::Validation {
                error: "Bad Request",
                message: violations.join("; "),
            },
        ),
        ServiceError::Upstream { status, message } => {
            let code = status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::BAD_GATEWAY);
            (
                code,
                ErrorBody::Failure {
                    error: "Upstream Error",
                    detail: message,
                },
            )
        }
        // The underlying cause is logged, never returned to the caller.
        ServiceError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody::Failure {
                error: "Internal Error",
                detail: "unexpected error".to_string(),
            },
        ),
    }
}

fn cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .cors_allowlist
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
