use axum::{
    Router,
    http::{
        HeaderName, HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;

use crate::config::Config;
use crate::db::{Appointment, ClinicStorage, InventoryItem, Patient};
use crate::error::ClinicError;
use crate::handlers::health::health;
use crate::handlers::records::{count_records, create_record, list_records};
use crate::render::RenderMode;
use crate::types::forms::{AppointmentForm, InventoryForm, PatientForm};

/// Header htmx sends with every request it issues.
const HX_CURRENT_URL: HeaderName = HeaderName::from_static("hx-current-url");

#[derive(Clone)]
pub struct ClinicState {
    pub storage: ClinicStorage,
    pub render_mode: RenderMode,
}

impl ClinicState {
    pub fn new(storage: ClinicStorage, render_mode: RenderMode) -> Self {
        Self {
            storage,
            render_mode,
        }
    }
}

/// API routes only, without CORS, tracing or static files.
pub fn clinic_router(state: ClinicState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/patients",
            get(list_records::<Patient>).post(create_record::<PatientForm>),
        )
        .route("/patients/all", get(list_records::<Patient>))
        .route("/patients/count", get(count_records::<Patient>))
        .route(
            "/appointments",
            get(list_records::<Appointment>).post(create_record::<AppointmentForm>),
        )
        .route("/appointments/all", get(list_records::<Appointment>))
        .route("/appointments/count", get(count_records::<Appointment>))
        .route(
            "/inventory",
            get(list_records::<InventoryItem>).post(create_record::<InventoryForm>),
        )
        .route("/inventory/all", get(list_records::<InventoryItem>))
        .route("/inventory/list", get(list_records::<InventoryItem>))
        .route("/inventory/count", get(count_records::<InventoryItem>))
        .with_state(state)
}

/// The served application: API routes plus CORS, request tracing and the
/// optional static directory fallback.
pub fn build_app(state: ClinicState, cfg: &Config) -> Result<Router, ClinicError> {
    let mut app = clinic_router(state);

    if let Some(dir) = cfg.static_dir.as_ref() {
        info!(path = %dir.display(), "serving static files");
        app = app.fallback_service(ServeDir::new(dir));
    }

    Ok(app
        .layer(cors_layer(&cfg.cors_origin)?)
        .layer(TraceLayer::new_for_http()))
}

/// Single-origin CORS policy for the frontend.
///
/// Requests from any other origin get no `access-control-allow-origin` header.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, ClinicError> {
    let allowed = HeaderValue::from_str(origin)
        .map_err(|_| ClinicError::InvalidOrigin(origin.to_string()))?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |requested: &HeaderValue, _| {
            *requested == allowed
        }))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, HX_CURRENT_URL])
        .allow_credentials(true))
}
