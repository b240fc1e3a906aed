// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server implementation.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    http::{HeaderName, HeaderValue, Method},
    routing::{delete, get, post, put, MethodRouter},
    Router,
};
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::auth::{ActionKind, RbacPolicy, ResourceKind};
use crate::config::{ApiConfig, CorsConfig};
use crate::error::{ApiError, ApiResult};
use crate::handlers;
use crate::middleware::{AuthLayer, RbacLayer};
use crate::state::AppState;

// =============================================================================
// ApiServer
// =============================================================================

/// The API server.
///
/// This is the main entry point for creating and running the HTTP server.
pub struct ApiServer {
    state: AppState,
    config: Arc<ApiConfig>,
}

impl ApiServer {
    /// Creates a new API server with the given state.
    pub fn new(state: AppState) -> Self {
        let config = state.config.clone();
        Self { state, config }
    }

    /// Creates the router with all routes and middleware.
    ///
    /// Every `/api` route carries exactly one `(resource, action)` check.
    pub fn router(&self) -> Router {
        let cors = create_cors_layer(&self.config.cors);
        let auth = AuthLayer::new(self.state.jwt_manager.clone()).with_default_public_paths();

        let middleware_stack = ServiceBuilder::new().layer(cors).layer(auth);

        let guard = Guard::new(self.state.rbac_policy.clone());
        use ActionKind::{Read, Update};
        use ResourceKind as R;

        let router = Router::new()
            // Public
            .route("/health", get(handlers::health))
            .route("/register", post(handlers::register))
            .route("/login", post(handlers::login))
            // Dashboards
            .route(
                "/api/dashboard/admin",
                guard.on(R::AdminDashboard, Read, get(handlers::admin_dashboard)),
            )
            .route(
                "/api/dashboard/doctor",
                guard.on(R::DoctorDashboard, Read, get(handlers::doctor_dashboard)),
            )
            .route(
                "/api/dashboard/receptionist",
                guard.on(
                    R::ReceptionistDashboard,
                    Read,
                    get(handlers::receptionist_dashboard),
                ),
            )
            // Doctors
            .route(
                "/api/doctors",
                guard.collection(
                    R::Doctor,
                    get(handlers::list_doctors),
                    post(handlers::create_doctor),
                ),
            )
            .route(
                "/api/doctors/{id}",
                guard.item(
                    R::Doctor,
                    get(handlers::get_doctor),
                    put(handlers::update_doctor),
                    delete(handlers::delete_doctor),
                ),
            )
            // Patients
            .route(
                "/api/patients",
                guard.collection(
                    R::Patient,
                    get(handlers::list_patients),
                    post(handlers::create_patient),
                ),
            )
            .route(
                "/api/patients/{id}",
                guard.item(
                    R::Patient,
                    get(handlers::get_patient),
                    put(handlers::update_patient),
                    delete(handlers::delete_patient),
                ),
            )
            // Appointments
            .route(
                "/api/appointments",
                guard.collection(
                    R::Appointment,
                    get(handlers::list_appointments),
                    post(handlers::create_appointment),
                ),
            )
            .route(
                "/api/appointments/{id}",
                guard.item(
                    R::Appointment,
                    get(handlers::get_appointment),
                    put(handlers::update_appointment),
                    delete(handlers::delete_appointment),
                ),
            )
            // Medical records
            .route(
                "/api/medical-records",
                guard.collection(
                    R::MedicalRecord,
                    get(handlers::list_medical_records),
                    post(handlers::create_medical_record),
                ),
            )
            .route(
                "/api/medical-records/{id}",
                guard.item(
                    R::MedicalRecord,
                    get(handlers::get_medical_record),
                    put(handlers::update_medical_record),
                    delete(handlers::delete_medical_record),
                ),
            )
            // Prescriptions
            .route(
                "/api/prescriptions",
                guard.collection(
                    R::Prescription,
                    get(handlers::list_prescriptions),
                    post(handlers::create_prescription),
                ),
            )
            .route(
                "/api/prescriptions/{id}",
                guard.item(
                    R::Prescription,
                    get(handlers::get_prescription),
                    put(handlers::update_prescription),
                    delete(handlers::delete_prescription),
                ),
            )
            // Bills
            .route(
                "/api/bills",
                guard.collection(R::Bill, get(handlers::list_bills), post(handlers::create_bill)),
            )
            .route(
                "/api/bills/{id}",
                guard.item(
                    R::Bill,
                    get(handlers::get_bill),
                    put(handlers::update_bill),
                    delete(handlers::delete_bill),
                ),
            )
            // Rooms
            .route(
                "/api/rooms",
                guard.collection(R::Room, get(handlers::list_rooms), post(handlers::create_room)),
            )
            .route(
                "/api/rooms/{id}",
                guard.item(
                    R::Room,
                    get(handlers::get_room),
                    put(handlers::update_room),
                    delete(handlers::delete_room),
                ),
            )
            .route(
                "/api/rooms/{id}/assign",
                guard.on(R::Room, Update, post(handlers::assign_room)),
            )
            // Unmatched requests
            .fallback(handlers::route_not_found)
            .method_not_allowed_fallback(handlers::method_not_allowed)
            // Apply middleware and state
            .layer(middleware_stack);

        with_timeout(router, self.config.request_timeout)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server with graceful shutdown.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.config.socket_addr();
        let router = self.router();

        info!("Starting API server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to bind: {}", e)))?;

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| ApiError::internal(format!("Server error: {}", e)))?;

        info!("API server shutdown complete");

        Ok(())
    }
}

// =============================================================================
// Route Guards
// =============================================================================

/// Attaches [`RbacLayer`]s to method routers.
struct Guard {
    policy: Arc<RbacPolicy>,
}

impl Guard {
    fn new(policy: Arc<RbacPolicy>) -> Self {
        Self { policy }
    }

    fn on(
        &self,
        resource: ResourceKind,
        action: ActionKind,
        route: MethodRouter<AppState>,
    ) -> MethodRouter<AppState> {
        route.route_layer(RbacLayer::new(self.policy.clone(), resource, action))
    }

    /// `GET` lists, `POST` creates.
    fn collection(
        &self,
        resource: ResourceKind,
        list: MethodRouter<AppState>,
        create: MethodRouter<AppState>,
    ) -> MethodRouter<AppState> {
        self.on(resource, ActionKind::Read, list)
            .merge(self.on(resource, ActionKind::Create, create))
    }

    /// `GET`, `PUT` and `DELETE` on one entity.
    fn item(
        &self,
        resource: ResourceKind,
        read: MethodRouter<AppState>,
        update: MethodRouter<AppState>,
        remove: MethodRouter<AppState>,
    ) -> MethodRouter<AppState> {
        self.on(resource, ActionKind::Read, read)
            .merge(self.on(resource, ActionKind::Update, update))
            .merge(self.on(resource, ActionKind::Delete, remove))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Bounds each request by `timeout`. An expired request answers through
/// [`ApiError`] like any other failure.
fn with_timeout<S>(router: Router<S>, timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handlers::middleware_error))
            .layer(TimeoutLayer::new(timeout)),
    )
}

/// Creates the CORS layer from configuration.
fn create_cors_layer(cors: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new().max_age(cors.max_age);

    // Credentials can't be combined with a literal `*` origin.
    layer = if cors.allows_any_origin() {
        if cors.allow_credentials {
            layer.allow_origin(AllowOrigin::mirror_request())
        } else {
            layer.allow_origin(Any)
        }
    } else {
        let origins: Vec<HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        layer.allow_origin(origins)
    };

    let methods: Vec<Method> = cors
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    layer = layer.allow_methods(methods);

    let headers: Vec<HeaderName> = cors
        .allowed_headers
        .iter()
        .filter_map(|h| h.parse().ok())
        .collect();
    layer = layer.allow_headers(headers);

    if cors.allow_credentials {
        layer = layer.allow_credentials(true);
    }

    layer
}

// =============================================================================
// Tests
// =============================================================================
