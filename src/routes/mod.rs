//! Rutas de la API
//!
//! Este módulo monta el router completo: rutas de recursos tras el
//! middleware de identidad y el de concesionario, alta del concesionario
//! solo tras identidad, y el health check público.

pub mod cost_routes;
pub mod customer_routes;
pub mod dealer_routes;
pub mod document_routes;
pub mod health_routes;
pub mod test_drive_routes;

use axum::{middleware::from_fn_with_state, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::{cors_layer, dealer_middleware, identity_middleware};
use crate::state::AppState;

/// Construye la aplicación completa con su estado
pub fn create_app(state: AppState) -> Router {
    // Recursos del concesionario: identidad -> concesionario -> handler
    let scoped = Router::new()
        .nest("/customers", customer_routes::create_customer_router())
        .nest("/test-drives", test_drive_routes::create_test_drive_router())
        .nest("/vehicle-costs", cost_routes::create_vehicle_cost_router())
        .nest("/return-costs", cost_routes::create_return_cost_router())
        .nest("/documents", document_routes::create_document_router())
        .merge(dealer_routes::create_dealer_router())
        .route_layer(from_fn_with_state(state.clone(), dealer_middleware));

    let authenticated = scoped
        .merge(dealer_routes::create_onboarding_router())
        .route_layer(from_fn_with_state(state.clone(), identity_middleware));

    let api = authenticated.merge(health_routes::create_health_router());

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config))
        .with_state(state)
}

/// Mapa de endpoints para el log de arranque
pub const ENDPOINTS: &[(&str, &str)] = &[
    ("GET ", "/api/health - Health check"),
    ("POST", "/api/dealer/onboard - Alta del concesionario"),
    ("GET ", "/api/dealer - Perfil del concesionario"),
    ("PUT ", "/api/dealer - Actualizar perfil"),
    ("GET ", "/api/customers - Listar/buscar clientes"),
    ("POST", "/api/customers - Crear cliente"),
    ("GET ", "/api/customers/:id - Obtener cliente"),
    ("PUT ", "/api/customers/:id - Actualizar cliente"),
    ("GET ", "/api/test-drives - Listar pruebas de conducción"),
    ("POST", "/api/test-drives - Reservar prueba"),
    ("GET ", "/api/test-drives/:id - Obtener prueba"),
    ("PUT ", "/api/test-drives/:id - Actualizar prueba"),
    ("GET ", "/api/vehicle-costs - Costes de vehículos"),
    ("GET ", "/api/return-costs - Costes de devoluciones"),
    ("POST", "/api/documents/pdf - Exportar PDF"),
];
