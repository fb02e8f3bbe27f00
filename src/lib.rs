//! Dealership Manager
//!
//! Backend multi-concesionario: clientes, pruebas de conducción, costes de
//! vehículos y devoluciones, y exportación de documentos PDF. Cada petición
//! pasa por la verificación de identidad y la resolución del concesionario
//! antes de tocar el almacenamiento.

pub mod client;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app;
pub use state::AppState;
