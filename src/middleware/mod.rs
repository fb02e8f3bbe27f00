//! Middleware del sistema
//!
//! Este módulo contiene el middleware de identidad, la resolución del
//! concesionario y CORS.

pub mod auth;
pub mod cors;
pub mod dealer;

pub use auth::*;
pub use cors::*;
pub use dealer::*;
