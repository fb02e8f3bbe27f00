//! Cliente de la API
//!
//! Este módulo contiene el cliente HTTP tipado de los endpoints del
//! concesionario y la máquina de estados de carga que usan las vistas.

pub mod api_client;
pub mod fetch_state;

pub use api_client::{paths, ClientError, ListResult, ResourceClient};
pub use fetch_state::{FetchState, Resource};
