//! DTOs de la API
//!
//! Este módulo contiene los tipos de request/response de los endpoints
//! HTTP y el sobre común `ApiResponse`.

pub mod api_response;
pub mod cost_dto;
pub mod customer_dto;
pub mod dealer_dto;
pub mod document_dto;
pub mod test_drive_dto;

pub use api_response::ApiResponse;
