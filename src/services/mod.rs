//! Services module
//!
//! Este módulo contiene los servicios de la aplicación que no dependen del
//! almacenamiento: verificación de identidad y generación de documentos PDF.

pub mod identity_service;
pub mod pdf_service;

pub use identity_service::{Identity, IdentityVerifier};
pub use pdf_service::{render_pdf, Block, DocumentLayout, RenderError};
