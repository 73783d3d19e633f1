//! Utilidades compartidas del sistema

pub mod errors;
pub mod geo;
pub mod validation;
