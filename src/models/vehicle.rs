//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle para registro de flota.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: i64,
    pub registration_number: String,
    pub model: Option<String>,
    pub capacity: Option<i32>,
    pub created_at: DateTime<Utc>,
}
