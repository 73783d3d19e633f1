//! Modelo genérico de usuario
//!
//! Todos los tipos de usuario (admin, driver, conductor, passenger) comparten
//! un único registro con un campo `role`; los requisitos específicos de cada
//! rol se expresan como datos, no como código duplicado. El teléfono es único
//! en toda la tabla, es decir a través de todos los tipos de usuario.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use std::str::FromStr;

/// Rol de usuario - mapea al ENUM user_role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Driver,
    Conductor,
    Passenger,
}

impl Role {
    /// El número de licencia solo aplica a choferes
    pub fn requires_license(&self) -> bool {
        matches!(self, Role::Driver)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Driver => write!(f, "driver"),
            Role::Conductor => write!(f, "conductor"),
            Role::Passenger => write!(f, "passenger"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "driver" => Ok(Role::Driver),
            "conductor" => Ok(Role::Conductor),
            "passenger" => Ok(Role::Passenger),
            other => Err(format!("'{}' is not a valid role", other)),
        }
    }
}

/// User principal - mapea exactamente a la tabla users
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub role: Role,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub license_number: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}
