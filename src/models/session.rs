//! Modelo de Session
//!
//! Una sesión representa un viaje: el emparejamiento temporal de un vehículo,
//! un conductor al volante (driver) y opcionalmente un cobrador (conductor).
//! El planificador de sesiones garantiza que ningún recurso quede comprometido
//! en dos viajes que se solapen.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;

/// Tipo de recurso que una sesión compromete - mapea al ENUM resource_kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "resource_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Driver,
    Conductor,
    Vehicle,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Driver => write!(f, "driver"),
            ResourceKind::Conductor => write!(f, "conductor"),
            ResourceKind::Vehicle => write!(f, "vehicle"),
        }
    }
}

/// Referencia a un recurso concreto comprometido por una sesión
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub id: i64,
}

impl ResourceRef {
    pub fn new(kind: ResourceKind, id: i64) -> Self {
        Self { kind, id }
    }
}

/// Session principal - mapea exactamente a la tabla sessions
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: i64,
    pub driver_id: i64,
    pub conductor_id: Option<i64>,
    pub vehicle_id: i64,
    pub route_id: Option<i64>,
    pub start_time: DateTime<Utc>,
    /// Fin derivado (start + duración de ruta) o explícito si `ended`
    pub end_time: Option<DateTime<Utc>>,
    /// true solo cuando se registró un fin de viaje explícito
    pub ended: bool,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Recursos que esta sesión compromete (driver, vehicle y conductor si existe)
    pub fn resources(&self) -> Vec<ResourceRef> {
        let mut refs = vec![
            ResourceRef::new(ResourceKind::Vehicle, self.vehicle_id),
            ResourceRef::new(ResourceKind::Driver, self.driver_id),
        ];
        if let Some(conductor_id) = self.conductor_id {
            refs.push(ResourceRef::new(ResourceKind::Conductor, conductor_id));
        }
        refs
    }

    /// Fin efectivo de la sesión: end_time explícito si existe,
    /// si no start_time + duración estimada de la ruta asignada.
    /// Una ruta sin duración produce una ventana de longitud cero.
    pub fn effective_end(&self, route_minutes: Option<i32>) -> DateTime<Utc> {
        if let Some(end) = self.end_time {
            return end;
        }
        let minutes = route_minutes.unwrap_or(0).max(0) as i64;
        self.start_time + Duration::minutes(minutes)
    }

    pub fn is_active_at(&self, instant: DateTime<Utc>) -> bool {
        match self.end_time {
            Some(end) => end > instant,
            None => true,
        }
    }
}

/// Sesión nueva, todavía sin identificador asignado
#[derive(Debug, Clone)]
pub struct NewSession {
    pub driver_id: i64,
    pub conductor_id: Option<i64>,
    pub vehicle_id: i64,
    pub route_id: Option<i64>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl NewSession {
    pub fn resources(&self) -> Vec<ResourceRef> {
        let mut refs = vec![
            ResourceRef::new(ResourceKind::Vehicle, self.vehicle_id),
            ResourceRef::new(ResourceKind::Driver, self.driver_id),
        ];
        if let Some(conductor_id) = self.conductor_id {
            refs.push(ResourceRef::new(ResourceKind::Conductor, conductor_id));
        }
        refs
    }
}

/// Resultado efímero de una verificación de conflicto - no se persiste
#[derive(Debug, Clone)]
pub struct ConflictCheck {
    pub is_conflicting: bool,
    pub conflicting_session: Option<Session>,
}

impl ConflictCheck {
    pub fn clear() -> Self {
        Self {
            is_conflicting: false,
            conflicting_session: None,
        }
    }

    pub fn against(session: Session) -> Self {
        Self {
            is_conflicting: true,
            conflicting_session: Some(session),
        }
    }
}
