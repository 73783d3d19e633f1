//! Locks por recurso para el planificador
//!
//! El chequeo de conflictos y el insert de una sesión no son atómicos entre
//! sí a nivel de store; este mapa de mutex por recurso mantiene la sección
//! crítica check-then-insert exclusiva dentro del proceso. La constraint
//! UNIQUE de session_slots cubre además la carrera de instante exacto en la
//! base de datos.
//!
//! Los locks se adquieren siempre en orden ordenado de recurso para que dos
//! peticiones que comparten recursos no puedan abrazarse mutuamente.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::models::session::ResourceRef;

#[derive(Default)]
pub struct ResourceLockMap {
    locks: Mutex<HashMap<ResourceRef, Arc<AsyncMutex<()>>>>,
}

impl ResourceLockMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adquirir los locks de todos los recursos dados, en orden estable.
    /// Los guards devueltos liberan la sección crítica al soltarse.
    pub async fn acquire(&self, resources: &[ResourceRef]) -> Vec<OwnedMutexGuard<()>> {
        let mut sorted: Vec<ResourceRef> = resources.to_vec();
        sorted.sort();
        sorted.dedup();

        // Resolver los handles con el mapa bloqueado, sin await de por medio
        let handles: Vec<Arc<AsyncMutex<()>>> = {
            let mut map = self.locks.lock().expect("resource lock map poisoned");
            sorted
                .iter()
                .map(|r| Arc::clone(map.entry(*r).or_default()))
                .collect()
        };

        let mut guards = Vec::with_capacity(handles.len());
        for handle in handles {
            guards.push(handle.lock_owned().await);
        }
        guards
    }
}
