//! Backend de seguimiento de flota para una red de autobuses públicos
//!
//! Registra usuarios, vehículos, dispositivos y rutas geocodificadas; abre y
//! cierra sesiones (vehículo + chofer + cobrador para un viaje) con detección
//! de conflictos de agenda; ingiere telemetría GPS de sesiones activas; y
//! responde búsquedas de pasajeros con una parada cercana y un ETA estimado.

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
