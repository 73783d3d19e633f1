//! Repositorio de rutas
//!
//! CRUD administrativo sobre la tabla routes más el contrato de solo lectura
//! `RouteDirectory` que consumen el planificador, el motor de ETA y la
//! búsqueda de pasajeros.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::route::{BusStop, Route};
use crate::utils::errors::{AppError, AppResult};

const ROUTE_NAME_CONSTRAINT: &str = "routes_route_name_key";
const ROUTE_VEHICLE_CONSTRAINT: &str = "routes_vehicle_id_key";

/// Contrato de lectura del directorio de rutas
#[async_trait]
pub trait RouteDirectory: Send + Sync {
    async fn get_route_by_id(&self, id: i64) -> AppResult<Option<Route>>;

    /// Ruta actualmente asignada al vehículo, si existe (el vínculo es exclusivo)
    async fn get_route_by_vehicle(&self, vehicle_id: i64) -> AppResult<Option<Route>>;

    /// Rutas cuyo destino declarado coincide exactamente con el nombre dado
    async fn find_routes_by_destination(&self, destination: &str) -> AppResult<Vec<Route>>;

    async fn list_routes(&self) -> AppResult<Vec<Route>>;
}

/// Ruta nueva lista para persistir; `stops` ya es el recorrido completo
#[derive(Debug, Clone)]
pub struct NewRoute {
    pub route_name: String,
    pub vehicle_id: i64,
    pub destination_name: String,
    pub stops: Vec<BusStop>,
    pub estimated_time_minutes: i32,
}

pub struct PgRouteRepository {
    pool: PgPool,
}

impl PgRouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, route: NewRoute) -> AppResult<Route> {
        let stored = sqlx::query_as::<_, Route>(
            r#"
            INSERT INTO routes (route_name, vehicle_id, destination_name, stops, estimated_time_minutes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&route.route_name)
        .bind(route.vehicle_id)
        .bind(&route.destination_name)
        .bind(Json(&route.stops))
        .bind(route.estimated_time_minutes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_route_constraint(e, &route.route_name, route.vehicle_id))?;

        Ok(stored)
    }

    pub async fn update(&self, route: Route) -> AppResult<Route> {
        let stored = sqlx::query_as::<_, Route>(
            r#"
            UPDATE routes
            SET route_name = $2, vehicle_id = $3, destination_name = $4,
                stops = $5, estimated_time_minutes = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(route.id)
        .bind(&route.route_name)
        .bind(route.vehicle_id)
        .bind(&route.destination_name)
        .bind(Json(&route.stops.0))
        .bind(route.estimated_time_minutes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_route_constraint(e, &route.route_name, route.vehicle_id))?
        .ok_or_else(|| AppError::NotFound(format!("Route with id '{}' not found", route.id)))?;

        Ok(stored)
    }

    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM routes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn map_route_constraint(error: sqlx::Error, route_name: &str, vehicle_id: i64) -> AppError {
    if super::is_unique_violation(&error, ROUTE_NAME_CONSTRAINT) {
        return AppError::Conflict(format!("Route with name '{}' already exists", route_name));
    }
    if super::is_unique_violation(&error, ROUTE_VEHICLE_CONSTRAINT) {
        return AppError::Conflict(format!(
            "Vehicle '{}' is already bound to another route",
            vehicle_id
        ));
    }
    AppError::Database(error)
}

#[async_trait]
impl RouteDirectory for PgRouteRepository {
    async fn get_route_by_id(&self, id: i64) -> AppResult<Option<Route>> {
        let route = sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(route)
    }

    async fn get_route_by_vehicle(&self, vehicle_id: i64) -> AppResult<Option<Route>> {
        let route = sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE vehicle_id = $1")
            .bind(vehicle_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(route)
    }

    async fn find_routes_by_destination(&self, destination: &str) -> AppResult<Vec<Route>> {
        // Coincidencia exacta, sensible a mayúsculas (decisión de producto)
        let routes = sqlx::query_as::<_, Route>(
            "SELECT * FROM routes WHERE destination_name = $1 ORDER BY id ASC",
        )
        .bind(destination)
        .fetch_all(&self.pool)
        .await?;
        Ok(routes)
    }

    async fn list_routes(&self) -> AppResult<Vec<Route>> {
        let routes = sqlx::query_as::<_, Route>("SELECT * FROM routes ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(routes)
    }
}
