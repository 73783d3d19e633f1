//! Controller de rutas
//!
//! Arma el recorrido completo ([origen, ...intermedias, destino]), valida
//! cada parada geocodificada y hace cumplir los vínculos exclusivos: nombre
//! de ruta único y un vehículo atado a lo sumo a una ruta.

use sqlx::PgPool;
use validator::Validate;

use crate::dto::route_dto::{CreateRouteRequest, RouteResponse, StopInput, UpdateRouteRequest};
use crate::models::route::{BusStop, Route};
use crate::repositories::route_repository::{NewRoute, PgRouteRepository, RouteDirectory};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::geo::is_valid_gps;
use crate::utils::validation::require_not_empty;

pub struct RouteController {
    repository: PgRouteRepository,
    vehicles: VehicleRepository,
}

impl RouteController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgRouteRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool),
        }
    }

    pub async fn create(&self, request: CreateRouteRequest) -> AppResult<RouteResponse> {
        request.validate()?;

        let stops = build_traversal(
            request.source.clone(),
            request.route_points.clone(),
            request.destination.clone(),
        )?;

        self.ensure_vehicle_bindable(request.vehicle_id, None).await?;

        let destination_name = request.destination.name.clone();
        let route = self
            .repository
            .create(NewRoute {
                route_name: request.route_name,
                vehicle_id: request.vehicle_id,
                destination_name,
                stops,
                estimated_time_minutes: request.estimated_time,
            })
            .await?;

        Ok(route.into())
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<RouteResponse> {
        let route = self
            .repository
            .get_route_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Route with id '{}' not found", id)))?;
        Ok(route.into())
    }

    pub async fn list(&self) -> AppResult<Vec<RouteResponse>> {
        let routes = self.repository.list_routes().await?;
        Ok(routes.into_iter().map(Into::into).collect())
    }

    pub async fn update(&self, id: i64, request: UpdateRouteRequest) -> AppResult<RouteResponse> {
        request.validate()?;

        let current = self
            .repository
            .get_route_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Route with id '{}' not found", id)))?;

        // El recorrido solo se reconstruye si cambia alguna de sus partes
        let stops = if request.source.is_some()
            || request.destination.is_some()
            || request.route_points.is_some()
        {
            let source = match &request.source {
                Some(s) => s.clone(),
                None => stop_input(current.source().ok_or_else(corrupt_route)?),
            };
            let destination = match &request.destination {
                Some(d) => d.clone(),
                None => stop_input(current.destination().ok_or_else(corrupt_route)?),
            };
            let middle = match &request.route_points {
                Some(points) => points.clone(),
                None => {
                    let full = &current.stops.0;
                    if full.len() > 2 {
                        full[1..full.len() - 1].iter().map(stop_input).collect()
                    } else {
                        Vec::new()
                    }
                }
            };
            build_traversal(source, middle, destination)?
        } else {
            current.stops.0.clone()
        };

        let vehicle_id = request.vehicle_id.unwrap_or(current.vehicle_id);
        if vehicle_id != current.vehicle_id {
            self.ensure_vehicle_bindable(vehicle_id, Some(id)).await?;
        }

        let destination_name = stops
            .last()
            .map(|s| s.name.clone())
            .ok_or_else(corrupt_route)?;

        let route = self
            .repository
            .update(Route {
                id: current.id,
                route_name: request.route_name.unwrap_or(current.route_name),
                vehicle_id,
                destination_name,
                stops: sqlx::types::Json(stops),
                estimated_time_minutes: request.estimated_time.unwrap_or(current.estimated_time_minutes),
                created_at: current.created_at,
            })
            .await?;

        Ok(route.into())
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.repository.delete(id).await? {
            return Err(AppError::NotFound(format!(
                "Route with id '{}' not found",
                id
            )));
        }
        Ok(())
    }

    /// El vehículo debe existir y no estar atado a otra ruta
    async fn ensure_vehicle_bindable(
        &self,
        vehicle_id: i64,
        exclude_route: Option<i64>,
    ) -> AppResult<()> {
        if self.vehicles.find_by_id(vehicle_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Vehicle with id '{}' not found",
                vehicle_id
            )));
        }
        if let Some(bound) = self.repository.get_route_by_vehicle(vehicle_id).await? {
            if Some(bound.id) != exclude_route {
                return Err(AppError::Conflict(format!(
                    "Vehicle '{}' is already bound to route '{}'",
                    vehicle_id, bound.route_name
                )));
            }
        }
        Ok(())
    }
}

/// Construir y validar el recorrido completo de la ruta
fn build_traversal(
    source: StopInput,
    middle: Vec<StopInput>,
    destination: StopInput,
) -> AppResult<Vec<BusStop>> {
    let mut stops: Vec<BusStop> = Vec::with_capacity(middle.len() + 2);
    stops.push(source.into());
    stops.extend(middle.into_iter().map(BusStop::from));
    stops.push(destination.into());

    for stop in &stops {
        require_not_empty(&stop.name, "stop name")?;
        if !is_valid_gps(stop.latitude, stop.longitude) {
            return Err(AppError::Validation(format!(
                "Stop '{}' has invalid GPS coordinates ({}, {})",
                stop.name, stop.latitude, stop.longitude
            )));
        }
    }
    Ok(stops)
}

fn stop_input(stop: &BusStop) -> StopInput {
    StopInput {
        name: stop.name.clone(),
        latitude: stop.latitude,
        longitude: stop.longitude,
    }
}

fn corrupt_route() -> AppError {
    AppError::Internal("Route has an empty stop traversal".to_string())
}
