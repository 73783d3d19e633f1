//! Pruebas de la búsqueda de pasajeros: coincidencia exacta de destino,
//! parada más cercana por Haversine y armado de los resultados por autobús.

mod common;

use common::{backend, route_with_stops, stop, TestBackend};

use bus_fleet_tracking::dto::search_dto::SearchBusesRequest;
use bus_fleet_tracking::dto::session_dto::CreateSessionRequest;
use bus_fleet_tracking::dto::telemetry_dto::RecordTelemetryRequest;
use bus_fleet_tracking::utils::errors::AppError;

fn search_near(destination: &str, lat: f64, lng: f64) -> SearchBusesRequest {
    SearchBusesRequest {
        destination: destination.to_string(),
        bus_stop: None,
        current_lat: Some(lat),
        current_lng: Some(lng),
    }
}

/// Backend con una ruta hacia CityB, una sesión activa (inicio en el futuro
/// lejano para que el fin derivado nunca quede en el pasado) y un reporte
/// de posición en el origen de la ruta.
async fn seeded() -> (TestBackend, i64) {
    let backend = backend();
    backend.resources.add_driver(1, "Rosa Jiménez");
    backend.resources.add_vehicle(1);
    backend.routes.add(route_with_stops(
        100,
        "Linea 7",
        1,
        vec![
            stop("CityA", 0.0, 0.0),
            stop("Central", 0.0, 1.0),
            stop("CityB", 0.0, 2.0),
        ],
        60,
    ));
    let session = backend
        .scheduler
        .create_session(CreateSessionRequest {
            driver_id: 1,
            conductor_id: None,
            vehicle_id: 1,
            start_time: "2099-06-01T08:00:00Z".to_string(),
        })
        .await
        .unwrap();
    backend
        .eta
        .record_telemetry(RecordTelemetryRequest {
            session_id: session.id,
            latitude: 0.0,
            longitude: 0.0,
            speed: Some(36.0),
            timestamp: None,
            driver_id: None,
        })
        .await
        .unwrap();
    (backend, session.id)
}

#[tokio::test]
async fn finds_buses_toward_the_destination() {
    let (backend, session_id) = seeded().await;

    // El pasajero está a 0.1 grados de Central y mucho más lejos del resto
    let response = backend
        .search
        .search_buses(search_near("CityB", 0.0, 1.1))
        .await
        .unwrap();

    assert_eq!(response.nearest_stop.as_deref(), Some("Central"));
    assert_eq!(response.buses.len(), 1);
    let bus = &response.buses[0];
    assert_eq!(bus.session_id, session_id);
    assert_eq!(bus.route_name, "Linea 7");
    assert_eq!(bus.driver.as_deref(), Some("Rosa Jiménez"));
    assert_eq!(bus.latitude, Some(0.0));
    assert_eq!(bus.longitude, Some(0.0));
    assert!(bus.eta_minutes.is_some());
    assert!(bus.eta_minutes.unwrap() > 0);
}

#[tokio::test]
async fn unknown_destination_yields_an_empty_response() {
    let (backend, _) = seeded().await;
    let response = backend
        .search
        .search_buses(search_near("CityZ", 0.0, 1.1))
        .await
        .unwrap();
    assert_eq!(response.nearest_stop, None);
    assert!(response.buses.is_empty());
}

#[tokio::test]
async fn destination_match_is_exact() {
    let (backend, _) = seeded().await;
    // Ni casing distinto ni prefijos cuentan como coincidencia
    let response = backend
        .search
        .search_buses(search_near("cityb", 0.0, 1.1))
        .await
        .unwrap();
    assert!(response.buses.is_empty());
}

#[tokio::test]
async fn explicit_bus_stop_skips_the_nearest_search() {
    let (backend, _) = seeded().await;
    let response = backend
        .search
        .search_buses(SearchBusesRequest {
            destination: "CityB".to_string(),
            bus_stop: Some("CityA".to_string()),
            current_lat: None,
            current_lng: None,
        })
        .await
        .unwrap();
    assert_eq!(response.nearest_stop.as_deref(), Some("CityA"));
    assert_eq!(response.buses.len(), 1);
}

#[tokio::test]
async fn bus_stop_not_on_any_route_yields_empty() {
    let (backend, _) = seeded().await;
    let response = backend
        .search
        .search_buses(SearchBusesRequest {
            destination: "CityB".to_string(),
            bus_stop: Some("Terminal Norte".to_string()),
            current_lat: None,
            current_lng: None,
        })
        .await
        .unwrap();
    assert_eq!(response.nearest_stop, None);
    assert!(response.buses.is_empty());
}

#[tokio::test]
async fn missing_coordinates_without_bus_stop_is_invalid() {
    let (backend, _) = seeded().await;
    let result = backend
        .search
        .search_buses(SearchBusesRequest {
            destination: "CityB".to_string(),
            bus_stop: None,
            current_lat: Some(0.0),
            current_lng: None,
        })
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn blank_destination_is_invalid() {
    let (backend, _) = seeded().await;
    let result = backend.search.search_buses(search_near("   ", 0.0, 1.1)).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn distance_ties_keep_the_first_stop_encountered() {
    let backend = backend();
    backend.resources.add_driver(1, "Rosa Jiménez");
    backend.resources.add_vehicle(1);
    backend.resources.add_vehicle(2);
    // Dos rutas al mismo destino con paradas equidistantes del pasajero
    backend.routes.add(route_with_stops(
        100,
        "Linea Norte",
        1,
        vec![stop("Norte", 1.0, 0.0), stop("CityB", 0.0, 2.0)],
        30,
    ));
    backend.routes.add(route_with_stops(
        200,
        "Linea Sur",
        2,
        vec![stop("Sur", -1.0, 0.0), stop("CityB", 0.0, 2.0)],
        30,
    ));

    let response = backend
        .search
        .search_buses(search_near("CityB", 0.0, 0.0))
        .await
        .unwrap();
    assert_eq!(response.nearest_stop.as_deref(), Some("Norte"));
}

#[tokio::test]
async fn sessions_ended_in_the_past_are_not_listed() {
    let (backend, session_id) = seeded().await;
    backend
        .scheduler
        .end_session(
            session_id,
            bus_fleet_tracking::dto::session_dto::EndSessionRequest {
                end_time: Some("2020-01-01T00:00:00Z".to_string()),
            },
        )
        .await
        .unwrap();

    let response = backend
        .search
        .search_buses(search_near("CityB", 0.0, 1.1))
        .await
        .unwrap();
    assert!(response.buses.is_empty());
    assert_eq!(response.nearest_stop.as_deref(), Some("Central"));
}
