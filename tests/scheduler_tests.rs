//! Pruebas de integración del planificador de sesiones sobre los stores en
//! memoria: conflictos de hora exacta, solapamientos derivados de la duración
//! de ruta y cierre explícito de viajes.

mod common;

use common::{at, backend, route_with_stops, stop, TestBackend};

use bus_fleet_tracking::dto::session_dto::{
    CreateSessionRequest, EndSessionRequest, UpdateSessionRequest,
};
use bus_fleet_tracking::models::session::{NewSession, ResourceKind, ResourceRef, Session};
use bus_fleet_tracking::repositories::session_repository::SessionStore;
use bus_fleet_tracking::utils::errors::AppError;

fn start_request(driver_id: i64, vehicle_id: i64, start_time: &str) -> CreateSessionRequest {
    CreateSessionRequest {
        driver_id,
        conductor_id: None,
        vehicle_id,
        start_time: start_time.to_string(),
    }
}

/// Backend con un chofer, un cobrador y dos vehículos; el vehículo 1 tiene
/// una ruta de 60 minutos asignada.
fn seeded() -> TestBackend {
    let backend = backend();
    backend.resources.add_driver(1, "Rosa Jiménez");
    backend.resources.add_driver(2, "Marco Díaz");
    backend.resources.add_conductor(10);
    backend.resources.add_vehicle(1);
    backend.resources.add_vehicle(2);
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
    backend
}

#[tokio::test]
async fn create_binds_route_and_derives_end_time() {
    let backend = seeded();
    let session = backend
        .scheduler
        .create_session(start_request(1, 1, "2025-06-01T08:00:00Z"))
        .await
        .unwrap();

    assert_eq!(session.route_id, Some(100));
    assert_eq!(session.end_time, Some(at("2025-06-01T09:00:00Z")));
    assert!(!session.ended);
}

#[tokio::test]
async fn create_without_route_leaves_end_time_open() {
    let backend = seeded();
    let session = backend
        .scheduler
        .create_session(start_request(1, 2, "2025-06-01T08:00:00Z"))
        .await
        .unwrap();

    assert_eq!(session.route_id, None);
    assert_eq!(session.end_time, None);
}

#[tokio::test]
async fn same_resource_same_instant_is_rejected() {
    let backend = seeded();
    backend
        .scheduler
        .create_session(start_request(1, 1, "2025-06-01T08:00:00Z"))
        .await
        .unwrap();

    // Mismo chofer, otro vehículo, exactamente la misma hora
    let result = backend
        .scheduler
        .create_session(start_request(1, 2, "2025-06-01T08:00:00Z"))
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn overlap_within_route_window_is_rejected() {
    let backend = seeded();
    backend
        .scheduler
        .create_session(start_request(1, 1, "2025-06-01T08:00:00Z"))
        .await
        .unwrap();

    // La ruta dura 60 minutos: a las 08:30 el chofer sigue comprometido
    let result = backend
        .scheduler
        .create_session(start_request(1, 2, "2025-06-01T08:30:00Z"))
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn starting_exactly_at_prior_end_is_allowed() {
    let backend = seeded();
    backend
        .scheduler
        .create_session(start_request(1, 1, "2025-06-01T08:00:00Z"))
        .await
        .unwrap();

    let session = backend
        .scheduler
        .create_session(start_request(1, 2, "2025-06-01T09:00:00Z"))
        .await
        .unwrap();
    assert_eq!(session.driver_id, 1);
}

#[tokio::test]
async fn zero_duration_route_never_overlaps() {
    let backend = backend();
    backend.resources.add_driver(1, "Rosa Jiménez");
    backend.resources.add_vehicle(3);
    backend.resources.add_vehicle(4);
    backend.routes.add(route_with_stops(
        200,
        "Circuito corto",
        3,
        vec![stop("CityA", 0.0, 0.0), stop("CityB", 0.0, 1.0)],
        0,
    ));

    backend
        .scheduler
        .create_session(start_request(1, 3, "2025-06-01T08:00:00Z"))
        .await
        .unwrap();

    // Un minuto después ya no hay ventana ocupada
    let session = backend
        .scheduler
        .create_session(start_request(1, 4, "2025-06-01T08:01:00Z"))
        .await
        .unwrap();
    assert_eq!(session.vehicle_id, 4);
}

#[tokio::test]
async fn conductor_is_also_a_guarded_resource() {
    let backend = seeded();
    let mut first = start_request(1, 1, "2025-06-01T08:00:00Z");
    first.conductor_id = Some(10);
    backend.scheduler.create_session(first).await.unwrap();

    // Otro chofer y otro vehículo, pero el mismo cobrador a la misma hora
    let mut second = start_request(2, 2, "2025-06-01T08:00:00Z");
    second.conductor_id = Some(10);
    let result = backend.scheduler.create_session(second).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn missing_driver_is_not_found() {
    let backend = seeded();
    let result = backend
        .scheduler
        .create_session(start_request(99, 1, "2025-06-01T08:00:00Z"))
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn malformed_start_time_is_rejected() {
    let backend = seeded();
    let result = backend
        .scheduler
        .create_session(start_request(1, 1, "mañana a las ocho"))
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn update_does_not_conflict_with_itself() {
    let backend = seeded();
    let session = backend
        .scheduler
        .create_session(start_request(1, 1, "2025-06-01T08:00:00Z"))
        .await
        .unwrap();

    // Mismo horario, mismos recursos: la sesión se excluye a sí misma
    let updated = backend
        .scheduler
        .update_session(
            session.id,
            UpdateSessionRequest {
                driver_id: None,
                conductor_id: None,
                vehicle_id: None,
                start_time: Some("2025-06-01T08:00:00Z".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.id, session.id);
    assert_eq!(updated.start_time, session.start_time);
}

#[tokio::test]
async fn update_into_taken_slot_is_rejected() {
    let backend = seeded();
    backend
        .scheduler
        .create_session(start_request(1, 1, "2025-06-01T08:00:00Z"))
        .await
        .unwrap();
    let second = backend
        .scheduler
        .create_session(start_request(1, 2, "2025-06-01T10:00:00Z"))
        .await
        .unwrap();

    let result = backend
        .scheduler
        .update_session(
            second.id,
            UpdateSessionRequest {
                driver_id: None,
                conductor_id: None,
                vehicle_id: None,
                start_time: Some("2025-06-01T08:00:00Z".to_string()),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn end_session_marks_trip_completed() {
    let backend = seeded();
    let session = backend
        .scheduler
        .create_session(start_request(1, 1, "2025-06-01T08:00:00Z"))
        .await
        .unwrap();

    let ended = backend
        .scheduler
        .end_session(
            session.id,
            EndSessionRequest {
                end_time: Some("2025-06-01T08:45:00Z".to_string()),
            },
        )
        .await
        .unwrap();
    assert!(ended.ended);
    assert_eq!(ended.end_time, Some(at("2025-06-01T08:45:00Z")));
}

#[tokio::test]
async fn ending_twice_is_a_bad_request() {
    let backend = seeded();
    let session = backend
        .scheduler
        .create_session(start_request(1, 1, "2025-06-01T08:00:00Z"))
        .await
        .unwrap();

    backend
        .scheduler
        .end_session(session.id, EndSessionRequest { end_time: None })
        .await
        .unwrap();
    let result = backend
        .scheduler
        .end_session(session.id, EndSessionRequest { end_time: None })
        .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn concurrent_creates_for_same_slot_admit_exactly_one() {
    let backend = seeded();
    let scheduler_a = backend.scheduler.clone();
    let scheduler_b = backend.scheduler.clone();

    let (first, second) = tokio::join!(
        scheduler_a.create_session(start_request(1, 1, "2025-06-01T08:00:00Z")),
        scheduler_b.create_session(start_request(1, 2, "2025-06-01T08:00:00Z")),
    );

    let successes = [first.is_ok(), second.is_ok()]
        .iter()
        .filter(|ok| **ok)
        .count();
    assert_eq!(successes, 1);
    let conflict = if first.is_err() { first } else { second };
    assert!(matches!(conflict, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn list_is_ordered_by_start_time() {
    let backend = seeded();
    backend
        .scheduler
        .create_session(start_request(1, 1, "2025-06-01T10:00:00Z"))
        .await
        .unwrap();
    backend
        .scheduler
        .create_session(start_request(2, 2, "2025-06-01T08:00:00Z"))
        .await
        .unwrap();

    let sessions = backend.scheduler.list_sessions().await.unwrap();
    assert_eq!(sessions.len(), 2);
    assert!(sessions[0].start_time < sessions[1].start_time);
}

#[tokio::test]
async fn upcoming_returns_the_nearest_future_session() {
    let backend = seeded();
    backend
        .scheduler
        .create_session(start_request(1, 1, "2099-06-02T08:00:00Z"))
        .await
        .unwrap();
    let near = backend
        .scheduler
        .create_session(start_request(2, 1, "2099-06-01T08:00:00Z"))
        .await
        .unwrap();

    let upcoming = backend
        .scheduler
        .get_upcoming_session_for_vehicle(1)
        .await
        .unwrap();
    assert_eq!(upcoming.map(|s| s.id), Some(near.id));
}

#[tokio::test]
async fn delete_reports_whether_the_session_existed() {
    let backend = seeded();
    let session = backend
        .scheduler
        .create_session(start_request(1, 1, "2025-06-01T08:00:00Z"))
        .await
        .unwrap();

    assert!(backend.scheduler.delete_session(session.id).await.unwrap());
    assert!(!backend.scheduler.delete_session(session.id).await.unwrap());
}

#[tokio::test]
async fn lifecycle_operations_leave_an_audit_trail() {
    let backend = seeded();
    let session = backend
        .scheduler
        .create_session(start_request(1, 1, "2025-06-01T08:00:00Z"))
        .await
        .unwrap();
    backend
        .scheduler
        .update_session(
            session.id,
            UpdateSessionRequest {
                driver_id: None,
                conductor_id: None,
                vehicle_id: None,
                start_time: Some("2025-06-01T09:00:00Z".to_string()),
            },
        )
        .await
        .unwrap();
    backend
        .scheduler
        .end_session(session.id, EndSessionRequest { end_time: None })
        .await
        .unwrap();
    backend.scheduler.delete_session(session.id).await.unwrap();

    assert_eq!(
        backend.audit.actions(),
        vec![
            "session.start",
            "session.update",
            "session.end",
            "session.delete"
        ]
    );
}

#[tokio::test]
async fn rejected_updates_do_not_change_any_audit_or_booking() {
    let backend = seeded();
    backend
        .scheduler
        .create_session(start_request(1, 1, "2025-06-01T08:00:00Z"))
        .await
        .unwrap();
    let second = backend
        .scheduler
        .create_session(start_request(1, 2, "2025-06-01T10:00:00Z"))
        .await
        .unwrap();

    let result = backend
        .scheduler
        .update_session(
            second.id,
            UpdateSessionRequest {
                driver_id: None,
                conductor_id: None,
                vehicle_id: None,
                start_time: Some("2025-06-01T08:00:00Z".to_string()),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
    // Solo las dos altas quedaron en la auditoría
    assert_eq!(backend.audit.actions(), vec!["session.start", "session.start"]);
}

#[tokio::test]
async fn failed_replace_keeps_the_prior_slots_intact() {
    let backend = seeded();
    let store = backend.sessions.clone();
    store
        .insert(NewSession {
            driver_id: 1,
            conductor_id: None,
            vehicle_id: 1,
            route_id: None,
            start_time: at("2025-06-01T08:00:00Z"),
            end_time: None,
        })
        .await
        .unwrap();
    let second = store
        .insert(NewSession {
            driver_id: 2,
            conductor_id: None,
            vehicle_id: 2,
            route_id: None,
            start_time: at("2025-06-01T10:00:00Z"),
            end_time: None,
        })
        .await
        .unwrap();

    // Mover la segunda sesión encima del slot tomado por la primera falla
    let result = store
        .replace(Session {
            driver_id: 1,
            start_time: at("2025-06-01T08:00:00Z"),
            ..second.clone()
        })
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    // La sesión rechazada conserva sus slots originales
    let kept = store
        .find_at(
            ResourceRef::new(ResourceKind::Driver, 2),
            at("2025-06-01T10:00:00Z"),
            None,
        )
        .await
        .unwrap();
    assert_eq!(kept.map(|s| s.id), Some(second.id));
}

#[tokio::test]
async fn deleting_a_session_frees_its_slots() {
    let backend = seeded();
    let session = backend
        .scheduler
        .create_session(start_request(1, 1, "2025-06-01T08:00:00Z"))
        .await
        .unwrap();
    backend.scheduler.delete_session(session.id).await.unwrap();

    let replacement = backend
        .scheduler
        .create_session(start_request(1, 1, "2025-06-01T08:00:00Z"))
        .await
        .unwrap();
    assert_ne!(replacement.id, session.id);
}
