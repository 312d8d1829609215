//! # Handlers HTTP para Jobs
//! src/jobs/handlers.rs
//!
//! Implementa los endpoints del sistema de jobs:
//! - `POST /start`
//! - `GET /status?job_id=ID`

use crate::http::{Request, Response, StatusCode};
use crate::jobs::job::JobStatus;
use crate::jobs::registry::{JobRegistry, RegistryError};
use serde::Serialize;

/// Cuerpo de la respuesta de `POST /start`
#[derive(Serialize)]
struct StartBody<'a> {
    job_id: &'a str,
}

/// Cuerpo de la respuesta de `GET /status`
#[derive(Serialize)]
struct StatusBody<'a> {
    job_id: &'a str,
    status: JobStatus,
}

/// Handler para `POST /start`
///
/// Crea un job y retorna su ID. No lee el cuerpo del request (el
/// endpoint no lo requiere) ni valida el método, igual que el resto
/// de rutas del servidor.
///
/// # Ejemplo de response
/// ```json
/// {"job_id": "550e8400-e29b-41d4-a716-446655440000"}
/// ```
pub fn start_handler(_req: &Request, registry: &JobRegistry) -> Response {
    let job_id = registry.create();

    match serde_json::to_string(&StartBody { job_id: &job_id }) {
        Ok(body) => Response::json_with_status(StatusCode::Created, &body),
        Err(_) => Response::error(
            StatusCode::InternalServerError,
            "Failed to encode response",
        ),
    }
}

/// Handler para `GET /status?job_id=ID`
///
/// Consulta el estado actual de un job. La lectura aplica las
/// transiciones perezosas del registro (timeout e inyección de fallos).
///
/// # Query parameters
/// - `job_id`: ID del job (requerido)
///
/// # Ejemplo de response
/// ```json
/// {"job_id": "550e8400-...", "status": "pending"}
/// ```
pub fn status_handler(req: &Request, registry: &JobRegistry) -> Response {
    let job_id = match req.query_param("job_id") {
        Some(id) if !id.is_empty() => id,
        _ => {
            return Response::error(
                StatusCode::BadRequest,
                "Missing job_id query parameter",
            );
        }
    };

    match registry.get_status(job_id) {
        Ok(status) => {
            match serde_json::to_string(&StatusBody { job_id, status }) {
                Ok(body) => Response::json(&body),
                Err(_) => Response::error(
                    StatusCode::InternalServerError,
                    "Failed to encode response",
                ),
            }
        }
        Err(RegistryError::NotFound(_)) => {
            Response::error(StatusCode::NotFound, "Job not found")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::failure::NeverFail;
    use std::time::Duration;

    fn test_registry() -> JobRegistry {
        JobRegistry::with_failure_source(Duration::from_secs(60), Box::new(NeverFail))
    }

    fn body_string(response: &Response) -> String {
        String::from_utf8(response.body().to_vec()).unwrap()
    }

    #[test]
    fn test_start_handler_creates_job() {
        let raw = b"POST /start HTTP/1.0\r\n\r\n";
        let request = Request::parse(raw).unwrap();
        let registry = test_registry();

        let response = start_handler(&request, &registry);
        assert_eq!(response.status(), StatusCode::Created);

        let body: serde_json::Value = serde_json::from_str(&body_string(&response)).unwrap();
        let job_id = body["job_id"].as_str().unwrap();
        assert!(!job_id.is_empty());

        // El ID retornado debe ser consultable inmediatamente
        assert!(registry.get_status(job_id).is_ok());
    }

    #[test]
    fn test_status_handler_missing_job_id() {
        let raw = b"GET /status HTTP/1.0\r\n\r\n";
        let request = Request::parse(raw).unwrap();
        let registry = test_registry();

        let response = status_handler(&request, &registry);
        assert_eq!(response.status(), StatusCode::BadRequest);
        assert!(body_string(&response).contains("job_id"));
    }

    #[test]
    fn test_status_handler_empty_job_id() {
        let raw = b"GET /status?job_id= HTTP/1.0\r\n\r\n";
        let request = Request::parse(raw).unwrap();
        let registry = test_registry();

        let response = status_handler(&request, &registry);
        assert_eq!(response.status(), StatusCode::BadRequest);
    }

    #[test]
    fn test_status_handler_not_found() {
        let raw = b"GET /status?job_id=nonexistent HTTP/1.0\r\n\r\n";
        let request = Request::parse(raw).unwrap();
        let registry = test_registry();

        let response = status_handler(&request, &registry);
        assert_eq!(response.status(), StatusCode::NotFound);
    }

    #[test]
    fn test_status_handler_pending_job() {
        let registry = test_registry();
        let job_id = registry.create();

        let raw = format!("GET /status?job_id={} HTTP/1.0\r\n\r\n", job_id);
        let request = Request::parse(raw.as_bytes()).unwrap();

        let response = status_handler(&request, &registry);
        assert_eq!(response.status(), StatusCode::Ok);

        let body: serde_json::Value = serde_json::from_str(&body_string(&response)).unwrap();
        assert_eq!(body["job_id"], job_id.as_str());
        assert_eq!(body["status"], "pending");
    }
}
