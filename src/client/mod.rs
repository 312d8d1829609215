//! # Cliente de Polling
//! src/client/mod.rs
//!
//! Cliente HTTP bloqueante para el API de jobs. Crea un job con
//! `start_job` y luego consulta su estado con `poll_status` usando
//! backoff exponencial puro (el delay se duplica en cada intento, sin
//! jitter ni tope) hasta observar un estado terminal o agotar los
//! reintentos.
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use job_server::client::Client;
//!
//! let client = Client::new("http://localhost:8080");
//! let job_id = client.start_job().expect("Failed to start job");
//! let status = client.poll_status(&job_id).expect("Failed to poll status");
//! println!("Job {} terminó con estado {:?}", job_id, status);
//! ```
//!
//! El loop de polling es single-threaded y bloqueante. Para abortarlo
//! desde otro thread se le pasa un [`CancelToken`]:
//!
//! ```no_run
//! use job_server::client::{CancelToken, Client};
//!
//! let client = Client::new("http://localhost:8080");
//! let token = CancelToken::new();
//!
//! let handle = token.clone();
//! std::thread::spawn(move || {
//!     std::thread::sleep(std::time::Duration::from_secs(2));
//!     handle.cancel();
//! });
//!
//! let result = client.poll_status_with_token("some-job", &token);
//! ```

use crate::jobs::JobStatus;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Timeout de cada request HTTP individual
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Granularidad del sleep del backoff, para observar cancelación a tiempo
const CANCEL_CHECK_INTERVAL: Duration = Duration::from_millis(20);

/// Errores del cliente de polling
#[derive(Debug, Error)]
pub enum ClientError {
    /// Fallo de red o de conexión
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// El servidor respondió con un código fuera del esperado
    #[error("unexpected status code: expected {expected}, got {got}")]
    UnexpectedStatusCode { expected: u16, got: u16 },

    /// El cuerpo no se pudo parsear o le falta un campo requerido
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Se agotó el presupuesto de reintentos sin observar estado terminal
    #[error("job {job_id} did not reach a terminal status after {attempts} polls")]
    RetriesExhausted { job_id: String, attempts: u32 },

    /// El caller canceló el polling vía [`CancelToken`]
    #[error("polling was canceled")]
    Canceled,
}

/// Token de cancelación cooperativa para el loop de polling
///
/// Todos los clones comparten la misma bandera; `cancel()` es
/// idempotente y visible desde cualquier thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    canceled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Crea un token sin cancelar
    pub fn new() -> Self {
        Self::default()
    }

    /// Marca el token como cancelado
    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::SeqCst);
    }

    /// Verifica si el token fue cancelado
    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
    }
}

/// Cuerpo esperado de `POST /start`
#[derive(Debug, Deserialize)]
struct StartBody {
    job_id: String,
}

/// Cuerpo esperado de `GET /status`
///
/// Solo exige el campo `status`; cualquier otro campo se ignora.
#[derive(Debug, Deserialize)]
struct StatusBody {
    status: JobStatus,
}

/// Cliente del servidor de jobs
pub struct Client {
    /// URL base del servidor (ej: "http://localhost:8080")
    base_url: String,

    /// Cliente HTTP bloqueante
    http: reqwest::blocking::Client,

    /// Delay inicial entre polls (se duplica en cada intento)
    pub poll_delay: Duration,

    /// Máximo de consultas de estado antes de rendirse
    pub max_retries: u32,
}

impl Client {
    /// Crea un cliente con los defaults del protocolo:
    /// delay inicial de 1 segundo y 10 reintentos como máximo.
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            base_url: base_url.into(),
            http,
            poll_delay: Duration::from_secs(1),
            max_retries: 10,
        }
    }

    /// Crea un nuevo job en el servidor y retorna su ID
    ///
    /// # Errores
    /// - [`ClientError::Transport`] si la conexión falla
    /// - [`ClientError::UnexpectedStatusCode`] si la respuesta no es 201
    /// - [`ClientError::MalformedResponse`] si el cuerpo no trae `job_id`
    pub fn start_job(&self) -> Result<String, ClientError> {
        let url = format!("{}/start", self.base_url);
        let response = self.http.post(&url).send()?;

        let status = response.status();
        if status != reqwest::StatusCode::CREATED {
            return Err(ClientError::UnexpectedStatusCode {
                expected: 201,
                got: status.as_u16(),
            });
        }

        let body = response.text()?;
        let parsed: StartBody = serde_json::from_str(&body)
            .map_err(|e| ClientError::MalformedResponse(format!("invalid start body: {}", e)))?;

        if parsed.job_id.is_empty() {
            return Err(ClientError::MalformedResponse(
                "response carries an empty job_id".to_string(),
            ));
        }

        tracing::info!(job_id = %parsed.job_id, "job started");
        Ok(parsed.job_id)
    }

    /// Consulta el estado de un job hasta observar uno terminal
    ///
    /// Equivale a [`Client::poll_status_with_token`] con un token que
    /// nunca se cancela.
    pub fn poll_status(&self, job_id: &str) -> Result<JobStatus, ClientError> {
        self.poll_status_with_token(job_id, &CancelToken::new())
    }

    /// Consulta el estado de un job con backoff exponencial y cancelación
    ///
    /// Antes de cada consulta duerme el delay actual y luego lo duplica.
    /// Retorna en cuanto observa `completed` o `error`. Cualquier fallo
    /// de una consulta individual corta el loop inmediatamente: solo los
    /// estados no-terminales se reintentan.
    ///
    /// # Errores
    /// - [`ClientError::Canceled`] si el token se cancela durante el loop
    /// - [`ClientError::RetriesExhausted`] al agotar `max_retries`
    /// - Los mismos errores por consulta que [`Client::start_job`]
    pub fn poll_status_with_token(
        &self,
        job_id: &str,
        cancel: &CancelToken,
    ) -> Result<JobStatus, ClientError> {
        let delays = backoff_delays(self.poll_delay, self.max_retries);

        for (attempt, delay) in delays.into_iter().enumerate() {
            sleep_unless_canceled(delay, cancel)?;

            let status = self.get_status(job_id)?;
            tracing::info!(
                job_id = %job_id,
                status = status.as_str(),
                attempt,
                "polled job status"
            );

            if status.is_terminal() {
                return Ok(status);
            }
        }

        Err(ClientError::RetriesExhausted {
            job_id: job_id.to_string(),
            attempts: self.max_retries,
        })
    }

    /// Hace una única consulta de estado
    fn get_status(&self, job_id: &str) -> Result<JobStatus, ClientError> {
        let url = format!("{}/status?job_id={}", self.base_url, job_id);
        let response = self.http.get(&url).send()?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ClientError::UnexpectedStatusCode {
                expected: 200,
                got: status.as_u16(),
            });
        }

        let body = response.text()?;
        let parsed: StatusBody = serde_json::from_str(&body)
            .map_err(|e| ClientError::MalformedResponse(format!("invalid status body: {}", e)))?;

        Ok(parsed.status)
    }
}

/// Calcula el calendario de delays del backoff: `initial * 2^n`
///
/// Duplicación pura, sin jitter ni tope; el crecimiento solo lo acota
/// `max_retries`.
pub fn backoff_delays(initial: Duration, max_retries: u32) -> Vec<Duration> {
    let mut delays = Vec::with_capacity(max_retries as usize);
    let mut delay = initial;

    for _ in 0..max_retries {
        delays.push(delay);
        delay = delay.saturating_mul(2);
    }

    delays
}

/// Duerme `total` en pasos cortos, abortando si el token se cancela
fn sleep_unless_canceled(total: Duration, cancel: &CancelToken) -> Result<(), ClientError> {
    let mut remaining = total;

    while remaining > Duration::ZERO {
        if cancel.is_canceled() {
            return Err(ClientError::Canceled);
        }
        let step = remaining.min(CANCEL_CHECK_INTERVAL);
        thread::sleep(step);
        remaining -= step;
    }

    if cancel.is_canceled() {
        return Err(ClientError::Canceled);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::atomic::AtomicUsize;
    use std::time::Instant;

    /// Mini servidor que entrega una respuesta enlatada por conexión,
    /// en orden, y cuenta cuántos requests atendió
    fn mock_server(responses: Vec<String>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_handle = Arc::clone(&hits);

        thread::spawn(move || {
            for response in responses {
                let (mut stream, _) = match listener.accept() {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                hits_handle.fetch_add(1, Ordering::SeqCst);
                let _ = stream.write_all(response.as_bytes());
            }
        });

        (format!("http://{}", addr), hits)
    }

    /// Construye una respuesta HTTP enlatada con cuerpo JSON
    fn canned(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        )
    }

    fn fast_client(base_url: &str) -> Client {
        let mut client = Client::new(base_url);
        client.poll_delay = Duration::from_millis(5);
        client.max_retries = 5;
        client
    }

    #[test]
    fn test_backoff_delays_doubling() {
        let delays = backoff_delays(Duration::from_millis(1), 5);

        assert_eq!(
            delays,
            vec![
                Duration::from_millis(1),
                Duration::from_millis(2),
                Duration::from_millis(4),
                Duration::from_millis(8),
                Duration::from_millis(16),
            ]
        );
    }

    #[test]
    fn test_backoff_delays_empty_when_no_retries() {
        assert!(backoff_delays(Duration::from_secs(1), 0).is_empty());
    }

    #[test]
    fn test_start_job_success() {
        let (base_url, hits) = mock_server(vec![canned(
            "201 Created",
            r#"{"job_id": "12345"}"#,
        )]);

        let client = Client::new(&base_url);
        let job_id = client.start_job().unwrap();

        assert_eq!(job_id, "12345");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_start_job_unexpected_status() {
        let (base_url, _) = mock_server(vec![canned("200 OK", r#"{"job_id": "12345"}"#)]);

        let client = Client::new(&base_url);
        let result = client.start_job();

        assert!(matches!(
            result,
            Err(ClientError::UnexpectedStatusCode { expected: 201, got: 200 })
        ));
    }

    #[test]
    fn test_start_job_malformed_body() {
        let (base_url, _) = mock_server(vec![canned("201 Created", "this is not json")]);

        let client = Client::new(&base_url);
        let result = client.start_job();

        assert!(matches!(result, Err(ClientError::MalformedResponse(_))));
    }

    #[test]
    fn test_start_job_missing_job_id() {
        let (base_url, _) = mock_server(vec![canned("201 Created", r#"{"other": "field"}"#)]);

        let client = Client::new(&base_url);
        let result = client.start_job();

        assert!(matches!(result, Err(ClientError::MalformedResponse(_))));
    }

    #[test]
    fn test_start_job_empty_job_id() {
        let (base_url, _) = mock_server(vec![canned("201 Created", r#"{"job_id": ""}"#)]);

        let client = Client::new(&base_url);
        let result = client.start_job();

        assert!(matches!(result, Err(ClientError::MalformedResponse(_))));
    }

    #[test]
    fn test_poll_status_until_completed() {
        let pending = canned("200 OK", r#"{"job_id": "j1", "status": "pending"}"#);
        let completed = canned("200 OK", r#"{"job_id": "j1", "status": "completed"}"#);
        let (base_url, hits) = mock_server(vec![pending.clone(), pending, completed]);

        let client = fast_client(&base_url);
        let status = client.poll_status("j1").unwrap();

        assert_eq!(status, JobStatus::Completed);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_poll_status_error_is_terminal() {
        let (base_url, hits) = mock_server(vec![canned(
            "200 OK",
            r#"{"job_id": "j1", "status": "error"}"#,
        )]);

        let client = fast_client(&base_url);
        let status = client.poll_status("j1").unwrap();

        assert_eq!(status, JobStatus::Error);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_poll_status_retries_exhausted() {
        let pending = canned("200 OK", r#"{"job_id": "j1", "status": "pending"}"#);
        let (base_url, hits) = mock_server(vec![pending; 5]);

        let client = fast_client(&base_url);
        let result = client.poll_status("j1");

        match result {
            Err(ClientError::RetriesExhausted { job_id, attempts }) => {
                assert_eq!(job_id, "j1");
                assert_eq!(attempts, 5);
            }
            other => panic!("Expected RetriesExhausted, got {:?}", other),
        }
        // Exactamente max_retries consultas, ni una más
        assert_eq!(hits.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_poll_status_fails_fast_on_bad_status_code() {
        let (base_url, hits) = mock_server(vec![canned("404 Not Found", r#"{"error": "nope"}"#)]);

        let client = fast_client(&base_url);
        let result = client.poll_status("unknown");

        assert!(matches!(
            result,
            Err(ClientError::UnexpectedStatusCode { expected: 200, got: 404 })
        ));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_poll_status_fails_fast_on_malformed_body() {
        let (base_url, hits) = mock_server(vec![canned("200 OK", r#"{"job_id": "j1"}"#)]);

        let client = fast_client(&base_url);
        let result = client.poll_status("j1");

        assert!(matches!(result, Err(ClientError::MalformedResponse(_))));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_canceled_token_skips_polling() {
        let (base_url, hits) = mock_server(vec![]);

        let client = fast_client(&base_url);
        let token = CancelToken::new();
        token.cancel();

        let result = client.poll_status_with_token("j1", &token);

        assert!(matches!(result, Err(ClientError::Canceled)));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_cancel_aborts_long_backoff() {
        let (base_url, hits) = mock_server(vec![]);

        let mut client = Client::new(&base_url);
        client.poll_delay = Duration::from_secs(60);
        client.max_retries = 3;

        let token = CancelToken::new();
        let handle = token.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            handle.cancel();
        });

        let start = Instant::now();
        let result = client.poll_status_with_token("j1", &token);

        assert!(matches!(result, Err(ClientError::Canceled)));
        // Debe abortar mucho antes del delay de 60s
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_cancel_token_is_shared_across_clones() {
        let token = CancelToken::new();
        let clone = token.clone();

        assert!(!token.is_canceled());
        clone.cancel();
        assert!(token.is_canceled());
    }
}
