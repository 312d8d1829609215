//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Implementación del servidor TCP que maneja múltiples conexiones
//! simultáneas usando threads. Cada conexión se procesa en su propio
//! thread.

use crate::config::Config;
use crate::http::{Request, Response, StatusCode};
use crate::jobs::{handlers as job_handlers, JobRegistry};
use crate::metrics::MetricsCollector;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use uuid::Uuid;

/// Servidor HTTP/1.0 concurrente para el API de jobs
pub struct Server {
    config: Config,
    registry: Arc<JobRegistry>,
    metrics: Arc<MetricsCollector>,
    listener: Option<TcpListener>,
}

impl Server {
    /// Crea un servidor con el registro por defecto (fallos al 5%)
    pub fn new(config: Config) -> Self {
        let registry = JobRegistry::new(config.job_timeout());
        Self::with_registry(config, registry)
    }

    /// Crea un servidor con un registro ya construido
    ///
    /// Permite inyectar registros con fuentes de fallo determinísticas,
    /// y levantar varias instancias independientes en un mismo proceso.
    pub fn with_registry(config: Config, registry: JobRegistry) -> Self {
        Self {
            config,
            registry: Arc::new(registry),
            metrics: Arc::new(MetricsCollector::new()),
            listener: None,
        }
    }

    /// Liga el listener y retorna la dirección local
    ///
    /// Con `port = 0` el sistema asigna un puerto efímero; la dirección
    /// retornada incluye el puerto real.
    pub fn bind(&mut self) -> std::io::Result<SocketAddr> {
        let listener = TcpListener::bind(self.config.address())?;
        let addr = listener.local_addr()?;
        self.listener = Some(listener);
        Ok(addr)
    }

    /// Acepta conexiones indefinidamente, una por thread
    pub fn run(&mut self) -> std::io::Result<()> {
        if self.listener.is_none() {
            self.bind()?;
        }
        let listener = self.listener.as_ref().unwrap();
        let address = listener.local_addr()?;

        tracing::info!(%address, "server listening");

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let registry = Arc::clone(&self.registry);
                    let metrics = Arc::clone(&self.metrics);

                    metrics.increment_active_threads();

                    thread::spawn(move || {
                        if let Err(e) =
                            Self::handle_connection(stream, registry, metrics.clone())
                        {
                            tracing::error!(error = %e, "connection handler failed");
                        }
                        metrics.decrement_active_threads();
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to accept connection");
                }
            }
        }

        Ok(())
    }

    /// Procesa una conexión completa: read -> parse -> dispatch -> write
    fn handle_connection(
        mut stream: TcpStream,
        registry: Arc<JobRegistry>,
        metrics: Arc<MetricsCollector>,
    ) -> std::io::Result<()> {
        let start = Instant::now();
        let request_id = Uuid::new_v4().to_string();

        // Los requests de este protocolo caben de sobra en una lectura
        let mut buffer = [0u8; 8192];
        let bytes_read = stream.read(&mut buffer)?;

        if bytes_read == 0 {
            // El peer cerró sin enviar nada
            return Ok(());
        }

        let (mut response, path) = match Request::parse(&buffer[..bytes_read]) {
            Ok(request) => {
                tracing::debug!(
                    request_id = %request_id,
                    method = request.method().as_str(),
                    path = request.path(),
                    "request received"
                );

                let path = request.path().to_string();
                let response = Self::dispatch(&request, &registry, &metrics);
                (response, path)
            }
            Err(e) => (
                Response::error(StatusCode::BadRequest, &format!("Invalid request: {}", e)),
                "/error".to_string(),
            ),
        };

        response.add_header("X-Request-Id", &request_id);

        stream.write_all(&response.to_bytes())?;
        stream.flush()?;

        let latency = start.elapsed();
        let status = response.status();
        metrics.record_request(&path, status.as_u16(), latency);

        if status.is_success() {
            tracing::debug!(request_id = %request_id, %status, path = %path, ?latency, "request served");
        } else {
            tracing::warn!(request_id = %request_id, %status, path = %path, "request failed");
        }

        Ok(())
    }

    /// Despacha el request al handler de su ruta
    fn dispatch(
        request: &Request,
        registry: &JobRegistry,
        metrics: &MetricsCollector,
    ) -> Response {
        match request.path() {
            "/start" => job_handlers::start_handler(request, registry),
            "/status" => job_handlers::status_handler(request, registry),
            "/metrics" => Response::json(&metrics.snapshot_json()),
            path => Response::error(
                StatusCode::NotFound,
                &format!("Route not found: {}", path),
            ),
        }
    }
}
