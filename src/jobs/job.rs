//! # Estructura de Job
//! src/jobs/job.rs
//!
//! Representa un trabajo simulado con estado y timeout de completitud.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Estados posibles de un job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Job creado, esperando a completarse
    Pending,

    /// Job completado exitosamente
    Completed,

    /// Job falló
    Error,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
        }
    }

    /// Verifica si el estado es terminal
    ///
    /// Una vez terminal, el estado queda congelado y el polling se detiene.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

/// Representa un job individual
///
/// Los campos de identidad y tiempos son inmutables después de la
/// creación; solo el estado muta, y siempre bajo el lock del registro.
#[derive(Debug, Clone)]
pub struct Job {
    /// ID único del job (UUID v4)
    id: String,

    /// Estado actual
    status: JobStatus,

    /// Timestamp de creación
    started_at: Instant,

    /// Timeout configurado para auto-completarse
    duration: Duration,
}

impl Job {
    /// Crea un nuevo job en estado `pending`
    pub fn new(id: String, duration: Duration) -> Self {
        Self {
            id,
            status: JobStatus::Pending,
            started_at: Instant::now(),
            duration,
        }
    }

    /// ID del job
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Estado actual
    pub fn status(&self) -> JobStatus {
        self.status
    }

    /// Tiempo transcurrido desde la creación
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Verifica si el job superó su timeout de completitud
    pub fn expired(&self) -> bool {
        self.elapsed() > self.duration
    }

    /// Actualiza el estado (solo el registro debe llamar esto)
    pub(crate) fn set_status(&mut self, status: JobStatus) {
        self.status = status;
    }
}
