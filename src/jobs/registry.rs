//! # Registro de Jobs
//! src/jobs/registry.rs
//!
//! Dueño exclusivo de todos los registros de jobs. El mapa completo está
//! protegido por un único `Mutex` que se sostiene solo durante accesos al
//! mapa y comparaciones de timestamps.
//!
//! Las transiciones de estado se evalúan de forma perezosa en cada
//! lectura, lo que evita un scheduler/timer de fondo. Una vez que un job
//! alcanza un estado terminal queda congelado: ni el timeout ni la
//! inyección de fallos se re-evalúan.

use crate::jobs::failure::{FailureSource, RandomFailure};
use crate::jobs::job::{Job, JobStatus};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errores del registro de jobs
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// El job consultado no existe en este registro
    #[error("Job not found: {0}")]
    NotFound(String),
}

/// Registro en memoria de jobs
///
/// Se construye al arrancar el servidor y se inyecta en los handlers;
/// nunca es estado global del proceso, así que los tests pueden levantar
/// múltiples instancias independientes.
pub struct JobRegistry {
    /// Mapa job_id -> Job, protegido por un único lock
    jobs: Mutex<HashMap<String, Job>>,

    /// Timeout aplicado a cada job en el momento de su creación
    timeout: Duration,

    /// Fuente de decisiones de fallo (inyectable para tests)
    failure: Box<dyn FailureSource>,
}

impl JobRegistry {
    /// Crea un registro con la fuente de fallos de producción (5%)
    pub fn new(timeout: Duration) -> Self {
        Self::with_failure_source(timeout, Box::new(RandomFailure::default_rate()))
    }

    /// Crea un registro con una fuente de fallos específica
    pub fn with_failure_source(timeout: Duration, failure: Box<dyn FailureSource>) -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
            timeout,
            failure,
        }
    }

    /// Crea un nuevo job y retorna su ID
    ///
    /// El job nace `pending` con `started_at = ahora` y el timeout
    /// configurado del registro. La generación de IDs usa UUID v4, así
    /// que las colisiones son despreciables.
    pub fn create(&self) -> String {
        let job_id = Uuid::new_v4().to_string();
        let job = Job::new(job_id.clone(), self.timeout);

        let mut jobs = self.jobs.lock().unwrap();
        jobs.insert(job_id.clone(), job);

        tracing::debug!(job_id = %job_id, "job created");
        job_id
    }

    /// Consulta (y posiblemente transiciona) el estado de un job
    ///
    /// Mientras el job está `pending`:
    /// 1. Si superó su timeout, pasa a `completed`.
    /// 2. Si la fuente de fallos dispara, pasa a `error` (puede ganarle
    ///    a la transición a `completed` dentro de la misma lectura).
    ///
    /// Un estado terminal nunca se re-evalúa en lecturas posteriores.
    pub fn get_status(&self, job_id: &str) -> Result<JobStatus, RegistryError> {
        let mut jobs = self.jobs.lock().unwrap();

        let job = jobs
            .get_mut(job_id)
            .ok_or_else(|| RegistryError::NotFound(job_id.to_string()))?;

        if job.status() == JobStatus::Pending {
            if job.expired() {
                job.set_status(JobStatus::Completed);
            }
            if self.failure.should_fail() {
                job.set_status(JobStatus::Error);
            }
        }

        Ok(job.status())
    }

    /// Cantidad de jobs registrados
    pub fn job_count(&self) -> usize {
        let jobs = self.jobs.lock().unwrap();
        jobs.len()
    }
}
