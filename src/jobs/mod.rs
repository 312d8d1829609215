//! # Sistema de Jobs
//!
//! Implementa el registro en memoria de jobs simulados. Los jobs no
//! ejecutan trabajo real: su ciclo de vida se evalúa de forma perezosa
//! en cada lectura de estado (sin timers de fondo).
//!
//! ## Endpoints
//!
//! - `POST /start` - Crear job (retorna su ID)
//! - `GET /status?job_id=ID` - Consultar estado

pub mod job;
pub mod failure;
pub mod registry;
pub mod handlers;

pub use job::{Job, JobStatus};
pub use failure::{AlwaysFail, FailureSource, NeverFail, RandomFailure};
pub use registry::{JobRegistry, RegistryError};
