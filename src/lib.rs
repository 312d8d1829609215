//! # Job Server
//! src/lib.rs
//!
//! Simulador de ciclo de vida de jobs asíncronos sobre HTTP/1.0.
//! Un cliente crea un job con `POST /start` y luego consulta
//! `GET /status?job_id=...` con backoff exponencial hasta observar un
//! estado terminal (`completed` o `error`).
//!
//! ## Arquitectura
//!
//! El crate está dividido en módulos especializados:
//! - `http`: Parsing y construcción del protocolo HTTP/1.0
//! - `config`: Configuración por CLI y variables de entorno
//! - `jobs`: Registro en memoria de jobs con transiciones perezosas
//! - `server`: Servidor TCP concurrente (un thread por conexión)
//! - `client`: Cliente de polling con backoff exponencial y cancelación
//! - `metrics`: Recolección de métricas del servidor
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use job_server::config::Config;
//! use job_server::server::Server;
//!
//! let config = Config::default();
//! let mut server = Server::new(config);
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod http;
pub mod config;
pub mod server;
pub mod jobs;
pub mod client;
pub mod metrics;
