//! # Configuración del Servidor
//! src/config.rs
//!
//! Este módulo define la configuración del servidor de jobs con soporte
//! para argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./job_server --port 8080 --job-timeout 10
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! PORT=8080 JOB_TIMEOUT=10 ./job_server
//! ```

use clap::Parser;
use std::time::Duration;

/// Configuración del servidor de jobs
#[derive(Debug, Clone, Parser)]
#[command(name = "job_server")]
#[command(about = "Servidor HTTP/1.0 para simulación de jobs asíncronos")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor (0 = puerto efímero)
    #[arg(short, long, default_value = "8080", env = "PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HOST")]
    pub host: String,

    /// Segundos hasta que un job pendiente es elegible para auto-completarse
    #[arg(long = "job-timeout", default_value = "10", env = "JOB_TIMEOUT")]
    pub job_timeout_secs: u64,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    /// (las variables de entorno actúan como fallback de cada flag)
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use job_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Timeout de jobs como `Duration`
    pub fn job_timeout(&self) -> Duration {
        Duration::from_secs(self.job_timeout_secs)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.job_timeout_secs == 0 {
            return Err("Job timeout must be > 0 seconds".to_string());
        }

        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }

        Ok(())
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            job_timeout_secs: 10,
        }
    }
}
