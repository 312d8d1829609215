//! # Job Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor de jobs. La configuración se toma de
//! argumentos CLI con fallback a variables de entorno (PORT, HOST,
//! JOB_TIMEOUT).

use job_server::config::Config;
use job_server::server::Server;
use tracing_subscriber::EnvFilter;

fn main() {
    // Logging estructurado; RUST_LOG controla el nivel (default: info)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=================================");
    println!("  Job Server HTTP/1.0");
    println!("=================================\n");

    let config = Config::new();

    if let Err(e) = config.validate() {
        eprintln!("Configuración inválida: {}", e);
        std::process::exit(1);
    }

    println!("⚙️  Configuración:");
    println!("   Puerto: {}", config.port);
    println!("   Host: {}", config.host);
    println!("   Job timeout: {}s", config.job_timeout_secs);
    println!();

    let mut server = Server::new(config);

    // Iniciar el servidor (esto bloqueará el thread)
    if let Err(e) = server.run() {
        eprintln!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }
}
