//! # Collector de Métricas
//! src/metrics/collector.rs
//!
//! Recolecta y agrega métricas del servidor en tiempo real.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Collector de métricas thread-safe
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsData>>,
    start_time: Instant,
}

/// Datos internos de métricas
struct MetricsData {
    /// Contador total de requests
    total_requests: u64,

    /// Requests por código de estado
    status_codes: HashMap<u16, u64>,

    /// Requests por ruta
    requests_per_path: HashMap<String, u64>,

    /// Suma de latencias en microsegundos (para promedio)
    latency_sum_us: u64,

    /// Threads activos actualmente
    active_threads: u64,
}

impl MetricsCollector {
    /// Crea un nuevo collector de métricas
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsData {
                total_requests: 0,
                status_codes: HashMap::new(),
                requests_per_path: HashMap::new(),
                latency_sum_us: 0,
                active_threads: 0,
            })),
            start_time: Instant::now(),
        }
    }

    /// Registra un nuevo request
    pub fn record_request(&self, path: &str, status_code: u16, latency: Duration) {
        let mut data = self.inner.lock().unwrap();

        data.total_requests += 1;
        *data.status_codes.entry(status_code).or_insert(0) += 1;
        *data.requests_per_path.entry(path.to_string()).or_insert(0) += 1;
        data.latency_sum_us += latency.as_micros() as u64;
    }

    /// Incrementa el contador de threads activos
    pub fn increment_active_threads(&self) {
        let mut data = self.inner.lock().unwrap();
        data.active_threads += 1;
    }

    /// Decrementa el contador de threads activos
    pub fn decrement_active_threads(&self) {
        let mut data = self.inner.lock().unwrap();
        if data.active_threads > 0 {
            data.active_threads -= 1;
        }
    }

    /// Obtiene el número de threads activos
    pub fn active_threads(&self) -> u64 {
        let data = self.inner.lock().unwrap();
        data.active_threads
    }

    /// Obtiene el total de requests registrados
    pub fn total_requests(&self) -> u64 {
        let data = self.inner.lock().unwrap();
        data.total_requests
    }

    /// Obtiene las métricas actuales como JSON
    pub fn snapshot_json(&self) -> String {
        let data = self.inner.lock().unwrap();

        let avg_latency_us = if data.total_requests > 0 {
            data.latency_sum_us / data.total_requests
        } else {
            0
        };

        let status_codes: HashMap<String, u64> = data
            .status_codes
            .iter()
            .map(|(code, count)| (code.to_string(), *count))
            .collect();

        serde_json::json!({
            "uptime_seconds": self.start_time.elapsed().as_secs(),
            "requests": {
                "total": data.total_requests,
                "active_threads": data.active_threads,
                "status_codes": status_codes,
                "per_path": &data.requests_per_path,
            },
            "avg_latency_us": avg_latency_us,
        })
        .to_string()
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
