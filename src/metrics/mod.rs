//! # Módulo de Métricas
//!
//! Recolección de métricas del servidor, expuestas en `GET /metrics`.

pub mod collector;

pub use collector::MetricsCollector;
