//! # Fuente de Fallos Inyectable
//! src/jobs/failure.rs
//!
//! La inyección aleatoria de errores modela fallos impredecibles de
//! trabajos reales sin ejecutar trabajo. Está detrás de un trait para
//! que los tests puedan forzar (o suprimir) la rama de error de forma
//! determinística.

use rand::Rng;

/// Probabilidad de fallo por defecto en cada lectura de estado
pub const DEFAULT_ERROR_RATE: f32 = 0.05;

/// Fuente de decisiones de fallo para el registro
pub trait FailureSource: Send + Sync {
    /// Retorna `true` si esta lectura debe marcar el job como `error`
    fn should_fail(&self) -> bool;
}

/// Implementación de producción: falla con probabilidad fija
pub struct RandomFailure {
    rate: f32,
}

impl RandomFailure {
    /// Crea una fuente con la probabilidad indicada (0.0 - 1.0)
    pub fn new(rate: f32) -> Self {
        Self { rate }
    }

    /// Crea una fuente con la probabilidad por defecto (5%)
    pub fn default_rate() -> Self {
        Self::new(DEFAULT_ERROR_RATE)
    }
}

impl FailureSource for RandomFailure {
    fn should_fail(&self) -> bool {
        rand::thread_rng().gen::<f32>() < self.rate
    }
}

/// Fuente que nunca falla (para tests determinísticos)
pub struct NeverFail;

impl FailureSource for NeverFail {
    fn should_fail(&self) -> bool {
        false
    }
}

/// Fuente que siempre falla (para forzar la rama de error en tests)
pub struct AlwaysFail;

impl FailureSource for AlwaysFail {
    fn should_fail(&self) -> bool {
        true
    }
}
