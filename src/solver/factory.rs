use crate::domain::{
    solver_service::{Result, SolverError, SolverService},
    value_objects::SolverBackend,
};
use std::sync::Arc;

/// Factory for creating solver instances based on configuration
pub struct SolverFactory;

impl SolverFactory {
    /// Create a solver for a specific backend
    ///
    /// `Auto` prefers HiGHS, then CBC, then microlp among the backends compiled in.
    pub fn create_from_backend(backend: SolverBackend) -> Result<Arc<dyn SolverService>> {
        match backend {
            SolverBackend::Auto => Self::default_solver(),
            SolverBackend::MicroLp => Self::microlp(),
            SolverBackend::CoinCbc => Self::coin_cbc(),
            SolverBackend::Highs => Self::highs(),
        }
    }

    /// Get the default solver
    pub fn default_solver() -> Result<Arc<dyn SolverService>> {
        Self::highs()
            .or_else(|_| Self::coin_cbc())
            .or_else(|_| Self::microlp())
            .map_err(|_| {
                SolverError::SolverNotAvailable(
                    "no solver backend compiled in (enable microlp, coin_cbc or highs)"
                        .to_string(),
                )
            })
    }

    /// Names of the backends compiled into this build
    pub fn available_backends() -> Vec<SolverBackend> {
        [
            SolverBackend::Highs,
            SolverBackend::CoinCbc,
            SolverBackend::MicroLp,
        ]
        .into_iter()
        .filter(|&b| Self::create_from_backend(b).is_ok())
        .collect()
    }

    fn microlp() -> Result<Arc<dyn SolverService>> {
        #[cfg(feature = "microlp")]
        return Ok(Arc::new(super::MicroLpSolver::new()));
        #[cfg(not(feature = "microlp"))]
        return Err(not_compiled(SolverBackend::MicroLp, "microlp"));
    }

    fn coin_cbc() -> Result<Arc<dyn SolverService>> {
        #[cfg(feature = "coin_cbc")]
        return Ok(Arc::new(super::CoinCbcSolver::new()));
        #[cfg(not(feature = "coin_cbc"))]
        return Err(not_compiled(SolverBackend::CoinCbc, "coin_cbc"));
    }

    fn highs() -> Result<Arc<dyn SolverService>> {
        #[cfg(feature = "highs")]
        return Ok(Arc::new(super::HighsSolver::new()));
        #[cfg(not(feature = "highs"))]
        return Err(not_compiled(SolverBackend::Highs, "highs"));
    }
}

#[allow(dead_code)]
fn not_compiled(backend: SolverBackend, feature: &str) -> SolverError {
    SolverError::SolverNotAvailable(format!(
        "{} support was not compiled in (enable the '{}' feature)",
        backend, feature
    ))
}
