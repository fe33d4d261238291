use thiserror::Error;

use crate::types::CoverageSlot;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid domain input: {0}")]
    Validation(String),

    #[error("Model is infeasible ({} binding coverage points)", unstaffable.len())]
    Infeasible { unstaffable: Vec<CoverageSlot> },

    #[error("Solver failure: {0}")]
    Solver(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
