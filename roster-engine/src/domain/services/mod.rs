pub mod linearize;
pub mod model;
pub mod penalty;
pub mod solver_driver;
pub mod variable_builder;

pub use model::RosterModel;
pub use penalty::{PenaltyItem, PenaltyLedger};
pub use solver_driver::SolverDriver;
pub use variable_builder::{VariableBuilder, VariableUniverse};
