pub mod catalog;
pub mod common;
pub mod config;
pub mod error;
pub mod scenario;
pub mod solver;
pub mod stat;
pub mod state;

pub use catalog::{Catalog, Object};
pub use common::{manhattan_distance, Path, Position, Solution, ORIGIN};
pub use config::{Config, ExactConfig, GreedyConfig, SolverConfig, SolverKind};
pub use error::SolveError;
pub use solver::{solve, AutoSolver, ExactSolver, GreedySolver, Solver};
pub use stat::Stats;
pub use state::{ConsumedSet, SearchState};
