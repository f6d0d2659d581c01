use super::{ExactSolver, GreedySolver, Solver};
use crate::catalog::Catalog;
use crate::common::{Position, Solution};
use crate::config::{ExactConfig, GreedyConfig};
use crate::error::SolveError;
use crate::stat::Stats;

use std::time::Instant;
use tracing::{info, instrument, warn};

/// State ceiling applied when the exact configuration leaves it unset.
pub const DEFAULT_MAX_STATES: usize = 1_000_000;

/// Exact search under a budget, greedy lookahead once the budget runs out.
pub struct AutoSolver<'a> {
    catalog: &'a Catalog,
    initial_weight: u64,
    start: Position,
    exact: ExactConfig,
    greedy: GreedyConfig,
    stats: Stats,
}

impl<'a> AutoSolver<'a> {
    pub fn new(
        catalog: &'a Catalog,
        initial_weight: u64,
        start: Position,
        exact: ExactConfig,
        greedy: GreedyConfig,
    ) -> Self {
        AutoSolver {
            catalog,
            initial_weight,
            start,
            exact,
            greedy,
            stats: Stats::new("auto"),
        }
    }
}

impl Solver for AutoSolver<'_> {
    #[instrument(skip_all, name = "auto", fields(objects = self.catalog.len()), level = "debug")]
    fn solve(&mut self) -> Result<Solution, SolveError> {
        let solve_start = Instant::now();
        let exact_config = ExactConfig {
            max_states: Some(self.exact.max_states.unwrap_or(DEFAULT_MAX_STATES)),
            ..self.exact.clone()
        };

        let mut exact = ExactSolver::new(self.catalog, self.initial_weight, self.start, exact_config);
        let result = exact.solve();
        self.stats = exact.stats().clone();

        let solution = match result {
            Ok(solution) => solution,
            Err(err) if err.is_budget_exhausted() => {
                warn!("{err}, falling back to greedy lookahead");
                let mut greedy = GreedySolver::new(
                    self.catalog,
                    self.initial_weight,
                    self.start,
                    self.greedy.clone(),
                );
                let solution = greedy.solve()?;
                self.stats = greedy.stats().clone();
                self.stats.fell_back = true;
                info!(
                    "greedy fallback reached weight {} in time {}",
                    solution.weight, solution.elapsed_time
                );
                solution
            }
            Err(err) => return Err(err),
        };

        self.stats.solver = "auto".to_string();
        self.stats.time_us = solve_start.elapsed().as_micros() as u64;
        Ok(solution)
    }

    fn stats(&self) -> &Stats {
        &self.stats
    }
}
