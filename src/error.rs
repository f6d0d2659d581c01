use thiserror::Error;

/// Reasons a solver gives up before exhausting its search.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("state table grew to {states} entries, above the limit of {limit}")]
    ResourceLimitExceeded { states: usize, limit: usize },
    #[error("search ran for {elapsed_ms} ms, above the limit of {limit_ms} ms")]
    TimeLimitExceeded { elapsed_ms: u64, limit_ms: u64 },
    #[error("total weight or travel time of the scenario does not fit in 64 bits")]
    Overflow,
}

impl SolveError {
    /// Budget errors are recovered by switching to the greedy policy.
    pub fn is_budget_exhausted(&self) -> bool {
        matches!(
            self,
            SolveError::ResourceLimitExceeded { .. } | SolveError::TimeLimitExceeded { .. }
        )
    }
}
