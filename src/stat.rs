use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub solver: String,
    pub weight: u64,
    pub elapsed_time: u64,
    pub path_len: usize,
    pub time_us: u64,
    pub expanded_nodes: usize,
    /// Children pushed by the exact search. For greedy, the candidates scored
    /// at each committed step, excluding states visited during lookahead.
    pub generated_nodes: usize,
    pub dominated_nodes: usize,
    pub pruned_nodes: usize,
    pub peak_frontier: usize,
    pub states: usize,
    pub fell_back: bool,
}

impl Stats {
    pub(crate) fn new(solver: &str) -> Self {
        Stats {
            solver: solver.to_string(),
            ..Stats::default()
        }
    }

    pub fn print(&self) {
        info!(
            "Solver {} Weight {} Elapsed {} Path length {} Time(microseconds) {} Expanded {} Generated {} Dominated {} Pruned {} Peak frontier {} States {} Fell back {}",
            self.solver,
            self.weight,
            self.elapsed_time,
            self.path_len,
            self.time_us,
            self.expanded_nodes,
            self.generated_nodes,
            self.dominated_nodes,
            self.pruned_nodes,
            self.peak_frontier,
            self.states,
            self.fell_back
        );
    }

    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
