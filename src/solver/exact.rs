use super::Solver;
use crate::catalog::Catalog;
use crate::common::{Path, Position, Solution};
use crate::config::ExactConfig;
use crate::error::SolveError;
use crate::stat::Stats;
use crate::state::{Configuration, SearchState};

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::time::Instant;
use tracing::{debug, instrument, trace};

#[derive(Debug, Clone)]
struct OpenNode {
    f_cost: u64,
    state: SearchState,
    path: Path,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_cost
            .cmp(&other.f_cost)
            // Earlier states first.
            .then_with(|| self.state.elapsed_time.cmp(&other.state.elapsed_time))
            // Two nodes with the same configuration and time are interchangeable,
            // whichever path produced them.
            .then_with(|| self.state.position.cmp(&other.state.position))
            .then_with(|| self.state.weight.cmp(&other.state.weight))
            .then_with(|| self.state.consumed.cmp(&other.state.consumed))
    }
}

/// Best-first search over (position, weight, consumed set), ordered by
/// elapsed time plus the cheapest next bite.
pub struct ExactSolver<'a> {
    catalog: &'a Catalog,
    initial_weight: u64,
    start: Position,
    config: ExactConfig,
    stats: Stats,
}

impl<'a> ExactSolver<'a> {
    pub fn new(
        catalog: &'a Catalog,
        initial_weight: u64,
        start: Position,
        config: ExactConfig,
    ) -> Self {
        ExactSolver {
            catalog,
            initial_weight,
            start,
            config,
            stats: Stats::new("exact"),
        }
    }

    fn check_budget(&self, states: usize, solve_start: &Instant) -> Result<(), SolveError> {
        if let Some(limit) = self.config.max_states {
            if states > limit {
                return Err(SolveError::ResourceLimitExceeded { states, limit });
            }
        }
        if let Some(limit_ms) = self.config.time_limit_ms {
            let elapsed_ms = solve_start.elapsed().as_millis() as u64;
            if elapsed_ms > limit_ms {
                return Err(SolveError::TimeLimitExceeded {
                    elapsed_ms,
                    limit_ms,
                });
            }
        }
        Ok(())
    }

    /// Whether a child cannot lead to a better record than `best`.
    fn is_hopeless(&self, child: &SearchState, best: &Solution) -> bool {
        if child.weight < best.weight && child.elapsed_time >= best.elapsed_time {
            return true;
        }
        if self.config.upper_bound_pruning {
            let bound = self
                .catalog
                .max_reachable_weight(child.weight, &child.consumed);
            if bound < best.weight
                || (bound == best.weight && child.elapsed_time >= best.elapsed_time)
            {
                return true;
            }
        }
        false
    }
}

impl Solver for ExactSolver<'_> {
    #[instrument(skip_all, name = "exact_search", fields(objects = self.catalog.len(), weight = self.initial_weight), level = "debug")]
    fn solve(&mut self) -> Result<Solution, SolveError> {
        let solve_start = Instant::now();
        let catalog = self.catalog;

        let mut open_list = BTreeSet::new();
        // Best elapsed time recorded for each configuration that was expanded.
        let mut closed_list: HashMap<Configuration, u64> = HashMap::new();

        let start = SearchState::initial(catalog.len(), self.start, self.initial_weight);
        // Any dequeued state beats this placeholder time, the start state included.
        let mut best = Solution {
            weight: self.initial_weight,
            elapsed_time: u64::MAX,
            path: Vec::new(),
        };

        open_list.insert(OpenNode {
            f_cost: catalog.heuristic(&start),
            state: start,
            path: Vec::new(),
        });

        while let Some(current) = open_list.pop_first() {
            let configuration = current.state.configuration();
            if closed_list
                .get(&configuration)
                .is_some_and(|&time| time <= current.state.elapsed_time)
            {
                self.stats.dominated_nodes += 1;
                continue;
            }
            closed_list.insert(configuration, current.state.elapsed_time);
            self.check_budget(closed_list.len(), &solve_start)?;

            trace!("expand node: {current:?}");
            self.stats.expanded_nodes += 1;

            if best.improves_on(current.state.weight, current.state.elapsed_time) {
                best = Solution::from_state(&current.state, current.path.clone());
                debug!(
                    "new best: weight {} time {} path {:?}",
                    best.weight, best.elapsed_time, best.path
                );
            }

            for index in catalog.eligible(current.state.weight, &current.state.consumed) {
                let child = current.state.consume(catalog, index);

                if self.is_hopeless(&child, &best) {
                    self.stats.pruned_nodes += 1;
                    continue;
                }

                if closed_list
                    .get(&child.configuration())
                    .is_some_and(|&time| time <= child.elapsed_time)
                {
                    self.stats.dominated_nodes += 1;
                    continue;
                }

                let mut path = current.path.clone();
                path.push(index);
                let f_cost = child.elapsed_time + catalog.heuristic(&child);
                if open_list.insert(OpenNode {
                    f_cost,
                    state: child,
                    path,
                }) {
                    self.stats.generated_nodes += 1;
                }
            }
            self.stats.peak_frontier = self.stats.peak_frontier.max(open_list.len());
        }

        self.stats.states = closed_list.len();
        self.stats.time_us = solve_start.elapsed().as_micros() as u64;
        self.stats.weight = best.weight;
        self.stats.elapsed_time = best.elapsed_time;
        self.stats.path_len = best.path.len();
        debug!("search exhausted after {} expansions", self.stats.expanded_nodes);

        Ok(best)
    }

    fn stats(&self) -> &Stats {
        &self.stats
    }
}
