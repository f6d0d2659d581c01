use super::Solver;
use crate::catalog::Catalog;
use crate::common::{Position, Solution};
use crate::config::GreedyConfig;
use crate::error::SolveError;
use crate::stat::Stats;
use crate::state::SearchState;

use std::time::Instant;
use tracing::{debug, instrument, trace};

#[derive(Debug, Clone, Copy)]
struct Candidate {
    index: usize,
    // Weight gained per time unit spent reaching and eating the object.
    rate: f64,
}

/// Polynomial-time policy: rank eligible objects by rate, look a few bites
/// ahead from the best of them and commit to one object per step.
pub struct GreedySolver<'a> {
    catalog: &'a Catalog,
    initial_weight: u64,
    start: Position,
    config: GreedyConfig,
    stats: Stats,
}

impl<'a> GreedySolver<'a> {
    pub fn new(
        catalog: &'a Catalog,
        initial_weight: u64,
        start: Position,
        config: GreedyConfig,
    ) -> Self {
        GreedySolver {
            catalog,
            initial_weight,
            start,
            config,
            stats: Stats::new("greedy"),
        }
    }

    /// The `limit` best eligible objects by rate. Equal rates keep catalog order.
    fn ranked_candidates(&self, state: &SearchState, limit: usize) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = self
            .catalog
            .eligible(state.weight, &state.consumed)
            .into_iter()
            .map(|index| Candidate {
                index,
                rate: self.catalog.get(index).weight as f64
                    / state.cost_to(self.catalog, index) as f64,
            })
            .collect();
        candidates.sort_by(|a, b| b.rate.total_cmp(&a.rate));
        candidates.truncate(limit);
        candidates
    }

    /// Best discounted sum of rates over the next `remaining_depth` bites.
    /// The pool widens as the recursion gets deeper: one candidate with the
    /// full depth left, up to `depth` candidates on the last level.
    fn lookahead_score(&self, state: &SearchState, remaining_depth: usize) -> f64 {
        if remaining_depth == 0 {
            return 0.0;
        }

        let width = (self.config.depth + 1).saturating_sub(remaining_depth).max(1);
        self.ranked_candidates(state, width)
            .into_iter()
            .map(|candidate| {
                let next = state.consume(self.catalog, candidate.index);
                candidate.rate
                    + self.config.discount * self.lookahead_score(&next, remaining_depth - 1)
            })
            .fold(0.0, f64::max)
    }

    /// Pick the next object to eat, if any is eligible.
    fn choose(&mut self, state: &SearchState) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for candidate in self.ranked_candidates(state, self.config.top_k) {
            let next = state.consume(self.catalog, candidate.index);
            let score = candidate.rate + self.lookahead_score(&next, self.config.depth);
            // Top-level candidates only; lookahead states are not counted.
            self.stats.generated_nodes += 1;
            trace!(
                "candidate {} rate {:.4} combined {:.4}",
                candidate.index,
                candidate.rate,
                score
            );

            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((candidate.index, score));
            }
        }
        best.map(|(index, _)| index)
    }
}

impl Solver for GreedySolver<'_> {
    #[instrument(skip_all, name = "greedy_lookahead", fields(objects = self.catalog.len(), weight = self.initial_weight), level = "debug")]
    fn solve(&mut self) -> Result<Solution, SolveError> {
        let solve_start = Instant::now();
        let mut state = SearchState::initial(self.catalog.len(), self.start, self.initial_weight);
        let mut path = Vec::new();

        while let Some(index) = self.choose(&state) {
            state = state.consume(self.catalog, index);
            path.push(index);
            self.stats.expanded_nodes += 1;
            debug!(
                "eat object {index}: weight {} time {}",
                state.weight, state.elapsed_time
            );
        }

        let solution = Solution::from_state(&state, path);
        self.stats.time_us = solve_start.elapsed().as_micros() as u64;
        self.stats.weight = solution.weight;
        self.stats.elapsed_time = solution.elapsed_time;
        self.stats.path_len = solution.path.len();
        Ok(solution)
    }

    fn stats(&self) -> &Stats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Object;
    use crate::common::ORIGIN;
    use crate::solver::tests::{init_tracing, random_catalog};

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn solve_greedy(catalog: &Catalog, initial_weight: u64, config: GreedyConfig) -> Solution {
        GreedySolver::new(catalog, initial_weight, ORIGIN, config)
            .solve()
            .unwrap()
    }

    #[test]
    fn test_greedy_single_object() {
        init_tracing();
        let catalog = Catalog::new(vec![Object::new(1, 0, 1)]);
        let solution = solve_greedy(&catalog, 3, GreedyConfig::default());
        assert_eq!(solution.path, vec![0]);
        assert_eq!(solution.weight, 4);
        assert_eq!(solution.elapsed_time, 2);
    }

    #[test]
    fn test_greedy_empty_and_inedible() {
        init_tracing();
        let empty = Catalog::new(vec![]);
        let solution = solve_greedy(&empty, 3, GreedyConfig::default());
        assert!(solution.path.is_empty());
        assert_eq!(solution.weight, 3);

        let heavy = Catalog::new(vec![Object::new(0, 1, 5), Object::new(0, 2, 1)]);
        let solution = solve_greedy(&heavy, 3, GreedyConfig::default());
        assert!(solution.path.is_empty());
        assert_eq!(solution.weight, 3);
        assert_eq!(solution.elapsed_time, 0);
    }

    #[test]
    fn test_ranked_candidates() {
        let catalog = Catalog::new(vec![
            Object::new(3, 0, 2),
            Object::new(1, 0, 1),
            Object::new(0, 1, 1),
            Object::new(9, 0, 3),
        ]);
        let solver = GreedySolver::new(&catalog, 10, ORIGIN, GreedyConfig::default());
        let state = SearchState::initial(catalog.len(), ORIGIN, 10);

        // Rates: 0.5, 0.5, 0.5, 0.3.
        let ranked: Vec<usize> = solver
            .ranked_candidates(&state, 3)
            .iter()
            .map(|candidate| candidate.index)
            .collect();
        assert_eq!(ranked, vec![0, 1, 2]);

        let ranked = solver.ranked_candidates(&state, 10);
        assert_eq!(ranked.len(), 4);
        assert_eq!(ranked[3].index, 3);
        assert!((ranked[3].rate - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_lookahead_score() {
        let catalog = Catalog::new(vec![Object::new(1, 0, 1), Object::new(2, 0, 1)]);
        let solver = GreedySolver::new(&catalog, 3, ORIGIN, GreedyConfig::default());
        let state = SearchState::initial(catalog.len(), ORIGIN, 3);

        assert_eq!(solver.lookahead_score(&state, 0), 0.0);
        // One level: the better of 1/2 and 1/3.
        assert!((solver.lookahead_score(&state, 1) - 0.5).abs() < 1e-12);
        // Depth 2: 1/2 for object 0, then 0.7 * 1/2 for object 1.
        assert!((solver.lookahead_score(&state, 2) - 0.85).abs() < 1e-12);
    }

    #[test]
    fn test_greedy_lookahead_overrides_rate() {
        init_tracing();
        // Object 1 has the best immediate rate, but the lookahead through the
        // far object 0 scores higher.
        let catalog = Catalog::new(vec![
            Object::new(5, 5, 1),
            Object::new(1, 0, 1),
            Object::new(2, 0, 2),
            Object::new(-3, 0, 4),
        ]);
        let solution = solve_greedy(&catalog, 3, GreedyConfig::default());
        assert_eq!(solution.path, vec![0, 1, 2]);
        assert_eq!(solution.weight, 7);
        assert_eq!(solution.elapsed_time, 11 + 10 + 2);
    }

    #[test]
    fn test_greedy_terminates_within_catalog_size() {
        init_tracing();
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..50 {
            let objects = rng.gen_range(0..=20);
            let catalog = random_catalog(&mut rng, objects);
            let initial_weight = rng.gen_range(1..=30);
            let config = GreedyConfig {
                top_k: rng.gen_range(1..=4),
                depth: rng.gen_range(0..=3),
                discount: 0.7,
            };

            let mut solver = GreedySolver::new(&catalog, initial_weight, ORIGIN, config.clone());
            let solution = solver.solve().unwrap();
            assert!(solution.path.len() <= catalog.len());
            assert_eq!(solver.stats().expanded_nodes, solution.path.len());
            assert!(solution.verify(&catalog, initial_weight, ORIGIN));

            let again = solve_greedy(&catalog, initial_weight, config);
            assert_eq!(solution, again);
        }
    }
}
