mod auto;
mod exact;
mod greedy;

pub use auto::AutoSolver;
pub use exact::ExactSolver;
pub use greedy::GreedySolver;

use crate::catalog::Catalog;
use crate::common::Solution;
use crate::config::{SolverConfig, SolverKind};
use crate::error::SolveError;
use crate::stat::Stats;

pub trait Solver {
    fn solve(&mut self) -> Result<Solution, SolveError>;

    fn stats(&self) -> &Stats;
}

/// Run the solver selected in `config` from `config.start`.
pub fn solve(
    catalog: &Catalog,
    initial_weight: u64,
    config: &SolverConfig,
) -> Result<(Solution, Stats), SolveError> {
    if !catalog.totals_fit(initial_weight, config.start) {
        return Err(SolveError::Overflow);
    }

    let mut solver: Box<dyn Solver + '_> = match config.solver {
        SolverKind::Exact => Box::new(ExactSolver::new(
            catalog,
            initial_weight,
            config.start,
            config.exact.clone(),
        )),
        SolverKind::Greedy => Box::new(GreedySolver::new(
            catalog,
            initial_weight,
            config.start,
            config.greedy.clone(),
        )),
        SolverKind::Auto => Box::new(AutoSolver::new(
            catalog,
            initial_weight,
            config.start,
            config.exact.clone(),
            config.greedy.clone(),
        )),
    };

    let solution = solver.solve()?;
    Ok((solution, solver.stats().clone()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::Object;
    use crate::common::ORIGIN;
    use crate::state::SearchState;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    // Helper function to setup tracing
    pub(crate) fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    }

    pub(crate) fn random_catalog<R: Rng>(rng: &mut R, objects: usize) -> Catalog {
        Catalog::new(
            (0..objects)
                .map(|_| {
                    Object::new(
                        rng.gen_range(-6..=6),
                        rng.gen_range(-6..=6),
                        rng.gen_range(1..=12),
                    )
                })
                .collect(),
        )
    }

    /// Exhaustive search over every legal eating order: heaviest, then fastest.
    pub(crate) fn brute_force(catalog: &Catalog, initial_weight: u64) -> (u64, u64) {
        fn walk(catalog: &Catalog, state: &SearchState, best: &mut (u64, u64)) {
            if state.weight > best.0 || (state.weight == best.0 && state.elapsed_time < best.1) {
                *best = (state.weight, state.elapsed_time);
            }
            for index in catalog.eligible(state.weight, &state.consumed) {
                walk(catalog, &state.consume(catalog, index), best);
            }
        }

        let start = SearchState::initial(catalog.len(), ORIGIN, initial_weight);
        let mut best = (initial_weight, u64::MAX);
        walk(catalog, &start, &mut best);
        best
    }

    #[test]
    fn test_solve_dispatches_every_kind() {
        init_tracing();
        let catalog = Catalog::new(vec![Object::new(1, 0, 1)]);
        for kind in [SolverKind::Exact, SolverKind::Greedy, SolverKind::Auto] {
            let config = SolverConfig {
                solver: kind,
                ..SolverConfig::default()
            };
            let (solution, stats) = solve(&catalog, 3, &config).unwrap();
            assert_eq!(solution.path, vec![0], "{kind:?}");
            assert_eq!(solution.weight, 4);
            assert_eq!(solution.elapsed_time, 2);
            assert_eq!(stats.solver, kind.name());
            assert_eq!(stats.path_len, 1);
        }
    }

    #[test]
    fn test_solve_rejects_overflowing_totals() {
        init_tracing();
        let heavy = Catalog::new(vec![Object::new(1, 0, 1 << 62)]);
        let far = Catalog::new(vec![Object::new(i64::MAX, 0, 1), Object::new(i64::MIN, 0, 1)]);
        for kind in [SolverKind::Exact, SolverKind::Greedy, SolverKind::Auto] {
            let config = SolverConfig {
                solver: kind,
                ..SolverConfig::default()
            };
            assert_eq!(
                solve(&heavy, u64::MAX, &config).unwrap_err(),
                SolveError::Overflow
            );
            assert_eq!(solve(&far, 3, &config).unwrap_err(), SolveError::Overflow);
            assert!(!SolveError::Overflow.is_budget_exhausted());
        }

        // The same heavy object is fine from a smaller start.
        let (solution, _) = solve(&heavy, (1 << 62) + 1, &SolverConfig::default()).unwrap();
        assert_eq!(solution.path, Vec::<usize>::new());
        let (solution, _) = solve(&heavy, u64::MAX - (1 << 62), &SolverConfig::default()).unwrap();
        assert_eq!(solution.path, vec![0]);
        assert_eq!(solution.weight, u64::MAX);
    }

    #[test]
    fn test_solutions_respect_rules_on_random_catalogs() {
        init_tracing();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..40 {
            let objects = rng.gen_range(0..=7);
            let catalog = random_catalog(&mut rng, objects);
            let initial_weight = rng.gen_range(1..=10);
            for kind in [SolverKind::Exact, SolverKind::Greedy, SolverKind::Auto] {
                let config = SolverConfig {
                    solver: kind,
                    ..SolverConfig::default()
                };
                let (solution, _) = solve(&catalog, initial_weight, &config).unwrap();
                assert!(solution.verify(&catalog, initial_weight, ORIGIN));
                let consumed: u64 = solution
                    .path
                    .iter()
                    .map(|&index| catalog.get(index).weight)
                    .sum();
                assert_eq!(solution.weight, initial_weight + consumed);
            }
        }
    }
}
