use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalog;
use crate::state::SearchState;

/// Grid coordinate `(x, y)`.
pub type Position = (i64, i64);

/// Ordered object indices, in the order they were consumed.
pub type Path = Vec<usize>;

pub const ORIGIN: Position = (0, 0);

pub fn manhattan_distance(a: Position, b: Position) -> u64 {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

/// Best record found by a solver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub weight: u64,
    pub elapsed_time: u64,
    pub path: Path,
}

impl Solution {
    pub(crate) fn from_state(state: &SearchState, path: Path) -> Self {
        Solution {
            weight: state.weight,
            elapsed_time: state.elapsed_time,
            path,
        }
    }

    /// Strictly heavier, or as heavy and strictly faster.
    pub fn improves_on(&self, weight: u64, elapsed_time: u64) -> bool {
        weight > self.weight || (weight == self.weight && elapsed_time < self.elapsed_time)
    }

    /// Replay the path from the start and check every consumption is legal and
    /// the reported weight and time match.
    pub fn verify(&self, catalog: &Catalog, initial_weight: u64, start: Position) -> bool {
        let mut state = SearchState::initial(catalog.len(), start, initial_weight);
        for &index in &self.path {
            if index >= catalog.len() || state.consumed.contains(index) {
                debug!("path entry {index} is out of range or repeated");
                return false;
            }
            if !catalog.get(index).can_be_eaten_by(state.weight) {
                debug!(
                    "object {index} weighs {} and cannot be eaten at weight {}",
                    catalog.get(index).weight,
                    state.weight
                );
                return false;
            }
            state = state.consume(catalog, index);
        }

        if state.weight != self.weight || state.elapsed_time != self.elapsed_time {
            debug!(
                "replay ended at weight {} time {}, solution claims weight {} time {}",
                state.weight, state.elapsed_time, self.weight, self.elapsed_time
            );
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Object;

    #[test]
    fn test_manhattan_distance() {
        assert_eq!(manhattan_distance((0, 0), (0, 0)), 0);
        assert_eq!(manhattan_distance((0, 0), (1, 0)), 1);
        assert_eq!(manhattan_distance((-2, 3), (4, -1)), 10);
        assert_eq!(manhattan_distance((4, -1), (-2, 3)), 10);
    }

    #[test]
    fn test_improves_on() {
        let best = Solution {
            weight: 10,
            elapsed_time: 5,
            path: vec![],
        };
        assert!(best.improves_on(11, 100));
        assert!(best.improves_on(10, 4));
        assert!(!best.improves_on(10, 5));
        assert!(!best.improves_on(9, 0));
    }

    #[test]
    fn test_verify_solution() {
        let catalog = Catalog::new(vec![Object::new(1, 0, 1), Object::new(3, 0, 2)]);
        let good = Solution {
            weight: 7,
            elapsed_time: 5,
            path: vec![0, 1],
        };
        assert!(good.verify(&catalog, 4, ORIGIN));

        // Object 1 needs more than 4 before it can be eaten.
        let illegal = Solution {
            weight: 7,
            elapsed_time: 7,
            path: vec![1, 0],
        };
        assert!(!illegal.verify(&catalog, 4, ORIGIN));

        let wrong_time = Solution {
            weight: 7,
            elapsed_time: 4,
            path: vec![0, 1],
        };
        assert!(!wrong_time.verify(&catalog, 4, ORIGIN));

        let repeated = Solution {
            weight: 6,
            elapsed_time: 3,
            path: vec![0, 0],
        };
        assert!(!repeated.verify(&catalog, 4, ORIGIN));
    }
}
