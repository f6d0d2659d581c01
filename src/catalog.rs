use serde::{Deserialize, Serialize};

use crate::common::{manhattan_distance, Position};
use crate::state::{ConsumedSet, SearchState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Object {
    pub x: i64,
    pub y: i64,
    pub weight: u64,
}

impl Object {
    pub fn new(x: i64, y: i64, weight: u64) -> Self {
        Object { x, y, weight }
    }

    pub fn position(&self) -> Position {
        (self.x, self.y)
    }

    /// A ball may only eat something lighter than half of itself.
    pub fn can_be_eaten_by(&self, ball_weight: u64) -> bool {
        self.weight
            .checked_mul(2)
            .is_some_and(|double| ball_weight > double)
    }
}

/// Read-only list of objects shared by every solver.
#[derive(Debug, Clone)]
pub struct Catalog {
    objects: Vec<Object>,
    // Indices sorted by (weight, index), with the weights alongside for binary search.
    by_weight: Vec<usize>,
    sorted_weights: Vec<u64>,
}

impl Catalog {
    pub fn new(objects: Vec<Object>) -> Self {
        let mut by_weight: Vec<usize> = (0..objects.len()).collect();
        by_weight.sort_by_key(|&index| (objects[index].weight, index));
        let sorted_weights = by_weight.iter().map(|&index| objects[index].weight).collect();

        Catalog {
            objects,
            by_weight,
            sorted_weights,
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, index: usize) -> &Object {
        &self.objects[index]
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Number of objects, in weight order, light enough for `ball_weight`.
    fn edible_prefix(&self, ball_weight: u64) -> usize {
        self.sorted_weights.partition_point(|&weight| {
            weight
                .checked_mul(2)
                .is_some_and(|double| ball_weight > double)
        })
    }

    /// Indices of the objects that are not consumed yet and can be eaten at
    /// `ball_weight`, in catalog order.
    pub fn eligible(&self, ball_weight: u64, consumed: &ConsumedSet) -> Vec<usize> {
        let mut eligible: Vec<usize> = self.by_weight[..self.edible_prefix(ball_weight)]
            .iter()
            .copied()
            .filter(|&index| !consumed.contains(index))
            .collect();
        eligible.sort_unstable();
        eligible
    }

    /// Lower bound on the time needed to eat one more object: the cheapest
    /// walk-and-eat among eligible objects, or 0 when nothing is eligible.
    pub fn heuristic(&self, state: &SearchState) -> u64 {
        self.eligible(state.weight, &state.consumed)
            .into_iter()
            .map(|index| manhattan_distance(state.position, self.objects[index].position()) + 1)
            .min()
            .unwrap_or(0)
    }

    /// Weight reachable if travel were free: eat the remaining objects from
    /// lightest to heaviest while the running total allows it.
    pub fn max_reachable_weight(&self, ball_weight: u64, consumed: &ConsumedSet) -> u64 {
        let mut weight = ball_weight;
        for &index in &self.by_weight {
            if consumed.contains(index) {
                continue;
            }
            let object = &self.objects[index];
            if !object.can_be_eaten_by(weight) {
                // Everything after this one is at least as heavy.
                break;
            }
            weight = weight.saturating_add(object.weight);
        }
        weight
    }

    /// Whether eating every object from `start` keeps both the weight and the
    /// elapsed time within `u64`. Each walk is bounded by the bounding box of
    /// the objects and the start.
    pub fn totals_fit(&self, initial_weight: u64, start: Position) -> bool {
        let total_weight = self
            .objects
            .iter()
            .try_fold(initial_weight, |total, object| total.checked_add(object.weight));

        let (min_x, max_x, min_y, max_y) = self.objects.iter().fold(
            (start.0, start.0, start.1, start.1),
            |(min_x, max_x, min_y, max_y), object| {
                (
                    min_x.min(object.x),
                    max_x.max(object.x),
                    min_y.min(object.y),
                    max_y.max(object.y),
                )
            },
        );
        let total_time = max_x
            .abs_diff(min_x)
            .checked_add(max_y.abs_diff(min_y))
            .and_then(|span| span.checked_add(1))
            .and_then(|step| step.checked_mul(self.objects.len() as u64));

        total_weight.is_some() && total_time.is_some()
    }
}
