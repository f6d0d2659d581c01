use std::hash::{Hash, Hasher};

use crate::catalog::Catalog;
use crate::common::{manhattan_distance, Position};

const WORD_BITS: usize = u64::BITS as usize;

/// Set of consumed object indices stored as a fixed-width bit vector. Sets
/// sized for the same catalog compare and hash by membership only.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConsumedSet {
    words: Vec<u64>,
}

impl ConsumedSet {
    pub fn new(capacity: usize) -> Self {
        ConsumedSet {
            words: vec![0; capacity.div_ceil(WORD_BITS)],
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.words
            .get(index / WORD_BITS)
            .is_some_and(|&word| word & (1 << (index % WORD_BITS)) != 0)
    }

    pub fn insert(&mut self, index: usize) {
        let word = index / WORD_BITS;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << (index % WORD_BITS);
    }

    /// Copy of this set with `index` added.
    pub fn with(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.insert(index);
        next
    }

    pub fn len(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(word_index, &word)| {
            (0..WORD_BITS)
                .filter(move |&bit| word & (1 << bit) != 0)
                .map(move |bit| word_index * WORD_BITS + bit)
        })
    }
}

/// Identity of a state for deduplication: elapsed time is left out.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Configuration {
    pub position: Position,
    pub weight: u64,
    pub consumed: ConsumedSet,
}

/// Immutable snapshot of the ball. Equality and hashing follow the
/// configuration only.
#[derive(Clone, Debug)]
pub struct SearchState {
    pub position: Position,
    pub weight: u64,
    pub consumed: ConsumedSet,
    pub elapsed_time: u64,
}

impl PartialEq for SearchState {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
            && self.weight == other.weight
            && self.consumed == other.consumed
    }
}

impl Eq for SearchState {}

impl Hash for SearchState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position.hash(state);
        self.weight.hash(state);
        self.consumed.hash(state);
    }
}

impl SearchState {
    pub fn initial(num_objects: usize, position: Position, weight: u64) -> Self {
        SearchState {
            position,
            weight,
            consumed: ConsumedSet::new(num_objects),
            elapsed_time: 0,
        }
    }

    pub fn configuration(&self) -> Configuration {
        Configuration {
            position: self.position,
            weight: self.weight,
            consumed: self.consumed.clone(),
        }
    }

    /// Time needed to walk to object `index` and eat it.
    pub fn cost_to(&self, catalog: &Catalog, index: usize) -> u64 {
        manhattan_distance(self.position, catalog.get(index).position()) + 1
    }

    /// The state after moving to and eating object `index`. The caller is
    /// responsible for checking eligibility, and for rejecting catalogs that
    /// fail `Catalog::totals_fit`.
    pub fn consume(&self, catalog: &Catalog, index: usize) -> SearchState {
        let object = catalog.get(index);
        debug_assert!(object.can_be_eaten_by(self.weight));
        debug_assert!(!self.consumed.contains(index));

        SearchState {
            position: object.position(),
            weight: self.weight + object.weight,
            consumed: self.consumed.with(index),
            elapsed_time: self.elapsed_time + self.cost_to(catalog, index),
        }
    }
}
