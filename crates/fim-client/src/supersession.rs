// Generation tracking for in-flight requests.
//
// A request is tagged with its family's generation when it starts. Bumping
// the family (e.g. switching drafts) makes every older tag stale, and the
// result is dropped when it arrives.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, Default)]
pub struct Supersession<F> {
    generations: HashMap<F, u64>,
}

impl<F: Eq + Hash + Copy> Supersession<F> {
    pub fn new() -> Self {
        Self {
            generations: HashMap::new(),
        }
    }

    /// Generation to tag a new request in `family` with.
    pub fn current(&self, family: F) -> u64 {
        self.generations.get(&family).copied().unwrap_or(0)
    }

    /// Supersede everything in flight for `family`.
    pub fn bump(&mut self, family: F) -> u64 {
        let generation = self.generations.entry(family).or_insert(0);
        *generation += 1;
        *generation
    }

    pub fn is_current(&self, family: F, generation: u64) -> bool {
        self.current(family) == generation
    }
}
