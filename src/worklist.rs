//! Consumable keyword bag
//!
//! Presents the unordered keyword set of one schema node as a one-shot
//! bag: a conversion step claims the keywords relevant to its decision
//! and leaves the rest for later steps, ending with the set of truly
//! unclaimed keywords. Claiming toggles a bit in a parallel bitset
//! rather than removing the item, so leftover enumeration is just
//! "bits not set".

use crate::keywords::{Keyword, KeywordKind};

/// A one-shot consumable view over a node's keywords.
#[derive(Debug, Clone)]
pub struct WorkList {
    items: Vec<Keyword>,
    claimed: Vec<bool>,
}

impl WorkList {
    pub fn new(items: Vec<Keyword>) -> Self {
        let claimed = vec![false; items.len()];
        Self { items, claimed }
    }

    /// Claim and return the first unclaimed keyword of `kind`. Returns
    /// `None` when absent; calling on an absent kind is not an error.
    /// The returned `Option` doubles as the presence flag for callers
    /// that branch on it.
    pub fn pull(&mut self, kind: KeywordKind) -> Option<Keyword> {
        for (i, item) in self.items.iter().enumerate() {
            if !self.claimed[i] && item.kind() == kind {
                self.claimed[i] = true;
                return Some(item.clone());
            }
        }
        None
    }

    /// True when an unclaimed keyword of `kind` is present. Does not
    /// claim it.
    pub fn contains(&self, kind: KeywordKind) -> bool {
        self.items
            .iter()
            .zip(&self.claimed)
            .any(|(item, claimed)| !claimed && item.kind() == kind)
    }

    /// Lazily enumerate the keywords no step has claimed. Restartable:
    /// each call recomputes from the bitset.
    pub fn unclaimed(&self) -> impl Iterator<Item = &Keyword> {
        self.items
            .iter()
            .zip(&self.claimed)
            .filter(|(_, claimed)| !**claimed)
            .map(|(item, _)| item)
    }

    pub fn is_fully_claimed(&self) -> bool {
        self.claimed.iter().all(|claimed| *claimed)
    }
}
