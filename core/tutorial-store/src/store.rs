//! The shared Tutorial store.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::model::{Tutorial, UNSAVED_ID};

/// Thread-safe in-memory store of tutorials.
///
/// Records are keyed by id. Ids come from a counter that only grows and are
/// assigned at append time, so iterating the map in key order yields the
/// records in insertion order.
#[derive(Debug, Default)]
pub struct TutorialStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    tutorials: BTreeMap<i64, Tutorial>,
    last_id: i64,
}

impl TutorialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every tutorial in insertion order.
    pub fn find_all(&self) -> Vec<Tutorial> {
        self.inner.read().tutorials.values().cloned().collect()
    }

    /// Returns tutorials whose title contains `substring` (case-sensitive).
    /// An empty substring matches everything.
    pub fn find_by_title_contains(&self, substring: &str) -> Vec<Tutorial> {
        self.filter(|t| t.title.contains(substring))
    }

    /// Looks up a tutorial by id.
    pub fn find_by_id(&self, id: i64) -> Option<Tutorial> {
        self.inner.read().tutorials.get(&id).cloned()
    }

    /// Returns tutorials whose `published` flag equals `published`.
    pub fn find_by_published(&self, published: bool) -> Vec<Tutorial> {
        self.filter(|t| t.published == published)
    }

    /// Inserts or replaces a tutorial.
    ///
    /// An unsaved record gets the next id and is appended. A record with an
    /// existing id replaces the stored one in place. A record with an id the
    /// store does not hold is left unstored and returned as given; use
    /// [`update`](Self::update) when absence must be reported.
    pub fn save(&self, mut tutorial: Tutorial) -> Tutorial {
        let mut inner = self.inner.write();

        if tutorial.id != UNSAVED_ID {
            match inner.tutorials.get_mut(&tutorial.id) {
                Some(slot) => {
                    *slot = tutorial.clone();
                    debug!(id = tutorial.id, "tutorial replaced");
                }
                None => warn!(id = tutorial.id, "save ignored: no tutorial with this id"),
            }
            return tutorial;
        }

        inner.last_id += 1;
        tutorial.id = inner.last_id;
        inner.tutorials.insert(tutorial.id, tutorial.clone());
        debug!(id = tutorial.id, title = %tutorial.title, "tutorial created");
        tutorial
    }

    /// Applies `f` to the stored tutorial with `id` and returns the result.
    ///
    /// The lookup and the mutation happen under one write lock. The id is
    /// restored after `f` runs, so a record cannot be moved to another key.
    pub fn update<F>(&self, id: i64, f: F) -> StoreResult<Tutorial>
    where
        F: FnOnce(&mut Tutorial),
    {
        let mut inner = self.inner.write();
        let slot = inner.tutorials.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        f(slot);
        slot.id = id;
        debug!(id, "tutorial updated");
        Ok(slot.clone())
    }

    /// Removes the tutorial with `id`, if present.
    pub fn delete_by_id(&self, id: i64) {
        if self.inner.write().tutorials.remove(&id).is_some() {
            debug!(id, "tutorial deleted");
        }
    }

    /// Removes every tutorial. The id counter keeps its value.
    pub fn delete_all(&self) {
        let mut inner = self.inner.write();
        let removed = inner.tutorials.len();
        inner.tutorials.clear();
        debug!(removed, "all tutorials deleted");
    }

    /// Number of stored tutorials.
    pub fn len(&self) -> usize {
        self.inner.read().tutorials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().tutorials.is_empty()
    }

    /// The most recently issued id, or 0 if none has been issued.
    pub fn last_id(&self) -> i64 {
        self.inner.read().last_id
    }

    fn filter(&self, pred: impl Fn(&Tutorial) -> bool) -> Vec<Tutorial> {
        self.inner
            .read()
            .tutorials
            .values()
            .filter(|&t| pred(t))
            .cloned()
            .collect()
    }
}
