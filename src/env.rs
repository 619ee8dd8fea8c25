use std::{
    collections::{btree_map::Entry, BTreeMap},
    fmt::Debug,
    hash::Hash,
    ops::Index,
};

use crate::Result;

/// A closed, finite set of actions with a deterministic iteration order
///
/// Tabular agents store one value per action, so every action must map to a stable index
/// in `0..Self::all().len()`.
pub trait DiscreteAction: Copy + Eq + Hash + Debug + 'static {
    /// Every action, in iteration order
    fn all() -> &'static [Self];

    /// Position of this action in [`all`](DiscreteAction::all)
    fn index(self) -> usize;

    /// Number of actions in the set
    fn count() -> usize {
        Self::all().len()
    }
}

/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time MDP with one agent
/// and a finite state space and action space. The dynamics are a pure function of the
/// environment definition, the current state and the chosen action, so the environment
/// itself is never mutated by an agent.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State: Copy + Eq + Hash + Debug;

    /// A representation of an action that an agent can take to affect the environment
    type Action: DiscreteAction;

    /// Determine if the state lies within the state space
    fn contains(&self, state: &Self::State) -> bool;

    /// Like [`contains`](Environment::contains), but produces the error describing why the
    /// state is rejected
    fn validate(&self, state: &Self::State) -> Result<()>;

    /// Determine the consequence of taking `action` in `state`
    ///
    /// **Returns** `(next_state, reward, terminated)`
    ///
    /// **Errors** with [`InvalidState`](crate::Error::InvalidState) if `state` is outside the state space
    fn transition(
        &self,
        state: Self::State,
        action: Self::Action,
    ) -> Result<(Self::State, f64, bool)>;
}

/// Named accumulators for per-episode statistics
#[derive(Debug, Clone, Default)]
pub struct Report {
    data: BTreeMap<&'static str, f64>,
}

impl Report {
    /// Create a report with the given keys, each starting at zero
    pub fn new(keys: Vec<&'static str>) -> Self {
        Self {
            data: keys.into_iter().map(|k| (k, 0.0)).collect(),
        }
    }

    /// Get the entry for a key, e.g. `report.entry("steps").and_modify(|x| *x += 1.0)`
    pub fn entry(&mut self, key: &'static str) -> Entry<'_, &'static str, f64> {
        self.data.entry(key)
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.data.keys().copied().collect()
    }

    /// Return the accumulated values and reset every key to zero
    pub fn take(&mut self) -> BTreeMap<&'static str, f64> {
        let reset = self.data.keys().map(|&k| (k, 0.0)).collect();
        std::mem::replace(&mut self.data, reset)
    }
}

impl Index<&str> for Report {
    type Output = f64;

    fn index(&self, key: &str) -> &Self::Output {
        &self.data[key]
    }
}
