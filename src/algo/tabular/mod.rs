pub mod sarsa;
pub mod value_table;

pub use sarsa::{EpisodeSummary, Outcome, SarsaAgent, SarsaAgentConfig, UpdateRule};
pub use value_table::ValueTable;

/// A trait for state and action types that can be used as keys in a [`HashMap`](std::collections::HashMap)
pub trait Hashable: Copy + Eq + std::hash::Hash {}

impl<T> Hashable for T where T: Copy + Eq + std::hash::Hash {}
