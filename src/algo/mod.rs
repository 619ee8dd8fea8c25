pub mod tabular;

pub use tabular::{SarsaAgent, SarsaAgentConfig, UpdateRule};
