/// Implemented RL algorithms
pub mod algo;

/// Environment
pub mod env;

/// Error types
pub mod error;

/// Exploration policies
pub mod exploration;

/// Testing environments
pub mod gym;

/// Text rendering of environments
pub mod viz;

mod util;

pub use error::{Error, Result};
