pub mod maze;

pub use maze::{Action, Cell, Maze, Pos};
