use crossterm::{cursor::MoveToPreviousLine, Command};

use crate::{
    gym::{Maze, Pos},
    Result,
};

/// Character drawn on the agent's square
pub const AGENT: char = 'A';

/// Draw the maze one line per row, with the agent's square replaced by [`AGENT`]
///
/// **Errors** with [`InvalidState`](crate::Error::InvalidState) if `agent` is outside the maze
pub fn snapshot(maze: &Maze, agent: Pos) -> Result<String> {
    maze.check(agent)?;

    let mut out = String::with_capacity(maze.rows() * (maze.cols() + 1));
    for (row, cells) in maze.grid().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if Pos::new(row, col) == agent {
                out.push(AGENT);
            } else {
                out.push(cell.symbol());
            }
        }
        out.push('\n');
    }

    Ok(out)
}

/// A [`snapshot`] followed by the control sequence that moves the cursor back to its first
/// line, so printing successive frames redraws the maze in place
pub fn render(maze: &Maze, agent: Pos) -> Result<String> {
    let mut out = snapshot(maze, agent)?;
    let lines = u16::try_from(maze.rows()).unwrap_or(u16::MAX);
    MoveToPreviousLine(lines).write_ansi(&mut out)?;
    Ok(out)
}
