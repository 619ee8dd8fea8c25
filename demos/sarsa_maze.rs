use std::{error::Error, fs, io::Write, path::Path, thread, time::Duration};

use log::info;
use maze_sarsa::{
    algo::{tabular::Outcome, SarsaAgent, SarsaAgentConfig, UpdateRule},
    env::{Environment, Report},
    gym::{Cell, Maze, Pos},
    viz,
};
use rand::{rngs::StdRng, SeedableRng};

const NUM_EPISODES: u16 = 500;
const MAX_STEPS: usize = 200;
const START: Pos = Pos::new(0, 0);

fn train(
    rule: UpdateRule,
    path: &Path,
    rng: &mut StdRng,
) -> Result<SarsaAgent<Maze>, Box<dyn Error>> {
    let maze = Maze::canonical();
    let mut agent = SarsaAgent::new(SarsaAgentConfig {
        lr: 0.1,
        gamma: 0.9,
        rule,
        ..Default::default()
    })?;
    let mut report = Report::new(vec!["steps", "reward", "goal"]);

    let mut wtr = csv::Writer::from_path(path.join(format!("out/{rule:?}.csv").to_lowercase()))?;
    wtr.write_record(["episode", "steps", "reward", "goal"])?;

    for i in 0..NUM_EPISODES {
        let summary = agent.go(&maze, START, MAX_STEPS, rng)?;
        report.entry("steps").and_modify(|x| *x += summary.steps as f64);
        report.entry("reward").and_modify(|x| *x += summary.total_reward);
        if summary.outcome == Outcome::Terminated
            && maze.cell(summary.final_state) == Some(Cell::Success)
        {
            report.entry("goal").and_modify(|x| *x += 1.0);
        }

        let data = report.take();
        wtr.write_record([
            i.to_string(),
            data["steps"].to_string(),
            data["reward"].to_string(),
            data["goal"].to_string(),
        ])?;
    }
    wtr.flush()?;

    info!(
        "{rule:?}: trained {} episodes, {} states in value table",
        agent.episode(),
        agent.value_table().len()
    );
    Ok(agent)
}

/// Walk the greedy policy, redrawing the maze in place after every move
fn replay(agent: &SarsaAgent<Maze>) -> Result<(), Box<dyn Error>> {
    let maze = Maze::canonical();
    let mut stdout = std::io::stdout();

    let mut state = START;
    for _ in 0..MAX_STEPS {
        print!("{}", viz::render(&maze, state)?);
        stdout.flush()?;
        thread::sleep(Duration::from_millis(150));

        let Some(action) = agent.greedy_action(&state) else {
            break;
        };
        let (next, _, terminated) = maze.transition(state, action)?;
        state = next;
        if terminated {
            break;
        }
    }
    print!("{}", viz::snapshot(&maze, state)?);
    info!("Greedy walk ended at {state} on {:?}", maze.cell(state));
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let path = Path::new("demos/sarsa_maze");
    fs::create_dir_all(path.join("out"))?;
    let mut rng = StdRng::seed_from_u64(0);

    for rule in [UpdateRule::Sarsa, UpdateRule::ExpectedSarsa] {
        let agent = train(rule, path, &mut rng)?;
        replay(&agent)?;
    }

    Ok(())
}
