use maze_sarsa::{
    algo::{SarsaAgent, SarsaAgentConfig, UpdateRule},
    env::Environment,
    gym::{Action, Cell, Maze, Pos},
    viz,
};
use rand::{rngs::StdRng, SeedableRng};

fn trained_agent(rule: UpdateRule, episodes: usize, seed: u64) -> SarsaAgent<Maze> {
    let maze = Maze::canonical();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut agent = SarsaAgent::new(SarsaAgentConfig {
        lr: 0.5,
        epsilon: 0.1,
        gamma: 0.9,
        rule,
    })
    .unwrap();

    for _ in 0..episodes {
        agent.go(&maze, Pos::new(0, 0), 100, &mut rng).unwrap();
    }
    agent
}

#[test]
fn walk_into_failing_square() {
    let maze = Maze::canonical();
    let mut rng = StdRng::seed_from_u64(0);
    let mut agent = SarsaAgent::new(SarsaAgentConfig::default()).unwrap();

    let moves = [Action::Right, Action::Down, Action::Right];
    let mut state = Pos::new(0, 0);
    let mut rewards = Vec::new();
    let mut terminated = false;
    for action in moves {
        assert!(!terminated, "episode ended early");
        let (next, _, reward, done) = agent.step(&maze, state, action, &mut rng).unwrap();
        rewards.push(reward);
        terminated = done;
        state = next;
    }

    assert_eq!(rewards, [-1.0, -1.0, -100.0], "free moves cost one until the fail square");
    assert!(terminated, "fail square ends the episode");
    assert_eq!(maze.cell(state), Some(Cell::Fail));
}

#[test]
fn one_step_from_goal() {
    let maze = Maze::canonical();
    let mut rng = StdRng::seed_from_u64(1);
    let mut agent = SarsaAgent::new(SarsaAgentConfig::default()).unwrap();

    let (next, _, reward, terminated) = agent
        .step(&maze, Pos::new(2, 3), Action::Left, &mut rng)
        .unwrap();
    assert_eq!((next, reward, terminated), (Pos::new(2, 2), 100.0, true));
}

#[test]
fn corner_is_blocked() {
    let maze = Maze::canonical();
    for action in [Action::Up, Action::Left] {
        assert_eq!(
            maze.transition(Pos::new(0, 0), action).unwrap(),
            (Pos::new(0, 0), -10.0, false)
        );
    }
}

#[test]
fn sarsa_learns_path_to_goal() {
    let maze = Maze::canonical();
    let agent = trained_agent(UpdateRule::Sarsa, 500, 42);

    let mut state = Pos::new(0, 0);
    let mut path = vec![state];
    for _ in 0..20 {
        let action = agent
            .greedy_action(&state)
            .expect("every state on the greedy path was visited");
        let (next, _, terminated) = maze.transition(state, action).unwrap();
        state = next;
        path.push(state);
        if terminated {
            break;
        }
    }

    assert_eq!(
        maze.cell(state),
        Some(Cell::Success),
        "greedy path {path:?} reaches the goal"
    );
}

#[test]
fn expected_sarsa_trains_without_errors() {
    let maze = Maze::canonical();
    let agent = trained_agent(UpdateRule::ExpectedSarsa, 200, 7);

    let table = agent.value_table();
    assert!(table.len() <= maze.rows() * maze.cols());
    assert!(
        table.iter().all(|(_, values)| values.iter().all(|q| q.is_finite())),
        "values stay finite"
    );
    assert!(
        table.get(&Pos::new(2, 3), Action::Left).unwrap_or(0.0) >= 0.0,
        "moving into the goal is never penalized"
    );
    assert_eq!(agent.episode(), 200);
}

#[test]
fn rendered_frame() {
    let maze = Maze::canonical();
    let frame = viz::render(&maze, Pos::new(3, 1)).unwrap();
    assert!(frame.starts_with("----\n--x-\n-xo-\n-A--\n"));
    assert!(frame.ends_with("\x1b[4F"));
}
