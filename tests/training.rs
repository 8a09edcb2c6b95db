use q_snake::game::{Action, Direction, GameConfig, GameState, Snake, Vector};
use q_snake::modes::{TrainConfig, TrainMode};
use q_snake::rl::{
    ACTIONS, QLearningAgent, QLearningConfig, SnakeEnvironment, encode_state, load_q_table,
    make_rng,
};
use tempfile::TempDir;

fn env_with(head: Vector, direction: Direction, food: Vector) -> SnakeEnvironment {
    let mut env = SnakeEnvironment::new(GameConfig::default(), make_rng(Some(1))).unwrap();
    env.set_state(GameState::new(Snake::new(head, direction), food, 20, 20));
    env
}

#[test]
fn straight_toward_food() {
    let mut env = env_with(Vector::new(10, 10), Direction::Right, Vector::new(15, 10));

    let (state, reward, done) = env.step(Action::Straight);

    assert!((reward - 0.45).abs() < 1e-6);
    assert!(!done);
    assert!(state.food_ahead);
    assert_eq!(env.state().snake.head(), Vector::new(11, 10));
}

#[test]
fn leaving_the_grid_ends_the_episode() {
    let mut env = env_with(Vector::new(0, 5), Direction::Left, Vector::new(10, 10));

    let (_, reward, done) = env.step(Action::Straight);

    assert_eq!(reward, -10.0);
    assert!(done);
    assert!(env.is_done());
}

#[test]
fn eating_food_grows_and_scores() {
    let mut env = env_with(Vector::new(10, 10), Direction::Right, Vector::new(11, 10));

    let (_, reward, done) = env.step(Action::Straight);

    assert_eq!(reward, 10.0);
    assert!(!done);
    assert_eq!(env.state().score, 1);
    assert_eq!(env.state().snake.len(), 2);
    assert!(!env.state().snake.contains(env.state().food));
}

#[test]
fn trained_table_drives_a_greedy_agent() {
    let temp_dir = TempDir::new().unwrap();
    let save_path = temp_dir.path().join("snake.qtable");
    let config = TrainConfig {
        num_episodes: 50,
        max_episode_steps: 300,
        save_path: save_path.clone(),
        checkpoint_frequency: 0,
        log_frequency: 10,
        stats_window: 10,
        seed: Some(2024),
    };

    let mut train_mode = TrainMode::new(config, GameConfig::small(), QLearningConfig::default())
        .unwrap();
    train_mode.run().unwrap();
    assert!(!train_mode.agent().q_table().is_empty());
    assert_eq!(train_mode.stats().total_episodes(), 50);

    let (table, metadata) = load_q_table(&save_path).unwrap();
    assert_eq!(metadata.game_config, GameConfig::small());
    assert_eq!(metadata.progress.episodes_trained, 50);

    let agent = QLearningAgent::new(metadata.agent_config, make_rng(Some(0)))
        .unwrap()
        .with_q_table(table);
    let mut env = SnakeEnvironment::new(metadata.game_config, make_rng(Some(9))).unwrap();
    env.reset();

    for _ in 0..100 {
        if env.is_done() {
            break;
        }
        let before = env.state().snake.direction;
        let index = agent.greedy_action(&encode_state(env.state()));
        env.step(ACTIONS[index]);
        assert!(!env.state().snake.direction.is_opposite(before));
    }
}
