use crate::game::{Game, GameError, GameOutcome, Player};
use crate::random::RandomGenerator;
use tracing::warn;

/// Aggregated outcome of one or more random playouts.
///
/// A draw credits half a win to each player, so `wins(One) + wins(Two) == simulations()`.
#[derive(Debug, Default, PartialEq, Copy, Clone)]
pub struct RolloutResult {
    wins_one: f64,
    wins_two: f64,
    simulations: u32,
}

impl RolloutResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one finished playout. Undecided outcomes are not counted.
    pub fn record(&mut self, outcome: GameOutcome) {
        match outcome {
            GameOutcome::Win(Player::One) => self.wins_one += 1.0,
            GameOutcome::Win(Player::Two) => self.wins_two += 1.0,
            GameOutcome::Draw => {
                self.wins_one += 0.5;
                self.wins_two += 0.5;
            }
            GameOutcome::InProgress => {
                warn!("playout ended without a decided outcome, ignoring it");
                return;
            }
        }
        self.simulations += 1;
    }

    /// Adds the results of another batch to this one.
    pub fn merge(&mut self, other: &RolloutResult) {
        self.wins_one += other.wins_one;
        self.wins_two += other.wins_two;
        self.simulations += other.simulations;
    }

    /// Wins credited to `player`, including half wins for draws.
    pub fn wins(&self, player: Player) -> f64 {
        match player {
            Player::One => self.wins_one,
            Player::Two => self.wins_two,
        }
    }

    pub fn simulations(&self) -> u32 {
        self.simulations
    }
}

/// Plays uniformly random legal moves on a private copy of `game` until the outcome is decided.
pub fn play_randomly_to_end<G: Game, K: RandomGenerator>(
    game: &G,
    random: &mut K,
) -> Result<GameOutcome, GameError> {
    let mut game = game.clone();
    let mut outcome = game.get_outcome();
    while outcome == GameOutcome::InProgress {
        let moves = game.get_available_moves();
        let Some(random_move) = random.get_random_from_slice(&moves) else {
            break;
        };
        game.perform_move(random_move)?;
        outcome = game.get_outcome();
    }
    Ok(outcome)
}

/// Runs `runs` independent playouts from `game`, which is left untouched.
pub fn roll_out<G: Game, K: RandomGenerator>(
    game: &G,
    runs: u32,
    random: &mut K,
) -> Result<RolloutResult, GameError> {
    let mut result = RolloutResult::new();
    for _ in 0..runs {
        result.record(play_randomly_to_end(game, random)?);
    }
    Ok(result)
}
