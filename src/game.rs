use std::fmt::Debug;
use thiserror::Error;

/// The central trait of the library, defining the interface for a game state.
///
/// To use the MCTS algorithm with a custom game, this trait must be implemented.
/// It provides the MCTS engine with the necessary methods to understand and interact with the game logic.
pub trait Game: Clone {
    /// The type representing a move in the game.
    type Move: Clone + PartialEq + Debug;

    /// Returns the player whose turn it is to make a move.
    fn get_current_player(&self) -> Player;

    /// Returns the current outcome of the game.
    fn get_outcome(&self) -> GameOutcome;

    /// Returns every legal move available from the current state.
    ///
    /// The order must be stable for a given state: the search tree aligns its children with it.
    /// An empty list means the game is over.
    fn get_available_moves(&self) -> Vec<Self::Move>;

    /// Applies a move taken from `get_available_moves` to the state, modifying it in place.
    ///
    /// Any other move is rejected and the state is left untouched.
    fn perform_move(&mut self, game_move: &Self::Move) -> Result<(), GameError>;

    /// Renders a move in a human readable form.
    fn describe_move(&self, game_move: &Self::Move) -> String {
        format!("{game_move:?}")
    }
}

/// The two sides of a game.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Player {
    /// The player who moves first.
    One,
    /// The player who moves second.
    Two,
}

impl Player {
    /// Returns the other player.
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

/// Represents the possible outcomes of a game.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum GameOutcome {
    /// The game is still ongoing.
    InProgress,
    /// The given player has won.
    Win(Player),
    /// The game has ended in a draw.
    Draw,
}

impl GameOutcome {
    /// Whether the game has been decided (won or drawn).
    pub fn is_decided(self) -> bool {
        self != GameOutcome::InProgress
    }
}

/// Errors raised by game rules engines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Invalid board size {0}: expected an even size between 4 and 16")]
    InvalidBoardSize(usize),
}
