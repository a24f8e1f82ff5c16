use crate::game::{Game, GameOutcome, Player};

/// Represents a single node in the Monte Carlo search tree.
///
/// Each node stores the state of the game, statistics about the outcomes of simulations,
/// and the move that led to this state.
#[derive(Debug, Clone)]
pub struct MctsNode<T: Game> {
    /// The depth of the node in the tree.
    pub height: u32,
    /// The game state that this node represents.
    pub game: T,
    /// The move that led to this node's state from its parent. `None` for the root node.
    pub prev_move: Option<T::Move>,
    /// The player whose turn it is in this node's game state.
    pub current_player: Player,
    /// The player credited with this node's wins: the one who chose the move into it.
    pub credited_player: Player,
    /// The outcome of the game at this node.
    pub outcome: GameOutcome,
    /// The number of simulations run through this node.
    pub visits: u32,
    /// Simulations won by `credited_player`; draws count for half.
    pub wins: f64,
    /// Set once every line below this node has been played out to a decided outcome.
    pub is_fully_calculated: bool,
}

impl<T: Game> MctsNode<T> {
    /// Creates the root node. Its wins are credited to the opponent of the player to move.
    pub fn new_root(game: T) -> Self {
        let player = game.get_current_player();
        Self::new(game, None, player.opponent(), 0)
    }

    /// Creates the node reached by playing `prev_move` from a node where `chosen_by` was to move.
    pub fn new_child(game: T, prev_move: T::Move, chosen_by: Player, height: u32) -> Self {
        Self::new(game, Some(prev_move), chosen_by, height)
    }

    fn new(game: T, prev_move: Option<T::Move>, credited_player: Player, height: u32) -> Self {
        let current_player = game.get_current_player();
        let outcome = game.get_outcome();
        MctsNode {
            height,
            game,
            prev_move,
            current_player,
            credited_player,
            outcome,
            visits: 0,
            wins: 0.0,
            is_fully_calculated: false,
        }
    }

    /// Whether the game is over at this node.
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_decided()
    }

    /// Calculates the win rate of this node, `0.0` while unvisited.
    pub fn wins_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins / (self.visits as f64)
        }
    }
}

/// UCT score of a child: `w/n + c * sqrt(ln(N) / n)`, infinite while the child is unvisited.
pub fn uct_value(total_iterations: u64, wins: f64, visits: u32, exploration: f64) -> f64 {
    if visits == 0 {
        return f64::INFINITY;
    }
    let visits = visits as f64;
    let total = (total_iterations.max(1)) as f64;
    wins / visits + exploration * f64::sqrt(f64::ln(total) / visits)
}
