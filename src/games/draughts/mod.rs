//! English draughts (checkers) on an even-sized board.
//!
//! White is [`Player::One`] and moves first from the bottom rows; Black is [`Player::Two`].
//! A player without a legal move loses. The game is drawn once
//! [`DRAW_AFTER_KING_MOVES`] consecutive king moves have been played without a capture.

pub mod checker_board;
pub mod draughts_move;
pub mod movegen;

use crate::game::{Game, GameError, GameOutcome, Player};
use checker_board::{CheckerBoard, Piece};
use draughts_move::DraughtsMove;
use std::fmt;

pub const DEFAULT_BOARD_SIZE: usize = 8;

/// Consecutive non-capturing king moves after which the game is a draw.
pub const DRAW_AFTER_KING_MOVES: u32 = 25;

/// An implementation of the `Game` trait for English draughts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnglishDraughts {
    board: CheckerBoard,
    current_player: Player,
    turn: u32,
    king_moves_without_capture: u32,
}

impl EnglishDraughts {
    /// A game on a `size` x `size` board in the starting position.
    pub fn with_size(size: usize) -> Result<Self, GameError> {
        Ok(Self::from_board(CheckerBoard::new(size)?, Player::One))
    }

    /// A game continuing from an arbitrary position.
    pub fn from_board(board: CheckerBoard, current_player: Player) -> Self {
        Self {
            board,
            current_player,
            turn: 1,
            king_moves_without_capture: 0,
        }
    }

    pub fn board(&self) -> &CheckerBoard {
        &self.board
    }

    /// Full-move number, incremented once both sides have played.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn king_moves_without_capture(&self) -> u32 {
        self.king_moves_without_capture
    }

    pub fn player_name(player: Player) -> &'static str {
        match player {
            Player::One => "Player with the whites",
            Player::Two => "Player with the blacks",
        }
    }

    fn is_drawn(&self) -> bool {
        self.king_moves_without_capture >= DRAW_AFTER_KING_MOVES
    }
}

impl Default for EnglishDraughts {
    /// A game on the standard 8x8 board.
    fn default() -> Self {
        Self::from_board(CheckerBoard::standard(), Player::One)
    }
}

impl Game for EnglishDraughts {
    type Move = DraughtsMove;

    fn get_current_player(&self) -> Player {
        self.current_player
    }

    fn get_outcome(&self) -> GameOutcome {
        if !movegen::has_legal_move(&self.board, self.current_player) {
            GameOutcome::Win(self.current_player.opponent())
        } else if self.is_drawn() {
            GameOutcome::Draw
        } else {
            GameOutcome::InProgress
        }
    }

    fn get_available_moves(&self) -> Vec<Self::Move> {
        if self.is_drawn() {
            return Vec::new();
        }
        movegen::legal_moves(&self.board, self.current_player)
    }

    fn perform_move(&mut self, game_move: &Self::Move) -> Result<(), GameError> {
        if self.is_drawn() || !movegen::is_legal(&self.board, self.current_player, game_move) {
            return Err(GameError::IllegalMove(self.describe_move(game_move)));
        }
        let (Some(from), Some(to)) = (game_move.from(), game_move.to()) else {
            return Err(GameError::IllegalMove(self.describe_move(game_move)));
        };
        let Some(piece) = self.board.get(from) else {
            return Err(GameError::IllegalMove(self.describe_move(game_move)));
        };

        let mut captured = false;
        for step in game_move.squares().windows(2) {
            if let Some(over) = self.board.jumped_square(step[0], step[1]) {
                self.board.set(over, None);
                captured = true;
            }
        }

        self.board.set(from, None);
        let crowned = piece.king || self.board.in_promotion_row(to, self.current_player);
        self.board.set(
            to,
            Some(Piece {
                owner: piece.owner,
                king: crowned,
            }),
        );

        if piece.king && !captured {
            self.king_moves_without_capture += 1;
        } else {
            self.king_moves_without_capture = 0;
        }

        if self.current_player == Player::Two {
            self.turn += 1;
        }
        self.current_player = self.current_player.opponent();
        Ok(())
    }

    fn describe_move(&self, game_move: &Self::Move) -> String {
        game_move.notation(&self.board)
    }
}

impl fmt::Display for EnglishDraughts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        writeln!(
            f,
            "Turn #{}. {} plays.",
            self.turn,
            Self::player_name(self.current_player)
        )
    }
}
