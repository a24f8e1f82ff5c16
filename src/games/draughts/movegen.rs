//! Legal move generation for English draughts.
//!
//! Captures are forced: when any piece of the side to move can jump, only capturing moves
//! are returned. Capture chains are enumerated exhaustively, each chain continuing until
//! no further jump is available from its landing square.

use crate::game::Player;
use crate::games::draughts::checker_board::{CheckerBoard, Direction, NO_SQUARE, Piece, Square};
use crate::games::draughts::draughts_move::DraughtsMove;
use tracing::warn;

/// Generates every legal move for `player`, captures first and exclusively.
///
/// Pieces are visited in ascending square order and directions in a fixed order, so the
/// result is stable for a given board.
pub fn legal_moves(board: &CheckerBoard, player: Player) -> Vec<DraughtsMove> {
    let captures = capture_moves(board, player);
    if !captures.is_empty() {
        return captures;
    }
    simple_moves(board, player)
}

/// Every complete capture chain available to `player`.
pub fn capture_moves(board: &CheckerBoard, player: Player) -> Vec<DraughtsMove> {
    let mut moves = Vec::new();
    for square in board.pieces_of(player) {
        if let Some(piece) = board.get(square) {
            moves.extend(piece_captures(board, square, piece));
        }
    }
    moves
}

/// Whether `player` has at least one legal move. Stops at the first one found.
pub fn has_legal_move(board: &CheckerBoard, player: Player) -> bool {
    board.pieces_of(player).into_iter().any(|square| {
        board.get(square).is_some_and(|piece| {
            piece.directions().iter().any(|&direction| {
                let to = board.neighbor(square, direction);
                to != NO_SQUARE
                    && (board.is_empty(to) || can_jump(board, square, piece, direction))
            })
        })
    })
}

/// Whether any piece of `player` can capture, without enumerating the chains.
pub fn has_capture(board: &CheckerBoard, player: Player) -> bool {
    board.pieces_of(player).into_iter().any(|square| {
        board.get(square).is_some_and(|piece| {
            piece
                .directions()
                .iter()
                .any(|&direction| can_jump(board, square, piece, direction))
        })
    })
}

/// Whether `candidate` is one of [`legal_moves`] for `player`.
///
/// Only the chains of the moving piece are generated.
pub fn is_legal(board: &CheckerBoard, player: Player, candidate: &DraughtsMove) -> bool {
    let Some(from) = candidate.from() else {
        return false;
    };
    let Some(piece) = board.get(from).filter(|piece| piece.owner == player) else {
        return false;
    };

    if has_capture(board, player) {
        return piece_captures(board, from, piece).contains(candidate);
    }
    let [_, to] = candidate.squares() else {
        return false;
    };
    board.is_empty(*to)
        && piece
            .directions()
            .iter()
            .any(|&direction| board.neighbor(from, direction) == *to)
}

fn piece_captures(board: &CheckerBoard, square: Square, piece: Piece) -> Vec<DraughtsMove> {
    capture_chains(board, square, piece, NO_SQUARE, 0)
        .into_iter()
        .map(|chain| {
            let mut squares = Vec::with_capacity(chain.len() + 1);
            squares.push(square);
            squares.extend(chain);
            DraughtsMove::new(squares)
        })
        .collect()
}

fn can_jump(board: &CheckerBoard, from: Square, piece: Piece, direction: Direction) -> bool {
    let over = board.neighbor(from, direction);
    if over == NO_SQUARE || board.owner(over) != Some(piece.owner.opponent()) {
        return false;
    }
    let landing = board.neighbor(over, direction);
    landing != NO_SQUARE && board.is_empty(landing)
}

/// Single diagonal steps onto empty squares.
pub fn simple_moves(board: &CheckerBoard, player: Player) -> Vec<DraughtsMove> {
    let mut moves = Vec::new();
    for square in board.pieces_of(player) {
        let Some(piece) = board.get(square) else {
            continue;
        };
        for &direction in piece.directions() {
            let to = board.neighbor(square, direction);
            if to != NO_SQUARE && board.is_empty(to) {
                moves.push(DraughtsMove::new(vec![square, to]));
            }
        }
    }
    moves
}

/// Landing-square sequences for every capture chain starting at `from`.
///
/// Each level works on its own snapshot of the board with the jumping piece moved and
/// the captured piece lifted, so a piece is never jumped twice. `previous` is the square
/// the piece just left and cannot be landed on again by the next jump.
fn capture_chains(
    board: &CheckerBoard,
    from: Square,
    piece: Piece,
    previous: Square,
    depth: usize,
) -> Vec<Vec<Square>> {
    let mut chains = Vec::new();
    for &direction in piece.directions() {
        let over = board.neighbor(from, direction);
        if over == NO_SQUARE || board.owner(over) != Some(piece.owner.opponent()) {
            continue;
        }
        let landing = board.neighbor(over, direction);
        if landing == NO_SQUARE || landing == previous || !board.is_empty(landing) {
            continue;
        }

        let mut snapshot = board.clone();
        snapshot.set(from, None);
        snapshot.set(over, None);
        snapshot.set(landing, Some(piece));

        let continuations = if depth + 1 >= board.square_count() {
            warn!(
                from,
                landing,
                depth,
                "capture chain reached the depth cap, truncating"
            );
            Vec::new()
        } else {
            capture_chains(&snapshot, landing, piece, from, depth + 1)
        };

        if continuations.is_empty() {
            chains.push(vec![landing]);
        } else {
            for continuation in continuations {
                let mut chain = Vec::with_capacity(continuation.len() + 1);
                chain.push(landing);
                chain.extend(continuation);
                chains.push(chain);
            }
        }
    }
    chains
}
