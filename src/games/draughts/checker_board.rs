use crate::game::{GameError, Player};
use crate::games::draughts::DEFAULT_BOARD_SIZE;
use std::fmt;

/// A playable (dark) square, numbered from 1 row by row starting at the top of the board.
pub type Square = usize;

/// Returned by neighbor lookups that fall off the board.
pub const NO_SQUARE: Square = 0;

pub const MIN_BOARD_SIZE: usize = 4;
pub const MAX_BOARD_SIZE: usize = 16;

/// A draughts piece. White pieces belong to [`Player::One`], black pieces to [`Player::Two`].
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Piece {
    pub owner: Player,
    pub king: bool,
}

impl Piece {
    pub fn man(owner: Player) -> Self {
        Self { owner, king: false }
    }

    pub fn king(owner: Player) -> Self {
        Self { owner, king: true }
    }

    /// Directions this piece may move or jump in. Men only go forward: white up, black down.
    pub fn directions(&self) -> &'static [Direction] {
        match (self.owner, self.king) {
            (Player::One, false) => &[Direction::UpLeft, Direction::UpRight],
            (Player::Two, false) => &[Direction::DownLeft, Direction::DownRight],
            (Player::One, true) => &[
                Direction::UpLeft,
                Direction::UpRight,
                Direction::DownLeft,
                Direction::DownRight,
            ],
            (Player::Two, true) => &[
                Direction::DownLeft,
                Direction::DownRight,
                Direction::UpLeft,
                Direction::UpRight,
            ],
        }
    }

    fn symbol(&self) -> char {
        match (self.owner, self.king) {
            (Player::One, false) => 'w',
            (Player::One, true) => 'W',
            (Player::Two, false) => 'b',
            (Player::Two, true) => 'B',
        }
    }
}

/// The four diagonal directions, "up" being towards square 1.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Direction {
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    fn offsets(self) -> (isize, isize) {
        match self {
            Direction::UpLeft => (-1, -1),
            Direction::UpRight => (-1, 1),
            Direction::DownLeft => (1, -1),
            Direction::DownRight => (1, 1),
        }
    }
}

/// Storage and geometry of a square checker board.
///
/// Only the dark squares are stored. Row 0 is the top row, where black pieces start;
/// on even rows the dark squares sit on odd columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerBoard {
    size: usize,
    cells: Vec<Option<Piece>>,
}

impl CheckerBoard {
    /// A board without any piece on it.
    pub fn empty(size: usize) -> Result<Self, GameError> {
        validate_size(size)?;
        Ok(Self::blank(size))
    }

    /// A board in the starting position: `size / 2 - 1` rows of men for each side.
    pub fn new(size: usize) -> Result<Self, GameError> {
        validate_size(size)?;
        Ok(Self::starting(size))
    }

    /// The starting position on a [`DEFAULT_BOARD_SIZE`] board.
    pub fn standard() -> Self {
        Self::starting(DEFAULT_BOARD_SIZE)
    }

    fn blank(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size / 2],
        }
    }

    fn starting(size: usize) -> Self {
        let mut board = Self::blank(size);
        let rows_per_side = size / 2 - 1;
        let per_row = board.squares_per_row();
        for square in 1..=board.square_count() {
            let row = (square - 1) / per_row;
            if row < rows_per_side {
                board.set(square, Some(Piece::man(Player::Two)));
            } else if row >= size - rows_per_side {
                board.set(square, Some(Piece::man(Player::One)));
            }
        }
        board
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn squares_per_row(&self) -> usize {
        self.size / 2
    }

    /// Number of playable squares; valid squares are `1..=square_count()`.
    pub fn square_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_on_board(&self, square: Square) -> bool {
        (1..=self.square_count()).contains(&square)
    }

    pub fn get(&self, square: Square) -> Option<Piece> {
        if self.is_on_board(square) {
            self.cells[square - 1]
        } else {
            None
        }
    }

    /// Puts a piece on (or clears) a square. Off-board squares are ignored.
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        if self.is_on_board(square) {
            self.cells[square - 1] = piece;
        }
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.is_on_board(square) && self.cells[square - 1].is_none()
    }

    pub fn is_king(&self, square: Square) -> bool {
        self.get(square).is_some_and(|piece| piece.king)
    }

    pub fn owner(&self, square: Square) -> Option<Player> {
        self.get(square).map(|piece| piece.owner)
    }

    /// Squares holding the pieces of `player`, in ascending order.
    pub fn pieces_of(&self, player: Player) -> Vec<Square> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_some_and(|piece| piece.owner == player))
            .map(|(index, _)| index + 1)
            .collect()
    }

    pub fn count_pieces(&self, player: Player) -> usize {
        self.pieces_of(player).len()
    }

    /// The diagonal neighbor of `square`, or [`NO_SQUARE`] past the board edge.
    pub fn neighbor(&self, square: Square, direction: Direction) -> Square {
        if !self.is_on_board(square) {
            return NO_SQUARE;
        }
        let (row, col) = self.coordinates(square);
        let (d_row, d_col) = direction.offsets();
        match (row.checked_add_signed(d_row), col.checked_add_signed(d_col)) {
            (Some(row), Some(col)) if row < self.size && col < self.size => {
                row * self.squares_per_row() + col / 2 + 1
            }
            _ => NO_SQUARE,
        }
    }

    pub fn neighbor_up_left(&self, square: Square) -> Square {
        self.neighbor(square, Direction::UpLeft)
    }

    pub fn neighbor_up_right(&self, square: Square) -> Square {
        self.neighbor(square, Direction::UpRight)
    }

    pub fn neighbor_down_left(&self, square: Square) -> Square {
        self.neighbor(square, Direction::DownLeft)
    }

    pub fn neighbor_down_right(&self, square: Square) -> Square {
        self.neighbor(square, Direction::DownRight)
    }

    /// Whether `to` is one diagonal step away from `from`.
    pub fn is_adjacent(&self, from: Square, to: Square) -> bool {
        to != NO_SQUARE && Direction::ALL.iter().any(|&d| self.neighbor(from, d) == to)
    }

    /// The square jumped over when going from `from` to `to` in one capture step.
    pub fn jumped_square(&self, from: Square, to: Square) -> Option<Square> {
        if to == NO_SQUARE {
            return None;
        }
        Direction::ALL.iter().find_map(|&direction| {
            let over = self.neighbor(from, direction);
            (over != NO_SQUARE && self.neighbor(over, direction) == to).then_some(over)
        })
    }

    /// Whether `square` lies on the row where `player`'s men are crowned.
    pub fn in_promotion_row(&self, square: Square, player: Player) -> bool {
        if !self.is_on_board(square) {
            return false;
        }
        let (row, _) = self.coordinates(square);
        match player {
            Player::One => row == 0,
            Player::Two => row == self.size - 1,
        }
    }

    fn coordinates(&self, square: Square) -> (usize, usize) {
        let index = square - 1;
        let per_row = self.squares_per_row();
        let row = index / per_row;
        let col = 2 * (index % per_row) + if row % 2 == 0 { 1 } else { 0 };
        (row, col)
    }
}

fn validate_size(size: usize) -> Result<(), GameError> {
    if size % 2 != 0 || !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
        return Err(GameError::InvalidBoardSize(size));
    }
    Ok(())
}

impl fmt::Display for CheckerBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let per_row = self.squares_per_row();
        for row in 0..self.size {
            for col in 0..self.size {
                if (row + col) % 2 == 0 {
                    write!(f, " ")?;
                    continue;
                }
                let square = row * per_row + col / 2 + 1;
                let symbol = self.get(square).map_or('.', |piece| piece.symbol());
                write!(f, "{symbol}")?;
            }
            writeln!(f, "  {}-{}", row * per_row + 1, (row + 1) * per_row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_odd_or_out_of_range_sizes() {
        assert_eq!(CheckerBoard::new(7), Err(GameError::InvalidBoardSize(7)));
        assert_eq!(CheckerBoard::new(2), Err(GameError::InvalidBoardSize(2)));
        assert_eq!(CheckerBoard::new(18), Err(GameError::InvalidBoardSize(18)));
        assert!(CheckerBoard::new(10).is_ok());
    }

    #[test]
    fn standard_setup() {
        let board = CheckerBoard::new(8).unwrap();
        assert_eq!(board, CheckerBoard::standard());
        assert_eq!(board.square_count(), 32);
        assert_eq!(board.pieces_of(Player::Two), (1..=12).collect::<Vec<_>>());
        assert_eq!(board.pieces_of(Player::One), (21..=32).collect::<Vec<_>>());
        assert!((13..=20).all(|square| board.is_empty(square)));
        assert!(!board.is_king(1));
    }

    #[test]
    fn neighbors_follow_the_dark_diagonals() {
        let board = CheckerBoard::empty(8).unwrap();

        // 22 sits on row 5, column 2
        assert_eq!(board.neighbor_up_left(22), 17);
        assert_eq!(board.neighbor_up_right(22), 18);
        assert_eq!(board.neighbor_down_left(22), 25);
        assert_eq!(board.neighbor_down_right(22), 26);

        // 1 sits on row 0, column 1
        assert_eq!(board.neighbor_up_left(1), NO_SQUARE);
        assert_eq!(board.neighbor_up_right(1), NO_SQUARE);
        assert_eq!(board.neighbor_down_left(1), 5);
        assert_eq!(board.neighbor_down_right(1), 6);

        // 5 and 29 sit on the left edge
        assert_eq!(board.neighbor_up_left(5), NO_SQUARE);
        assert_eq!(board.neighbor_up_right(5), 1);
        assert_eq!(board.neighbor_down_left(29), NO_SQUARE);
        assert_eq!(board.neighbor_up_right(29), 25);

        assert_eq!(board.neighbor(NO_SQUARE, Direction::UpLeft), NO_SQUARE);
    }

    #[test]
    fn jumped_square_and_adjacency() {
        let board = CheckerBoard::empty(8).unwrap();
        assert_eq!(board.jumped_square(22, 13), Some(17));
        assert_eq!(board.jumped_square(22, 15), Some(18));
        assert_eq!(board.jumped_square(22, 18), None);
        assert!(board.is_adjacent(22, 18));
        assert!(!board.is_adjacent(22, 13));
    }

    #[test]
    fn promotion_rows() {
        let board = CheckerBoard::empty(8).unwrap();
        assert!(board.in_promotion_row(3, Player::One));
        assert!(!board.in_promotion_row(3, Player::Two));
        assert!(board.in_promotion_row(30, Player::Two));
        assert!(!board.in_promotion_row(30, Player::One));
        assert!(!board.in_promotion_row(NO_SQUARE, Player::One));
    }

    #[test]
    fn set_and_query_pieces() {
        let mut board = CheckerBoard::empty(6).unwrap();
        board.set(7, Some(Piece::king(Player::Two)));
        assert_eq!(board.owner(7), Some(Player::Two));
        assert!(board.is_king(7));
        assert_eq!(board.count_pieces(Player::Two), 1);

        board.set(7, None);
        assert!(board.is_empty(7));
        assert!(!board.is_empty(NO_SQUARE));
    }

    #[test]
    fn renders_a_grid() {
        let board = CheckerBoard::new(4).unwrap();
        let view = board.to_string();
        let lines: Vec<&str> = view.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], " b b  1-2");
        assert_eq!(lines[1], ". .   3-4");
        assert_eq!(lines[3], "w w   7-8");
    }
}
