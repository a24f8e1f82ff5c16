use crate::games::draughts::checker_board::{CheckerBoard, Square};

/// A draughts move: the starting square followed by every landing square.
///
/// A move of two squares is either a single step or a single jump; anything longer is a
/// multi-capture chain whose intermediate squares are jump landings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DraughtsMove {
    squares: Vec<Square>,
}

impl DraughtsMove {
    pub fn new(squares: Vec<Square>) -> Self {
        Self { squares }
    }

    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    pub fn len(&self) -> usize {
        self.squares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    pub fn from(&self) -> Option<Square> {
        self.squares.first().copied()
    }

    pub fn to(&self) -> Option<Square> {
        self.squares.last().copied()
    }

    /// Whether the move jumps over a piece on `board`'s geometry.
    pub fn is_capture(&self, board: &CheckerBoard) -> bool {
        self.squares
            .windows(2)
            .any(|step| board.jumped_square(step[0], step[1]).is_some())
    }

    /// Standard notation: `22-18` for a step, `29x22x13` for captures.
    pub fn notation(&self, board: &CheckerBoard) -> String {
        let mut text = String::new();
        for (index, &square) in self.squares.iter().enumerate() {
            if index > 0 {
                let previous = self.squares[index - 1];
                text.push(if board.is_adjacent(previous, square) {
                    '-'
                } else {
                    'x'
                });
            }
            text.push_str(&square.to_string());
        }
        text
    }
}

impl From<Vec<Square>> for DraughtsMove {
    fn from(squares: Vec<Square>) -> Self {
        DraughtsMove::new(squares)
    }
}
