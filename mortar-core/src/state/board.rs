//! Tic-tac-toe board

/// Player identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// The other player
    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Turn banner
    pub fn label(self) -> &'static str {
        match self {
            Player::One => "PLAYER 1",
            Player::Two => "PLAYER 2",
        }
    }

    /// Banner after a hit
    pub fn score_message(self) -> &'static str {
        match self {
            Player::One => "PLAYER 1 SCORES",
            Player::Two => "PLAYER 2 SCORES",
        }
    }

    /// Banner for the winner
    pub fn win_message(self) -> &'static str {
        match self {
            Player::One => "PLAYER 1 WINS!",
            Player::Two => "PLAYER 2 WINS!",
        }
    }
}

/// Rows, columns, and diagonals
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// 3x3 board, cells row-major from the top left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Board {
    cells: [Option<Player>; 9],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Occupant of a cell
    pub fn get(&self, cell: u8) -> Option<Player> {
        self.cells.get(cell as usize).copied().flatten()
    }

    /// Claim an empty cell
    ///
    /// Returns false (board unchanged) if the cell is taken or out of range.
    pub fn place(&mut self, cell: u8, player: Player) -> bool {
        match self.cells.get_mut(cell as usize) {
            Some(slot @ None) => {
                *slot = Some(player);
                true
            }
            _ => false,
        }
    }

    /// Empty every cell
    pub fn reset(&mut self) {
        self.cells = [None; 9];
    }

    /// First complete line, if any
    pub fn check_winner(&self) -> Option<Player> {
        LINES.iter().find_map(|&[a, b, c]| match self.cells[a] {
            Some(p) if self.cells[b] == Some(p) && self.cells[c] == Some(p) => Some(p),
            _ => None,
        })
    }

    /// Every cell is occupied
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Cells in index order
    pub fn cells(&self) -> &[Option<Player>; 9] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_of(p1: &[u8], p2: &[u8]) -> Board {
        let mut board = Board::new();
        for &c in p1 {
            assert!(board.place(c, Player::One));
        }
        for &c in p2 {
            assert!(board.place(c, Player::Two));
        }
        board
    }

    #[test]
    fn test_place_only_empty() {
        let mut board = Board::new();
        assert!(board.place(4, Player::One));
        assert!(!board.place(4, Player::Two));
        assert_eq!(board.get(4), Some(Player::One));
        assert!(!board.place(9, Player::Two));
    }

    #[test]
    fn test_every_line_wins() {
        for line in LINES {
            let cells = [line[0] as u8, line[1] as u8, line[2] as u8];
            assert_eq!(board_of(&[], &cells).check_winner(), Some(Player::Two));
        }
    }

    #[test]
    fn test_no_winner() {
        assert_eq!(board_of(&[0, 1], &[2]).check_winner(), None);
        // Full board, no line
        let full = board_of(&[0, 2, 3, 7, 8], &[1, 4, 5, 6]);
        assert!(full.is_full());
        assert_eq!(full.check_winner(), None);
    }

    #[test]
    fn test_alternating_top_rows() {
        // 1 2 1 / 2 1 2 / - - -
        let board = board_of(&[0, 2, 4], &[1, 3, 5]);
        assert_eq!(board.check_winner(), None);

        // 1 1 1 / - - - / - - -
        let board = board_of(&[0, 1, 2], &[]);
        assert_eq!(board.check_winner(), Some(Player::One));
    }

    #[test]
    fn test_reset() {
        let mut board = board_of(&[0, 1, 2], &[]);
        board.reset();
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_player_other() {
        assert_eq!(Player::One.other(), Player::Two);
        assert_eq!(Player::Two.other().other(), Player::Two);
    }
}
