//! Game state and the rules of play

use std::fmt;

use crate::board::{Board, BoardError, Cell};
use crate::connection::{has_path, Orientation};

/// A piece placement, row-major coordinates from the top-left corner
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Move {
    pub row: usize,
    pub col: usize,
}

impl Move {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameState {
    Playing,
    PlayerOneWin,
    PlayerTwoWin,
    Draw,
}

/// A game in progress: the board plus whose turn it is and how many moves
/// have been played
///
/// A player wins by connecting the top row to the bottom row, or the left
/// column to the right column, with a chain of their own 4-adjacent pieces.
/// The only way to mutate a game is [`Game::play`]; `Clone` produces a fully
/// independent copy.
#[derive(Eq, PartialEq, Debug)]
pub struct Game {
    board: Board,
    current_player: Cell,
    moves_made: usize,
}

impl Clone for Game {
    fn clone(&self) -> Self {
        Self {
            board: self.board.clone(),
            current_player: self.current_player,
            moves_made: self.moves_made,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.board.clone_from(&source.board);
        self.current_player = source.current_player;
        self.moves_made = source.moves_made;
    }
}

impl Game {
    /// Creates an empty game; player one moves first
    pub fn new(size: usize) -> Result<Self, BoardError> {
        Ok(Self {
            board: Board::new(size)?,
            current_player: Cell::PlayerOne,
            moves_made: 0,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    pub fn current_player(&self) -> Cell {
        self.current_player
    }

    pub fn moves_made(&self) -> usize {
        self.moves_made
    }

    /// Every empty cell, in row-major order
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        for row in 0..self.size() {
            for col in 0..self.size() {
                if self.board.at(row, col).is_empty() {
                    moves.push(Move::new(row, col));
                }
            }
        }
        moves
    }

    /// Places the current player's piece and passes the turn
    ///
    /// Fails with `OutOfBounds` or `CellOccupied` without touching any
    /// state: a move either applies completely or not at all.
    pub fn play(&mut self, mv: Move) -> Result<(), BoardError> {
        if !self.board.get(mv.row, mv.col)?.is_empty() {
            return Err(BoardError::CellOccupied {
                row: mv.row,
                col: mv.col,
            });
        }
        self.board.set(mv.row, mv.col, self.current_player)?;
        self.current_player = self.current_player.opponent();
        self.moves_made += 1;
        Ok(())
    }

    /// The winning player, or `Empty` while the game is undecided
    ///
    /// Player one's connections are checked first: on a square grid it is
    /// possible for both players to hold a completed crossing at once (each
    /// along their own row, say), and the first check wins that tie.
    pub fn winner(&self) -> Cell {
        for &player in &[Cell::PlayerOne, Cell::PlayerTwo] {
            if has_path(&self.board, player, Orientation::TopBottom)
                || has_path(&self.board, player, Orientation::LeftRight)
            {
                return player;
            }
        }
        Cell::Empty
    }

    /// True once a player has connected or the board has filled
    pub fn is_over(&self) -> bool {
        self.winner() != Cell::Empty || self.moves_made == self.size() * self.size()
    }

    pub fn state(&self) -> GameState {
        match self.winner() {
            Cell::PlayerOne => GameState::PlayerOneWin,
            Cell::PlayerTwo => GameState::PlayerTwoWin,
            Cell::Empty => {
                if self.moves_made == self.size() * self.size() {
                    GameState::Draw
                } else {
                    GameState::Playing
                }
            }
        }
    }
}
