//! Position evaluation for undecided games

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::board::{Board, Cell};
use crate::connection::Orientation;
use crate::game::Game;

/// Scores a position for the side to move; injected into the search engine
///
/// Higher is better for the player whose turn it is. Real evaluations are
/// bounded in magnitude by the board area, well clear of the win/loss
/// sentinels the engine uses for decided games.
pub trait Evaluator {
    fn score(&self, game: &Game) -> i64;
}

/// Evaluates a position by the minimum number of pieces a player still
/// needs to place to complete a crossing, assuming the opponent stands still
#[derive(Copy, Clone, Debug, Default)]
pub struct MinPiecesHeuristic;

impl MinPiecesHeuristic {
    /// The minimum number of empty cells `color` must fill to connect the
    /// two edges of `orientation`, or `size * size` if the opponent has cut
    /// every route.
    ///
    /// Dijkstra over the grid: stepping onto an owned piece is free,
    /// stepping onto an empty cell costs one piece, opponent pieces are
    /// impassable. Every cell of the starting edge is a source, seeded at 0
    /// if already owned and 1 otherwise. A cell is finalised the first time
    /// it is popped, so the first finalised cell on the ending edge carries
    /// the answer.
    pub fn path_cost(board: &Board, color: Cell, orientation: Orientation) -> usize {
        debug_assert!(!color.is_empty());

        let size = board.size();
        let mut visited = vec![false; size * size];
        // min-heap of (cost, row, col)
        let mut queue = BinaryHeap::new();

        for i in 0..size {
            let (row, col) = orientation.start_cell(i);
            let cost = if board.at(row, col) == color { 0 } else { 1 };
            queue.push(Reverse((cost, row, col)));
        }

        while let Some(Reverse((cost, row, col))) = queue.pop() {
            if visited[row * size + col] {
                continue;
            }
            visited[row * size + col] = true;

            if orientation.reaches_end(size, row, col) {
                return cost;
            }

            for (next_row, next_col) in board.neighbors(row, col) {
                if visited[next_row * size + next_col] {
                    continue;
                }
                let neighbor = board.at(next_row, next_col);
                if neighbor == color {
                    queue.push(Reverse((cost, next_row, next_col)));
                } else if neighbor.is_empty() {
                    queue.push(Reverse((cost + 1, next_row, next_col)));
                }
                // opponent pieces block the route entirely
            }
        }

        // every route is cut, answer with a cost no real path can reach
        size * size
    }
}

impl Evaluator for MinPiecesHeuristic {
    /// Negated piece deficit for the side to move, taking the cheaper of
    /// the two crossings: needing fewer pieces scores higher
    fn score(&self, game: &Game) -> i64 {
        let board = game.board();
        let player = game.current_player();

        let top_to_bottom = Self::path_cost(board, player, Orientation::TopBottom);
        let left_to_right = Self::path_cost(board, player, Orientation::LeftRight);

        -(top_to_bottom.min(left_to_right) as i64)
    }
}
