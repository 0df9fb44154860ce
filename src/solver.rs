//! An AI opponent built on minimax search with alpha-beta pruning

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use static_assertions::const_assert;

use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};

use crate::board::Cell;
use crate::game::{Game, Move};
use crate::heuristic::Evaluator;

/// The score of a position the searching player has won
pub const MAX_SCORE: i64 = i64::MAX;
/// The score of a position the searching player has lost
pub const MIN_SCORE: i64 = i64::MIN;

// heuristic scores are bounded in magnitude by the board area, so the
// sentinels stay clear of them for any board that could be allocated
const_assert!(MAX_SCORE > u32::MAX as i64);
const_assert!(MIN_SCORE < -(u32::MAX as i64));

/// Errors raised by invalid search requests
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SearchError {
    NoLegalMoves,
    InvalidDepth { depth: usize },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::NoLegalMoves => write!(f, "no legal moves to choose from"),
            SearchError::InvalidDepth { depth } => {
                write!(f, "search depth must be at least 1, got {}", depth)
            }
        }
    }
}

impl Error for SearchError {}

/// Optional bounds on the effort spent choosing a single move
///
/// When a limit trips mid-search the engine stops early and returns the
/// best move found so far instead of failing. The default has no limits:
/// the search runs to its full depth.
#[derive(Copy, Clone, Debug, Default)]
pub struct SearchLimits {
    /// Stop after roughly this many nodes
    pub node_budget: Option<usize>,
    /// Stop once this much wall-clock time has elapsed
    pub move_time: Option<Duration>,
}

impl SearchLimits {
    pub fn nodes(node_budget: usize) -> Self {
        Self {
            node_budget: Some(node_budget),
            move_time: None,
        }
    }

    pub fn time(move_time: Duration) -> Self {
        Self {
            node_budget: None,
            move_time: Some(move_time),
        }
    }
}

/// A move-selection strategy, so drivers can swap engines freely
pub trait Engine {
    /// Picks a move for the side to move in `game`
    fn choose_move(&mut self, game: &Game) -> Result<Move, SearchError>;

    /// The engine's display name
    fn name(&self) -> &str;
}

/// An engine choosing moves by depth-limited minimax with alpha-beta pruning
///
/// # Notes
/// Every candidate move is evaluated on an independent snapshot of the
/// game, never on shared mutable state. The snapshots live in a per-depth
/// arena and are refreshed in place between siblings, so a search allocates
/// in proportion to its depth rather than its node count. Legal moves are
/// shuffled freshly at every level of the recursion: equally scored moves
/// are broken arbitrarily rather than always lexicographically first.
/// Construct with [`Minimax::with_seed`] to pin the shuffles and make the
/// choice reproducible.
///
/// # Scoring
/// Decided positions score [`MAX_SCORE`] when the searching player has won
/// and [`MIN_SCORE`] when their opponent has; draws and depth-limit leaves
/// are scored by the injected [`Evaluator`], whose values are bounded by
/// the board area and can never collide with the sentinels.
#[derive(Clone)]
pub struct Minimax<E> {
    max_depth: usize,
    evaluator: E,
    rng: StdRng,
    limits: SearchLimits,
    deadline: Option<Instant>,

    /// The number of nodes searched by the last `choose_move` call (for
    /// diagnostics only)
    pub node_count: usize,
}

impl<E: Evaluator> Minimax<E> {
    /// Creates an engine searching `max_depth` plies ahead, with shuffles
    /// seeded from entropy
    pub fn new(max_depth: usize, evaluator: E) -> Result<Self, SearchError> {
        Self::with_rng(max_depth, evaluator, StdRng::from_entropy())
    }

    /// Creates an engine whose move shuffling is seeded, so repeated
    /// searches of the same position pick the same move
    pub fn with_seed(max_depth: usize, evaluator: E, seed: u64) -> Result<Self, SearchError> {
        Self::with_rng(max_depth, evaluator, StdRng::seed_from_u64(seed))
    }

    fn with_rng(max_depth: usize, evaluator: E, rng: StdRng) -> Result<Self, SearchError> {
        if max_depth < 1 {
            return Err(SearchError::InvalidDepth { depth: max_depth });
        }
        Ok(Self {
            max_depth,
            evaluator,
            rng,
            limits: SearchLimits::default(),
            deadline: None,
            node_count: 0,
        })
    }

    /// Adds effort limits to an existing engine
    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    fn shuffled_moves(&mut self, game: &Game) -> Vec<Move> {
        // TODO: the per-node move lists are the remaining allocation churn,
        // give them the same per-depth reuse as the game snapshots
        let mut moves = game.legal_moves();
        moves.shuffle(&mut self.rng);
        moves
    }

    fn out_of_budget(&self) -> bool {
        if let Some(budget) = self.limits.node_budget {
            if self.node_count >= budget {
                return true;
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return true;
            }
        }
        false
    }

    /// Scores `game` from `root_player`'s point of view, searching `depth`
    /// more plies; `arena` holds one reusable snapshot slot per remaining ply
    fn minimax(
        &mut self,
        game: &Game,
        arena: &mut [Game],
        depth: usize,
        mut alpha: i64,
        mut beta: i64,
        root_player: Cell,
    ) -> i64 {
        self.node_count += 1;

        // decided games and depth-limit leaves score immediately; a tripped
        // effort limit turns the rest of the subtree into leaves as well
        if game.is_over() || depth == 0 || self.out_of_budget() {
            let winner = game.winner();
            if winner == root_player {
                return MAX_SCORE;
            }
            if winner != Cell::Empty {
                return MIN_SCORE;
            }
            return self.evaluator.score(game);
        }

        let moves = self.shuffled_moves(game);
        let (next, rest) = arena.split_first_mut().expect("arena covers the search depth");

        if game.current_player() == root_player {
            // maximising node
            let mut best = MIN_SCORE;
            for mv in moves {
                next.clone_from(game);
                next.play(mv).expect("legal moves always apply");
                let score = self.minimax(next, rest, depth - 1, alpha, beta, root_player);
                best = best.max(score);
                // the opponent will never allow this branch
                if best >= beta {
                    return best;
                }
                alpha = alpha.max(best);
            }
            best
        } else {
            // minimising node
            let mut best = MAX_SCORE;
            for mv in moves {
                next.clone_from(game);
                next.play(mv).expect("legal moves always apply");
                let score = self.minimax(next, rest, depth - 1, alpha, beta, root_player);
                best = best.min(score);
                if best <= alpha {
                    return best;
                }
                beta = beta.min(best);
            }
            best
        }
    }
}

impl<E: Evaluator> Engine for Minimax<E> {
    /// Searches every legal move in a freshly shuffled order and returns
    /// the one with the strictly greatest score; ties keep the move found
    /// earliest in that order
    fn choose_move(&mut self, game: &Game) -> Result<Move, SearchError> {
        let mut moves = game.legal_moves();
        if game.is_over() || moves.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }
        moves.shuffle(&mut self.rng);

        self.node_count = 0;
        self.deadline = self.limits.move_time.map(|time| Instant::now() + time);
        let root_player = game.current_player();

        let mut arena = vec![game.clone(); self.max_depth];
        let (next, rest) = arena.split_first_mut().expect("depth is at least 1");

        let mut alpha = MIN_SCORE;
        let mut best_move = moves[0];
        let mut best_score = MIN_SCORE;
        for &mv in &moves {
            next.clone_from(game);
            next.play(mv).expect("legal moves always apply");
            let score = self.minimax(next, rest, self.max_depth - 1, alpha, MAX_SCORE, root_player);
            if score > best_score {
                best_score = score;
                best_move = mv;
            }
            alpha = alpha.max(score);
            if self.out_of_budget() {
                break;
            }
        }
        Ok(best_move)
    }

    fn name(&self) -> &str {
        "Minimax"
    }
}

impl<E: Evaluator + Clone + Send + Sync> Minimax<E> {
    /// Searches the root moves in parallel, one worker per candidate
    ///
    /// Each worker searches its subtree with the full alpha-beta window, a
    /// private RNG split off the engine's and a private snapshot arena, so
    /// no pruning bounds or state are shared between branches and every
    /// root score is exact. The move returned is the same one the
    /// sequential search would pick: the earliest strict maximum in the
    /// shuffled order. Worker node counts are summed into
    /// [`node_count`](Minimax::node_count).
    pub fn choose_move_parallel(&mut self, game: &Game) -> Result<Move, SearchError> {
        let mut moves = game.legal_moves();
        if game.is_over() || moves.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }
        moves.shuffle(&mut self.rng);

        self.node_count = 0;
        let deadline = self.limits.move_time.map(|time| Instant::now() + time);
        let root_player = game.current_player();

        let seeds: Vec<u64> = moves.iter().map(|_| self.rng.gen()).collect();
        let max_depth = self.max_depth;
        let limits = self.limits;
        let evaluator = &self.evaluator;

        let results: Vec<(i64, usize)> = moves
            .par_iter()
            .zip(seeds.par_iter())
            .map(|(&mv, &seed)| {
                let mut worker = Minimax {
                    max_depth,
                    evaluator: evaluator.clone(),
                    rng: StdRng::seed_from_u64(seed),
                    limits,
                    deadline,
                    node_count: 0,
                };
                let mut next = game.clone();
                next.play(mv).expect("legal moves always apply");
                let mut arena = vec![game.clone(); max_depth - 1];
                let score = worker.minimax(
                    &next,
                    &mut arena,
                    max_depth - 1,
                    MIN_SCORE,
                    MAX_SCORE,
                    root_player,
                );
                (score, worker.node_count)
            })
            .collect();

        let mut best_move = moves[0];
        let mut best_score = MIN_SCORE;
        for (&mv, &(score, nodes)) in moves.iter().zip(results.iter()) {
            self.node_count += nodes;
            if score > best_score {
                best_score = score;
                best_move = mv;
            }
        }
        Ok(best_move)
    }
}
