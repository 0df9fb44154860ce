use anyhow::Result;
use crossterm::{
    style::{style, Color, PrintStyledContent},
    QueueableCommand,
};
use indicatif::ProgressBar;

use std::io::{stdin, stdout, Stdin, Write};
use std::time::Duration;

use crossway_ai::board::{Board, Cell};
use crossway_ai::game::{Game, GameState, Move};
use crossway_ai::heuristic::MinPiecesHeuristic;
use crossway_ai::solver::{Engine, Minimax};

fn main() -> Result<()> {
    let stdin = stdin();

    println!("Welcome to Crossway\n");
    println!("Connect the top and bottom rows, or the left and right columns,");
    println!("with an unbroken chain of your pieces.\n");

    let size = prompt_number(&stdin, "Board size", 5)?;
    let depth = prompt_number(&stdin, "AI search depth", 5)?;

    let mut ai_players = (false, false);

    // choose AI control of player 1
    loop {
        let mut buffer = String::new();
        print!("Is player 1 (X) AI controlled? y/n: ");
        stdout().flush().expect("failed to flush to stdout!");
        stdin.read_line(&mut buffer)?;
        match buffer.to_lowercase().chars().next() {
            Some(_letter @ 'y') => {
                ai_players.0 = true;
                break;
            }
            Some(_letter @ 'n') => break,
            _ => println!("Unknown answer given"),
        }
    }

    // choose AI control of player 2
    loop {
        let mut buffer = String::new();
        print!("Is player 2 (O) AI controlled? y/n: ");
        stdout().flush().expect("failed to flush to stdout!");
        stdin.read_line(&mut buffer)?;
        match buffer.to_lowercase().chars().next() {
            Some(_letter @ 'y') => {
                ai_players.1 = true;
                break;
            }
            Some(_letter @ 'n') => break,
            _ => println!("Unknown answer given"),
        }
    }

    let mut game = Game::new(size)?;
    let mut ai = Minimax::new(depth, MinPiecesHeuristic)?;

    // game loop
    loop {
        draw_board(game.board())?;

        match game.state() {
            GameState::Playing => {
                let ai_turn = match game.current_player() {
                    Cell::PlayerOne => ai_players.0,
                    _ => ai_players.1,
                };

                let next_move = if ai_turn {
                    // slow down play if both players are AI
                    if ai_players == (true, true) {
                        std::thread::sleep(Duration::new(1, 0));
                    }

                    let spinner = ProgressBar::new_spinner();
                    spinner.set_message(&format!("{} is thinking...", ai.name()));
                    spinner.enable_steady_tick(120);

                    let chosen = ai.choose_move_parallel(&game)?;

                    spinner.finish_and_clear();
                    println!("AI plays {}", chosen);
                    chosen

                // human player
                } else {
                    match read_move(&stdin, &game)? {
                        Some(mv) => mv,
                        None => continue,
                    }
                };

                if let Err(err) = game.play(next_move) {
                    println!("{}", err);
                    // try the move again
                    continue;
                }
            }

            // end states
            GameState::PlayerOneWin => {
                println!("Player 1 (X) wins!");
                break;
            }
            GameState::PlayerTwoWin => {
                println!("Player 2 (O) wins!");
                break;
            }
            GameState::Draw => {
                println!("Draw!");
                break;
            }
        }
    }
    Ok(())
}

fn draw_board(board: &Board) -> Result<()> {
    let mut stdout = stdout();

    stdout.queue(PrintStyledContent(style("\n")))?;
    for row in 0..board.size() {
        for col in 0..board.size() {
            let cell = board.get(row, col)?;
            let glyph = style(cell.glyph()).with(match cell {
                Cell::PlayerOne => Color::Red,
                Cell::PlayerTwo => Color::Yellow,
                Cell::Empty => Color::DarkGrey,
            });
            stdout
                .queue(PrintStyledContent(glyph))?
                .queue(PrintStyledContent(style(' ')))?;
        }
        stdout.queue(PrintStyledContent(style("\n")))?;
    }
    stdout.flush()?;
    Ok(())
}

fn prompt_number(stdin: &Stdin, prompt: &str, default: usize) -> Result<usize> {
    loop {
        print!("{} [{}]: ", prompt, default);
        stdout().flush().expect("failed to flush to stdout!");

        let mut buffer = String::new();
        stdin.read_line(&mut buffer)?;
        let trimmed = buffer.trim();
        if trimmed.is_empty() {
            return Ok(default);
        }
        match trimmed.parse::<usize>() {
            Ok(number) if number > 0 => return Ok(number),
            _ => println!("Invalid number: {}", trimmed),
        }
    }
}

/// Reads a 1-based index into the legal move list, or None on bad input
fn read_move(stdin: &Stdin, game: &Game) -> Result<Option<Move>> {
    let moves = game.legal_moves();

    println!("Your turn. Available moves:");
    for (index, mv) in moves.iter().enumerate() {
        print!("{:>3}: {}   ", index + 1, mv);
        if (index + 1) % 5 == 0 {
            println!();
        }
    }
    if moves.len() % 5 != 0 {
        println!();
    }

    print!("Move input > ");
    stdout().flush().expect("Failed to flush to stdout!");
    let mut input_str = String::new();
    stdin.read_line(&mut input_str)?;

    match input_str.trim().parse::<usize>() {
        Ok(number) if number >= 1 && number <= moves.len() => Ok(Some(moves[number - 1])),
        _ => {
            println!("Invalid move number: {}", input_str.trim());
            Ok(None)
        }
    }
}
