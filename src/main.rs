//! Terminal chess game against the Negachess engine.

use std::io::{self, Write};
use std::sync::mpsc;

use log::{error, info};

use negachess_engine::coretypes::PlyKind;
use negachess_engine::evaluation::evaluate_abs;
use negachess_engine::fen::Fen;
use negachess_engine::{Algorithm, BoardState, Candidate, Engine, GameStatus, SearchResult};

enum InputKind {
    Exit,
    Newgame,
    Help,
    Error,
    Undo,
    Depth(PlyKind),
    Algo(Algorithm),
    Fen(BoardState),
    GameMove(Candidate),
}

impl From<&str> for InputKind {
    fn from(s: &str) -> Self {
        if let Ok(candidate) = s.parse::<Candidate>() {
            return Self::GameMove(candidate);
        }

        let (command, argument) = match s.split_once(' ') {
            Some((command, argument)) => (command, argument.trim()),
            None => (s, ""),
        };

        match command {
            "exit" => Self::Exit,
            "newgame" | "ng" => Self::Newgame,
            "help" => Self::Help,
            "undo" => Self::Undo,
            "depth" => argument.parse().map_or(Self::Error, Self::Depth),
            "algo" => argument.parse().map_or(Self::Error, Self::Algo),
            "fen" => BoardState::parse_fen(argument).map_or(Self::Error, Self::Fen),
            _ => Self::Error,
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("newgame | ng => Begin a new game.");
    println!("undo => Undo the position to return to your last move.");
    println!("depth <n> => Set the engine search depth in plies.");
    println!("algo <minimax|negamax|alphabeta> => Set the engine search algorithm.");
    println!("fen <fen> => Play on from the given position.");
    println!("help => Print this help text.");
    println!("exit => end CLI.");
    println!("\nTo make a move, enter a move in coordinate form.");
    println!("Examples: d2d4 -> Move piece on D2 to D4.");
    println!("          e7e8n -> Move pawn on E7 to E8 and promote to a knight.");
}

/// Prints the outcome of a finished game and returns true, or false if play goes on.
fn announce_end(engine: &Engine, winner_msg: &str) -> bool {
    match engine.status() {
        GameStatus::Ongoing => false,
        GameStatus::Checkmate => {
            println!("{}", engine.state());
            println!("{winner_msg}");
            true
        }
        GameStatus::Stalemate => {
            println!("{}", engine.state());
            println!("The game is DRAWN via STALEMATE.");
            true
        }
    }
}

/// Run the engine's reply on a background search and wait for its result.
fn engine_reply(engine: &mut Engine) -> Option<SearchResult> {
    let (sender, receiver) = mpsc::channel::<SearchResult>();
    if let Err(err) = engine.search(sender) {
        error!("could not start search: {err}");
        return None;
    }
    let result = receiver.recv().ok();
    engine.wait();
    result
}

fn restart(engine: &mut Engine, input: &mut String) -> io::Result<()> {
    println!("Press Enter to start a new game.");
    io::stdin().read_line(input)?;
    if let Err(err) = engine.new_game() {
        error!("{err}");
    }
    Ok(())
}

fn main() -> io::Result<()> {
    env_logger::init();

    println!("Negachess CLI 0.1.0\n");
    let mut engine = Engine::new();
    let mut input = String::new();

    loop {
        // Print evaluation of current position.
        println!(
            "Current Static cp  : {}",
            evaluate_abs(engine.state(), engine.status())
        );
        println!("{}", engine.state());
        print!("> ");
        io::stdout().flush()?;
        input.clear();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }

        let candidate = match InputKind::from(input.trim()) {
            InputKind::Exit => break,
            InputKind::Newgame => {
                if let Err(err) = engine.new_game() {
                    error!("{err}");
                }
                println!("Starting new game...");
                continue;
            }
            InputKind::Help => {
                print_help();
                continue;
            }
            InputKind::Undo => {
                // Undo both computer's move and player's last move.
                for _ in 0..2 {
                    if let Some(move_) = engine.undo() {
                        println!("Undo move {move_}.");
                    }
                }
                continue;
            }
            InputKind::Depth(depth) => {
                engine.set_depth(depth);
                info!("search depth set to {depth}");
                continue;
            }
            InputKind::Algo(algorithm) => {
                engine.set_algorithm(algorithm);
                info!("search algorithm set to {algorithm}");
                continue;
            }
            InputKind::Fen(state) => {
                if let Err(err) = engine.set_state(state) {
                    error!("{err}");
                }
                continue;
            }
            InputKind::Error => {
                println!("Invalid command: {}", input.trim());
                continue;
            }
            InputKind::GameMove(candidate) => candidate,
        };

        // Process a player move, then process an engine move.
        if engine
            .try_move(candidate.start, candidate.end, candidate.promotion)
            .is_none()
        {
            println!("That move was illegal! No action taken.");
            continue;
        }

        // Check if human player check or stalemated.
        if announce_end(&engine, "Congrats!! You won by CHECKMATE.") {
            restart(&mut engine, &mut input)?;
            continue;
        }

        // Have computer play its response.
        println!("{}\nthinking...", engine.state());
        let result = match engine_reply(&mut engine) {
            Some(result) => result,
            None => continue,
        };
        let played = engine.play_search_result(&result);

        if announce_end(&engine, "Oh no!! Negachess engine won by CHECKMATE.") {
            restart(&mut engine, &mut input)?;
            continue;
        }

        // Print diagnostic information.
        if let Some(move_) = played {
            println!("Negachess played move {move_}.");
        }
        println!("{result}");
    }
    Ok(())
}
