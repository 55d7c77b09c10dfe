//! The textual user interface: menus, board rendering and the local game loop.

use crate::online;
use crossterm::style::{StyledContent, Stylize};
use engine::board::is_dark;
use engine::constants::BOARD_SIZE;
use engine::{Cell, Color, Difficulty, Engine, GameMode, Outcome, Session, Square, Transition, TurnResult};
use std::io::{self, Write};
use tracing::info;

/// Runs the main menu until the user quits.
pub fn run(relay_addr: &str) -> anyhow::Result<()> {
    println!("--- Checkers ---");

    loop {
        println!();
        println!("1) Local two-player");
        println!("2) Play against the computer");
        println!("3) Online");
        println!("q) Quit");

        let Some(choice) = prompt("Choose a mode: ")? else {
            return Ok(());
        };
        match choice.as_str() {
            "1" => {
                let session = Session::new(GameMode::LocalPvp, Color::White, Difficulty::default());
                play_local(session, &mut Engine::new())?;
            }
            "2" => {
                let Some(color) = ask_color()? else { continue };
                let Some(difficulty) = ask_difficulty()? else { continue };
                info!("starting game against the computer: {} as {}", difficulty, color);
                let session = Session::new(GameMode::VsAi, color, difficulty);
                play_local(session, &mut Engine::new())?;
            }
            "3" => {
                if let Err(e) = online::play(relay_addr) {
                    println!("Online game failed: {:#}", e);
                }
            }
            "q" | "quit" | "exit" => return Ok(()),
            _ => println!("Unknown option."),
        }
    }
}

fn ask_color() -> io::Result<Option<Color>> {
    loop {
        let Some(answer) = prompt("Play as (w)hite or (b)lack? ")? else {
            return Ok(None);
        };
        match answer.as_str() {
            "w" | "white" => return Ok(Some(Color::White)),
            "b" | "black" => return Ok(Some(Color::Black)),
            "q" | "quit" => return Ok(None),
            _ => println!("Please answer w or b."),
        }
    }
}

fn ask_difficulty() -> io::Result<Option<Difficulty>> {
    loop {
        let Some(answer) = prompt("Difficulty (easy/medium/hard): ")? else {
            return Ok(None);
        };
        if answer == "q" || answer == "quit" {
            return Ok(None);
        }
        match answer.parse::<Difficulty>() {
            Ok(difficulty) => return Ok(Some(difficulty)),
            Err(e) => println!("{}", e),
        }
    }
}

/// Plays a local or vs-computer game until it ends or the user quits.
pub fn play_local(mut session: Session, engine: &mut Engine) -> io::Result<()> {
    println!("Enter a cell as 'row col' to select a piece or a destination. Type 'quit' to leave.");

    loop {
        println!();
        render(&session);

        if !session.is_active() {
            if let Some(winner) = session.winner() {
                println!("{} wins!", winner);
            }
            return Ok(());
        }

        if !session.has_moves() {
            println!("{} has no legal moves. The game ends without a winner.", session.turn());
            session.deactivate();
            return Ok(());
        }

        if session.is_ai_turn() {
            println!("Computer is thinking...");
            match session.play_ai(engine) {
                Some(transition) => report(&transition),
                None => {
                    println!("Computer has no move. Game over.");
                    session.deactivate();
                    return Ok(());
                }
            }
            continue;
        }

        let Some(input) = prompt(&format!("{} to move: ", session.turn()))? else {
            return Ok(());
        };
        if is_quit(&input) {
            session.deactivate();
            return Ok(());
        }

        match parse_square(&input) {
            Some(sq) => match session.click(sq) {
                Outcome::Selected(sq) => {
                    println!("Selected {} ({} destinations).", sq, session.legal_moves().len());
                }
                Outcome::Moved(transition) => report(&transition),
                Outcome::Ignored => println!("Nothing to do at {}.", sq),
            },
            None => println!("Invalid cell. Use 'row col' with values 0-7."),
        }
    }
}

/// Prints a one-line description of an applied move.
pub fn report(transition: &Transition) {
    print!("{} plays {}", transition.mover, transition.mv);
    match transition.result {
        TurnResult::ContinueJumping(sq) => println!(", and must keep jumping from {}.", sq),
        TurnResult::TurnPassed(_) => println!("."),
        TurnResult::Won(winner) => println!(". {} has filled the target zone!", winner),
    }
}

pub fn is_quit(input: &str) -> bool {
    matches!(input, "q" | "quit" | "exit")
}

/// Reads one trimmed, lowercased line. `None` at end of input.
fn prompt(text: &str) -> io::Result<Option<String>> {
    print!("{}", text);
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_ascii_lowercase()))
}

/// Parses a cell typed as `row col`, `row,col` or two adjacent digits.
pub fn parse_square(input: &str) -> Option<Square> {
    let digits: Vec<u32> = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<_>>>()?;
    match digits.as_slice() {
        &[row, col] => Square::checked(row as i32, col as i32),
        _ => None,
    }
}

/// Draws the board with the selection, legal destinations and target zones.
pub fn render(session: &Session) {
    let board = session.board();
    let hints: Vec<Square> = session.legal_moves().iter().map(|m| m.to).collect();

    print!("   ");
    for c in 0..BOARD_SIZE {
        print!(" {}", c);
    }
    println!();

    for r in 0..BOARD_SIZE {
        print!("{}  ", r);
        for c in 0..BOARD_SIZE {
            let sq = Square::new(r as u8, c as u8);
            print!(" {}", cell_glyph(session, board.get(sq), sq, hints.contains(&sq)));
        }
        println!();
    }

    let status = match session.mode() {
        GameMode::LocalPvp => format!("To move: {}", session.turn()),
        GameMode::VsAi => format!(
            "To move: {} (you: {}, difficulty: {})",
            session.turn(),
            session.local_color(),
            session.difficulty()
        ),
        GameMode::Online => format!("To move: {} (you: {})", session.turn(), session.local_color()),
    };
    println!("{}", status);
}

fn cell_glyph(session: &Session, cell: Cell, sq: Square, is_hint: bool) -> StyledContent<char> {
    let selected = session.selected() == Some(sq);
    match cell {
        Cell::White if selected => 'W'.white().bold().reverse(),
        Cell::Black if selected => 'B'.dark_yellow().bold().reverse(),
        Cell::White => 'W'.white().bold(),
        Cell::Black => 'B'.dark_yellow().bold(),
        Cell::Empty if is_hint => '*'.green().bold(),
        Cell::Empty if !is_dark(sq.row as i32, sq.col as i32) => ' '.stylize(),
        Cell::Empty if Color::White.target_rows().contains(&(sq.row as usize)) => '.'.grey(),
        Cell::Empty if Color::Black.target_rows().contains(&(sq.row as usize)) => '.'.dark_yellow(),
        Cell::Empty => '.'.dark_grey(),
    }
}
