//! Online play through the relay server.

use crate::tui::{is_quit, parse_square, render, report};
use anyhow::Context;
use engine::protocol::{self, ClientMessage, Dispatch, ServerMessage};
use engine::{Color, Difficulty, GameMode, Outcome, Session, TurnResult};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tracing::{info, warn};

/// Connects to the relay, waits for a pairing and plays one game.
pub fn play(relay_addr: &str) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run_game(relay_addr));
    // Terminal reads run on a blocking thread that cannot be joined.
    runtime.shutdown_background();
    result
}

async fn run_game(relay_addr: &str) -> anyhow::Result<()> {
    let stream = TcpStream::connect(relay_addr)
        .await
        .with_context(|| format!("could not reach relay at {}", relay_addr))?;
    info!("connected to relay at {}", relay_addr);

    let (reader, mut writer) = stream.into_split();
    let mut server_lines = BufReader::new(reader).lines();
    let mut input_lines = BufReader::new(tokio::io::stdin()).lines();

    // Placeholder until the relay assigns a color.
    let mut session = Session::new(GameMode::Online, Color::White, Difficulty::default());
    session.deactivate();

    send(&mut writer, &ClientMessage::JoinRequest).await?;
    println!("Connecting... type 'quit' to leave.");

    loop {
        tokio::select! {
            line = server_lines.next_line() => {
                let Some(line) = line? else {
                    println!("The relay closed the connection.");
                    return Ok(());
                };
                let msg = match ServerMessage::from_line(&line) {
                    Ok(msg) => msg,
                    Err(e) => {
                        warn!("ignoring relay line: {}", e);
                        continue;
                    }
                };
                match protocol::dispatch(&mut session, msg) {
                    Dispatch::Waiting => println!("Waiting for an opponent..."),
                    Dispatch::Started { color, .. } => {
                        println!("Opponent found. You play {}.", color);
                        render(&session);
                        if is_stuck(&mut session) {
                            return Ok(());
                        }
                    }
                    Dispatch::Applied(transition) => {
                        report(&transition);
                        render(&session);
                        if let TurnResult::Won(winner) = transition.result {
                            println!("{} wins!", winner);
                            return Ok(());
                        }
                        if is_stuck(&mut session) {
                            return Ok(());
                        }
                    }
                    Dispatch::Rejected => println!("Received a move that is not legal here; ignored."),
                    Dispatch::OpponentLeft => {
                        println!("Your opponent left the game.");
                        return Ok(());
                    }
                }
            }
            line = input_lines.next_line() => {
                let Some(input) = line? else {
                    return Ok(());
                };
                let input = input.trim().to_ascii_lowercase();
                if is_quit(&input) {
                    session.deactivate();
                    return Ok(());
                }
                if !session.is_active() {
                    println!("The game has not started yet.");
                    continue;
                }
                if !session.is_local_turn() {
                    println!("Waiting for the opponent to move.");
                    continue;
                }
                let Some(sq) = parse_square(&input) else {
                    println!("Invalid cell. Use 'row col' with values 0-7.");
                    continue;
                };
                match session.click(sq) {
                    Outcome::Selected(sq) => {
                        println!("Selected {}.", sq);
                        render(&session);
                    }
                    Outcome::Moved(transition) => {
                        if let Some(room_id) = session.room_id() {
                            send(&mut writer, &ClientMessage::move_made(room_id, transition.mv)).await?;
                        }
                        report(&transition);
                        render(&session);
                        if let TurnResult::Won(winner) = transition.result {
                            println!("{} wins!", winner);
                            return Ok(());
                        }
                        if is_stuck(&mut session) {
                            return Ok(());
                        }
                    }
                    Outcome::Ignored => println!("Nothing to do at {}.", sq),
                }
            }
        }
    }
}

/// Ends a game whose side to move cannot move, as the local loop does.
fn is_stuck(session: &mut Session) -> bool {
    if session.has_moves() {
        return false;
    }
    println!("{} has no legal moves. The game ends without a winner.", session.turn());
    session.deactivate();
    true
}

async fn send(writer: &mut OwnedWriteHalf, msg: &ClientMessage) -> anyhow::Result<()> {
    let line = msg.to_line()?;
    writer.write_all(format!("{}\n", line).as_bytes()).await?;
    Ok(())
}
