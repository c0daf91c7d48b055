//! Parlor CLI Client
//!
//! Interactive console client for the lobby service. Reads credentials and
//! menu choices from stdin and drives the session state machine until the
//! user quits or the connection fails.

use std::io::{self, BufRead, Write};

use clap::Parser;
use parlor::session::{ConnectionState, Session};
use parlor::transport::TcpTransport;
use parlor::{Config, ParlorError};
use tracing_subscriber::{fmt, EnvFilter};

/// Parlor lobby client
#[derive(Parser, Debug)]
#[command(name = "parlor-cli")]
#[command(about = "Client for a turn-based multiplayer lobby service")]
#[command(version)]
struct Args {
    /// Server address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:55555")]
    server: String,

    /// Receive timeout for request/response exchanges in milliseconds (0 = none)
    #[arg(long, default_value = "5000")]
    read_timeout_ms: u64,

    /// How long to wait for an opponent in the lobby, in milliseconds (0 = forever)
    #[arg(long, default_value = "0")]
    lobby_timeout_ms: u64,

    /// Delay before the game result is requested, in milliseconds
    #[arg(long, default_value = "1000")]
    settle_delay_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let config = Config::builder()
        .server_addr(&args.server)
        .read_timeout_ms(args.read_timeout_ms)
        .lobby_wait_timeout_ms(args.lobby_timeout_ms)
        .game_settle_delay_ms(args.settle_delay_ms)
        .build();

    tracing::info!("Parlor client v{}", parlor::VERSION);

    let session = match Session::connect(config) {
        Ok(s) => {
            println!("Connected to server at {}", args.server);
            s
        }
        Err(e) => {
            eprintln!("Connection failed: {e}. Make sure the server is running.");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(session) {
        eprintln!("Session ended: {e}");
        std::process::exit(1);
    }
}

/// Drive the session state machine from the console
///
/// Fatal errors close the transport and propagate; recoverable errors
/// (invalid input, malformed replies, lobby timeouts) print and re-prompt.
fn run(mut session: Session<TcpTransport>) -> parlor::Result<()> {
    loop {
        match session.state() {
            ConnectionState::Initial => {
                let Some(username) = prompt("Username (or 'quit'): ")? else {
                    return session.quit();
                };
                if is_quit(&username) {
                    return session.quit();
                }
                let Some(password) = prompt("Password: ")? else {
                    return session.quit();
                };

                let advanced = step(&mut session, |s| s.submit_credentials(&username, &password))?;
                if !advanced {
                    println!("Authentication failed, try again.");
                }
            }

            ConnectionState::Connected => {
                match session.list_games() {
                    Ok(games) => println!("Games: {games}"),
                    Err(e) if e.is_fatal() => return abort(&mut session, e),
                    Err(e) => println!("{e}"),
                }

                let Some(choice) = prompt("Game id to join, -1 to create, 'logout' or 'quit': ")?
                else {
                    return session.quit();
                };
                if is_quit(&choice) {
                    return session.quit();
                }
                if choice.eq_ignore_ascii_case("logout") {
                    step(&mut session, |s| s.log_out())?;
                    continue;
                }

                step(&mut session, |s| s.submit_menu_choice(&choice))?;
            }

            ConnectionState::Lobby => {
                println!("Waiting for an opponent to join...");
                match session.await_opponent() {
                    Ok(true) => println!("{}", session.last_message()),
                    Ok(false) => {}
                    Err(ParlorError::LobbyTimeout) => {
                        println!("No opponent joined in time, still waiting...");
                    }
                    Err(e) if e.is_fatal() => return abort(&mut session, e),
                    Err(e) => println!("{e}"),
                }
            }

            ConnectionState::ActiveGame => {
                println!("Game in progress, determining winner...");
                step(&mut session, |s| s.conclude_game())?;
            }
        }
    }
}

/// Run one state machine operation, printing the server's message
///
/// Recoverable errors are printed and swallowed (state unchanged); fatal
/// errors close the transport and propagate.
fn step<F>(session: &mut Session<TcpTransport>, op: F) -> parlor::Result<bool>
where
    F: FnOnce(&mut Session<TcpTransport>) -> parlor::Result<bool>,
{
    match op(session) {
        Ok(advanced) => {
            if !session.last_message().is_empty() {
                println!("Server: {}", session.last_message());
            }
            Ok(advanced)
        }
        Err(e) if e.is_fatal() => {
            let _ = session.close();
            Err(e)
        }
        Err(e) => {
            println!("{e}");
            Ok(false)
        }
    }
}

fn abort(session: &mut Session<TcpTransport>, e: ParlorError) -> parlor::Result<()> {
    let _ = session.close();
    Err(e)
}

/// Print a prompt and read one trimmed line; None on EOF
fn prompt(text: &str) -> io::Result<Option<String>> {
    print!("{text}");
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn is_quit(input: &str) -> bool {
    input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("q")
}
