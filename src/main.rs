// What you SEE now:
// • `gold-sky` (or `gold-sky sky`): a window full of warm-gold stars.
//   Move the mouse through them: they drift away, glow, and link up with faint lines.
//   Make the window narrow (< 768 px) and every star starts to breathe. ESC quits.
// • `gold-sky snapshot --out sky.png`: same sky rendered headlessly to a PNG.
// • `gold-sky chat`: terminal chat with a hosted model (needs GROQ_API_KEY).
// • `gold-sky serve`: the POST /api/chat proxy route.

mod backdrop;
mod chat;
mod config;
mod draw;
mod error;
mod server;
mod snapshot;
mod starfield;
mod surface;
mod types;

use backdrop::Backdrop;
use chat::{ChatSession, GroqClient, PROMPT_SUGGESTIONS};
use clap::{Parser, Subcommand};
use config::{ProviderArgs, ProviderConfig};
use draw::WindowHost;
use error::Error;
use rand::SeedableRng;
use rand::rngs::StdRng;
use snapshot::SnapshotPlan;
use std::io::{BufRead, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "gold-sky", version, about = "Pointer-reactive starfield and chat client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open the starfield window (default)
    Sky {
        #[arg(long, default_value_t = 1280)]
        width: usize,
        #[arg(long, default_value_t = 720)]
        height: usize,
        /// Frames per second the window is paced to
        #[arg(long, default_value_t = 60)]
        fps: usize,
        /// Fixed seed for star placement
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Render the starfield without a window and save it as PNG
    Snapshot {
        #[arg(long, default_value_t = 1280)]
        width: usize,
        #[arg(long, default_value_t = 720)]
        height: usize,
        /// Number of animation frames to simulate
        #[arg(long, default_value_t = 60)]
        frames: u32,
        /// Pointer held at X,Y for the whole run
        #[arg(long, value_parser = parse_point)]
        pointer: Option<(f32, f32)>,
        /// Animation clock at the first frame (ms)
        #[arg(long, default_value_t = 0.0)]
        time_ms: f64,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        out: PathBuf,
    },
    /// Chat with the model in the terminal
    Chat {
        #[command(flatten)]
        provider: ProviderArgs,
    },
    /// Serve POST /api/chat
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
        #[command(flatten)]
        provider: ProviderArgs,
    },
}

fn parse_point(s: &str) -> Result<(f32, f32), String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected X,Y, got `{s}`"))?;
    let x = x.trim().parse::<f32>().map_err(|e| format!("bad X: {e}"))?;
    let y = y.trim().parse::<f32>().map_err(|e| format!("bad Y: {e}"))?;
    Ok((x, y))
}

fn rng_from(seed: Option<u64>) -> StdRng {
    seed.map(StdRng::seed_from_u64).unwrap_or_else(StdRng::from_entropy)
}

fn runtime() -> Result<tokio::runtime::Runtime, Error> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(Error::Runtime)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", report(&e));
            ExitCode::FAILURE
        }
    }
}

/// One-line, human-readable failure text for the terminal.
fn report(e: &Error) -> String {
    format!("error: {e}")
}

fn run() -> Result<(), Error> {
    let command = Cli::parse().command.unwrap_or(Command::Sky {
        width: 1280,
        height: 720,
        fps: 60,
        seed: None,
    });

    match command {
        Command::Sky { width, height, fps, seed } => run_sky(width, height, fps, seed),
        Command::Snapshot { width, height, frames, pointer, time_ms, seed, out } => {
            let plan = SnapshotPlan { width, height, frames, pointer, start_ms: time_ms };
            let frame = snapshot::render(&plan, rng_from(seed));
            snapshot::write_png(&frame, &out)
        }
        Command::Chat { provider } => run_chat(provider.into()),
        Command::Serve { addr, provider } => runtime()?.block_on(server::serve(addr, provider.into())),
    }
}

/* --- Window + animation loop ---
   Visual: the sky runs until the window closes or ESC is held. */
fn run_sky(width: usize, height: usize, fps: usize, seed: Option<u64>) -> Result<(), Error> {
    let host = WindowHost::new("Gold Sky", width, height, fps)?;
    match Backdrop::mount(host, rng_from(seed)) {
        Some(mut backdrop) => {
            let field = backdrop.field();
            info!(stars = field.stars().len(), mode = ?field.mode(), "sky running; ESC quits");
            backdrop.run();
            backdrop.teardown();
        }
        None => info!("nothing to draw on; exiting"),
    }
    Ok(())
}

/* --- Terminal chat ---
   One line = one prompt; the whole conversation is sent every turn. */
fn run_chat(config: ProviderConfig) -> Result<(), Error> {
    let client = GroqClient::from_config(&config)?;
    let mut session = ChatSession::new(client);
    let rt = runtime()?;

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    writeln!(stdout, "Try one of:").map_err(Error::Terminal)?;
    for s in PROMPT_SUGGESTIONS {
        writeln!(stdout, "  • {s}").map_err(Error::Terminal)?;
    }
    writeln!(stdout, "Type /quit to leave.").map_err(Error::Terminal)?;

    for line in stdin.lock().lines() {
        let line = line.map_err(Error::Terminal)?;
        let prompt = line.trim();
        if prompt.is_empty() { continue; }
        if prompt == "/quit" { break; }

        let reply = rt.block_on(session.send(prompt));
        writeln!(stdout, "\n{}\n", reply.content).map_err(Error::Terminal)?;
        stdout.flush().map_err(Error::Terminal)?;
    }
    info!(messages = session.history().len(), "chat ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_parsing() {
        assert_eq!(parse_point("400,300").unwrap(), (400.0, 300.0));
        assert_eq!(parse_point(" 1.5 , -2 ").unwrap(), (1.5, -2.0));
        assert!(parse_point("400").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn cli_accepts_snapshot_flags() {
        let cli = Cli::try_parse_from([
            "gold-sky", "snapshot", "--out", "sky.png", "--pointer", "10,20", "--seed", "3",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Snapshot { pointer, seed, frames, .. }) => {
                assert_eq!(pointer, Some((10.0, 20.0)));
                assert_eq!(seed, Some(3));
                assert_eq!(frames, 60);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn missing_key_reads_as_configuration_error() {
        let e = Error::from(chat::ChatError::MissingCredentials(config::API_KEY_VAR.into()));
        assert_eq!(report(&e), "error: GROQ_API_KEY not configured");
    }

    #[test]
    fn chat_without_key_fails_before_any_request() {
        let err = GroqClient::from_config(&ProviderConfig::default()).err().unwrap();
        assert_eq!(report(&Error::from(err)), "error: GROQ_API_KEY not configured");
    }

    #[test]
    fn no_subcommand_means_sky() {
        let cli = Cli::try_parse_from(["gold-sky"]).unwrap();
        assert!(cli.command.is_none());
    }
}
