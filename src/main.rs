use std::{error::Error, io::stdin, time::SystemTime};

use clap::{Parser, ValueEnum};
use health_chess::{
    autoplay::{self, DEFAULT_MAX_PLIES, DEFAULT_SEED},
    console::ConsoleInterface,
    events::LoggingEventSink,
};
use log::{LevelFilter, error, info};

build_info::build_info!(fn build_info);

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Chess where every piece has hit points. Reads commands from stdin; type 'help' for the list.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// File the log is written to
    #[arg(long, default_value = "health-chess.log")]
    log_file: String,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Also write the log to stderr
    #[arg(long)]
    stderr: bool,

    /// Play this many games of random moves and print statistics instead of reading commands
    #[arg(long)]
    autoplay: Option<u64>,

    /// Seed for --autoplay
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Give up on an --autoplay game after this many moves
    #[arg(long, default_value_t = DEFAULT_MAX_PLIES)]
    max_plies: u32,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    setup_logger(&args)?;
    log_panics::init();

    let version = version_string();
    info!("Starting {version}");

    if let Some(games) = args.autoplay {
        let stats = autoplay::run(games, args.seed, args.max_plies);
        println!("{}", stats.summary());
        return Ok(());
    }

    let mut console = ConsoleInterface::new(LoggingEventSink, version);
    for line in stdin().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("Failed to read from stdin: {e}");
                return Err(e.into());
            }
        };

        let response = console.process_command(&line);
        for output in &response.lines {
            println!("{output}");
        }

        if response.quit {
            break;
        }
    }

    info!("Exiting");
    Ok(())
}

fn setup_logger(args: &Args) -> Result<(), fern::InitError> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(args.log_level.into())
        .chain(fern::log_file(&args.log_file)?);

    if args.stderr {
        dispatch = dispatch.chain(std::io::stderr());
    }

    dispatch.apply()?;
    Ok(())
}

fn version_string() -> String {
    let info = build_info();
    format!("{} {} ({})", info.crate_info.name, info.crate_info.version, info.profile)
}
