use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use gostop_engine::{load_rules, Session};
use tracing::{error, info};

mod telemetry;

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Parser)]
#[command(name = "gostop")]
#[command(about = "Go-Stop engine driven by JSON lines on stdin")]
struct Args {
    /// Rules file (JSON)
    #[arg(long, env = "GOSTOP_RULES")]
    rules: Option<PathBuf>,

    /// Fixed base seed for reproducible deals
    #[arg(long)]
    seed: Option<u64>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,

    #[arg(long, value_enum, default_value = "pretty")]
    log_format: LogFormat,
}

fn main() -> ExitCode {
    let args = Args::parse();
    telemetry::init_tracing(args.log_format, args.verbose);

    let rules = load_rules(args.rules.as_deref());
    let mut session = Session::new(rules, args.seed);
    info!(seed = session.game().base_seed(), "session ready");

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!(error = %e, "stdin read failed");
                return ExitCode::FAILURE;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let response = session.handle_line(&line);
        if let Err(e) = writeln!(stdout, "{response}").and_then(|()| stdout.flush()) {
            error!(error = %e, "stdout write failed");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
