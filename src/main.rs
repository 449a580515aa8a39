//! session-tokens binary entry point.

use std::process::ExitCode;
use std::time::Instant;

use session_tokens::cli::{self, print_help, print_version};
use session_tokens::config::Config;
use session_tokens::logging;
use tracing::{debug, error, info};

fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Try 'session-tokens --help' for more information.");
            return ExitCode::from(2);
        }
    };

    if args.help {
        print_help();
        return ExitCode::SUCCESS;
    }
    if args.version {
        print_version();
        return ExitCode::SUCCESS;
    }

    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Another subscriber may already be installed when embedded.
    let _ = logging::try_init_with(config.log_filter());

    info!(
        policy = %config.session.policy,
        ttl_ms = config.session.ttl_ms,
        "session-tokens v{}",
        env!("CARGO_PKG_VERSION")
    );

    let (sessions, _store) = match config.memory_session_store::<()>() {
        Ok(parts) => parts,
        Err(e) => {
            error!(error = %e, "Session store could not be built");
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let started = Instant::now();
    for _ in 0..args.count {
        match sessions.add(()) {
            Ok(token) => println!("{}", token),
            Err(e) => {
                error!(error = %e, fatal = e.is_fatal(), "Token generation failed");
                return ExitCode::FAILURE;
            }
        }
    }
    let elapsed = started.elapsed();

    info!(
        count = args.count,
        elapsed_us = elapsed.as_micros() as u64,
        per_token_ns = (elapsed.as_nanos() / args.count as u128) as u64,
        "Tokens minted"
    );
    debug!(live = ?sessions.count().ok(), "Session store state");

    ExitCode::SUCCESS
}
