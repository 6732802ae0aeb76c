use clap::ArgAction;
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use log::{error, warn};
use std::path::PathBuf;

fn main() {
    let args = CliArgs::parse();
    let dotenv_result = dotenv();

    let env = env_logger::Env::new().filter_or(
        "RUST_LOG",
        match args.global_opts.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        },
    );
    env_logger::Builder::from_env(env).init();
    if dotenv_result.is_err() {
        warn!("Could not read .env file: {}", dotenv_result.unwrap_err());
    }

    let result = match args.command {
        Command::Serve { seed } => hallbook_server::web::serve(seed.as_deref()),
    };
    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(e.exit_code());
    }
}

/// Room-booking administration service for student activities
#[derive(Debug, Parser)]
#[clap(name = "hallbook", version)]
pub struct CliArgs {
    #[clap(flatten)]
    global_opts: GlobalOpts,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the Hallbook web API
    Serve {
        /// Path of a JSON seed file with initial rooms, bookings and admin accounts
        #[clap(long)]
        seed: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct GlobalOpts {
    /// Verbosity level (can be specified multiple times)
    #[clap(long, short, global = true, action = ArgAction::Count)]
    verbose: u8,
}
