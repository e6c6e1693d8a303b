//! apidoc - render the API document of the bundled ledger service.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod error;
mod render;
mod sample;

#[derive(Parser)]
#[command(name = "apidoc", version, about = "Derive API documents from declared operations")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Document the bundled ledger service
    Sample(sample::SampleArgs),
}

fn main() {
    // Logs go to stderr so the document can be piped from stdout.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "apidoc=info,apidoc_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let code = match args.command {
        Command::Sample(args) => sample::run(args),
    };
    std::process::exit(code);
}
