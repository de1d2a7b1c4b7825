use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use y2t::cli::{self, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for the transcript
    let default_filter = if cli.verbose { "y2t=debug" } else { "y2t=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut stdout = std::io::stdout();
    let result = cli::run(&cli, &mut stdout).await;

    if let Err(e) = &result {
        eprintln!("{} {}", style("Error:").for_stderr().red().bold(), e);
    }

    ExitCode::from(cli::exit_status(&result))
}
