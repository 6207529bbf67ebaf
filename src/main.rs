use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

mod config;
mod document;
mod error;
mod launcher;
mod reload;
mod scaffold;
mod scripting;
mod session;

use session::Session;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse command line args
    let args: Vec<String> = env::args().collect();
    let Some(doc_path) = args.get(1).map(PathBuf::from) else {
        eprintln!("usage: regen <document>");
        return ExitCode::FAILURE;
    };

    // Open the document, then watch its companion script until stopped
    let result = match Session::open(doc_path) {
        Ok(mut session) => session.run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
