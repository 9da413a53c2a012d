//! Gather - plan roasts, parties and potlucks from the terminal
//!
//! Reads one command per line from stdin. Set `GATHER_NAME` to choose who
//! you are and `RUST_LOG` for log output.

use std::io;

use gather_core::{EventSession, GatherConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod console;
mod identity;
mod shell;
mod state;

fn main() {
    // Logs go to stderr so they never interleave with shell output
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Gather");

    let config = match GatherConfig::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let name = std::env::var("GATHER_NAME").ok();
    let app_state = match state::AppState::new(config, name.as_deref()) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(user = %app_state.identity.name, "Signed in");

    let notices = console::Notices::default();
    let session = EventSession::new(&app_state.db, app_state.identity.actor())
        .with_collaborators(console::collaborators(&notices))
        .with_share_config(app_state.config.share.clone());

    let mut shell = shell::Shell::new(session, notices);
    if let Err(e) = shell.run(io::stdin().lock(), io::stdout().lock()) {
        tracing::error!("Shell stopped: {}", e);
        std::process::exit(1);
    }
}
