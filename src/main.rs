// src/main.rs

use clap::Parser;

mod api;
mod cli;
mod common;
mod config;
mod handlers;
mod models;
mod services;

use cli::Cli;
use config::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let mut state = match AppState::new() {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("startup failed: {e:#}");
            std::process::exit(1);
        }
    };

    if let Err(e) = cli.run(&mut state).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
