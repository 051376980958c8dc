mod app;
mod cli;
mod config;
mod irc;
mod logging;
mod ui;

use crate::app::event::DisplayEvent;
use crate::cli::UsageError;
use crate::irc::session::{self, SessionConfig};
use anyhow::{Context, Result};
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    let args = match cli::parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(UsageError::Help) => {
            println!("{}", cli::USAGE);
            return Ok(());
        }
        Err(e) => {
            eprintln!("Error: {}\n{}", e, cli::USAGE);
            std::process::exit(1);
        }
    };

    let cfg = config::load_config()?;
    logging::init(&cfg.logging);

    let session_cfg = SessionConfig {
        host: args.host,
        port: args.port,
        nickname: args.nickname,
        channel: args.channel,
        credentials: args.credentials,
        secure: args.tls,
        accept_invalid_certs: cfg.connection.accept_invalid_certs,
        identify_timeout: cfg.connection.identify_timeout_secs.map(Duration::from_secs),
        timestamp_format: cfg.ui.timestamp_format.clone(),
    };

    let (display_tx, display_rx) = mpsc::unbounded_channel::<DisplayEvent>();
    let display = ui::spawn_display(display_rx, &cfg.ui);
    let input = app::input::spawn_line_reader(std::io::BufReader::new(std::io::stdin()));

    let result = session::run(&session_cfg, input, display_tx)
        .await
        .with_context(|| format!("session with {}:{}", session_cfg.host, session_cfg.port));

    // The session dropped its sinks; let the display drain before exiting.
    let _ = display.await;

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}
