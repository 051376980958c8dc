//! Terminal input source.
//!
//! Stdin is read on a plain OS thread: a blocking terminal read can then
//! never hold up runtime shutdown. End of input drops the channel sender,
//! which the session sees as `None`.

use std::io::BufRead;
use tokio::sync::mpsc;

pub fn spawn_line_reader<R>(input: R) -> mpsc::Receiver<String>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(64);
    let spawned = std::thread::Builder::new()
        .name("stdin-lines".into())
        .spawn(move || forward_lines(input, tx));
    if let Err(e) = spawned {
        // The sender died with the closure, so the session sees end of input.
        tracing::error!("failed to start input thread: {}", e);
    }
    rx
}

fn forward_lines<R: BufRead>(input: R, tx: mpsc::Sender<String>) {
    for line in input.lines() {
        match line {
            Ok(line) => {
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::debug!("input read failed: {}", e);
                break;
            }
        }
    }
    tracing::debug!("input reader finished");
}
