// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session-ending inputs: the interactive `exit` command and OS signals.
//!
//! Both listeners share one `CancellationToken` with the session
//! controller, so whichever input arrives first ends the session and the
//! others stand down. Neither listener starts before the session is
//! ready; until then the controller itself is the only cancel source.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A line ends the session only if it is exactly `exit`, any case.
/// Surrounding whitespace does not match; the operator can see what they
/// typed.
pub(crate) fn is_exit_command(line: &str) -> bool {
    line.eq_ignore_ascii_case("exit")
}

/// Read lines until an exit command cancels the session. Closed input or
/// a read error ends the listener without ending the session; a detached
/// terminal should not tear down the debugger.
pub(crate) async fn watch_for_exit<R: AsyncBufRead + Unpin>(reader: R, cancel: &CancellationToken) {
    let mut lines = reader.lines();
    loop {
        tokio::select! {
            () = cancel.cancelled() => return,
            line = lines.next_line() => match line {
                Ok(Some(input)) if is_exit_command(&input) => {
                    cancel.cancel();
                    return;
                }
                Ok(Some(_)) => {}
                Ok(None) | Err(_) => return,
            }
        }
    }
}

pub(crate) fn spawn_exit_listener(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let stdin = BufReader::new(tokio::io::stdin());
        watch_for_exit(stdin, &cancel).await;
    })
}

/// Cancel the session on SIGINT or SIGTERM. Stands down once the session
/// ends some other way.
pub(crate) fn spawn_signal_listener(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            () = cancel.cancelled() => {}
            () = interrupt_signal() => {
                tracing::info!("interrupt received, ending the debug session");
                cancel.cancel();
            }
        }
    })
}

async fn interrupt_signal() {
    // A handler that failed to install pends forever; it must never read
    // as a received signal.
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await
        }
    };
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "sigterm handler unavailable");
                std::future::pending::<()>().await
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => {}
        () = terminate => {}
    }
}

#[cfg(test)]
#[path = "interrupt_tests.rs"]
mod tests;
