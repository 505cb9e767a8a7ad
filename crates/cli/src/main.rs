// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tdb: temporarily converts a running Trident deployment into a
//! remotely debuggable one.
//!
//! Flow: stage the debug build files, build and push the debug image,
//! connect to the cluster, then hand the deployment to the session
//! controller and hold the session open until the operator types `exit`
//! or sends an interrupt. The controller reverts the deployment on the
//! way out; the staged build files are restored last.

mod exit_error;
mod interrupt;
mod stage;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tdb_core::{trident, BuildCoordinates};
use tdb_session::{DebugSession, KubeCluster, SessionParams, Timing};

use crate::exit_error::{exit_code, ExitError};
use crate::stage::Staging;

#[derive(Parser, Debug)]
#[command(
    name = "tdb",
    version,
    about = "Starts a remote debugger for a running Trident deployment"
)]
struct Cli {
    /// Registry namespace the debug image is pushed to, e.g. the <user>
    /// in docker.repo.eng.netapp.com/<user>
    #[arg(short = 'a', long, value_parser = clap::builder::NonEmptyStringValueParser::new())]
    artifactory: String,

    /// Optional folder under the registry namespace for the pushed image
    #[arg(short = 'f', long)]
    folder: Option<String>,

    /// Path to a kubeconfig file; cluster access is inferred when omitted
    #[arg(short = 'k', long)]
    kubeconfig: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let outcome = run(cli).await;
    if let Err(ref err) = outcome {
        report(err);
    }
    // tokio's stdin reads are uncancelable, so dropping the runtime would
    // block on the exit listener's in-flight read; exit directly instead.
    std::process::exit(termination_code(&outcome));
}

/// Process exit status for a finished run: 0 on success, the carried
/// code or 1 on failure.
fn termination_code(outcome: &Result<()>) -> i32 {
    match outcome {
        Ok(()) => 0,
        Err(err) => exit_code(err),
    }
}

/// Logs go to stderr so build output and the interactive prompt own
/// stdout.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn report(err: &anyhow::Error) {
    if let Some(exit) = err.downcast_ref::<ExitError>() {
        if !exit.message.is_empty() {
            eprintln!("{}", exit.message);
        }
        return;
    }
    eprintln!("Error: {err:#}");
}

async fn run(cli: Cli) -> Result<()> {
    let coords = BuildCoordinates::new(cli.artifactory.as_str(), cli.folder.clone());
    let kit_dir = std::env::current_dir().context("cannot determine the debug kit directory")?;
    let staging = Staging::prepare(&kit_dir).await?;

    let outcome = debug_session(&cli, &coords, &staging).await;

    // Build files go back whatever happened above; a restore failure is
    // reported but never displaces an earlier session error.
    let restored = staging.restore().await;
    match (outcome, restored) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(restore_err)) => Err(restore_err.into()),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(restore_err)) => {
            tracing::warn!(error = %restore_err, "build file restore failed");
            Err(err)
        }
    }
}

/// Everything between staging and restore: build, connect, session.
async fn debug_session(cli: &Cli, coords: &BuildCoordinates, staging: &Staging) -> Result<()> {
    stage::run_debug_build(staging.build_dir(), coords).await?;

    let cluster = KubeCluster::connect(cli.kubeconfig.as_deref())
        .await
        .context("cannot build a Kubernetes client")?;
    let version = cluster
        .server_version()
        .await
        .context("cannot reach the Kubernetes API server")?;
    tracing::info!(%version, "connected to cluster");

    let cancel = CancellationToken::new();
    let (ready_tx, ready_rx) = oneshot::channel();
    let params = SessionParams {
        coords: coords.clone(),
        audit_dir: staging.dir().to_path_buf(),
        timing: Timing::from_env(),
    };
    let session = DebugSession::new(cluster, params, cancel.clone());
    let task = tokio::spawn(session.run(ready_tx));

    println!("Waiting for {} to become debuggable...", trident::DEPLOYMENT_NAME);
    // The sender drops without firing when the session fails early; the
    // listeners only ever start against a live, ready session.
    if ready_rx.await.is_ok() {
        println!(
            "Debugger listening on port {}. Type \"exit\" or press Ctrl-C to end the session.",
            trident::DEBUGGER_PORT
        );
        interrupt::spawn_exit_listener(cancel.clone());
        interrupt::spawn_signal_listener(cancel.clone());
    }

    task.await.context("debug session task failed")??;
    println!("Debug session closed, deployment restored.");
    Ok(())
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
