// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! MindMate client session tool
//!
//! `status` (default) runs the app-start flow: restore the local session,
//! confirm it with the server and report the check-in streak.
//! `logout` ends the stored session.

use mindmate_client::{config::Config, services::streak, storage::FileStorage, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env()?;
    let storage = Arc::new(FileStorage::open(&config.storage_path));
    tracing::info!(
        api = %config.api_base,
        storage = %config.storage_path.display(),
        "Starting MindMate client"
    );

    let state = AppState::new(config, storage);

    let command = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "status".to_string());
    match command.as_str() {
        "logout" => Ok(state.session.logout()?),
        "status" => status(&state).await,
        other => anyhow::bail!("unknown command {:?} (expected status or logout)", other),
    }
}

async fn status(state: &AppState) -> anyhow::Result<()> {
    if !state.session.init() {
        tracing::info!("Not logged in");
        return Ok(());
    }

    // Local check passed; the server has the final say.
    let user = match state.api.current_user().await {
        Ok(user) => user,
        Err(err) if err.is_session_expired() => {
            tracing::info!("Session rejected by server");
            return Ok(());
        }
        Err(err) => {
            tracing::error!(error = %err, "Session verification failed");
            if let Err(logout_err) = state.session.logout() {
                tracing::error!(error = %logout_err, "Failed to clear session");
            }
            return Err(err.into());
        }
    };

    if let Err(err) = state.session.update_user(&user) {
        tracing::warn!(error = %err, "Keeping previously stored user record");
    }

    let summary = streak::summarize_at(
        mindmate_client::time_utils::local_today(),
        &user.check_in_dates,
    );
    tracing::info!(
        user = user.display_name(),
        current = summary.current,
        longest = summary.longest,
        milestone = summary.milestone.title,
        next_milestone = summary.next_milestone,
        needs_refresh = state.session.needs_refresh(),
        "Session active"
    );

    if let Some(celebration) = state.celebrations.evaluate(&user.check_in_dates)? {
        tracing::info!(
            streak = celebration.streak,
            message = %celebration.message,
            "Celebrate"
        );
    }

    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mindmate_client=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
