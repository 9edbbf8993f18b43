// ABOUTME: Console transport for the Stride bot reading chat events from stdin
// ABOUTME: Each line is "<user_id> <text>" or "<user_id> #<button_token>"; replies go to stdout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Stride Bot Binary
//!
//! Runs the dispatcher over a line-oriented console so the dialogues can be
//! driven locally without a chat network. Events are handled one at a time
//! in arrival order.

use anyhow::Result;
use clap::Parser;
use std::fmt::Write as _;
use std::sync::Arc;
use stride_coach::{
    advice::{AdviceGateway, AdviceProvider, OfflineAdviceProvider},
    config::BotConfig,
    conversation::InMemoryConversationStore,
    database::{RecordStore, SqliteRecordStore},
    dispatch::Dispatcher,
    engine::DialogueEngine,
    logging,
    models::UserId,
    progress::ProgressReporter,
    transport::{InboundEvent, Reply},
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

/// Command-line arguments for the console bot
#[derive(Parser)]
#[command(name = "stride-bot")]
#[command(about = "Stride - conversational running tracker on the console")]
struct Args {
    /// Override `DATABASE_URL` (e.g. `sqlite::memory:` or `sqlite:./data/stride.db`)
    #[arg(long)]
    database_url: Option<String>,

    /// User id for lines that do not start with one
    #[arg(long, default_value_t = 1)]
    user: i64,

    /// Disable the advice gateway
    #[arg(long)]
    no_advice: bool,
}

/// Split a console line into the sender and the event
fn parse_line(line: &str, default_user: UserId) -> Option<InboundEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (user, payload) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => head
            .parse::<UserId>()
            .map_or((default_user, line), |user| (user, rest.trim())),
        None => (default_user, line),
    };
    Some(payload.strip_prefix('#').map_or_else(
        || InboundEvent::text(user, payload),
        |token| InboundEvent::button(user, token),
    ))
}

fn render(reply: &Reply) -> String {
    let mut out = reply.text.clone();
    for action in &reply.buttons {
        let _ = write!(out, "\n  [#{}] {}", action.token(), action.label());
    }
    out.push('\n');
    out
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = BotConfig::from_env()?;
    if let Some(url) = &args.database_url {
        config = config.with_database_url(url)?;
    }
    if args.no_advice {
        config.advice_enabled = false;
    }

    logging::init_from_env()?;
    info!("{}", config.summary());

    let records: Arc<dyn RecordStore> =
        Arc::new(SqliteRecordStore::connect(&config.database).await?);
    let engine = DialogueEngine::new(
        Arc::new(InMemoryConversationStore::new()),
        Arc::clone(&records),
    );
    let provider: Option<Arc<dyn AdviceProvider>> = if config.advice_enabled {
        Some(Arc::new(OfflineAdviceProvider))
    } else {
        None
    };
    let dispatcher = Dispatcher::new(
        engine,
        AdviceGateway::new(Arc::clone(&records), provider),
        ProgressReporter::new(records),
    );

    let default_user = UserId(args.user);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    info!("Reading events from stdin");
    while let Some(line) = lines.next_line().await? {
        let Some(event) = parse_line(&line, default_user) else {
            continue;
        };
        let reply = dispatcher.dispatch(&event).await;
        stdout.write_all(render(&reply).as_bytes()).await?;
        stdout.flush().await?;
    }

    info!("Input closed, shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_variants() {
        let default_user = UserId(1);
        assert_eq!(
            parse_line("42 hello there", default_user),
            Some(InboundEvent::text(UserId(42), "hello there"))
        );
        assert_eq!(
            parse_line("42 #yes_track", default_user),
            Some(InboundEvent::button(UserId(42), "yes_track"))
        );
        assert_eq!(
            parse_line("/start", default_user),
            Some(InboundEvent::text(default_user, "/start"))
        );
        assert_eq!(
            parse_line("I ran 10 km", default_user),
            Some(InboundEvent::text(default_user, "I ran 10 km"))
        );
        assert_eq!(parse_line("   ", default_user), None);
    }

    #[test]
    fn test_args_defaults_and_overrides() {
        let args = Args::try_parse_from(["stride-bot"]).unwrap();
        assert_eq!(args.user, 1);
        assert!(args.database_url.is_none());
        assert!(!args.no_advice);

        let args = Args::try_parse_from([
            "stride-bot",
            "--database-url",
            "sqlite::memory:",
            "--user",
            "7",
            "--no-advice",
        ])
        .unwrap();
        assert_eq!(args.database_url.as_deref(), Some("sqlite::memory:"));
        assert_eq!(args.user, 7);
        assert!(args.no_advice);
    }
}
