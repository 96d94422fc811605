//! The interactive dashboard loop.
//!
//! Each search runs on its own task and reports back over a channel, so the
//! prompt keeps accepting input while a request is outstanding.

use anyhow::{Context, Result};
use std::{io::Write, sync::Arc};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::debug;
use weatherdash_core::{
    Config, Dashboard, FetchError, KeyValueStore, MAX_RECENT_SEARCHES, PendingSearch,
    WeatherProvider, WeatherSnapshot,
};

use crate::render;

const HELP: &str = "\
Type a city name and press Enter to search.
  :1 .. :5   search a recent entry
  :r         refresh the city on display
  :h         show this help
  :q         quit";

type Completion = (PendingSearch, Result<WeatherSnapshot, FetchError>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Search(String),
    Recent(usize),
    Refresh,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    let Some(command) = line.strip_prefix(':') else {
        return Input::Search(line.to_string());
    };

    match command {
        "q" | "quit" => Input::Quit,
        "r" | "refresh" => Input::Refresh,
        "h" | "help" | "?" => Input::Help,
        n => match n.parse::<usize>() {
            Ok(n) if (1..=MAX_RECENT_SEARCHES).contains(&n) => Input::Recent(n - 1),
            _ => Input::Unknown(line.to_string()),
        },
    }
}

pub async fn run(config: &Config) -> Result<()> {
    let provider: Arc<dyn WeatherProvider> = Arc::new(config.build_provider());
    let mut dash = Dashboard::new(provider, config.recent_store()?);

    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}\n");
    show(&mut dash)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };

                let pending = match parse_input(&line) {
                    Input::Quit => break,
                    Input::Help => {
                        println!("{HELP}");
                        None
                    }
                    Input::Unknown(cmd) => {
                        println!("Unknown command {cmd:?}, type :h for help");
                        None
                    }
                    Input::Refresh => dash.begin_refresh(),
                    Input::Recent(index) => dash.begin_select_recent(index),
                    Input::Search(text) => {
                        dash.update_input(text);
                        dash.begin_submit()
                    }
                };

                if let Some(pending) = pending {
                    spawn_fetch(dash.provider(), pending, tx.clone());
                }
            }
            Some((pending, result)) = rx.recv() => {
                dash.finish_search(pending, result);
            }
        }

        show(&mut dash)?;
    }

    Ok(())
}

fn spawn_fetch(
    provider: Arc<dyn WeatherProvider>,
    pending: PendingSearch,
    tx: mpsc::UnboundedSender<Completion>,
) {
    tokio::spawn(async move {
        let result = provider.current_weather(pending.city()).await;
        if tx.send((pending, result)).is_err() {
            debug!("dashboard closed before search completed");
        }
    });
}

/// Print the screen, then any pending notification once.
fn show<S: KeyValueStore>(dash: &mut Dashboard<S>) -> Result<()> {
    let mut stdout = std::io::stdout().lock();

    write!(stdout, "\n{}", render::dashboard(dash))?;
    if let Some(n) = dash.notification() {
        write!(stdout, "\n{}", render::notification(n))?;
    }
    write!(stdout, "> ")?;
    stdout.flush()?;

    dash.dismiss_notification();
    Ok(())
}
