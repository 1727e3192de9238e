use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use futures::{Stream, StreamExt, stream};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::debug;

use crate::{
    app::{
        events::AppEvent,
        state::{AppMode, AppState},
    },
    cli::{Command, FavoritesAction, ShowArgs, ThemeArg, UnitsAction, validate_nickname},
    config::AppConfig,
    data::{chat::ChatBackend, chat::ChatError, geocode::is_ambiguous},
    domain::weather::{Location, Units},
    store::{AddOutcome, MAX_FAVORITES, system_prefers_dark},
    ui::{
        DashboardView, render_candidates, render_chat_message, render_dashboard, render_error,
        render_favorites, render_recents,
    },
};

const EVENT_BUFFER: usize = 64;

/// Owns the state machine and its event channel for one command invocation.
struct Session {
    app: AppState,
    tx: mpsc::Sender<AppEvent>,
    rx: mpsc::Receiver<AppEvent>,
}

impl Session {
    fn new(config: AppConfig) -> Self {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        Self {
            app: AppState::new(config),
            tx,
            rx,
        }
    }

    async fn dispatch(&mut self, event: AppEvent) {
        self.app.handle_event(event, &self.tx);
        self.app.run_until_settled(&self.tx, &mut self.rx).await;
    }
}

pub async fn execute<W: Write>(command: &Command, config: AppConfig, out: &mut W) -> Result<()> {
    let mut session = Session::new(config);
    match command {
        Command::Search { query, count } => search(&mut session, query, *count, out).await,
        Command::Show(args) => show(&mut session, args, out).await,
        Command::Favorites { action } => favorites(&mut session, action.as_ref(), out).await,
        Command::Recent { clear } => recent(&mut session.app, *clear, out),
        Command::Units { action } => units(&mut session.app, action.as_ref(), out),
        Command::Theme { mode } => theme(&mut session.app, *mode, out),
        Command::Chat { city, message } => {
            let backend = session.app.config().chat_client();
            match message {
                Some(text) => {
                    chat(
                        &mut session,
                        city.as_deref(),
                        &backend,
                        stream::iter([text.clone()]),
                        out,
                    )
                    .await
                }
                None => {
                    chat(&mut session, city.as_deref(), &backend, stdin_lines(), out).await
                }
            }
        }
    }
}

async fn search<W: Write>(
    session: &mut Session,
    query: &str,
    count: u8,
    out: &mut W,
) -> Result<()> {
    session.app.search.set_limit(usize::from(count));
    let candidates = search_candidates(session, query).await;
    write!(out, "{}", render_candidates(&candidates))?;
    Ok(())
}

async fn search_candidates(session: &mut Session, query: &str) -> Vec<Location> {
    session
        .dispatch(AppEvent::SearchInput(query.to_string()))
        .await;
    session.app.search.suggestions().to_vec()
}

/// Turns a city name into one location. Ambiguous names without `pick` print
/// the candidates and yield `None`.
async fn resolve_location<W: Write>(
    session: &mut Session,
    city: &str,
    pick: Option<u8>,
    out: &mut W,
) -> Result<Option<Location>> {
    let candidates = search_candidates(session, city).await;
    if candidates.is_empty() {
        bail!("No locations found for \"{city}\"");
    }

    if let Some(pick) = pick {
        return match usize::from(pick)
            .checked_sub(1)
            .and_then(|index| candidates.get(index))
        {
            Some(location) => Ok(Some(location.clone())),
            None => bail!(
                "--pick {pick} is out of range; \"{city}\" matched {} locations",
                candidates.len()
            ),
        };
    }

    if is_ambiguous(city, &candidates) {
        writeln!(out, "\"{city}\" matches several places:")?;
        write!(out, "{}", render_candidates(&candidates))?;
        writeln!(out, "Run again with --pick <n> to choose one.")?;
        return Ok(None);
    }

    Ok(candidates.into_iter().next())
}

/// Explicit city first, then the most recently viewed location.
async fn target_location<W: Write>(
    session: &mut Session,
    city: Option<&str>,
    pick: Option<u8>,
    out: &mut W,
) -> Result<Option<Location>> {
    match city {
        Some(city) => resolve_location(session, city, pick, out).await,
        None => Ok(session.app.preferences.recents.most_recent().cloned()),
    }
}

async fn show<W: Write>(session: &mut Session, args: &ShowArgs, out: &mut W) -> Result<()> {
    let Some(location) = target_location(session, args.city.as_deref(), args.pick, out).await?
    else {
        if args.city.is_none() {
            bail!("No city given and no recent location to show");
        }
        return Ok(());
    };

    session.dispatch(AppEvent::SelectLocation(location)).await;
    if session.app.mode == AppMode::Error {
        if let Some(error) = &session.app.last_error {
            write!(out, "{}", render_error(error))?;
        }
        return Ok(());
    }
    session
        .dispatch(AppEvent::SelectDay(usize::from(args.day)))
        .await;

    let app = &session.app;
    let (Some(location), Some(snapshot)) = (app.location.as_ref(), app.forecast.as_ref()) else {
        bail!("Forecast unavailable");
    };
    let view = DashboardView {
        location,
        snapshot,
        units: &app.units,
        day: app.selected_day,
        is_favorite: app.favorites.is_favorite(location.id),
        hours: args.hours,
    };
    write!(out, "{}", render_dashboard(&view, Utc::now()))?;
    Ok(())
}

async fn favorites<W: Write>(
    session: &mut Session,
    action: Option<&FavoritesAction>,
    out: &mut W,
) -> Result<()> {
    match action {
        None | Some(FavoritesAction::List) => {}
        Some(FavoritesAction::Add {
            city,
            nickname,
            pick,
        }) => {
            let nickname = nickname
                .as_deref()
                .map(validate_nickname)
                .transpose()?
                .map(str::to_string);
            let Some(location) = resolve_location(session, city, *pick, out).await? else {
                return Ok(());
            };
            let name = location.display_name();
            match session.app.favorites.add(location, nickname) {
                AddOutcome::Added => writeln!(out, "Added {name} to favorites.")?,
                AddOutcome::AlreadyPresent => writeln!(out, "{name} is already a favorite.")?,
                AddOutcome::AtCapacity => {
                    writeln!(
                        out,
                        "Maximum of {MAX_FAVORITES} favorites reached. Remove one to add {name}."
                    )?;
                    return Ok(());
                }
            }
        }
        Some(FavoritesAction::Remove { position }) => {
            let id = favorite_id(&session.app, *position)?;
            session.app.favorites.remove(&id);
        }
        Some(FavoritesAction::Rename { position, nickname }) => {
            let nickname = validate_nickname(nickname)?;
            let id = favorite_id(&session.app, *position)?;
            session.app.favorites.update_nickname(&id, nickname);
        }
        Some(FavoritesAction::Move { from, to }) => {
            let (Some(from), Some(to)) = (from.checked_sub(1), to.checked_sub(1)) else {
                bail!("positions start at 1");
            };
            if !session.app.favorites.reorder(from, to) {
                bail!(
                    "cannot move {} to {}; there are {} favorites",
                    from + 1,
                    to + 1,
                    session.app.favorites.len()
                );
            }
        }
    }

    if action.is_some_and(|action| !matches!(action, FavoritesAction::List)) {
        session.app.save_favorites()?;
    }
    write!(out, "{}", render_favorites(&session.app.favorites))?;
    Ok(())
}

fn favorite_id(app: &AppState, position: usize) -> Result<String> {
    position
        .checked_sub(1)
        .and_then(|index| app.favorites.get(index))
        .map(|favorite| favorite.id.clone())
        .with_context(|| format!("no favorite at position {position}"))
}

fn recent<W: Write>(app: &mut AppState, clear: bool, out: &mut W) -> Result<()> {
    if clear {
        app.preferences.recents.clear();
        app.save_preferences()?;
        writeln!(out, "Recent locations cleared.")?;
        return Ok(());
    }
    write!(out, "{}", render_recents(&app.preferences.recents))?;
    Ok(())
}

fn units<W: Write>(app: &mut AppState, action: Option<&UnitsAction>, out: &mut W) -> Result<()> {
    let current = app.preferences.units;
    let next = match action {
        None => None,
        Some(UnitsAction::Metric) => Some(Units::metric()),
        Some(UnitsAction::Imperial) => Some(Units::imperial()),
        Some(UnitsAction::Toggle) => Some(current.toggled()),
        Some(UnitsAction::Set {
            temperature,
            wind,
            precipitation,
        }) => Some(Units {
            temperature: temperature.map_or(current.temperature, Into::into),
            wind_speed: wind.map_or(current.wind_speed, Into::into),
            precipitation: precipitation.map_or(current.precipitation, Into::into),
        }),
    };

    if let Some(units) = next {
        app.preferences.units = units;
        app.units = units;
        app.save_preferences()?;
    }
    let units = app.preferences.units;
    writeln!(
        out,
        "Temperature: °{}\nWind speed: {}\nPrecipitation: {}",
        units.temperature.symbol(),
        units.wind_speed.label(),
        units.precipitation.label()
    )?;
    Ok(())
}

fn theme<W: Write>(app: &mut AppState, mode: Option<ThemeArg>, out: &mut W) -> Result<()> {
    let system = system_prefers_dark();
    if let Some(arg) = mode {
        let current = app.theme.mode;
        app.theme.mode = arg.mode().unwrap_or_else(|| current.toggled(system));
        app.save_theme()?;
    }
    let mode = app.theme.mode;
    writeln!(
        out,
        "Theme: {} (showing {})",
        mode.as_str(),
        mode.resolve(system).as_str()
    )?;
    Ok(())
}

async fn chat<W, B, S>(
    session: &mut Session,
    city: Option<&str>,
    backend: &B,
    lines: S,
    out: &mut W,
) -> Result<()>
where
    W: Write,
    B: ChatBackend,
    S: Stream<Item = String>,
{
    if let Some(location) = target_location(session, city, None, out).await? {
        session.dispatch(AppEvent::SelectLocation(location)).await;
    } else if city.is_some() {
        return Ok(());
    }

    if let Some(welcome) = session.app.open_chat() {
        write!(out, "{}", render_chat_message(welcome))?;
    }
    out.flush()?;

    let mut lines = std::pin::pin!(lines);
    while let Some(line) = lines.next().await {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text.eq_ignore_ascii_case("exit") || text.eq_ignore_ascii_case("quit") {
            break;
        }

        let result = session.app.send_chat(backend, text).await;
        if let Some(reply) = session.app.chat.messages().last() {
            write!(out, "{}", render_chat_message(reply))?;
        }
        out.flush()?;
        if let Err(ChatError::MissingApiKey) = result {
            return Err(ChatError::MissingApiKey.into());
        }
    }
    debug!(messages = session.app.chat.messages().len(), "chat ended");
    Ok(())
}

fn stdin_lines() -> impl Stream<Item = String> {
    let reader = BufReader::new(tokio::io::stdin()).lines();
    stream::unfold(reader, |mut reader| async move {
        match reader.next_line().await {
            Ok(Some(line)) => Some((line, reader)),
            Ok(None) => None,
            Err(err) => {
                debug!(%err, "stdin closed");
                None
            }
        }
    })
}
