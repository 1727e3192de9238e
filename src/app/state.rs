use chrono::{DateTime, Utc};
use tokio::{sync::mpsc, time::Instant};
use tracing::{debug, info, warn};

use crate::{
    app::{
        events::{AppEvent, spawn_forecast_fetch, spawn_search},
        search::SearchController,
    },
    config::AppConfig,
    data::{
        cache::ResponseCache,
        chat::{ChatBackend, ChatError},
        client::ApiError,
        forecast::ForecastClient,
        geocode::GeocodeClient,
    },
    domain::{
        chat::{ChatMessage, ChatSession, WeatherContext, build_system_prompt, welcome_message},
        projection::{DayProjection, SelectedDay, project_day},
        sun::{SunPhase, sun_phase_for_day},
        weather::{ForecastKey, ForecastSnapshot, Location, Units},
    },
    resilience::freshness::{FreshnessPolicy, FreshnessState},
    store::{Favorites, Preferences, StateDir, ThemePreference},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Idle,
    Loading,
    Ready,
    Error,
    Quit,
}

#[derive(Debug)]
pub struct AppState {
    pub mode: AppMode,
    pub location: Option<Location>,
    pub units: Units,
    pub selected_day: SelectedDay,
    pub forecast: Option<ForecastSnapshot>,
    pub forecast_key: Option<ForecastKey>,
    pub last_error: Option<ApiError>,
    pub search: SearchController,
    pub preferences: Preferences,
    pub favorites: Favorites,
    pub theme: ThemePreference,
    pub chat: ChatSession,
    config: AppConfig,
    forecast_client: ForecastClient,
    geocode_client: GeocodeClient,
    state_dir: Option<StateDir>,
    forecast_cache: ResponseCache<ForecastKey, ForecastSnapshot>,
    pending_fetches: usize,
}

impl AppState {
    /// Reads every persisted store once; later mutations write through.
    pub fn new(config: AppConfig) -> Self {
        let state_dir = config.state_dir();
        let (preferences, favorites, theme) = match &state_dir {
            Some(dir) => (dir.load_preferences(), dir.load_favorites(), dir.load_theme()),
            None => Default::default(),
        };

        Self {
            mode: AppMode::Idle,
            location: None,
            units: preferences.units,
            selected_day: SelectedDay::TODAY,
            forecast: None,
            forecast_key: None,
            last_error: None,
            search: SearchController::new(config.search_debounce, config.max_search_results),
            preferences,
            favorites,
            theme,
            chat: ChatSession::new(),
            forecast_client: config.forecast_client(),
            geocode_client: config.geocode_client(),
            state_dir,
            forecast_cache: ResponseCache::new(FreshnessPolicy::forecast()),
            pending_fetches: 0,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn handle_event(&mut self, event: AppEvent, tx: &mpsc::Sender<AppEvent>) {
        match event {
            AppEvent::SelectLocation(location) => self.select_location(location, tx),
            AppEvent::FetchStarted(key) => self.handle_fetch_started(key),
            AppEvent::FetchSucceeded { key, snapshot } => {
                self.handle_fetch_succeeded(key, *snapshot);
            }
            AppEvent::FetchFailed { key, error } => self.handle_fetch_failed(key, error),
            AppEvent::SelectDay(day) => {
                self.selected_day = SelectedDay::clamped(day, self.day_count());
            }
            AppEvent::SetUnits(units) => self.set_units(units, tx),
            AppEvent::Retry => self.retry(tx),
            AppEvent::SearchInput(text) => {
                self.search.input(&text, Instant::now());
            }
            AppEvent::SearchResolved {
                token,
                query,
                result,
            } => {
                self.search.resolve(token, &query, result);
            }
            AppEvent::Quit => self.mode = AppMode::Quit,
        }
    }

    /// Pumps events until no fetch or search is outstanding, or until quit.
    pub async fn run_until_settled(
        &mut self,
        tx: &mpsc::Sender<AppEvent>,
        rx: &mut mpsc::Receiver<AppEvent>,
    ) {
        while !self.is_settled() {
            let deadline = self.search.deadline();
            tokio::select! {
                maybe_event = rx.recv() => {
                    let Some(event) = maybe_event else { break };
                    self.handle_event(event, tx);
                }
                () = wait_until(deadline) => self.dispatch_search(tx),
            }
        }
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.mode == AppMode::Quit || (self.pending_fetches == 0 && !self.search.is_pending())
    }

    pub fn dispatch_search(&mut self, tx: &mpsc::Sender<AppEvent>) {
        if let Some(request) = self.search.poll(Instant::now()) {
            debug!(
                token = request.token,
                query = %request.query,
                count = self.search.limit(),
                "dispatching search"
            );
            spawn_search(
                tx.clone(),
                self.geocode_client.clone(),
                request.token,
                request.query,
                self.search.limit(),
            );
        }
    }

    fn select_location(&mut self, location: Location, tx: &mpsc::Sender<AppEvent>) {
        info!(location = %location.name, "location selected");
        self.selected_day = SelectedDay::TODAY;
        self.preferences.recents.add(location.clone());
        self.persist_preferences();
        self.location = Some(location);
        self.start_fetch(tx);
    }

    fn set_units(&mut self, units: Units, tx: &mpsc::Sender<AppEvent>) {
        if units == self.units {
            return;
        }
        self.units = units;
        self.preferences.units = units;
        self.persist_preferences();
        self.start_fetch(tx);
    }

    /// Serves the current key from cache when possible; a stale entry is shown
    /// while a refetch runs.
    fn start_fetch(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let Some(location) = self.location.clone() else {
            return;
        };
        let key = ForecastKey::new(&location, self.units);
        self.forecast_key = Some(key);
        self.last_error = None;

        match self.forecast_cache.get(&key, Utc::now()) {
            Some((snapshot, FreshnessState::Fresh)) => {
                debug!(location = %location.name, "forecast served from cache");
                self.apply_snapshot(snapshot);
                return;
            }
            Some((snapshot, _)) => self.apply_snapshot(snapshot),
            None => {
                self.forecast = None;
                self.mode = AppMode::Loading;
            }
        }
        self.issue_fetch(tx, location);
    }

    fn retry(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let Some(location) = self.location.clone() else {
            return;
        };
        self.forecast_key = Some(ForecastKey::new(&location, self.units));
        self.last_error = None;
        if self.forecast.is_none() {
            self.mode = AppMode::Loading;
        }
        self.issue_fetch(tx, location);
    }

    fn issue_fetch(&mut self, tx: &mpsc::Sender<AppEvent>, location: Location) {
        self.pending_fetches += 1;
        spawn_forecast_fetch(
            tx.clone(),
            self.forecast_client.clone(),
            location,
            self.units,
            self.config.forecast_days,
        );
    }

    fn handle_fetch_started(&mut self, key: ForecastKey) {
        if self.forecast_key == Some(key) && self.forecast.is_none() {
            self.mode = AppMode::Loading;
        }
    }

    fn handle_fetch_succeeded(&mut self, key: ForecastKey, snapshot: ForecastSnapshot) {
        self.pending_fetches = self.pending_fetches.saturating_sub(1);
        self.forecast_cache.insert(key, snapshot.clone(), Utc::now());
        if self.forecast_key != Some(key) {
            warn!(location_id = key.location_id, "discarding stale forecast response");
            return;
        }
        self.apply_snapshot(snapshot);
    }

    fn handle_fetch_failed(&mut self, key: ForecastKey, error: ApiError) {
        self.pending_fetches = self.pending_fetches.saturating_sub(1);
        if self.forecast_key != Some(key) {
            debug!(location_id = key.location_id, %error, "ignoring failure of stale request");
            return;
        }
        warn!(%error, retryable = error.is_retryable(), "forecast fetch failed");
        self.last_error = Some(error);
        self.mode = AppMode::Error;
    }

    fn apply_snapshot(&mut self, snapshot: ForecastSnapshot) {
        self.selected_day = SelectedDay::clamped(self.selected_day.index(), snapshot.day_count());
        self.forecast = Some(snapshot);
        self.last_error = None;
        self.mode = AppMode::Ready;
    }

    #[must_use]
    pub fn day_count(&self) -> usize {
        self.forecast.as_ref().map_or(0, ForecastSnapshot::day_count)
    }

    #[must_use]
    pub fn projection(&self) -> Option<DayProjection> {
        self.forecast
            .as_ref()
            .map(|snapshot| project_day(snapshot, self.selected_day))
    }

    #[must_use]
    pub fn sun_phase(&self, now: DateTime<Utc>) -> Option<SunPhase> {
        self.forecast
            .as_ref()
            .and_then(|snapshot| sun_phase_for_day(snapshot, self.selected_day.index(), now))
    }

    #[must_use]
    pub fn weather_context(&self) -> WeatherContext<'_> {
        WeatherContext {
            location: self.location.as_ref(),
            snapshot: self.forecast.as_ref(),
        }
    }

    pub fn open_chat(&mut self) -> Option<&ChatMessage> {
        let welcome = welcome_message(&self.weather_context());
        self.chat.open(welcome)
    }

    /// One conversational turn. Failures are recorded in the transcript as an
    /// assistant message and also returned.
    pub async fn send_chat<B: ChatBackend>(
        &mut self,
        backend: &B,
        text: &str,
    ) -> Result<(), ChatError> {
        let prompt = build_system_prompt(&self.weather_context());
        self.chat.begin_turn(text);

        let result = {
            let history = self.chat.history();
            let prior = &history[..history.len().saturating_sub(1)];
            backend.complete(&prompt, prior, text).await
        };

        match result {
            Ok(reply) => {
                self.chat.complete_turn(reply);
                Ok(())
            }
            Err(err) => {
                warn!(%err, "chat turn failed");
                self.chat.fail_turn(&err.to_string());
                Err(err)
            }
        }
    }

    pub fn save_preferences(&self) -> anyhow::Result<()> {
        match &self.state_dir {
            Some(dir) => dir.save_preferences(&self.preferences),
            None => Ok(()),
        }
    }

    pub fn save_favorites(&self) -> anyhow::Result<()> {
        match &self.state_dir {
            Some(dir) => dir.save_favorites(&self.favorites),
            None => Ok(()),
        }
    }

    pub fn save_theme(&self) -> anyhow::Result<()> {
        match &self.state_dir {
            Some(dir) => dir.save_theme(&self.theme),
            None => Ok(()),
        }
    }

    fn persist_preferences(&self) {
        if let Err(err) = self.save_preferences() {
            warn!(error = %format!("{err:#}"), "saving preferences failed");
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
