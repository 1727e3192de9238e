use tokio::sync::mpsc;

use super::search::SearchToken;
use crate::{
    data::{client::ApiError, forecast::ForecastClient, geocode::GeocodeClient},
    domain::weather::{ForecastKey, ForecastSnapshot, Location, Units},
};

#[derive(Debug)]
pub enum AppEvent {
    SelectLocation(Location),
    FetchStarted(ForecastKey),
    FetchSucceeded {
        key: ForecastKey,
        snapshot: Box<ForecastSnapshot>,
    },
    FetchFailed {
        key: ForecastKey,
        error: ApiError,
    },
    SelectDay(usize),
    SetUnits(Units),
    Retry,
    SearchInput(String),
    SearchResolved {
        token: SearchToken,
        query: String,
        result: Result<Vec<Location>, ApiError>,
    },
    Quit,
}

pub fn spawn_forecast_fetch(
    tx: mpsc::Sender<AppEvent>,
    client: ForecastClient,
    location: Location,
    units: Units,
    days: u8,
) {
    let key = ForecastKey::new(&location, units);
    tokio::spawn(async move {
        let _ = tx.send(AppEvent::FetchStarted(key)).await;
        let event = match client.fetch(&location, units, days).await {
            Ok(snapshot) => AppEvent::FetchSucceeded {
                key,
                snapshot: Box::new(snapshot),
            },
            Err(error) => AppEvent::FetchFailed { key, error },
        };
        let _ = tx.send(event).await;
    });
}

pub fn spawn_search(
    tx: mpsc::Sender<AppEvent>,
    client: GeocodeClient,
    token: SearchToken,
    query: String,
    count: usize,
) {
    tokio::spawn(async move {
        let result = client.search(&query, count).await;
        let _ = tx
            .send(AppEvent::SearchResolved {
                token,
                query,
                result,
            })
            .await;
    });
}
