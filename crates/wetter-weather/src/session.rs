//! Weather session: the user-facing operations.
//!
//! Ties the location resolver, the weather client, the reverse geocoder and the
//! persisted preferences together. Every saved-list change runs
//! read -> compute -> persist under one lock, so concurrent callers never lose
//! an update.

use std::borrow::Cow;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use wetter_core::{StorageError, ThemeMode};

use crate::geocode::ReverseGeocoder;
use crate::location::{
    resolve_position_cancellable, Delay, LocationProvider, RetryPolicy, TokioDelay,
};
use crate::preferences::Preferences;
use crate::provider::WeatherProvider;
use crate::saved::{after_remove, after_save};
use crate::types::{CurrentConditions, LocationError, PermissionStatus, Position, WeatherError};

/// Errors surfaced by session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error(transparent)]
    Weather(#[from] WeatherError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// Message suitable for display; always non-empty
    pub fn user_message(&self) -> Cow<'static, str> {
        match self {
            SessionError::Location(e) => e.user_message(),
            SessionError::Weather(e) => e.user_message(),
            SessionError::Storage(e) => e.user_message().into(),
        }
    }
}

/// Result of "use my location"
#[derive(Debug, Clone)]
pub struct LocatedWeather {
    pub position: Position,
    pub conditions: CurrentConditions,
    /// Reverse-geocoded name when available, otherwise the API's place name
    pub display_name: String,
}

pub struct WeatherSession {
    weather: WeatherProvider,
    location: Arc<dyn LocationProvider>,
    geocoder: Arc<dyn ReverseGeocoder>,
    delay: Arc<dyn Delay>,
    policy: RetryPolicy,
    preferences: Preferences,
    saved: Mutex<Vec<String>>,
    theme: parking_lot::Mutex<ThemeMode>,
}

impl WeatherSession {
    /// Create a session, loading the saved list and theme from `preferences`
    pub fn new(
        weather: WeatherProvider,
        location: Arc<dyn LocationProvider>,
        geocoder: Arc<dyn ReverseGeocoder>,
        preferences: Preferences,
        default_theme: ThemeMode,
    ) -> Self {
        let saved = preferences.load_saved();
        let theme = preferences.load_theme(default_theme);
        tracing::debug!("Loaded {} saved locations, theme {}", saved.len(), theme);

        Self {
            weather,
            location,
            geocoder,
            delay: Arc::new(TokioDelay),
            policy: RetryPolicy::default(),
            preferences,
            saved: Mutex::new(saved),
            theme: parking_lot::Mutex::new(theme),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_delay(mut self, delay: Arc<dyn Delay>) -> Self {
        self.delay = delay;
        self
    }

    /// Look up current conditions by place name
    pub async fn search(&self, name: &str) -> Result<CurrentConditions, SessionError> {
        let conditions = self.weather.fetch_by_name(name).await.inspect_err(|e| {
            tracing::warn!("Weather lookup for {:?} failed: {}", name.trim(), e);
        })?;
        Ok(conditions)
    }

    /// Look up a saved entry
    pub async fn select_saved(&self, name: &str) -> Result<CurrentConditions, SessionError> {
        self.search(name).await
    }

    /// Resolve the device position, fetch its weather and remember the place.
    ///
    /// Once the position is known, reverse geocoding and the save run even if
    /// the weather fetch failed; that error is returned afterwards. Geocoding is
    /// best-effort, and failing to persist the name does not fail the lookup.
    pub async fn use_my_location(
        &self,
        cancel: &CancellationToken,
    ) -> Result<LocatedWeather, SessionError> {
        if self.location.request_permission().await? == PermissionStatus::Denied {
            tracing::info!("Location permission denied");
            return Err(LocationError::PermissionDenied.into());
        }

        let position = resolve_position_cancellable(
            self.location.as_ref(),
            self.delay.as_ref(),
            &self.policy,
            cancel,
        )
        .await
        .inspect_err(|e| tracing::warn!("Could not resolve position: {}", e))?;

        tracing::info!("Got location: {}, {}", position.latitude, position.longitude);

        let weather = self.weather.fetch_by_coords(&position).await;
        if let Err(e) = &weather {
            tracing::warn!("Weather lookup at current position failed: {}", e);
        }

        let geocoded = self.remember_place(&position).await;
        let conditions = weather?;
        let display_name = geocoded.unwrap_or_else(|| conditions.display_name());

        Ok(LocatedWeather {
            position,
            conditions,
            display_name,
        })
    }

    /// Reverse geocode `position` and save the resulting name, if any
    async fn remember_place(&self, position: &Position) -> Option<String> {
        let name = self.geocoder.reverse_geocode(position).await?.display_name();
        if name.is_empty() {
            return None;
        }
        if let Err(e) = self.save(&name).await {
            tracing::warn!("Failed to save {:?}: {}", name, e);
        }
        Some(name)
    }

    /// Save `name` to the front of the list and persist it. Returns the new list.
    pub async fn save(&self, name: &str) -> Result<Vec<String>, SessionError> {
        let mut saved = self.saved.lock().await;
        let next = after_save(&saved, name);
        if next != *saved {
            self.preferences.store_saved(&next)?;
            tracing::info!("Saved location {:?}", name.trim());
            *saved = next;
        }
        Ok(saved.clone())
    }

    /// Remove `name` from the list and persist it. Returns the new list.
    pub async fn remove(&self, name: &str) -> Result<Vec<String>, SessionError> {
        let mut saved = self.saved.lock().await;
        let next = after_remove(&saved, name);
        self.preferences.store_saved(&next)?;
        if next.len() != saved.len() {
            tracing::info!("Removed location {:?}", name.trim());
        }
        *saved = next;
        Ok(saved.clone())
    }

    pub async fn saved(&self) -> Vec<String> {
        self.saved.lock().await.clone()
    }

    pub fn theme(&self) -> ThemeMode {
        *self.theme.lock()
    }

    pub fn set_theme(&self, theme: ThemeMode) -> Result<(), SessionError> {
        let mut current = self.theme.lock();
        self.preferences.store_theme(theme)?;
        *current = theme;
        Ok(())
    }

    /// Flip between light and dark; returns the new mode
    pub fn toggle_theme(&self) -> Result<ThemeMode, SessionError> {
        let next = self.theme().toggled();
        self.set_theme(next)?;
        Ok(next)
    }
}
