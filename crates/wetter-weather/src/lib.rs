//! Weather lookup for Wetter
//!
//! Current conditions via OpenWeatherMap, device position with bounded retry,
//! reverse geocoding, and a persisted list of saved locations.

pub mod geocode;
pub mod location;
pub mod preferences;
pub mod provider;
pub mod saved;
pub mod session;
pub mod store;
pub mod types;

pub use geocode::{NominatimGeocoder, Place, ReverseGeocoder};
pub use location::{
    is_transient_location_unknown, resolve_position, resolve_position_cancellable, Delay,
    FixedLocationProvider, LocationProvider, RetryPolicy, TokioDelay,
};
pub use preferences::Preferences;
pub use provider::WeatherProvider;
pub use saved::{after_remove, after_save, normalize_saved, SAVED_LOCATIONS_CAPACITY};
pub use session::{LocatedWeather, SessionError, WeatherSession};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
pub use types::*;
