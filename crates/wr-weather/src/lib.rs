//! `wr-weather` — hourly weather conditions and their travel penalties.
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`table`]   | `WeatherTable` (city × hour → condition), `UNKNOWN_CONDITION` |
//! | [`penalty`] | `PenaltyTable` (condition → extra miles)                    |
//! | [`loader`]  | `load_weather_csv`, `load_weather_reader`                   |
//! | [`error`]   | `WeatherError`, `WeatherResult<T>`                          |

pub mod error;
pub mod loader;
pub mod penalty;
pub mod table;


pub use error::{WeatherError, WeatherResult};
pub use loader::{load_weather_csv, load_weather_reader, WeatherLoadStats};
pub use penalty::PenaltyTable;
pub use table::{WeatherTable, UNKNOWN_CONDITION};
