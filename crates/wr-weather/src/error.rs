use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather header error: {0}")]
    Header(String),

    #[error("penalty table error: {0}")]
    Penalty(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type WeatherResult<T> = Result<T, WeatherError>;
