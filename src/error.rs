use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("GET {url} timed out {attempts} times, giving up")]
    RetriesExhausted { url: String, attempts: u32 },

    #[error("GET {url} answered {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("The selector you are trying to scrape for is invalid. Selector: {0}")]
    InvalidSelector(String),

    #[error("No archive matching '{prefix}' in {dir}")]
    NoArchive { dir: String, prefix: String },

    #[error("Token duration out of range: {0} seconds")]
    InvalidDuration(i64),

    #[error("Invalid database url: {0}")]
    DatabaseUrl(String),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Csv Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database Error: {0}")]
    Diesel(#[from] diesel::result::Error),

    #[error("Database Connection Error: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("MongoDB Error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Jwt Error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}
