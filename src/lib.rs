pub mod archive;
pub mod clients;
pub mod config;
pub mod db;
pub mod enrich;
pub mod error;
pub mod etl;
pub mod logger;
pub mod models;
pub mod mongo;
pub mod paruvendu;
pub mod services;
pub mod stages;
pub mod web;

pub use error::{Error, Result};
