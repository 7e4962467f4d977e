pub mod descriptions;
pub mod import;
pub mod queries;

use log::info;
use mongodb::{Client, Database};

use crate::{config::Config, Result};

pub const DESCRIPTIONS: &str = "description_logements";
pub const INDICATORS: &str = "indicateurs_donnees_foncieres_around_rennes";
pub const GEOMETRIES: &str = "geometries_donnees_foncieres_around_rennes";
pub const CITIES: &str = "wikidata_cities_around_rennes";

pub async fn connect(config: &Config) -> Result<Database> {
    let client = Client::with_uri_str(&config.mongo_uri).await?;
    info!("Connected to MongoDB database {}", config.mongo_database);
    Ok(client.database(&config.mongo_database))
}
