use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::error;

use immo::{
    config::{self, Config},
    logger::setup_logger,
    mongo,
    services::store::{MongoStore, MysqlStore},
    stages,
    web::{start_http_server, AppState},
};

#[derive(Parser)]
#[command(name = "immo", version, about = "Real-estate listings pipeline for the Rennes area")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Collect listing links and write a links archive
    ScrapeLinks,
    /// Scrape every listing of the latest links archive into a CSV snapshot
    ScrapeListings,
    /// Query Wikidata for the communes around the reference point
    EnrichCities,
    /// Fetch DV3F indicators and geomutations from the Cerema API
    Foncier,
    /// Clean a snapshot and insert it into MySQL
    LoadMysql {
        /// Snapshot to load, the latest one by default
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Upsert listing descriptions into MongoDB
    MirrorMongo {
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Import the enrichment CSV files into MongoDB
    ImportMongo {
        /// Empty existing collections first
        #[arg(long)]
        replace: bool,
    },
    /// Serve the REST API
    Serve,
    /// Print every row of a MySQL table
    ReadTable { table: String },
}

async fn run(command: Command, config: Arc<Config>) -> Result<()> {
    match command {
        Command::ScrapeLinks => stages::scrape_links(config).await,
        Command::ScrapeListings => stages::scrape_listings(config).await,
        Command::EnrichCities => stages::enrich_cities(config).await,
        Command::Foncier => stages::foncier(config).await,
        Command::LoadMysql { snapshot } => stages::load_mysql(config, snapshot).await,
        Command::MirrorMongo { snapshot } => stages::mirror_mongo(config, snapshot).await,
        Command::ImportMongo { replace } => stages::import_mongo(config, replace).await,
        Command::ReadTable { table } => stages::read_table(config, &table).await,
        Command::Serve => {
            let database = mongo::connect(&config).await?;
            let state = AppState {
                listings: Arc::new(MysqlStore::new(config.clone())),
                documents: Arc::new(MongoStore::new(database)),
                config,
            };
            start_http_server(state).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, source) = config::read_config()?;
    let config: Arc<Config> = Arc::new(config);

    // Initialize logger
    setup_logger(&config)?;
    source.log();

    if let Err(err) = run(cli.command, config).await {
        error!("Error: {:?}", err);
        return Err(err);
    }

    Ok(())
}
