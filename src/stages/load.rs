use std::{path::PathBuf, sync::Arc};

use colored::Colorize;
use log::{info, warn};

use crate::{
    archive::{self, SNAPSHOT_PREFIX},
    clients::{reference::CommuneReference, retry::RetryFetch},
    config::Config,
    db::{self, insert, tables},
    etl::transform::{build_batch, clean_snapshot, clean_snapshot_with_rows},
    mongo::{
        self,
        descriptions::mirror_descriptions,
        import::{import_csv, ImportJob},
    },
};

fn snapshot_path(config: &Config, snapshot: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    Ok(match snapshot {
        Some(path) => path,
        None => archive::latest_archive(&config.snapshots_dir(), SNAPSHOT_PREFIX, &config.city, "csv")?,
    })
}

/*
   Cleans a snapshot and inserts every table, each in its own transaction.
   Without the postal code reference, advertiser-only cities fall back to the
   manual corrections.
*/
pub async fn load_mysql(config: Arc<Config>, snapshot: Option<PathBuf>) -> anyhow::Result<()> {
    let path = snapshot_path(&config, snapshot)?;
    info!("Loading snapshot {}", path.display());
    let rows = archive::read_snapshot(&path)?;
    let listings = clean_snapshot(&rows);

    let fetch = RetryFetch::new(&config)?;
    let reference = match CommuneReference::download(&fetch, &config.postal_codes_url).await {
        Ok(reference) => reference,
        Err(e) => {
            warn!("Postal code reference unavailable: {}", e);
            CommuneReference::default()
        }
    };
    let batch = build_batch(&listings, |city| reference.postal_code_for_label(city));

    let mut conn = db::establish_connection(&config).await?;
    insert::insert_villes(&mut conn, &batch.villes).await;
    insert::insert_agences(&mut conn, &batch.agences).await;
    insert::insert_appartements(&mut conn, &batch.appartements).await;
    insert::insert_maisons(&mut conn, &batch.maisons).await;
    insert::insert_appartement_agences(&mut conn, &batch.appartement_agences).await;
    insert::insert_maison_agences(&mut conn, &batch.maison_agences).await;
    Ok(())
}

pub async fn mirror_mongo(config: Arc<Config>, snapshot: Option<PathBuf>) -> anyhow::Result<()> {
    let path = snapshot_path(&config, snapshot)?;
    let rows = archive::read_snapshot(&path)?;
    let listings = clean_snapshot_with_rows(&rows);

    let database = mongo::connect(&config).await?;
    mirror_descriptions(&database, &listings).await;
    Ok(())
}

pub async fn import_mongo(config: Arc<Config>, replace_existing: bool) -> anyhow::Result<()> {
    let jobs = [
        (&config.cities_csv, mongo::CITIES),
        (&config.indicators_csv, mongo::INDICATORS),
        (&config.geometries_csv, mongo::GEOMETRIES),
    ]
    .map(|(csv, collection)| ImportJob {
        csv_path: config.path(csv),
        collection: collection.to_string(),
        replace_existing,
    });

    let database = mongo::connect(&config).await?;
    info!("Importing {} CSV files", jobs.len());

    let mut results = Vec::with_capacity(jobs.len());
    for job in &jobs {
        results.push((job, import_csv(&database, job).await));
    }

    for (job, imported) in results {
        if imported > 0 {
            info!(
                "{} -> {}: {} documents imported",
                job.csv_path.display(),
                job.collection,
                imported
            );
        } else {
            warn!("{} -> {}: import failed", job.csv_path.display(), job.collection);
        }
    }
    Ok(())
}

pub async fn read_table(config: Arc<Config>, table: &str) -> anyhow::Result<()> {
    let mut conn = db::establish_connection(&config).await?;
    let rows = tables::read_table(&mut conn, table).await?;
    println!("{}", format!("== {} ==", table).bold());
    for row in &rows {
        println!("{}", row);
    }
    if rows.is_empty() {
        println!("{}", "(empty)".dimmed());
    }
    info!("{} rows in {}", rows.len(), table);
    Ok(())
}
