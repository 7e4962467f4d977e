use std::sync::Arc;

use chrono::Local;
use log::info;

use crate::{
    archive::{self, LINKS_PREFIX},
    config::Config,
    paruvendu::{links::clean_listing_links, paruvendu::ParuVendu},
};

pub async fn scrape_links(config: Arc<Config>) -> anyhow::Result<()> {
    let scraper = ParuVendu::new(config.clone())?;
    let links = scraper.collect_listing_links().await?;

    archive::write_links_archive(
        &config.links_dir(),
        &config.city,
        &links,
        Local::now().naive_local(),
    )?;
    Ok(())
}

/*
   Loads the newest links archive of the configured city, scrapes every
   listing and saves them as a CSV snapshot plus a JSON copy.
*/
pub async fn scrape_listings(config: Arc<Config>) -> anyhow::Result<()> {
    let links_path = archive::latest_archive(&config.links_dir(), LINKS_PREFIX, &config.city, "txt")?;
    let links = clean_listing_links(&archive::read_links_archive(&links_path)?);
    info!("{} listing links to scrape from {}", links.len(), links_path.display());

    let scraper = ParuVendu::new(config.clone())?;
    let listings = scraper.scrape_listings(&links).await;

    let snapshot = config
        .snapshots_dir()
        .join(archive::snapshot_name(&config.city, Local::now().naive_local()));
    archive::write_snapshot(&snapshot, &listings)?;
    archive::write_json(&config.listings_json(), &listings)?;
    Ok(())
}
