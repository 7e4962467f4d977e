use std::{sync::Arc, time::Duration};

use log::{error, info};
use rand::Rng;
use tokio::time::sleep;

use super::{
    links::{collect_new, extract_hrefs},
    parse::parse_listing,
};
use crate::{clients::retry::RetryFetch, config::Config, models::listing::RawListing, Result};

pub struct ParuVendu {
    fetch: RetryFetch,
    config: Arc<Config>,
}

impl ParuVendu {
    pub fn new(config: Arc<Config>) -> Result<ParuVendu> {
        Ok(ParuVendu {
            fetch: RetryFetch::new(&config)?,
            config,
        })
    }

    async fn hrefs(&self, url: &str) -> Result<Vec<String>> {
        let html = self.fetch.get_text(url).await?;
        extract_hrefs(&html, url)
    }

    fn page_delay(&self) -> Duration {
        Duration::from_secs(self.config.page_delay_seconds)
    }

    /*
       Walks the search result pages of the configured city and gathers the
       listing links found on each of them.
    */
    pub async fn collect_listing_links(&self) -> Result<Vec<String>> {
        let search_prefix = self.config.search_url();
        let listing_prefix = &self.config.listing_url_prefix;

        let mut page_links: Vec<String> = Vec::new();
        let mut listing_links: Vec<String> = Vec::new();
        let mut nb_page = 1;

        let first = self.hrefs(&self.config.search_page_url(1)).await?;
        let mut found = collect_new(&mut page_links, &first, &search_prefix);

        while found > 0 {
            sleep(self.page_delay()).await;
            for i in 0..found {
                sleep(self.page_delay()).await;
                let page_url = page_links[i + nb_page - 1].clone();
                match self.hrefs(&page_url).await {
                    Ok(hrefs) => {
                        let added = collect_new(&mut listing_links, &hrefs, listing_prefix);
                        info!("{} new listing links on {}", added, page_url);
                    }
                    Err(e) => error!("Error while fetching result page {}: {}", page_url, e),
                }
            }

            nb_page += found;
            sleep(self.page_delay()).await;
            let next_url = self.config.search_page_url(nb_page);
            found = match self.hrefs(&next_url).await {
                Ok(hrefs) => collect_new(&mut page_links, &hrefs, &search_prefix),
                Err(e) => {
                    error!("Error while fetching search page {}: {}", next_url, e);
                    0
                }
            };
        }

        info!(
            "Collected {} result pages and {} listing links",
            page_links.len(),
            listing_links.len()
        );
        Ok(listing_links)
    }

    async fn scrape_one(&self, link: &str) -> Result<RawListing> {
        let html = self.fetch.get_text(link).await?;
        parse_listing(&html, link)
    }

    /*
       Fetches every listing page, in batches with a pause between batches.
       Pages that fail to load are logged and left out.
    */
    pub async fn scrape_listings(&self, links: &[String]) -> Vec<RawListing> {
        let batch_size = self.config.batch_size.max(1);
        let mut listings = Vec::with_capacity(links.len());

        for (batch_index, batch) in links.chunks(batch_size).enumerate() {
            if batch.len() == batch_size {
                sleep(Duration::from_secs(self.config.batch_delay_seconds)).await;
            }
            info!(
                "Scraping batch {} ({} listings)",
                batch_index + 1,
                batch.len()
            );

            for link in batch {
                sleep(Duration::from_secs(self.config.listing_delay_seconds)).await;
                if self.config.listing_delay_seconds > 0 {
                    let jitter = rand::thread_rng().gen_range(1000..2000);
                    sleep(Duration::from_millis(jitter)).await;
                }

                match self.scrape_one(link).await {
                    Ok(listing) => listings.push(listing),
                    Err(e) => error!("Error while scraping {}: {}", link, e),
                }
            }
        }

        info!("Scraped {}/{} listings", listings.len(), links.len());
        listings
    }
}
