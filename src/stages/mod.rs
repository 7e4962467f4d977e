//! One entry point per pipeline stage. Each stage runs to completion and
//! leaves its output on disk or in a database for the next one.

mod enrich;
mod load;
mod scrape;

pub use enrich::{enrich_cities, foncier};
pub use load::{import_mongo, load_mysql, mirror_mongo, read_table};
pub use scrape::{scrape_links, scrape_listings};
