use chrono::NaiveDateTime;
use log::{error, info};
use mongodb::{
    bson::{doc, Bson, DateTime, Document},
    Database,
};

use super::DESCRIPTIONS;
use crate::{
    etl::transform::CleanListing,
    models::listing::{SnapshotRow, COL_REFERENCE, COL_UPDATED},
};

const NOT_COMMUNICATED: &str = "NC";

/// Snapshot columns mirrored into the descriptions collection.
pub const MIRROR_COLUMNS: [&str; 15] = [
    "Type de bien",
    "Ville",
    "title",
    "short_description",
    "long_description",
    "Chauffage",
    "Exposition",
    "Parking / Garage",
    "Jardin / Terrain",
    "Balcon / Terrasse",
    "Accès Ascenseur",
    "Dépendance",
    "Proximité MétroBusGare SNCFGare RERCommercesEcolesEspaces verts",
    COL_REFERENCE,
    COL_UPDATED,
];

/// Blank values become "NC". The update date is stored as a BSON date.
pub fn description_document(row: &SnapshotRow, updated_at: Option<NaiveDateTime>) -> Document {
    let mut document = Document::new();
    for column in MIRROR_COLUMNS {
        let value = if column == COL_UPDATED {
            match updated_at {
                Some(at) => Bson::DateTime(DateTime::from_millis(at.and_utc().timestamp_millis())),
                None => Bson::String(NOT_COMMUNICATED.to_string()),
            }
        } else {
            Bson::String(row.get(column).unwrap_or(NOT_COMMUNICATED).to_string())
        };
        document.insert(column, value);
    }
    document
}

/// Upserts one document per listing, matched on its reference.
pub async fn mirror_descriptions(db: &Database, listings: &[(&SnapshotRow, CleanListing)]) -> usize {
    let collection = db.collection::<Document>(DESCRIPTIONS);
    let mut written = 0;

    for (row, listing) in listings {
        let document = description_document(row, listing.updated_at);
        let mut filter = Document::new();
        filter.insert(COL_REFERENCE, listing.reference.as_str());
        let result = collection
            .update_one(filter, doc! { "$set": document })
            .upsert(true)
            .await;

        match result {
            Ok(_) => written += 1,
            Err(e) => error!("Error while upserting listing {}: {:?}", listing.reference, e),
        }
    }

    info!("Upserted {}/{} descriptions", written, listings.len());
    written
}
