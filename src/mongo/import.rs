use std::path::{Path, PathBuf};

use csv::StringRecord;
use log::{error, info, warn};
use mongodb::{
    bson::{doc, to_bson, Bson, DateTime, Document},
    Database, IndexModel,
};
use serde_json::Value;

use crate::{enrich::geo::parse_lat_lon, Result};

pub const BATCH_SIZE: usize = 1000;
pub const INDEXED_FIELDS: [&str; 3] = ["name", "code_insee", "postal_code"];

const COORDINATES: &str = "coordinates";
const FACILITIES: &str = "public_facilities";
const GEOMETRY: &str = "geometry";
const GEOMETRY_COORDINATES: &str = "geometry.coordinates";

/// One CSV file to load into one collection.
#[derive(Debug, Clone)]
pub struct ImportJob {
    pub csv_path: PathBuf,
    pub collection: String,
    pub replace_existing: bool,
}

/// Numbers and booleans are typed, blanks become null, anything else stays text.
pub fn infer_value(raw: &str) -> Bson {
    let value = raw.trim();
    if value.is_empty() {
        return Bson::Null;
    }
    if let Ok(n) = value.parse::<i64>() {
        return Bson::Int64(n);
    }
    if let Ok(x) = value.parse::<f64>() {
        if x.is_finite() {
            return Bson::Double(x);
        }
    }
    match value {
        "True" | "true" => Bson::Boolean(true),
        "False" | "false" => Bson::Boolean(false),
        _ => Bson::String(raw.to_string()),
    }
}

/// `"(lat, lon)"` -> `[lat, lon]`
pub fn parse_coordinates(raw: &str) -> Option<Bson> {
    let (lat, lon) = parse_lat_lon(raw)?;
    Some(Bson::Array(vec![Bson::Double(lat), Bson::Double(lon)]))
}

/// Facility counts written either as JSON or with single quotes.
pub fn parse_facilities(raw: &str) -> Document {
    if raw.trim().is_empty() {
        return Document::new();
    }
    let parsed = serde_json::from_str::<Value>(raw)
        .or_else(|_| serde_json::from_str::<Value>(&raw.replace('\'', "\"")));

    match parsed.ok().map(|v| to_bson(&v)) {
        Some(Ok(Bson::Document(document))) => document,
        _ => {
            warn!("Unreadable facilities: {:.30}", raw);
            Document::new()
        }
    }
}

fn depth(value: &Value) -> usize {
    match value {
        Value::Array(items) => 1 + items.first().map_or(0, depth),
        _ => 0,
    }
}

fn close_ring(ring: &mut Value) {
    let Value::Array(points) = ring else {
        return;
    };
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        if first != last {
            let first = first.clone();
            points.push(first);
        }
    }
}

/// Polygons of a `geometry.coordinates` cell with every ring closed. A single
/// polygon is wrapped so the result is always a list of polygons.
pub fn parse_polygons(raw: &str) -> Option<Vec<Value>> {
    let value: Value = serde_json::from_str(raw.trim()).ok()?;
    let mut polygons = match depth(&value) {
        4 => match value {
            Value::Array(polygons) => polygons,
            _ => return None,
        },
        3 => vec![value],
        _ => {
            warn!("Invalid polygon coordinates: {:.100}", raw);
            return None;
        }
    };

    for polygon in polygons.iter_mut() {
        if let Value::Array(rings) = polygon {
            rings.iter_mut().for_each(close_ring);
        }
    }
    Some(polygons)
}

/// GeoJSON geometry: `Polygon` for one polygon, `MultiPolygon` otherwise.
pub fn geometry(polygons: &[Value]) -> Option<Document> {
    let (kind, coordinates) = match polygons {
        [] => return None,
        [single] => ("Polygon", to_bson(single).ok()?),
        many => ("MultiPolygon", to_bson(many).ok()?),
    };
    Some(doc! { "type": kind, "coordinates": coordinates })
}

pub fn row_document(
    headers: &StringRecord,
    record: &StringRecord,
    source_file: &str,
    imported_at: DateTime,
) -> Document {
    let mut document = Document::new();

    for (column, raw) in headers.iter().zip(record.iter()) {
        match column {
            "" => continue,
            COORDINATES => {
                document.insert(column, parse_coordinates(raw).unwrap_or(Bson::Null));
            }
            FACILITIES => {
                document.insert(column, parse_facilities(raw));
            }
            GEOMETRY_COORDINATES => {
                let polygons = parse_polygons(raw);
                let shape = polygons.as_deref().and_then(geometry);
                let coordinates = polygons
                    .and_then(|p| to_bson(&p).ok())
                    .unwrap_or(Bson::Null);
                document.insert(column, coordinates);
                document.insert(GEOMETRY, shape.map(Bson::Document).unwrap_or(Bson::Null));
            }
            _ => {
                document.insert(column, infer_value(raw));
            }
        }
    }

    document.insert("import_timestamp", imported_at);
    document.insert("source_file", source_file);
    document
}

/// Header row and one document per record of a CSV file.
pub fn read_documents(path: &Path, imported_at: DateTime) -> Result<(Vec<String>, Vec<Document>)> {
    let source_file = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let mut documents = Vec::new();
    for record in reader.records() {
        documents.push(row_document(&headers, &record?, &source_file, imported_at));
    }

    Ok((headers.iter().map(str::to_string).collect(), documents))
}

async fn try_import(db: &Database, job: &ImportJob) -> Result<usize> {
    let (columns, documents) = read_documents(&job.csv_path, DateTime::now())?;
    info!(
        "Read {} rows with columns {:?} from {}",
        documents.len(),
        columns,
        job.csv_path.display()
    );

    let collection = db.collection::<Document>(&job.collection);
    if db.list_collection_names().await?.contains(&job.collection) {
        if job.replace_existing {
            info!("Deleting existing documents of {}", job.collection);
            collection.delete_many(doc! {}).await?;
        } else {
            info!("Collection {} exists, appending", job.collection);
        }
    }

    if documents.is_empty() {
        warn!("Nothing to insert into {}", job.collection);
        return Ok(0);
    }

    let mut inserted = 0;
    for (i, batch) in documents.chunks(BATCH_SIZE).enumerate() {
        let result = collection.insert_many(batch).await?;
        inserted += result.inserted_ids.len();
        info!("Batch {}: {} documents inserted", i + 1, result.inserted_ids.len());
    }

    if columns.iter().any(|c| c == COORDINATES) {
        let mut keys = Document::new();
        keys.insert(COORDINATES, "2d");
        collection
            .create_index(IndexModel::builder().keys(keys).build())
            .await?;
    }
    for field in INDEXED_FIELDS {
        if columns.iter().any(|c| c == field) {
            let mut keys = Document::new();
            keys.insert(field, 1);
            collection
                .create_index(IndexModel::builder().keys(keys).build())
                .await?;
        }
    }

    Ok(inserted)
}

/// Loads `job` and reports how many documents were inserted, 0 on failure.
pub async fn import_csv(db: &Database, job: &ImportJob) -> usize {
    match try_import(db, job).await {
        Ok(n) => {
            info!("Import into {} finished, {} documents inserted", job.collection, n);
            n
        }
        Err(e) => {
            error!("Error while importing {}: {}", job.csv_path.display(), e);
            0
        }
    }
}
