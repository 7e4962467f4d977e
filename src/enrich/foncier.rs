use std::{path::Path, time::Duration};

use log::{info, warn};
use serde::Deserialize;
use serde_json::{Map, Value};
use serde_this_or_that::as_i64;
use tokio::time::sleep;

use super::geo::haversine_km;
use crate::{archive::write_records, clients::cerema::Cerema, clients::reference::CommuneReference, Result};

pub type Row = Map<String, Value>;

pub const CODE_INSEE: &str = "code_insee";

/// DV3F indicator keys and the column each one is saved under.
pub const COLUMN_MAPPING: [(&str, &str); 50] = [
    ("annee", "annee_mutation"),
    ("codgeo", "code_geo"),
    ("libgeo", "libelle_geo"),
    ("nbtrans_cod1", "nombre_transactions_cod1"),
    ("valeurfonc_sum_cod1", "valeur_fonciere_sum_cod1"),
    ("nbtrans_cod2", "nombre_transactions_cod2"),
    ("valeurfonc_sum_cod2", "valeur_fonciere_sum_cod2"),
    ("nbtrans_cod11", "nombre_transactions_cod11"),
    ("valeurfonc_sum_cod11", "valeur_fonciere_sum_cod11"),
    ("nbtrans_cod111", "nombre_transactions_cod111"),
    ("valeurfonc_sum_cod111", "valeur_fonciere_sum_cod111"),
    ("valeurfonc_q25_cod111", "valeur_fonciere_q25_cod111"),
    ("valeurfonc_median_cod111", "valeur_fonciere_median_cod111"),
    ("valeurfonc_q75_cod111", "valeur_fonciere_q75_cod111"),
    ("pxm2_q25_cod111", "prix_m2_q25_cod111"),
    ("pxm2_median_cod111", "prix_m2_median_cod111"),
    ("pxm2_q75_cod111", "prix_m2_q75_cod111"),
    ("sbati_sum_cod111", "surface_batie_sum_cod111"),
    ("sbati_median_cod111", "surface_batie_median_cod111"),
    ("nbtrans_cod1111", "nombre_transactions_cod1111"),
    ("valeurfonc_sum_cod1111", "valeur_fonciere_sum_cod1111"),
    ("valeurfonc_q25_cod1111", "valeur_fonciere_q25_cod1111"),
    ("valeurfonc_median_cod1111", "valeur_fonciere_median_cod1111"),
    ("valeurfonc_q75_cod1111", "valeur_fonciere_q75_cod1111"),
    ("pxm2_q25_cod1111", "prix_m2_q25_cod1111"),
    ("pxm2_median_cod1111", "prix_m2_median_cod1111"),
    ("pxm2_q75_cod1111", "prix_m2_q75_cod1111"),
    ("sbati_sum_cod1111", "surface_batie_sum_cod1111"),
    ("sbati_median_cod1111", "surface_batie_median_cod1111"),
    ("nbtrans_cod1112", "nombre_transactions_cod1112"),
    ("valeurfonc_sum_cod1112", "valeur_fonciere_sum_cod1112"),
    ("valeurfonc_q25_cod1112", "valeur_fonciere_q25_cod1112"),
    ("valeurfonc_median_cod1112", "valeur_fonciere_median_cod1112"),
    ("valeurfonc_q75_cod1112", "valeur_fonciere_q75_cod1112"),
    ("pxm2_q25_cod1112", "prix_m2_q25_cod1112"),
    ("pxm2_median_cod1112", "prix_m2_median_cod1112"),
    ("pxm2_q75_cod1112", "prix_m2_q75_cod1112"),
    ("sbati_sum_cod1112", "surface_batie_sum_cod1112"),
    ("sbati_median_cod1112", "surface_batie_median_cod1112"),
    ("nbtrans_cod1113", "nombre_transactions_cod1113"),
    ("valeurfonc_sum_cod1113", "valeur_fonciere_sum_cod1113"),
    ("valeurfonc_q25_cod1113", "valeur_fonciere_q25_cod1113"),
    ("valeurfonc_median_cod1113", "valeur_fonciere_median_cod1113"),
    ("valeurfonc_q75_cod1113", "valeur_fonciere_q75_cod1113"),
    ("pxm2_q25_cod1113", "prix_m2_q25_cod1113"),
    ("pxm2_median_cod1113", "prix_m2_median_cod1113"),
    ("pxm2_q75_cod1113", "prix_m2_q75_cod1113"),
    ("sbati_sum_cod1113", "surface_batie_sum_cod1113"),
    ("sbati_median_cod1113", "surface_batie_median_cod1113"),
    ("nbtrans_mp1", "nombre_transactions_mp1"),
];

/// Geomutation columns left out of the geometries CSV.
pub const DROPPED_GEO_COLUMNS: [&str; 4] = [
    "type",
    "geometry.type",
    "properties.idmutinvar",
    "properties.idopendata",
];

#[derive(Deserialize)]
struct Year {
    #[serde(deserialize_with = "as_i64")]
    annee: i64,
}

/// Year of an indicator entry, the API sends it either as a number or a string.
fn entry_year(entry: &Row) -> Option<Option<i64>> {
    let Some(value) = entry.get("annee") else {
        return Some(None);
    };
    let mut holder = Map::new();
    holder.insert("annee".to_string(), value.clone());
    serde_json::from_value::<Year>(Value::Object(holder))
        .ok()
        .map(|y| Some(y.annee))
}

/// INSEE codes of the communes of `cities` lying within `radius_km`.
pub fn select_communes(
    cities: &[(String, (f64, f64))],
    reference: (f64, f64),
    radius_km: f64,
    insee: &CommuneReference,
) -> Vec<String> {
    cities
        .iter()
        .filter(|(_, point)| haversine_km(reference, *point) <= radius_km)
        .filter_map(|(name, _)| insee.insee_code_for_name(name))
        .collect()
}

/*
   Turns one indicators page into rows: each `results` entry tagged with the
   commune code, renamed through COLUMN_MAPPING and reduced to mapped columns.
   Entries outside [year_from, year_to] are dropped, entries without a year kept.
*/
pub fn map_results(code_insee: &str, page: &Value, year_from: i64, year_to: i64) -> Vec<Row> {
    let Some(results) = page.get("results").and_then(Value::as_array) else {
        warn!("No results for commune {}", code_insee);
        return Vec::new();
    };

    results
        .iter()
        .filter_map(Value::as_object)
        .filter(|entry| match entry_year(entry) {
            Some(Some(year)) => (year_from..=year_to).contains(&year),
            Some(None) => true,
            None => false,
        })
        .map(|entry| {
            let mut row = Row::new();
            row.insert(CODE_INSEE.to_string(), Value::String(code_insee.to_string()));
            for (source, target) in COLUMN_MAPPING {
                if let Some(value) = entry.get(source) {
                    row.insert(target.to_string(), value.clone());
                }
            }
            row
        })
        .collect()
}

fn flatten_into(prefix: &str, value: &Value, row: &mut Row) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(&path, inner, row);
            }
        }
        other => {
            row.insert(prefix.to_string(), other.clone());
        }
    }
}

/// One flat row per GeoJSON feature, nested keys joined with '.'.
pub fn flatten_features(collection: &Value) -> Vec<Row> {
    let Some(features) = collection.get("features").and_then(Value::as_array) else {
        warn!("No features in geomutations response");
        return Vec::new();
    };

    features
        .iter()
        .map(|feature| {
            let mut row = Row::new();
            flatten_into("", feature, &mut row);
            for column in DROPPED_GEO_COLUMNS {
                row.remove(column);
            }
            row
        })
        .collect()
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Column order: `preferred` first when present, then any other key in first-seen order.
pub fn to_table(rows: &[Row], preferred: &[&str]) -> (Vec<String>, Vec<Vec<String>>) {
    let mut headers: Vec<String> = preferred
        .iter()
        .filter(|column| rows.iter().any(|row| row.contains_key(**column)))
        .map(|column| column.to_string())
        .collect();
    for row in rows {
        for key in row.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let records = rows
        .iter()
        .map(|row| headers.iter().map(|h| cell(row.get(h))).collect())
        .collect();
    (headers, records)
}

pub fn indicator_columns() -> Vec<&'static str> {
    std::iter::once(CODE_INSEE)
        .chain(COLUMN_MAPPING.iter().map(|(_, target)| *target))
        .collect()
}

pub async fn fetch_indicators(
    cerema: &Cerema,
    codes: &[String],
    year_from: i64,
    year_to: i64,
    delay: Duration,
) -> Vec<Row> {
    let mut rows = Vec::new();
    for code in codes {
        info!("Fetching land indicators of commune {}", code);
        match cerema.indicators(code).await {
            Ok(page) => rows.extend(map_results(code, &page, year_from, year_to)),
            Err(e) => warn!("Skipping commune {}: {}", code, e),
        }
        sleep(delay).await;
    }
    info!("Collected {} indicator rows for {} communes", rows.len(), codes.len());
    rows
}

pub async fn fetch_geomutations(cerema: &Cerema, url: &str) -> Vec<Row> {
    match cerema.geomutations(url).await {
        Ok(collection) => flatten_features(&collection),
        Err(e) => {
            warn!("Error while fetching geomutations: {}", e);
            Vec::new()
        }
    }
}

pub fn write_rows(path: &Path, rows: &[Row], preferred: &[&str]) -> Result<()> {
    let (headers, records) = to_table(rows, preferred);
    write_records(path, &headers, &records)?;
    info!("Saved {} rows to {}", records.len(), path.display());
    Ok(())
}
