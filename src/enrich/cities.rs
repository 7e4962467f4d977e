use std::{collections::BTreeMap, fmt, path::Path};

use log::info;
use serde::Serialize;

use super::geo::{format_lat_lon, haversine_km, parse_lat_lon, parse_wkt_point, round2};
use crate::{
    archive::write_records,
    clients::wikidata::{CommuneBinding, Facility, Wikidata},
    config::Config,
    Result,
};

pub const CITY_COLUMNS: [&str; 10] = [
    "id",
    "name",
    "coordinates",
    "distance_to_rennes",
    "population",
    "area_km2",
    "density",
    "public_facilities",
    "total_public_facilities",
    "zone_type",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ZoneType {
    #[serde(rename = "Indéterminé")]
    Undetermined,
    #[serde(rename = "Urbaine")]
    Urban,
    #[serde(rename = "Périurbaine")]
    PeriUrban,
    #[serde(rename = "Rurale")]
    Rural,
}

impl ZoneType {
    pub fn classify(population: Option<i64>, density: Option<f64>, facilities: usize) -> ZoneType {
        let Some(population) = population else {
            return ZoneType::Undetermined;
        };
        let density = density.unwrap_or(0.0);

        if population > 50_000 || density > 1000.0 {
            ZoneType::Urban
        } else if population > 5_000 || density > 300.0 || facilities > 10 {
            ZoneType::PeriUrban
        } else {
            ZoneType::Rural
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneType::Undetermined => "Indéterminé",
            ZoneType::Urban => "Urbaine",
            ZoneType::PeriUrban => "Périurbaine",
            ZoneType::Rural => "Rurale",
        }
    }
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityRecord {
    pub id: String,
    pub name: String,
    pub coordinates: (f64, f64),
    pub distance_to_rennes: f64,
    pub population: Option<i64>,
    pub area_km2: Option<f64>,
    pub density: Option<f64>,
    pub public_facilities: BTreeMap<String, usize>,
    pub total_public_facilities: usize,
    pub zone_type: ZoneType,
}

impl CityRecord {
    /// `None` when the commune has no usable point or lies outside `radius_km`.
    pub fn from_binding(
        binding: &CommuneBinding,
        reference: (f64, f64),
        radius_km: f64,
    ) -> Option<CityRecord> {
        let coordinates = parse_wkt_point(&binding.coordinates)?;
        let distance = haversine_km(reference, coordinates);
        if distance > radius_km {
            return None;
        }

        let population = binding
            .population
            .as_deref()
            .and_then(|p| p.parse::<f64>().ok())
            .map(|p| p as i64);
        let area_km2 = binding.area.as_deref().and_then(|a| a.parse::<f64>().ok());
        let density = match (population, area_km2) {
            (Some(p), Some(a)) if p != 0 && a != 0.0 => Some(round2(p as f64 / a)),
            _ => None,
        };

        Some(CityRecord {
            id: binding.id.clone(),
            name: binding.name.clone(),
            coordinates,
            distance_to_rennes: round2(distance),
            population,
            area_km2,
            density,
            public_facilities: BTreeMap::new(),
            total_public_facilities: 0,
            zone_type: ZoneType::classify(population, density, 0),
        })
    }

    pub fn set_facilities(&mut self, facilities: &[Facility]) {
        self.public_facilities = count_facilities(facilities);
        self.total_public_facilities = facilities.len();
        self.zone_type = ZoneType::classify(self.population, self.density, facilities.len());
    }

    pub fn record(&self) -> Vec<String> {
        let optional = |v: Option<String>| v.unwrap_or_default();
        vec![
            self.id.clone(),
            self.name.clone(),
            format_lat_lon(self.coordinates),
            self.distance_to_rennes.to_string(),
            optional(self.population.map(|p| p.to_string())),
            optional(self.area_km2.map(|a| a.to_string())),
            optional(self.density.map(|d| d.to_string())),
            serde_json::to_string(&self.public_facilities).unwrap_or_else(|_| "{}".to_string()),
            self.total_public_facilities.to_string(),
            self.zone_type.to_string(),
        ]
    }
}

/// Number of facilities per type label.
pub fn count_facilities(facilities: &[Facility]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for facility in facilities {
        *counts.entry(facility.type_name.clone()).or_insert(0) += 1;
    }
    counts
}

/*
   Queries the communes of the five departments around the reference point,
   keeps those within the configured radius and attaches their facilities.
*/
pub async fn collect_cities(wikidata: &Wikidata, config: &Config) -> Vec<CityRecord> {
    let reference = (config.reference_latitude, config.reference_longitude);
    let communes = wikidata.communes().await;
    info!("Wikidata returned {} communes", communes.len());

    let mut cities: Vec<CityRecord> = communes
        .iter()
        .filter_map(|c| CityRecord::from_binding(c, reference, config.cities_radius_km))
        .collect();
    info!(
        "{} communes within {} km",
        cities.len(),
        config.cities_radius_km
    );

    for city in cities.iter_mut() {
        info!("Fetching public facilities of {}", city.name);
        let facilities = wikidata.facilities(&city.id).await;
        city.set_facilities(&facilities);
    }

    cities
}

pub fn write_cities_csv(path: &Path, cities: &[CityRecord]) -> Result<()> {
    let headers: Vec<String> = CITY_COLUMNS.iter().map(|c| c.to_string()).collect();
    let rows: Vec<Vec<String>> = cities.iter().map(CityRecord::record).collect();
    write_records(path, &headers, &rows)?;
    info!("Saved {} cities to {}", cities.len(), path.display());
    Ok(())
}

/// `(name, (lat, lon))` of every row of a cities CSV with readable coordinates.
pub fn read_city_points(path: &Path) -> Result<Vec<(String, (f64, f64))>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let name = headers.iter().position(|h| h == "name");
    let coordinates = headers.iter().position(|h| h == "coordinates");

    let (Some(name), Some(coordinates)) = (name, coordinates) else {
        return Ok(Vec::new());
    };

    let mut points = Vec::new();
    for record in reader.records() {
        let record = record?;
        let point = record.get(coordinates).and_then(parse_lat_lon);
        if let (Some(city), Some(point)) = (record.get(name), point) {
            points.push((city.to_string(), point));
        }
    }
    Ok(points)
}
