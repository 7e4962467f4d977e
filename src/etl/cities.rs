use std::collections::HashSet;

use serde::Serialize;

/// Advertiser link slugs that are truncated commune names.
const CITY_CORRECTIONS: [(&str, &str); 3] = [
    ("crioult", "st germain du crioult"),
    ("gregoire", "st gregoire"),
    ("pompadour", "arnac pompadour"),
];

/// Communes the postal reference does not resolve under their slug name.
const MANUAL_POSTAL_CODES: [(&str, &str); 5] = [
    ("st germain du crioult", "14110"),
    ("lez", "31440"),
    ("guipry", "35480"),
    ("lamballe", "22400"),
    ("perret", "22570"),
];

pub fn correct_city_name(name: &str) -> String {
    CITY_CORRECTIONS
        .iter()
        .find(|(slug, _)| *slug == name)
        .map(|(_, corrected)| corrected.to_string())
        .unwrap_or_else(|| name.to_string())
}

pub fn manual_postal_code(name: &str) -> Option<&'static str> {
    MANUAL_POSTAL_CODES
        .iter()
        .find(|(city, _)| *city == name)
        .map(|(_, code)| *code)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityRow {
    pub id_locale: i32,
    pub nom: String,
    pub code_postal: String,
}

#[derive(Debug, Clone, Default)]
pub struct CityTable {
    rows: Vec<CityRow>,
}

impl CityTable {
    /// `listing_cities` are (name, postal code) pairs in row order. Advertiser
    /// cities not already present get their postal code from `lookup`, then
    /// from the manual table, else an empty code.
    pub fn build<F>(listing_cities: &[(String, String)], advertiser_cities: &[String], lookup: F) -> CityTable
    where
        F: Fn(&str) -> Option<String>,
    {
        let listing_names: HashSet<&str> = listing_cities.iter().map(|(n, _)| n.as_str()).collect();

        let mut candidates: Vec<(String, String)> = listing_cities.to_vec();

        let mut seen_advertiser: HashSet<String> = HashSet::new();
        for raw in advertiser_cities {
            let name = correct_city_name(raw.trim());
            if name.is_empty() || listing_names.contains(name.as_str()) {
                continue;
            }
            if !seen_advertiser.insert(name.clone()) {
                continue;
            }
            let postal_code = lookup(&name)
                .or_else(|| manual_postal_code(&name).map(str::to_string))
                .unwrap_or_default();
            candidates.push((name, postal_code));
        }

        let mut seen: HashSet<(String, String)> = HashSet::new();
        let rows = candidates
            .into_iter()
            .filter(|pair| seen.insert(pair.clone()))
            .enumerate()
            .map(|(index, (nom, code_postal))| CityRow {
                id_locale: index as i32,
                nom,
                code_postal,
            })
            .collect();

        CityTable { rows }
    }

    /// First row carrying exactly `name`.
    pub fn id_for(&self, name: &str) -> Option<i32> {
        self.rows
            .iter()
            .find(|row| row.nom == name)
            .map(|row| row.id_locale)
    }

    pub fn rows(&self) -> &[CityRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
