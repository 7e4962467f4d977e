use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// Snapshot CSV column names
pub const COL_KIND: &str = "Type de bien";
pub const COL_CITY: &str = "Ville";
pub const COL_POSTAL_CODE: &str = "Code postal";
pub const COL_TITLE: &str = "title";
pub const COL_SHORT_DESCRIPTION: &str = "short_description";
pub const COL_LONG_DESCRIPTION: &str = "long_description";
pub const COL_LINK: &str = "lien du logement";
pub const COL_PRICE: &str = "prix";
pub const COL_ROOMS: &str = "nombre de pièces";
pub const COL_BEDROOMS: &str = "nombre de chambres";
pub const COL_LIVING_SURFACE: &str = "surface habitable";
pub const COL_LAND_SURFACE: &str = "surface terrain";
pub const COL_ANNEXES: &str = "Annexes";
pub const COL_OUTBUILDINGS: &str = "Dépendance";
pub const COL_REFERENCE: &str = "Réf. annonce";
pub const COL_UPDATED: &str = "Mise à jour";
pub const COL_FLOOR: &str = "Etage";
pub const COL_DPE_LABEL: &str = "étiquette DPE";
pub const COL_ENERGY: &str = "consommation énergétique";
pub const COL_GES_LABEL: &str = "étiquette GPE";
pub const COL_EMISSION: &str = "émission GPE";
pub const COL_DPE_DATE: &str = "date du bilan DPE";
pub const COL_ADVERTISER: &str = "nom_annonceur";
pub const COL_ADVERTISER_LINK: &str = "lien de l'annonceur";
pub const COL_ADVERTISER_CITY: &str = "ville de l'annonceur";

pub const AD_COLUMNS: [&str; 7] = [
    COL_KIND,
    COL_CITY,
    COL_POSTAL_CODE,
    COL_TITLE,
    COL_SHORT_DESCRIPTION,
    COL_LONG_DESCRIPTION,
    COL_LINK,
];

pub const DPE_COLUMNS: [&str; 5] = [
    COL_DPE_LABEL,
    COL_ENERGY,
    COL_GES_LABEL,
    COL_EMISSION,
    COL_DPE_DATE,
];

pub const ADVERTISER_COLUMNS: [&str; 3] = [COL_ADVERTISER, COL_ADVERTISER_LINK, COL_ADVERTISER_CITY];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    #[default]
    Appartement,
    Maison,
}

impl PropertyKind {
    pub fn from_link(link: &str) -> PropertyKind {
        if link.contains("maison") {
            PropertyKind::Maison
        } else {
            PropertyKind::Appartement
        }
    }

    pub fn parse(value: &str) -> Option<PropertyKind> {
        match value.trim() {
            "appartement" => Some(PropertyKind::Appartement),
            "maison" => Some(PropertyKind::Maison),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKind::Appartement => "appartement",
            PropertyKind::Maison => "maison",
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Advertiser {
    pub name: String,
    pub link: String,
    pub city: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyDiagnostic {
    pub dpe_label: String,
    pub consumption: String,
    pub ges_label: String,
    pub emission: String,
    pub date: String,
}

/// One listing detail page, every value kept as scraped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawListing {
    pub kind: PropertyKind,
    pub link: String,
    pub title: String,
    pub short_description: String,
    pub long_description: String,
    pub city: String,
    pub postal_code: String,
    /// Criteria in page order: price, rooms, surfaces, "Général" pairs, reference...
    pub fields: Vec<(String, String)>,
    /// Amenities shown as bare list items
    pub flags: Vec<String>,
    pub advertiser: Advertiser,
    pub dpe: EnergyDiagnostic,
}

impl RawListing {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_field(&mut self, name: &str, value: String) {
        match self.fields.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }
}

/// A row of a listings snapshot CSV, keyed by header.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct SnapshotRow(pub HashMap<String, String>);

impl SnapshotRow {
    pub fn from_pairs<K: Into<String>, V: Into<String>>(
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> SnapshotRow {
        SnapshotRow(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Trimmed value of `column`, `None` when absent or blank.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.0
            .get(column)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn get_or_empty(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }
}
