use csv::{ReaderBuilder, StringRecord};
use log::info;

use super::retry::RetryFetch;
use crate::Result;

const INSEE_CODE: &str = "#Code_commune_INSEE";
const COMMUNE_NAME: &str = "Nom_de_la_commune";
const POSTAL_CODE: &str = "Code_postal";
const DELIVERY_LABEL: &str = "Libellé_d_acheminement";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommuneEntry {
    pub insee_code: String,
    pub name: String,
    pub postal_code: String,
    pub label: String,
}

/// National commune / postal code table published on data.gouv.fr.
#[derive(Debug, Clone, Default)]
pub struct CommuneReference {
    entries: Vec<CommuneEntry>,
}

fn column(headers: &StringRecord, name: &str, fallback: usize) -> usize {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .unwrap_or(fallback)
}

impl CommuneReference {
    pub async fn download(fetch: &RetryFetch, url: &str) -> Result<CommuneReference> {
        let bytes = fetch.get_bytes(url).await?;
        let reference = CommuneReference::from_latin1(&bytes)?;
        info!("Loaded {} communes from {}", reference.len(), url);
        Ok(reference)
    }

    /// The file is ';' separated and latin-1 encoded.
    pub fn from_latin1(bytes: &[u8]) -> Result<CommuneReference> {
        let text: String = bytes.iter().map(|&b| b as char).collect();
        CommuneReference::from_csv(&text)
    }

    pub fn from_csv(text: &str) -> Result<CommuneReference> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        let insee = column(&headers, INSEE_CODE, 0);
        let name = column(&headers, COMMUNE_NAME, 1);
        let postal = column(&headers, POSTAL_CODE, 2);
        let label = column(&headers, DELIVERY_LABEL, 3);

        let mut entries = Vec::new();
        for record in reader.records() {
            let record = record?;
            let field = |i: usize| record.get(i).unwrap_or("").trim().to_string();
            entries.push(CommuneEntry {
                insee_code: field(insee),
                name: field(name),
                postal_code: field(postal),
                label: field(label),
            });
        }

        Ok(CommuneReference { entries })
    }

    /// Postal code of the first entry whose delivery label is `city` uppercased.
    pub fn postal_code_for_label(&self, city: &str) -> Option<String> {
        let wanted = city.trim().to_uppercase();
        self.entries
            .iter()
            .find(|e| e.label == wanted)
            .map(|e| e.postal_code.clone())
    }

    /// INSEE code of the first entry whose commune name matches, ignoring case.
    pub fn insee_code_for_name(&self, city: &str) -> Option<String> {
        let wanted = city.trim().to_lowercase();
        self.entries
            .iter()
            .find(|e| e.name.to_lowercase() == wanted)
            .map(|e| e.insee_code.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
