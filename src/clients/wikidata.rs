use std::{collections::HashMap, time::Duration};

use log::error;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::Deserialize;

use super::retry::RetryFetch;
use crate::Result;

const COMMUNES_QUERY: &str = r#"
SELECT ?city ?cityLabel ?population ?area ?coordinates WHERE {
  ?city wdt:P31 wd:Q484170.
  {?city wdt:P131/wdt:P131 wd:Q12543.} UNION
  {?city wdt:P131/wdt:P131 wd:Q12538.} UNION
  {?city wdt:P131/wdt:P131 wd:Q12549.} UNION
  {?city wdt:P131/wdt:P131 wd:Q12553.} UNION
  {?city wdt:P131/wdt:P131 wd:Q12741.}
  ?city wdt:P625 ?coordinates.
  OPTIONAL { ?city wdt:P1082 ?population. }
  OPTIONAL { ?city wdt:P2046 ?area. }
  SERVICE wikibase:label { bd:serviceParam wikibase:language "fr". }
}
"#;

/// School, primary school, middle school, high school, university, library,
/// town hall, hospital, building, tourist office, tax office.
const FACILITY_TYPES: [&str; 11] = [
    "Q24354",
    "Q3914",
    "Q159334",
    "Q2385804",
    "Q3918",
    "Q27686",
    "Q24699794",
    "Q16917",
    "Q41176",
    "Q570116",
    "Q57660343",
];

#[derive(Debug, Clone, Deserialize)]
pub struct SparqlValue {
    pub value: String,
}

pub type Binding = HashMap<String, SparqlValue>;

#[derive(Debug, Deserialize)]
struct SparqlResults {
    bindings: Vec<Binding>,
}

#[derive(Debug, Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

pub fn binding_value<'a>(binding: &'a Binding, key: &str) -> Option<&'a str> {
    binding.get(key).map(|v| v.value.as_str())
}

/// Commune as returned by the SPARQL endpoint, before any filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct CommuneBinding {
    pub id: String,
    pub name: String,
    /// WKT `Point(lon lat)`
    pub coordinates: String,
    pub population: Option<String>,
    pub area: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Facility {
    pub id: String,
    pub name: String,
    pub type_id: String,
    pub type_name: String,
}

pub fn facilities_query(city_id: &str) -> String {
    let types = FACILITY_TYPES
        .iter()
        .map(|t| format!("wd:{t}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        r#"
SELECT ?facility ?facilityLabel ?facilityType ?facilityTypeLabel WHERE {{
  ?facility wdt:P131 <{city_id}>.
  ?facility wdt:P31 ?facilityType.
  VALUES ?facilityType {{ {types} }}
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "fr". }}
}}
"#
    )
}

pub struct Wikidata {
    fetch: RetryFetch,
    endpoint: String,
    delay: Duration,
}

impl Wikidata {
    pub fn new(fetch: RetryFetch, endpoint: &str) -> Wikidata {
        Wikidata {
            fetch,
            endpoint: endpoint.to_string(),
            delay: Duration::from_secs(1),
        }
    }

    async fn run(&self, query: &str) -> Result<Vec<Binding>> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/sparql-results+json"),
        );
        let response: SparqlResponse = self
            .fetch
            .get_json(&self.endpoint, &[("query", query), ("format", "json")], headers)
            .await?;
        Ok(response.results.bindings)
    }

    /// Runs `query` after the rate-limit delay. Failures yield no rows.
    pub async fn query(&self, query: &str) -> Vec<Binding> {
        tokio::time::sleep(self.delay).await;

        match self.run(query).await {
            Ok(bindings) => bindings,
            Err(e) => {
                error!("Error while querying Wikidata: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn communes(&self) -> Vec<CommuneBinding> {
        self.query(COMMUNES_QUERY)
            .await
            .iter()
            .filter_map(|b| {
                Some(CommuneBinding {
                    id: binding_value(b, "city").unwrap_or_default().to_string(),
                    name: binding_value(b, "cityLabel").unwrap_or_default().to_string(),
                    coordinates: binding_value(b, "coordinates")?.to_string(),
                    population: binding_value(b, "population").map(str::to_string),
                    area: binding_value(b, "area").map(str::to_string),
                })
            })
            .collect()
    }

    pub async fn facilities(&self, city_id: &str) -> Vec<Facility> {
        self.query(&facilities_query(city_id))
            .await
            .iter()
            .map(|b| Facility {
                id: binding_value(b, "facility").unwrap_or_default().to_string(),
                name: binding_value(b, "facilityLabel").unwrap_or_default().to_string(),
                type_id: binding_value(b, "facilityType").unwrap_or_default().to_string(),
                type_name: binding_value(b, "facilityTypeLabel")
                    .unwrap_or_default()
                    .to_string(),
            })
            .collect()
    }
}
