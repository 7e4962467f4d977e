use dotenvy::dotenv;
use log::{info, warn};
use reqwest::Url;
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{Error, Result};

const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub log_file: String,

    // Files
    pub base_path: String,
    pub archives_path: String,
    pub cities_csv: String,
    pub indicators_csv: String,
    pub geometries_csv: String,

    // Scraping
    pub city: String,
    pub search_url: String,
    pub listing_url_prefix: String,
    pub page_delay_seconds: u64,
    pub listing_delay_seconds: u64,
    pub batch_size: usize,
    pub batch_delay_seconds: u64,

    // HTTP
    pub request_timeout_seconds: u64,
    pub max_retries: u32,

    // Enrichment
    pub reference_latitude: f64,
    pub reference_longitude: f64,
    pub cities_radius_km: f64,
    pub foncier_radius_km: f64,
    pub year_from: i32,
    pub year_to: i32,
    pub postal_codes_url: String,
    pub insee_codes_url: String,
    pub wikidata_endpoint: String,
    pub cerema_indicators_url: String,
    pub geomutations_url: String,
    pub cerema_token: Option<String>,

    // Stores
    pub mongo_database: String,
    pub http_bind_address: String,

    // Read from the environment in read_config
    #[serde(skip)]
    pub db_host: String,
    #[serde(skip)]
    pub db_name: String,
    #[serde(skip)]
    pub db_user: String,
    #[serde(skip)]
    pub db_password: String,
    #[serde(skip)]
    pub mongo_uri: String,
    #[serde(skip)]
    pub secret_key: String,
    #[serde(skip)]
    pub api_password: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "info".to_string(),
            log_file: "immo.log".to_string(),
            base_path: ".".to_string(),
            archives_path: "Archives".to_string(),
            cities_csv: "cities_around_rennes.csv".to_string(),
            indicators_csv: "api_indicateurs_donnees_foncieres.csv".to_string(),
            geometries_csv: "api_geometries_donnees_foncieres.csv".to_string(),
            city: "rennes".to_string(),
            search_url: "https://www.paruvendu.fr/immobilier/vente/{city}/?rechpv=1&tt=1&tbApp=1&tbDup=1&tbChb=1&tbLof=1&tbAtl=1&tbPla=1&tbMai=1&tbVil=1&tbCha=1&tbPro=1&tbHot=1&tbMou=1&tbFer=1&at=1&nbp0=99&pa=FR&lol=30&ray=50&codeINSEE=35XX0,".to_string(),
            listing_url_prefix: "https://www.paruvendu.fr/immobilier/vente/".to_string(),
            page_delay_seconds: 5,
            listing_delay_seconds: 5,
            batch_size: 50,
            batch_delay_seconds: 10,
            request_timeout_seconds: 10,
            max_retries: 3,
            reference_latitude: 48.117266,
            reference_longitude: -1.6777926,
            cities_radius_km: 50.0,
            foncier_radius_km: 100.0,
            year_from: 2018,
            year_to: 2023,
            postal_codes_url: "https://www.data.gouv.fr/fr/datasets/r/9713f203-7703-4f86-8b95-64446d7132ee".to_string(),
            insee_codes_url: "https://www.data.gouv.fr/fr/datasets/r/170ec28c-cd4a-4ce4-bac5-f1d8243cd7bb".to_string(),
            wikidata_endpoint: "https://query.wikidata.org/sparql".to_string(),
            cerema_indicators_url: "https://apidf-preprod.cerema.fr/indicateurs/dv3f/communes/annuel/".to_string(),
            geomutations_url: "https://apidf-preprod.cerema.fr/dvf_opendata/geomutations/?code_insee=35238&in_bbox=-1.69%2C%2048.07%2C-1.67%2C48.09".to_string(),
            cerema_token: None,
            mongo_database: "projet_bloc_1".to_string(),
            http_bind_address: "127.0.0.1:8000".to_string(),
            db_host: "localhost".to_string(),
            db_name: "immobilier".to_string(),
            db_user: "root".to_string(),
            db_password: String::new(),
            mongo_uri: "mongodb://localhost:27017/".to_string(),
            secret_key: String::new(),
            api_password: String::new(),
        }
    }
}

impl Config {
    /// `relative` under `base_path`.
    pub fn path(&self, relative: &str) -> PathBuf {
        Path::new(&self.base_path).join(relative)
    }

    pub fn links_dir(&self) -> PathBuf {
        self.path(&self.archives_path).join("links")
    }

    pub fn snapshots_dir(&self) -> PathBuf {
        self.path(&self.archives_path)
            .join("csv_files_of_extracted_datas")
    }

    pub fn listings_json(&self) -> PathBuf {
        self.path(&self.archives_path)
            .join(format!("listings_{}.json", self.city))
    }

    pub fn search_url(&self) -> String {
        self.search_url.replace("{city}", &self.city)
    }

    /// Search result page `page` (1-based). Page 1 has no `p` parameter.
    pub fn search_page_url(&self, page: usize) -> String {
        if page <= 1 {
            self.search_url()
        } else {
            format!("{}&p={}", self.search_url(), page)
        }
    }

    /// User and password are percent-encoded.
    pub fn database_url(&self) -> Result<String> {
        let invalid = || Error::DatabaseUrl(format!("mysql://{}/{}", self.db_host, self.db_name));

        let mut url = Url::parse(&format!("mysql://{}/{}", self.db_host, self.db_name))
            .map_err(|_| invalid())?;
        url.set_username(&self.db_user).map_err(|_| invalid())?;
        if !self.db_password.is_empty() {
            url.set_password(Some(&self.db_password))
                .map_err(|_| invalid())?;
        }
        Ok(url.to_string())
    }

    fn apply_env(&mut self) {
        let vars: [(&str, &mut String); 7] = [
            ("host", &mut self.db_host),
            ("database", &mut self.db_name),
            ("user", &mut self.db_user),
            ("mdp", &mut self.db_password),
            ("MONGO_URI", &mut self.mongo_uri),
            ("SECRET_KEY", &mut self.secret_key),
            ("API_PASSWORD", &mut self.api_password),
        ];
        for (name, field) in vars {
            if let Ok(value) = env::var(name) {
                *field = value;
            }
        }
    }
}

pub fn create_test_config() -> Config {
    Config {
        page_delay_seconds: 0,
        listing_delay_seconds: 0,
        batch_delay_seconds: 0,
        request_timeout_seconds: 1,
        secret_key: "test-secret".to_string(),
        api_password: "test-password".to_string(),
        ..Config::default()
    }
}

/// Where the configuration came from, logged once the logger is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Configuration read from {}", path.display()),
            ConfigSource::Defaults => {
                warn!("{CONFIG_PATH_ENV} not set, using default configuration")
            }
        }
    }
}

/// TOML file at `path` or the defaults, then the environment overrides.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<(Config, ConfigSource)> {
    let (mut config, source) = match path {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            (
                toml::from_str::<Config>(&text)?,
                ConfigSource::File(path.to_path_buf()),
            )
        }
        None => (Config::default(), ConfigSource::Defaults),
    };
    config.apply_env();

    Ok((config, source))
}

pub fn read_config() -> anyhow::Result<(Config, ConfigSource)> {
    dotenv().ok();
    let path = env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
    load_config(path.as_deref())
}
