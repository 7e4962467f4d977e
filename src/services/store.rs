use std::sync::Arc;

use async_trait::async_trait;
use mongodb::Database;
use serde_json::Value;

use crate::{config::Config, db, models::bien::Bien, mongo::queries::find_documents, Result};

/// Relational side of the API.
#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn biens_by_agency(&self, id_agence: i32) -> Result<Vec<Bien>>;
    async fn biens_by_price(&self, min: i32, max: i32) -> Result<Vec<Bien>>;
    async fn biens_by_surface(&self, min: i32, max: i32) -> Result<Vec<Bien>>;
}

/// Document side of the API.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: &str, limit: i64) -> Result<Vec<Value>>;
}

/// Opens one connection per call.
pub struct MysqlStore {
    config: Arc<Config>,
}

impl MysqlStore {
    pub fn new(config: Arc<Config>) -> MysqlStore {
        MysqlStore { config }
    }
}

#[async_trait]
impl ListingStore for MysqlStore {
    async fn biens_by_agency(&self, id_agence: i32) -> Result<Vec<Bien>> {
        let mut conn = db::establish_connection(&self.config).await?;
        db::biens::by_agency(&mut conn, id_agence).await
    }

    async fn biens_by_price(&self, min: i32, max: i32) -> Result<Vec<Bien>> {
        let mut conn = db::establish_connection(&self.config).await?;
        db::biens::by_price(&mut conn, min, max).await
    }

    async fn biens_by_surface(&self, min: i32, max: i32) -> Result<Vec<Bien>> {
        let mut conn = db::establish_connection(&self.config).await?;
        db::biens::by_surface(&mut conn, min, max).await
    }
}

pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> MongoStore {
        MongoStore { db }
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find(&self, collection: &str, limit: i64) -> Result<Vec<Value>> {
        find_documents(&self.db, collection, limit).await
    }
}
