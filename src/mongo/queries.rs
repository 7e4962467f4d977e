use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    Database,
};
use serde_json::Value;

use crate::Result;

pub const DEFAULT_LIMIT: i64 = 100;

/// First `limit` documents of `collection` without their `_id`, as relaxed extended JSON.
pub async fn find_documents(db: &Database, collection: &str, limit: i64) -> Result<Vec<Value>> {
    let cursor = db
        .collection::<Document>(collection)
        .find(doc! {})
        .projection(doc! { "_id": 0 })
        .limit(limit)
        .await?;
    let documents: Vec<Document> = cursor.try_collect().await?;

    Ok(documents
        .into_iter()
        .map(|d| Bson::Document(d).into_relaxed_extjson())
        .collect())
}
