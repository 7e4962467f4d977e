use diesel::prelude::*;
use diesel_async::{AsyncMysqlConnection, RunQueryDsl};
use serde::Serialize;
use serde_json::Value;

use super::schema::{agence, appartement, appartement_agence, maison, maison_agence, ville};
use crate::{
    models::{
        agence::Agence,
        appartement::Appartement,
        listing_agence::{AppartementAgence, MaisonAgence},
        maison::Maison,
        ville::Ville,
    },
    Error, Result,
};

pub const TABLES: [&str; 6] = [
    "ville",
    "appartement",
    "maison",
    "agence",
    "appartement_agence",
    "maison_agence",
];

fn to_values<T: Serialize>(rows: Vec<T>) -> Result<Vec<Value>> {
    rows.iter()
        .map(|row| serde_json::to_value(row).map_err(Error::from))
        .collect()
}

/// Every row of `table` as JSON objects.
pub async fn read_table(conn: &mut AsyncMysqlConnection, table: &str) -> Result<Vec<Value>> {
    match table {
        "ville" => to_values(ville::table.select(Ville::as_select()).load(conn).await?),
        "appartement" => to_values(
            appartement::table
                .select(Appartement::as_select())
                .load(conn)
                .await?,
        ),
        "maison" => to_values(maison::table.select(Maison::as_select()).load(conn).await?),
        "agence" => to_values(agence::table.select(Agence::as_select()).load(conn).await?),
        "appartement_agence" => to_values(
            appartement_agence::table
                .select(AppartementAgence::as_select())
                .load(conn)
                .await?,
        ),
        "maison_agence" => to_values(
            maison_agence::table
                .select(MaisonAgence::as_select())
                .load(conn)
                .await?,
        ),
        other => Err(Error::UnknownTable(other.to_string())),
    }
}
