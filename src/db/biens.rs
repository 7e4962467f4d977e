use diesel::prelude::*;
use diesel_async::{AsyncMysqlConnection, RunQueryDsl};

use super::schema::{appartement, appartement_agence, maison, maison_agence};
use crate::{
    models::{appartement::Appartement, bien::Bien, maison::Maison},
    Result,
};

fn merge(appartements: Vec<Appartement>, maisons: Vec<Maison>) -> Vec<Bien> {
    appartements
        .into_iter()
        .map(Bien::Appartement)
        .chain(maisons.into_iter().map(Bien::Maison))
        .collect()
}

/// Apartments then houses linked to the agency.
pub async fn by_agency(conn: &mut AsyncMysqlConnection, target_agency: i32) -> Result<Vec<Bien>> {
    let appartements = appartement::table
        .filter(
            appartement::id_appartement.eq_any(
                appartement_agence::table
                    .filter(appartement_agence::id_agence.eq(target_agency))
                    .select(appartement_agence::id_appartement),
            ),
        )
        .order(appartement::id_appartement)
        .select(Appartement::as_select())
        .load(conn)
        .await?;

    let maisons = maison::table
        .filter(
            maison::id_maison.eq_any(
                maison_agence::table
                    .filter(maison_agence::id_agence.eq(target_agency))
                    .select(maison_agence::id_maison),
            ),
        )
        .order(maison::id_maison)
        .select(Maison::as_select())
        .load(conn)
        .await?;

    Ok(merge(appartements, maisons))
}

/// Both bounds inclusive.
pub async fn by_price(conn: &mut AsyncMysqlConnection, min: i32, max: i32) -> Result<Vec<Bien>> {
    let appartements = appartement::table
        .filter(appartement::prix.between(min, max))
        .order(appartement::id_appartement)
        .select(Appartement::as_select())
        .load(conn)
        .await?;

    let maisons = maison::table
        .filter(maison::prix.between(min, max))
        .order(maison::id_maison)
        .select(Maison::as_select())
        .load(conn)
        .await?;

    Ok(merge(appartements, maisons))
}

/// Both bounds inclusive. Rows without a living surface never match.
pub async fn by_surface(conn: &mut AsyncMysqlConnection, min: i32, max: i32) -> Result<Vec<Bien>> {
    let appartements = appartement::table
        .filter(appartement::surf_hab_m2.between(min, max))
        .order(appartement::id_appartement)
        .select(Appartement::as_select())
        .load(conn)
        .await?;

    let maisons = maison::table
        .filter(maison::surf_hab_m2.between(min, max))
        .order(maison::id_maison)
        .select(Maison::as_select())
        .load(conn)
        .await?;

    Ok(merge(appartements, maisons))
}
