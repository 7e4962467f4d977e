use diesel_async::{scoped_futures::ScopedFutureExt, AsyncConnection, AsyncMysqlConnection, RunQueryDsl};
use log::{error, info};

use super::schema::{agence, appartement, appartement_agence, maison, maison_agence, ville};
use crate::models::{
    agence::Agence,
    appartement::Appartement,
    listing_agence::{AppartementAgence, MaisonAgence},
    maison::Maison,
    ville::Ville,
};

// One transaction per table, `INSERT IGNORE` row by row so rows hitting a
// unique key are skipped. Any other error rolls the whole table back.
macro_rules! insert_ignore_all {
    ($name:ident, $table:ident, $row:ty) => {
        pub async fn $name(conn: &mut AsyncMysqlConnection, rows: &[$row]) -> usize {
            let result = conn
                .transaction::<usize, diesel::result::Error, _>(|conn| {
                    async move {
                        let mut inserted = 0;
                        for row in rows {
                            inserted += diesel::insert_or_ignore_into($table::table)
                                .values(row)
                                .execute(conn)
                                .await?;
                        }
                        Ok(inserted)
                    }
                    .scope_boxed()
                })
                .await;

            match result {
                Ok(n) => {
                    info!(
                        "Inserted {} of {} rows into {} table",
                        n,
                        rows.len(),
                        stringify!($table)
                    );
                    n
                }
                Err(e) => {
                    error!(
                        "Error while inserting into {} table, rolled back: {:?}",
                        stringify!($table),
                        e
                    );
                    0
                }
            }
        }
    };
}

insert_ignore_all!(insert_villes, ville, Ville);
insert_ignore_all!(insert_appartements, appartement, Appartement);
insert_ignore_all!(insert_maisons, maison, Maison);
insert_ignore_all!(insert_agences, agence, Agence);
insert_ignore_all!(insert_appartement_agences, appartement_agence, AppartementAgence);
insert_ignore_all!(insert_maison_agences, maison_agence, MaisonAgence);

#[cfg(test)]
mod tests {
    use diesel::{debug_query, mysql::Mysql};

    use super::*;

    #[test]
    fn rows_are_inserted_with_ignore() {
        let row = Ville {
            id_locale: 0,
            nom: "Rennes".to_string(),
            code_postal: "35000".to_string(),
        };
        let query = diesel::insert_or_ignore_into(ville::table).values(&row);
        let sql = debug_query::<Mysql, _>(&query).to_string();
        assert!(sql.starts_with("INSERT IGNORE INTO `ville`"), "{}", sql);
    }
}
