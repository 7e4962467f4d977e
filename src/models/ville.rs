use diesel::prelude::*;
use serde::Serialize;

use crate::etl::cities::CityRow;

#[derive(Debug, Queryable, Selectable, Insertable, Serialize, Clone, PartialEq)]
#[diesel(table_name = crate::db::schema::ville)]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
pub struct Ville {
    pub id_locale: i32,
    pub nom: String,
    pub code_postal: String,
}

impl From<&CityRow> for Ville {
    fn from(row: &CityRow) -> Self {
        Ville {
            id_locale: row.id_locale,
            nom: row.nom.clone(),
            code_postal: row.code_postal.clone(),
        }
    }
}
