use diesel::prelude::*;
use serde::Serialize;

#[derive(Debug, Queryable, Selectable, Insertable, Serialize, Clone, Copy, PartialEq, Eq)]
#[diesel(table_name = crate::db::schema::appartement_agence)]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
pub struct AppartementAgence {
    pub id_appartement: i32,
    pub id_agence: i32,
}

#[derive(Debug, Queryable, Selectable, Insertable, Serialize, Clone, Copy, PartialEq, Eq)]
#[diesel(table_name = crate::db::schema::maison_agence)]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
pub struct MaisonAgence {
    pub id_maison: i32,
    pub id_agence: i32,
}
