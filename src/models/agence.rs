use diesel::prelude::*;
use serde::Serialize;

#[derive(Debug, Queryable, Selectable, Insertable, Serialize, Clone, PartialEq)]
#[diesel(table_name = crate::db::schema::agence)]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
pub struct Agence {
    pub id_agence: i32,
    pub nom_agence: String,
    pub nom_contact: String,
    pub ville_annonceur: String,
    pub lien_annonceur: String,
    pub id_locale: Option<i32>,
}
