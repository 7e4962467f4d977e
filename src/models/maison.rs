use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

#[derive(Debug, Queryable, Selectable, Insertable, Serialize, Clone, PartialEq)]
#[diesel(table_name = crate::db::schema::maison)]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
pub struct Maison {
    pub id_maison: i32,
    pub ref_annonce: String,
    pub prix: i32,
    pub prix_au_m2: Option<i32>,
    pub surf_hab_m2: Option<i32>,
    pub surf_terrain_m2: Option<i32>,
    pub nb_piece: i32,
    pub nb_chambre: i32,
    pub lab_dpe: Option<String>,
    pub conso_elec: Option<i32>,
    pub lab_gpe: Option<String>,
    pub emis_gpe: Option<i32>,
    pub lien_maison: String,
    pub date_maj: Option<NaiveDateTime>,
    pub id_locale: i32,
}
