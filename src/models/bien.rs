use serde::Serialize;

use super::{appartement::Appartement, maison::Maison};

/// Any property returned by the API, tagged with its kind.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "type_de_bien", rename_all = "lowercase")]
pub enum Bien {
    Appartement(Appartement),
    Maison(Maison),
}

impl Bien {
    pub fn prix(&self) -> i32 {
        match self {
            Bien::Appartement(a) => a.prix,
            Bien::Maison(m) => m.prix,
        }
    }

    pub fn surf_hab_m2(&self) -> Option<i32> {
        match self {
            Bien::Appartement(a) => a.surf_hab_m2,
            Bien::Maison(m) => m.surf_hab_m2,
        }
    }
}
