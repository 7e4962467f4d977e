use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use log::{info, warn};

use super::{
    agencies::{resolve_agency, ResolvedAgency},
    cities::{correct_city_name, CityTable},
    normalize,
};
use crate::models::{
    agence::Agence,
    appartement::Appartement,
    listing::*,
    listing_agence::{AppartementAgence, MaisonAgence},
    maison::Maison,
    ville::Ville,
};

/// A snapshot row that survived cleaning, with typed values.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanListing {
    pub kind: PropertyKind,
    pub city: String,
    pub postal_code: String,
    pub reference: String,
    pub price: i32,
    pub price_per_m2: Option<i32>,
    pub living_surface: Option<i32>,
    pub land_surface: Option<i32>,
    pub rooms: i32,
    pub bedrooms: i32,
    pub floor: Option<String>,
    pub dpe_label: Option<String>,
    pub energy_consumption: Option<i32>,
    pub ges_label: Option<String>,
    pub ghg_emission: Option<i32>,
    pub link: String,
    pub updated_at: Option<NaiveDateTime>,
    pub advertiser: String,
    pub advertiser_link: String,
    pub advertiser_city: String,
    pub agency: ResolvedAgency,
}

impl CleanListing {
    fn duplicate_key(&self) -> (PropertyKind, String, Option<i32>, i32, String) {
        (
            self.kind,
            self.city.clone(),
            self.living_surface,
            self.rooms,
            self.advertiser.clone(),
        )
    }
}

fn clean_row(row: &SnapshotRow) -> Option<CleanListing> {
    let raw_price = row.get(COL_PRICE)?;
    let price = normalize::parse_price(raw_price)?;
    let postal_code = normalize::parse_postal_code(row.get(COL_POSTAL_CODE))?;
    let rooms = normalize::parse_room_count(row.get(COL_ROOMS))?;

    let link = row.get_or_empty(COL_LINK).to_string();
    let kind = row
        .get(COL_KIND)
        .and_then(PropertyKind::parse)
        .unwrap_or_else(|| PropertyKind::from_link(&link));
    let living_surface = normalize::parse_living_surface(row.get(COL_LIVING_SURFACE));
    let land_surface = match kind {
        PropertyKind::Maison => normalize::parse_land_surface(row.get(COL_LAND_SURFACE)),
        PropertyKind::Appartement => None,
    };

    Some(CleanListing {
        kind,
        city: row.get_or_empty(COL_CITY).to_string(),
        postal_code,
        reference: row.get(COL_REFERENCE)?.to_string(),
        price,
        price_per_m2: normalize::price_per_m2(price, living_surface),
        living_surface,
        land_surface,
        rooms,
        bedrooms: normalize::parse_room_count(row.get(COL_BEDROOMS)).unwrap_or(0),
        floor: normalize::clean_label(row.get(COL_FLOOR)),
        dpe_label: normalize::clean_label(row.get(COL_DPE_LABEL)),
        energy_consumption: normalize::parse_energy_consumption(row.get(COL_ENERGY)),
        ges_label: normalize::clean_label(row.get(COL_GES_LABEL)),
        ghg_emission: normalize::parse_ghg_emission(row.get(COL_EMISSION)),
        link,
        updated_at: normalize::parse_update_date(row.get(COL_UPDATED)),
        advertiser: row.get_or_empty(COL_ADVERTISER).to_string(),
        advertiser_link: row.get_or_empty(COL_ADVERTISER_LINK).to_string(),
        advertiser_city: row.get(COL_ADVERTISER_CITY)?.to_string(),
        agency: resolve_agency(row.get_or_empty(COL_ADVERTISER)),
    })
}

/// Drops unusable rows (no price, starred price, no postal code, no room
/// count, no reference, no advertiser city), parses the rest and removes
/// duplicates on (kind, city, living surface, rooms, advertiser).
pub fn clean_snapshot(rows: &[SnapshotRow]) -> Vec<CleanListing> {
    clean_snapshot_with_rows(rows)
        .into_iter()
        .map(|(_, listing)| listing)
        .collect()
}

/// Same as [`clean_snapshot`], keeping the source row of each listing.
pub fn clean_snapshot_with_rows(rows: &[SnapshotRow]) -> Vec<(&SnapshotRow, CleanListing)> {
    let mut seen = HashSet::new();
    let mut dropped = 0;
    let mut duplicates = 0;
    let mut listings = Vec::with_capacity(rows.len());

    for row in rows {
        let Some(listing) = clean_row(row) else {
            dropped += 1;
            continue;
        };
        if !seen.insert(listing.duplicate_key()) {
            duplicates += 1;
            continue;
        }
        listings.push((row, listing));
    }

    info!(
        "Cleaned snapshot: {} rows kept, {} unusable, {} duplicates",
        listings.len(),
        dropped,
        duplicates
    );
    listings
}

/// Every row to insert for one snapshot, keys already assigned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    pub villes: Vec<Ville>,
    pub appartements: Vec<Appartement>,
    pub maisons: Vec<Maison>,
    pub agences: Vec<Agence>,
    pub appartement_agences: Vec<AppartementAgence>,
    pub maison_agences: Vec<MaisonAgence>,
}

/// Builds the relational rows. `postal_lookup` resolves the postal code of
/// advertiser cities that no listing is located in.
pub fn build_batch<F>(listings: &[CleanListing], postal_lookup: F) -> Batch
where
    F: Fn(&str) -> Option<String>,
{
    let listing_cities: Vec<(String, String)> = listings
        .iter()
        .map(|l| (l.city.clone(), l.postal_code.clone()))
        .collect();
    let advertiser_cities: Vec<String> = listings.iter().map(|l| l.advertiser_city.clone()).collect();
    let cities = CityTable::build(&listing_cities, &advertiser_cities, postal_lookup);

    let mut agences: Vec<Agence> = Vec::new();
    let mut agency_ids: HashMap<ResolvedAgency, i32> = HashMap::new();
    for listing in listings {
        if agency_ids.contains_key(&listing.agency) {
            continue;
        }
        let id_agence = agences.len() as i32;
        let ville_annonceur = correct_city_name(&listing.advertiser_city);
        agences.push(Agence {
            id_agence,
            nom_agence: listing.agency.agency.clone(),
            nom_contact: listing.agency.contact.clone(),
            id_locale: cities.id_for(&ville_annonceur),
            ville_annonceur,
            lien_annonceur: listing.advertiser_link.clone(),
        });
        agency_ids.insert(listing.agency.clone(), id_agence);
    }

    let mut batch = Batch {
        villes: cities.rows().iter().map(Ville::from).collect(),
        agences,
        ..Batch::default()
    };

    for listing in listings {
        let Some(id_locale) = cities.id_for(&listing.city) else {
            warn!("No city row for listing {}, skipping", listing.reference);
            continue;
        };
        let id_agence = agency_ids.get(&listing.agency).copied();

        match listing.kind {
            PropertyKind::Appartement => {
                let id_appartement = batch.appartements.len() as i32;
                batch.appartements.push(Appartement {
                    id_appartement,
                    ref_annonce: listing.reference.clone(),
                    prix: listing.price,
                    prix_au_m2: listing.price_per_m2,
                    surf_hab_m2: listing.living_surface,
                    nb_piece: listing.rooms,
                    nb_chambre: listing.bedrooms,
                    num_etage: listing.floor.clone(),
                    lab_dpe: listing.dpe_label.clone(),
                    conso_elec: listing.energy_consumption,
                    lab_gpe: listing.ges_label.clone(),
                    emis_gpe: listing.ghg_emission,
                    lien_appartement: listing.link.clone(),
                    date_maj: listing.updated_at,
                    id_locale,
                });
                if let Some(id_agence) = id_agence {
                    batch.appartement_agences.push(AppartementAgence {
                        id_appartement,
                        id_agence,
                    });
                }
            }
            PropertyKind::Maison => {
                let id_maison = batch.maisons.len() as i32;
                batch.maisons.push(Maison {
                    id_maison,
                    ref_annonce: listing.reference.clone(),
                    prix: listing.price,
                    prix_au_m2: listing.price_per_m2,
                    surf_hab_m2: listing.living_surface,
                    surf_terrain_m2: listing.land_surface,
                    nb_piece: listing.rooms,
                    nb_chambre: listing.bedrooms,
                    lab_dpe: listing.dpe_label.clone(),
                    conso_elec: listing.energy_consumption,
                    lab_gpe: listing.ges_label.clone(),
                    emis_gpe: listing.ghg_emission,
                    lien_maison: listing.link.clone(),
                    date_maj: listing.updated_at,
                    id_locale,
                });
                if let Some(id_agence) = id_agence {
                    batch.maison_agences.push(MaisonAgence {
                        id_maison,
                        id_agence,
                    });
                }
            }
        }
    }

    info!(
        "Batch ready: {} villes, {} appartements, {} maisons, {} agences",
        batch.villes.len(),
        batch.appartements.len(),
        batch.maisons.len(),
        batch.agences.len()
    );
    batch
}
