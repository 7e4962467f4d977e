#[cfg(test)]
mod snapshot_cleaning {
    use immo::etl::transform::{build_batch, clean_snapshot};
    use immo::models::listing::*;

    fn row(overrides: &[(&str, &str)]) -> SnapshotRow {
        let mut pairs: Vec<(&str, &str)> = vec![
            (COL_KIND, "appartement"),
            (COL_CITY, "rennes"),
            (COL_POSTAL_CODE, "35000"),
            (COL_LINK, "https://www.paruvendu.fr/immobilier/vente/appartement/1261234567A1KIVHAP000"),
            (COL_PRICE, "250 000 €"),
            (COL_ROOMS, "3 "),
            (COL_BEDROOMS, "2 "),
            (COL_LIVING_SURFACE, "85m2 environ"),
            (COL_REFERENCE, "REF-1"),
            (COL_UPDATED, "12/02/2025 à 14:35"),
            (COL_FLOOR, "2"),
            (COL_DPE_LABEL, "D"),
            (COL_ENERGY, "245 kWh/m².an"),
            (COL_GES_LABEL, "B"),
            (COL_EMISSION, "7 kgCO2/m².an"),
            (COL_ADVERTISER, "SAFTI Jean Dupont"),
            (COL_ADVERTISER_LINK, "https://www.paruvendu.fr/pa/safti-rennes-35-123"),
            (COL_ADVERTISER_CITY, "rennes"),
        ];
        for &(key, value) in overrides {
            match pairs.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => pairs.push((key, value)),
            }
        }
        SnapshotRow::from_pairs(pairs)
    }

    #[test]
    fn typed_values() {
        let listings = clean_snapshot(&[row(&[])]);
        assert_eq!(listings.len(), 1);
        let l = &listings[0];
        assert_eq!(l.kind, PropertyKind::Appartement);
        assert_eq!(l.price, 250000);
        assert_eq!(l.living_surface, Some(85));
        assert_eq!(l.price_per_m2, Some(2941));
        assert_eq!(l.rooms, 3);
        assert_eq!(l.bedrooms, 2);
        assert_eq!(l.energy_consumption, Some(245));
        assert_eq!(l.ghg_emission, Some(7));
        assert_eq!(l.agency.agency, "SAFTI");
        assert_eq!(l.agency.contact, "Jean Dupont");
        assert!(l.updated_at.is_some());
    }

    #[test]
    fn unusable_rows_are_dropped() {
        let rows = vec![
            row(&[(COL_PRICE, "")]),
            row(&[(COL_PRICE, "250 000 €*"), (COL_REFERENCE, "REF-2")]),
            row(&[(COL_POSTAL_CODE, ""), (COL_REFERENCE, "REF-3")]),
            row(&[(COL_ROOMS, ""), (COL_REFERENCE, "REF-4")]),
            row(&[(COL_ADVERTISER_CITY, ""), (COL_REFERENCE, "REF-5")]),
            row(&[(COL_REFERENCE, "REF-6")]),
        ];
        let listings = clean_snapshot(&rows);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].reference, "REF-6");
    }

    #[test]
    fn duplicates_on_kind_city_surface_rooms_advertiser() {
        let rows = vec![
            row(&[]),
            row(&[(COL_REFERENCE, "REF-2"), (COL_PRICE, "260 000 €")]),
            row(&[(COL_REFERENCE, "REF-3"), (COL_ROOMS, "4")]),
        ];
        let listings = clean_snapshot(&rows);
        let refs: Vec<&str> = listings.iter().map(|l| l.reference.as_str()).collect();
        assert_eq!(refs, vec!["REF-1", "REF-3"]);
    }

    #[test]
    fn land_surface_only_for_houses() {
        let rows = vec![
            row(&[(COL_LAND_SURFACE, "500m2environ")]),
            row(&[
                (COL_KIND, "maison"),
                (COL_REFERENCE, "REF-2"),
                (COL_LAND_SURFACE, "500m2environ"),
                (COL_ROOMS, "5"),
            ]),
        ];
        let listings = clean_snapshot(&rows);
        assert_eq!(listings[0].land_surface, None);
        assert_eq!(listings[1].land_surface, Some(500));
    }

    #[test]
    fn batch_links_listings_to_cities_and_agencies() {
        let rows = vec![
            row(&[]),
            row(&[
                (COL_KIND, "maison"),
                (COL_REFERENCE, "REF-2"),
                (COL_CITY, "cesson sevigne"),
                (COL_POSTAL_CODE, "35510"),
                (COL_ROOMS, "5"),
                (COL_LAND_SURFACE, "600m2environ"),
                (COL_ADVERTISER, "SEXTANT FRANCE"),
                (COL_ADVERTISER_CITY, "gregoire"),
            ]),
            row(&[(COL_REFERENCE, "REF-3"), (COL_ROOMS, "2")]),
        ];
        let listings = clean_snapshot(&rows);
        let batch = build_batch(&listings, |_| None);

        let names: Vec<&str> = batch.villes.iter().map(|v| v.nom.as_str()).collect();
        assert_eq!(names, vec!["rennes", "cesson sevigne", "st gregoire"]);

        assert_eq!(batch.appartements.len(), 2);
        assert_eq!(batch.maisons.len(), 1);
        assert_eq!(batch.maisons[0].id_locale, 1);
        assert_eq!(batch.maisons[0].surf_terrain_m2, Some(600));

        assert_eq!(batch.agences.len(), 2);
        assert_eq!(batch.agences[1].nom_agence, "SEXTANT FRANCE");
        assert_eq!(batch.agences[1].ville_annonceur, "st gregoire");
        assert_eq!(batch.agences[1].id_locale, Some(2));

        let apt_links: Vec<(i32, i32)> = batch
            .appartement_agences
            .iter()
            .map(|j| (j.id_appartement, j.id_agence))
            .collect();
        assert_eq!(apt_links, vec![(0, 0), (1, 0)]);
        assert_eq!(batch.maison_agences[0].id_maison, 0);
        assert_eq!(batch.maison_agences[0].id_agence, 1);
    }

    #[test]
    fn reloading_the_same_snapshot_gives_the_same_batch() {
        let rows = vec![
            row(&[]),
            row(&[
                (COL_KIND, "maison"),
                (COL_REFERENCE, "REF-2"),
                (COL_CITY, "cesson sevigne"),
                (COL_POSTAL_CODE, "35510"),
                (COL_ROOMS, "5"),
                (COL_ADVERTISER, "Agence Dupont"),
                (COL_ADVERTISER_CITY, "crioult"),
            ]),
            row(&[(COL_REFERENCE, "REF-3"), (COL_ROOMS, "2")]),
        ];
        let lookup = |city: &str| (city == "cesson sevigne").then(|| "35510".to_string());

        let first = build_batch(&clean_snapshot(&rows), lookup);
        let second = build_batch(&clean_snapshot(&rows), lookup);
        assert_eq!(first, second);

        let mut refs: Vec<&str> = first
            .appartements
            .iter()
            .map(|a| a.ref_annonce.as_str())
            .chain(first.maisons.iter().map(|m| m.ref_annonce.as_str()))
            .collect();
        let total = refs.len();
        refs.sort();
        refs.dedup();
        assert_eq!(refs.len(), total);

        let mut villes: Vec<(&str, &str)> = first
            .villes
            .iter()
            .map(|v| (v.nom.as_str(), v.code_postal.as_str()))
            .collect();
        villes.sort();
        villes.dedup();
        assert_eq!(villes.len(), first.villes.len());

        let mut agences: Vec<(&str, &str)> = first
            .agences
            .iter()
            .map(|a| (a.nom_agence.as_str(), a.nom_contact.as_str()))
            .collect();
        agences.sort();
        agences.dedup();
        assert_eq!(agences.len(), first.agences.len());
    }
}
