#[cfg(test)]
mod archive_files {
    use chrono::NaiveDate;
    use immo::archive::*;
    use immo::models::listing::*;
    use immo::Error;

    fn at(second: u32, micro: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 2)
            .unwrap()
            .and_hms_micro_opt(23, 6, second, micro)
            .unwrap()
    }

    fn listing(link: &str, flags: &[&str]) -> RawListing {
        let mut listing = RawListing {
            kind: PropertyKind::from_link(link),
            link: link.to_string(),
            title: "Vente appartement à Rennes (35000)".to_string(),
            city: "Rennes".to_string(),
            postal_code: "35000".to_string(),
            flags: flags.iter().map(|f| f.to_string()).collect(),
            ..Default::default()
        };
        listing.set_field(COL_PRICE, "250 000 €".to_string());
        listing
    }

    #[test]
    fn stamp_is_not_zero_padded() {
        assert_eq!(stamp(at(21, 852774)), "2025-3-2-23-6-21-852774");
        assert_eq!(parse_stamp("2025-3-2-23-6-21-852774"), Some(at(21, 852774)));
        assert_eq!(parse_stamp("2025-3-2"), None);
        assert_eq!(
            links_archive_name("rennes", at(21, 852774)),
            "paru_vendu_links_ads_rennes_2025-3-2-23-6-21-852774.txt"
        );
    }

    #[test]
    fn latest_archive_picks_newest_stamp() {
        let dir = tempfile::tempdir().unwrap();
        let links = vec!["https://www.paruvendu.fr/immobilier/vente/appartement/A1".to_string()];

        write_links_archive(dir.path(), "rennes", &links, at(9, 0)).unwrap();
        let newest = write_links_archive(dir.path(), "rennes", &links, at(10, 5)).unwrap();
        write_links_archive(dir.path(), "brest", &links, at(59, 0)).unwrap();

        let found = latest_archive(dir.path(), LINKS_PREFIX, "rennes", "txt").unwrap();
        assert_eq!(found, newest);
    }

    #[test]
    fn missing_archive_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = latest_archive(dir.path(), LINKS_PREFIX, "rennes", "txt").unwrap_err();
        assert!(matches!(err, Error::NoArchive { .. }));
    }

    #[test]
    fn links_are_written_with_separator_and_read_without() {
        let dir = tempfile::tempdir().unwrap();
        let links = vec![
            "https://www.paruvendu.fr/immobilier/vente/appartement/A1".to_string(),
            "https://www.paruvendu.fr/immobilier/vente/maison/B2".to_string(),
        ];
        let path = write_links_archive(dir.path(), "rennes", &links, at(1, 1)).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.lines().all(|l| l.ends_with(';')));
        assert_eq!(read_links_archive(&path).unwrap(), links);
    }

    #[test]
    fn snapshot_fills_missing_flags_with_zero() {
        let listings = vec![
            listing("https://www.paruvendu.fr/immobilier/vente/appartement/A1", &["Accès Ascenseur"]),
            listing("https://www.paruvendu.fr/immobilier/vente/maison/B2", &["Jardin / Terrain"]),
        ];

        let layout = SnapshotLayout::new(&listings);
        assert_eq!(layout.fields, vec![COL_PRICE.to_string()]);
        assert_eq!(layout.flags, vec!["Accès Ascenseur", "Jardin / Terrain"]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(snapshot_name("rennes", at(2, 0)));
        write_snapshot(&path, &listings).unwrap();

        let rows = read_snapshot(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Accès Ascenseur"), Some("1"));
        assert_eq!(rows[0].get("Jardin / Terrain"), Some("0"));
        assert_eq!(rows[1].get("Accès Ascenseur"), Some("0"));
        assert_eq!(rows[1].get("Type de bien"), Some("maison"));
        assert_eq!(rows[1].get(COL_PRICE), Some("250 000 €"));
        assert_eq!(rows[1].get("nom_annonceur"), None);
    }

    #[test]
    fn json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings_rennes.json");
        let listings = vec![listing("https://www.paruvendu.fr/immobilier/vente/maison/B2", &[])];
        write_json(&path, &listings).unwrap();
        let back: Vec<RawListing> = read_json(&path).unwrap();
        assert_eq!(back, listings);
    }
}
