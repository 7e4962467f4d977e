#[cfg(test)]
mod csv_documents {
    use csv::StringRecord;
    use immo::mongo::import::*;
    use mongodb::bson::{doc, Bson, DateTime};
    use serde_json::json;

    #[test]
    fn values_are_typed() {
        assert_eq!(infer_value(""), Bson::Null);
        assert_eq!(infer_value("  "), Bson::Null);
        assert_eq!(infer_value("2021"), Bson::Int64(2021));
        assert_eq!(infer_value("3500.5"), Bson::Double(3500.5));
        assert_eq!(infer_value("True"), Bson::Boolean(true));
        assert_eq!(infer_value("false"), Bson::Boolean(false));
        assert_eq!(infer_value("Rurale"), Bson::String("Rurale".to_string()));
        assert_eq!(infer_value("35047"), Bson::Int64(35047));
    }

    #[test]
    fn coordinates_become_an_array() {
        assert_eq!(
            parse_coordinates("(48.0247, -1.7458)"),
            Some(Bson::Array(vec![Bson::Double(48.0247), Bson::Double(-1.7458)]))
        );
        assert_eq!(parse_coordinates("unknown"), None);
    }

    #[test]
    fn facilities_accept_json_and_single_quotes() {
        assert_eq!(
            parse_facilities(r#"{"mairie": 1, "école": 2}"#),
            doc! { "mairie": 1_i64, "école": 2_i64 }
        );
        assert_eq!(parse_facilities("{'mairie': 1}"), doc! { "mairie": 1_i64 });
        assert!(parse_facilities("").is_empty());
        assert!(parse_facilities("not a dict").is_empty());
    }

    #[test]
    fn single_polygon_is_wrapped_and_closed() {
        let polygons = parse_polygons("[[[0, 0], [1, 0], [1, 1]]]").unwrap();
        assert_eq!(polygons, vec![json!([[[0, 0], [1, 0], [1, 1], [0, 0]]])]);

        let shape = geometry(&polygons).unwrap();
        assert_eq!(shape.get_str("type").unwrap(), "Polygon");
    }

    #[test]
    fn multi_polygon_rings_are_closed() {
        let polygons = parse_polygons(
            "[[[[0, 0], [1, 0], [1, 1], [0, 0]]], [[[2, 2], [3, 2], [3, 3]]]]",
        )
        .unwrap();
        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[0], json!([[[0, 0], [1, 0], [1, 1], [0, 0]]]));
        assert_eq!(polygons[1], json!([[[2, 2], [3, 2], [3, 3], [2, 2]]]));

        let shape = geometry(&polygons).unwrap();
        assert_eq!(shape.get_str("type").unwrap(), "MultiPolygon");
    }

    #[test]
    fn invalid_polygons_are_ignored() {
        assert_eq!(parse_polygons("[1, 2]"), None);
        assert_eq!(parse_polygons("not json"), None);
        assert!(geometry(&[]).is_none());
    }

    #[test]
    fn rows_become_documents() {
        let headers = StringRecord::from(vec!["", "name", "coordinates", "population", "geometry.coordinates"]);
        let record = StringRecord::from(vec![
            "0",
            "Bruz",
            "(48.0247, -1.7458)",
            "",
            "[[[0, 0], [1, 0], [1, 1]]]",
        ]);
        let at = DateTime::from_millis(1_700_000_000_000);

        let document = row_document(&headers, &record, "cities.csv", at);
        assert!(!document.contains_key(""));
        assert_eq!(document.get_str("name").unwrap(), "Bruz");
        assert_eq!(document.get("population"), Some(&Bson::Null));
        assert!(document.get_array("coordinates").is_ok());
        assert!(document.get_array("geometry.coordinates").is_ok());
        assert_eq!(
            document.get_document("geometry").unwrap().get_str("type").unwrap(),
            "Polygon"
        );
        assert_eq!(document.get_datetime("import_timestamp").unwrap(), &at);
        assert_eq!(document.get_str("source_file").unwrap(), "cities.csv");
    }

    #[test]
    fn csv_file_is_read_into_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("indicateurs.csv");
        std::fs::write(
            &path,
            "code_insee,annee_mutation,libelle_geo\n35047,2020,Bruz\n35051,2021,Cesson-Sévigné\n",
        )
        .unwrap();

        let (columns, documents) = read_documents(&path, DateTime::now()).unwrap();
        assert_eq!(columns, vec!["code_insee", "annee_mutation", "libelle_geo"]);
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[1].get_i64("annee_mutation").unwrap(), 2021);
        assert_eq!(documents[1].get_str("libelle_geo").unwrap(), "Cesson-Sévigné");
        assert_eq!(documents[0].get_str("source_file").unwrap(), "indicateurs.csv");
    }

    #[test]
    fn missing_csv_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_documents(&dir.path().join("absent.csv"), DateTime::now()).is_err());
    }
}

#[cfg(test)]
mod description_mirror {
    use chrono::NaiveDate;
    use immo::models::listing::*;
    use immo::mongo::descriptions::*;
    use mongodb::bson::Bson;

    #[test]
    fn blanks_become_nc_and_date_is_typed() {
        let row = SnapshotRow::from_pairs([
            ("Type de bien", "appartement"),
            ("Ville", "Rennes"),
            ("title", "Vente appartement à Rennes (35000)"),
            ("Chauffage", "  "),
            (COL_REFERENCE, "ABC-123"),
        ]);
        let updated = NaiveDate::from_ymd_opt(2025, 2, 12)
            .unwrap()
            .and_hms_opt(14, 35, 0)
            .unwrap();

        let document = description_document(&row, Some(updated));
        assert_eq!(document.len(), MIRROR_COLUMNS.len());
        assert_eq!(document.get_str("Ville").unwrap(), "Rennes");
        assert_eq!(document.get_str("Chauffage").unwrap(), "NC");
        assert_eq!(document.get_str("Exposition").unwrap(), "NC");
        assert_eq!(document.get_str(COL_REFERENCE).unwrap(), "ABC-123");
        assert_eq!(
            document.get_datetime(COL_UPDATED).unwrap().timestamp_millis(),
            updated.and_utc().timestamp_millis()
        );

        let undated = description_document(&row, None);
        assert_eq!(undated.get(COL_UPDATED), Some(&Bson::String("NC".to_string())));
    }
}
