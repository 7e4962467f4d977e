#[cfg(test)]
mod field_normalizer {
    use chrono::NaiveDate;
    use immo::etl::normalize::*;

    #[test]
    fn price_with_spaces_and_euro_sign() {
        assert_eq!(parse_price("250 000 €"), Some(250000));
        assert_eq!(parse_price("1 200 000€"), Some(1200000));
        assert_eq!(parse_price("189\u{a0}000\u{a0}€"), Some(189000));
    }

    #[test]
    fn starred_price_is_rejected() {
        assert_eq!(parse_price("250 000 €*"), None);
        assert_eq!(parse_price("*"), None);
    }

    #[test]
    fn unparsable_price_is_rejected() {
        assert_eq!(parse_price("Nous consulter"), None);
    }

    #[test]
    fn living_surface_suffixes() {
        assert_eq!(parse_living_surface(Some("85m2 environ")), Some(85));
        assert_eq!(parse_living_surface(Some("120 m2 Loi Carrez")), Some(120));
        assert_eq!(parse_living_surface(Some("0m2 environ")), None);
        assert_eq!(parse_living_surface(Some("")), None);
        assert_eq!(parse_living_surface(None), None);
    }

    #[test]
    fn land_surface() {
        assert_eq!(parse_land_surface(Some("1 250m2environ")), Some(1250));
        assert_eq!(parse_land_surface(Some("0")), None);
        assert_eq!(parse_land_surface(None), None);
    }

    #[test]
    fn energy_and_emission() {
        assert_eq!(parse_energy_consumption(Some("245 kWh/m².an")), Some(245));
        assert_eq!(parse_energy_consumption(Some("0 kWh/m².an")), None);
        assert_eq!(parse_ghg_emission(Some("7 kgCO2/m².an")), Some(7));
        assert_eq!(parse_ghg_emission(Some("")), None);
    }

    #[test]
    fn room_count_reads_leading_digits() {
        assert_eq!(parse_room_count(Some("3 ")), Some(3));
        assert_eq!(parse_room_count(Some("10")), Some(10));
        assert_eq!(parse_room_count(Some("\t4 pièces")), Some(4));
        assert_eq!(parse_room_count(Some("NC")), None);
        assert_eq!(parse_room_count(None), None);
    }

    #[test]
    fn postal_code_accepts_float_rendering() {
        assert_eq!(parse_postal_code(Some("35000")), Some("35000".to_string()));
        assert_eq!(parse_postal_code(Some("35000.0")), Some("35000".to_string()));
        assert_eq!(parse_postal_code(Some("Rennes")), None);
        assert_eq!(parse_postal_code(None), None);
    }

    #[test]
    fn update_date_day_first() {
        let expected = NaiveDate::from_ymd_opt(2025, 2, 12)
            .unwrap()
            .and_hms_opt(14, 35, 0)
            .unwrap();
        assert_eq!(parse_update_date(Some("12/02/2025 à 14:35")), Some(expected));

        let date_only = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parse_update_date(Some("01/03/2025")), Some(date_only));
        assert_eq!(parse_update_date(Some("hier")), None);
    }

    #[test]
    fn price_per_m2_needs_a_surface() {
        assert_eq!(price_per_m2(250000, Some(85)), Some(2941));
        assert_eq!(price_per_m2(250000, None), None);
        assert_eq!(price_per_m2(250000, Some(0)), None);
    }

    #[test]
    fn labels_are_trimmed() {
        assert_eq!(clean_label(Some(" D ")), Some("D".to_string()));
        assert_eq!(clean_label(Some("  ")), None);
        assert_eq!(clean_label(None), None);
    }
}
