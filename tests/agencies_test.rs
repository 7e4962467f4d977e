#[cfg(test)]
mod agency_rules {
    use immo::etl::agencies::*;

    #[test]
    fn network_brand_splits_contact() {
        let resolved = resolve_agency("SAFTI Jean Dupont");
        assert_eq!(resolved.agency, "SAFTI");
        assert_eq!(resolved.contact, "Jean Dupont");
    }

    #[test]
    fn network_contact_is_stripped_of_stars() {
        let resolved = resolve_agency("Capifrance *Marie Martin*");
        assert_eq!(resolved.agency, "Capifrance");
        assert_eq!(resolved.contact, "Marie Martin");
    }

    #[test]
    fn network_brand_without_contact() {
        let resolved = resolve_agency("EFFICITY");
        assert_eq!(resolved.agency, "EFFICITY");
        assert_eq!(resolved.contact, NO_CONTACT);
    }

    #[test]
    fn iad_long_brand() {
        let resolved = resolve_agency(
            "iad FranceAgent Commercial immatricule a CCI SEINE ET MARNENdeg 50367642100020Paul Leroy",
        );
        assert_eq!(
            resolved.agency,
            "iad FranceAgent Commercial immatricule a CCI SEINE ET MARNENdeg 50367642100020"
        );
        assert_eq!(resolved.contact, "Paul Leroy");
    }

    #[test]
    fn standalone_agency_has_no_contact() {
        let resolved = resolve_agency("  SEXTANT FRANCE ");
        assert_eq!(resolved.agency, "SEXTANT FRANCE");
        assert_eq!(resolved.contact, NO_CONTACT);
    }

    #[test]
    fn standalone_needs_exact_name() {
        let resolved = resolve_agency("SEXTANT FRANCE Rennes");
        assert_eq!(resolved.agency, "SEXTANT FRANCE Rennes");
        assert_eq!(resolved.contact, "SEXTANT FRANCE Rennes");
    }

    #[test]
    fn independent_advertiser() {
        let resolved = resolve_agency("Cabinet Durand*");
        assert_eq!(resolved.agency, "Cabinet Durand*");
        assert_eq!(resolved.contact, "Cabinet Durand");
    }

    #[test]
    fn empty_advertiser() {
        let resolved = resolve_agency("   ");
        assert_eq!(resolved.agency, NO_CONTACT);
        assert_eq!(resolved.contact, NO_CONTACT);
    }

    #[test]
    fn first_matching_rule_wins() {
        let rules = [
            AgencyRule {
                brand: "IMMO",
                kind: RuleKind::WithContact,
            },
            AgencyRule {
                brand: "3G IMMO",
                kind: RuleKind::WithContact,
            },
        ];
        let resolved = resolve_with(&rules, "3G IMMO Alice");
        assert_eq!(resolved.agency, "IMMO");
        assert_eq!(resolved.contact, "Alice");

        let resolved = resolve_with(&rules[1..], "3G IMMO Alice");
        assert_eq!(resolved.agency, "3G IMMO");
        assert_eq!(resolved.contact, "Alice");
    }

    #[test]
    fn network_rules_come_before_standalone_rules() {
        let first_standalone = AGENCY_RULES
            .iter()
            .position(|r| r.kind == RuleKind::Standalone)
            .unwrap();
        assert_eq!(first_standalone, 9);
        assert!(AGENCY_RULES[first_standalone..]
            .iter()
            .all(|r| r.kind == RuleKind::Standalone));
    }
}
