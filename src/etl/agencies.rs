//! Maps the free-text advertiser name of a listing to an (agency, contact) pair.
//!
//! National networks publish as "<brand><agent name>", local agencies publish
//! under their own name only, and anything else is a private seller or an
//! agent we know nothing about.

pub const NO_CONTACT: &str = "NC";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Brand followed by the agent's name, matched anywhere in the advertiser name
    WithContact,
    /// Whole advertiser name equals the brand
    Standalone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgencyRule {
    pub brand: &'static str,
    pub kind: RuleKind,
}

const fn with_contact(brand: &'static str) -> AgencyRule {
    AgencyRule {
        brand,
        kind: RuleKind::WithContact,
    }
}

const fn standalone(brand: &'static str) -> AgencyRule {
    AgencyRule {
        brand,
        kind: RuleKind::Standalone,
    }
}

/// Ordered, first match wins.
pub const AGENCY_RULES: &[AgencyRule] = &[
    with_contact("Capifrance"),
    with_contact("iad FranceAgent Commercial immatricule a CCI SEINE ET MARNENdeg 50367642100020"),
    with_contact("EFFICITY"),
    with_contact("Optimhome"),
    with_contact("SAFTI"),
    with_contact("BSK IMMOBILIER"),
    with_contact("PROPRIETES PRIVEES"),
    with_contact("3G IMMO - CONSULTANT RESEAU NATIONAL"),
    with_contact("MEGAGENCE"),
    standalone("Human Immobilier Begard"),
    standalone("BBII"),
    standalone("DELF'IMMO"),
    standalone("SELARL COB JURIS"),
    standalone("Bel Air Homes Agence Immobiliere"),
    standalone("EXPERTIMO"),
    standalone("AXO L'immobilier Actif"),
    standalone("PROMUP"),
    standalone("AGENCE NEWTON"),
    standalone("SEXTANT FRANCE"),
    standalone("MON BIEN A LA MER"),
    standalone("ADNOV"),
    standalone("IMMO RESEAU"),
    standalone("LMD IMMOBILIER"),
    standalone("SELECTION HABITAT"),
    standalone("LEGGETT IMMOBILIER"),
    standalone("MAN IMMO PRO"),
    standalone("REGM"),
    standalone("36 HEURES IMMO"),
    standalone("GRIFF IMMOBILIER"),
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedAgency {
    pub agency: String,
    pub contact: String,
}

impl ResolvedAgency {
    fn new(agency: &str, contact: &str) -> ResolvedAgency {
        let contact = clean_contact(contact);
        ResolvedAgency {
            agency: agency.trim().to_string(),
            contact: if contact.is_empty() {
                NO_CONTACT.to_string()
            } else {
                contact
            },
        }
    }
}

fn clean_contact(contact: &str) -> String {
    contact.replace('*', "").trim().to_string()
}

impl AgencyRule {
    fn apply(&self, advertiser: &str) -> Option<ResolvedAgency> {
        match self.kind {
            RuleKind::WithContact => advertiser.find(self.brand).map(|start| {
                let contact = &advertiser[start + self.brand.len()..];
                ResolvedAgency::new(self.brand, contact)
            }),
            RuleKind::Standalone => (advertiser.trim() == self.brand)
                .then(|| ResolvedAgency::new(self.brand, NO_CONTACT)),
        }
    }
}

pub fn resolve_agency(advertiser: &str) -> ResolvedAgency {
    resolve_with(AGENCY_RULES, advertiser)
}

pub fn resolve_with(rules: &[AgencyRule], advertiser: &str) -> ResolvedAgency {
    if advertiser.trim().is_empty() {
        return ResolvedAgency::new(NO_CONTACT, NO_CONTACT);
    }

    rules
        .iter()
        .find_map(|rule| rule.apply(advertiser))
        .unwrap_or_else(|| ResolvedAgency::new(advertiser, advertiser))
}
