use scraper::{ElementRef, Html, Selector};

use crate::{
    models::listing::{
        Advertiser, EnergyDiagnostic, PropertyKind, RawListing, COL_ANNEXES, COL_BEDROOMS,
        COL_LAND_SURFACE, COL_LIVING_SURFACE, COL_OUTBUILDINGS, COL_PRICE, COL_REFERENCE,
        COL_ROOMS, COL_UPDATED,
    },
    Error, Result,
};

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::InvalidSelector(sel_str.into()))
}

fn text_of(element: ElementRef) -> String {
    element.text().collect::<String>()
}

fn without(value: &str, patterns: &[&str]) -> String {
    let mut out = value.to_string();
    for pattern in patterns {
        out = out.replace(pattern, "");
    }
    out
}

fn first_chars(value: &str, n: usize) -> String {
    value.chars().take(n).collect()
}

/// Text after the last ':' of `value`, the whole value when there is none.
fn after_last_colon(value: &str) -> &str {
    match value.rfind(':') {
        Some(i) => &value[i + 1..],
        None => value,
    }
}

/// Folds accented latin letters to ASCII so advertiser names compare equal
/// whatever the page encoding.
pub fn fold_ascii(value: &str) -> String {
    value
        .replace(['á', 'à', 'â', 'ã', 'ä', 'å'], "a")
        .replace(['Á', 'À', 'Â', 'Ã', 'Ä', 'Å'], "A")
        .replace(['é', 'è', 'ê', 'ë'], "e")
        .replace(['É', 'È', 'Ê', 'Ë'], "E")
        .replace(['í', 'ì', 'î', 'ï'], "i")
        .replace(['Í', 'Ì', 'Î', 'Ï'], "I")
        .replace(['ó', 'ò', 'ô', 'õ', 'ö'], "o")
        .replace(['Ó', 'Ò', 'Ô', 'Õ', 'Ö'], "O")
        .replace(['ú', 'ù', 'û', 'ü'], "u")
        .replace(['Ú', 'Ù', 'Û', 'Ü'], "U")
        .replace(['ý', 'ÿ'], "y")
        .replace(['ñ'], "n")
        .replace(['Ñ'], "N")
        .replace(['ç'], "c")
        .replace(['Ç'], "C")
        .replace(['œ'], "oe")
        .replace(['Œ'], "OE")
        .replace(['æ'], "ae")
        .replace(['Æ'], "AE")
        .replace(['’', '‘'], "'")
        .replace(['°'], "deg")
        .replace(['\u{a0}'], " ")
        .chars()
        .filter(char::is_ascii)
        .collect()
}

/// `"Vente appartement 3 pièces à Rennes (35000)"` -> `("Rennes", "35000")`.
/// The city is looked for after the first character of the title.
pub fn split_title(title: &str) -> (String, String) {
    let (Some(lp), Some(rp)) = (title.find('('), title.find(')')) else {
        return (String::new(), String::new());
    };
    let postal_code = if lp < rp {
        title[lp + 1..rp].to_string()
    } else {
        String::new()
    };

    let start = title.chars().next().map(char::len_utf8).unwrap_or(0);
    let head = if start <= lp { &title[start..lp] } else { "" };
    let city = match head.find('à') {
        Some(i) => head[i + 'à'.len_utf8()..].trim().to_string(),
        None => String::new(),
    };

    (city, postal_code)
}

/// Advertiser pages end in `-<city>-<dept>-<id>`, the city is the slug
/// between the third and second to last '-'.
pub fn advertiser_city(link: &str) -> String {
    let Some(i0) = link.rfind('-') else {
        return String::new();
    };
    let Some(i1) = link[..i0].rfind('-') else {
        return String::new();
    };
    let i2 = link[..i1].rfind('-').map(|i| i + 1).unwrap_or(0);
    link[i2..i1].to_string()
}

struct Selectors {
    title: Selector,
    description: Selector,
    long_description: Selector,
    price_block: Selector,
    div: Selector,
    span: Selector,
    criteria: Selector,
    advertiser_name: Selector,
    advertiser_link: Selector,
    advertiser_any_link: Selector,
    dpe_notes: Selector,
    dpe_fallback: Selector,
    energy: Selector,
    ges_label: Selector,
    emission: Selector,
    dpe_date: Selector,
}

impl Selectors {
    fn new() -> Result<Selectors> {
        Ok(Selectors {
            title: create_selector(r#"meta[property="og:title"]"#)?,
            description: create_selector(r#"meta[property="og:description"]"#)?,
            long_description: create_selector("div.txt_annonceauto.txt_annoncetrunc")?,
            price_block: create_selector("div.prixactionalerte-box, div.im12_hd_prix")?,
            div: create_selector("div")?,
            span: create_selector("span")?,
            criteria: create_selector("ul.crit-alignbloc li")?,
            advertiser_name: create_selector("p.ba-nameannonceur")?,
            advertiser_link: create_selector(r#"div.blocannonceur_linklist a[target="_blank"]"#)?,
            advertiser_any_link: create_selector("div.blocannonceur_linklist a")?,
            dpe_notes: create_selector("div.DPE_greyPadd div.DPE_ng_flex span")?,
            dpe_fallback: create_selector(r#"div[class^="DPE_consEnerNote NoteEnerg"]"#)?,
            energy: create_selector("div.DPE_consEnerTxt.newDPE span")?,
            ges_label: create_selector("div.DPE_effSerreGlob.newDPE_glob div")?,
            emission: create_selector("div.DPE_effSerreTxt span")?,
            dpe_date: create_selector("p.mentions_detailimmo.m-0.text-center")?,
        })
    }
}

fn first_text(doc: &Html, selector: &Selector) -> Option<String> {
    doc.select(selector).next().map(text_of)
}

fn meta_content(doc: &Html, selector: &Selector) -> String {
    doc.select(selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .unwrap_or_default()
        .to_string()
}

fn first_span(item: ElementRef, span: &Selector) -> String {
    item.select(span).next().map(text_of).unwrap_or_default()
}

fn parse_criteria(doc: &Html, s: &Selectors, listing: &mut RawListing) {
    if let Some(price) = doc
        .select(&s.price_block)
        .next()
        .and_then(|block| block.select(&s.div).next())
    {
        listing.set_field(COL_PRICE, without(&text_of(price), &["\n"]));
    }

    for item in doc.select(&s.criteria) {
        let text = text_of(item);

        if item.value().attr("class").is_some() {
            let classes: Vec<&str> = item.value().classes().collect();
            if classes == ["nbp"] {
                listing.set_field(COL_ROOMS, without(&first_chars(&text, 2), &["\n", "\t"]));
            } else {
                listing.set_field(COL_LIVING_SURFACE, without(&text, &["\n", "\t"]));
            }
        } else if text.contains("chambres") && !text.contains("Agencement") {
            listing.set_field(COL_BEDROOMS, without(&first_chars(&text, 2), &["\n", "\t"]));
        } else if text.contains("Extérieur") {
            let span = first_span(item, &s.span);
            listing.set_field(
                COL_LAND_SURFACE,
                without(after_last_colon(&span), &["\n", " ", "\t"]),
            );
        } else if text.contains("Annexes") {
            listing.set_field(COL_ANNEXES, without(&first_span(item, &s.span), &["\n", "\t"]));
        } else if text.contains("Dépendance") {
            listing.set_field(
                COL_OUTBUILDINGS,
                without(&first_span(item, &s.span), &["\n", "\t"]),
            );
        } else if text.contains("Général") {
            for span in item.select(&s.span) {
                let span_text = text_of(span);
                let Some(i) = span_text.rfind(':') else {
                    continue;
                };
                let key = without(&span_text[..i], &["\n", " "]);
                let value = without(&span_text[i + 1..], &["\n"]).trim().to_string();
                listing.set_field(&key, value);
            }
        } else if text.contains("Réf. annonce") {
            listing.set_field(COL_REFERENCE, without(&first_span(item, &s.span), &["\n", "\t"]));
        } else if text.contains("Mise à jour") {
            listing.set_field(COL_UPDATED, without(&first_span(item, &s.span), &["\n", "\t"]));
        } else if !text.contains("Agencement") {
            let flag = without(&text, &["\n", "\t"]);
            if !flag.trim().is_empty() && !listing.flags.contains(&flag) {
                listing.flags.push(flag);
            }
        }
    }
}

fn parse_advertiser(doc: &Html, s: &Selectors) -> Advertiser {
    let name = first_text(doc, &s.advertiser_name)
        .map(|n| fold_ascii(&without(&n, &["\n", "  "])))
        .unwrap_or_default();

    let link = doc
        .select(&s.advertiser_link)
        .next()
        .or_else(|| doc.select(&s.advertiser_any_link).next())
        .and_then(|a| a.value().attr("href"))
        .unwrap_or_default()
        .to_string();

    Advertiser {
        city: advertiser_city(&link),
        name,
        link,
    }
}

fn parse_dpe(doc: &Html, s: &Selectors) -> EnergyDiagnostic {
    let mut notes = doc.select(&s.dpe_notes).peekable();
    let dpe_label = if notes.peek().is_none() {
        String::new()
    } else {
        notes
            .find(|span| span.value().classes().any(|c| c == "NoteActive"))
            .map(text_of)
            .or_else(|| first_text(doc, &s.dpe_fallback))
            .unwrap_or_default()
    };

    EnergyDiagnostic {
        dpe_label,
        consumption: first_text(doc, &s.energy).unwrap_or_default(),
        ges_label: first_text(doc, &s.ges_label).unwrap_or_default(),
        emission: first_text(doc, &s.emission).unwrap_or_default(),
        date: first_text(doc, &s.dpe_date)
            .map(|d| d.replace("Fait le :", "").trim_start().to_string())
            .unwrap_or_default(),
    }
}

/// Extracts every field of a listing detail page. Missing parts are left empty.
pub fn parse_listing(html: &str, link: &str) -> Result<RawListing> {
    let s = Selectors::new()?;
    let doc = Html::parse_document(html);

    let title = meta_content(&doc, &s.title);
    let (city, postal_code) = split_title(&title);

    let mut listing = RawListing {
        kind: PropertyKind::from_link(link),
        link: link.to_string(),
        short_description: meta_content(&doc, &s.description)
            .replace("&nbsp;", " ")
            .replace('\u{a0}', " "),
        long_description: first_text(&doc, &s.long_description)
            .map(|d| without(&d, &["\n", "  "]))
            .unwrap_or_default(),
        title,
        city,
        postal_code,
        fields: Vec::new(),
        flags: Vec::new(),
        advertiser: parse_advertiser(&doc, &s),
        dpe: parse_dpe(&doc, &s),
    };
    parse_criteria(&doc, &s, &mut listing);

    Ok(listing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn after_last_colon_keeps_tail() {
        assert_eq!(after_last_colon("Terrain : 500 m2"), " 500 m2");
        assert_eq!(after_last_colon("500"), "500");
    }

    #[test]
    fn first_chars_is_char_based() {
        assert_eq!(first_chars("é3 pièces", 2), "é3");
    }
}
