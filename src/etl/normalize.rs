use chrono::{NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LEADING_INTEGER: Regex = Regex::new(r"^\s*(\d+)").unwrap();
    static ref POSTAL_CODE: Regex = Regex::new(r"^(\d{4,5})(?:\.0+)?$").unwrap();
}

fn strip(value: &str, patterns: &[&str]) -> String {
    let mut out = value.to_string();
    for pattern in patterns {
        out = out.replace(pattern, "");
    }
    out.chars().filter(|c| !c.is_whitespace()).collect()
}

fn non_zero(value: Option<i32>) -> Option<i32> {
    value.filter(|v| *v != 0)
}

/// `"250 000 €"` -> 250000. Prices carrying a `*` are not usable.
pub fn parse_price(raw: &str) -> Option<i32> {
    if raw.contains('*') {
        return None;
    }
    strip(raw, &["€"]).parse().ok()
}

/// `"85m2 environ"` -> 85, `"120 m2 Loi Carrez"` -> 120
pub fn parse_living_surface(raw: Option<&str>) -> Option<i32> {
    non_zero(strip(raw?, &["m2 environ", "m2 Loi Carrez", "m2"]).parse().ok())
}

pub fn parse_land_surface(raw: Option<&str>) -> Option<i32> {
    non_zero(strip(raw?, &["m2environ", "m2"]).parse().ok())
}

pub fn parse_energy_consumption(raw: Option<&str>) -> Option<i32> {
    non_zero(strip(raw?, &["kWh/m².an"]).parse().ok())
}

pub fn parse_ghg_emission(raw: Option<&str>) -> Option<i32> {
    non_zero(strip(raw?, &["kgCO2/m².an"]).parse().ok())
}

/// Integer at the start of `raw`: `"3 pièces"` -> 3
pub fn parse_room_count(raw: Option<&str>) -> Option<i32> {
    LEADING_INTEGER
        .captures(raw?)
        .and_then(|caps| caps[1].parse().ok())
}

/// Accepts `"35000"` and the float rendering `"35000.0"`.
pub fn parse_postal_code(raw: Option<&str>) -> Option<String> {
    POSTAL_CODE
        .captures(raw?.trim())
        .map(|caps| caps[1].to_string())
}

/// `"12/02/2025 à 14:35"`, day first.
pub fn parse_update_date(raw: Option<&str>) -> Option<NaiveDateTime> {
    let value = raw?.trim().replace(" à ", " ");
    if let Ok(date) = NaiveDateTime::parse_from_str(&value, "%d/%m/%Y %H:%M") {
        return Some(date);
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(&value, "%d/%m/%Y %H:%M:%S") {
        return Some(date);
    }
    NaiveDate::parse_from_str(&value, "%d/%m/%Y")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

pub fn price_per_m2(price: i32, living_surface: Option<i32>) -> Option<i32> {
    match living_surface {
        Some(surface) if surface != 0 => Some(price / surface),
        _ => None,
    }
}

pub fn clean_label(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_removes_every_kind_of_space() {
        assert_eq!(strip("1\u{a0}200\u{202f}000 €", &["€"]), "1200000");
    }
}
