//! Files exchanged between stages: the timestamped links archive, the CSV
//! snapshot of scraped listings and JSON intermediates.

use std::{
    fs,
    io::{BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use log::info;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    models::listing::{RawListing, SnapshotRow, ADVERTISER_COLUMNS, AD_COLUMNS, DPE_COLUMNS},
    Error, Result,
};

pub const LINKS_PREFIX: &str = "paru_vendu_links_ads_";
pub const SNAPSHOT_PREFIX: &str = "paru_vendu_ventes_logements_";

/// `Y-M-D-h-m-s-micro` without zero padding.
pub fn stamp(at: NaiveDateTime) -> String {
    format!(
        "{}-{}-{}-{}-{}-{}-{}",
        at.year(),
        at.month(),
        at.day(),
        at.hour(),
        at.minute(),
        at.second(),
        at.nanosecond() / 1_000
    )
}

pub fn parse_stamp(value: &str) -> Option<NaiveDateTime> {
    let parts: Vec<u32> = value
        .split('-')
        .map(|p| p.parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()?;
    let [year, month, day, hour, minute, second, micro] = parts[..] else {
        return None;
    };
    NaiveDate::from_ymd_opt(year as i32, month, day)?.and_hms_micro_opt(hour, minute, second, micro)
}

pub fn links_archive_name(city: &str, at: NaiveDateTime) -> String {
    format!("{LINKS_PREFIX}{city}_{}.txt", stamp(at))
}

pub fn snapshot_name(city: &str, at: NaiveDateTime) -> String {
    format!("{SNAPSHOT_PREFIX}{city}_{}.csv", stamp(at))
}

/// Most recent `<prefix><city>_<stamp>.<extension>` file of `dir`.
pub fn latest_archive(dir: &Path, prefix: &str, city: &str, extension: &str) -> Result<PathBuf> {
    let head = format!("{prefix}{city}_");
    let tail = format!(".{extension}");

    let mut latest: Option<(NaiveDateTime, PathBuf)> = None;
    if dir.is_dir() {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(at) = name
                .strip_prefix(&head)
                .and_then(|rest| rest.strip_suffix(&tail))
                .and_then(parse_stamp)
            else {
                continue;
            };
            if latest.as_ref().map_or(true, |(best, _)| at > *best) {
                latest = Some((at, path));
            }
        }
    }

    latest.map(|(_, path)| path).ok_or_else(|| Error::NoArchive {
        dir: dir.display().to_string(),
        prefix: head,
    })
}

/// One `link;` per line.
pub fn write_links_archive(dir: &Path, city: &str, links: &[String], at: NaiveDateTime) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(links_archive_name(city, at));
    let mut file = fs::File::create(&path)?;
    for link in links {
        writeln!(file, "{link};")?;
    }
    info!("Wrote {} links to {}", links.len(), path.display());
    Ok(path)
}

pub fn read_links_archive(path: &Path) -> Result<Vec<String>> {
    let reader = BufReader::new(fs::File::open(path)?);
    let mut links = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let link = line.trim().trim_end_matches(';');
        if !link.is_empty() {
            links.push(link.to_string());
        }
    }
    Ok(links)
}

/// Column layout of a snapshot: index, ad columns, every criteria key seen,
/// every amenity flag seen, DPE columns, advertiser columns.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotLayout {
    pub fields: Vec<String>,
    pub flags: Vec<String>,
}

impl SnapshotLayout {
    pub fn new(listings: &[RawListing]) -> SnapshotLayout {
        let fixed: Vec<&str> = AD_COLUMNS
            .iter()
            .chain(DPE_COLUMNS.iter())
            .chain(ADVERTISER_COLUMNS.iter())
            .copied()
            .collect();

        let mut fields: Vec<String> = Vec::new();
        for (key, _) in listings.iter().flat_map(|l| l.fields.iter()) {
            if !key.is_empty() && !fixed.contains(&key.as_str()) && !fields.contains(key) {
                fields.push(key.clone());
            }
        }

        let mut flags: Vec<String> = Vec::new();
        for flag in listings.iter().flat_map(|l| l.flags.iter()) {
            if !fixed.contains(&flag.as_str()) && !fields.contains(flag) && !flags.contains(flag) {
                flags.push(flag.clone());
            }
        }

        SnapshotLayout { fields, flags }
    }

    pub fn headers(&self) -> Vec<String> {
        std::iter::once("")
            .chain(AD_COLUMNS)
            .chain(self.fields.iter().map(String::as_str))
            .chain(self.flags.iter().map(String::as_str))
            .chain(DPE_COLUMNS)
            .chain(ADVERTISER_COLUMNS)
            .map(str::to_string)
            .collect()
    }

    /// Flags missing from a listing are written as 0.
    pub fn record(&self, index: usize, listing: &RawListing) -> Vec<String> {
        let mut record = vec![
            index.to_string(),
            listing.kind.to_string(),
            listing.city.clone(),
            listing.postal_code.clone(),
            listing.title.clone(),
            listing.short_description.clone(),
            listing.long_description.clone(),
            listing.link.clone(),
        ];
        record.extend(
            self.fields
                .iter()
                .map(|f| listing.field(f).unwrap_or_default().to_string()),
        );
        record.extend(self.flags.iter().map(|f| {
            if listing.flags.contains(f) { "1" } else { "0" }.to_string()
        }));
        record.extend([
            listing.dpe.dpe_label.clone(),
            listing.dpe.consumption.clone(),
            listing.dpe.ges_label.clone(),
            listing.dpe.emission.clone(),
            listing.dpe.date.clone(),
            listing.advertiser.name.clone(),
            listing.advertiser.link.clone(),
            listing.advertiser.city.clone(),
        ]);
        record
    }
}

pub fn write_snapshot(path: &Path, listings: &[RawListing]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let layout = SnapshotLayout::new(listings);
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(layout.headers())?;
    for (index, listing) in listings.iter().enumerate() {
        writer.write_record(layout.record(index, listing))?;
    }
    writer.flush()?;
    info!("Wrote {} listings to {}", listings.len(), path.display());
    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<Vec<SnapshotRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize::<SnapshotRow>() {
        rows.push(row?);
    }
    Ok(rows)
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_vec_pretty(value)?)?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    Ok(serde_json::from_slice(&fs::read(path)?)?)
}

/// Plain CSV with a header row.
pub fn write_records(path: &Path, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
