// src/process/mod.rs

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Sort rank used when a row has no usable Sort value.
pub const DEFAULT_SORT: i64 = 9999;

/// One spreadsheet row as a header-to-value mapping. Lookups never fail:
/// a missing column reads as the empty string.
#[derive(Debug, Clone, Default)]
pub struct RawRow(BTreeMap<String, String>);

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.0.insert(header.into(), value.into());
    }

    /// Value under `header`, or `""` when the column is absent.
    pub fn field(&self, header: &str) -> &str {
        self.0.get(header).map(String::as_str).unwrap_or("")
    }

    /// Like `field`, but blank values also fall back to `default`.
    pub fn field_or<'a>(&'a self, header: &str, default: &'a str) -> &'a str {
        let v = self.field(header);
        if v.is_empty() {
            default
        } else {
            v
        }
    }
}

/// A fully defaulted, display-ready package derived from one RawRow.
#[derive(Debug, Clone)]
pub struct PackageRecord {
    pub tier: String,
    pub name: String,
    /// Raw sheet text; numeric coercion happens at render time.
    pub price: String,
    pub status: String,
    pub description: String,
    pub benefits: Vec<String>,
    pub contact_label: String,
    pub contact_href: String,
    pub sort: i64,
}

static BENEFIT_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[|;]\s*").expect("benefit delimiter pattern should be valid"));

/// Map raw rows to packages. Total: unknown or missing fields always default,
/// and every row yields exactly one record.
pub fn to_packages(rows: &[RawRow]) -> Vec<PackageRecord> {
    rows.iter().map(to_package).collect()
}

fn to_package(row: &RawRow) -> PackageRecord {
    let tier = row.field("Tier").to_string();
    PackageRecord {
        name: row.field_or("Name", &tier).to_string(),
        price: row.field("Price").to_string(),
        status: row.field_or("Status", "Available").to_string(),
        description: row.field("Description").to_string(),
        benefits: split_benefits(row.field("Benefits")),
        contact_label: row.field_or("ContactLabel", "Contact Us").to_string(),
        contact_href: row.field_or("ContactHref", "#contact").to_string(),
        sort: parse_sort(row.field("Sort")),
        tier,
    }
}

/// Split a benefits cell on `|` or `;` (plus any trailing whitespace),
/// dropping empty segments. Colons inside a segment are left alone.
fn split_benefits(raw: &str) -> Vec<String> {
    BENEFIT_SPLIT
        .split(raw)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_sort(raw: &str) -> i64 {
    let raw = raw.trim();
    match raw.parse::<i64>() {
        Ok(n) => n,
        // Numeric sheet cells can arrive as floats like "2.0".
        Err(_) => raw
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f as i64)
            .unwrap_or(DEFAULT_SORT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        let mut r = RawRow::new();
        for (k, v) in pairs {
            r.insert(*k, *v);
        }
        r
    }

    #[test]
    fn empty_row_gets_all_defaults() {
        let packages = to_packages(&[RawRow::new()]);
        assert_eq!(packages.len(), 1);
        let p = &packages[0];
        assert_eq!(p.tier, "");
        assert_eq!(p.name, "");
        assert_eq!(p.price, "");
        assert_eq!(p.status, "Available");
        assert_eq!(p.description, "");
        assert!(p.benefits.is_empty());
        assert_eq!(p.contact_label, "Contact Us");
        assert_eq!(p.contact_href, "#contact");
        assert_eq!(p.sort, DEFAULT_SORT);
    }

    #[test]
    fn name_falls_back_to_tier() {
        let p = &to_packages(&[row(&[("Tier", "Gold")])])[0];
        assert_eq!(p.name, "Gold");
        let p = &to_packages(&[row(&[("Tier", "Gold"), ("Name", "Headline")])])[0];
        assert_eq!(p.name, "Headline");
    }

    #[test]
    fn one_record_per_row() {
        let rows = vec![RawRow::new(), row(&[("Tier", "A")]), row(&[("Tier", "B")])];
        assert_eq!(to_packages(&rows).len(), rows.len());
    }

    #[test]
    fn benefits_split_on_pipe_and_semicolon_only() {
        let p = &to_packages(&[row(&[(
            "Benefits",
            "VIP seating: 2 tickets| Parking pass; Logo on banner",
        )])])[0];
        assert_eq!(
            p.benefits,
            vec!["VIP seating: 2 tickets", "Parking pass", "Logo on banner"]
        );
    }

    #[test]
    fn benefits_drop_empty_segments() {
        let p = &to_packages(&[row(&[("Benefits", "|;A||B;")])])[0];
        assert_eq!(p.benefits, vec!["A", "B"]);
    }

    #[test]
    fn sort_parses_or_defaults() {
        assert_eq!(parse_sort("2"), 2);
        assert_eq!(parse_sort(" 2 "), 2);
        assert_eq!(parse_sort("2.0"), 2);
        assert_eq!(parse_sort(""), DEFAULT_SORT);
        assert_eq!(parse_sort("first"), DEFAULT_SORT);
        assert_eq!(parse_sort("NaN"), DEFAULT_SORT);
    }

    #[test]
    fn blank_status_defaults_to_available() {
        let p = &to_packages(&[row(&[("Status", "")])])[0];
        assert_eq!(p.status, "Available");
        let p = &to_packages(&[row(&[("Status", "Taken")])])[0];
        assert_eq!(p.status, "Taken");
    }
}
