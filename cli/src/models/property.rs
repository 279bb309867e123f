use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::utils::parse_sale_date;

/// Columns every input file must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = ["ADDRESS", "OWNER", "SALE_PRICE", "SALE_DATE", "YEAR_BUILT"];

/// Sale year recorded by the assessor when no sale is on file.
pub const PLACEHOLDER_SALE_YEAR: i32 = 1900;

/// One assessed property. Address and owner are always non-blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub address: String,
    pub owner: String,
    pub sale_price: Option<f64>,
    pub sale_date: Option<NaiveDate>,
    /// Sale date text as read, kept when it did not parse.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_sale_date: Option<String>,
    pub year_built: Option<i32>,
}

impl PropertyRecord {
    /// Build a record from raw cell text. Returns `None` when the address or
    /// owner is blank.
    pub fn from_fields(
        address: &str,
        owner: &str,
        sale_price: Option<&str>,
        sale_date: Option<&str>,
        year_built: Option<&str>,
    ) -> Option<Self> {
        let address = address.trim();
        let owner = owner.trim();
        if address.is_empty() || owner.is_empty() {
            return None;
        }

        let parsed_date = sale_date.and_then(parse_sale_date);
        let raw_sale_date = match (parsed_date, sale_date) {
            (None, Some(raw)) if !raw.trim().is_empty() => Some(raw.trim().to_string()),
            _ => None,
        };

        Some(Self {
            address: address.to_string(),
            owner: owner.to_string(),
            sale_price: sale_price.and_then(parse_price),
            sale_date: parsed_date,
            raw_sale_date,
            year_built: year_built.and_then(parse_year_built),
        })
    }

    pub fn sale_year(&self) -> Option<i32> {
        self.sale_date.map(|d| d.year())
    }

    /// The sale price when it counts as a real market sale: positive price
    /// and a sale year after the 1900 placeholder.
    pub fn valid_sale_price(&self) -> Option<f64> {
        match (self.sale_price, self.sale_year()) {
            (Some(price), Some(year)) if price > 0.0 && year > PLACEHOLDER_SALE_YEAR => Some(price),
            _ => None,
        }
    }
}

/// Row as deserialized from the CSV, before validation.
#[derive(Debug, Deserialize)]
pub struct RawPropertyRow {
    #[serde(rename = "ADDRESS", default)]
    pub address: Option<String>,
    #[serde(rename = "OWNER", default)]
    pub owner: Option<String>,
    #[serde(rename = "SALE_PRICE", default)]
    pub sale_price: Option<String>,
    #[serde(rename = "SALE_DATE", default)]
    pub sale_date: Option<String>,
    #[serde(rename = "YEAR_BUILT", default)]
    pub year_built: Option<String>,
}

impl RawPropertyRow {
    pub fn into_record(self) -> Option<PropertyRecord> {
        PropertyRecord::from_fields(
            self.address.as_deref().unwrap_or(""),
            self.owner.as_deref().unwrap_or(""),
            self.sale_price.as_deref(),
            self.sale_date.as_deref(),
            self.year_built.as_deref(),
        )
    }
}

/// Lenient price parsing: `$` and thousands separators are ignored.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_year_built(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<i32>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && v.abs() < i32::MAX as f64)
            .map(|v| v.trunc() as i32)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_address_or_owner_is_rejected() {
        assert!(PropertyRecord::from_fields("  ", "ACME LLC", None, None, None).is_none());
        assert!(PropertyRecord::from_fields("123 Main", "\t", None, None, None).is_none());
        assert!(PropertyRecord::from_fields("123 Main", "ACME LLC", None, None, None).is_some());
    }

    #[test]
    fn prices_are_parsed_leniently() {
        assert_eq!(parse_price("100000"), Some(100000.0));
        assert_eq!(parse_price("$1,250,000.50"), Some(1250000.5));
        assert_eq!(parse_price("n/a"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("NaN"), None);
    }

    #[test]
    fn year_built_truncates_decimals() {
        assert_eq!(parse_year_built("1990"), Some(1990));
        assert_eq!(parse_year_built("1985.0"), Some(1985));
        assert_eq!(parse_year_built("unknown"), None);
    }

    #[test]
    fn placeholder_sale_is_not_valid() {
        let placeholder =
            PropertyRecord::from_fields("1 Elm", "X", Some("50000"), Some("1900-01-01"), None).unwrap();
        assert_eq!(placeholder.sale_year(), Some(1900));
        assert_eq!(placeholder.valid_sale_price(), None);

        let free = PropertyRecord::from_fields("1 Elm", "X", Some("0"), Some("2020-01-01"), None).unwrap();
        assert_eq!(free.valid_sale_price(), None);

        let real = PropertyRecord::from_fields("1 Elm", "X", Some("50000"), Some("2020-01-01"), None).unwrap();
        assert_eq!(real.valid_sale_price(), Some(50000.0));
    }

    #[test]
    fn unparseable_date_is_kept_raw() {
        let record =
            PropertyRecord::from_fields("1 Elm", "X", None, Some("sometime"), Some("9999")).unwrap();
        assert_eq!(record.sale_date, None);
        assert_eq!(record.raw_sale_date.as_deref(), Some("sometime"));
        assert_eq!(record.year_built, Some(9999));
    }
}
