// src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One product page to watch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    pub url: String,
    pub selector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}

/// Prices keyed by target name, as stored in a per-date file.
pub type Prices = BTreeMap<String, f64>;

/// Every stored snapshot, keyed by `YYYY-MM-DD`.
pub type CombinedHistory = BTreeMap<String, Prices>;

#[derive(Debug, Clone, PartialEq)]
pub struct DailySnapshot {
    pub date: NaiveDate,
    pub prices: Prices,
}

impl DailySnapshot {
    pub fn new(date: NaiveDate) -> Self {
        DailySnapshot {
            date,
            prices: Prices::new(),
        }
    }

    pub fn date_key(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    // Duplicate names overwrite the earlier price.
    pub fn record(&mut self, name: &str, price: f64) {
        self.prices.insert(name.to_string(), price);
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let target = Target {
            name: "Plain".into(),
            url: "https://example.com".into(),
            selector: ".price".into(),
            regex: None,
            headers: None,
        };
        let json = serde_json::to_value(&target).unwrap();
        assert!(json.get("regex").is_none());
        assert!(json.get("headers").is_none());

        let back: Target = serde_json::from_value(json).unwrap();
        assert_eq!(back, target);
    }

    #[test]
    fn last_price_for_a_name_wins() {
        let mut snapshot = DailySnapshot::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        snapshot.record("A", 10.0);
        snapshot.record("A", 12.5);
        assert_eq!(snapshot.prices.len(), 1);
        assert_eq!(snapshot.prices["A"], 12.5);
        assert_eq!(snapshot.date_key(), "2024-01-01");
    }
}
