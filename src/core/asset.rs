//! Raw multi-currency asset records and their per-currency flat form.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Currency code to value. `None` marks a key that is present but holds
/// no usable number.
pub type CurrencyMap = HashMap<String, Option<f64>>;

/// One asset as delivered by a dataset source.
///
/// Every field deserializes leniently: a missing or wrong-typed value
/// becomes empty instead of failing the whole dataset. Records whose id or
/// currency maps end up empty are rejected later by the projector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAssetRecord {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub symbol: String,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "deserialize_rank")]
    pub market_cap_rank: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub circulating_supply: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_currency_map")]
    pub market_cap: Option<CurrencyMap>,
    #[serde(default, deserialize_with = "deserialize_currency_map")]
    pub total_volume: Option<CurrencyMap>,
    #[serde(default, deserialize_with = "deserialize_currency_map")]
    pub current_price: Option<CurrencyMap>,
    #[serde(default, deserialize_with = "deserialize_currency_map")]
    pub change24h: Option<CurrencyMap>,
    #[serde(default, deserialize_with = "deserialize_currency_map")]
    pub change7d: Option<CurrencyMap>,
    #[serde(default, deserialize_with = "deserialize_samples")]
    pub sparklines: Vec<f64>,
}

/// One asset with every currency-indexed field resolved for a single
/// currency. `None` is the absent-value marker and never means zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatAssetRecord {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub image: Option<String>,
    pub market_cap_rank: Option<u32>,
    pub circulating_supply: Option<f64>,
    pub market_cap: Option<f64>,
    pub total_volume: Option<f64>,
    pub current_price: Option<f64>,
    pub change24h: Option<f64>,
    pub change7d: Option<f64>,
    pub sparklines: Vec<f64>,
}

/// Parses a JSON array of raw records one element at a time.
///
/// Only a body that is not a JSON array is an error. An element that is
/// not an object becomes an empty record, which the projector excludes
/// for its missing id.
pub fn parse_dataset(json: &str) -> serde_json::Result<Vec<RawAssetRecord>> {
    let elements: Vec<serde_json::Value> = serde_json::from_str(json)?;
    Ok(elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            serde_json::from_value(element).unwrap_or_else(|e| {
                debug!(index, error = %e, "Dataset element is not a record");
                RawAssetRecord::default()
            })
        })
        .collect())
}

/// Accepts numbers, numeric strings and anything else (as "no value").
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl LenientNumber {
    fn into_f64(self) -> Option<f64> {
        let value = match self {
            LenientNumber::Number(n) => Some(n),
            LenientNumber::Text(s) => s.trim().parse::<f64>().ok(),
            LenientNumber::Other(_) => None,
        };
        value.filter(|v| v.is_finite())
    }
}

/// Strings and integers are usable as text; anything else is dropped.
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientText {
    Text(String),
    Integer(i64),
    Other(IgnoredAny),
}

impl LenientText {
    fn into_string(self) -> Option<String> {
        match self {
            LenientText::Text(s) => Some(s),
            LenientText::Integer(n) => Some(n.to_string()),
            LenientText::Other(_) => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientMap {
    Map(HashMap<String, Option<LenientNumber>>),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientSamples {
    List(Vec<Option<LenientNumber>>),
    Other(IgnoredAny),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_optional_text(deserializer)
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_optional_text(deserializer)?.unwrap_or_default())
}

fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(LenientText::deserialize(deserializer)?.into_string())
}

fn deserialize_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(LenientNumber::deserialize(deserializer)?.into_f64())
}

fn deserialize_rank<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_number(deserializer)?
        .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= f64::from(u32::MAX))
        .map(|v| v as u32))
}

fn deserialize_currency_map<'de, D>(deserializer: D) -> Result<Option<CurrencyMap>, D::Error>
where
    D: Deserializer<'de>,
{
    match LenientMap::deserialize(deserializer)? {
        LenientMap::Map(map) => Ok(Some(
            map.into_iter()
                .map(|(code, value)| (code, value.and_then(LenientNumber::into_f64)))
                .collect(),
        )),
        LenientMap::Other(_) => Ok(None),
    }
}

fn deserialize_samples<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match LenientSamples::deserialize(deserializer)? {
        LenientSamples::List(samples) => Ok(samples
            .into_iter()
            .filter_map(|v| v.and_then(LenientNumber::into_f64))
            .collect()),
        LenientSamples::Other(_) => Ok(Vec::new()),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn map(pairs: &[(&str, f64)]) -> CurrencyMap {
        pairs
            .iter()
            .map(|(code, value)| (code.to_string(), Some(*value)))
            .collect()
    }

    /// A complete record with the same `prices` in every currency map.
    pub fn record(id: &str, name: &str, prices: &[(&str, f64)]) -> RawAssetRecord {
        RawAssetRecord {
            id: Some(id.to_string()),
            name: name.to_string(),
            symbol: id.to_string(),
            image: None,
            market_cap_rank: None,
            circulating_supply: None,
            market_cap: Some(map(prices)),
            total_volume: Some(map(prices)),
            current_price: Some(map(prices)),
            change24h: Some(map(prices)),
            change7d: Some(map(prices)),
            sparklines: vec![1.0, 2.0, 3.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_JSON: &str = r#"[
        {
            "id": "bitcoin",
            "name": "Bitcoin",
            "symbol": "btc",
            "image": "https://assets.example.com/btc.png",
            "market_cap_rank": 1,
            "circulating_supply": 19500000,
            "market_cap": {"usd": 1200000000000, "eur": 1100000000000},
            "total_volume": {"usd": 30000000000.5},
            "current_price": {"usd": 61000, "eur": "56000.25"},
            "change24h": {"usd": -1.25, "eur": null},
            "change7d": {"usd": 4.5, "eur": "n/a"},
            "sparklines": [60000, null, 61000.5]
        },
        {
            "id": 42,
            "name": "Broken"
        }
    ]"#;

    #[test]
    fn test_dataset_deserialization() {
        let records = parse_dataset(MOCK_JSON).unwrap();
        assert_eq!(records.len(), 2);

        let btc = &records[0];
        assert_eq!(btc.id.as_deref(), Some("bitcoin"));
        assert_eq!(btc.market_cap_rank, Some(1));
        assert_eq!(btc.circulating_supply, Some(19_500_000.0));

        let prices = btc.current_price.as_ref().unwrap();
        assert_eq!(prices.get("usd"), Some(&Some(61000.0)));
        assert_eq!(prices.get("eur"), Some(&Some(56000.25)));

        let change24h = btc.change24h.as_ref().unwrap();
        assert_eq!(change24h.get("eur"), Some(&None));
        let change7d = btc.change7d.as_ref().unwrap();
        assert_eq!(change7d.get("eur"), Some(&None));

        assert_eq!(btc.sparklines, vec![60000.0, 61000.5]);
    }

    #[test]
    fn test_missing_fields_still_deserialize() {
        let records = parse_dataset(MOCK_JSON).unwrap();
        let broken = &records[1];
        assert_eq!(broken.id.as_deref(), Some("42"));
        assert!(broken.current_price.is_none());
        assert!(broken.market_cap.is_none());
        assert!(broken.sparklines.is_empty());
    }

    const GOOD_RECORD: &str = r#"{
        "id": "good", "name": "Good", "symbol": "gd",
        "market_cap": {"usd": 10}, "total_volume": {"usd": 20},
        "current_price": {"usd": 30}, "change24h": {"usd": 1},
        "change7d": {"usd": 2}, "sparklines": [1, 2]
    }"#;

    fn with_good_record(bad: &str) -> String {
        format!("[{GOOD_RECORD}, {bad}]")
    }

    #[test]
    fn test_wrong_typed_fields_do_not_fail_dataset() {
        let bad_records = [
            r#"{"id": "b", "name": null}"#,
            r#"{"id": "b", "market_cap": "n/a"}"#,
            r#"{"id": "b", "market_cap_rank": 1.5}"#,
            r#"{"id": 1.5}"#,
            r#"{"id": "b", "sparklines": "x"}"#,
            r#"{"id": ["b"], "symbol": {"x": 1}, "image": 7}"#,
            r#""not a record""#,
        ];

        for bad in bad_records {
            let records = parse_dataset(&with_good_record(bad))
                .unwrap_or_else(|e| panic!("{bad} failed the dataset: {e}"));
            assert_eq!(records.len(), 2, "{bad}");
            assert_eq!(records[0].id.as_deref(), Some("good"), "{bad}");
        }
    }

    #[test]
    fn test_wrong_typed_fields_become_empty() {
        let records = parse_dataset(
            r#"[
                {"id": "b", "name": null, "symbol": 5, "market_cap_rank": 1.5,
                 "market_cap": "n/a", "total_volume": [1], "sparklines": "x"},
                {"id": 1.5, "market_cap_rank": 3}
            ]"#,
        )
        .unwrap();

        let first = &records[0];
        assert_eq!(first.name, "");
        assert_eq!(first.symbol, "5");
        assert_eq!(first.market_cap_rank, None);
        assert!(first.market_cap.is_none());
        assert!(first.total_volume.is_none());
        assert!(first.sparklines.is_empty());

        assert_eq!(records[1].id, None);
        assert_eq!(records[1].market_cap_rank, Some(3));
    }

    #[test]
    fn test_wrong_typed_record_is_excluded_from_view() {
        use crate::core::currency::Currency;
        use crate::core::error::ViewError;
        use crate::core::view::ViewStore;

        let records =
            parse_dataset(&with_good_record(r#"{"id": "b", "market_cap": "n/a"}"#)).unwrap();
        let mut store = ViewStore::new();
        store
            .replace_dataset(records, Currency::fiat("usd", "$"))
            .unwrap();

        let ids: Vec<&str> = store.ordered_view().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["good"]);
        assert_eq!(
            store.excluded(),
            &[ViewError::MalformedRecord {
                id: Some("b".to_string()),
                field: "market_cap",
            }]
        );
    }

    #[test]
    fn test_non_array_dataset_is_an_error() {
        assert!(parse_dataset(r#"{"coins": []}"#).is_err());
    }
}
