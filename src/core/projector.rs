//! Resolves raw multi-currency records into flat per-currency records.
use crate::core::asset::{CurrencyMap, FlatAssetRecord, RawAssetRecord};
use crate::core::currency::Currency;
use crate::core::error::ViewError;

/// Looks up `key` in `map`, falling back to an ASCII case-insensitive
/// match. When several keys match that way the smallest one wins, so the
/// result does not depend on map iteration order. A missing key and a key
/// without a usable number both yield `None`.
fn resolve(map: &CurrencyMap, key: &str) -> Option<f64> {
    if let Some(value) = map.get(key) {
        return *value;
    }
    map.iter()
        .filter(|(code, _)| code.eq_ignore_ascii_case(key))
        .min_by(|(a, _), (b, _)| a.cmp(b))
        .and_then(|(_, value)| *value)
}

fn required<'a>(
    map: &'a Option<CurrencyMap>,
    id: &str,
    field: &'static str,
) -> Result<&'a CurrencyMap, ViewError> {
    map.as_ref().ok_or_else(|| ViewError::MalformedRecord {
        id: Some(id.to_string()),
        field,
    })
}

/// Projects one raw record onto `currency`.
///
/// Fails with `MalformedRecord` when the id or one of the currency-indexed
/// maps is missing entirely. A map that merely lacks the active currency
/// resolves that field to `None`.
pub fn project(record: &RawAssetRecord, currency: &Currency) -> Result<FlatAssetRecord, ViewError> {
    let id = match record.id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id,
        _ => {
            return Err(ViewError::MalformedRecord {
                id: None,
                field: "id",
            });
        }
    };
    let key = currency.key();

    let market_cap = required(&record.market_cap, id, "market_cap")?;
    let total_volume = required(&record.total_volume, id, "total_volume")?;
    let current_price = required(&record.current_price, id, "current_price")?;
    let change24h = required(&record.change24h, id, "change24h")?;
    let change7d = required(&record.change7d, id, "change7d")?;

    Ok(FlatAssetRecord {
        id: id.to_string(),
        name: record.name.clone(),
        symbol: record.symbol.clone(),
        image: record.image.clone(),
        market_cap_rank: record.market_cap_rank,
        circulating_supply: record.circulating_supply,
        market_cap: resolve(market_cap, &key),
        total_volume: resolve(total_volume, &key),
        current_price: resolve(current_price, &key),
        change24h: resolve(change24h, &key),
        change7d: resolve(change7d, &key),
        sparklines: record.sparklines.clone(),
    })
}

/// Projects a whole dataset in order. Malformed records are left out and
/// returned alongside the projected rows.
pub fn project_all(
    records: &[RawAssetRecord],
    currency: &Currency,
) -> (Vec<FlatAssetRecord>, Vec<ViewError>) {
    let mut rows = Vec::with_capacity(records.len());
    let mut excluded = Vec::new();
    for record in records {
        match project(record, currency) {
            Ok(row) => rows.push(row),
            Err(e) => excluded.push(e),
        }
    }
    (rows, excluded)
}
