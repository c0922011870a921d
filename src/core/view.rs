//! Holds the per-currency view of a dataset and orders it on demand.
//!
//! Absent values compare lower than every number. Direction is applied
//! after that, so rows without a value come first when ascending and last
//! when descending. Ties keep dataset order in both directions.
use crate::core::asset::{FlatAssetRecord, RawAssetRecord};
use crate::core::currency::Currency;
use crate::core::error::ViewError;
use crate::core::projector;
use std::cmp::Ordering;
use std::fmt::Display;
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Name,
    CurrentPrice,
    Change24h,
    Change7d,
    MarketCap,
    TotalVolume,
    CirculatingSupply,
}

impl SortColumn {
    pub const ALL: [SortColumn; 7] = [
        SortColumn::Name,
        SortColumn::CurrentPrice,
        SortColumn::Change24h,
        SortColumn::Change7d,
        SortColumn::MarketCap,
        SortColumn::TotalVolume,
        SortColumn::CirculatingSupply,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::CurrentPrice => "current_price",
            SortColumn::Change24h => "change24h",
            SortColumn::Change7d => "change7d",
            SortColumn::MarketCap => "market_cap",
            SortColumn::TotalVolume => "total_volume",
            SortColumn::CirculatingSupply => "circulating_supply",
        }
    }

    /// Value of a numeric column, `None` when absent. Always `None` for `Name`.
    pub fn metric(&self, row: &FlatAssetRecord) -> Option<f64> {
        match self {
            SortColumn::Name => None,
            SortColumn::CurrentPrice => row.current_price,
            SortColumn::Change24h => row.change24h,
            SortColumn::Change7d => row.change7d,
            SortColumn::MarketCap => row.market_cap,
            SortColumn::TotalVolume => row.total_volume,
            SortColumn::CirculatingSupply => row.circulating_supply,
        }
    }

    /// Ascending comparison of two rows on this column.
    pub fn compare(&self, a: &FlatAssetRecord, b: &FlatAssetRecord) -> Ordering {
        match self {
            SortColumn::Name => a.name.cmp(&b.name),
            _ => compare_metric(self.metric(a), self.metric(b)),
        }
    }
}

fn compare_metric(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.total_cmp(&y),
    }
}

impl Display for SortColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortColumn {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortColumn::Name),
            "current_price" | "price" => Ok(SortColumn::CurrentPrice),
            "change24h" | "24h" => Ok(SortColumn::Change24h),
            "change7d" | "7d" => Ok(SortColumn::Change7d),
            "market_cap" | "mcap" => Ok(SortColumn::MarketCap),
            "total_volume" | "volume" => Ok(SortColumn::TotalVolume),
            "circulating_supply" | "supply" => Ok(SortColumn::CirculatingSupply),
            _ => Err(ViewError::InvalidSortColumn(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortState {
    #[default]
    Unsorted,
    SortedBy(SortColumn, SortDirection),
}

impl SortState {
    /// Selecting the current column flips its direction; any other column
    /// starts ascending.
    pub fn toggle(self, column: SortColumn) -> SortState {
        match self {
            SortState::SortedBy(current, direction) if current == column => {
                SortState::SortedBy(current, direction.toggled())
            }
            _ => SortState::SortedBy(column, SortDirection::Asc),
        }
    }

    pub fn column(&self) -> Option<SortColumn> {
        match self {
            SortState::Unsorted => None,
            SortState::SortedBy(column, _) => Some(*column),
        }
    }

    pub fn direction(&self) -> SortDirection {
        match self {
            SortState::Unsorted => SortDirection::default(),
            SortState::SortedBy(_, direction) => *direction,
        }
    }
}

/// Outcome of one projection pass over the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct RebuildSummary {
    pub revision: u64,
    pub projected: usize,
    pub excluded: Vec<ViewError>,
}

/// Owns the flat view of the latest dataset and the sort state.
///
/// The view is only rebuilt by [`ViewStore::replace_dataset`] and
/// [`ViewStore::set_currency`]; sorting never re-projects.
#[derive(Debug, Default)]
pub struct ViewStore {
    dataset: Vec<RawAssetRecord>,
    currency: Option<Currency>,
    rows: Vec<FlatAssetRecord>,
    excluded: Vec<ViewError>,
    sort: SortState,
    revision: u64,
}

impl ViewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the dataset and re-projects it for `currency`.
    ///
    /// On error the current view is left as it was.
    pub fn replace_dataset(
        &mut self,
        raw: Vec<RawAssetRecord>,
        currency: Currency,
    ) -> Result<RebuildSummary, ViewError> {
        currency.canonical_key()?;
        let (rows, excluded) = projector::project_all(&raw, &currency);
        self.dataset = raw;
        self.currency = Some(currency);
        Ok(self.install(rows, excluded))
    }

    /// Re-projects the current dataset for `currency`.
    ///
    /// Returns `Ok(None)` without touching the view when the currency is
    /// unchanged.
    pub fn set_currency(&mut self, currency: Currency) -> Result<Option<RebuildSummary>, ViewError> {
        currency.canonical_key()?;
        if self.currency.as_ref().is_some_and(|c| c.same_as(&currency)) {
            debug!(currency = %currency, "Currency unchanged, keeping view");
            return Ok(None);
        }
        let (rows, excluded) = projector::project_all(&self.dataset, &currency);
        self.currency = Some(currency);
        Ok(Some(self.install(rows, excluded)))
    }

    fn install(&mut self, rows: Vec<FlatAssetRecord>, excluded: Vec<ViewError>) -> RebuildSummary {
        for e in &excluded {
            warn!(error = %e, "Excluding record from view");
        }
        self.rows = rows;
        self.excluded = excluded;
        self.revision += 1;
        debug!(
            revision = self.revision,
            rows = self.rows.len(),
            excluded = self.excluded.len(),
            "Rebuilt view"
        );
        RebuildSummary {
            revision: self.revision,
            projected: self.rows.len(),
            excluded: self.excluded.clone(),
        }
    }

    /// Applies a column selection by name. Unknown columns leave the sort
    /// state unchanged.
    pub fn set_sort(&mut self, column: &str) -> Result<SortState, ViewError> {
        let column = column.parse::<SortColumn>()?;
        Ok(self.set_sort_column(column))
    }

    pub fn set_sort_column(&mut self, column: SortColumn) -> SortState {
        self.sort = self.sort.toggle(column);
        debug!(sort = ?self.sort, "Sort changed");
        self.sort
    }

    /// Rows in the current sort order, or dataset order when unsorted.
    pub fn ordered_view(&self) -> Vec<&FlatAssetRecord> {
        let mut view: Vec<&FlatAssetRecord> = self.rows.iter().collect();
        if let SortState::SortedBy(column, direction) = self.sort {
            // sort_by is stable, so reversing the comparator keeps ties in
            // dataset order.
            view.sort_by(|a, b| {
                let ord = column.compare(a, b);
                match direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }
        view
    }

    pub fn rows(&self) -> &[FlatAssetRecord] {
        &self.rows
    }

    pub fn currency(&self) -> Option<&Currency> {
        self.currency.as_ref()
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    /// Column and direction for drawing the sort marker.
    pub fn sort_indicator(&self) -> (Option<SortColumn>, SortDirection) {
        (self.sort.column(), self.sort.direction())
    }

    pub fn excluded(&self) -> &[ViewError] {
        &self.excluded
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
