//! Renders the ordered view as a terminal table.
use super::ui;
use crate::core::{Currency, FlatAssetRecord, SortColumn, SortDirection, ViewStore};
use chrono::{DateTime, Utc};
use comfy_table::{Cell, CellAlignment, Color};

const SPARK_BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const SPARK_WIDTH: usize = 24;

#[derive(Debug, Clone, Default)]
pub struct TableOptions {
    pub limit: Option<usize>,
    /// Abbreviate large fiat amounts (K, M, B, T).
    pub compact: bool,
    pub fetched_at: Option<DateTime<Utc>>,
    /// Fixed table width; the terminal width is used when unset.
    pub width: Option<u16>,
}

/// Inserts `,` every three digits of the integer part.
fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Formats with at most `max_frac` digits, trimming trailing zeros down to
/// `min_frac`.
pub fn format_number(value: f64, min_frac: usize, max_frac: usize) -> String {
    let mut text = format!("{value:.max_frac$}");
    if max_frac > min_frac {
        let keep = text.len() - (max_frac - min_frac);
        while text.len() > keep && text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    group_thousands(&text)
}

/// Short form of a large amount, e.g. `1.23B`.
pub fn format_compact(value: f64) -> String {
    const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];
    for (scale, suffix) in UNITS {
        if value.abs() >= scale {
            return format!("{:.2}{suffix}", value / scale);
        }
    }
    format!("{value:.2}")
}

/// Fiat amounts take the symbol as prefix, crypto amounts as suffix.
pub fn format_amount(amount: &str, currency: &Currency) -> String {
    if currency.is_fiat() {
        format!("{}{amount}", currency.symbol)
    } else {
        format!("{amount} {}", currency.symbol)
    }
}

fn format_price(value: f64, currency: &Currency) -> String {
    if currency.is_fiat() {
        format_amount(&format_number(value, 2, 6), currency)
    } else {
        format_amount(&format_number(value, 2, 8), currency)
    }
}

fn format_large(value: f64, currency: &Currency, compact: bool) -> String {
    if compact && currency.is_fiat() {
        format_amount(&format_compact(value), currency)
    } else {
        format_amount(&format_number(value, 2, 2), currency)
    }
}

/// Draws `samples` as a line of block characters at most `width` wide.
pub fn sparkline(samples: &[f64], width: usize) -> String {
    if samples.is_empty() || width == 0 {
        return String::new();
    }
    let picked: Vec<f64> = if samples.len() <= width {
        samples.to_vec()
    } else {
        (0..width)
            .map(|i| samples[i * (samples.len() - 1) / (width - 1).max(1)])
            .collect()
    };

    let min = picked.iter().copied().fold(f64::INFINITY, f64::min);
    let max = picked.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    let top = SPARK_BLOCKS.len() - 1;

    picked
        .iter()
        .map(|v| {
            let level = if span > 0.0 {
                (((v - min) / span) * top as f64).round() as usize
            } else {
                top / 2
            };
            SPARK_BLOCKS[level.min(top)]
        })
        .collect()
}

fn sparkline_cell(row: &FlatAssetRecord) -> Cell {
    let color = match row.change7d {
        Some(change) if change < 0.0 => Color::Red,
        _ => Color::Green,
    };
    Cell::new(sparkline(&row.sparklines, SPARK_WIDTH)).fg(color)
}

fn sort_header(
    label: &str,
    column: SortColumn,
    indicator: (Option<SortColumn>, SortDirection),
) -> Cell {
    match indicator {
        (Some(active), SortDirection::Asc) if active == column => {
            ui::header_cell(&format!("{label} ▲"))
        }
        (Some(active), SortDirection::Desc) if active == column => {
            ui::header_cell(&format!("{label} ▼"))
        }
        _ => ui::header_cell(label),
    }
}

/// Renders the store's ordered view with a title and footer.
pub fn render(store: &ViewStore, options: &TableOptions) -> String {
    let Some(currency) = store.currency() else {
        return ui::style_text("No currency selected", ui::StyleType::Error);
    };
    let indicator = store.sort_indicator();

    let mut table = ui::new_styled_table();
    if let Some(width) = options.width {
        table.set_width(width);
    }
    table.set_header(vec![
        ui::header_cell("#"),
        sort_header("Name", SortColumn::Name, indicator),
        sort_header("Price", SortColumn::CurrentPrice, indicator),
        sort_header("24h %", SortColumn::Change24h, indicator),
        sort_header("7d %", SortColumn::Change7d, indicator),
        sort_header("Market Cap", SortColumn::MarketCap, indicator),
        sort_header("Volume (24h)", SortColumn::TotalVolume, indicator),
        sort_header("Circulating Supply", SortColumn::CirculatingSupply, indicator),
        ui::header_cell("Last 7 Days"),
    ]);

    let view = store.ordered_view();
    let shown = options.limit.unwrap_or(view.len()).min(view.len());
    for row in view.iter().take(shown) {
        let symbol = row.symbol.to_uppercase();
        table.add_row(vec![
            ui::optional_cell(row.market_cap_rank, |r| r.to_string()),
            Cell::new(format!("{}\n{}", row.name, symbol)),
            ui::optional_cell(row.current_price, |p| format_price(p, currency)),
            ui::change_cell(row.change24h),
            ui::change_cell(row.change7d),
            ui::optional_cell(row.market_cap, |v| format_large(v, currency, options.compact)),
            ui::optional_cell(row.total_volume, |v| format_large(v, currency, options.compact)),
            ui::optional_cell(row.circulating_supply, |s| {
                format!("{} {symbol}", format_number(s, 0, 0))
            }),
            sparkline_cell(row),
        ]);
    }
    if let Some(column) = table.column_mut(0) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    let mut output = format!(
        "Market: {}\n\n",
        ui::style_text(&currency.to_string(), ui::StyleType::Title)
    );
    output.push_str(&table.to_string());
    output.push_str(&format!("\n\nShowing {shown} of {} assets", view.len()));

    if let Some(fetched_at) = options.fetched_at {
        output.push_str(&ui::style_text(
            &format!(" (updated {})", fetched_at.format("%Y-%m-%d %H:%M:%S UTC")),
            ui::StyleType::Subtle,
        ));
    }

    if !store.excluded().is_empty() {
        output.push('\n');
        for e in store.excluded() {
            output.push_str(&format!(
                "\n{}",
                ui::style_text(&format!("Skipped: {e}"), ui::StyleType::Error)
            ));
        }
    }

    output
}

/// Lists the configured currencies, marking the active one.
pub fn render_currencies(currencies: &[Currency], active: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Symbol"),
        ui::header_cell("Kind"),
        ui::header_cell("Active"),
    ]);
    let active = active.trim().to_lowercase();
    for currency in currencies {
        let kind = if currency.is_fiat() { "FIAT" } else { "CRYPTO" };
        let marker = if currency.key() == active { "*" } else { "" };
        table.add_row(vec![
            Cell::new(currency.shorthand.to_uppercase()),
            Cell::new(&currency.symbol),
            Cell::new(kind),
            Cell::new(marker),
        ]);
    }
    table.to_string()
}
