//! Styled spreadsheet emission.
//!
//! One named sheet, exactly the columns Ticker / Stock Price /
//! Market Capitalization / Number of Shares to Buy. Price and market-cap
//! columns carry a currency format, the shares column a plain integer
//! format; every written cell gets the dark theme and a thin border, and
//! every column a fixed width.

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, FormatBorder, Workbook};
use std::path::Path;
use tradeplan_core::AllocationPlan;

const COLUMNS: [&str; 4] = [
    "Ticker",
    "Stock Price",
    "Market Capitalization",
    "Number of Shares to Buy",
];

const BG_COLOR: u32 = 0x0A0A23;
const FONT_COLOR: u32 = 0xFFFFFF;
const COLUMN_WIDTH: f64 = 18.0;

fn base_format() -> Format {
    Format::new()
        .set_font_color(FONT_COLOR)
        .set_background_color(BG_COLOR)
        .set_border(FormatBorder::Thin)
}

/// Write the allocation plan as a styled workbook at `path`.
pub fn write_plan(plan: &AllocationPlan, path: &Path, sheet_name: &str) -> Result<()> {
    let string_format = base_format();
    let price_format = base_format().set_num_format("$0.00");
    let integer_format = base_format().set_num_format("0");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet
        .set_name(sheet_name)
        .with_context(|| format!("invalid sheet name '{sheet_name}'"))?;

    for (col, title) in COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &string_format)?;
    }

    for (i, position) in plan.positions.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string_with_format(row, 0, &position.symbol, &string_format)?;
        sheet.write_number_with_format(row, 1, position.price, &price_format)?;
        sheet.write_number_with_format(row, 2, position.market_cap, &price_format)?;
        sheet.write_number_with_format(row, 3, position.shares as f64, &integer_format)?;
    }

    for col in 0..COLUMNS.len() {
        sheet.set_column_width(col as u16, COLUMN_WIDTH)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed to write workbook {}", path.display()))?;
    Ok(())
}
