use super::ui;
use crate::core::PeriodCatalog;
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};

/// Prints the catalog as a table, optionally filtered to one year.
pub fn run(catalog: &PeriodCatalog, year: Option<i32>) -> Result<()> {
    let periods: Vec<_> = catalog
        .periods()
        .iter()
        .filter(|p| year.is_none_or(|y| p.year == y))
        .collect();

    if periods.is_empty() {
        // Only reachable with a filter; an unfiltered catalog is never empty.
        if let Some(y) = year {
            println!(
                "No periods for {y}. Available: {} - {}",
                catalog.earliest().description,
                catalog.latest().description
            );
        }
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Period"),
        ui::header_cell("Index (from)"),
        ui::header_cell("Index (to)"),
        ui::header_cell("Annual (%)"),
        ui::header_cell("Monthly (%)"),
        ui::header_cell("Average (%)"),
    ]);

    for period in &periods {
        table.add_row(vec![
            Cell::new(&period.description),
            Cell::new(ui::format_index(period.index_from)).set_alignment(CellAlignment::Right),
            Cell::new(ui::format_index(period.index_to)).set_alignment(CellAlignment::Right),
            ui::format_optional_cell(period.annual_inflation, ui::format_percent),
            ui::format_optional_cell(period.monthly_inflation, ui::format_percent),
            ui::format_optional_cell(period.average_inflation, ui::format_percent),
        ]);
    }

    println!("{table}");
    println!(
        "\nAvailable: {} - {} ({} periods)",
        ui::style_text(&catalog.earliest().description, ui::StyleType::Label),
        ui::style_text(&catalog.latest().description, ui::StyleType::Label),
        catalog.periods().len()
    );

    Ok(())
}
