use super::ui;
use crate::core::{
    HistoryStore, PeriodCatalog, PeriodResolver, RevaluationCalculator, RevaluationResult,
};
use anyhow::{Context, Result, bail};
use comfy_table::{Cell, CellAlignment};
use std::sync::Arc;
use tracing::info;

/// Largest amount the calculator accepts from the command line.
pub const MAX_AMOUNT: f64 = 1_000_000.0;

/// Parses a user-entered amount. Accepts both decimal separators and
/// grouping dots ("1.234,56", "1234.56", "1500") and enforces the
/// 0 < amount <= 1.000.000 bound before the calculator ever sees it.
pub fn parse_amount(input: &str) -> Result<f64> {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    let normalized = if cleaned.contains(',') {
        // Comma decimals, dots are grouping.
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };

    let amount: f64 = normalized
        .parse()
        .with_context(|| format!("'{input}' is not a valid amount"))?;

    if !amount.is_finite() || amount <= 0.0 {
        bail!("Amount must be greater than zero");
    }
    if amount > MAX_AMOUNT {
        bail!("Amount must not exceed {}", ui::format_eur(MAX_AMOUNT));
    }
    Ok(amount)
}

pub async fn run(
    amount_input: &str,
    year: i32,
    month: u32,
    save: bool,
    catalog: Arc<PeriodCatalog>,
    history: &HistoryStore,
) -> Result<()> {
    let amount = parse_amount(amount_input)?;

    let resolver = PeriodResolver::new(Arc::clone(&catalog));
    let (resolved_year, resolved_month) = resolver.resolve(year, month);
    if (resolved_year, resolved_month) != (year, month) {
        let label = catalog
            .find_exact(resolved_year, resolved_month)
            .map(|p| p.description.clone())
            .unwrap_or_else(|| format!("{resolved_month:02}/{resolved_year}"));
        println!(
            "{}",
            ui::style_text(
                &format!("No index for {month:02}/{year}, using the closest period: {label}"),
                ui::StyleType::Subtle,
            )
        );
    }

    let calculator = RevaluationCalculator::new(Arc::clone(&catalog));
    let result = calculator.calculate(amount, resolved_year, resolved_month)?;

    println!("{}", render_result(&result));

    if save {
        let entry = history
            .save(&result)
            .await
            .context("Failed to save the calculation to history")?;
        info!(id = %entry.id, "Calculation saved to history");
        println!(
            "\n{}",
            ui::style_text(&format!("Saved to history ({})", entry.id), ui::StyleType::Subtle)
        );
    }

    Ok(())
}

fn render_result(result: &RevaluationResult) -> String {
    let mut table = ui::new_styled_table();

    let label = |text: &str| Cell::new(text);
    let value = |text: String| Cell::new(text).set_alignment(CellAlignment::Right);

    table.add_row(vec![
        label("Original amount"),
        value(ui::format_eur(result.original_amount)),
    ]);
    table.add_row(vec![
        label("Revalued amount"),
        ui::highlight_cell(ui::format_eur(result.revalued_amount)),
    ]);
    table.add_row(vec![
        label("Difference"),
        value(ui::format_eur(result.difference)),
    ]);
    table.add_row(vec![label("Change"), ui::change_cell(result.percent_change)]);
    table.add_row(vec![
        label("Period"),
        value(format!("{} -> {}", result.start_period, result.end_period)),
    ]);
    table.add_row(vec![
        label("Index"),
        value(format!(
            "{} -> {}",
            ui::format_index(result.start_index),
            ui::format_index(result.end_index)
        )),
    ]);

    format!(
        "{}\n\n{table}",
        ui::style_text("Monetary revaluation", ui::StyleType::Title)
    )
}
