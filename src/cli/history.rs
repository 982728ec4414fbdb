use super::ui;
use crate::core::{HistoryStore, MAX_HISTORY_ITEMS};
use anyhow::{Context, Result};
use comfy_table::Cell;

pub async fn list(history: &HistoryStore) -> Result<()> {
    let entries = history.list().await;

    if entries.is_empty() {
        println!("No calculations saved yet.");
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Id"),
        ui::header_cell("Saved"),
        ui::header_cell("Amount"),
        ui::header_cell("Revalued"),
        ui::header_cell("Change"),
        ui::header_cell("Period"),
    ]);

    for entry in &entries {
        table.add_row(vec![
            Cell::new(&entry.id),
            Cell::new(ui::format_timestamp(&entry.timestamp)),
            Cell::new(ui::format_eur(entry.result.original_amount)),
            Cell::new(ui::format_eur(entry.result.revalued_amount)),
            ui::change_cell(entry.result.percent_change),
            Cell::new(format!(
                "{} -> {}",
                entry.result.start_period, entry.result.end_period
            )),
        ]);
    }

    println!("{table}");
    println!(
        "\n{} of {MAX_HISTORY_ITEMS} calculations kept.",
        ui::style_text(&entries.len().to_string(), ui::StyleType::Label)
    );

    Ok(())
}

pub async fn delete(history: &HistoryStore, id: &str) -> Result<()> {
    let before = history.list().await.len();
    let remaining = history
        .delete(id)
        .await
        .context("Failed to update the history")?;

    if remaining.len() == before {
        println!("No calculation with id {id}.");
    } else {
        println!("Removed calculation {id}.");
    }
    Ok(())
}

pub async fn clear(history: &HistoryStore) -> Result<()> {
    history.clear().await.context("Failed to clear the history")?;
    println!("History cleared.");
    Ok(())
}
