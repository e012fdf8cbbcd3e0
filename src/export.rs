use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::models::BudgetDocument;

const HEADER: [&str; 5] = ["id", "name", "budgeted", "spent", "remaining"];

/// Write a budget's categories to a CSV file. Returns the category count.
pub(crate) fn export_budget(doc: &BudgetDocument, path: &Path) -> Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_budget_csv(doc, file)
}

/// One row per category followed by a `TOTAL` row.
pub(crate) fn write_budget_csv<W: Write>(doc: &BudgetDocument, out: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(HEADER)?;

    for cat in &doc.categories {
        wtr.write_record([
            cat.id.to_string(),
            cat.name.clone(),
            format!("{:.2}", cat.budgeted),
            format!("{:.2}", cat.spent),
            format!("{:.2}", cat.remaining),
        ])
        .context("Failed to write CSV record")?;
    }

    wtr.write_record([
        String::new(),
        "TOTAL".to_string(),
        format!("{:.2}", doc.total_budgeted()),
        format!("{:.2}", doc.total_spent()),
        format!("{:.2}", doc.total_remaining()),
    ])?;
    wtr.flush().context("Failed to flush CSV output")?;
    Ok(doc.categories.len())
}
