use anyhow::Result;
use chrono::Utc;

use mneme::store::ListOrder;

use crate::app::App;
use crate::render;
use crate::OutputFormat;

pub fn run(app: &App, order: ListOrder, limit: Option<usize>, format: &OutputFormat) -> Result<()> {
    let now = Utc::now();
    let records = app.store.list(order, limit);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        OutputFormat::Plain => {
            if records.is_empty() {
                println!("No words yet. Add one with: mneme add <word> <definition>");
                return Ok(());
            }

            for record in &records {
                let marker = if record.is_due(now) { "*" } else { " " };
                println!(
                    "{} {:<18} {:<42} reviews {:>3}  streak {:>2}  due {}",
                    marker,
                    render::truncate(&record.word, 18),
                    render::truncate(&record.definition, 42),
                    record.review_count,
                    record.streak,
                    render::format_due(record, now),
                );
            }

            println!();
            println!(
                "{} of {} words shown, {} due",
                records.len(),
                app.store.len(),
                app.store.due(now).len()
            );
        }
    }

    Ok(())
}
