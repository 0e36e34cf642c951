use anyhow::Result;
use chrono::Utc;

use crate::app::App;
use crate::render;
use crate::OutputFormat;

pub fn run(
    app: &mut App,
    word: &str,
    definition: &str,
    context: Option<&str>,
    format: &OutputFormat,
) -> Result<()> {
    let now = Utc::now();
    let record = app.store.add(word, definition, context, now)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        OutputFormat::Plain => {
            println!("Added '{}' ({} words total)", record.word, app.store.len());
            println!("  definition:  {}", record.definition);
            if !record.context.is_empty() {
                println!("  context:     {}", record.context);
            }
            println!("  next review: {}", render::format_due(&record, now));
        }
    }

    Ok(())
}
