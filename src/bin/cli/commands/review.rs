use std::io::{self, BufRead, Write};

use anyhow::Result;
use chrono::Utc;

use mneme::models::{QuizMode, ReviewOutcome, WordRecord};
use mneme::session::{ReviewSession, SessionState};

use crate::app::App;
use crate::render;
use crate::OutputFormat;

/// What the user chose at a prompt
enum Choice {
    Outcome(ReviewOutcome),
    Skip,
}

pub fn run(
    app: &mut App,
    mode: QuizMode,
    limit: Option<usize>,
    format: &OutputFormat,
) -> Result<()> {
    let mut session = ReviewSession::new(mode, app.store.config().clone());
    session.start(&app.store, Utc::now())?;

    if session.state() == SessionState::Completed {
        match format {
            OutputFormat::Json => print_summary_json(&session)?,
            OutputFormat::Plain => println!("Nothing is due right now."),
        }
        return Ok(());
    }

    println!("{} words due.", session.remaining());

    let stdin = io::stdin();
    let mut input = stdin.lock();

    while session.state() == SessionState::InProgress {
        if let Some(limit) = limit {
            if session.graded_count() >= limit {
                session.abort()?;
                break;
            }
        }

        let record = session.current()?.clone();
        let choice = match session.quiz_mode() {
            QuizMode::WordToDefinition => prompt_word_first(&mut input, &record)?,
            QuizMode::DefinitionToWord => prompt_definition_first(&mut input, &record)?,
        };

        match choice {
            Choice::Skip => session.skip()?,
            Choice::Outcome(outcome) => {
                if let Some(updated) = session.grade(&mut app.store, outcome, Utc::now())? {
                    println!("Next review: {}", render::format_timestamp(updated.due_at));
                }
            }
        }
    }

    match format {
        OutputFormat::Json => print_summary_json(&session)?,
        OutputFormat::Plain => print_summary(&session),
    }

    Ok(())
}

fn prompt_word_first(input: &mut impl BufRead, record: &WordRecord) -> Result<Choice> {
    println!();
    println!("Word: {}", record.word);
    if !record.context.is_empty() {
        println!("Context: {}", record.context);
    }
    print!("Press Enter to reveal the definition ");
    io::stdout().flush()?;
    if read_line(input)?.is_none() {
        return Ok(Choice::Outcome(ReviewOutcome::Quit));
    }

    println!("Definition: {}", record.definition);
    prompt_grade(input)
}

/// The context usually contains the word itself, so this direction never
/// shows it.
fn prompt_definition_first(input: &mut impl BufRead, record: &WordRecord) -> Result<Choice> {
    println!();
    println!("Definition: {}", record.definition);
    print!("Your word (Enter to reveal): ");
    io::stdout().flush()?;

    let answer = match read_line(input)? {
        Some(line) => line.trim().to_string(),
        None => return Ok(Choice::Outcome(ReviewOutcome::Quit)),
    };

    if answer.is_empty() {
        println!("The word was: {}", record.word);
        return prompt_grade(input);
    }

    if answer.to_lowercase() == record.word.to_lowercase() {
        println!("Correct: {}", record.word);
        Ok(Choice::Outcome(ReviewOutcome::Remembered))
    } else {
        println!("Not quite. The word was: {}", record.word);
        Ok(Choice::Outcome(ReviewOutcome::Forgotten))
    }
}

fn prompt_grade(input: &mut impl BufRead) -> Result<Choice> {
    loop {
        print!("Remembered? [y/n/s/q] ");
        io::stdout().flush()?;

        let line = match read_line(input)? {
            Some(line) => line,
            None => return Ok(Choice::Outcome(ReviewOutcome::Quit)),
        };

        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(Choice::Outcome(ReviewOutcome::Remembered)),
            "n" | "no" => return Ok(Choice::Outcome(ReviewOutcome::Forgotten)),
            "s" | "skip" => return Ok(Choice::Skip),
            "q" | "quit" => return Ok(Choice::Outcome(ReviewOutcome::Quit)),
            _ => println!("y = remembered, n = forgot, s = skip, q = quit"),
        }
    }
}

/// One line from the reader, or `None` at end of input
fn read_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    let bytes = input.read_line(&mut line)?;
    if bytes == 0 {
        Ok(None)
    } else {
        Ok(Some(line))
    }
}

fn print_summary(session: &ReviewSession) {
    let forgotten = session.graded_count() - session.remembered_count();
    println!();
    match session.state() {
        SessionState::Aborted => println!(
            "Stopped early: {} graded ({} remembered, {} forgot), {} skipped, {} still waiting",
            session.graded_count(),
            session.remembered_count(),
            forgotten,
            session.skipped_count(),
            session.remaining(),
        ),
        _ => println!(
            "Session done: {} graded ({} remembered, {} forgot), {} skipped",
            session.graded_count(),
            session.remembered_count(),
            forgotten,
            session.skipped_count(),
        ),
    }
}

fn print_summary_json(session: &ReviewSession) -> Result<()> {
    let summary = serde_json::json!({
        "state": format!("{:?}", session.state()),
        "graded": session.graded_count(),
        "remembered": session.remembered_count(),
        "forgotten": session.graded_count() - session.remembered_count(),
        "skipped": session.skipped_count(),
        "remaining": session.remaining(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
