//! Result command implementation, including the feedback prompt.

use crate::cli::ResultArgs;
use crate::commands::App;
use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use factcheck_domain::{Feedback, FeedbackCollector, FeedbackError, TrustScoreRenderer};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;

/// Execute the result command.
pub fn execute_result(args: ResultArgs, app: &App, formatter: &Formatter) -> Result<()> {
    let result = app.results().read().ok_or(CliError::NoResult)?;
    let trust = TrustScoreRenderer::default().render(result.score.into());
    println!("{}", formatter.format_result(&result, &trust)?);

    if args.no_feedback || formatter.format() != OutputFormat::Table {
        return Ok(());
    }

    let mut editor = DefaultEditor::new()?;
    let mut ask = |prompt: &str| -> Result<Option<String>> {
        match editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    };

    println!();
    if let Some(feedback) = collect_feedback(&mut ask, formatter)? {
        info!(kind = ?feedback.kind, "Feedback received");
        println!("{}", formatter.success("Thank you for your feedback!"));
    }
    Ok(())
}

/// Walk the feedback state machine with line prompts.
///
/// Returns `None` when the user skips or input ends before a terminal
/// state is reached.
pub fn collect_feedback(
    ask: &mut dyn FnMut(&str) -> Result<Option<String>>,
    formatter: &Formatter,
) -> Result<Option<Feedback>> {
    let mut collector = FeedbackCollector::new();

    loop {
        let Some(choice) = ask("Was this result helpful? [y/n, Enter to skip] ")? else {
            return Ok(None);
        };
        match choice.trim().to_lowercase().as_str() {
            "" | "skip" => return Ok(None),
            "y" | "yes" => return Ok(Some(collector.choose_positive()?.clone())),
            "n" | "no" => collector.choose_negative()?,
            other => {
                eprintln!("{}", formatter.warning(&format!("Unrecognized answer: {}", other)));
                continue;
            }
        }

        // Negative form is open
        loop {
            let Some(text) = ask("What was wrong with this result? ('cancel' to go back) ")? else {
                return Ok(None);
            };
            if text.trim().eq_ignore_ascii_case("cancel") {
                collector.cancel()?;
                break;
            }
            let attachment = ask("Attach a screenshot path (optional) ")?
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());

            match collector.submit_negative(&text, attachment) {
                Ok(feedback) => return Ok(Some(feedback.clone())),
                Err(FeedbackError::EmptyText) => {
                    eprintln!(
                        "{}",
                        formatter.warning("Please describe what was wrong, or type 'cancel'")
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
