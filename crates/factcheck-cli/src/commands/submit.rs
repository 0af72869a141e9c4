//! Submit command implementation.

use crate::cli::SubmitArgs;
use crate::commands::App;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use factcheck_domain::{ClaimDraft, FieldError, TrustScoreRenderer, ValidationReport};
use factcheck_submit::{
    parse_media_type, AttachmentStager, EntryPoint, PickedFile, SubmissionController,
    SubmissionError,
};
use std::sync::Arc;

/// Build a draft from command-line arguments (attachments excluded).
///
/// An unknown media type falls back to the default and is returned as a
/// field error; it does not stop the submission.
pub fn build_draft(args: &SubmitArgs) -> (ClaimDraft, Option<FieldError>) {
    let mut draft = ClaimDraft::new(args.title.as_str());
    draft.description = args.description.clone();
    for (i, source) in args.sources.iter().enumerate() {
        draft.set_source(i, source.as_str());
    }

    let media_error = match parse_media_type(&args.media_type) {
        Ok(media_type) => {
            draft.media_type = media_type;
            None
        }
        Err(error) => Some(error),
    };
    (draft, media_error)
}

/// Execute the submit command.
pub async fn execute_submit(args: SubmitArgs, app: &App, formatter: &Formatter) -> Result<()> {
    let (mut draft, media_error) = build_draft(&args);
    if let Some(error) = media_error {
        eprintln!("{}", formatter.warning(&error.to_string()));
    }

    if !args.attachments.is_empty() {
        let mut files = Vec::with_capacity(args.attachments.len());
        for path in &args.attachments {
            files.push(PickedFile::from_path(path).await?);
        }
        let stager = AttachmentStager::new(app.config.staging.clone());
        let staged = stager.stage(EntryPoint::FilePicker, files)?;
        if staged.len() < args.attachments.len() {
            eprintln!(
                "{}",
                formatter.warning("Skipped files that are not images or are larger than the limit")
            );
        }
        eprintln!(
            "{}",
            formatter.info(&format!("Uploading {} image(s)...", staged.len()))
        );
        stager.wait_idle().await;
        draft.attachments = stager.take();
    }

    let controller =
        SubmissionController::with_shared_service(Arc::clone(app.client()), app.results());

    match controller.submit(&draft).await {
        Ok(result) => {
            print_field_errors(&controller.last_report(), formatter);
            let trust = TrustScoreRenderer::default().render(result.score.into());
            println!("{}", formatter.format_result(&result, &trust)?);
            Ok(())
        }
        Err(SubmissionError::Validation(report)) => {
            print_field_errors(&report, formatter);
            Err(CliError::InvalidInput("the claim was not submitted".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

fn print_field_errors(report: &ValidationReport, formatter: &Formatter) {
    for error in report.errors() {
        eprintln!("{}", formatter.warning(&error.to_string()));
    }
}
