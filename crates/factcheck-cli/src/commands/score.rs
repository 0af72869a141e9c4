//! Score command implementation.

use crate::cli::ScoreArgs;
use crate::error::Result;
use crate::output::Formatter;
use factcheck_domain::TrustScoreRenderer;

/// Execute the score command.
pub fn execute_score(args: ScoreArgs, formatter: &Formatter) -> Result<()> {
    let trust = TrustScoreRenderer::default().render(args.score);
    println!("{}", formatter.format_score(&trust)?);
    Ok(())
}
