//! Claims command implementation.

use crate::cli::ClaimsArgs;
use crate::error::Result;
use crate::output::Formatter;
use factcheck_client::FactCheckClient;
use factcheck_domain::ClaimFilter;

/// Build the catalogue filter from arguments.
pub fn build_filter(args: &ClaimsArgs) -> ClaimFilter {
    ClaimFilter {
        search: args.search.clone(),
        verdict: args.verdict.map(Into::into),
    }
}

/// Execute the claims command.
pub async fn execute_claims(
    args: ClaimsArgs,
    client: &FactCheckClient,
    formatter: &Formatter,
) -> Result<()> {
    let claims = client.list_claims().await?;
    let filter = build_filter(&args);
    let shown = filter.apply(&claims);

    println!("{}", formatter.format_claims(&shown)?);
    if shown.len() != claims.len() {
        eprintln!(
            "{}",
            formatter.info(&format!("{} of {} claims match", shown.len(), claims.len()))
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::VerdictArg;
    use factcheck_domain::Verdict;

    #[test]
    fn test_filter_construction() {
        let filter = build_filter(&ClaimsArgs {
            search: Some("bats".to_string()),
            verdict: Some(VerdictArg::False),
        });
        assert_eq!(filter.search.as_deref(), Some("bats"));
        assert_eq!(filter.verdict, Some(Verdict::False));

        let all = build_filter(&ClaimsArgs {
            search: None,
            verdict: None,
        });
        assert_eq!(all, ClaimFilter::default());
    }
}
