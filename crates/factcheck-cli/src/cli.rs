//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use factcheck_domain::Verdict;
use factcheck_llm::ProviderKind;
use std::path::PathBuf;

/// FactCheck - verify claims and chat with the fact-checking assistant.
#[derive(Debug, Parser)]
#[command(name = "factcheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (bare values)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a claim for verification
    Submit(SubmitArgs),

    /// Show the latest verification result
    Result(ResultArgs),

    /// Render a trust score
    Score(ScoreArgs),

    /// Browse previously checked claims
    Claims(ClaimsArgs),

    /// Chat with the assistant (interactive unless a message is given)
    Chat(ChatArgs),

    /// Log in and remember the session
    Login(LoginArgs),

    /// Create an account
    Signup(SignupArgs),

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the submit command.
#[derive(Debug, Parser)]
pub struct SubmitArgs {
    /// The claim to check
    pub title: String,

    /// Additional context
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Source URL (repeatable)
    #[arg(short, long = "source")]
    pub sources: Vec<String>,

    /// Where the claim was seen: Article, "Social Media Post", Video, Other
    #[arg(short, long, default_value = "Article")]
    pub media_type: String,

    /// Image to attach (repeatable)
    #[arg(short, long = "attach")]
    pub attachments: Vec<PathBuf>,
}

/// Arguments for the result command.
#[derive(Debug, Parser)]
pub struct ResultArgs {
    /// Skip the feedback prompt
    #[arg(long)]
    pub no_feedback: bool,
}

/// Arguments for the score command.
#[derive(Debug, Parser)]
pub struct ScoreArgs {
    /// Score to render; clamped to 0-100
    #[arg(allow_negative_numbers = true)]
    pub score: i64,
}

/// Arguments for the claims command.
#[derive(Debug, Parser)]
pub struct ClaimsArgs {
    /// Case-insensitive text search over claim and explanation
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only show one verdict
    #[arg(short, long, value_enum)]
    pub verdict: Option<VerdictArg>,
}

/// Arguments for the chat command.
#[derive(Debug, Default, Parser)]
pub struct ChatArgs {
    /// Send one message and exit
    pub message: Option<String>,

    /// Where messages go
    #[arg(short, long, value_enum, default_value = "ai")]
    pub backend: BackendArg,

    /// Starting AI provider
    #[arg(short, long, value_enum)]
    pub provider: Option<ProviderArg>,
}

/// Arguments for the login command.
#[derive(Debug, Parser)]
pub struct LoginArgs {
    /// Email address
    pub email: String,

    /// Password
    #[arg(short, long, env = "FACTCHECK_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Arguments for the signup command.
#[derive(Debug, Parser)]
pub struct SignupArgs {
    /// First name
    #[arg(long)]
    pub first_name: String,

    /// Last name
    #[arg(long)]
    pub last_name: String,

    /// Email address
    #[arg(long)]
    pub email: String,

    /// Ten-digit phone number
    #[arg(long)]
    pub phone: String,

    /// Password (at least six characters)
    #[arg(long, env = "FACTCHECK_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Password again; defaults to the password
    #[arg(long)]
    pub confirm_password: Option<String>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Verdict filter.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum VerdictArg {
    /// Claims found true
    True,
    /// Claims found false
    False,
    /// Uncertain claims
    Neutral,
}

/// Chat destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum BackendArg {
    /// The FactCheck backend's chat endpoint
    Remote,
    /// The AI providers directly
    #[default]
    Ai,
}

/// AI provider.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ProviderArg {
    /// Google Gemini
    Gemini,
    /// OpenAI GPT via the chat host
    Gpt,
    /// xAI Grok via the chat host
    Grok,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<VerdictArg> for Verdict {
    fn from(verdict: VerdictArg) -> Self {
        match verdict {
            VerdictArg::True => Verdict::True,
            VerdictArg::False => Verdict::False,
            VerdictArg::Neutral => Verdict::Neutral,
        }
    }
}

impl From<ProviderArg> for ProviderKind {
    fn from(provider: ProviderArg) -> Self {
        match provider {
            ProviderArg::Gemini => ProviderKind::Gemini,
            ProviderArg::Gpt => ProviderKind::Gpt,
            ProviderArg::Grok => ProviderKind::Grok,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_command() {
        let cli = Cli::parse_from(["factcheck"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_submit_command() {
        let cli = Cli::parse_from([
            "factcheck",
            "submit",
            "Vaccines cause flu",
            "-s",
            "https://a.example.com",
            "--source",
            "https://b.example.com",
            "--media-type",
            "Social Media Post",
            "--attach",
            "chart.png",
            "-vv",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Command::Submit(args)) => {
                assert_eq!(args.title, "Vaccines cause flu");
                assert_eq!(args.sources.len(), 2);
                assert_eq!(args.media_type, "Social Media Post");
                assert_eq!(args.attachments, vec![PathBuf::from("chart.png")]);
                assert_eq!(args.description, "");
            }
            _ => panic!("Expected Submit command"),
        }
    }

    #[test]
    fn test_score_accepts_negative() {
        let cli = Cli::parse_from(["factcheck", "score", "-5"]);
        assert!(matches!(cli.command, Some(Command::Score(ScoreArgs { score: -5 }))));
    }

    #[test]
    fn test_chat_defaults() {
        let cli = Cli::parse_from(["factcheck", "chat"]);
        match cli.command {
            Some(Command::Chat(args)) => {
                assert_eq!(args.backend, BackendArg::Ai);
                assert!(args.message.is_none());
                assert!(args.provider.is_none());
            }
            _ => panic!("Expected Chat command"),
        }
    }

    #[test]
    fn test_claims_verdict_conversion() {
        let cli = Cli::parse_from(["factcheck", "claims", "--verdict", "neutral"]);
        match cli.command {
            Some(Command::Claims(args)) => {
                assert_eq!(args.verdict.map(Verdict::from), Some(Verdict::Neutral));
            }
            _ => panic!("Expected Claims command"),
        }
        let provider: ProviderKind = ProviderArg::Grok.into();
        assert_eq!(provider, ProviderKind::Grok);
    }
}
