//! FactCheck CLI - check claims against the FactCheck service.

use clap::Parser;
use factcheck_cli::commands::{self, App};
use factcheck_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.clone();
    let config = match config_path.as_deref() {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let mut config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    config.apply_env();

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    if let Err(e) = run(cli, config, &formatter).await {
        eprintln!("{}", formatter.error(&format!("Error: {}", e)));
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr so JSON output on stdout stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: Cli, config: Config, formatter: &Formatter) -> factcheck_cli::Result<()> {
    config.validate()?;

    match cli.command {
        Some(Command::Score(args)) => commands::execute_score(args, formatter),
        Some(Command::Config(args)) => {
            commands::execute_config(args, &config, cli.config.as_deref(), formatter)
        }
        None => commands::execute_chat(Default::default(), &App::open(config)?, formatter).await,
        Some(Command::Submit(args)) => {
            commands::execute_submit(args, &App::open(config)?, formatter).await
        }
        Some(Command::Result(args)) => {
            commands::execute_result(args, &App::open(config)?, formatter)
        }
        Some(Command::Claims(args)) => {
            let app = App::open(config)?;
            commands::execute_claims(args, app.client(), formatter).await
        }
        Some(Command::Chat(args)) => {
            commands::execute_chat(args, &App::open(config)?, formatter).await
        }
        Some(Command::Login(args)) => {
            commands::execute_login(args, &App::open(config)?, formatter).await
        }
        Some(Command::Signup(args)) => {
            commands::execute_signup(args, &App::open(config)?, formatter).await
        }
        Some(Command::Logout) => commands::execute_logout(&App::open(config)?, formatter),
        Some(Command::Whoami) => commands::execute_whoami(&App::open(config)?, formatter).await,
    }
}
