//! Login, signup, logout and whoami.

use crate::cli::{LoginArgs, SignupArgs};
use crate::commands::App;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use factcheck_client::{ClientError, LoginForm, SignupForm};

fn report_invalid(err: ClientError, formatter: &Formatter) -> CliError {
    if let ClientError::Invalid(report) = &err {
        for error in report.errors() {
            eprintln!("{}", formatter.warning(&error.to_string()));
        }
    }
    err.into()
}

/// Execute the login command.
pub async fn execute_login(args: LoginArgs, app: &App, formatter: &Formatter) -> Result<()> {
    let form = LoginForm {
        email: args.email,
        password: args.password,
    };
    let user = app
        .session
        .login(&form)
        .await
        .map_err(|e| report_invalid(e, formatter))?;

    println!(
        "{}",
        formatter.success(&format!("Logged in as {}", user.display_name()))
    );
    Ok(())
}

/// Build the signup form; the confirmation defaults to the password.
pub fn signup_form(args: SignupArgs) -> SignupForm {
    let confirm_password = args
        .confirm_password
        .unwrap_or_else(|| args.password.clone());
    SignupForm {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        phone: args.phone,
        password: args.password,
        confirm_password,
    }
}

/// Execute the signup command.
pub async fn execute_signup(args: SignupArgs, app: &App, formatter: &Formatter) -> Result<()> {
    let message = app
        .session
        .signup(&signup_form(args))
        .await
        .map_err(|e| report_invalid(e, formatter))?;
    println!("{}", formatter.success(&message));
    Ok(())
}

/// Execute the logout command.
pub fn execute_logout(app: &App, formatter: &Formatter) -> Result<()> {
    app.session.logout()?;
    println!("{}", formatter.success("Logged out"));
    Ok(())
}

/// Execute the whoami command.
///
/// Re-validates the stored token; a rejected token is forgotten.
pub async fn execute_whoami(app: &App, formatter: &Formatter) -> Result<()> {
    let user = app.session.restore().await?.ok_or(CliError::NotLoggedIn)?;
    println!("{}", formatter.format_user(&user)?);
    Ok(())
}
