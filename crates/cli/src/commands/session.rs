//! Session commands.

use std::io::{self, BufRead};

use hostdeck_admin::AdminError;
use secrecy::SecretString;
use tracing::info;

use super::{CliError, Console};

/// Log in and persist the token.
///
/// The password comes from stdin with `--password-stdin`, otherwise from
/// `HOSTDECK_PASSWORD`.
pub async fn login(console: &Console, username: &str, password_stdin: bool) -> Result<(), CliError> {
    let password = read_password(password_stdin)?;
    console.gateway.login(username, &password).await?;

    info!(%username, "Logged in");
    console.line(format!("Logged in as {username}"))
}

/// Forget the persisted session. Succeeds when already logged out.
pub async fn logout(console: &Console) {
    console.gateway.logout().await;
    info!("Logged out");
}

/// Report whether the persisted session is still accepted.
pub async fn whoami(console: &Console) -> Result<(), CliError> {
    if console.gateway.restore().await {
        console.line("Authenticated")
    } else {
        Err(AdminError::Unauthenticated.into())
    }
}

fn read_password(from_stdin: bool) -> Result<SecretString, CliError> {
    let password = if from_stdin {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        line.trim_end_matches(['\r', '\n']).to_owned()
    } else {
        std::env::var("HOSTDECK_PASSWORD").map_err(|_| {
            CliError::Input("no password: use --password-stdin or set HOSTDECK_PASSWORD".into())
        })?
    };

    if password.is_empty() {
        return Err(CliError::Input("password is empty".into()));
    }
    Ok(SecretString::from(password))
}
