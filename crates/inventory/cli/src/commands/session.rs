use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use inventory_cli::{manager::ProductManager, view::TerminalView};

#[derive(Clone, Debug, Subcommand)]
pub(crate) enum Command {
    /// Log in and keep the token for later commands
    Login(LoginArgs),

    /// Forget the stored token
    Logout,
}

impl Command {
    pub(crate) async fn run(self, manager: &ProductManager<TerminalView>) -> Result<()> {
        match self {
            Self::Login(args) => args.run(manager).await,
            Self::Logout => manager.logout().map_err(Into::into),
        }
    }
}

#[derive(Clone, Parser)]
pub(crate) struct LoginArgs {
    #[arg(short, long, env = "INVENTORY_USERNAME", default_value = "admin")]
    username: String,

    /// Prompted for without echo when omitted
    #[arg(long, env = "INVENTORY_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

// keep passwords out of logs
impl ::core::fmt::Debug for LoginArgs {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        f.debug_struct("LoginArgs")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl LoginArgs {
    async fn run(self, manager: &ProductManager<TerminalView>) -> Result<()> {
        let Self { username, password } = self;

        let password = match password {
            Some(password) => password,
            None => password_prompt()
                .prompt()
                .map_err(|error| anyhow!("failed to read the password: {error}"))?,
        };

        manager
            .login(&username, &password)
            .await
            .map_err(Into::into)
    }
}

fn password_prompt() -> Password<'static> {
    Password::new("Password:")
        .with_display_mode(PasswordDisplayMode::Hidden)
        .without_confirmation()
}
