use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use fintrack::auth::Auth;
use fintrack::config::ConfigArgs;
use fintrack::display::{display_json, DisplayStyle};
use fintrack::table::Table;
use fintrack::time::{format_millis, format_until_millis};
use serde::Serialize;

use super::{build_client, RunCommand};

/// Show whether a session is stored and who it belongs to.
#[derive(Args)]
pub struct StatusArgs {
    /// The display style.
    #[arg(short, long, default_value = "table")]
    pub output: DisplayStyle,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Serialize)]
struct Status {
    authenticated: bool,
    user_id: Option<String>,
    email: Option<String>,
    expires_at: Option<u64>,
}

#[async_trait]
impl RunCommand for StatusArgs {
    async fn run(&self) -> Result<()> {
        let client = build_client(&self.config)?;
        let auth = Auth::new(client.clone());

        let state = auth.check_auth_status();
        let expires_at = if state.authenticated {
            client.session().get_tokens()?.map(|tokens| tokens.expires_at)
        } else {
            None
        };
        let status = Status {
            authenticated: state.authenticated,
            user_id: state.user.as_ref().map(|u| u.id.clone()),
            email: state
                .user
                .as_ref()
                .map(|u| u.email.clone())
                .filter(|email| !email.is_empty()),
            expires_at,
        };

        match self.output {
            DisplayStyle::Json => display_json(status),
            DisplayStyle::Table => {
                show_status(status);
                Ok(())
            }
        }
    }
}

fn show_status(status: Status) {
    let mut table = Table::with_capacity(5);
    table.add(vec![String::from("Field"), String::from("Value")]);
    table.add(vec![String::from("Authenticated"), status.authenticated.to_string()]);
    if let Some(user_id) = status.user_id {
        table.add(vec![String::from("User"), user_id]);
    }
    if let Some(email) = status.email {
        table.add(vec![String::from("Email"), email]);
    }
    if let Some(expires_at) = status.expires_at {
        table.add(vec![
            String::from("Token expires"),
            format!(
                "{} ({})",
                format_millis(expires_at),
                format_until_millis(expires_at)
            ),
        ]);
    }
    table.show();
}
