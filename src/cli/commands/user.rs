use clap::Subcommand;
use serde_json::json;

use super::open_pg_store;
use crate::cli::{utils::output_success, OutputFormat};
use crate::services::UserService;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a user account")]
    Create {
        #[arg(help = "Email address (unique)")]
        email: String,
        #[arg(long, default_value = "", help = "Display name")]
        name: String,
    },

    #[command(about = "Issue a bearer token for an existing user")]
    Token {
        #[arg(help = "Email address")]
        email: String,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = open_pg_store().await?;
    let users = UserService::new(&store);

    match cmd {
        UserCommands::Create { email, name } => {
            let user = users.create_user(&email, &name).await?;
            output_success(
                &output_format,
                &format!("Created user '{}'", user.email),
                Some(json!({
                    "id": user.id,
                    "email": user.email,
                    "name": user.name,
                })),
            )
        }
        UserCommands::Token { email } => {
            let token = users.issue_token(&email).await?;
            output_success(
                &output_format,
                &format!("Issued token for '{}'", email),
                Some(json!({ "token": token })),
            )
        }
    }
}
