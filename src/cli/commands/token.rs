use clap::Args;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::{utils::output_success, OutputFormat};
use crate::config::config;
use crate::types::OwnerId;

#[derive(Args, Debug)]
pub struct TokenArgs {
    #[arg(help = "Owner identifier placed in the token subject")]
    pub owner_id: String,

    #[arg(long, default_value = "dev@localhost", help = "Email claim")]
    pub email: String,

    #[arg(long, help = "Display name claim")]
    pub name: Option<String>,
}

pub fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let security = &config().security;
    let owner = OwnerId::new(args.owner_id);
    let claims = Claims::new(&owner, args.email, args.name, security.jwt_expiry_hours);
    let token = generate_jwt(&claims, &security.jwt_secret)?;

    match output_format {
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
        OutputFormat::Json => output_success(
            output_format,
            "Token issued",
            Some(json!({
                "token": token,
                "owner_id": owner,
                "expires_at": claims.exp,
            })),
        ),
    }
}
