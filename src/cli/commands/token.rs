use anyhow::Context;
use clap::{Args, Subcommand};
use serde_json::json;

use crate::auth::{mint_token, Claims, JwtError, JwtVerifier, DEFAULT_ROLE, DEFAULT_SUBJECT};
use crate::cli::OutputFormat;
use crate::config::PLACEHOLDER_JWT_SECRET;

#[derive(Args, Debug, Clone, Default)]
pub struct SecretArgs {
    #[arg(long, env = "JWT_SECRET", hide_env_values = true, help = "HS256 signing secret")]
    pub secret: Option<String>,
}

impl SecretArgs {
    /// Explicit flag, then `JWT_SECRET`, then the development placeholder.
    pub fn resolve(&self) -> String {
        match self.secret.as_deref().filter(|s| !s.is_empty()) {
            Some(secret) => secret.to_string(),
            None => {
                tracing::warn!(
                    "JWT_SECRET not set; using the development placeholder. The server will not accept it."
                );
                PLACEHOLDER_JWT_SECRET.to_string()
            }
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum TokenCommands {
    #[command(about = "Print a signed developer token")]
    Mint {
        #[command(flatten)]
        secret: SecretArgs,
        #[arg(long, default_value = DEFAULT_SUBJECT, help = "Subject claim")]
        sub: String,
        #[arg(long, default_value = DEFAULT_ROLE, help = "Role claim")]
        role: String,
        #[arg(
            long,
            value_parser = clap::value_parser!(i64).range(1..),
            help = "Add an exp claim this many hours from now"
        )]
        expires_in_hours: Option<i64>,
    },

    #[command(about = "Verify a token and print its claims")]
    Verify {
        #[command(flatten)]
        secret: SecretArgs,
        #[arg(help = "Compact JWT to verify")]
        token: String,
    },
}

pub fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Mint { secret, sub, role, expires_in_hours } => {
            let mut claims = Claims::new(sub, role);
            if let Some(hours) = expires_in_hours {
                let lifetime = chrono::Duration::try_hours(hours).ok_or(JwtError::InvalidLifetime)?;
                claims = claims.expiring_in(lifetime)?;
            }
            let token = mint_token(&secret.resolve(), &claims)?;

            match output_format {
                OutputFormat::Json => println!("{}", json!({ "token": token, "claims": claims })),
                OutputFormat::Text => println!("{}", token),
            }
            Ok(())
        }
        TokenCommands::Verify { secret, token } => {
            let claims = JwtVerifier::new(&secret.resolve())?
                .verify(token.trim())
                .context("token rejected")?;

            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string(&claims)?),
                OutputFormat::Text => {
                    println!("sub:  {}", claims.sub);
                    println!("role: {}", claims.role);
                    if let Some(exp) = claims.exp {
                        println!("exp:  {}", exp);
                    }
                }
            }
            Ok(())
        }
    }
}
