//! CLI commands

use anyhow::{Context, Result};
use clap::Subcommand;
use healthtrack_core::{Access, FileTokenStorage, Role, Router};
use healthtrack_http::TypedClientBuilder;
use healthtrack_http::types::{LoginRequest, RegisterRequest};
use healthtrack_session::{SessionError, SessionStore};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config;

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and keep the session token
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "HEALTHTRACK_PASSWORD", hide_env_values = true)]
        password: String,

        /// Account type to log in as (USER or DOCTOR)
        #[arg(long, value_parser = parse_role)]
        user_type: Option<Role>,
    },

    /// Create an account and log in with it
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "HEALTHTRACK_PASSWORD", hide_env_values = true)]
        password: String,

        /// USER (patient) or DOCTOR
        #[arg(long, value_parser = parse_role)]
        user_type: Role,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        health_id: Option<i64>,
    },

    /// Forget the stored session
    Logout,

    /// Fetch and print the signed-in user's profile
    Profile,

    /// Show the current session
    Status,

    /// Resolve a route the way the web client would
    Navigate {
        /// Destination path, e.g. /dashboard
        to: String,

        /// Path the navigation starts from
        #[arg(long, default_value = "/")]
        from: String,
    },

    /// List the route table
    Routes,

    /// List the roles offered at sign-up
    Roles,

    /// Check whether a sign-up value is already taken
    Check {
        #[command(subcommand)]
        field: CheckCommands,
    },

    /// Configuration file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum CheckCommands {
    Username { value: String },
    HealthId { value: i64 },
    Phone { value: String },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write the default configuration file
    Init {
        /// Output file path (defaults to <data-dir>/healthtrack.json)
        output: Option<PathBuf>,
    },
}

fn parse_role(value: &str) -> Result<Role, String> {
    value.parse().map_err(|e: healthtrack_core::CoreError| e.to_string())
}

impl Commands {
    pub async fn execute(self, data_dir: &Path, config_file: Option<&Path>) -> Result<()> {
        match self {
            Self::Login {
                username,
                password,
                user_type,
            } => {
                let store = open_store(config_file, data_dir)?;
                let mut credentials = LoginRequest::new(username, password);
                credentials.user_type = user_type;
                store.login(&credentials).await?;
                print_landing(&store)
            }
            Self::Register {
                username,
                password,
                user_type,
                name,
                phone,
                health_id,
            } => {
                let store = open_store(config_file, data_dir)?;
                let mut user_data = RegisterRequest::new(username, password, user_type);
                if let Some(name) = name {
                    user_data = user_data.field("name", name);
                }
                if let Some(phone) = phone {
                    user_data = user_data.field("phone", phone);
                }
                if let Some(health_id) = health_id {
                    user_data = user_data.field("healthId", health_id);
                }
                store.register(&user_data).await?;
                print_landing(&store)
            }
            Self::Logout => {
                open_store(config_file, data_dir)?.logout();
                println!("Logged out");
                Ok(())
            }
            Self::Profile => {
                let store = open_store(config_file, data_dir)?;
                let profile = match store.fetch_profile().await {
                    Err(SessionError::NoToken) => anyhow::bail!("Not logged in"),
                    other => other?,
                };
                println!("{}", serde_json::to_string_pretty(&profile)?);
                Ok(())
            }
            Self::Status => {
                let store = open_store(config_file, data_dir)?;
                restore_or_warn(&store).await;
                let session = store.snapshot();
                let status = json!({
                    "authenticated": session.is_authenticated,
                    "has_token": session.token.is_some(),
                    "role": session.user_role(),
                    "username": session.user_name(),
                    "email": session.user_email(),
                });
                println!("{}", serde_json::to_string_pretty(&status)?);
                Ok(())
            }
            Self::Navigate { to, from } => {
                let store = open_store(config_file, data_dir)?;
                restore_or_warn(&store).await;
                let navigation = Router::default().navigate(&to, &from, &store.snapshot())?;

                for hop in &navigation.redirected_from {
                    println!("{hop} ->");
                }
                match navigation.route.and_then(|route| route.name) {
                    Some(name) => println!("{} ({name})", navigation.path),
                    None => println!("{} (no matching route)", navigation.path),
                }
                Ok(())
            }
            Self::Routes => {
                for route in Router::default().table().routes() {
                    let target = route
                        .redirect
                        .map_or_else(|| describe_access(route.access), |to| format!("redirect to {to}"));
                    println!(
                        "{:<20} {:<16} {target}",
                        route.path,
                        route.name.unwrap_or("-")
                    );
                }
                Ok(())
            }
            Self::Roles => {
                let store = open_store(config_file, data_dir)?;
                for role in store.client().roles().await?.roles {
                    println!("{role}");
                }
                Ok(())
            }
            Self::Check { field } => {
                let store = open_store(config_file, data_dir)?;
                let client = store.client();
                let exists = match field {
                    CheckCommands::Username { value } => client.username_exists(&value).await?,
                    CheckCommands::HealthId { value } => client.health_id_exists(value).await?,
                    CheckCommands::Phone { value } => client.phone_exists(&value).await?,
                };
                println!("{}", if exists { "taken" } else { "available" });
                Ok(())
            }
            Self::Config { command } => command.execute(data_dir),
        }
    }
}

impl ConfigCommands {
    pub fn execute(self, data_dir: &Path) -> Result<()> {
        match self {
            Self::Init { output } => {
                let config_path =
                    output.unwrap_or_else(|| data_dir.join(format!("{}.json", config::CONFIG_FILE_STEM)));

                // Create parent directory if it doesn't exist
                if let Some(parent) = config_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }

                config::generate_default_config(&config_path)?;
                println!("Generated configuration at: {}", config_path.display());
                Ok(())
            }
        }
    }
}

/// Build the session store from configuration
fn open_store(config_file: Option<&Path>, data_dir: &Path) -> Result<SessionStore> {
    let config = config::load_config(config_file, data_dir).context("Failed to load configuration")?;

    let mut builder = TypedClientBuilder::new().base_url(&config.api.base_url);
    if let Some(secs) = config.api.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if let Some(agent) = &config.api.user_agent {
        builder = builder.user_agent(agent);
    }
    let client = builder.build_public()?;

    let token_file = config.token_file(data_dir);
    info!(base_url = %client.base_url(), token_file = %token_file.display(), "Opening session");
    let storage = Arc::new(FileTokenStorage::new(token_file));

    Ok(SessionStore::new(client, storage))
}

/// Bring a persisted session back; an unreachable API leaves it signed out
async fn restore_or_warn(store: &SessionStore) {
    if let Err(e) = store.restore().await {
        warn!("Could not restore session: {e}");
    }
}

fn print_landing(store: &SessionStore) -> Result<()> {
    let navigation = Router::default().navigate("/login", "/login", &store.snapshot())?;
    println!(
        "Logged in as {} ({})",
        store
            .user_name()
            .or_else(|| store.user_email())
            .unwrap_or_else(|| "unknown".to_string()),
        store
            .user_role()
            .map_or_else(|| "no role".to_string(), |role| role.to_string())
    );
    println!("Landing page: {}", navigation.path);
    Ok(())
}

fn describe_access(access: Access) -> String {
    match access {
        Access::Public => "public".to_string(),
        Access::RequiresGuest => "guests only".to_string(),
        Access::RequiresAuth { role: None } => "signed in".to_string(),
        Access::RequiresAuth { role: Some(role) } => format!("signed in as {role}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert_eq!(parse_role("doctor").unwrap(), Role::Doctor);
        assert_eq!(parse_role("nurse").unwrap_err(), "Unknown role: NURSE");
    }

    #[test]
    fn test_describe_access() {
        assert_eq!(describe_access(Access::RequiresGuest), "guests only");
        assert_eq!(
            describe_access(Access::RequiresAuth {
                role: Some(Role::Doctor)
            }),
            "signed in as DOCTOR"
        );
    }

    #[test]
    fn test_open_store_picks_up_stored_token() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("session.json"), r#"{"token": "abc"}"#).unwrap();

        let store = open_store(None, dir.path()).unwrap();
        assert_eq!(store.token().as_deref(), Some("abc"));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_logout_recovers_from_corrupt_token_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let token_file = dir.path().join("session.json");
        std::fs::write(&token_file, "{not json").unwrap();

        let store = open_store(None, dir.path()).unwrap();
        assert!(store.token().is_none());

        store.logout();
        assert!(!token_file.exists());
    }
}
