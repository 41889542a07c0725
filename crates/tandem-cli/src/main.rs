//! Tandem CLI - reconcile this device's session against the shared
//! credential store from the terminal.
//!
//! `check` mirrors the mobile shells' foreground pass: read the shared
//! store, compare with the locally persisted record, and apply whatever
//! transition falls out. `login`/`logout` manage the local record directly
//! (manual pairing never writes to the shared store).

mod error;
mod keychain;

use std::env;

use clap::{Parser, Subcommand};
use serde::Serialize;

use tandem_core::checker::AuthChecker;
use tandem_core::credentials::DEFAULT_SYS_URL;
use tandem_core::reconcile::Intent;
use tandem_core::source::{keyed::DEFAULT_ACCESS_GROUP, KeyedAuthSource};
use tandem_core::store::{CredentialStore, StoredCredentials};
use tokio::sync::mpsc;

use crate::error::CliError;
use crate::keychain::{KeyringCredentialStore, KeyringSecretReader};

#[derive(Parser)]
#[command(name = "tandem")]
#[command(about = "Reconcile the local session against the shared credential store")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Keychain access group shared with the master app
    #[arg(long, value_name = "GROUP")]
    access_group: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the locally persisted session record
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run one reconciliation pass against the shared credential store
    Check,
    /// Pair manually by storing credentials in the local record
    Login {
        /// Access token issued for this client
        access_token: String,
        /// Client key identifying this pairing
        client_key: String,
        /// Workspace base URL
        #[arg(long, default_value = DEFAULT_SYS_URL)]
        sys_url: String,
        /// Workspace display name
        #[arg(long, default_value = "")]
        system: String,
    },
    /// Clear the locally persisted session record
    Logout,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tandem=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let access_group = resolve_access_group(cli.access_group);

    match cli.command {
        Commands::Status { json } => run_status(json),
        Commands::Check => run_check(access_group).await,
        Commands::Login {
            access_token,
            client_key,
            sys_url,
            system,
        } => run_login(&access_token, &client_key, sys_url, system),
        Commands::Logout => run_logout(),
    }
}

fn resolve_access_group(flag: Option<String>) -> String {
    flag.or_else(|| env::var("TANDEM_ACCESS_GROUP").ok())
        .unwrap_or_else(|| DEFAULT_ACCESS_GROUP.to_string())
}

#[derive(Debug, PartialEq, Eq, Serialize)]
struct StatusView {
    signed_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sys_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_name: Option<String>,
}

impl StatusView {
    fn from_record(record: Option<&StoredCredentials>) -> Self {
        match record.filter(|record| record.is_valid()) {
            Some(record) => Self {
                signed_in: true,
                client_key: Some(record.client_key.clone()),
                sys_url: Some(record.sys_url.clone()),
                system_name: Some(record.system_name.clone()),
            },
            None => Self {
                signed_in: false,
                client_key: None,
                sys_url: None,
                system_name: None,
            },
        }
    }
}

fn run_status(json: bool) -> Result<(), CliError> {
    let record = KeyringCredentialStore.load()?;
    let view = StatusView::from_record(record.as_ref());

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else if view.signed_in {
        println!(
            "Signed in: client {} at {}{}",
            view.client_key.as_deref().unwrap_or_default(),
            view.sys_url.as_deref().unwrap_or_default(),
            view.system_name
                .as_deref()
                .filter(|name| !name.is_empty())
                .map(|name| format!(" ({name})"))
                .unwrap_or_default(),
        );
    } else {
        println!("Not signed in.");
    }
    Ok(())
}

async fn run_check(access_group: String) -> Result<(), CliError> {
    tracing::debug!("Reading shared credentials from access group '{access_group}'");
    let source = KeyedAuthSource::new(KeyringSecretReader::new(access_group));
    let (events, _observer) = mpsc::unbounded_channel();
    let mut checker = AuthChecker::new(source, KeyringCredentialStore, events);

    checker.restore()?;
    let restored = checker.session().is_signed();
    let intent = checker.run_check().await?;

    println!("{}", describe_intent(&intent, restored));
    println!("Session stage: {:?}", checker.session().stage);
    Ok(())
}

fn run_login(
    access_token: &str,
    client_key: &str,
    sys_url: String,
    system: String,
) -> Result<(), CliError> {
    if access_token.is_empty() {
        return Err(CliError::EmptyAccessToken);
    }
    if client_key.is_empty() {
        return Err(CliError::EmptyClientKey);
    }

    let record = StoredCredentials {
        client_key: client_key.to_string(),
        client_secret: String::new(),
        access_token: access_token.to_string(),
        sys_url,
        system_name: system,
        intercom_token: String::new(),
    };
    KeyringCredentialStore.save(&record)?;
    println!("Paired manually as client {} at {}", record.client_key, record.sys_url);
    Ok(())
}

fn run_logout() -> Result<(), CliError> {
    KeyringCredentialStore.clear()?;
    println!("Cleared the local session record.");
    Ok(())
}

fn describe_intent(intent: &Intent, was_signed: bool) -> String {
    match intent {
        Intent::None if was_signed => {
            "No change: the local session matches the shared store.".to_string()
        }
        Intent::None => "No change.".to_string(),
        Intent::GoGuest => "No shared credentials found; staying signed out.".to_string(),
        Intent::Logout => "Shared credentials are gone; signed out locally.".to_string(),
        Intent::Login(bundle) => format!(
            "Picked up shared credentials for client {} at {}; signed in.",
            bundle.client_key, bundle.sys_url
        ),
        Intent::SwitchAccount(bundle) => format!(
            "Another account owns the shared store; switched to client {} at {}.",
            bundle.client_key, bundle.sys_url
        ),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use tandem_core::credentials::RawCredentials;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn status_view_requires_a_valid_record() {
        let invalid = StoredCredentials {
            client_key: "key-k".to_string(),
            ..StoredCredentials::default()
        };
        let view = StatusView::from_record(Some(&invalid));
        assert!(!view.signed_in);
        assert_eq!(view.client_key, None);
    }

    #[test]
    fn status_view_carries_workspace_fields() {
        let record = StoredCredentials {
            client_key: "key-k".to_string(),
            access_token: "token-a".to_string(),
            sys_url: "acme.base.vn".to_string(),
            system_name: "Acme".to_string(),
            ..StoredCredentials::default()
        };
        let view = StatusView::from_record(Some(&record));
        assert!(view.signed_in);
        assert_eq!(view.sys_url.as_deref(), Some("acme.base.vn"));
    }

    #[test]
    fn status_json_never_contains_secrets() {
        let record = StoredCredentials {
            client_key: "key-k".to_string(),
            access_token: "token-a".to_string(),
            client_secret: "secret-s".to_string(),
            ..StoredCredentials::default()
        };
        let raw = serde_json::to_string(&StatusView::from_record(Some(&record))).unwrap();
        assert!(!raw.contains("token-a"));
        assert!(!raw.contains("secret-s"));
    }

    #[test]
    fn describe_intent_mentions_the_target_account() {
        let bundle = RawCredentials {
            access_token: Some("token-b".to_string()),
            client_key: Some("key-k".to_string()),
            ..RawCredentials::default()
        }
        .normalize()
        .unwrap();
        let rendered = describe_intent(&Intent::SwitchAccount(bundle), true);
        assert!(rendered.contains("key-k"));
        assert!(rendered.contains("base.vn"));
    }

    #[test]
    fn resolve_access_group_prefers_the_flag() {
        assert_eq!(
            resolve_access_group(Some("custom.group".to_string())),
            "custom.group"
        );
    }

    #[test]
    fn default_sys_url_matches_the_core_default() {
        // `login` without --sys-url must land on the reconciler's identity
        // default, or a later check would see a different triple.
        assert_eq!(DEFAULT_SYS_URL, "base.vn");
    }
}
