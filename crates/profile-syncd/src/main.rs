// # profile-syncd - GitHub to Freshdesk profile sync
//
// This binary is a THIN integration layer:
// 1. Parsing the command line
// 2. Reading credentials and overrides from environment variables
// 3. Initializing logging and the runtime
// 4. Registering clients and running one sync
//
// All sync logic lives in profile-sync-core and the client crates.
//
// ## Command Line
//
// - `--github-username <NAME>`: GitHub user to sync (required)
// - `--freshdesk-subdomain <SUB>`: Freshdesk account subdomain (required)
// - `--dry-run`: Look up the contact but do not write it
//
// ## Environment
//
// - `GITHUB_TOKEN`: GitHub token (required, empty for anonymous requests)
// - `FRESHDESK_TOKEN`: Freshdesk API key (required)
// - `GITHUB_API_URL`: GitHub API base URL (optional)
// - `FRESHDESK_BASE_URL`: Freshdesk base URL, replaces the subdomain URL (optional)
// - `PROFILE_SYNC_HTTP_TIMEOUT_SECS`: Timeout for both clients, 1-300 (optional)
// - `LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export GITHUB_TOKEN=ghp_xxx
// export FRESHDESK_TOKEN=your_api_key
//
// profile-syncd --github-username octocat --freshdesk-subdomain acme
// ```

use anyhow::Result;
use clap::Parser;
use profile_sync_core::config::{DEFAULT_GITHUB_API_URL, DestinationConfig, SourceConfig, SyncConfig};
use profile_sync_core::{ClientRegistry, SyncEngine, SyncOutcome, UpsertResult};
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the possible run endings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProfileSyncExitCode {
    /// Contact created, updated or (dry-run) checked
    Success = 0,
    /// Bad arguments, environment or username
    ConfigError = 1,
    /// The sync itself failed
    RunFailure = 2,
}

impl From<ProfileSyncExitCode> for ExitCode {
    fn from(code: ProfileSyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Sync one GitHub user's public profile into a Freshdesk contact
#[derive(Debug, Parser)]
#[command(name = "profile-syncd", version, about)]
struct Cli {
    /// GitHub username to sync
    #[arg(long)]
    github_username: String,

    /// Freshdesk account subdomain, as in <SUB>.freshdesk.com
    #[arg(long)]
    freshdesk_subdomain: String,

    /// Look up the contact but do not create or update it
    #[arg(long)]
    dry_run: bool,
}

/// Application configuration
#[derive(Debug)]
struct Config {
    github_username: String,
    github_token: Option<String>,
    github_api_url: String,
    freshdesk_subdomain: String,
    freshdesk_token: String,
    freshdesk_base_url: Option<String>,
    http_timeout_secs: Option<u64>,
    dry_run: bool,
    log_level: String,
}

impl Config {
    /// Load configuration from the parsed command line and environment variables
    fn from_env(cli: Cli) -> Result<Self> {
        Self::from_vars(cli, |key| env::var(key).ok())
    }

    fn from_vars(cli: Cli, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let github_token = var("GITHUB_TOKEN").ok_or_else(|| {
            anyhow::anyhow!(
                "GITHUB_TOKEN is required (may be empty for anonymous access). \
                Set it via: export GITHUB_TOKEN=your_token"
            )
        })?;
        let freshdesk_token = var("FRESHDESK_TOKEN").ok_or_else(|| {
            anyhow::anyhow!(
                "FRESHDESK_TOKEN is required. \
                Set it via: export FRESHDESK_TOKEN=your_api_key"
            )
        })?;

        let http_timeout_secs = match var("PROFILE_SYNC_HTTP_TIMEOUT_SECS") {
            Some(raw) => Some(raw.trim().parse().map_err(|_| {
                anyhow::anyhow!(
                    "PROFILE_SYNC_HTTP_TIMEOUT_SECS must be a whole number of seconds. Got: {}",
                    raw
                )
            })?),
            None => None,
        };

        Ok(Self {
            github_username: cli.github_username,
            github_token: Some(github_token).filter(|t| !t.is_empty()),
            github_api_url: var("GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            freshdesk_subdomain: cli.freshdesk_subdomain,
            freshdesk_token,
            freshdesk_base_url: var("FRESHDESK_BASE_URL").filter(|u| !u.is_empty()),
            http_timeout_secs,
            dry_run: cli.dry_run,
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// Client settings are checked again by the client configs; this catches
    /// what only the binary knows about.
    fn validate(&self) -> Result<()> {
        if self.freshdesk_token.is_empty() {
            anyhow::bail!(
                "FRESHDESK_TOKEN cannot be empty. \
                Find your API key under Profile Settings in Freshdesk."
            );
        }

        if let Some(timeout) = self.http_timeout_secs
            && !(1..=300).contains(&timeout)
        {
            anyhow::bail!(
                "PROFILE_SYNC_HTTP_TIMEOUT_SECS must be between 1 and 300 seconds. Got: {}",
                timeout
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        self.sync_config().validate()?;

        Ok(())
    }

    /// Client configuration for the core
    fn sync_config(&self) -> SyncConfig {
        let mut source = SourceConfig::github(self.github_token.clone());
        if let SourceConfig::Github {
            api_url,
            timeout_secs,
            ..
        } = &mut source
        {
            *api_url = self.github_api_url.clone();
            if let Some(timeout) = self.http_timeout_secs {
                *timeout_secs = timeout;
            }
        }

        let mut destination =
            DestinationConfig::freshdesk(&self.freshdesk_subdomain, &self.freshdesk_token);
        if let DestinationConfig::Freshdesk {
            base_url,
            timeout_secs,
            dry_run,
            ..
        } = &mut destination
        {
            base_url.clone_from(&self.freshdesk_base_url);
            *dry_run = self.dry_run;
            if let Some(timeout) = self.http_timeout_secs {
                *timeout_secs = timeout;
            }
        }

        SyncConfig {
            source,
            destination,
        }
    }

    fn tracing_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ProfileSyncExitCode::ConfigError.into()
            } else {
                ProfileSyncExitCode::Success.into()
            };
        }
    };

    let config = match Config::from_env(cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ProfileSyncExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return ProfileSyncExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.tracing_level())
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ProfileSyncExitCode::ConfigError.into();
    }

    info!(
        "Starting profile-syncd for GitHub user '{}' into Freshdesk account '{}'",
        config.github_username, config.freshdesk_subdomain
    );

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ProfileSyncExitCode::RunFailure.into();
        }
    };

    let code = rt.block_on(async {
        match run_sync(&config).await {
            Ok(outcome) => {
                report(&outcome);
                ProfileSyncExitCode::Success
            }
            Err(e) => {
                error!("Sync failed: {}", e);
                exit_code_for(&e)
            }
        }
    });

    code.into()
}

/// Build the clients from configuration and run one sync
async fn run_sync(config: &Config) -> profile_sync_core::Result<SyncOutcome> {
    let registry = ClientRegistry::new();

    #[cfg(feature = "github")]
    {
        info!("Registering GitHub source");
        profile_sync_github::register(&registry);
    }

    #[cfg(feature = "freshdesk")]
    {
        info!("Registering Freshdesk destination");
        profile_sync_freshdesk::register(&registry);
    }

    let sync_config = config.sync_config();
    let source = registry.create_source(&sync_config.source)?;
    let destination = registry.create_destination(&sync_config.destination)?;

    SyncEngine::new(source, destination)
        .run(&config.github_username)
        .await
}

fn report(outcome: &SyncOutcome) {
    match outcome.result {
        UpsertResult::Created => info!("Created Freshdesk contact for '{}'", outcome.username),
        UpsertResult::Updated { id } => {
            info!("Updated Freshdesk contact {} for '{}'", id, outcome.username)
        }
        UpsertResult::DryRun { existing: Some(id) } => info!(
            "[DRY-RUN] Would update Freshdesk contact {} for '{}'",
            id, outcome.username
        ),
        UpsertResult::DryRun { existing: None } => info!(
            "[DRY-RUN] Would create a Freshdesk contact for '{}'",
            outcome.username
        ),
    }
}

/// Bad input ends with a configuration exit code, everything else is a run failure
fn exit_code_for(err: &profile_sync_core::Error) -> ProfileSyncExitCode {
    match err {
        profile_sync_core::Error::InvalidIdentifier(_) | profile_sync_core::Error::Config(_) => {
            ProfileSyncExitCode::ConfigError
        }
        _ => ProfileSyncExitCode::RunFailure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("profile-syncd").chain(args.iter().copied())).unwrap()
    }

    fn default_cli() -> Cli {
        cli(&["--github-username", "octocat", "--freshdesk-subdomain", "acme"])
    }

    fn load(cli: Cli, vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(cli, |key| vars.get(key).cloned())
    }

    #[test]
    fn test_cli_requires_both_arguments() {
        assert!(Cli::try_parse_from(["profile-syncd", "--github-username", "octocat"]).is_err());
        assert!(Cli::try_parse_from(["profile-syncd", "--freshdesk-subdomain", "acme"]).is_err());
    }

    #[test]
    fn test_cli_dry_run_flag() {
        let parsed = cli(&[
            "--github-username",
            "octocat",
            "--freshdesk-subdomain",
            "acme",
            "--dry-run",
        ]);
        assert!(parsed.dry_run);
        assert!(!default_cli().dry_run);
    }

    #[test]
    fn test_missing_tokens_rejected() {
        assert!(load(default_cli(), &[("FRESHDESK_TOKEN", "key")]).is_err());
        assert!(load(default_cli(), &[("GITHUB_TOKEN", "ghp")]).is_err());
    }

    #[test]
    fn test_empty_github_token_is_anonymous() {
        let config = load(
            default_cli(),
            &[("GITHUB_TOKEN", ""), ("FRESHDESK_TOKEN", "key")],
        )
        .unwrap();

        assert_eq!(config.github_token, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_freshdesk_token_rejected() {
        let config = load(
            default_cli(),
            &[("GITHUB_TOKEN", "ghp"), ("FRESHDESK_TOKEN", "")],
        )
        .unwrap();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout_range() {
        for (raw, ok) in [("1", true), ("300", true), ("0", false), ("301", false)] {
            let config = load(
                default_cli(),
                &[
                    ("GITHUB_TOKEN", "ghp"),
                    ("FRESHDESK_TOKEN", "key"),
                    ("PROFILE_SYNC_HTTP_TIMEOUT_SECS", raw),
                ],
            )
            .unwrap();
            assert_eq!(config.validate().is_ok(), ok, "timeout {}", raw);
        }

        let unparsable = load(
            default_cli(),
            &[
                ("GITHUB_TOKEN", "ghp"),
                ("FRESHDESK_TOKEN", "key"),
                ("PROFILE_SYNC_HTTP_TIMEOUT_SECS", "soon"),
            ],
        );
        assert!(unparsable.is_err());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let config = load(
            default_cli(),
            &[
                ("GITHUB_TOKEN", "ghp"),
                ("FRESHDESK_TOKEN", "key"),
                ("LOG_LEVEL", "verbose"),
            ],
        )
        .unwrap();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_subdomain_rejected() {
        let parsed = cli(&[
            "--github-username",
            "octocat",
            "--freshdesk-subdomain",
            "acme.evil.com/",
        ]);
        let config = load(parsed, &[("GITHUB_TOKEN", ""), ("FRESHDESK_TOKEN", "key")]).unwrap();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sync_config_carries_overrides() {
        let parsed = cli(&[
            "--github-username",
            "octocat",
            "--freshdesk-subdomain",
            "acme",
            "--dry-run",
        ]);
        let config = load(
            parsed,
            &[
                ("GITHUB_TOKEN", "ghp"),
                ("FRESHDESK_TOKEN", "key"),
                ("GITHUB_API_URL", "http://127.0.0.1:9000"),
                ("FRESHDESK_BASE_URL", "http://127.0.0.1:9001/"),
                ("PROFILE_SYNC_HTTP_TIMEOUT_SECS", "5"),
            ],
        )
        .unwrap();

        let sync_config = config.sync_config();
        match &sync_config.source {
            SourceConfig::Github {
                api_url,
                api_token,
                timeout_secs,
            } => {
                assert_eq!(api_url, "http://127.0.0.1:9000");
                assert_eq!(api_token.as_deref(), Some("ghp"));
                assert_eq!(*timeout_secs, 5);
            }
            other => panic!("unexpected source config {:?}", other),
        }
        match &sync_config.destination {
            DestinationConfig::Freshdesk {
                timeout_secs,
                dry_run,
                ..
            } => {
                assert_eq!(*timeout_secs, 5);
                assert!(*dry_run);
            }
            other => panic!("unexpected destination config {:?}", other),
        }
        assert_eq!(
            sync_config.destination.freshdesk_base_url().as_deref(),
            Some("http://127.0.0.1:9001")
        );
    }

    #[test]
    fn test_exit_codes() {
        use profile_sync_core::Error;

        assert_eq!(
            exit_code_for(&Error::invalid_identifier("bad")),
            ProfileSyncExitCode::ConfigError
        );
        assert_eq!(
            exit_code_for(&Error::config("unknown destination")),
            ProfileSyncExitCode::ConfigError
        );
        assert_eq!(
            exit_code_for(&Error::http_status("freshdesk", 500, "boom")),
            ProfileSyncExitCode::RunFailure
        );
        assert_eq!(
            exit_code_for(&Error::invalid_contact("no keys")),
            ProfileSyncExitCode::RunFailure
        );
    }
}
