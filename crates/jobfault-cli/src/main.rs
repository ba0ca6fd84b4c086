//! jobfault CLI - inspect and validate error-definition fixtures.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use jobfault_core::{CoreError, ErrorCategory, ErrorDefinition};
use jobfault_registry::{
    DefinitionSource, EmbeddedSource, ErrorFilter, ErrorOrder, ErrorRegistry, FileSource,
    RegistryError,
};

mod config;

use config::Config;

/// jobfault CLI - Error registry inspection tool
#[derive(Parser)]
#[command(name = "jobfault")]
#[command(about = "Inspect and validate job error-definition fixtures", long_about = None)]
struct Cli {
    /// Fixture file to seed after the builtin errors (repeatable)
    #[arg(short, long = "fixture", global = true)]
    fixtures: Vec<PathBuf>,

    /// Do not seed the builtin errors
    #[arg(long, global = true)]
    no_builtin: bool,

    /// Log filter used when RUST_LOG is unset (e.g. "debug", "jobfault_registry=debug")
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a fixture file without loading the registry
    Validate {
        /// Fixture file to check
        path: PathBuf,
    },

    /// List error definitions
    List {
        /// Only this category (SYSTEM or ALGORITHM)
        #[arg(short, long, value_parser = parse_category)]
        category: Option<ErrorCategory>,

        /// Only builtin errors
        #[arg(long, conflicts_with = "user")]
        builtin: bool,

        /// Only user-defined errors
        #[arg(long)]
        user: bool,

        /// Only errors modified at or after this RFC 3339 time
        #[arg(long)]
        since: Option<DateTime<Utc>>,

        /// Only errors modified at or before this RFC 3339 time
        #[arg(long)]
        until: Option<DateTime<Utc>>,

        /// Sort order
        #[arg(long, value_enum, default_value_t = OrderArg::Name)]
        order: OrderArg,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one error definition
    Show {
        /// Error name
        name: String,
    },

    /// Print the loaded registry as a fixture document
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    Name,
    Title,
    LastModified,
}

impl From<OrderArg> for ErrorOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Name => ErrorOrder::Name,
            OrderArg::Title => ErrorOrder::Title,
            OrderArg::LastModified => ErrorOrder::LastModified,
        }
    }
}

fn parse_category(s: &str) -> Result<ErrorCategory, CoreError> {
    s.to_ascii_uppercase().parse()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let defaults = Config::default();
    let config = Config {
        include_builtin: !cli.no_builtin,
        fixture_paths: cli.fixtures,
        log_filter: cli.log_level.unwrap_or(defaults.log_filter),
    };

    // Initialize tracing; stdout is reserved for command output
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Validate { path } => {
            validate(path).await?;
        }
        Commands::List {
            category,
            builtin,
            user,
            since,
            until,
            order,
            json,
        } => {
            let mut filter = ErrorFilter::new()
                .with_modified_between(since, until)
                .with_order(order.into());
            if let Some(category) = category {
                filter = filter.with_category(category);
            }
            if builtin || user {
                filter = filter.with_builtin(builtin);
            }

            let registry = load_registry(&config).await?;
            list_errors(&registry, &filter, json).await?;
        }
        Commands::Show { name } => {
            let registry = load_registry(&config).await?;
            show_error(&registry, &name).await?;
        }
        Commands::Export { output } => {
            let registry = load_registry(&config).await?;
            export(&registry, output).await?;
        }
    }

    Ok(())
}

/// Seed a fresh registry from the configured sources.
async fn load_registry(config: &Config) -> Result<Arc<ErrorRegistry>, RegistryError> {
    let registry = ErrorRegistry::new();

    let mut sources: Vec<Box<dyn DefinitionSource>> = Vec::new();
    if config.include_builtin {
        sources.push(Box::new(EmbeddedSource));
    }
    for path in &config.fixture_paths {
        sources.push(Box::new(FileSource::new(path)));
    }
    if sources.is_empty() {
        warn!("No error sources configured; the registry is empty");
    }

    for source in &sources {
        let report = registry.seed_from(source.as_ref()).await?;
        info!(
            source = %source.describe(),
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            "Loaded error source"
        );
    }

    Ok(registry)
}

async fn validate(path: PathBuf) -> Result<(), RegistryError> {
    let defs = FileSource::new(&path).load().await?;

    println!("{}: {} error definitions", path.display(), defs.len());
    for category in ErrorCategory::ALL {
        let count = defs.iter().filter(|d| d.category == category).count();
        println!("  {:<10} {}", category.as_str(), count);
    }
    let builtin = defs.iter().filter(|d| d.is_builtin).count();
    println!("  {:<10} {}", "builtin", builtin);

    Ok(())
}

async fn list_errors(
    registry: &ErrorRegistry,
    filter: &ErrorFilter,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let defs = registry.list(filter).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&defs)?);
        return Ok(());
    }

    println!("Errors ({}):", defs.len());
    println!(
        "{:<24}  {:<10}  {:<5}  {:<7}  {}",
        "NAME", "CATEGORY", "RETRY", "BUILTIN", "TITLE"
    );
    println!("{}", "-".repeat(80));

    for def in defs {
        println!(
            "{:<24}  {:<10}  {:<5}  {:<7}  {}",
            def.name.as_str(),
            def.category.as_str(),
            yes_no(def.should_be_retried),
            yes_no(def.is_builtin),
            def.title
        );
    }

    Ok(())
}

async fn show_error(registry: &ErrorRegistry, name: &str) -> Result<(), RegistryError> {
    let def = registry.lookup(name).await?;
    print_definition(&def);
    Ok(())
}

async fn export(registry: &ErrorRegistry, output: Option<PathBuf>) -> Result<(), RegistryError> {
    let fixture = registry.export_fixture().await?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, format!("{fixture}\n"))
                .await
                .map_err(|source| RegistryError::Io {
                    path: path.clone(),
                    source,
                })?;
            info!(path = %path.display(), "Wrote fixture");
        }
        None => println!("{}", fixture),
    }

    Ok(())
}

fn print_definition(def: &ErrorDefinition) {
    println!("  Name:          {}", def.name);
    println!("  Title:         {}", def.title);
    println!("  Category:      {}", def.category);
    println!("  Builtin:       {}", yes_no(def.is_builtin));
    println!("  Retried:       {}", yes_no(def.should_be_retried));
    println!("  Created:       {}", def.created.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Last modified: {}", def.last_modified.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Description:   {}", def.description);
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobfault_core::{parse_fixture, BUILTIN_FIXTURE};
    use tempfile::TempDir;

    #[test]
    fn test_parse_category_case_insensitive() {
        assert_eq!(parse_category("system").unwrap(), ErrorCategory::System);
        assert_eq!(parse_category("ALGORITHM").unwrap(), ErrorCategory::Algorithm);
        assert!(parse_category("network").is_err());
    }

    #[test]
    fn test_cli_parses_list_flags() {
        let cli = Cli::try_parse_from([
            "jobfault",
            "--no-builtin",
            "-f",
            "extra.json",
            "list",
            "--category",
            "algorithm",
            "--user",
            "--order",
            "last-modified",
        ])
        .unwrap();

        assert!(cli.no_builtin);
        assert_eq!(cli.fixtures, vec![PathBuf::from("extra.json")]);
        match cli.command {
            Commands::List {
                category,
                builtin,
                user,
                order,
                ..
            } => {
                assert_eq!(category, Some(ErrorCategory::Algorithm));
                assert!(!builtin);
                assert!(user);
                assert!(matches!(order, OrderArg::LastModified));
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn test_builtin_and_user_conflict() {
        assert!(Cli::try_parse_from(["jobfault", "list", "--builtin", "--user"]).is_err());
    }

    #[tokio::test]
    async fn test_load_registry_builtin_only() {
        let registry = load_registry(&Config::default()).await.unwrap();
        assert_eq!(registry.len().await, 14);
    }

    #[tokio::test]
    async fn test_load_registry_without_sources() {
        let config = Config {
            include_builtin: false,
            ..Config::default()
        };
        let registry = load_registry(&config).await.unwrap();
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_load_registry_missing_fixture() {
        let config = Config {
            fixture_paths: vec![PathBuf::from("/nonexistent/jobfault/errors.json")],
            ..Config::default()
        };
        assert!(matches!(
            load_registry(&config).await,
            Err(RegistryError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn test_validate_builtin_fixture() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("errors.json");
        tokio::fs::write(&path, BUILTIN_FIXTURE).await.unwrap();

        assert!(validate(path).await.is_ok());
    }

    #[tokio::test]
    async fn test_validate_rejects_duplicate_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("errors.json");
        let text = BUILTIN_FIXTURE.replace("\"name\": \"pull\",", "\"name\": \"timeout\",");
        tokio::fs::write(&path, text).await.unwrap();

        assert!(matches!(
            validate(path).await,
            Err(RegistryError::DuplicateName(n)) if n == "timeout"
        ));
    }

    #[tokio::test]
    async fn test_export_to_file() {
        let registry = load_registry(&Config::default()).await.unwrap();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.json");

        export(&registry, Some(path.clone())).await.unwrap();

        let text = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(parse_fixture(&text).unwrap().len(), 14);

        // Reloading the export on top of the builtins changes nothing
        let config = Config {
            fixture_paths: vec![path],
            ..Config::default()
        };
        assert_eq!(load_registry(&config).await.unwrap().len().await, 14);
    }

    #[tokio::test]
    async fn test_export_to_missing_directory() {
        let registry = load_registry(&Config::default()).await.unwrap();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("export.json");

        match export(&registry, Some(path.clone())).await {
            Err(RegistryError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
