//! Schema Registry CLI
//!
//! Talks to a schema registry using the blocking client and the configured cache.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use schema_registry_client::{
    connect_blocking, BlockingRegistry, ClientConfig, CompatibilityLevel, RawSchema, SchemaId,
    SchemaReference, SubjectName, VersionId, VersionNumber,
};

#[derive(Parser)]
#[command(name = "schema-registry")]
#[command(about = "Register, look up and manage schemas in a schema registry")]
struct Cli {
    /// Config file (defaults to schema-registry.toml and friends)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Registry URL, overrides the config file
    #[arg(short, long)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered subjects
    Subjects,

    /// List the versions registered under a subject
    Versions { subject: String },

    /// Print the schema with the given global id
    GetId { id: i64 },

    /// Print a subject's schema at a version
    Get {
        subject: String,
        /// Version number or "latest"
        #[arg(default_value = "latest")]
        version: String,
    },

    /// Register a schema under a subject
    Register {
        subject: String,
        /// File holding the schema text
        file: PathBuf,
        /// Reference in the form name=subject:version (repeatable)
        #[arg(short, long = "reference")]
        references: Vec<String>,
    },

    /// Find the version and id of an already-registered schema
    Lookup { subject: String, file: PathBuf },

    /// Test a schema against a subject's version
    Check {
        subject: String,
        file: PathBuf,
        #[arg(short, long, default_value = "latest")]
        version: String,
    },

    /// Show or change a compatibility level (global when no subject is given)
    Compatibility {
        subject: Option<String>,
        /// New level, e.g. BACKWARD or FULL_TRANSITIVE
        #[arg(long)]
        set: Option<String>,
    },

    /// Delete a subject, or one of its versions
    Delete {
        subject: String,
        #[arg(short, long)]
        version: Option<String>,
        /// Hard delete instead of soft delete
        #[arg(long)]
        permanent: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().into_owned());
    let mut config =
        ClientConfig::load_from(config_path.as_deref()).context("loading configuration")?;
    if let Some(url) = cli.url {
        config.registry.url = url;
    }

    let registry = connect_blocking(&config)?;
    let registry = registry.as_ref();

    match cli.command {
        Commands::Subjects => {
            for subject in registry.subjects()? {
                println!("{}", subject);
            }
        }

        Commands::Versions { subject } => {
            let subject = SubjectName::new(subject)?;
            for version in registry.subject_versions(&subject)? {
                println!("{}", version);
            }
        }

        Commands::GetId { id } => {
            let schema = registry.schema_for_id(SchemaId::new(id)?)?;
            println!("{}", schema.raw);
        }

        Commands::Get { subject, version } => {
            let subject = SubjectName::new(subject)?;
            let found = registry.schema_for_subject_and_version(&subject, version.parse()?)?;
            println!(
                "# {} version {} (id {})",
                found.subject,
                found.version,
                found.id()
            );
            println!("{}", found.raw());
        }

        Commands::Register {
            subject,
            file,
            references,
        } => {
            let subject = SubjectName::new(subject)?;
            let schema = read_schema(&file)?;
            let references = references
                .iter()
                .map(|r| parse_reference(r))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let id = registry.register(&subject, &schema, &references)?;
            println!("✅ Registered {} as id {}", subject, id);
        }

        Commands::Lookup { subject, file } => {
            let subject = SubjectName::new(subject)?;
            let schema = read_schema(&file)?;
            let found = registry.schema_version(&subject, &schema)?;
            println!("{} version {} (id {})", found.subject, found.version, found.id());
        }

        Commands::Check {
            subject,
            file,
            version,
        } => {
            let subject = SubjectName::new(subject)?;
            let schema = read_schema(&file)?;
            let version: VersionId = version.parse()?;
            if registry.check_compatibility(&subject, version, &schema)? {
                println!("✅ Compatible with {} version {}", subject, version);
            } else {
                println!("❌ Not compatible with {} version {}", subject, version);
                std::process::exit(2);
            }
        }

        Commands::Compatibility { subject, set } => {
            let subject = subject.map(SubjectName::new).transpose()?;
            let level = match (set, &subject) {
                (Some(level), Some(subject)) => {
                    registry.set_subject_compatibility(subject, level.parse()?)?
                }
                (Some(level), None) => registry.set_default_compatibility(level.parse()?)?,
                (None, Some(subject)) => registry.subject_compatibility(subject)?,
                (None, None) => registry.default_compatibility()?,
            };
            print_level(subject.as_ref(), level);
        }

        Commands::Delete {
            subject,
            version,
            permanent,
        } => {
            let subject = SubjectName::new(subject)?;
            match version {
                Some(version) => {
                    let deleted =
                        registry.delete_subject_version(&subject, version.parse()?, permanent)?;
                    println!("🗑️  Deleted {} version {}", subject, deleted);
                }
                None => {
                    let deleted = registry.delete_subject(&subject, permanent)?;
                    let listed: Vec<String> =
                        deleted.iter().map(VersionNumber::to_string).collect();
                    println!("🗑️  Deleted {} versions [{}]", subject, listed.join(", "));
                }
            }
        }
    }

    Ok(())
}

fn read_schema(path: &Path) -> anyhow::Result<RawSchema> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(RawSchema::parse(text)?)
}

/// `name=subject:version`
fn parse_reference(raw: &str) -> anyhow::Result<SchemaReference> {
    let Some((name, target)) = raw.split_once('=') else {
        bail!("reference '{}' is not name=subject:version", raw);
    };
    let Some((subject, version)) = target.rsplit_once(':') else {
        bail!("reference '{}' is missing a version", raw);
    };
    let version: i64 = version
        .parse()
        .with_context(|| format!("reference version '{}'", version))?;
    Ok(SchemaReference::new(
        name,
        SubjectName::new(subject)?,
        VersionNumber::new(version)?,
    )?)
}

fn print_level(subject: Option<&SubjectName>, level: CompatibilityLevel) {
    match subject {
        Some(subject) => println!("{}: {}", subject, level),
        None => println!("global: {}", level),
    }
}
