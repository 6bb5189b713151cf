//! CLI command implementations
//!
//! Every command loads the configuration, sets the log level, loads the
//! registry once, and then does its single piece of work.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::codec::{DocumentDecoder, IndexedDocument};
use crate::compiler::{
    CompileError, CompilerOptions, Dialect, ExplainPlan, FullTextCapability, PredicateCompiler,
    SortSpec,
};
use crate::filter::Filter;
use crate::observability::{log_event, Event, Logger, Severity};
use crate::registry::{FieldId, FieldRegistry, RegistryLoader};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_json_file, write_error, write_response};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Registry directory (required)
    pub registry_dir: String,

    /// Relational dialect (optional, default "generic")
    #[serde(default)]
    pub dialect: Dialect,

    /// Whether the relational backend runs full-text predicates
    /// (optional, default false)
    #[serde(default)]
    pub full_text: bool,

    /// Alias of the queried entity (optional, default "entity")
    #[serde(default = "default_entity_alias")]
    pub entity_alias: String,

    /// Field appended last to every ordering (optional, default "oid")
    #[serde(default = "default_tie_break_field")]
    pub tie_break_field: String,

    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_entity_alias() -> String {
    "entity".to_string()
}
fn default_tie_break_field() -> String {
    "oid".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.registry_dir.trim().is_empty() {
            return Err(CliError::config_error("registry_dir must not be empty"));
        }

        let alias_ok = self
            .entity_alias
            .chars()
            .next()
            .map_or(false, |c| c.is_ascii_alphabetic())
            && self
                .entity_alias
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !alias_ok {
            return Err(CliError::config_error(format!(
                "Invalid entity_alias: '{}'. Must be an identifier.",
                self.entity_alias
            )));
        }

        if self.tie_break_field.trim().is_empty() {
            return Err(CliError::config_error("tie_break_field must not be empty"));
        }

        self.log_severity()?;
        Ok(())
    }

    /// Get registry directory as Path
    pub fn registry_path(&self) -> &Path {
        Path::new(&self.registry_dir)
    }

    /// Minimum log severity
    pub fn log_severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse()
            .map_err(|e: String| CliError::config_error(format!("Invalid log_level: {}", e)))
    }

    /// Compiler settings derived from this configuration
    pub fn compiler_options(&self) -> CompilerOptions {
        CompilerOptions {
            dialect: self.dialect,
            entity_alias: self.entity_alias.clone(),
            tie_break: FieldId::from(self.tie_break_field.as_str()),
        }
    }

    pub fn full_text_capability(&self) -> FullTextCapability {
        FullTextCapability::from_probe(self.full_text)
    }
}

/// Parse arguments and run the command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    let result = run_command(cli.command);
    if let Err(e) = &result {
        write_error(e.code_str(), e.message())?;
    }
    result
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Compile {
            config,
            model_type,
            filter,
            order,
        } => compile(&config, &model_type, &filter, &order),
        Command::Decode { config, document } => decode(&config, &document),
        Command::Registry { config } => registry(&config),
    }
}

/// Loads configuration and registry; applies the log level
fn boot(config_path: &Path) -> CliResult<(Config, FieldRegistry)> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.log_severity()?);

    let path = config_path.display().to_string();
    log_event(
        Event::ConfigLoaded,
        &[("path", path.as_str()), ("dialect", config.dialect.as_str())],
    );

    let registry = RegistryLoader::new(config.registry_path())
        .load()
        .map_err(crate::Error::from)?;
    Ok((config, registry))
}

/// Compile a filter file and print its explain plan
pub fn compile(
    config_path: &Path,
    model_type: &str,
    filter_path: &Path,
    order: &[SortSpec],
) -> CliResult<()> {
    let (config, registry) = boot(config_path)?;
    let filter: Filter = read_json_file(filter_path)?;

    let model = registry
        .type_named(model_type)
        .ok_or_else(|| crate::Error::from(CompileError::unknown_type(model_type)))?;
    let options = config.compiler_options();
    let compiler = PredicateCompiler::new(model, &options, config.full_text_capability());

    let plan = match compiler
        .compile(&filter)
        .and_then(|compiled| Ok((compiler.compile_ordering(order)?, compiled)))
    {
        Ok((order_by, compiled)) => ExplainPlan::from_compiled(model.name(), &compiled, &order_by),
        Err(err) => ExplainPlan::from_error(model.name(), &err),
    };

    write_response(serde_json::to_value(&plan)?)
}

/// Decode a document file and print its typed fields
pub fn decode(config_path: &Path, document_path: &Path) -> CliResult<()> {
    let (_, registry) = boot(config_path)?;
    let document: IndexedDocument = read_json_file(document_path)?;

    let decoded = DocumentDecoder::new(&registry)
        .decode(&document)
        .map_err(crate::Error::from)?;

    write_response(serde_json::to_value(&decoded)?)
}

/// List the registry's model types
pub fn registry(config_path: &Path) -> CliResult<()> {
    let (_, registry) = boot(config_path)?;

    let types: Vec<_> = registry
        .types()
        .iter()
        .map(|t| {
            json!({
                "name": t.name(),
                "type_code": t.type_code(),
                "entity": t.entity(),
                "fields": t.fields().iter().map(|f| f.id.as_str()).collect::<Vec<_>>(),
            })
        })
        .collect();
    let languages: Vec<&str> = registry.languages().collect();

    write_response(json!({
        "types": types,
        "languages": languages,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("crossquery.json");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_config_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"registry_dir": "/srv/registry"}"#);

        let config = Config::load(&path).unwrap();
        assert_eq!(config.dialect, Dialect::Generic);
        assert_eq!(config.entity_alias, "entity");
        assert_eq!(config.tie_break_field, "oid");
        assert_eq!(config.log_severity().unwrap(), Severity::Info);
        assert!(!config.full_text_capability().is_supported());

        let options = config.compiler_options();
        assert_eq!(options, CompilerOptions::default());
    }

    #[test]
    fn test_config_overrides() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{
                "registry_dir": "/srv/registry",
                "dialect": "oracle",
                "full_text": true,
                "entity_alias": "e",
                "tie_break_field": "id",
                "log_level": "warn"
            }"#,
        );

        let config = Config::load(&path).unwrap();
        assert_eq!(config.dialect, Dialect::Oracle);
        assert!(config.full_text_capability().is_supported());
        assert_eq!(config.compiler_options().entity_alias, "e");
        assert_eq!(config.compiler_options().tie_break.as_str(), "id");
    }

    #[test]
    fn test_config_missing_registry_dir() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"dialect": "generic"}"#);
        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code_str(), "CQ_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_config_rejects_empty_registry_dir() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"registry_dir": "  "}"#);
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_config_rejects_bad_alias_and_level() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"registry_dir": "r", "entity_alias": "1 OR 1"}"#);
        assert!(Config::load(&path).is_err());

        let path = write_config(&dir, r#"{"registry_dir": "r", "log_level": "loud"}"#);
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_config_unknown_dialect() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"registry_dir": "r", "dialect": "mysql"}"#);
        let err = Config::load(&path).unwrap_err();
        assert!(err.message().contains("Invalid config JSON"));
    }
}
