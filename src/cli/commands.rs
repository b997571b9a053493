//! CLI command implementations
//!
//! Each command loads the configuration, installs logging and returns the
//! `data` payload of its success response. `run_command` writes the
//! response; failures are written as error responses by `run`.

use std::path::Path;

use serde_json::{json, Value};
use tracing::info;

use crate::builder::FormBuilder;
use crate::observability;
use crate::preview::{FormPreview, SubmitOutcome};
use crate::schema::{FormData, FormSchema};
use crate::store::{FileBackend, JsonSchemaStore, KeyValueBackend, SchemaStore};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_json, write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command).inspect_err(|e| {
        let _ = write_error(e);
    })
}

/// Run the appropriate command and write its response
pub fn run_command(cmd: Command) -> CliResult<()> {
    let data = match cmd {
        Command::Init { config } => init(&config)?,
        Command::List { config } => list(&config)?,
        Command::Show { id, config } => show(&config, &id)?,
        Command::Import { file, config } => import(&config, &file)?,
        Command::Delete { id, config } => delete(&config, &id)?,
        Command::Preview { id, data, config } => preview(&config, &id, &data)?,
        Command::Submit { id, data, config } => submit(&config, &id, &data)?,
    };

    write_response(data)
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    observability::init_logging(&config.log_level, config.log_format);
    Ok(config)
}

fn open_store(config: &Config) -> CliResult<JsonSchemaStore<FileBackend>> {
    if !config.is_initialized() {
        return Err(CliError::not_initialized());
    }
    config.open_store()
}

fn find_schema(store: &impl SchemaStore, id: &str) -> CliResult<FormSchema> {
    store.get_schema(id).ok_or_else(|| CliError::not_found(id))
}

/// Create the data directory and an empty schema collection
pub fn init(config_path: &Path) -> CliResult<Value> {
    let config = load_config(config_path)?;

    if config.is_initialized() {
        return Err(CliError::already_initialized());
    }

    let mut backend = FileBackend::open(config.data_path())?;
    backend.write(&config.storage_key, "[]")?;

    info!(data_dir = %config.data_dir, key = %config.storage_key, "schema store initialized");
    Ok(json!({
        "initialized": true,
        "path": backend.path_for(&config.storage_key).to_string_lossy(),
    }))
}

/// List stored forms, in stored order
pub fn list(config_path: &Path) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;

    let forms: Vec<Value> = store
        .list_schemas()
        .iter()
        .map(|s| {
            json!({
                "id": s.id,
                "name": s.name,
                "fieldCount": s.fields.len(),
                "hasDerivedFields": s.has_derived_fields(),
                "createdAt": s.created_at,
            })
        })
        .collect();

    Ok(json!({ "forms": forms }))
}

/// Print one stored form
pub fn show(config_path: &Path, id: &str) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;

    let schema = find_schema(&store, id)?;
    Ok(serde_json::to_value(schema)?)
}

/// Validate a schema file and store it
///
/// A schema whose id is already stored replaces it in place.
pub fn import(config_path: &Path, file: &Path) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let mut store = open_store(&config)?;

    let schema: FormSchema = read_json(file)?;
    let replaced = store.get_schema(&schema.id).is_some();
    let name = schema.name.clone();

    let saved = FormBuilder::edit(schema).save(&name, &mut store)?;

    Ok(json!({
        "id": saved.id,
        "name": saved.name,
        "replaced": replaced,
    }))
}

/// Delete a stored form
pub fn delete(config_path: &Path, id: &str) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let mut store = open_store(&config)?;

    find_schema(&store, id)?;
    store.delete_schema(id)?;

    Ok(json!({ "deleted": id }))
}

/// Load a schema and apply a data record to a fresh preview session.
fn fill_preview(config_path: &Path, id: &str, data_path: &Path) -> CliResult<FormPreview> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;
    let schema = find_schema(&store, id)?;

    let data: FormData = read_json(data_path)?;

    let mut preview = FormPreview::new(schema);
    preview.set_values(data)?;
    Ok(preview)
}

/// Show per-field errors and derived values for a data record
pub fn preview(config_path: &Path, id: &str, data_path: &Path) -> CliResult<Value> {
    let preview = fill_preview(config_path, id, data_path)?;
    let errors = preview.check();

    Ok(json!({
        "valid": !errors.has_errors(),
        "errors": errors,
        "derived": preview.derived_values(),
    }))
}

/// Submit a data record; rejected when any field fails validation
pub fn submit(config_path: &Path, id: &str, data_path: &Path) -> CliResult<Value> {
    let mut preview = fill_preview(config_path, id, data_path)?;

    match preview.submit() {
        SubmitOutcome::Accepted { data, derived } => Ok(json!({
            "submitted": true,
            "data": data,
            "derived": derived,
        })),
        SubmitOutcome::Rejected {
            errors,
            first_error,
        } => Err(CliError::submit_rejected(&first_error).with_details(json!({
            "firstError": first_error,
            "errors": errors,
        }))),
    }
}
