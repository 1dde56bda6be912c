//! CLI argument definitions for the userbridge binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;
use userbridge::{FieldSet, UserId};

use crate::output::OutputFormat;

/// Create, update, and inspect platform users from form field sets
#[derive(Parser, Debug)]
#[command(name = "userbridge")]
#[command(about = "userbridge: map form fields onto user accounts and metadata")]
#[command(version)]
pub struct Cli {
    /// Platform state file. Created on the first write if missing.
    #[arg(
        short,
        long,
        global = true,
        default_value = "userbridge.json",
        env = "USERBRIDGE_STATE"
    )]
    pub state: PathBuf,

    /// Model configuration file (defaults, statics, guard, fillable, handler)
    #[arg(short, long, global = true, env = "USERBRIDGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a user from submitted fields
    Create(CreateArgs),
    /// Update an existing user with a partial set of fields
    Update(UpdateArgs),
    /// Print selected field values of a user
    Get(GetArgs),
    /// Print every column and metadata entry of a user
    Show(ShowArgs),
}

/// Submitted fields, shared by create and update
#[derive(clap::Args, Debug)]
pub struct FieldArgs {
    /// A field as NAME=VALUE. Repeatable; later values win.
    #[arg(short, long = "field", value_name = "NAME=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// A JSON object of fields, applied before any --field
    #[arg(long, value_name = "OBJECT")]
    pub json: Option<String>,

    /// Submit NAME as null, which removes a metadata entry
    #[arg(long, value_name = "NAME")]
    pub unset: Vec<String>,
}

impl FieldArgs {
    /// Build the submitted field set: `--json`, then `--field`, then `--unset`.
    pub fn to_field_set(&self) -> Result<FieldSet, Box<dyn std::error::Error>> {
        let mut fields = match &self.json {
            Some(json) => FieldSet::try_from(serde_json::from_str::<Value>(json)?)
                .map_err(|_| "--json must be a JSON object")?,
            None => FieldSet::new(),
        };
        for (name, value) in &self.fields {
            fields.insert(name.clone(), value.clone());
        }
        for name in &self.unset {
            fields.insert(name.clone(), Value::Null);
        }
        Ok(fields)
    }
}

/// Arguments for the create command
#[derive(clap::Args, Debug)]
pub struct CreateArgs {
    #[command(flatten)]
    pub fields: FieldArgs,
}

/// Arguments for the update command
#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Id of the user to update
    #[arg(long)]
    pub id: UserId,

    #[command(flatten)]
    pub fields: FieldArgs,
}

/// Arguments for the get command
#[derive(clap::Args, Debug)]
pub struct GetArgs {
    /// Id of the user to read
    #[arg(long)]
    pub id: UserId,

    /// Field names or dotted paths such as `address.city`
    #[arg(required = true, value_name = "FIELD")]
    pub paths: Vec<String>,
}

/// Arguments for the show command
#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Id of the user to show
    #[arg(long)]
    pub id: UserId,
}

/// Parse a `NAME=VALUE` pair. The value may be empty or contain `=`.
fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in `{raw}`"));
    }
    Ok((name.to_string(), value.to_string()))
}
