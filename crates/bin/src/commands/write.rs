//! The create and update commands.

use std::path::Path;
use std::process::ExitCode;

use serde_json::json;

use super::{Context, exit_status};
use crate::cli::{CreateArgs, UpdateArgs};
use crate::output::{OutputFormat, errors_json, print_errors};

/// Run the create command
pub fn create(
    ctx: &Context,
    state: &Path,
    args: &CreateArgs,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let fields = args.fields.to_field_set()?;
    let mut adapter = ctx.adapter();
    adapter.create(fields);
    ctx.save(state)?;

    match ctx.format {
        OutputFormat::Human => {
            if let Some(id) = adapter.id() {
                println!("Created user {id}");
            }
            print_errors(adapter.errors());
        }
        OutputFormat::Json => {
            let value = json!({
                "id": adapter.id(),
                "errors": errors_json(adapter.errors()),
            });
            println!("{}", serde_json::to_string(&value)?);
        }
    }

    Ok(exit_status(&adapter))
}

/// Run the update command
pub fn update(
    ctx: &Context,
    state: &Path,
    args: &UpdateArgs,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let fields = args.fields.to_field_set()?;
    let mut adapter = ctx.adapter();
    adapter.load_by_id(args.id);
    if adapter.user().is_none() {
        return Err(format!("no user with id {}", args.id).into());
    }
    adapter.update(fields);
    ctx.save(state)?;

    match ctx.format {
        OutputFormat::Human => {
            if !adapter.has_errors() {
                println!("Updated user {}", args.id);
            }
            print_errors(adapter.errors());
        }
        OutputFormat::Json => {
            let value = json!({
                "id": args.id,
                "errors": errors_json(adapter.errors()),
            });
            println!("{}", serde_json::to_string(&value)?);
        }
    }

    Ok(exit_status(&adapter))
}
