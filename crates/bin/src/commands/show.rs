//! The show command - prints a user's columns and metadata.

use serde_json::{Map, Value};
use userbridge::constants::{BUILTIN_FIELDS, USER_PASS};

use super::Context;
use crate::cli::ShowArgs;
use crate::output::{OutputFormat, cell, print_table};

/// Run the show command
pub fn run(ctx: &Context, args: &ShowArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut adapter = ctx.adapter();
    adapter.load_by_id(args.id);
    if adapter.user().is_none() {
        return Err(format!("no user with id {}", args.id).into());
    }

    let mut fields: Vec<(String, Option<Value>)> = BUILTIN_FIELDS
        .iter()
        .filter(|name| **name != USER_PASS)
        .map(|name| (name.to_string(), adapter.base_field_value(name)))
        .collect();
    fields.extend(
        ctx.platform
            .all_meta(args.id)
            .into_keys()
            .map(|key| {
                let value = adapter.base_field_value(&key);
                (key, value)
            }),
    );

    match ctx.format {
        OutputFormat::Human => {
            let rows: Vec<Vec<String>> = fields
                .iter()
                .map(|(name, value)| vec![name.clone(), cell(value.as_ref())])
                .collect();
            print_table(&["FIELD", "VALUE"], &rows);
        }
        OutputFormat::Json => {
            let object: Map<String, Value> = fields
                .into_iter()
                .map(|(name, value)| (name, value.unwrap_or(Value::Null)))
                .collect();
            println!("{}", serde_json::to_string(&object)?);
        }
    }

    Ok(())
}
