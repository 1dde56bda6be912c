//! The get command - prints selected field values.

use serde_json::{Map, Value};

use super::Context;
use crate::cli::GetArgs;
use crate::output::{OutputFormat, cell, print_table};

/// Run the get command
pub fn run(ctx: &Context, args: &GetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut adapter = ctx.adapter();
    adapter.load_by_id(args.id);
    if adapter.user().is_none() {
        return Err(format!("no user with id {}", args.id).into());
    }

    let values: Vec<(&str, Option<Value>)> = args
        .paths
        .iter()
        .map(|path| (path.as_str(), adapter.field_value(path)))
        .collect();

    match ctx.format {
        OutputFormat::Human => {
            let rows: Vec<Vec<String>> = values
                .iter()
                .map(|(path, value)| vec![path.to_string(), cell(value.as_ref())])
                .collect();
            print_table(&["FIELD", "VALUE"], &rows);
        }
        OutputFormat::Json => {
            let object: Map<String, Value> = values
                .into_iter()
                .map(|(path, value)| (path.to_string(), value.unwrap_or(Value::Null)))
                .collect();
            println!("{}", serde_json::to_string(&object)?);
        }
    }

    Ok(())
}
