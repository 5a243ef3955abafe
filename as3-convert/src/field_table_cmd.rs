use std::fs;

use anyhow::{Context, Result};
use as3_convert::FieldTable;
use rest_tree::parse_file;
use serde_json::Value;

use crate::cli::FieldTableArgs;
use crate::path_guard;

pub fn run_field_table(args: FieldTableArgs) -> Result<()> {
    path_guard::ensure_not_source(&args.output, &args.vendor, "vendor property file")?;
    path_guard::ensure_writable(&args.output, args.force)?;

    let vendor = parse_file(&args.vendor)
        .with_context(|| format!("failed to parse {}", args.vendor.display()))?;
    let table = FieldTable::from_vendor_properties(&Value::Object(vendor))?;

    let json = serde_json::to_string_pretty(&table)?;
    fs::write(&args.output, json)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!(
        "wrote {} fields across {} kinds to {}",
        table.len(),
        table.kinds().count(),
        args.output.display()
    );
    Ok(())
}
