use anyhow::{Context, Result};
use as3_convert::parser::parse;
use as3_convert::report::render_intermediate;
use rest_tree::parse_file;

use crate::cli::{InspectArgs, OutputFormat};

pub fn run_inspect(args: InspectArgs) -> Result<()> {
    let document = parse_file(&args.input)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;
    let set = parse(&document)
        .with_context(|| format!("failed to classify {}", args.input.display()))?;

    match args.format {
        OutputFormat::Text => println!("{}", render_intermediate(&set)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&set)?),
    }
    Ok(())
}
