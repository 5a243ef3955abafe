use std::fs;

use anyhow::{Context, Result};
use as3_convert::defaults::{wait_for_authority, AuthorityResponse, RecordedAuthority};
use as3_convert::report::{render_summary, render_text};
use as3_convert::{
    compile, load_settings, AuthoritySettings, PipelineConfig, Predefaulted, Settings,
};
use rest_tree::{format_json, parse_file, write_file};
use tracing::info;

use crate::cli::{CompileArgs, OutputFormat};
use crate::path_guard;

pub fn run_compile(args: CompileArgs) -> Result<()> {
    let settings = resolve_settings(&args)?;
    let config = PipelineConfig::from_settings(&settings)?;
    let document = parse_file(&args.input)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;

    let compiled = match &settings.authority {
        Some(captured) => {
            let authority = replay_authority(captured)?;
            wait_for_authority(&authority, settings.probe_policy())
                .context("defaulting authority is not ready")?;
            compile(&document, &config, &authority)
        }
        None => compile(&document, &config, &Predefaulted),
    };
    let objects =
        compiled.with_context(|| format!("failed to compile {}", args.input.display()))?;

    if let Some(out_path) = &args.output {
        path_guard::ensure_not_source(out_path, &args.input, "declaration")?;
        write_file(&objects, out_path)
            .with_context(|| format!("failed to write output {}", out_path.display()))?;
        info!(path = %out_path.display(), objects = objects.len(), "wrote object set");
    }

    if args.summary {
        println!("{}", render_summary(&objects));
        return Ok(());
    }

    match args.format {
        OutputFormat::Text => println!("{}", render_text(&objects)),
        OutputFormat::Json => println!("{}", format_json(&objects)),
    }
    Ok(())
}

/// Settings file first, then command-line overrides.
fn resolve_settings(args: &CompileArgs) -> Result<Settings> {
    let mut settings = match &args.settings {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };
    if let Some(version) = &args.device_version {
        settings.device_version = Some(version.clone());
    }
    if let Some(path) = &args.field_table {
        settings.field_table = Some(path.clone());
    }
    Ok(settings)
}

fn replay_authority(captured: &AuthoritySettings) -> Result<RecordedAuthority> {
    let body = fs::read_to_string(&captured.response).with_context(|| {
        format!(
            "failed to read captured authority response {}",
            captured.response.display()
        )
    })?;
    info!(
        kind = ?captured.kind,
        path = %captured.response.display(),
        "replaying defaulting authority"
    );
    Ok(RecordedAuthority::new(
        captured.kind,
        AuthorityResponse::new(captured.status, body),
    )
    .with_probe_status(captured.probe_status))
}
