//! The call boundary: document in, target objects out.

use std::time::Instant;

use rest_tree::ObjectSet;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::convert::convert;
use crate::defaults::DefaultingAuthority;
use crate::error::ConvertError;
use crate::parser::parse;
use crate::reconcile::reconcile;

/// Compile an AS3 document (a top-level object whose `declaration` field
/// holds an `ADC` tree) into target objects.
///
/// The authority is asked for the defaulted declaration first; parse,
/// convert and reconcile then run on that copy. `document` is never
/// modified. The first error aborts the whole call.
pub fn compile(
    document: &Map<String, Value>,
    config: &PipelineConfig,
    authority: &dyn DefaultingAuthority,
) -> Result<ObjectSet, ConvertError> {
    let started = Instant::now();
    let declaration = declaration_of(document)?;

    let defaulted = authority.add_defaults(declaration)?;
    debug!(elapsed = ?started.elapsed(), "declaration defaulted");

    let mut request = document.clone();
    request.insert("declaration".to_string(), Value::Object(defaulted));

    let intermediate = parse(&request)?;
    let mut targets = convert(&intermediate, config)?;
    reconcile(&mut targets);

    info!(
        entries = intermediate.len(),
        objects = targets.len(),
        elapsed = ?started.elapsed(),
        "compiled declaration"
    );
    Ok(targets)
}

/// The `ADC` declaration inside `document`.
pub fn declaration_of(document: &Map<String, Value>) -> Result<&Map<String, Value>, ConvertError> {
    let declaration = document
        .get("declaration")
        .ok_or_else(|| ConvertError::malformed("declaration", "no declaration found"))?
        .as_object()
        .ok_or_else(|| ConvertError::malformed("declaration", "declaration must be an object"))?;
    match declaration.get("class").and_then(Value::as_str) {
        Some("ADC") => Ok(declaration),
        _ => Err(ConvertError::malformed(
            "declaration",
            "declaration class must be 'ADC'",
        )),
    }
}
