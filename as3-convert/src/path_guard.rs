use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Refuse to write generated output over the file it was generated from.
///
/// `what` names the source in the error ("declaration", "vendor property file").
pub fn ensure_not_source(output: &Path, source: &Path, what: &str) -> Result<()> {
    if resolved(output)? == resolved(source)? {
        bail!(
            "refusing to overwrite the {what} {} with generated output",
            source.display()
        );
    }
    Ok(())
}

/// Refuse to replace an existing file unless `force` is set.
pub fn ensure_writable(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!(
            "refusing to overwrite existing file {} (pass --force)",
            output.display()
        );
    }
    Ok(())
}

/// Absolute form of `path`; symlinks resolved only for paths that exist.
fn resolved(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return path
            .canonicalize()
            .with_context(|| format!("failed to resolve {}", path.display()));
    }
    std::path::absolute(path).with_context(|| format!("failed to resolve {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{ensure_not_source, ensure_writable};

    #[test]
    fn output_may_not_replace_the_declaration() {
        let dir = tempfile::tempdir().expect("tempdir");
        let declaration = dir.path().join("decl.json");
        fs::write(&declaration, "{}").expect("write");
        let err = ensure_not_source(&declaration, &declaration, "declaration")
            .expect_err("same path");
        assert!(err
            .to_string()
            .contains("refusing to overwrite the declaration"));

        let dotted = dir.path().join(".").join("decl.json");
        ensure_not_source(&dotted, &declaration, "declaration").expect_err("same file");

        let objects = dir.path().join("objects.json");
        ensure_not_source(&objects, &declaration, "declaration").expect("distinct path");
    }

    #[test]
    fn existing_output_needs_force() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("rest.json");
        ensure_writable(&output, false).expect("absent file");
        fs::write(&output, "{}").expect("write");
        ensure_writable(&output, false).expect_err("exists");
        ensure_writable(&output, true).expect("forced");
    }
}
