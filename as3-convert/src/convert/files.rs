use rest_tree::{Folder, ResourcePath};
use serde_json::{Map, Value};

use super::AppContext;
use crate::files::{resolve_placeholders, SslFile, Upload, UPLOADS_KIND};

/// `sys/file/ssl-*/<name>` with its placeholders resolved.
pub(super) fn convert_descriptor(cx: &AppContext<'_>, name: &str, file: &SslFile, out: &mut Folder) {
    let mut body = Map::new();
    body.insert("name".to_string(), Value::String(name.to_string()));
    body.insert(
        "sourcePath".to_string(),
        Value::String(file.source_path(cx.partition, cx.subfolder)),
    );
    if let Some(passphrase) = &file.passphrase {
        body.insert("passphrase".to_string(), Value::String(passphrase.clone()));
    }
    out.insert(ResourcePath::new(file.store.kind(), name), body);
}

/// `shared/file-transfer/uploads/<file>`, renamed to the resolved file name.
pub(super) fn convert_upload(cx: &AppContext<'_>, name: &str, upload: &Upload, out: &mut Folder) {
    let file = resolve_placeholders(name, cx.partition, cx.subfolder);
    let mut body = Map::new();
    body.insert("name".to_string(), Value::String(file.clone()));
    body.insert("content".to_string(), Value::String(upload.content.clone()));
    out.insert(ResourcePath::new(UPLOADS_KIND, file), body);
}
