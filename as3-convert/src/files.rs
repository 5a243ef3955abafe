//! Certificate, key and bundle file descriptors synthesized while parsing.
//!
//! Each literal payload becomes two objects: an upload carrying the content
//! and a `sys/file` descriptor whose source path points at the uploaded file.
//! Upload file names embed partition/subfolder placeholders because the
//! parser does not resolve them; the converter does.

use serde::Serialize;

pub const UPLOADS_KIND: &str = "shared/file-transfer/uploads";
pub const SSL_CERT_KIND: &str = "sys/file/ssl-cert";
pub const SSL_KEY_KIND: &str = "sys/file/ssl-key";
pub const DOWNLOADS_DIR: &str = "file:/var/config/rest/downloads";

pub const PARTITION_TOKEN: &str = "_PARTITION_";
pub const SUBFOLDER_TOKEN: &str = "_SUBFOLDER_";
const FILENAME_PREFIX: &str = "__PARTITION____SUBFOLDER__";

/// Which device store a descriptor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileStore {
    SslCert,
    SslKey,
}

impl FileStore {
    pub fn kind(self) -> &'static str {
        match self {
            Self::SslCert => SSL_CERT_KIND,
            Self::SslKey => SSL_KEY_KIND,
        }
    }
}

/// A `sys/file/ssl-*` descriptor. `upload_name` still carries placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SslFile {
    pub store: FileStore,
    pub upload_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,
}

impl SslFile {
    /// The device source path once placeholders are resolved.
    pub fn source_path(&self, partition: &str, subfolder: &str) -> String {
        format!(
            "{DOWNLOADS_DIR}/{}",
            resolve_placeholders(&self.upload_name, partition, subfolder)
        )
    }
}

/// Literal content destined for the device upload area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Upload {
    pub content: String,
}

/// The placeholder-bearing upload file name for `file` (e.g. `web.crt`).
pub fn upload_name(file: &str) -> String {
    format!("{FILENAME_PREFIX}_{file}")
}

/// Replace the partition and subfolder placeholders in `raw`.
pub fn resolve_placeholders(raw: &str, partition: &str, subfolder: &str) -> String {
    raw.replace(PARTITION_TOKEN, partition)
        .replace(SUBFOLDER_TOKEN, subfolder)
}

#[cfg(test)]
mod tests {
    use super::{resolve_placeholders, upload_name, FileStore, SslFile};

    #[test]
    fn placeholders_resolve_to_partition_and_subfolder() {
        let raw = upload_name("web.crt");
        assert_eq!(raw, "__PARTITION____SUBFOLDER___web.crt");
        assert_eq!(resolve_placeholders(&raw, "T1", "A1"), "_T1__A1__web.crt");
    }

    #[test]
    fn source_path_points_into_downloads() {
        let file = SslFile {
            store: FileStore::SslKey,
            upload_name: upload_name("web.key"),
            passphrase: None,
        };
        assert_eq!(
            file.source_path("T1", "A1"),
            "file:/var/config/rest/downloads/_T1__A1__web.key"
        );
    }
}
