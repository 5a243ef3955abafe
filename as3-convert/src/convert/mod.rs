//! [`IntermediateSet`] → target [`ObjectSet`].
//!
//! Every application becomes one `partition/subfolder` folder. Entries are
//! dispatched on their typed variant; each per-kind converter writes one or
//! more target objects into the folder. The intermediate set is only read.

mod fields;
mod files;
mod monitor;
mod persist;
mod pool;
mod profile;
mod simple;
mod virtual_address;
mod virtual_server;

use rest_tree::{Folder, ObjectSet};
use tracing::debug;

use crate::config::PipelineConfig;
use crate::error::ConvertError;
use crate::field_table::FieldTable;
use crate::intermediate::{Application, Entry, IntermediateSet};

pub(crate) use fields::{reference, TargetBuilder};

/// Convert every application of `set`.
pub fn convert(set: &IntermediateSet, config: &PipelineConfig) -> Result<ObjectSet, ConvertError> {
    let mut out = ObjectSet::new();
    for (tenant, t) in &set.tenants {
        out.partition_mut(tenant);
        for (name, app) in &t.applications {
            let cx = AppContext {
                config,
                partition: tenant,
                subfolder: name,
                app,
            };
            cx.convert_into(out.folder_mut(tenant, name))?;
        }
    }
    debug!(objects = out.len(), "converted declaration");
    Ok(out)
}

/// Ambient state for converting one application.
#[derive(Clone, Copy)]
pub(crate) struct AppContext<'a> {
    pub config: &'a PipelineConfig,
    pub partition: &'a str,
    pub subfolder: &'a str,
    pub app: &'a Application,
}

impl<'a> AppContext<'a> {
    pub fn table(&self) -> &'a FieldTable {
        &self.config.field_table
    }

    /// `/<partition>/<subfolder>/<name>`
    pub fn local_path(&self, name: &str) -> String {
        format!("/{}/{}/{}", self.partition, self.subfolder, name)
    }

    fn convert_into(&self, folder: &mut Folder) -> Result<(), ConvertError> {
        for (path, entry) in &self.app.entries {
            let name = path.name();
            match entry {
                Entry::Virtual { service, body } => {
                    virtual_server::convert(self, name, *service, body, folder)?
                }
                Entry::Pool { body } => pool::convert(self, name, body, folder)?,
                Entry::Monitor { monitor_type, body } => {
                    monitor::convert(self, monitor_type, name, body, folder)?
                }
                Entry::Persistence { method, body } => {
                    persist::convert(self, method, name, body, folder)?
                }
                Entry::Profile { profile, body } => {
                    profile::convert(self, *profile, name, body, folder)?
                }
                Entry::Rule { body } => simple::convert(self, "ltm/rule", name, body, folder)?,
                Entry::SnatPool { body } => {
                    simple::convert(self, "ltm/snatpool", name, body, folder)?
                }
                Entry::ServiceAddress { body } => {
                    virtual_address::convert(self, name, body, folder)?
                }
                Entry::Certificate { .. } | Entry::CaBundle { .. } => {}
                Entry::SslFile(file) => files::convert_descriptor(self, name, file, folder),
                Entry::Upload(upload) => files::convert_upload(self, name, upload, folder),
            }
        }
        Ok(())
    }
}

/// `name` for index 0, `name-<i>-` otherwise.
pub(crate) fn indexed_name(index: usize, name: &str) -> String {
    if index == 0 {
        name.to_string()
    } else {
        format!("{name}-{index}-")
    }
}

/// The last `/`-separated segment of a declaration reference.
pub(crate) fn reference_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}
