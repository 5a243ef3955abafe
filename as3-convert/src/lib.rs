//! Compile AS3 application-services declarations into flat BIG-IP REST
//! resource objects.
//!
//! A declaration is a nested JSON tree (`ADC` → `Tenant` → `Application` →
//! service, pool, monitor, profile and certificate nodes). Device REST
//! endpoints want something else: one object per resource, filed under a
//! partition and subfolder, with device field names and device value
//! spellings. This library performs that translation without talking to a
//! device.
//!
//! # Architecture
//!
//! ## Pipeline
//!
//! - [`pipeline`]: The call boundary: document in, [`rest_tree::ObjectSet`] out
//! - [`defaults`]: The defaulting authority seam and its liveness gate
//! - [`parser`]: Declaration tree → typed [`intermediate::IntermediateSet`]
//! - [`convert`]: Per-entry conversion into target REST bodies
//! - [`reconcile`]: Whole-graph passes (virtual-address consolidation, SNI fan-out)
//!
//! ## Model
//!
//! - [`class`]: The closed set of source classes
//! - [`intermediate`]: Classified nodes per tenant and application
//! - [`files`]: Certificate file descriptors and upload payloads
//! - [`secret`]: Protected-value decoding
//! - [`version`]: Numeric device version ordering
//!
//! ## Configuration & Reporting
//!
//! - [`field_table`]: Field renames, boolean tokens and version gates
//! - [`config`]: [`PipelineConfig`] and the optional TOML settings file
//! - [`report`]: Terminal rendering
//! - [`error`]: [`ConvertError`]
//!
//! # Workflow
//!
//! ```no_run
//! use as3_convert::{compile, PipelineConfig, Predefaulted};
//! use rest_tree::parse_file;
//!
//! let document = parse_file("app.json".as_ref())?;
//! let config = PipelineConfig::embedded()?;
//! let objects = compile(&document, &config, &Predefaulted)?;
//! println!("{}", rest_tree::format_summary(&objects));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod class;
pub mod config;
pub mod convert;
pub mod defaults;
pub mod error;
pub mod field_table;
pub mod files;
pub mod intermediate;
pub mod parser;
pub mod pipeline;
pub mod reconcile;
pub mod report;
pub mod secret;
pub mod version;

pub use config::{load_settings, AuthoritySettings, PipelineConfig, Settings, SettingsError};
pub use defaults::{DefaultingAuthority, Predefaulted};
pub use error::ConvertError;
pub use field_table::{FieldTable, FieldTableError};
pub use intermediate::IntermediateSet;
pub use pipeline::compile;
pub use version::DeviceVersion;
