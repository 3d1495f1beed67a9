//! Infrastructure layer - filesystem adapters.
//!
//! This layer handles all I/O: reading the project bundle and writing the vault.

pub mod binder_reader;
pub mod bundle_paths;
pub mod config;
pub mod resources;
pub mod vault_writer;

pub use binder_reader::{parse_binder, read_binder};
pub use bundle_paths::{find_descriptor, project_name};
pub use config::{ensure_config_exists, load_config};
pub use resources::ResourceLoader;
pub use vault_writer::VaultWriter;
