//! Unified configuration layer
//!
//! All environment variable reads go through this module; callers use the
//! structured configs instead of calling `std::env::var` directly.
//!
//! - `loader`: `env_or`, `env_bool` and `.env` loading
//! - `schema`: `BootstrapConfig`, `ObservabilityConfig`
//! - `env_keys`: key constants and their defaults

pub mod env_keys;
pub mod loader;
pub mod schema;

pub use loader::{env_bool, env_or, load_dotenv_from_dir, parse_dotenv};
pub use schema::{BootstrapConfig, ObservabilityConfig};
