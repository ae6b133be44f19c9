//! Isolated environment bootstrap: interpreter check, venv creation, activation,
//! dependency installation.
//!
//! Every external tool runs through a [`runner::StepRunner`], so the whole
//! sequence can be driven without a real interpreter.

pub mod activation;
pub mod bootstrap;
pub mod builder;
pub mod error;
pub mod installer;
pub mod interpreter;
pub mod layout;
pub mod log;
pub mod marker;
pub mod runner;

pub use bootstrap::{BootstrapOptions, BootstrapReport, Bootstrapper};
pub use error::BootstrapError;
