// SPDX-License-Identifier: MIT
//
// platecrop-core — Types, errors, and configuration shared across all crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::SessionConfig;
pub use error::{PlatecropError, Result};
pub use types::*;
