pub mod error;
pub mod types;
pub mod filters;
pub mod mapping;
pub mod profile;
pub mod aggregates;
pub mod templates;
pub mod account;
pub mod builder;
pub mod seed;
pub mod config;
pub mod export;

#[cfg(feature = "runtime")]
pub mod simulation;
#[cfg(feature = "runtime")]
pub mod workspace;

pub use error::{LeadxError, Result, ValidationError};
