//! Core values, entity handles, and error types for OCS.
//!
//! This crate provides:
//! - [`Value`] - Plain data carried by properties and builder parameters
//! - [`EntityId`] - Generational entity identifiers
//! - [`EntityRef`] - Named entity handle passed to property hooks
//! - [`Error`] - Error kinds shared by every layer
//! - Persistent collections ([`LtVec`], [`LtMap`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod collections;
mod entity;
mod error;
mod value;

pub use collections::{LtMap, LtVec};
pub use entity::{EntityId, EntityRef};
pub use error::{Error, ErrorContext, ErrorKind, Namespace, Result};
pub use value::Value;
