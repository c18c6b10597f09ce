//! tower-pod: Tower API bridge for a dynamic host over stdio
//!
//! The host sends bencode requests on stdin and reads replies on stdout.
//! Operations come from the `tower-api` registration table, discovered once
//! at startup into a [`Catalog`]; the host calls them by hyphenated name with
//! a single option map, which is re-keyed, marshalled into typed arguments,
//! and the typed result serialized back with hyphenated keys.
//!
//! # Modules
//! - [`catalog`]: operation discovery
//! - [`convention`]: hyphen/underscore key conversion
//! - [`marshal`]: generic values to typed arguments
//! - [`serialize`]: typed results to generic values
//! - [`extras`]: pod-local operations
//! - [`describe`]: the describe reply
//! - [`dispatch`]: the request loop
//! - [`config`]: configuration loading

pub mod catalog;
pub mod config;
pub mod convention;
pub mod describe;
pub mod dispatch;
pub mod error;
pub mod extras;
pub mod marshal;
pub mod serialize;

pub use catalog::{Catalog, DiscoveryError, OperationDescriptor, ParamDescriptor};
pub use config::{ConfigLoader, PodConfig};
pub use dispatch::{Flow, Pod, Stop};
pub use error::BridgeError;
pub use extras::Extras;
