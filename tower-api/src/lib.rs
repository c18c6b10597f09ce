//! tower-api: Typed client for the Tower HTTP API
//!
//! Every endpoint lives in its own module under [`api::default`] and is
//! registered in [`api::default::namespace`] together with its declared
//! parameters, so callers that only know names at runtime can discover
//! and invoke endpoints without compile-time knowledge of them.
//!
//! Data-model types implement [`Model`], which gives each of them the
//! generic-map capability pair used by dynamic callers:
//! [`ModelType::from_generic`] and [`DataModel::to_generic`].

pub mod api;
pub mod client;
pub mod error;
pub mod models;
pub mod types;

pub use client::{AuthenticatedClient, ClientConfig};
pub use error::{ApiError, ApiResult};
pub use types::{
    Annotation, Arg, CallFn, DataModel, Kwargs, Model, ModelType, Module, Namespace, Output,
    Param, TypeHint,
};
