//! Operation catalog
//!
//! Built once at startup from the API namespace's registration table and
//! read-only afterwards. Each operation is keyed by its host-facing name.

use std::collections::BTreeMap;
use std::fmt;

use tower_api::{Annotation, CallFn, Module, Namespace, TypeHint};
use tracing::{debug, info, warn};

use crate::convention::host_name;

/// Name of the implicit client parameter every entry point takes
const CLIENT_PARAM: &str = "client";

/// Name of the structured body parameter
pub const BODY_PARAM: &str = "body";

/// Why a module was left out of the catalog
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DiscoveryError {
    #[error("no synchronous entry point")]
    NoSyncEntryPoint,

    #[error("parameter '{param}' has an unresolvable type: {reason}")]
    UnresolvedAnnotation { param: String, reason: String },
}

/// A declared parameter of an operation
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDescriptor {
    /// Lookup key for incoming options, with reserved-word markers stripped
    pub name: String,
    /// Keyword name the entry point expects
    pub target_name: &'static str,
    /// Declared type; `None` means unconstrained
    pub hint: Option<TypeHint>,
}

/// One invocable operation
#[derive(Clone)]
pub struct OperationDescriptor {
    pub name: String,
    pub params: Vec<ParamDescriptor>,
    /// The whole option map is the single `body` argument
    pub body_only: bool,
    call: CallFn,
}

impl OperationDescriptor {
    /// Inspect a module's entry point
    pub fn from_module(module: &Module) -> Result<Self, DiscoveryError> {
        let call = module.sync.ok_or(DiscoveryError::NoSyncEntryPoint)?;

        let mut params: Vec<ParamDescriptor> = Vec::new();
        for param in module.params.iter().filter(|p| p.name != CLIENT_PARAM) {
            let hint = match &param.annotation {
                Annotation::Missing => None,
                Annotation::Resolved(hint) => Some(hint.clone()),
                Annotation::Unresolved(reason) => {
                    return Err(DiscoveryError::UnresolvedAnnotation {
                        param: param.name.to_string(),
                        reason: reason.clone(),
                    })
                }
            };

            let descriptor = ParamDescriptor {
                name: param.name.trim_end_matches('_').to_string(),
                target_name: param.name,
                hint,
            };
            // A later parameter stripping to the same key takes its place
            match params.iter_mut().find(|p| p.name == descriptor.name) {
                Some(existing) => *existing = descriptor,
                None => params.push(descriptor),
            }
        }

        let body_only = matches!(
            params.as_slice(),
            [only] if only.name == BODY_PARAM
                && only.hint.as_ref().and_then(TypeHint::as_model).is_some()
        );

        Ok(Self {
            name: host_name(module.name),
            params,
            body_only,
            call,
        })
    }

    pub fn call(&self) -> CallFn {
        self.call
    }

    pub fn param(&self, name: &str) -> Option<&ParamDescriptor> {
        self.params.iter().find(|p| p.name == name)
    }
}

impl fmt::Debug for OperationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("body_only", &self.body_only)
            .finish()
    }
}

/// Immutable map of operation name to descriptor
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    operations: BTreeMap<String, OperationDescriptor>,
}

impl Catalog {
    /// Build the catalog from a namespace, omitting modules that cannot be
    /// inspected
    pub fn discover(namespace: &Namespace) -> Self {
        let mut operations = BTreeMap::new();

        for module in &namespace.modules {
            match OperationDescriptor::from_module(module) {
                Ok(op) => {
                    if operations.contains_key(&op.name) {
                        warn!(op = %op.name, module = module.name, "Duplicate operation name, keeping first");
                        continue;
                    }
                    debug!(op = %op.name, params = op.params.len(), body_only = op.body_only, "Discovered operation");
                    operations.insert(op.name.clone(), op);
                }
                Err(e) => {
                    debug!(module = module.name, reason = %e, "Skipping module");
                }
            }
        }

        info!(
            namespace = namespace.path,
            operations = operations.len(),
            "Operation catalog built"
        );
        Self { operations }
    }

    pub fn get(&self, name: &str) -> Option<&OperationDescriptor> {
        self.operations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Operation names in catalog order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
