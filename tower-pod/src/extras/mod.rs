//! Pod-local operations
//!
//! These take the raw positional argument list, skip the catalog and
//! marshaller entirely, and never touch the network.

mod encrypt;
mod preview;

pub use encrypt::encrypt_secret;
pub use preview::preview;

use serde_json::Value;

use crate::error::BridgeError;

/// Handler for an extra operation
pub type ExtraFn = fn(&[Value]) -> Result<Value, BridgeError>;

/// Registry of extra operations, in registration order
#[derive(Clone, Default)]
pub struct Extras {
    ops: Vec<(&'static str, ExtraFn)>,
}

impl Extras {
    /// Registry with no operations
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `encrypt-secret` and `secret-preview`
    pub fn builtin() -> Self {
        let mut extras = Self::new();
        extras.register(encrypt::NAME, encrypt::call);
        extras.register(preview::NAME, preview::call);
        extras
    }

    /// Add an operation, replacing any with the same name
    pub fn register(&mut self, name: &'static str, handler: ExtraFn) {
        match self.ops.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = handler,
            None => self.ops.push((name, handler)),
        }
    }

    pub fn get(&self, name: &str) -> Option<ExtraFn> {
        self.ops
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, handler)| *handler)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.ops.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl std::fmt::Debug for Extras {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Positional string argument `index` of `op`
fn str_arg<'a>(op: &'static str, args: &'a [Value], index: usize) -> Result<&'a str, BridgeError> {
    match args.get(index) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(BridgeError::invalid_arguments(
            op,
            format!("argument {} must be a string, got {}", index, other),
        )),
        None => Err(BridgeError::invalid_arguments(
            op,
            format!("missing argument {}", index),
        )),
    }
}
