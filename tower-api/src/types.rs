//! Runtime description of the API surface
//!
//! These types let a caller that only holds generic JSON values find an
//! endpoint by name, see what it accepts, build typed arguments for it and
//! get a result back without naming any concrete model type.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::client::AuthenticatedClient;
use crate::error::{ApiError, ApiResult};

// ==================== Data models ====================

/// A request or response body type with a generic-map representation
pub trait Model: Serialize + DeserializeOwned + fmt::Debug + Send + Sync + 'static {
    /// Type name, as reported in errors
    const NAME: &'static str;
}

/// Object-safe view of a [`Model`]
pub trait DataModel: fmt::Debug + Send + Sync + 'static {
    fn type_name(&self) -> &'static str;

    /// Convert to a generic map using field names as declared
    fn to_generic(&self) -> ApiResult<Map<String, Value>>;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

impl<T: Model> DataModel for T {
    fn type_name(&self) -> &'static str {
        T::NAME
    }

    fn to_generic(&self) -> ApiResult<Map<String, Value>> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(ApiError::Decode(format!(
                "{} serialized to a non-object: {}",
                T::NAME,
                other
            ))),
            Err(e) => Err(ApiError::Decode(e.to_string())),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

/// Type tag for a [`Model`], carrying its construct-from-map capability
#[derive(Clone, Copy)]
pub struct ModelType {
    name: &'static str,
    construct: fn(Map<String, Value>) -> ApiResult<Box<dyn DataModel>>,
}

impl ModelType {
    pub fn of<T: Model>() -> Self {
        Self {
            name: T::NAME,
            construct: construct::<T>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Build a typed instance from a generic map
    pub fn from_generic(&self, map: Map<String, Value>) -> ApiResult<Box<dyn DataModel>> {
        (self.construct)(map)
    }
}

fn construct<T: Model>(map: Map<String, Value>) -> ApiResult<Box<dyn DataModel>> {
    let model: T =
        serde_json::from_value(Value::Object(map)).map_err(|e| ApiError::ModelConstruction {
            model: T::NAME,
            message: e.to_string(),
        })?;
    Ok(Box::new(model))
}

impl fmt::Debug for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModelType({})", self.name)
    }
}

impl PartialEq for ModelType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

// ==================== Declared types ====================

/// Declared type of an endpoint parameter
#[derive(Debug, Clone, PartialEq)]
pub enum TypeHint {
    Str,
    Int,
    Float,
    Bool,
    List(Box<TypeHint>),
    Map,
    /// The null alternative of a nullable type
    NoneType,
    /// The "not provided" alternative of an optional keyword
    Unset,
    Model(ModelType),
    /// Alternatives in declaration order
    Union(Vec<TypeHint>),
}

impl TypeHint {
    pub fn model<T: Model>() -> Self {
        TypeHint::Model(ModelType::of::<T>())
    }

    /// `Union[Unset, inner]`, the shape of optional keyword parameters
    pub fn unset_or(inner: TypeHint) -> Self {
        TypeHint::Union(vec![TypeHint::Unset, inner])
    }

    /// `Union[inner, None]`
    pub fn nullable(inner: TypeHint) -> Self {
        TypeHint::Union(vec![inner, TypeHint::NoneType])
    }

    /// The model type, if this hint names one directly
    pub fn as_model(&self) -> Option<&ModelType> {
        match self {
            TypeHint::Model(model) => Some(model),
            _ => None,
        }
    }
}

/// A parameter's annotation as found when inspecting an endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    /// No declared type; any value is accepted
    Missing,
    Resolved(TypeHint),
    /// The declared type could not be resolved
    Unresolved(String),
}

/// A formal parameter of an endpoint's call entry point
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: &'static str,
    pub annotation: Annotation,
}

impl Param {
    pub fn new(name: &'static str, hint: TypeHint) -> Self {
        Self {
            name,
            annotation: Annotation::Resolved(hint),
        }
    }

    /// The implicit client parameter every entry point takes first
    pub fn client() -> Self {
        Self {
            name: "client",
            annotation: Annotation::Missing,
        }
    }

    pub fn untyped(name: &'static str) -> Self {
        Self {
            name,
            annotation: Annotation::Missing,
        }
    }
}

// ==================== Arguments and results ====================

/// A keyword argument value
#[derive(Debug)]
pub enum Arg {
    /// Passed through as generic JSON
    Plain(Value),
    /// Already constructed as a typed model
    Model(Box<dyn DataModel>),
}

/// Keyword arguments keyed by declared parameter name
#[derive(Debug, Default)]
pub struct Kwargs {
    args: HashMap<String, Arg>,
}

impl Kwargs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, arg: Arg) {
        self.args.insert(name.into(), arg);
    }

    pub fn with(mut self, name: impl Into<String>, arg: Arg) -> Self {
        self.insert(name, arg);
        self
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.args.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Arg> {
        self.args.get(name)
    }

    /// Take a plain keyword; null counts as absent
    pub fn optional<T: DeserializeOwned>(&mut self, name: &str) -> ApiResult<Option<T>> {
        match self.args.remove(name) {
            None | Some(Arg::Plain(Value::Null)) => Ok(None),
            Some(Arg::Plain(value)) => {
                serde_json::from_value(value)
                    .map(Some)
                    .map_err(|e| ApiError::InvalidArgument {
                        name: name.to_string(),
                        message: e.to_string(),
                    })
            }
            Some(Arg::Model(model)) => Err(ApiError::InvalidArgument {
                name: name.to_string(),
                message: format!("expected a plain value, got {}", model.type_name()),
            }),
        }
    }

    pub fn required<T: DeserializeOwned>(&mut self, name: &str) -> ApiResult<T> {
        self.optional(name)?
            .ok_or_else(|| ApiError::MissingArgument(name.to_string()))
    }

    /// Take a model keyword, accepting a typed instance or a generic map
    pub fn optional_model<T: Model>(&mut self, name: &str) -> ApiResult<Option<T>> {
        match self.args.remove(name) {
            None | Some(Arg::Plain(Value::Null)) => Ok(None),
            Some(Arg::Model(model)) => {
                let actual = model.type_name();
                model
                    .into_any()
                    .downcast::<T>()
                    .map(|typed| Some(*typed))
                    .map_err(|_| ApiError::InvalidArgument {
                        name: name.to_string(),
                        message: format!("expected {}, got {}", T::NAME, actual),
                    })
            }
            Some(Arg::Plain(value)) => {
                serde_json::from_value(value)
                    .map(Some)
                    .map_err(|e| ApiError::InvalidArgument {
                        name: name.to_string(),
                        message: format!("expected {}: {}", T::NAME, e),
                    })
            }
        }
    }

    pub fn model<T: Model>(&mut self, name: &str) -> ApiResult<T> {
        self.optional_model(name)?
            .ok_or_else(|| ApiError::MissingArgument(name.to_string()))
    }

    /// Reject keywords the endpoint did not consume
    pub fn finish(self) -> ApiResult<()> {
        let mut leftover: Vec<String> = self.args.into_keys().collect();
        leftover.sort();
        match leftover.into_iter().next() {
            Some(name) => Err(ApiError::UnexpectedArgument(name)),
            None => Ok(()),
        }
    }
}

/// What an endpoint returns
#[derive(Debug)]
pub enum Output {
    None,
    Model(Box<dyn DataModel>),
    Value(Value),
}

impl Output {
    pub fn from_model<T: Model>(model: Option<T>) -> Self {
        match model {
            Some(model) => Output::Model(Box::new(model)),
            None => Output::None,
        }
    }
}

// ==================== Modules ====================

/// Synchronous call entry point: wait for the response and return it parsed
pub type CallFn = for<'a> fn(&'a AuthenticatedClient, Kwargs) -> BoxFuture<'a, ApiResult<Output>>;

/// One endpoint module
#[derive(Clone)]
pub struct Module {
    /// snake_case module name
    pub name: &'static str,
    /// Absent for endpoints that only offer a streaming shape
    pub sync: Option<CallFn>,
    /// Formal parameters of the entry point, `client` first
    pub params: Vec<Param>,
}

impl Module {
    pub fn new(name: &'static str, sync: CallFn, params: Vec<Param>) -> Self {
        Self {
            name,
            sync: Some(sync),
            params,
        }
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("sync", &self.sync.is_some())
            .field("params", &self.params)
            .finish()
    }
}

/// A package of endpoint modules
#[derive(Debug, Clone)]
pub struct Namespace {
    pub path: &'static str,
    pub modules: Vec<Module>,
}
