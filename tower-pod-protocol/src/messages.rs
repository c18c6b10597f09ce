//! Message types for host <-> pod communication
//!
//! Requests arrive as bencode maps keyed by `op`; responses are maps
//! correlated by `id` and tagged with a `status` list.

use crate::value::WireValue;

/// Status tags carried in invoke responses
pub mod status {
    pub const DONE: &str = "done";
    pub const ERROR: &str = "error";
}

/// Operation kinds understood by the pod
pub mod op {
    pub const DESCRIBE: &str = "describe";
    pub const INVOKE: &str = "invoke";
    pub const SHUTDOWN: &str = "shutdown";
}

/// Failure to interpret a well-formed wire value as a response
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    #[error("message is not a map")]
    NotAMap,

    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("field '{0}' has the wrong shape")]
    InvalidField(&'static str),
}

/// Messages sent from the host to the pod
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Ask for the namespaces and control ops the pod exposes
    Describe,

    /// Call a var with JSON-encoded positional arguments
    Invoke(InvokeRequest),

    /// Terminate the pod
    Shutdown,

    /// An `op` this pod does not recognize
    Unknown { op: String },

    /// An invoke that lacks required fields; `id` is kept when present so
    /// the failure can still be reported
    Malformed { id: Option<String>, reason: String },
}

/// Payload of an `invoke` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeRequest {
    pub id: String,
    /// Fully-qualified var, e.g. `pod.tower.raw/list-apps`
    pub var: String,
    /// JSON text of the argument array
    pub args: String,
}

impl InvokeRequest {
    /// The var name after the last namespace separator
    pub fn var_name(&self) -> &str {
        self.var.rsplit('/').next().unwrap_or(&self.var)
    }
}

impl Request {
    /// Interpret a decoded wire value. Never fails: shapes that cannot be
    /// routed become [`Request::Unknown`] or [`Request::Malformed`].
    pub fn from_wire(value: &WireValue) -> Self {
        if !value.is_dict() {
            return Request::Malformed {
                id: None,
                reason: MessageError::NotAMap.to_string(),
            };
        }

        match value.get_str("op").unwrap_or("") {
            op::DESCRIBE => Request::Describe,
            op::SHUTDOWN => Request::Shutdown,
            op::INVOKE => {
                let id = value.get_str("id").map(str::to_string);
                let field = |name: &'static str| {
                    value
                        .get(name)
                        .ok_or(MessageError::MissingField(name))?
                        .as_str()
                        .map(str::to_string)
                        .ok_or(MessageError::InvalidField(name))
                };

                let parsed = field("id").and_then(|id| {
                    Ok(InvokeRequest {
                        id,
                        var: field("var")?,
                        args: field("args")?,
                    })
                });

                match parsed {
                    Ok(invoke) => Request::Invoke(invoke),
                    Err(e) => Request::Malformed {
                        id,
                        reason: e.to_string(),
                    },
                }
            }
            other => Request::Unknown {
                op: other.to_string(),
            },
        }
    }

    /// Wire form of this request
    pub fn to_wire(&self) -> WireValue {
        match self {
            Request::Describe => WireValue::dict().with("op", op::DESCRIBE),
            Request::Shutdown => WireValue::dict().with("op", op::SHUTDOWN),
            Request::Invoke(invoke) => WireValue::dict()
                .with("op", op::INVOKE)
                .with("id", invoke.id.as_str())
                .with("var", invoke.var.as_str())
                .with("args", invoke.args.as_str()),
            Request::Unknown { op } => WireValue::dict().with("op", op.as_str()),
            Request::Malformed { id, .. } => {
                let msg = WireValue::dict().with("op", op::INVOKE);
                match id {
                    Some(id) => msg.with("id", id.as_str()),
                    None => msg,
                }
            }
        }
    }
}

/// One var exposed in a namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDescriptor {
    pub name: String,
    /// Source evaluated on the host side instead of a remote call
    pub code: Option<String>,
}

impl VarDescriptor {
    pub fn remote(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: None,
        }
    }

    pub fn with_code(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: Some(code.into()),
        }
    }
}

/// A namespace and its vars
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDescriptor {
    pub name: String,
    pub vars: Vec<VarDescriptor>,
}

/// Reply to a `describe` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeResponse {
    /// Encoding of invoke arguments and results
    pub format: String,
    pub namespaces: Vec<NamespaceDescriptor>,
    /// Control ops beyond describe/invoke
    pub ops: Vec<String>,
}

/// Messages sent from the pod to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Describe(DescribeResponse),

    /// Successful invoke; `value` is the JSON text of the result
    Done { id: String, value: String },

    /// Failed invoke; `ex_data` is JSON text carrying at least `type`
    Error {
        id: String,
        ex_message: String,
        ex_data: String,
    },
}

impl Response {
    /// Correlation id, if this is an invoke reply
    pub fn id(&self) -> Option<&str> {
        match self {
            Response::Describe(_) => None,
            Response::Done { id, .. } | Response::Error { id, .. } => Some(id),
        }
    }

    /// Wire form of this response
    pub fn to_wire(&self) -> WireValue {
        match self {
            Response::Describe(describe) => {
                let namespaces = describe
                    .namespaces
                    .iter()
                    .map(|ns| {
                        let vars = ns
                            .vars
                            .iter()
                            .map(|var| {
                                let entry = WireValue::dict().with("name", var.name.as_str());
                                match &var.code {
                                    Some(code) => entry.with("code", code.as_str()),
                                    None => entry,
                                }
                            })
                            .collect::<Vec<_>>();
                        WireValue::dict()
                            .with("name", ns.name.as_str())
                            .with("vars", vars)
                    })
                    .collect::<Vec<_>>();

                let ops = describe
                    .ops
                    .iter()
                    .fold(WireValue::dict(), |acc, name| acc.with(name, WireValue::dict()));

                WireValue::dict()
                    .with("format", describe.format.as_str())
                    .with("namespaces", namespaces)
                    .with("ops", ops)
            }
            Response::Done { id, value } => WireValue::dict()
                .with("value", value.as_str())
                .with("id", id.as_str())
                .with("status", vec![WireValue::from(status::DONE)]),
            Response::Error {
                id,
                ex_message,
                ex_data,
            } => WireValue::dict()
                .with("ex-message", ex_message.as_str())
                .with("ex-data", ex_data.as_str())
                .with("id", id.as_str())
                .with(
                    "status",
                    vec![WireValue::from(status::DONE), WireValue::from(status::ERROR)],
                ),
        }
    }

    /// Interpret a decoded wire value (host side)
    pub fn from_wire(value: &WireValue) -> Result<Self, MessageError> {
        if !value.is_dict() {
            return Err(MessageError::NotAMap);
        }

        let string = |name: &'static str| {
            value
                .get(name)
                .ok_or(MessageError::MissingField(name))?
                .as_str()
                .map(str::to_string)
                .ok_or(MessageError::InvalidField(name))
        };

        if let Some(namespaces) = value.get("namespaces") {
            return parse_describe(value, namespaces);
        }

        let statuses = value
            .get("status")
            .ok_or(MessageError::MissingField("status"))?
            .as_list()
            .ok_or(MessageError::InvalidField("status"))?;
        let failed = statuses.iter().any(|s| s.as_str() == Some(status::ERROR));

        if failed {
            Ok(Response::Error {
                id: string("id")?,
                ex_message: string("ex-message")?,
                ex_data: string("ex-data")?,
            })
        } else {
            Ok(Response::Done {
                id: string("id")?,
                value: string("value")?,
            })
        }
    }
}

fn parse_describe(value: &WireValue, namespaces: &WireValue) -> Result<Response, MessageError> {
    let format = value
        .get_str("format")
        .ok_or(MessageError::MissingField("format"))?
        .to_string();

    let namespaces = namespaces
        .as_list()
        .ok_or(MessageError::InvalidField("namespaces"))?
        .iter()
        .map(|ns| {
            let name = ns
                .get_str("name")
                .ok_or(MessageError::MissingField("name"))?
                .to_string();
            let vars = ns
                .get("vars")
                .and_then(WireValue::as_list)
                .ok_or(MessageError::InvalidField("vars"))?
                .iter()
                .map(|var| {
                    Ok(VarDescriptor {
                        name: var
                            .get_str("name")
                            .ok_or(MessageError::MissingField("name"))?
                            .to_string(),
                        code: var.get_str("code").map(str::to_string),
                    })
                })
                .collect::<Result<Vec<_>, MessageError>>()?;
            Ok(NamespaceDescriptor { name, vars })
        })
        .collect::<Result<Vec<_>, MessageError>>()?;

    let ops = match value.get("ops") {
        Some(WireValue::Dict(entries)) => entries
            .iter()
            .map(|(k, _)| String::from_utf8_lossy(k).into_owned())
            .collect(),
        Some(_) => return Err(MessageError::InvalidField("ops")),
        None => Vec::new(),
    };

    Ok(Response::Describe(DescribeResponse {
        format,
        namespaces,
        ops,
    }))
}
