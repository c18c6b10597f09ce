//! Dispatch loop
//!
//! Reads one request at a time from the host, routes it, and writes the
//! reply before reading the next. Failures while invoking are reported to
//! the host and never end the loop; only a framing error, end of input, or
//! a shutdown request does.


use std::time::Instant;

use futures::{SinkExt, StreamExt};
use serde_json::{Map, Value};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite};
use tower_api::{ApiError, AuthenticatedClient, Kwargs};
use tower_pod_protocol::{
    CodecError, DescribeResponse, InvokeRequest, PodCodec, Request, Response,
};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::config::{NamespaceConfig, PodConfig};
use crate::convention;
use crate::describe::describe;
use crate::error::BridgeError;
use crate::extras::Extras;
use crate::marshal::marshal;
use crate::serialize::serialize;

/// What to do after handling a request
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Respond(Response),
    /// Nothing is written back
    Ignore,
    Shutdown,
}

/// Why [`Pod::serve`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    Shutdown,
    EndOfInput,
}

/// The pod: an API client, the operation catalog, and the extra operations
///
/// Everything here is built once before serving and only read afterwards.
pub struct Pod {
    client: AuthenticatedClient,
    catalog: Catalog,
    extras: Extras,
    describe: DescribeResponse,
}

impl Pod {
    pub fn new(
        client: AuthenticatedClient,
        catalog: Catalog,
        extras: Extras,
        names: &NamespaceConfig,
    ) -> Self {
        let describe = describe(&catalog, &extras, names);
        Self {
            client,
            catalog,
            extras,
            describe,
        }
    }

    /// Build the client and discover the default API namespace
    pub fn from_config(config: &PodConfig) -> Result<Self, ApiError> {
        let client = AuthenticatedClient::new(config.api.client_config())?;
        let catalog = Catalog::discover(&tower_api::api::default::namespace());
        Ok(Self::new(client, catalog, Extras::builtin(), &config.pod))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn extras(&self) -> &Extras {
        &self.extras
    }

    /// Serve requests until shutdown or end of input
    ///
    /// A framing error is returned as-is; the stream cannot be resynchronized.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<Stop, CodecError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut requests = FramedRead::new(reader, PodCodec::new());
        let mut responses = FramedWrite::new(writer, PodCodec::new());

        info!(
            operations = self.catalog.len(),
            extras = self.extras.len(),
            "Pod serving"
        );

        while let Some(request) = requests.next().await {
            match self.handle(request?).await {
                Flow::Respond(response) => responses.send(response).await?,
                Flow::Ignore => {}
                Flow::Shutdown => {
                    info!("Shutdown requested");
                    return Ok(Stop::Shutdown);
                }
            }
        }

        info!("Input closed");
        Ok(Stop::EndOfInput)
    }

    /// Route one request
    pub async fn handle(&self, request: Request) -> Flow {
        match request {
            Request::Describe => {
                debug!("Describe");
                Flow::Respond(Response::Describe(self.describe.clone()))
            }
            Request::Invoke(invoke) => Flow::Respond(self.handle_invoke(invoke).await),
            Request::Shutdown => Flow::Shutdown,
            Request::Unknown { op } => {
                warn!(op = %op, "Ignoring unrecognized op");
                Flow::Ignore
            }
            Request::Malformed { id: Some(id), reason } => {
                warn!(id = %id, reason = %reason, "Malformed invoke");
                Flow::Respond(error_response(id, &BridgeError::MalformedRequest(reason)))
            }
            Request::Malformed { id: None, reason } => {
                warn!(reason = %reason, "Malformed request without id, ignoring");
                Flow::Ignore
            }
        }
    }

    async fn handle_invoke(&self, invoke: InvokeRequest) -> Response {
        let start = Instant::now();
        let op = invoke.var_name();
        debug!(id = %invoke.id, op = %op, args = %invoke.args, "Invoke");

        let result = match parse_args(&invoke.args) {
            Ok(args) => self.invoke(op, args).await,
            Err(e) => Err(e),
        };
        let result = result.and_then(|value| serde_json::to_string(&value).map_err(Into::into));
        let elapsed_ms = start.elapsed().as_millis();

        match result {
            Ok(value) => {
                info!(id = %invoke.id, op = %op, elapsed_ms = %elapsed_ms, "Invoke completed");
                Response::Done {
                    id: invoke.id,
                    value,
                }
            }
            Err(e) => {
                warn!(
                    id = %invoke.id,
                    op = %op,
                    elapsed_ms = %elapsed_ms,
                    kind = e.kind(),
                    error = %e,
                    "Invoke failed"
                );
                error_response(invoke.id, &e)
            }
        }
    }

    /// Call an operation by host-facing name with positional arguments
    ///
    /// Extra operations get the arguments as they are. Catalog operations
    /// read their options from the first argument when it is a map.
    pub async fn invoke(&self, op: &str, args: Vec<Value>) -> Result<Value, BridgeError> {
        if let Some(handler) = self.extras.get(op) {
            return handler(&args);
        }

        let descriptor = self
            .catalog
            .get(op)
            .ok_or_else(|| BridgeError::UnknownOperation(op.to_string()))?;

        let opts = match args.into_iter().next() {
            Some(first @ Value::Object(_)) => match convention::to_target(first) {
                Value::Object(map) => map,
                _ => Map::new(),
            },
            _ => Map::new(),
        };

        let mut kwargs = Kwargs::new();
        match descriptor.params.as_slice() {
            [body] if descriptor.body_only => {
                let arg = marshal(&body.name, Value::Object(opts), body.hint.as_ref())?;
                kwargs.insert(body.target_name, arg);
            }
            params => {
                let mut opts = opts;
                for param in params {
                    if let Some(value) = opts.remove(&param.name) {
                        let arg = marshal(&param.name, value, param.hint.as_ref())?;
                        kwargs.insert(param.target_name, arg);
                    }
                }
            }
        }

        let output = (descriptor.call())(&self.client, kwargs).await?;
        serialize(output)
    }
}

/// Decode the JSON text of an invoke's argument list
fn parse_args(args: &str) -> Result<Vec<Value>, BridgeError> {
    let parsed: Value = serde_json::from_str(args)
        .map_err(|e| BridgeError::MalformedRequest(format!("args is not valid JSON: {}", e)))?;
    match parsed {
        Value::Array(items) => Ok(items),
        other => Err(BridgeError::MalformedRequest(format!(
            "args must be a JSON array, got {}",
            other
        ))),
    }
}

fn error_response(id: String, error: &BridgeError) -> Response {
    Response::Error {
        id,
        ex_message: error.to_string(),
        ex_data: serde_json::json!({ "type": error.kind() }).to_string(),
    }
}
