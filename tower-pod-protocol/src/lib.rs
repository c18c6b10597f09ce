//! tower-pod-protocol: Wire definitions for the pod stdio protocol
//!
//! This crate defines the self-describing bencode value model, the framing
//! codecs used on stdin/stdout, and the typed request/response messages
//! exchanged between a host interpreter and the pod.

pub mod bencode;
pub mod codec;
pub mod messages;
pub mod value;

// Re-export main types at crate root
pub use bencode::DecodeError;
pub use codec::{CodecError, HostCodec, PodCodec};
pub use messages::{
    status, DescribeResponse, InvokeRequest, MessageError, NamespaceDescriptor, Request,
    Response, VarDescriptor,
};
pub use value::WireValue;

/// Payload format advertised in the describe response
pub const PAYLOAD_FORMAT: &str = "json";
