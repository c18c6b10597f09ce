//! Message codec for stdio framing
//!
//! Bencode values are self-delimiting, so each message is exactly one
//! top-level value with no length header.

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::bencode::{self, DecodeError, Scanner};
use crate::messages::{MessageError, Request, Response};
use crate::value::WireValue;

/// Maximum message size (16 MB)
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Protocol codec error
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Invalid message: {0}")]
    Message(#[from] MessageError),

    #[error("Message too large: {size} bytes (max {max})")]
    MessageTooLarge { size: usize, max: usize },
}

/// Codec for Request (decoding) and Response (encoding)
/// Used by the pod side
pub struct PodCodec {
    scanner: Scanner,
}

impl PodCodec {
    pub fn new() -> Self {
        Self {
            scanner: Scanner::new(),
        }
    }
}

impl Default for PodCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for PodCodec {
    type Item = Request;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        Ok(decode_value(&mut self.scanner, src)?.map(|value| Request::from_wire(&value)))
    }
}

impl Encoder<Response> for PodCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        encode_value(&item.to_wire(), dst)
    }
}

/// Codec for Request (encoding) and Response (decoding)
/// Used by the host side and by tests driving a pod
pub struct HostCodec {
    scanner: Scanner,
}

impl HostCodec {
    pub fn new() -> Self {
        Self {
            scanner: Scanner::new(),
        }
    }
}

impl Default for HostCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for HostCodec {
    type Item = Response;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match decode_value(&mut self.scanner, src)? {
            Some(value) => Ok(Some(Response::from_wire(&value)?)),
            None => Ok(None),
        }
    }
}

impl Encoder<Request> for HostCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Request, dst: &mut BytesMut) -> Result<(), Self::Error> {
        encode_value(&item.to_wire(), dst)
    }
}

/// Raw values, for sending shapes the typed requests cannot express
impl Encoder<WireValue> for HostCodec {
    type Error = CodecError;

    fn encode(&mut self, item: WireValue, dst: &mut BytesMut) -> Result<(), Self::Error> {
        encode_value(&item, dst)
    }
}

/// Decode one self-delimited value
///
/// The scanner finds where the value ends, resuming where the last call
/// stopped; only then is the complete value decoded.
fn decode_value(
    scanner: &mut Scanner,
    src: &mut BytesMut,
) -> Result<Option<WireValue>, CodecError> {
    let Some(end) = scanner.scan(src) else {
        if src.len() > MAX_MESSAGE_SIZE {
            return Err(CodecError::MessageTooLarge {
                size: src.len(),
                max: MAX_MESSAGE_SIZE,
            });
        }
        return Ok(None);
    };
    scanner.reset();

    match bencode::decode(&src[..end])? {
        Some((value, used)) => {
            src.advance(used);
            Ok(Some(value))
        }
        None => Err(DecodeError {
            offset: end,
            reason: "value ended early",
        }
        .into()),
    }
}

/// Encode one value
fn encode_value(value: &WireValue, dst: &mut BytesMut) -> Result<(), CodecError> {
    let start = dst.len();
    bencode::encode_into(value, dst);

    let size = dst.len() - start;
    if size > MAX_MESSAGE_SIZE {
        dst.truncate(start);
        return Err(CodecError::MessageTooLarge {
            size,
            max: MAX_MESSAGE_SIZE,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{DescribeResponse, InvokeRequest, NamespaceDescriptor, VarDescriptor};

    #[test]
    fn test_request_roundtrip() {
        let mut host = HostCodec::new();
        let mut pod = PodCodec::new();

        let req = Request::Invoke(InvokeRequest {
            id: "1".into(),
            var: "pod.tower.raw/secret-preview".into(),
            args: r#"["sk_live_abcdef1234"]"#.into(),
        });

        let mut buf = BytesMut::new();
        host.encode(req.clone(), &mut buf).unwrap();

        let decoded = pod.decode(&mut buf).unwrap().unwrap();
        assert_eq!(decoded, req);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_response_roundtrip() {
        let mut pod = PodCodec::new();
        let mut host = HostCodec::new();

        let resp = Response::Describe(DescribeResponse {
            format: "json".into(),
            namespaces: vec![NamespaceDescriptor {
                name: "pod.tower.raw".into(),
                vars: vec![VarDescriptor::remote("list-apps")],
            }],
            ops: vec!["shutdown".into()],
        });

        let mut buf = BytesMut::new();
        pod.encode(resp.clone(), &mut buf).unwrap();

        let decoded = host.decode(&mut buf).unwrap().unwrap();
        assert_eq!(decoded, resp);
    }

    #[test]
    fn test_partial_message() {
        let mut host = HostCodec::new();
        let mut pod = PodCodec::new();

        let mut buf = BytesMut::new();
        host.encode(Request::Describe, &mut buf).unwrap();

        // Split buffer to simulate partial read
        let mut partial = buf.split_to(5);

        assert!(pod.decode(&mut partial).unwrap().is_none());

        partial.unsplit(buf);

        assert_eq!(pod.decode(&mut partial).unwrap(), Some(Request::Describe));
    }

    #[test]
    fn test_message_arriving_in_small_chunks() {
        let mut host = HostCodec::new();
        let mut pod = PodCodec::new();

        let req = Request::Invoke(InvokeRequest {
            id: "7".into(),
            var: "pod.tower.raw/create-secret".into(),
            args: format!(r#"[{{"value": "{}"}}]"#, "s".repeat(4096)),
        });
        let mut encoded = BytesMut::new();
        host.encode(req.clone(), &mut encoded).unwrap();
        host.encode(Request::Shutdown, &mut encoded).unwrap();

        let mut buf = BytesMut::new();
        let mut decoded = Vec::new();
        for chunk in encoded.chunks(13) {
            buf.extend_from_slice(chunk);
            while let Some(request) = pod.decode(&mut buf).unwrap() {
                decoded.push(request);
            }
        }
        assert_eq!(decoded, vec![req, Request::Shutdown]);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_multiple_messages_in_buffer() {
        let mut host = HostCodec::new();
        let mut pod = PodCodec::new();

        let mut buf = BytesMut::new();
        host.encode(Request::Describe, &mut buf).unwrap();
        host.encode(Request::Unknown { op: "load-ns".into() }, &mut buf)
            .unwrap();
        host.encode(Request::Shutdown, &mut buf).unwrap();

        assert_eq!(pod.decode(&mut buf).unwrap(), Some(Request::Describe));
        assert_eq!(
            pod.decode(&mut buf).unwrap(),
            Some(Request::Unknown { op: "load-ns".into() })
        );
        assert_eq!(pod.decode(&mut buf).unwrap(), Some(Request::Shutdown));

        // Buffer should be empty now
        assert!(pod.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_malformed_bytes_fail() {
        let mut pod = PodCodec::new();
        let mut buf = BytesMut::from(&b"d2:op?e"[..]);

        let result = pod.decode(&mut buf);
        assert!(matches!(result, Err(CodecError::Decode(_))));
    }

    #[test]
    fn test_message_too_large_on_decode() {
        let mut pod = PodCodec::new();
        let mut buf = BytesMut::new();

        // A string whose declared length never arrives
        buf.extend_from_slice(b"99999999:");
        buf.extend_from_slice(&vec![b'a'; MAX_MESSAGE_SIZE]);

        let result = pod.decode(&mut buf);
        assert!(matches!(result, Err(CodecError::MessageTooLarge { .. })));
    }

    #[test]
    fn test_raw_value_encoding() {
        let mut host = HostCodec::new();
        let mut buf = BytesMut::new();
        host.encode(WireValue::dict().with("op", "describe"), &mut buf)
            .unwrap();
        assert_eq!(&buf[..], b"d2:op8:describee");
    }

    #[tokio::test]
    async fn test_framed_over_duplex() {
        use futures::{SinkExt, StreamExt};
        use tokio_util::codec::{FramedRead, FramedWrite};

        let (client, server) = tokio::io::duplex(64);
        let mut writer = FramedWrite::new(client, HostCodec::new());
        let mut reader = FramedRead::new(server, PodCodec::new());

        writer.send(Request::Describe).await.unwrap();
        writer.send(Request::Shutdown).await.unwrap();
        drop(writer);

        assert_eq!(reader.next().await.unwrap().unwrap(), Request::Describe);
        assert_eq!(reader.next().await.unwrap().unwrap(), Request::Shutdown);
        assert!(reader.next().await.is_none());
    }
}
