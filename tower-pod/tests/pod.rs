//! End-to-end tests driving the pod over an in-memory pipe
//!
//! Only requests that are answered without reaching the network are used:
//! describe, extra operations, and calls rejected before any request is sent.

use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::io::{DuplexStream, ReadHalf, WriteHalf};
use tokio_util::codec::{FramedRead, FramedWrite};
use tower_pod::{ConfigLoader, Pod, PodConfig, Stop};
use tower_pod_protocol::{HostCodec, InvokeRequest, Request, Response};

struct Host {
    tx: FramedWrite<WriteHalf<DuplexStream>, HostCodec>,
    rx: FramedRead<ReadHalf<DuplexStream>, HostCodec>,
}

impl Host {
    async fn send(&mut self, request: Request) {
        self.tx.send(request).await.unwrap();
    }

    async fn invoke(&mut self, id: &str, var: &str, args: &str) {
        self.send(Request::Invoke(InvokeRequest {
            id: id.into(),
            var: var.into(),
            args: args.into(),
        }))
        .await;
    }

    async fn recv(&mut self) -> Response {
        self.rx.next().await.unwrap().unwrap()
    }
}

/// Start a pod with the default configuration; returns the host end and the
/// serve task
fn start() -> (Host, tokio::task::JoinHandle<Stop>) {
    let mut config = PodConfig::default();
    config.api.url = "http://127.0.0.1:9".into();
    ConfigLoader::validate(&config).unwrap();
    let pod = Pod::from_config(&config).unwrap();

    let (host_side, pod_side) = tokio::io::duplex(64 * 1024);
    let (host_read, host_write) = tokio::io::split(host_side);
    let (pod_read, pod_write) = tokio::io::split(pod_side);

    let task = tokio::spawn(async move { pod.serve(pod_read, pod_write).await.unwrap() });
    let host = Host {
        tx: FramedWrite::new(host_write, HostCodec::new()),
        rx: FramedRead::new(host_read, HostCodec::new()),
    };
    (host, task)
}

fn ex_type(response: &Response) -> String {
    let Response::Error { ex_data, .. } = response else {
        panic!("expected error, got {:?}", response);
    };
    let data: Value = serde_json::from_str(ex_data).unwrap();
    data["type"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_describe_counts_operations_and_extras() {
    let (mut host, task) = start();

    host.send(Request::Describe).await;
    let Response::Describe(describe) = host.recv().await else {
        panic!("expected describe");
    };

    let raw = &describe.namespaces[0];
    assert_eq!(raw.name, "pod.tower.raw");
    // 13 API operations with a synchronous entry point, plus 2 extras
    assert_eq!(raw.vars.len(), 13 + 2);
    assert!(raw.vars.iter().any(|v| v.name == "describe-secrets-key"));
    assert!(!raw.vars.iter().any(|v| v.name == "stream-run-logs"));

    let wrapper = &describe.namespaces[1];
    assert_eq!(wrapper.name, "pod.tower");
    assert!(wrapper.vars.iter().all(|v| v.code.is_some()));

    host.send(Request::Shutdown).await;
    assert_eq!(task.await.unwrap(), Stop::Shutdown);
}

#[tokio::test]
async fn test_secret_preview_scenario() {
    let (mut host, task) = start();

    host.invoke("1", "pod.tower.raw/secret-preview", r#"["sk_live_abcdef1234"]"#)
        .await;
    assert_eq!(
        host.recv().await,
        Response::Done {
            id: "1".into(),
            value: r#""XXXXXXXXXXXXXX1234""#.into(),
        }
    );

    drop(host);
    assert_eq!(task.await.unwrap(), Stop::EndOfInput);
}

#[tokio::test]
async fn test_failures_do_not_stop_the_loop() {
    let (mut host, task) = start();

    host.invoke("a", "pod.tower.raw/no-such-op", "[{}]").await;
    let response = host.recv().await;
    assert_eq!(response.id(), Some("a"));
    assert_eq!(ex_type(&response), "UnknownOperation");

    // Missing body field: rejected while building the typed body
    host.invoke("b", "pod.tower.raw/create-app", r#"[{"short-description": "x"}]"#)
        .await;
    let response = host.recv().await;
    assert_eq!(response.id(), Some("b"));
    assert_eq!(ex_type(&response), "MarshalError");

    // Missing required keyword: rejected by the endpoint before sending
    host.invoke("c", "pod.tower.raw/describe-app", "[{}]").await;
    let response = host.recv().await;
    assert_eq!(ex_type(&response), "TypeError");

    host.invoke("d", "pod.tower.raw/encrypt-secret", r#"["not a pem", "v"]"#)
        .await;
    assert_eq!(ex_type(&host.recv().await), "CryptoError");

    host.invoke("e", "pod.tower/secret-preview", r#"["1234567"]"#)
        .await;
    assert_eq!(
        host.recv().await,
        Response::Done {
            id: "e".into(),
            value: r#""XXX4567""#.into(),
        }
    );

    host.send(Request::Shutdown).await;
    assert_eq!(task.await.unwrap(), Stop::Shutdown);
}

#[tokio::test]
async fn test_shutdown_emits_nothing() {
    let (mut host, task) = start();

    host.send(Request::Shutdown).await;
    assert_eq!(task.await.unwrap(), Stop::Shutdown);

    // The pod side is gone; the host sees end of stream, not a reply
    assert!(host.rx.next().await.is_none());
}
