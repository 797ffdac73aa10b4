//! Wire-level behaviour of the client: framing, status handling and
//! query id discipline, driven by scripted responses.

mod common;

use std::time::Duration;

use ignite_client::core::hash_code;
use ignite_client::core::protocol::OP_CACHE_PUT;
use ignite_client::{ClientConfig, IgniteClient, IgniteError, Value};

use crate::common::{op_code_of, query_id_of, ScriptedTransport};

fn frame(query_id: i64, status: i32, body: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&((12 + body.len()) as i32).to_le_bytes());
    bytes.extend_from_slice(&query_id.to_le_bytes());
    bytes.extend_from_slice(&status.to_le_bytes());
    bytes.extend_from_slice(body);
    bytes
}

fn error_body(message: &str) -> Vec<u8> {
    let mut body = (message.len() as i32).to_le_bytes().to_vec();
    body.extend_from_slice(message.as_bytes());
    body
}

#[tokio::test]
async fn test_put_request_bytes_and_empty_success() {
    let transport = ScriptedTransport::new(|request| Some(frame(query_id_of(request), 0, &[])));
    let sent = transport.sent();
    let client = IgniteClient::with_transport(ClientConfig::default(), transport);

    let result = client.cache("myCache").put("k", 42).await.unwrap();
    assert_eq!(result.status(), 0);
    assert!(result.is_success());
    assert_eq!(result.message(), "Success");
    assert!(result.value().is_none());
    assert_eq!(result.clone().into_result().unwrap(), None);

    let sent = sent.lock().unwrap();
    let request = &sent[0];
    assert_eq!(op_code_of(request), OP_CACHE_PUT);
    assert_eq!(query_id_of(request), result.query_id());

    let mut body = Vec::new();
    body.extend_from_slice(&hash_code("myCache").to_le_bytes());
    body.push(0);
    body.extend_from_slice(&[9, 1, 0, 0, 0, b'k']);
    body.extend_from_slice(&[3, 42, 0, 0, 0]);
    assert_eq!(&request[14..], &body[..]);
    assert_eq!(
        i32::from_le_bytes(request[0..4].try_into().unwrap()) as usize,
        request.len() - 4
    );
}

#[tokio::test]
async fn test_not_found_failure() {
    let transport = ScriptedTransport::new(|request| {
        Some(frame(query_id_of(request), -1, &error_body("not found")))
    });
    let client = IgniteClient::with_transport(ClientConfig::default(), transport);

    let result = client.cache("myCache").get("k").await.unwrap();
    assert_eq!(result.status(), -1);
    assert_eq!(result.error(), Some("not found"));
    assert_eq!(result.value(), None);
}

#[tokio::test]
async fn test_empty_error_text_is_replaced() {
    let transport =
        ScriptedTransport::new(|request| Some(frame(query_id_of(request), 5, &error_body(""))));
    let client = IgniteClient::with_transport(ClientConfig::default(), transport);

    let result = client.cache("c").clear().await.unwrap();
    assert_eq!(result.status(), 5);
    assert_eq!(result.error(), Some("request failed with status 5"));
}

#[tokio::test]
async fn test_query_id_mismatch_is_protocol_error() {
    let transport =
        ScriptedTransport::new(|request| Some(frame(query_id_of(request) + 1000, 0, &[])));
    let client = IgniteClient::with_transport(ClientConfig::default(), transport);

    let err = client.cache("c").put(1, 1).await.unwrap_err();
    match err {
        IgniteError::Protocol(message) => assert!(message.contains("does not match")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_trailing_bytes_are_decode_error() {
    let transport =
        ScriptedTransport::new(|request| Some(frame(query_id_of(request), 0, &[0xFF])));
    let client = IgniteClient::with_transport(ClientConfig::default(), transport);

    let err = client.cache("c").put(1, 1).await.unwrap_err();
    assert!(matches!(err, IgniteError::Decode(_)));
}

#[tokio::test]
async fn test_unknown_type_code_is_decode_error() {
    let transport =
        ScriptedTransport::new(|request| Some(frame(query_id_of(request), 0, &[200, 1, 2])));
    let client = IgniteClient::with_transport(ClientConfig::default(), transport);

    let err = client.cache("c").get(1).await.unwrap_err();
    assert!(matches!(err, IgniteError::Decode(_)));
}

#[tokio::test]
async fn test_short_body_is_decode_error() {
    let transport = ScriptedTransport::new(|request| {
        Some(frame(query_id_of(request), 0, &[1]))
    });
    let client = IgniteClient::with_transport(ClientConfig::default(), transport);
    let ok = client.cache("c").put_if_absent(1, 1).await.unwrap();
    assert_eq!(ok.into_value(), Some(true));

    // six bytes where a Long count is expected
    let transport = ScriptedTransport::new(|request| {
        Some(frame(query_id_of(request), 0, &[9, 1, 0, 0, 0, b'x']))
    });
    let client = IgniteClient::with_transport(ClientConfig::default(), transport);
    let size = client.cache("c").get_size(&[]).await;
    assert!(matches!(size, Err(IgniteError::Decode(_))));
}

#[tokio::test]
async fn test_request_timeout_poisons_connection() {
    let config = ClientConfig::builder()
        .request_timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let transport = ScriptedTransport::new(|_| None);
    let client = IgniteClient::with_transport(config, transport);

    let err = client.cache("c").get(1).await.unwrap_err();
    assert!(matches!(err, IgniteError::Timeout(_)));

    let err = client.cache("c").get(1).await.unwrap_err();
    assert!(matches!(err, IgniteError::Connection(_)));
}

#[tokio::test]
async fn test_closed_client_rejects_requests() {
    let transport = ScriptedTransport::new(|request| Some(frame(query_id_of(request), 0, &[])));
    let client = IgniteClient::with_transport(ClientConfig::default(), transport);

    client.cache("c").put(1, Value::Null).await.unwrap();
    client.close().await.unwrap();
    let err = client.cache("c").put(1, Value::Null).await.unwrap_err();
    assert!(matches!(err, IgniteError::Connection(_)));
}

#[tokio::test]
async fn test_concurrent_requests_are_serialized() {
    let (client, node) = common::client_with_caches(&["c"]);

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let cache = client.cache("c");
            tokio::spawn(async move { cache.put(i, i * 10).await })
        })
        .collect();
    for task in tasks {
        let result = task.await.unwrap().unwrap();
        assert!(result.is_success());
    }

    let cache = client.cache("c");
    assert_eq!(cache.get_size(&[]).await.unwrap().into_value(), Some(16));
    assert_eq!(cache.get(7).await.unwrap().into_value(), Some(Value::Int(70)));
    assert_eq!(node.lock().unwrap().requests().len(), 18);
}
