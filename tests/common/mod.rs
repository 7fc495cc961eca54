//! Shared utilities for integration testing.
//!
//! `start_mock_node` serves JSON-RPC over plain HTTP/1.1 on an ephemeral port,
//! answering each method with whatever the test's handler returns.

use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Methods received by a mock node, in arrival order.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<(String, Value)>>>);

#[allow(dead_code)]
impl CallLog {
    pub fn methods(&self) -> Vec<String> {
        self.0.lock().unwrap().iter().map(|(m, _)| m.clone()).collect()
    }

    pub fn params_of(&self, method: &str) -> Option<Value> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, p)| p.clone())
    }

    pub fn all_params_of(&self, method: &str) -> Vec<Value> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, p)| p.clone())
            .collect()
    }

    fn record(&self, method: &str, params: &Value) {
        self.0.lock().unwrap().push((method.to_string(), params.clone()));
    }
}

/// Start a mock node. The handler maps `(method, params)` to a result or an error message.
pub async fn start_mock_node<F>(handler: F) -> (String, CallLog)
where
    F: Fn(&str, &Value) -> Result<Value, String> + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);
    let log = CallLog::default();
    let task_log = log.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let handler = handler.clone();
                    let log = task_log.clone();
                    tokio::spawn(async move {
                        let _ = serve(socket, handler.as_ref(), &log).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (format!("http://{}", addr), log)
}

async fn serve<F>(mut socket: TcpStream, handler: &F, log: &CallLog) -> std::io::Result<()>
where
    F: Fn(&str, &Value) -> Result<Value, String>,
{
    let body = read_body(&mut socket).await?;
    let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let response = match request {
        Value::Array(batch) => Value::Array(batch.iter().map(|r| answer(r, handler, log)).collect()),
        single => answer(&single, handler, log),
    };

    let payload = response.to_string();
    let http = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        payload.len(),
        payload
    );
    socket.write_all(http.as_bytes()).await?;
    socket.shutdown().await
}

fn answer<F>(request: &Value, handler: &F, log: &CallLog) -> Value
where
    F: Fn(&str, &Value) -> Result<Value, String>,
{
    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let method = request.get("method").and_then(Value::as_str).unwrap_or_default();
    let params = request.get("params").cloned().unwrap_or(Value::Null);
    log.record(method, &params);

    match handler(method, &params) {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err(message) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": -32000, "message": message }
        }),
    }
}

async fn read_body(socket: &mut TcpStream) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(Vec::new());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Ok(buf[header_end..].to_vec())
}

/// Left-pad a value into a 32-byte ABI word, as returned by `eth_call`.
#[allow(dead_code)]
pub fn abi_word(hex_value: &str) -> String {
    format!("0x{:0>64}", hex_value.trim_start_matches("0x"))
}

/// A successful, mined receipt for `tx_hash`.
#[allow(dead_code)]
pub fn receipt_json(tx_hash: &str, status: bool) -> Value {
    json!({
        "transactionHash": tx_hash,
        "transactionIndex": "0x0",
        "blockHash": format!("0x{}", "ab".repeat(32)),
        "blockNumber": "0x10",
        "from": "0x0000000000000000000000000000000000000001",
        "to": "0xfcd22438ad6ed564a1c26151df73f6b33b817b56",
        "cumulativeGasUsed": "0x5208",
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "contractAddress": null,
        "logs": [],
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "type": "0x2",
        "status": if status { "0x1" } else { "0x0" }
    })
}
