use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1::Builder as ConnectionBuilder;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::{TokioIo, TokioTimer};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc::{channel, Receiver, Sender};
use tokio::sync::Semaphore;

/// In-process backend answering every request with the same status and body.
/// Received requests are forwarded as `(path, json body)`.
pub struct MockBackend {
    addr: SocketAddr,
    requests: Receiver<(String, serde_json::Value)>,
    gate: Option<Arc<Semaphore>>,
}

impl MockBackend {
    pub async fn start(status: StatusCode, reply: String) -> Self {
        Self::spawn(status, reply, None).await
    }

    /// Like `start`, but every reply waits for a call to `release`.
    pub async fn start_held(status: StatusCode, reply: String) -> Self {
        Self::spawn(status, reply, Some(Arc::new(Semaphore::new(0)))).await
    }

    async fn spawn(status: StatusCode, reply: String, gate: Option<Arc<Semaphore>>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (sender, requests) = channel(100);
        tokio::task::spawn(handle_requests(listener, sender, status, Bytes::from(reply), gate.clone()));
        MockBackend { addr, requests, gate }
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn next_request(&mut self) -> (String, serde_json::Value) {
        self.requests.recv().await.expect("mock backend stopped")
    }

    pub fn try_next_request(&mut self) -> Option<(String, serde_json::Value)> {
        self.requests.try_recv().ok()
    }
}

async fn handle_requests(
    listener: TcpListener,
    sender: Sender<(String, serde_json::Value)>,
    status: StatusCode,
    reply: Bytes,
    gate: Option<Arc<Semaphore>>,
) {
    loop {
        let (tcp, _remote_address) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(_) => return,
        };
        let sender = sender.clone();
        let reply = reply.clone();
        let gate = gate.clone();
        tokio::task::spawn(async move {
            let service = hyper::service::service_fn(move |req: Request<Incoming>| {
                let sender = sender.clone();
                let reply = reply.clone();
                let gate = gate.clone();
                async move {
                    let path = req.uri().path().to_string();
                    let body = req.into_body().collect().await?.to_bytes();
                    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
                    let _ = sender.send((path, json)).await;
                    if let Some(gate) = gate {
                        gate.acquire().await.unwrap().forget();
                    }
                    let response = Response::builder()
                        .status(status)
                        .header("Content-Type", "application/json")
                        .body(Full::new(reply))
                        .unwrap();
                    Ok::<_, hyper::Error>(response)
                }
            });

            let _ = ConnectionBuilder::new()
                .timer(TokioTimer::new())
                .serve_connection(TokioIo::new(tcp), service)
                .await;
        });
    }
}
