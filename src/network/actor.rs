//! Network actor - runs HTTP requests in the Tokio async runtime

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::Transport;
use crate::network::executor::RequestExecutor;

/// Network actor that processes execute commands.
///
/// Requests are never cancelled once sent; the session decides whether a
/// late result is still wanted.
pub struct NetworkActor<T: Transport + 'static> {
    executor: Arc<RequestExecutor<T>>,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl<T: Transport + 'static> NetworkActor<T> {
    pub fn new(transport: T, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            executor: Arc::new(RequestExecutor::new(transport)),
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    pub fn executor(&self) -> Arc<RequestExecutor<T>> {
        Arc::clone(&self.executor)
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                // Handle incoming commands
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Execute { id, request }) => {
                            let response_tx = self.response_tx.clone();
                            let executor = Arc::clone(&self.executor);

                            self.active_requests.spawn(async move {
                                tracing::info!(
                                    id,
                                    url = %request.url,
                                    method = ?request.method,
                                    "Executing request"
                                );
                                let result = executor.send(&request).await;
                                tracing::info!(
                                    id,
                                    status = ?result.status_code(),
                                    "Request completed"
                                );
                                let _ = response_tx.send(NetworkResponse::Completed { id, result });
                            });
                        }

                        Some(NetworkCommand::Shutdown) | None => break,
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }
}
