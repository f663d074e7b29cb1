//! Session actor - message loop processing events and network responses

use tokio::sync::mpsc;

use crate::app::state::{SessionState, SharedResolver};
use crate::config::SessionConfig;
use crate::debounce::{ChannelScheduler, CommitTicket};
use crate::messages::{NetworkCommand, NetworkResponse, SessionEvent, SessionSnapshot};

/// Session actor owning all mutable request state
pub struct SessionActor {
    state: SessionState<ChannelScheduler>,
    commit_rx: mpsc::UnboundedReceiver<CommitTicket>,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    snapshot_tx: mpsc::UnboundedSender<SessionSnapshot>,
}

impl SessionActor {
    pub fn new(
        config: SessionConfig,
        auth: SharedResolver,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        snapshot_tx: mpsc::UnboundedSender<SessionSnapshot>,
    ) -> Self {
        let (commit_tx, commit_rx) = mpsc::unbounded_channel();
        SessionActor {
            state: SessionState::new(config, auth, ChannelScheduler::new(commit_tx)),
            commit_rx,
            network_tx,
            snapshot_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut event_rx: mpsc::UnboundedReceiver<SessionEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // Send initial snapshot
        self.publish();

        loop {
            tokio::select! {
                event = event_rx.recv() => {
                    match event {
                        Some(event) => {
                            if self.handle_event(event) {
                                break;
                            }
                            self.publish();
                        }
                        None => break,
                    }
                }
                Some(ticket) = self.commit_rx.recv() => {
                    self.state.commit_due(ticket);
                    self.publish();
                }
                Some(response) = net_rx.recv() => {
                    self.state.handle_response(response);
                    self.publish();
                }
            }
        }

        self.state.close();
        let _ = self.network_tx.send(NetworkCommand::Shutdown);
    }

    fn publish(&self) {
        let _ = self.snapshot_tx.send(self.state.to_snapshot());
    }

    /// Handle an event, returns true if quit was requested
    fn handle_event(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::SelectEndpoint(endpoint) => self.state.select_endpoint(endpoint),
            SessionEvent::EditText(text) => {
                self.state.edit_text(text);
            }
            SessionEvent::SetValues(values) => self.state.set_values(values),
            SessionEvent::SetParameter { name, value } => self.state.set_parameter(name, value),
            SessionEvent::RemoveParameter { name } => {
                self.state.remove_parameter(&name);
            }
            SessionEvent::LoadExample(index) => {
                self.state.load_example(index);
            }
            SessionEvent::Send => {
                if let Some(cmd) = self.state.prepare_request() {
                    let _ = self.network_tx.send(cmd);
                }
            }
            SessionEvent::ClearOutput => self.state.clear_output(),
            SessionEvent::SelectCodeView(view) => self.state.select_code_view(view),
            SessionEvent::Close => self.state.close(),
            SessionEvent::Quit => return true,
        }

        false
    }
}
