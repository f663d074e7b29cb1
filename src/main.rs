//! Recipe Bench - run API recipes from the terminal
//!
//! Architecture:
//! - CLI front end - turns arguments into session events
//! - Session Layer - request model, JSON text sync, results
//! - Network Layer (Tokio) - async HTTP execution

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;
use tokio::sync::mpsc;

use recipe_bench::constants::LOG_FILE_NAME;
use recipe_bench::{
    Catalog, CodeView, EndpointDescriptor, NetworkActor, NetworkCommand, NetworkResponse,
    ReqwestTransport, RequestResult, SecretStore, SessionActor, SessionConfig, SessionEvent,
    SessionSnapshot,
};

#[derive(Parser)]
#[command(version, name = "recipe-bench", about = "Search, edit and send API recipes")]
struct Cli {
    /// Recipe catalog (.yaml, .yml or .json)
    catalog: PathBuf,

    /// Fuzzy search over summary, path and "project / title"
    #[arg(short, long, default_value = "")]
    query: String,

    /// Open the n-th search result (0-based); without it the matches are listed
    #[arg(short, long)]
    pick: Option<usize>,

    /// Load the recipe's n-th example body
    #[arg(short, long)]
    example: Option<usize>,

    /// Request body as JSON text
    #[arg(short, long)]
    body: Option<String>,

    /// Send the request
    #[arg(short, long)]
    send: bool,

    /// Code view to print
    #[arg(long, value_enum, default_value_t = CodeView::Curl)]
    view: CodeView,

    /// Credential for a project
    #[arg(long = "secret", value_name = "PROJECT=SECRET")]
    secrets: Vec<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

/// Caller side of a running session actor
struct SessionHandle {
    events: mpsc::UnboundedSender<SessionEvent>,
    snapshots: mpsc::UnboundedReceiver<SessionSnapshot>,
    unacknowledged: usize,
}

impl SessionHandle {
    fn send(&mut self, event: SessionEvent) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| anyhow!("Session actor stopped"))?;
        self.unacknowledged += 1;
        Ok(())
    }

    /// Wait until every sent event is reflected and nothing is pending
    async fn settle(&mut self) -> Result<SessionSnapshot> {
        loop {
            let snapshot = self
                .snapshots
                .recv()
                .await
                .ok_or_else(|| anyhow!("Session actor stopped"))?;
            self.unacknowledged = self.unacknowledged.saturating_sub(1);
            if self.unacknowledged == 0 && snapshot.is_idle() {
                return Ok(snapshot);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE_NAME);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let catalog = Catalog::load(&cli.catalog)?;
    let matches = catalog.search(&cli.query);

    let Some(index) = cli.pick else {
        print_matches(&matches);
        return Ok(());
    };
    let recipe = matches
        .get(index)
        .map(|r| (*r).clone())
        .ok_or_else(|| anyhow!("No recipe #{} for query {:?}", index, cli.query))?;

    let mut secrets = SecretStore::new();
    for assignment in &cli.secrets {
        let (project, secret) = SecretStore::parse_assignment(assignment)?;
        secrets.set(project, secret);
    }

    let mut config = SessionConfig::default();
    if let Some(secs) = cli.timeout {
        config = config.with_request_timeout(Duration::from_secs(secs));
    }

    // Create channels
    let (event_tx, event_rx) = mpsc::unbounded_channel::<SessionEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (snapshot_tx, snapshot_rx) = mpsc::unbounded_channel::<SessionSnapshot>();

    // Spawn network actor
    let transport = ReqwestTransport::new(config.request_timeout);
    let network_actor = NetworkActor::new(transport, net_resp_tx);
    let network = tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn session actor
    let session_actor = SessionActor::new(config, Arc::new(secrets), net_cmd_tx, snapshot_tx);
    let session_task = tokio::spawn(session_actor.run(event_rx, net_resp_rx));

    let mut session = SessionHandle {
        events: event_tx,
        snapshots: snapshot_rx,
        unacknowledged: 1, // initial snapshot
    };

    session.send(SessionEvent::SelectEndpoint(recipe))?;
    session.send(SessionEvent::SelectCodeView(cli.view))?;
    if let Some(example) = cli.example {
        session.send(SessionEvent::LoadExample(example))?;
    }
    if let Some(body) = cli.body {
        session.send(SessionEvent::EditText(body))?;
    }
    let mut snapshot = session.settle().await?;

    if cli.send {
        session.send(SessionEvent::Send)?;
        snapshot = session.settle().await?;
    }

    print_snapshot(&snapshot);

    session.send(SessionEvent::Quit)?;
    let _ = session_task.await;
    let _ = network.await;
    Ok(())
}

fn print_matches(matches: &[&EndpointDescriptor]) {
    if matches.is_empty() {
        println!("No recipes found.");
        return;
    }
    for (i, recipe) in matches.iter().enumerate() {
        println!("{:>3}  {:6} {}", i, recipe.method.as_str(), recipe.path);
        match &recipe.summary {
            Some(summary) => println!("     {}: {}", recipe.label(), summary),
            None => println!("     {}", recipe.label()),
        }
    }
}

fn print_snapshot(snapshot: &SessionSnapshot) {
    if let Some(endpoint) = &snapshot.endpoint {
        println!("{} {}  ({})", endpoint.method.as_str(), endpoint.path, endpoint.label());
    }
    if snapshot.needs_auth_setup {
        println!("! No secret configured for this project (use --secret PROJECT=SECRET)");
    }
    if snapshot.needs_params {
        println!("! This recipe has required parameters");
    }

    println!("\n── Request Body ──\n{}", snapshot.raw_text);

    match &snapshot.result {
        Some(RequestResult::Success(payload)) => {
            println!(
                "\n── Response {} ({}ms) ──\n{}",
                payload.status_code,
                payload.time_ms,
                payload.body.display()
            );
        }
        Some(RequestResult::Failure(err)) => println!("\n── Error ──\n{}", err),
        None => {}
    }

    println!("\n── {} ──\n{}", snapshot.code_view.as_str(), snapshot.code_preview);
}
