//! TCP server for the control adapter
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking; the game itself never runs here.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{debug, info, warn};

use crate::protocol::*;
use crate::runtime::{InboundCommand, InboundPayload, OutboundMessage};
use crate::types::GameAction;

/// Pull `seq` out of a line that failed to parse, so the error can echo it.
fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub protocol_version: String,
    pub max_pending_commands: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7778,
            protocol_version: PROTOCOL_VERSION.to_string(),
            max_pending_commands: 10,
        }
    }
}

impl ServerConfig {
    /// Create from `TWENTY48_AI_*` environment variables
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let host = env::var("TWENTY48_AI_HOST")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = env::var("TWENTY48_AI_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);
        let max_pending_commands = env::var("TWENTY48_AI_MAX_PENDING")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.max_pending_commands);

        Self {
            host,
            port,
            protocol_version: defaults.protocol_version,
            max_pending_commands,
        }
    }

    /// `host:port` as handed to the listener (host names are resolved on bind)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Major component of the spoken protocol version, e.g. `"1."`
    fn major_prefix(&self) -> String {
        let major = self.protocol_version.split('.').next().unwrap_or("");
        format!("{}.", major)
    }
}

/// Shared server state
pub struct ServerState {
    config: ServerConfig,
    clients: Arc<RwLock<Vec<ClientHandle>>>,
    controller: Arc<RwLock<Option<usize>>>,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            clients: Arc::new(RwLock::new(Vec::new())),
            controller: Arc::new(RwLock::new(None)),
        }
    }

    /// Check if the adapter is disabled via environment
    pub fn is_disabled() -> bool {
        std::env::var("TWENTY48_AI_DISABLED")
            .map(|v| {
                let v = v.trim();
                v == "1" || v.eq_ignore_ascii_case("true")
            })
            .unwrap_or(false)
    }
}

async fn is_handshaken(state: &Arc<ServerState>, client_id: usize) -> bool {
    let clients = state.clients.read().await;
    clients
        .iter()
        .find(|c| c.id == client_id)
        .map(|c| c.handshaken)
        .unwrap_or(false)
}

/// Record `seq` for the client; false if it is not strictly increasing.
async fn check_and_update_seq(state: &Arc<ServerState>, client_id: usize, seq: u64) -> bool {
    let mut clients = state.clients.write().await;
    let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
        return true;
    };

    match client.last_seq {
        Some(prev) if seq <= prev => false,
        _ => {
            client.last_seq = Some(seq);
            true
        }
    }
}

/// Handle to a connected client
pub struct ClientHandle {
    pub id: usize,
    pub stream_observations: bool,
    pub handshaken: bool,
    pub last_seq: Option<u64>,
    pub tx: mpsc::UnboundedSender<ClientOutbound>,
}

/// Message queued for one client's writer task
#[derive(Debug, Clone)]
pub enum ClientOutbound {
    Welcome(WelcomeMessage),
    Ack(AckMessage),
    Error(ErrorMessage),
    Observation(ObservationMessage),
}

impl ClientOutbound {
    fn write_json(&self, buf: &mut Vec<u8>) -> serde_json::Result<()> {
        match self {
            ClientOutbound::Welcome(m) => serde_json::to_writer(buf, m),
            ClientOutbound::Ack(m) => serde_json::to_writer(buf, m),
            ClientOutbound::Error(m) => serde_json::to_writer(buf, m),
            ClientOutbound::Observation(m) => serde_json::to_writer(buf, m),
        }
    }
}

async fn send_to(state: &Arc<ServerState>, client_id: usize, msg: ClientOutbound) {
    let clients = state.clients.read().await;
    if let Some(c) = clients.iter().find(|c| c.id == client_id) {
        let _ = c.tx.send(msg);
    }
}

/// Route messages produced by the engine loop to the connected clients.
async fn dispatch_outbound(
    state: Arc<ServerState>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
) {
    while let Some(msg) = out_rx.recv().await {
        match msg {
            OutboundMessage::ToClientAck { client_id, ack } => {
                send_to(&state, client_id, ClientOutbound::Ack(ack)).await;
            }
            OutboundMessage::ToClientError { client_id, err } => {
                send_to(&state, client_id, ClientOutbound::Error(err)).await;
            }
            OutboundMessage::ToClientObservation { client_id, obs } => {
                send_to(&state, client_id, ClientOutbound::Observation(obs)).await;
            }
            OutboundMessage::BroadcastObservation { obs } => {
                let clients = state.clients.read().await;
                for c in clients.iter().filter(|c| c.stream_observations) {
                    let _ = c.tx.send(ClientOutbound::Observation(obs.clone()));
                }
            }
        }
    }
}

/// Start the TCP server
///
/// Commands from clients go out through `command_tx`; replies produced by the
/// engine loop come back through `out_rx`. `ready_tx` receives the bound
/// address once the listener is up (useful with port 0).
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    let bound = listener.local_addr()?;
    info!(addr = %bound, "adapter listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState::new(config));
    tokio::spawn(dispatch_outbound(Arc::clone(&state), out_rx));

    let mut client_id_counter = 0usize;
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;

        info!(client_id, %addr, "client connected");

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, client_id, state, command_tx).await {
                warn!(client_id, error = %e, "client error");
            }
            info!(client_id, "client disconnected");
        });
    }
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    client_id: usize,
    state: Arc<ServerState>,
    command_tx: mpsc::Sender<InboundCommand>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);

    let (tx, mut rx) = mpsc::unbounded_channel::<ClientOutbound>();

    {
        let mut clients = state.clients.write().await;
        clients.push(ClientHandle {
            id: client_id,
            stream_observations: false,
            handshaken: false,
            last_seq: None,
            tx: tx.clone(),
        });
    }

    let write_task = tokio::spawn(async move {
        let mut buf: Vec<u8> = Vec::with_capacity(1024);
        while let Some(msg) = rx.recv().await {
            buf.clear();
            if msg.write_json(&mut buf).is_err() {
                continue;
            }
            buf.push(b'\n');
            if writer.write_all(&buf).await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
    });

    let reply = |msg: ErrorMessage| {
        let _ = tx.send(ClientOutbound::Error(msg));
    };

    let mut line = String::new();
    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        debug!(client_id, line = trimmed, "received");

        match parse_message(trimmed) {
            Ok(ParsedMessage::Hello(hello)) => {
                if is_handshaken(&state, client_id).await
                    && !check_and_update_seq(&state, client_id, hello.seq).await
                {
                    reply(create_error(
                        hello.seq,
                        ErrorCode::OutOfOrder,
                        "seq must be strictly increasing",
                    ));
                    continue;
                }

                if !hello
                    .protocol_version
                    .starts_with(&state.config.major_prefix())
                {
                    reply(create_error(
                        hello.seq,
                        ErrorCode::ProtocolMismatch,
                        &format!("protocol version {} not supported", hello.protocol_version),
                    ));
                    break;
                }

                // First client to say hello becomes controller.
                let (role, controller_id) = {
                    let mut controller = state.controller.write().await;
                    let mut clients = state.clients.write().await;
                    let takes_control = controller.is_none();
                    if takes_control {
                        *controller = Some(client_id);
                    }
                    if let Some(client) = clients.iter_mut().find(|c| c.id == client_id) {
                        client.handshaken = true;
                        client.last_seq = Some(hello.seq);
                        client.stream_observations = hello.stream_observations;
                    }
                    let role = if *controller == Some(client_id) {
                        AssignedRole::Controller
                    } else {
                        AssignedRole::Observer
                    };
                    (role, controller.map(|id| id as u64))
                };
                info!(
                    client_id,
                    client = %hello.client.name,
                    ?role,
                    "handshake complete"
                );

                let _ = tx.send(ClientOutbound::Welcome(create_welcome(
                    hello.seq,
                    &state.config.protocol_version,
                    client_id as u64,
                    role,
                    controller_id,
                )));

                if hello.stream_observations
                    && command_tx
                        .try_send(InboundCommand {
                            client_id,
                            seq: hello.seq,
                            payload: InboundPayload::SnapshotRequest,
                        })
                        .is_err()
                {
                    reply(create_error(
                        hello.seq,
                        ErrorCode::Backpressure,
                        "command queue is full; send observe to fetch the board",
                    ));
                }
            }

            Ok(ParsedMessage::Command(cmd)) => {
                if !is_handshaken(&state, client_id).await {
                    reply(create_error(
                        cmd.seq,
                        ErrorCode::HandshakeRequired,
                        "send hello before command",
                    ));
                    continue;
                }

                if !check_and_update_seq(&state, client_id, cmd.seq).await {
                    reply(create_error(
                        cmd.seq,
                        ErrorCode::OutOfOrder,
                        "seq must be strictly increasing",
                    ));
                    continue;
                }

                let is_controller = *state.controller.read().await == Some(client_id);
                if !is_controller {
                    reply(create_error(
                        cmd.seq,
                        ErrorCode::NotController,
                        "only the controller may send commands",
                    ));
                    continue;
                }

                let Some(action) = GameAction::from_str(&cmd.action) else {
                    reply(create_error(
                        cmd.seq,
                        ErrorCode::InvalidArgument,
                        &format!("unknown action: {}", cmd.action),
                    ));
                    continue;
                };

                // Ack is sent by the engine loop once the action is applied.
                if command_tx
                    .try_send(InboundCommand {
                        client_id,
                        seq: cmd.seq,
                        payload: InboundPayload::Action(action),
                    })
                    .is_err()
                {
                    reply(create_error(
                        cmd.seq,
                        ErrorCode::Backpressure,
                        "command queue is full",
                    ));
                }
            }

            Ok(ParsedMessage::Observe(obs)) => {
                if !is_handshaken(&state, client_id).await {
                    reply(create_error(
                        obs.seq,
                        ErrorCode::HandshakeRequired,
                        "send hello before observe",
                    ));
                    continue;
                }

                if !check_and_update_seq(&state, client_id, obs.seq).await {
                    reply(create_error(
                        obs.seq,
                        ErrorCode::OutOfOrder,
                        "seq must be strictly increasing",
                    ));
                    continue;
                }

                if command_tx
                    .try_send(InboundCommand {
                        client_id,
                        seq: obs.seq,
                        payload: InboundPayload::SnapshotRequest,
                    })
                    .is_err()
                {
                    reply(create_error(
                        obs.seq,
                        ErrorCode::Backpressure,
                        "command queue is full",
                    ));
                }
            }

            Ok(ParsedMessage::Unknown(unknown)) => {
                reply(create_error(
                    unknown.seq,
                    ErrorCode::InvalidCommand,
                    "unknown message type",
                ));
            }

            Err(e) => {
                let seq = extract_seq_best_effort(trimmed).unwrap_or(0);
                reply(create_error(
                    seq,
                    ErrorCode::ParseError,
                    &format!("JSON parse error: {}", e),
                ));
            }
        }
    }

    // Remove the client and hand control to the lowest remaining id.
    {
        let mut controller = state.controller.write().await;
        let mut clients = state.clients.write().await;

        let was_controller = *controller == Some(client_id);
        clients.retain(|c| c.id != client_id);

        if was_controller {
            let next_id = clients.iter().filter(|c| c.handshaken).map(|c| c.id).min();
            *controller = next_id;
            match next_id {
                Some(new_id) => info!(client_id = new_id, "controller promoted"),
                None => info!(client_id, "controller released"),
            }
        }
    }

    drop(tx);
    let _ = write_task.await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_seq_best_effort() {
        assert_eq!(extract_seq_best_effort(r#"{"seq": 42, "type": "#), Some(42));
        assert_eq!(extract_seq_best_effort(r#"{"type":"command","seq":7"#), Some(7));
        assert_eq!(extract_seq_best_effort(r#"{"seq":"x"}"#), None);
        assert_eq!(extract_seq_best_effort("garbage"), None);
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 7778);
        assert_eq!(config.protocol_version, PROTOCOL_VERSION);
        assert_eq!(config.max_pending_commands, 10);
        assert_eq!(config.bind_addr(), "127.0.0.1:7778");
    }

    #[test]
    fn test_major_prefix() {
        let config = ServerConfig::default();
        assert_eq!(config.major_prefix(), "1.");
        assert!("1.4.2".starts_with(&config.major_prefix()));
        assert!(!"2.0.0".starts_with(&config.major_prefix()));
    }

    #[test]
    fn test_client_outbound_serializes_one_object() {
        let mut buf = Vec::new();
        ClientOutbound::Ack(create_ack(3, true))
            .write_json(&mut buf)
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["type"], "ack");
        assert_eq!(value["seq"], 3);
        assert_eq!(value["changed"], true);
    }
}
