//! Adapter runtime integration.
//!
//! Bridges the synchronous engine loop with the async TCP server. The engine
//! never leaves the thread that owns it: the server forwards commands through a
//! bounded channel and the loop answers through an unbounded one.

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::core::{GameState, TileSource};
use crate::protocol::{build_observation, create_ack, AckMessage, ErrorMessage, ObservationMessage};
use crate::server::{run_server, ServerConfig, ServerState};
use crate::types::GameAction;

/// Command delivered to the engine loop.
#[derive(Debug, Clone)]
pub struct InboundCommand {
    pub client_id: usize,
    pub seq: u64,
    pub payload: InboundPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundPayload {
    /// Apply an action, then ack it and broadcast an observation
    Action(GameAction),
    /// Send one observation to the requesting client
    SnapshotRequest,
}

/// Outbound message to be delivered by the server.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    ToClientAck { client_id: usize, ack: AckMessage },
    ToClientError { client_id: usize, err: ErrorMessage },
    ToClientObservation { client_id: usize, obs: ObservationMessage },
    BroadcastObservation { obs: ObservationMessage },
}

/// Apply one inbound command to the game and produce the replies.
///
/// `out_seq` is the server-side sequence counter for observations; it is
/// bumped once per observation produced.
pub fn handle_inbound<R: TileSource>(
    game: &mut GameState<R>,
    cmd: &InboundCommand,
    out_seq: &mut u64,
) -> Vec<OutboundMessage> {
    match cmd.payload {
        InboundPayload::Action(action) => {
            let changed = game.apply_action(action);
            *out_seq += 1;
            let obs = build_observation(&game.snapshot(), *out_seq);
            vec![
                OutboundMessage::ToClientAck {
                    client_id: cmd.client_id,
                    ack: create_ack(cmd.seq, changed),
                },
                OutboundMessage::BroadcastObservation { obs },
            ]
        }
        InboundPayload::SnapshotRequest => {
            *out_seq += 1;
            vec![OutboundMessage::ToClientObservation {
                client_id: cmd.client_id,
                obs: build_observation(&game.snapshot(), *out_seq),
            }]
        }
    }
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
}

impl Adapter {
    /// Start the adapter with an explicit configuration.
    pub fn start(config: ServerConfig) -> Result<Self> {
        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();

        let rt = Runtime::new().context("failed to create tokio runtime")?;
        rt.spawn(async move {
            if let Err(e) = run_server(config, cmd_tx, out_rx, None).await {
                warn!(error = %e, "adapter server stopped");
            }
        });

        Ok(Self {
            _rt: rt,
            cmd_rx,
            out_tx,
        })
    }

    /// Start the adapter from environment variables.
    ///
    /// Returns None if `TWENTY48_AI_DISABLED` is set.
    pub fn start_from_env() -> Result<Option<Self>> {
        if ServerState::is_disabled() {
            info!("adapter disabled via TWENTY48_AI_DISABLED");
            return Ok(None);
        }
        Self::start(ServerConfig::from_env()).map(Some)
    }

    /// Block the calling (non-async) thread until a command arrives.
    ///
    /// Returns None once the server has shut down.
    pub fn recv_blocking(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.blocking_recv()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }
}
