//! Adapter module - external control via TCP socket with JSON protocol
//!
//! This module lets an external agent (bot, CLI, test harness) drive one
//! 2048 game through a TCP socket connection. It is a caller of the core and
//! never touches the board directly: every command is funnelled to the single
//! thread that owns the game.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7778)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Controller Assignment**: First client to hello becomes the controller
//! 4. **Commanding**: Controller sends one action per `command`
//! 5. **Observation Streaming**: Clients that asked for it get an observation
//!    after every applied command
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: Handshake with client info and `stream_observations`
//! - **command**: `action` is one of `up`, `down`, `left`, `right`, `restart`
//! - **observe**: Request a single observation
//!
//! ## Server → Client
//!
//! - **welcome**: Role (`controller` / `observer`) and board size
//! - **ack**: Command applied; `changed` tells whether the board moved
//! - **observation**: Board, score, status, counters and a stable board hash
//! - **error**: `invalid_argument`, `not_controller`, `handshake_required`,
//!   `parse_error`, `out_of_order`, `backpressure`, ...
//!
//! # Environment Variables
//!
//! - `TWENTY48_AI_HOST`: Bind address (default: "127.0.0.1")
//! - `TWENTY48_AI_PORT`: Port number (default: 7778)
//! - `TWENTY48_AI_MAX_PENDING`: Command queue depth (default: 10)
//! - `TWENTY48_AI_DISABLED`: Set to "1" or "true" to disable adapter entirely
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":1700000000000,"client":{"name":"bot","version":"0.1"},"protocol_version":"1.0.0","stream_observations":true}
//! Server -> Client: {"type":"welcome","seq":1,"ts":1700000000001,"protocol_version":"1.0.0","client_id":1,"role":"controller","controller_id":1,"game_id":"twenty48","board_size":4}
//! Server -> Client: {"type":"observation","seq":1,"ts":1700000000002,"board":{"size":4,"cells":[[0,2,0,0],...]},"score":0,"status":"playing",...}
//! Client -> Server: {"type":"command","seq":2,"ts":1700000000010,"action":"left"}
//! Server -> Client: {"type":"ack","seq":2,"ts":1700000000011,"status":"ok","changed":true}
//! ```
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 7778
//! {"type":"hello","seq":1,"ts":0,"client":{"name":"nc","version":"0"},"protocol_version":"1.0.0","stream_observations":true}
//! ```

pub mod protocol;
pub mod runtime;
pub mod server;

pub use twenty48_core as core;
pub use twenty48_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use runtime::{handle_inbound, Adapter, InboundCommand, InboundPayload, OutboundMessage};
pub use server::*;
