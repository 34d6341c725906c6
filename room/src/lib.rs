//! The thin Room/transport layer: seating, buy-in, ready-gating and
//! disconnect handling over a `texas_engine::Table`, plus the websocket
//! action protocol from spec §6 (see `main.rs` for the transport itself).

pub mod config;
pub mod error;
pub mod protocol;
pub mod room;
pub mod snapshot;

pub use config::RoomConfig;
pub use error::RoomError;
pub use protocol::{ClientAction, ServerEvent};
pub use room::Room;
pub use snapshot::{RoomPlayerView, RoomPublicState};
