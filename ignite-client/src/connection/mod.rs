//! Connection management: the transport abstraction and its TCP implementation.

mod connection;
mod transport;

pub use connection::{Connection, ConnectionId};
pub(crate) use connection::with_timeout;
pub use transport::Transport;
