//! Minimal POP3 client: USER/PASS, LIST, RETR, DELE, QUIT
//!
//! See RFC 1939. Extensions such as STLS, APOP, UIDL and TOP are not
//! spoken.

mod response;
mod session;
mod transport;

pub use response::{Envelope, Status, parse_status};
pub use session::Session;
pub use transport::{Transport, connect};
