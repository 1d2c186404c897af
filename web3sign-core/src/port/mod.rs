//! Command/response port
//!
//! The message surface the UI talks to. Commands arrive as adjacently tagged
//! JSON (`{"tag": "SIGN", "data": {"key": "..."}}`); direct answers and error
//! reports leave through a broadcast channel, while store listings flow out
//! of the sync watch channel as `GOT_DOCS`.

pub mod handler;
pub mod messages;

pub use handler::Port;
pub use messages::{Command, ErrorReport, Response, INVALID_COMMAND_TAG};
