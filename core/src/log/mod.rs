//! Reading lines out of the game log.
//!
//! - **decode**: permissive byte → text conversion for a single line
//! - **tail**: follow a growing file from its end, yielding complete lines

mod decode;
pub mod tail;

pub use decode::decode_line;
pub use tail::{LineSource, PollConfig};
