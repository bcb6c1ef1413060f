//! Streamed-chat protocol handling.
//!
//! The backend answers `POST /chat_stream` with a progressively delivered
//! text body of newline-delimited JSON records. [`LineFramer`] slices the
//! growing buffer into complete lines, [`decode_line`] turns each line into
//! a typed [`StreamEvent`].

mod events;
mod framer;

pub use events::{decode_line, Source, StreamEvent, DECODE_ERROR_MESSAGE};
pub use framer::LineFramer;
