//! Output sink and structured outcome types.

pub mod outcome;
pub mod sink;

pub use outcome::{CheckOutcome, OutputFormat, APPLICATION};
pub use sink::{format_log_line, CaptureSession, Sink};
