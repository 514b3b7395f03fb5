//! Output sink with scoped capture sessions.
//!
//! All human-readable output flows through a [`Sink`]. A [`CaptureSession`]
//! temporarily redirects the sink into an in-memory buffer and restores the
//! previous destination on every exit path, so redirected state never leaks
//! into a later check. Sessions nest: ending (or dropping) a session restores
//! whatever destination was active when it was acquired.
//!
//! Execution is single-threaded (see the crate docs), so the sink uses plain
//! interior mutability rather than locks.

use std::cell::RefCell;

use chrono::Local;

enum Target {
    Stdout,
    Capture { buf: String, prev: Box<Target> },
}

/// Process output boundary: a `write_line` primitive with capture support.
pub struct Sink {
    target: RefCell<Target>,
}

impl Sink {
    /// A sink writing to the process stdout.
    pub fn stdout() -> Self {
        Sink {
            target: RefCell::new(Target::Stdout),
        }
    }

    /// Write one line (a trailing newline is appended) to the active target.
    pub fn write_line(&self, line: &str) {
        match &mut *self.target.borrow_mut() {
            Target::Stdout => println!("{}", line),
            Target::Capture { buf, .. } => {
                buf.push_str(line);
                buf.push('\n');
            }
        }
    }

    /// Write a log-formatted line: `timestamp - name - INFO - message`.
    pub fn info(&self, name: &str, message: &str) {
        self.write_line(&format_log_line(name, "INFO", message));
    }

    /// Redirect output into an in-memory buffer until the returned session
    /// ends or is dropped.
    pub fn capture(&self) -> CaptureSession<'_> {
        let mut target = self.target.borrow_mut();
        let prev = std::mem::replace(&mut *target, Target::Stdout);
        *target = Target::Capture {
            buf: String::new(),
            prev: Box::new(prev),
        };
        drop(target);
        CaptureSession {
            sink: self,
            ended: false,
        }
    }

    fn end_capture(&self) -> String {
        let mut target = self.target.borrow_mut();
        match std::mem::replace(&mut *target, Target::Stdout) {
            Target::Capture { buf, prev } => {
                *target = *prev;
                buf
            }
            other => {
                // not capturing; leave the target as it was
                *target = other;
                String::new()
            }
        }
    }
}

impl Default for Sink {
    fn default() -> Self {
        Sink::stdout()
    }
}

/// Scoped redirection of a [`Sink`] into a buffer.
///
/// Restoration is guaranteed: [`CaptureSession::end`] restores the previous
/// target and returns the captured text, and dropping an un-ended session
/// restores the target while discarding the buffer.
pub struct CaptureSession<'a> {
    sink: &'a Sink,
    ended: bool,
}

impl CaptureSession<'_> {
    /// End the session, restoring the previous target, and return everything
    /// written while it was active.
    pub fn end(mut self) -> String {
        self.ended = true;
        self.sink.end_capture()
    }
}

impl Drop for CaptureSession<'_> {
    fn drop(&mut self) {
        if !self.ended {
            self.sink.end_capture();
        }
    }
}

/// Format a log line the way the clean commands emit them:
/// `2024-01-01 12:00:00,123 - name - INFO - message`.
pub fn format_log_line(name: &str, level: &str, message: &str) -> String {
    let now = Local::now();
    format!(
        "{},{:03} - {} - {} - {}",
        now.format("%Y-%m-%d %H:%M:%S"),
        now.timestamp_subsec_millis(),
        name,
        level,
        message
    )
}
