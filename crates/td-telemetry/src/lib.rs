//! Logging setup for the triage dashboard.
//!
//! The dashboard owns stdout for drawing, so the binary logs to a file;
//! `init_logging` writes to stderr for headless callers and tests.

pub mod logging;
