//! Logging and span export.
//!
//! Everything in the crate logs through `tracing`. This module installs the
//! subscriber that receives it:
//!
//! ```text
//! tracing macros ─┬─▶ fmt layer ─────────────────────────────▶ stderr
//!                 └─▶ tracing-opentelemetry ─▶ JsonLinesExporter ─▶ trace file
//! ```
//!
//! The span export half is only wired when `trace_file` is configured. The
//! trace file rotates at 10 MiB and keeps three numbered backups.
//!
//! # Modules
//!
//! - [`init`]: subscriber setup and level resolution
//! - `tracer`: OpenTelemetry provider with the JSON-lines exporter
//! - `span_formatter`: one-object-per-span JSON rendering
//! - `file_writer`: size-rotated line writer

mod file_writer;
pub mod init;
mod span_formatter;
mod tracer;

pub use init::init_tracing;
