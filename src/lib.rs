/*!
 * # subburn - Subtitle burn-in core for media pipelines
 *
 * A Rust library implementing the document model and timing engine of a
 * subtitle overlay stage, plus the format renegotiation protocol the stage
 * runs when its downstream consumer cannot accept the upstream video format.
 *
 * ## Features
 *
 * - Parse SubRip-style scripts into time-indexed, styled subtitle entries
 * - Resolve inline markup (`<b>`, `<i>`, `<u>`, `<s>`) into styled ranges
 * - Query the entries active at any playback instant
 * - Hot-swap scripts during playback through a copy-on-write store handle
 * - Negotiate a forced upstream downgrade from high to standard bit depth
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timecode`: `HH:MM:SS,mmm` codec over a monotonic tick count
 * - `markup`: inline tag resolution producing styled text ranges
 * - `script`: SubRip script parsing with strict/lenient recovery
 * - `store`: time-indexed entry storage and playback queries
 * - `negotiation`: connection-time format negotiation protocol
 * - `app_config`: configuration management
 * - `app_controller`: main application controller
 * - `file_utils`: file system operations
 * - `errors`: custom error types for the library
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod markup;
pub mod negotiation;
pub mod script;
pub mod store;
pub mod timecode;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, NegotiationError, ScriptError};
pub use markup::{resolve_markup, StyleRange};
pub use negotiation::{
    FormatClasses, FormatDescriptor, MediaMajor, NegotiationContext, Negotiator, UpstreamPin,
};
pub use script::{parse_script, parse_script_file, ParseDiagnostic, ParsePolicy, ScriptDocument};
pub use store::{SharedStore, SubtitleEntry, TimedEntryStore};
pub use timecode::TimeCode;
