//! # trackforged-av
//!
//! Media-facing half of trackforged. Nothing in here decodes or rewrites
//! media; it only describes files and the instructions an external engine
//! should run on them.
//!
//! This crate provides functionality for:
//! - Turning ffprobe JSON (from a subprocess or a host payload) into a
//!   [`ProbeReport`]
//! - Reading the top-level MP4 atom layout straight from a file
//! - Deciding whether a file already has a faststart layout
//! - Building flat stream-mapping instructions for the transcode engine
//!
//! ## Features
//!
//! - `tracing` - Enable tracing support
//!
//! ## Example
//!
//! ```
//! use trackforged_av::probe::parse_probe_json;
//! use trackforged_av::faststart::{detect, FaststartStatus};
//!
//! let json = r#"{
//!     "streams": [{"index": 0, "codec_type": "video"}],
//!     "format": {"format_name": "mov,mp4,m4a", "probe_score": 100}
//! }"#;
//! let report = parse_probe_json(json)?;
//! assert_eq!(detect(&report.structure).status, FaststartStatus::Optimized);
//! # Ok::<(), trackforged_av::Error>(())
//! ```

mod error;
pub mod faststart;
pub mod instruction;
pub mod mp4;
pub mod probe;
pub mod tools;

// Re-exports
pub use error::{Error, Result};
pub use faststart::{detect, Detection, FaststartStatus};
pub use instruction::{Instruction, InstructionBuilder};
pub use probe::{FormatInfo, ProbeReport, StreamInventory, StreamRecord, StructuralMetadata};
pub use tools::{check_tool, check_tools, require_tool, ToolInfo};
