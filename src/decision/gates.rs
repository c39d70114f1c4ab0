//! Cheap input checks that run before any lookup.

use trackforged_common::{Error, Result};

use super::Rationale;
use crate::plugins::PluginInput;

/// Marker the host puts in the path of its intermediate files.
pub const CACHE_MARKER: &str = "-TdarrCacheFile-";

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Whether `path` is one of the host's cache files.
pub fn is_cache_file(path: &str) -> bool {
    path.contains(CACHE_MARKER)
}

/// Input restrictions for one plugin.
#[derive(Debug, Clone, Default)]
pub struct Gates<'a> {
    /// Accepted containers, lower-case, without a dot.
    pub containers: &'a [String],
    /// Size ceiling in GB, `None` to accept any size.
    pub max_file_size_gb: Option<u64>,
    /// Appended to the unsupported-container line.
    pub container_note: Option<&'a str>,
}

/// Check `input` against `gates`, logging one line per check.
///
/// Returns [`Error::UnsupportedInput`] on the first failed gate.
pub fn check_gates(input: &PluginInput, gates: &Gates<'_>, rationale: &mut Rationale) -> Result<()> {
    if input.cache_marker || is_cache_file(&input.path) {
        rationale.ok("File is already a Tdarr cache file, likely already processed. Skipping.");
        return Err(Error::unsupported("host cache file"));
    }

    let container = input.container.trim_start_matches('.').to_lowercase();
    if !gates.containers.iter().any(|c| c.eq_ignore_ascii_case(&container)) {
        let line = match gates.container_note {
            Some(note) => format!("Unsupported container: {}. {}", input.container, note),
            None => format!(
                "Unsupported container: {}. Supported: {}",
                input.container,
                gates.containers.join(", ")
            ),
        };
        rationale.fail(line);
        return Err(Error::unsupported(format!("container {}", input.container)));
    }
    rationale.ok(format!("Supported container: {}", input.container));

    if let Some(limit) = gates.max_file_size_gb {
        let size_gb = input.file_size as f64 / BYTES_PER_GB;
        if size_gb > limit as f64 {
            rationale.fail(format!(
                "Skipping large file ({:.2}GB > {}GB limit)",
                size_gb, limit
            ));
            return Err(Error::unsupported(format!("file larger than {}GB", limit)));
        }
        rationale.note(format!("File size: {:.2}GB (within limits)", size_gb));
    }

    Ok(())
}
