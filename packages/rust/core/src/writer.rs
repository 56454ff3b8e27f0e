//! Artifact writer.
//!
//! Persists rendered documents into the output directory. This is the only
//! fatal stage of a run: any failure here aborts generation.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use routemap_shared::{Result, RouteMapError};

/// Metadata for a single written artifact.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ArtifactMeta {
    pub filename: String,
    pub sha256: String,
    pub size_bytes: usize,
}

/// Write artifact files into `output_dir`, creating it if missing.
///
/// Each entry in `artifacts` is a `(filename, content)` pair. Files are
/// written to a hidden temp sibling, then renamed over the target.
#[instrument(skip_all, fields(output_dir = %output_dir.display(), artifact_count = artifacts.len()))]
pub fn write_artifacts(output_dir: &Path, artifacts: &[(&str, &str)]) -> Result<Vec<ArtifactMeta>> {
    if !output_dir.is_dir() {
        std::fs::create_dir_all(output_dir).map_err(|e| RouteMapError::io(output_dir, e))?;
        info!(path = %output_dir.display(), "created output directory");
    }

    let mut metas = Vec::with_capacity(artifacts.len());

    for (filename, content) in artifacts {
        let target = output_dir.join(filename);
        let temp = output_dir.join(format!(".{filename}.tmp"));

        stage_file(&temp, |file| file.write_all(content.as_bytes()))
            .map_err(|e| RouteMapError::io(&temp, e))?;

        if let Err(e) = std::fs::rename(&temp, &target) {
            let _ = std::fs::remove_file(&temp);
            return Err(RouteMapError::io(&target, e));
        }

        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        let hash = format!("{:x}", hasher.finalize());

        debug!(file = %filename, size = content.len(), "wrote artifact");

        metas.push(ArtifactMeta {
            filename: (*filename).to_string(),
            sha256: hash,
            size_bytes: content.len(),
        });
    }

    Ok(metas)
}

/// Create `temp` and fill it, removing the partial file if filling fails.
fn stage_file(temp: &Path, fill: impl FnOnce(&mut File) -> io::Result<()>) -> io::Result<()> {
    let result = File::create(temp).and_then(|mut file| fill(&mut file));
    if result.is_err() {
        let _ = std::fs::remove_file(temp);
    }
    result
}
