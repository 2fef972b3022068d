//! Particle record discovery on disk.
//!
//! Each particle lives in its own `<name>.toml` file in the particle
//! directory. The file stem becomes the particle's lookup name.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ParticleError, ParticleResult};
use crate::record::ParticleRecord;

/// Default particle directory, relative to the working directory.
pub const DEFAULT_PARTICLE_PATH: &str = "particles";

/// File extension of particle records.
pub const RECORD_EXTENSION: &str = "toml";

/// Lists record files in `dir`, sorted by path.
///
/// A missing directory yields no records; it is created first when
/// `create_missing` is set.
pub fn discover_records(dir: &Path, create_missing: bool) -> ParticleResult<Vec<PathBuf>> {
    let dir_error = |source| ParticleError::Directory {
        path: dir.to_path_buf(),
        source,
    };

    if !dir.exists() {
        if create_missing {
            info!("Particle path does not exist, creating: {:?}", dir);
            fs::create_dir_all(dir).map_err(dir_error)?;
        } else {
            debug!("Particle path does not exist: {:?}", dir);
        }
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(dir_error)? {
        let path = entry.map_err(dir_error)?.path();
        if path.is_file() && is_record_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Returns true if `path` has the record extension (any case).
#[must_use]
pub fn is_record_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(RECORD_EXTENSION))
}

/// Returns the lookup name for a record file (its stem).
#[must_use]
pub fn record_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Reads one record file.
pub fn read_record(path: &Path) -> ParticleResult<ParticleRecord> {
    let name = record_name(path);
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(source) => return Err(ParticleError::Read { name, source }),
    };
    ParticleRecord::from_toml_str(name, &content)
}
