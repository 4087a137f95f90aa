// File: src/persistence.rs
use crate::error::Result;
use crate::lexicon::PronouncingDictionary;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Identifies the dictionary source a cache was compiled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFingerprint {
    pub len: u64,
    pub modified_secs: u64,
}

impl SourceFingerprint {
    pub fn of(path: &Path) -> Result<Self> {
        let meta = fs::metadata(path)?;
        let modified_secs = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map_or(0, |d| d.as_secs());
        Ok(Self { len: meta.len(), modified_secs })
    }
}

/// On-disk form of a compiled dictionary.
#[derive(Clone, Serialize, Deserialize)]
struct CachedDictionary {
    fingerprint: SourceFingerprint,
    dictionary: PronouncingDictionary,
}

/// Writes `bytes` to `path` through a temporary file in the same directory,
/// so readers never observe a partial file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir)?;

    let mut temp_file = NamedTempFile::new_in(parent_dir)?;
    temp_file.write_all(bytes)?;
    temp_file.flush()?;
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub fn save_to_disk(
    dictionary: &PronouncingDictionary,
    fingerprint: SourceFingerprint,
    path: &Path,
) -> Result<()> {
    let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir)?;

    let state = CachedDictionary {
        fingerprint,
        dictionary: dictionary.clone(),
    };

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        bincode::serialize_into(&mut writer, &state)?;
        writer.flush()?;
    }
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Loads a cached dictionary and the fingerprint it was built from.
pub fn load_from_disk(path: &Path) -> Result<(SourceFingerprint, PronouncingDictionary)> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let state: CachedDictionary = bincode::deserialize_from(reader)?;
    Ok((state.fingerprint, state.dictionary))
}

/// `<cache_dir>/<source file name>.bin`
pub fn cache_path(source: &Path, cache_dir: &Path) -> PathBuf {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dictionary".to_string());
    cache_dir.join(format!("{}.bin", name))
}

/// Parses a dictionary, going through the compiled cache when `cache_dir` is
/// set. Stale or unreadable caches are rebuilt; a failed cache write only
/// costs the next run a re-parse.
pub fn load_dictionary(source: &Path, cache_dir: Option<&Path>) -> Result<PronouncingDictionary> {
    let Some(cache_dir) = cache_dir else {
        return PronouncingDictionary::from_file(source);
    };

    let fingerprint = SourceFingerprint::of(source)?;
    let cache = cache_path(source, cache_dir);
    if cache.exists() {
        match load_from_disk(&cache) {
            Ok((cached, dictionary)) if cached == fingerprint => {
                debug!(cache = %cache.display(), "using compiled dictionary");
                return Ok(dictionary);
            }
            Ok(_) => info!(cache = %cache.display(), "dictionary changed; rebuilding cache"),
            Err(e) => warn!(cache = %cache.display(), error = %e, "unreadable dictionary cache; rebuilding"),
        }
    }

    let dictionary = PronouncingDictionary::from_file(source)?;
    if let Err(e) = save_to_disk(&dictionary, fingerprint, &cache) {
        warn!(cache = %cache.display(), error = %e, "could not write dictionary cache");
    }
    Ok(dictionary)
}
