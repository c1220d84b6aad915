//! Directory-backed cough dataset.
//!
//! The root holds one subdirectory per label pair, named `"{sex} {category}"`,
//! each containing `*.wav` recordings.

pub mod labels;
pub mod summary;
pub mod wav;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{CoughError, Result};
use crate::types::AudioRecord;

pub use labels::{directory_name, resolve_category, resolve_sex};
pub use summary::DatasetSummary;

pub const DEFAULT_ROOT: &str = "data/our";
const WAV_EXTENSION: &str = "wav";

#[derive(Debug, Clone)]
pub struct WaveDataset {
    root: PathBuf,
}

impl WaveDataset {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn load(&self) -> Result<Vec<AudioRecord>> {
        load(&self.root)
    }

    pub fn save(&self, records: &[AudioRecord]) -> Result<()> {
        save(records, &self.root)
    }
}

impl Default for WaveDataset {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

/// Scan `root` and read every labelled recording, in directory then file name order.
pub fn load<P: AsRef<Path>>(root: P) -> Result<Vec<AudioRecord>> {
    let root = root.as_ref();
    let mut records = Vec::new();

    for subdir in sorted_entries(root, |path| path.is_dir())? {
        let dir_name = file_name(&subdir);
        let sex = resolve_sex(&dir_name);
        let category = resolve_category(&dir_name)?;

        let files = sorted_entries(&subdir, |path| {
            path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(WAV_EXTENSION)
        })?;
        debug!(
            directory = %dir_name,
            ?sex,
            ?category,
            files = files.len(),
            "scanning label directory"
        );

        for path in files {
            let contents = wav::read_wav(&path)?;
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            records.push(AudioRecord::new(
                name,
                sex,
                category,
                contents.sample_rate,
                contents.format,
                contents.samples,
            )?);
        }
    }

    info!(root = %root.display(), records = records.len(), "loaded cough dataset");
    Ok(records)
}

/// Write each record to `{root}/{sex} {category}/{name}.wav` in its original PCM format.
pub fn save<P: AsRef<Path>>(records: &[AudioRecord], root: P) -> Result<()> {
    let root = root.as_ref();
    for record in records {
        let sex = record.sex().ok_or_else(|| CoughError::InvalidRecord {
            name: record.name().to_string(),
            reason: "sex is unknown, no directory name can be derived".to_string(),
        })?;
        let dir = root.join(directory_name(sex, record.category()));
        fs::create_dir_all(&dir).map_err(|err| CoughError::io(&dir, err))?;

        let path = dir.join(format!("{}.{}", record.name(), WAV_EXTENSION));
        wav::write_wav(&path, record.sample_rate(), record.format(), record.samples())?;
        debug!(path = %path.display(), "saved recording");
    }
    info!(root = %root.display(), records = records.len(), "saved cough dataset");
    Ok(())
}

fn sorted_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|err| CoughError::io(dir, err))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| CoughError::io(dir, err))?.path();
        if keep(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
