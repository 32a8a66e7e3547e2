use std::path::{Path, PathBuf};

/// Handle to a decodable audio file plus its measured duration.
///
/// A clip either borrows caller-owned input or owns a temporary file
/// produced by normalization or segmentation. Owned backing files are
/// removed when the clip drops, on success and failure paths alike.
#[derive(Debug)]
pub struct AudioClip {
    path: PathBuf,
    duration_secs: f64,
    owned: bool,
}

impl AudioClip {
    /// A clip over caller-owned input; dropping it leaves the file alone.
    pub fn borrowed(path: impl Into<PathBuf>, duration_secs: f64) -> Self {
        Self {
            path: path.into(),
            duration_secs,
            owned: false,
        }
    }

    /// A clip over a freshly materialized temporary file; the clip owns
    /// deletion.
    pub fn owned_temp(path: impl Into<PathBuf>, duration_secs: f64) -> Self {
        Self {
            path: path.into(),
            duration_secs,
            owned: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn is_owned(&self) -> bool {
        self.owned
    }
}

impl Drop for AudioClip {
    fn drop(&mut self) {
        if self.owned {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
