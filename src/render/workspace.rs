//! Disposable per-render workspaces.
//!
//! Each render attempt gets a uniquely named temporary directory holding
//! the script and everything Manim writes beneath it. The directory is
//! deleted when the workspace is dropped, on success and failure alike,
//! unless retention was requested for debugging.

use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

/// Filename the script is written to inside the workspace
pub const SCRIPT_FILENAME: &str = "scene.py";

/// Relative subpath Manim writes video output beneath
pub const OUTPUT_SUBPATH: &str = "media/videos";

/// Extensions recognized as video containers
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "webm", "mkv"];

enum WorkspaceDir {
    /// Deleted on drop
    Scoped(tempfile::TempDir),
    /// Left on disk for debugging
    Retained(PathBuf),
}

/// A disposable working directory for one render attempt
pub struct RenderWorkspace {
    dir: WorkspaceDir,
}

impl RenderWorkspace {
    /// Create a fresh, uniquely named workspace.
    ///
    /// With `keep` set the directory survives the workspace and its path
    /// is logged so a failed render can be inspected afterwards.
    pub fn create(keep: bool) -> io::Result<Self> {
        let temp = tempfile::Builder::new().prefix("animagen-").tempdir()?;

        let dir = if keep {
            let path = temp.keep();
            info!(path = %path.display(), "Retaining render workspace");
            WorkspaceDir::Retained(path)
        } else {
            WorkspaceDir::Scoped(temp)
        };

        Ok(Self { dir })
    }

    /// Root of the workspace
    pub fn path(&self) -> &Path {
        match &self.dir {
            WorkspaceDir::Scoped(temp) => temp.path(),
            WorkspaceDir::Retained(path) => path,
        }
    }

    /// Write the script to its fixed filename inside the workspace
    pub async fn write_script(&self, script: &str) -> io::Result<PathBuf> {
        let path = self.path().join(SCRIPT_FILENAME);
        tokio::fs::write(&path, script).await?;
        Ok(path)
    }

    /// Conventional output directory Manim writes beneath the workspace
    pub fn output_dir(&self) -> PathBuf {
        self.path().join(OUTPUT_SUBPATH)
    }

    /// Locate the video file with the given stem under the output tree.
    ///
    /// Manim nests output under scene and quality subdirectories, so the
    /// search walks the whole `media/videos` tree looking for the file
    /// the render was told to produce.
    pub fn find_named_video(&self, stem: &str) -> io::Result<Option<PathBuf>> {
        find_video_in(&self.output_dir(), stem)
    }
}

fn find_video_in(dir: &Path, stem: &str) -> io::Result<Option<PathBuf>> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            if let Some(found) = find_video_in(&path, stem)? {
                return Ok(Some(found));
            }
        } else if is_named_video(&path, stem) {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

fn is_named_video(path: &Path, stem: &str) -> bool {
    let matches_stem = path
        .file_stem()
        .map(|s| s.to_string_lossy() == stem)
        .unwrap_or(false);

    matches_stem
        && path
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                VIDEO_EXTENSIONS.iter().any(|v| *v == ext)
            })
            .unwrap_or(false)
}
