//! Rendering toolchain availability checks.
//!
//! The render path depends on two PATH-resolvable executables: the `manim`
//! CLI itself and `ffmpeg`, which Manim uses for video encoding (it is
//! checked for presence but never invoked directly).
//!
//! Probes are point-in-time and never cached, so a toolchain installed or
//! removed mid-session is picked up on the next render attempt.

use std::path::PathBuf;

use tracing::{error, info};

/// Executable that produces the animation video
pub const MANIM_BIN: &str = "manim";

/// Encoder Manim requires on PATH
pub const FFMPEG_BIN: &str = "ffmpeg";

/// Result of probing the host for the rendering toolchain
#[derive(Debug, Clone)]
pub struct RuntimeCheck {
    /// Resolved location of the manim executable, if found
    pub manim: Option<PathBuf>,
    /// Resolved location of the ffmpeg executable, if found
    pub ffmpeg: Option<PathBuf>,
}

impl RuntimeCheck {
    /// Probe the host PATH for the rendering toolchain.
    ///
    /// Logs resolved locations, or a diagnostic with a remediation hint
    /// for anything missing. Never fails; absence is reported through
    /// [`RuntimeCheck::available`].
    pub fn probe() -> Self {
        let path_value = std::env::var_os("PATH").unwrap_or_default();

        let manim = search_path(MANIM_BIN, &path_value);
        match &manim {
            Some(path) => info!(path = %path.display(), "manim found"),
            None => error!(
                "manim not found on PATH. Install it with `pip install manim` \
                 and make sure the executable is reachable."
            ),
        }

        let ffmpeg = search_path(FFMPEG_BIN, &path_value);
        match &ffmpeg {
            Some(path) => info!(path = %path.display(), "ffmpeg found"),
            None => error!(
                "ffmpeg not found on PATH. Manim needs it for video encoding; \
                 see https://ffmpeg.org/download.html for installation instructions."
            ),
        }

        Self { manim, ffmpeg }
    }

    /// True when every required executable was resolved
    pub fn available(&self) -> bool {
        self.manim.is_some() && self.ffmpeg.is_some()
    }

    /// Name of the first missing executable, if any
    pub fn missing(&self) -> Option<&'static str> {
        if self.manim.is_none() {
            Some(MANIM_BIN)
        } else if self.ffmpeg.is_none() {
            Some(FFMPEG_BIN)
        } else {
            None
        }
    }
}

/// Scan a PATH-style value for an executable with the given name.
///
/// Returns the first matching entry. On Windows the common executable
/// extensions are tried as well.
pub fn search_path(name: &str, path_value: &std::ffi::OsStr) -> Option<PathBuf> {
    for dir in std::env::split_paths(path_value) {
        if dir.as_os_str().is_empty() {
            continue;
        }

        let candidate = dir.join(name);
        if is_executable(&candidate) {
            return Some(candidate);
        }

        #[cfg(windows)]
        for ext in ["exe", "cmd", "bat"] {
            let candidate = dir.join(format!("{name}.{ext}"));
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

#[cfg(unix)]
fn is_executable(path: &std::path::Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &std::path::Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn make_executable(dir: &std::path::Path, name: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_search_path_finds_executable() {
        let temp = TempDir::new().unwrap();
        let expected = make_executable(temp.path(), "manim");

        let path_value = std::env::join_paths([temp.path()]).unwrap();
        assert_eq!(search_path("manim", &path_value), Some(expected));
    }

    #[cfg(unix)]
    #[test]
    fn test_search_path_skips_non_executable_files() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("manim"), "not executable").unwrap();

        let path_value = std::env::join_paths([temp.path()]).unwrap();
        assert_eq!(search_path("manim", &path_value), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_search_path_first_match_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let expected = make_executable(first.path(), "ffmpeg");
        make_executable(second.path(), "ffmpeg");

        let path_value = std::env::join_paths([first.path(), second.path()]).unwrap();
        assert_eq!(search_path("ffmpeg", &path_value), Some(expected));
    }

    #[test]
    fn test_search_path_empty() {
        assert_eq!(search_path("manim", std::ffi::OsStr::new("")), None);
    }

    #[test]
    fn test_missing_reports_manim_first() {
        let check = RuntimeCheck {
            manim: None,
            ffmpeg: None,
        };
        assert!(!check.available());
        assert_eq!(check.missing(), Some("manim"));

        let check = RuntimeCheck {
            manim: Some(PathBuf::from("/usr/bin/manim")),
            ffmpeg: None,
        };
        assert_eq!(check.missing(), Some("ffmpeg"));

        let check = RuntimeCheck {
            manim: Some(PathBuf::from("/usr/bin/manim")),
            ffmpeg: Some(PathBuf::from("/usr/bin/ffmpeg")),
        };
        assert!(check.available());
        assert_eq!(check.missing(), None);
    }
}
