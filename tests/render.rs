//! Render Orchestrator Integration Tests
//!
//! Drives [`ManimRenderer`] against a fake `manim` executable placed on
//! PATH, covering each tagged failure cause plus the success path. Unix
//! only: the fakes are shell scripts.
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use animagen::render::{ManimRenderer, RenderError, SceneRenderer};
use animagen::Config;
use tempfile::TempDir;

/// Tests mutate the process PATH, so they must not interleave
static PATH_LOCK: Mutex<()> = Mutex::new(());

// The fakes run with PATH pointing only at the fake toolchain dir, so
// any utilities they call must be addressed by absolute path.

/// Fake manim that honors `-o <name>` and writes the nested output tree
const MANIM_OK: &str = r#"#!/bin/sh
prev=""
out=""
for arg in "$@"; do
  [ "$prev" = "-o" ] && out="$arg"
  prev="$arg"
done
/bin/mkdir -p media/videos/scene/480p15
: > "media/videos/scene/480p15/${out}.mp4"
"#;

/// Fake manim that creates the output directory but no video
const MANIM_EMPTY_OUTPUT: &str = "#!/bin/sh\n/bin/mkdir -p media/videos\n";

/// Fake manim that exits cleanly without writing anything
const MANIM_NOOP: &str = "#!/bin/sh\nexit 0\n";

/// Fake manim that fails like a script with a syntax error would
const MANIM_FAILS: &str = "#!/bin/sh\necho 'SyntaxError: boom' >&2\nexit 1\n";

/// Fake manim that hangs past the configured timeout
const MANIM_HANGS: &str = "#!/bin/sh\n/bin/sleep 3\n";

fn write_executable(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

/// Install a fake toolchain and point PATH at it
fn fake_toolchain(manim_script: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    write_executable(dir.path(), "manim", manim_script);
    write_executable(dir.path(), "ffmpeg", "#!/bin/sh\nexit 0\n");
    std::env::set_var("PATH", dir.path());
    dir
}

fn renderer(media_dir: PathBuf, timeout_secs: u64) -> ManimRenderer {
    let config = Config {
        media_dir,
        render_timeout_secs: timeout_secs,
        ..Config::default()
    };
    ManimRenderer::from_config(&config)
}

const SCRIPT: &str = "from manim import *\n\nclass Demo(Scene):\n    def construct(self):\n        pass";

#[tokio::test]
async fn missing_toolchain_fails_before_rendering() {
    let _guard = PATH_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let empty = TempDir::new().unwrap();
    std::env::set_var("PATH", empty.path());

    let media = TempDir::new().unwrap();
    let err = renderer(media.path().to_path_buf(), 30)
        .render(SCRIPT)
        .await
        .unwrap_err();

    assert!(matches!(err, RenderError::RuntimeMissing("manim")), "{err:?}");
}

#[tokio::test]
async fn successful_render_publishes_into_media_dir() {
    let _guard = PATH_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _toolchain = fake_toolchain(MANIM_OK);

    let media = TempDir::new().unwrap();
    let artifact = renderer(media.path().to_path_buf(), 30)
        .render(SCRIPT)
        .await
        .unwrap();

    assert!(artifact.file_name.ends_with(".mp4"));
    assert_eq!(artifact.path, media.path().join(&artifact.file_name));
    assert!(artifact.path.is_file());
}

#[tokio::test]
async fn empty_output_directory_is_no_output() {
    let _guard = PATH_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _toolchain = fake_toolchain(MANIM_EMPTY_OUTPUT);

    let media = TempDir::new().unwrap();
    let err = renderer(media.path().to_path_buf(), 30)
        .render(SCRIPT)
        .await
        .unwrap_err();

    assert!(matches!(err, RenderError::NoOutput), "{err:?}");
}

#[tokio::test]
async fn absent_output_directory_is_distinguished() {
    let _guard = PATH_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _toolchain = fake_toolchain(MANIM_NOOP);

    let media = TempDir::new().unwrap();
    let err = renderer(media.path().to_path_buf(), 30)
        .render(SCRIPT)
        .await
        .unwrap_err();

    assert!(matches!(err, RenderError::MissingOutputDir(_)), "{err:?}");
}

#[tokio::test]
async fn nonzero_exit_carries_stderr() {
    let _guard = PATH_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _toolchain = fake_toolchain(MANIM_FAILS);

    let media = TempDir::new().unwrap();
    let err = renderer(media.path().to_path_buf(), 30)
        .render(SCRIPT)
        .await
        .unwrap_err();

    match &err {
        RenderError::SubprocessFailed { code, stderr } => {
            assert_eq!(*code, 1);
            assert!(stderr.contains("SyntaxError: boom"), "{stderr}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn hung_subprocess_times_out() {
    let _guard = PATH_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _toolchain = fake_toolchain(MANIM_HANGS);

    let media = TempDir::new().unwrap();
    let err = renderer(media.path().to_path_buf(), 1)
        .render(SCRIPT)
        .await
        .unwrap_err();

    assert!(matches!(err, RenderError::Timeout(1)), "{err:?}");
}
