use std::path::Path;
use std::process::{Child, Command, Stdio};

use crate::error::{Result, VidlensError};

/// Display height cap for the preview window, aspect ratio preserved.
pub const MAX_PREVIEW_HEIGHT: u32 = 480;

/// A running preview player. Killing the child releases the preview
/// resource; dropping the handle does the same.
pub struct PreviewHandle {
    child: Child,
}

impl PreviewHandle {
    pub fn close(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.close();
    }
}

/// Play a local video muted in an ffplay window.
///
/// Playback starts immediately with the volume at zero; ffplay's own
/// controls cover pause and seek. No network access is involved.
pub fn spawn_preview(video_path: &Path) -> Result<PreviewHandle> {
    let child = Command::new("ffplay")
        .arg("-volume")
        .arg("0")
        .arg("-autoexit")
        .arg("-loglevel")
        .arg("error")
        .arg("-vf")
        .arg(format!("scale=-2:'min({MAX_PREVIEW_HEIGHT},ih)'"))
        .arg(video_path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| VidlensError::PreviewFailed {
            video_path: video_path.to_path_buf(),
            reason: e.to_string(),
        })?;

    Ok(PreviewHandle { child })
}
