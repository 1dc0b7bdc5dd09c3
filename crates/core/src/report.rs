use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::Result;

/// Fixed filename for the saved analysis artifact.
pub const ANALYSIS_FILENAME: &str = "analysis.txt";

/// Write the displayed analysis text, verbatim and with no header, to
/// `dir/analysis.txt`.
pub async fn save_analysis(text: &str, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(ANALYSIS_FILENAME);
    fs::write(&path, text).await?;
    Ok(path)
}
