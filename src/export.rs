use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::ScopeError;
use crate::types::{Identity, WaveformResult};

/// On-disk form of one capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveformCapture {
    pub captured_at: DateTime<Utc>,
    pub identity: Option<Identity>,
    pub waveform: WaveformResult,
}

/// Write `waveform` as pretty JSON to a timestamped file inside `dir`.
///
/// The directory is created if missing. Returns the path of the new file.
pub fn save_waveform(
    dir: &Path,
    waveform: &WaveformResult,
    identity: Option<&Identity>,
) -> Result<PathBuf, ScopeError> {
    fs::create_dir_all(dir).map_err(|e| {
        ScopeError::Export(format!("Failed to create {}: {e}", dir.display()))
    })?;

    let captured_at = Utc::now();
    let path = dir.join(format!(
        "waveform_{}.json",
        captured_at.format("%Y%m%d_%H%M%S")
    ));

    let capture = WaveformCapture {
        captured_at,
        identity: identity.cloned(),
        waveform: waveform.clone(),
    };

    let file = File::create(&path).map_err(|e| {
        ScopeError::Export(format!("Failed to create {}: {e}", path.display()))
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &capture)
        .map_err(|e| ScopeError::Export(format!("Failed to serialize waveform: {e}")))?;
    writer
        .flush()
        .map_err(|e| ScopeError::Export(format!("Failed to write {}: {e}", path.display())))?;

    info!("Saved {} samples to {}", waveform.len(), path.display());
    Ok(path)
}

/// Read a capture written by [`save_waveform`].
pub fn load_waveform(path: &Path) -> Result<WaveformCapture, ScopeError> {
    let text = fs::read_to_string(path).map_err(|e| {
        ScopeError::Export(format!("Failed to read {}: {e}", path.display()))
    })?;
    serde_json::from_str(&text)
        .map_err(|e| ScopeError::Export(format!("Invalid capture file {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rigol_scope_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_save_and_load_capture() {
        let dir = scratch_dir("save");
        let waveform = WaveformResult {
            time: vec![0.0, 0.001],
            voltage: vec![0.25, 3.0],
        };
        let identity = Identity {
            name: "RIGOL TECHNOLOGIES".to_string(),
            model: "DS1074Z".to_string(),
            serial: "SN123".to_string(),
            software_version: "00.04.04".to_string(),
        };

        let path = save_waveform(&dir, &waveform, Some(&identity)).unwrap();
        assert!(path.starts_with(&dir));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));

        let capture = load_waveform(&path).unwrap();
        assert_eq!(capture.waveform, waveform);
        assert_eq!(capture.identity, Some(identity));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = scratch_dir("garbage");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(load_waveform(&path), Err(ScopeError::Export(_))));

        fs::remove_dir_all(&dir).unwrap();
    }
}
