use std::fs::{self, File};
use std::path::Path;

use color_eyre::eyre::{Result, eyre};

/// Install a JSON subscriber writing to `output_path`.
///
/// Stdout belongs to the terminal UI, so logging only happens when a file is
/// requested. Without a subscriber every `tracing` call is a no-op.
pub fn init_json_file(output_path: &Path) -> Result<()> {
    ensure_parent_dir(output_path)?;
    let file = File::create(output_path)?;

    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .json()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::sync::Mutex::new(file))
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_dir_is_created() {
        let dir = std::env::temp_dir().join(format!("sysgauge_logging_{}", std::process::id()));
        let path = dir.join("nested").join("log.jsonl");
        ensure_parent_dir(&path).unwrap();
        assert!(dir.join("nested").is_dir());
        let _ = fs::remove_dir_all(&dir);
    }
}
