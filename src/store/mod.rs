// Store module - JSON persistence of the operation history

pub mod models;

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info};

pub use models::{AssetCategory, Operation, Side};

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Get the default store path (~/.darfcalc/operations.json)
pub fn get_default_store_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let data_dir = PathBuf::from(home).join(".darfcalc");

    std::fs::create_dir_all(&data_dir).context("Failed to create .darfcalc directory")?;

    Ok(data_dir.join("operations.json"))
}

/// Load the stored operation history. A missing file is an empty history,
/// not an error.
pub fn load_operations(path: Option<PathBuf>) -> Result<Vec<Operation>> {
    let path = match path {
        Some(p) => p,
        None => get_default_store_path()?,
    };

    if !path.exists() {
        debug!("No operation store at {:?}, starting empty", path);
        return Ok(Vec::new());
    }

    let contents = std::fs::read_to_string(&path)
        .context(format!("Failed to read operation store at {:?}", path))?;
    let operations: Vec<Operation> =
        serde_json::from_str(&contents).context("Failed to parse operation store")?;

    debug!("Loaded {} operations from {:?}", operations.len(), path);
    Ok(operations)
}

/// Save the full operation history, atomically (write to a temp file in the
/// same directory, then rename over the target).
pub fn save_operations(path: Option<PathBuf>, operations: &[Operation]) -> Result<()> {
    let path = match path {
        Some(p) => p,
        None => get_default_store_path()?,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create store directory")?;
    }

    let json =
        serde_json::to_string_pretty(operations).context("Failed to serialize operations")?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json).context("Failed to write operation store")?;
    std::fs::rename(&tmp_path, &path).context("Failed to finalize operation store")?;

    info!("Saved {} operations to {:?}", operations.len(), path);
    Ok(())
}

/// Generate a unique id for a new operation. Millisecond timestamp plus a
/// process-local counter so bulk imports in the same instant stay distinct.
pub fn next_operation_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let seq = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", millis, seq)
}
