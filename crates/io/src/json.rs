// JSON export of the reconciliation result

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use drawcheck_recon::{ReconError, ReconResult};

/// Write the full result (summary, partitions, provenance) as pretty JSON.
pub fn export(result: &ReconResult, path: &Path) -> Result<(), ReconError> {
    let target = path.display().to_string();
    let file = File::create(path).map_err(|e| ReconError::report_write(&target, e.to_string()))?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, result)
        .map_err(|e| ReconError::report_write(&target, e.to_string()))?;

    Ok(())
}

/// Render the result as a pretty JSON string (for stdout).
pub fn to_string(result: &ReconResult) -> Result<String, ReconError> {
    serde_json::to_string_pretty(result).map_err(|e| ReconError::report_write("<stdout>", e.to_string()))
}
