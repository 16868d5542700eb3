//! Per-source diagnostic log
//!
//! Validation errors for a source are written to `<log_dir>/<file_name>`,
//! overwriting the previous run. A clean run leaves no file behind, so the
//! presence of the file alone signals that rows were rejected.

use crate::validate::ValidationError;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Write the diagnostic log for one source.
///
/// Returns the path written, or `None` when there was nothing to report.
pub fn write_diagnostics(
    log_dir: &Path,
    file_name: &str,
    errors: &[ValidationError],
) -> io::Result<Option<PathBuf>> {
    let path = log_dir.join(file_name);

    if errors.is_empty() {
        match fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "removed stale diagnostic log"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {},
            Err(e) => return Err(e),
        }
        return Ok(None);
    }

    fs::create_dir_all(log_dir)?;
    let mut writer = BufWriter::new(fs::File::create(&path)?);
    for error in errors {
        writer.write_all(error.render().as_bytes())?;
    }
    writer.flush()?;

    warn!(
        "NOTE: {} validation errors found. Check {}",
        errors.len(),
        path.display()
    );

    Ok(Some(path))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::validate::FieldError;
    use tempfile::TempDir;

    fn error(row: usize) -> ValidationError {
        ValidationError {
            row,
            snapshot: format!("account_code: {}", row),
            errors: vec![FieldError {
                field: "account_code",
                message: "Field required".to_string(),
            }],
        }
    }

    #[test]
    fn test_no_errors_no_file() {
        let dir = TempDir::new().unwrap();
        let written = write_diagnostics(dir.path(), "coa_ingestion.logs", &[]).unwrap();
        assert!(written.is_none());
        assert!(!dir.path().join("coa_ingestion.logs").exists());
    }

    #[test]
    fn test_writes_one_entry_per_error() {
        let dir = TempDir::new().unwrap();
        let path = write_diagnostics(dir.path(), "coa_ingestion.logs", &[error(2), error(5)])
            .unwrap()
            .unwrap();

        let contents = fs::read_to_string(path).unwrap();
        assert_eq!(contents.matches("(ROW ").count(), 2);
        assert!(contents.starts_with("(ROW 2) DATA: account_code: 2\n"));
        assert!(contents.contains("(ROW 5) DATA"));
    }

    #[test]
    fn test_overwrites_previous_run() {
        let dir = TempDir::new().unwrap();
        write_diagnostics(dir.path(), "x.logs", &[error(2), error(3), error(4)]).unwrap();
        let path = write_diagnostics(dir.path(), "x.logs", &[error(9)]).unwrap().unwrap();

        let contents = fs::read_to_string(path).unwrap();
        assert_eq!(contents, error(9).render());
    }

    #[test]
    fn test_clean_run_removes_stale_file() {
        let dir = TempDir::new().unwrap();
        write_diagnostics(dir.path(), "x.logs", &[error(2)]).unwrap();
        write_diagnostics(dir.path(), "x.logs", &[]).unwrap();
        assert!(!dir.path().join("x.logs").exists());
    }

    #[test]
    fn test_creates_log_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("logs");
        write_diagnostics(&nested, "x.logs", &[error(2)]).unwrap();
        assert!(nested.join("x.logs").exists());
    }
}
