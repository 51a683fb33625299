use anyhow::Result;
use log::{debug, warn};
use std::path::PathBuf;
use walkdir::WalkDir;

/// Directories never scanned
const SKIPPED_DIRECTORIES: &[&str] = &["target"];

/// Collects the Rust source files of a project.
///
/// Walks the project directory recursively, skipping `target`, hidden directories and
/// any directory whose name was excluded. Files are returned sorted by path so that
/// definitions and paths come out in the same order on every run.
///
/// # Example
///
/// ```no_run
/// use swagger_from_source::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./my-project")).exclude("generated");
/// let result = scanner.scan().unwrap();
/// println!("Found {} Rust files", result.rust_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
    excluded: Vec<String>,
}

/// Files found by a scan
pub struct ScanResult {
    /// Paths of all `.rs` files, sorted
    pub rust_files: Vec<PathBuf>,
    /// Entries that could not be read
    pub warnings: Vec<String>,
}

impl FileScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            root_path,
            excluded: Vec::new(),
        }
    }

    /// Skip every directory with this name
    pub fn exclude(mut self, directory: impl Into<String>) -> Self {
        self.excluded.push(directory.into());
        self
    }

    fn is_skipped(&self, name: &str) -> bool {
        name.starts_with('.')
            || SKIPPED_DIRECTORIES.contains(&name)
            || self.excluded.iter().any(|excluded| excluded == name)
    }

    /// Scans the directory tree and collects all `.rs` files.
    ///
    /// Unreadable entries are logged and reported as warnings without stopping the
    /// scan.
    pub fn scan(&self) -> Result<ScanResult> {
        let mut rust_files = Vec::new();
        let mut warnings = Vec::new();

        let walker = WalkDir::new(&self.root_path)
            .into_iter()
            .filter_entry(|e| {
                if e.path() == self.root_path || !e.file_type().is_dir() {
                    return true;
                }
                !self.is_skipped(&e.file_name().to_string_lossy())
            });

        for entry in walker {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("rs") {
                        rust_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        rust_files.sort();
        debug!("Scanned {}: {} Rust files", self.root_path.display(), rust_files.len());

        Ok(ScanResult {
            rust_files,
            warnings,
        })
    }
}
