//! Category import from JSON files.

use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::entities::{Category, CategoryImport, Word};
use crate::infrastructure::pocketbase::{ClientError, PocketBase, RecordService, filter_eq};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// What happened to a single category import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Imported {
        category_id: String,
        words_created: usize,
        words_failed: usize,
    },
    /// A category with the same name already exists; nothing was written.
    AlreadyExists,
}

/// Summary of a directory import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: Vec<String>,
    pub skipped_existing: Vec<String>,
    pub failed_files: Vec<PathBuf>,
    pub words_created: usize,
    pub words_failed: usize,
}

/// Creates categories and their words from import files.
///
/// Imports are idempotent per category name: a category that already exists
/// is left untouched together with its words.
pub struct ImportService {
    categories: RecordService<Category>,
    words: RecordService<Word>,
}

impl ImportService {
    pub fn new(client: &PocketBase) -> Self {
        Self {
            categories: client.records(),
            words: client.records(),
        }
    }

    /// Imports every file in `dir`, in file-name order.
    ///
    /// Unreadable or malformed files and failed categories are logged and
    /// recorded in the report; the remaining files are still processed. A
    /// missing directory yields an empty report.
    pub async fn import_dir(&self, dir: &Path) -> ImportReport {
        let mut report = ImportReport::default();

        let files = match list_files(dir) {
            Ok(files) => files,
            Err(e) => {
                warn!("Failed to read imports in {}: {}", dir.display(), e);
                return report;
            }
        };

        for path in files {
            let import = match read_import(&path) {
                Ok(import) => import,
                Err(e) => {
                    warn!("Skipping import: {}", e);
                    report.failed_files.push(path);
                    continue;
                }
            };

            let name = import.name.clone();
            match self.import_category(import).await {
                Ok(ImportOutcome::Imported {
                    words_created,
                    words_failed,
                    ..
                }) => {
                    report.imported.push(name);
                    report.words_created += words_created;
                    report.words_failed += words_failed;
                }
                Ok(ImportOutcome::AlreadyExists) => report.skipped_existing.push(name),
                Err(e) => {
                    warn!("Failed to import category from {}: {}", path.display(), e);
                    report.failed_files.push(path);
                }
            }
        }

        report
    }

    /// Imports one category unless a category with the same name exists.
    ///
    /// Words that fail to save are logged and counted; they do not abort the
    /// import of the remaining words.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Client`] if the existence check fails with
    /// anything other than "not found", or if the category cannot be created.
    pub async fn import_category(
        &self,
        import: CategoryImport,
    ) -> Result<ImportOutcome, ImportError> {
        match self
            .categories
            .get_first_list_item(&filter_eq("name", &import.name))
            .await
        {
            Ok(_) => return Ok(ImportOutcome::AlreadyExists),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e.into()),
        }

        info!(
            "Importing category {} ({} words)",
            import.name,
            import.words.len()
        );
        let category = self.categories.create(&import.new_category()).await?;

        let mut words_created = 0;
        let mut words_failed = 0;
        for word in import.words {
            let text = word.word.clone();
            match self.words.create(&word.into_new_word(&category.id)).await {
                Ok(_) => words_created += 1,
                Err(e) => {
                    warn!("Failed to save word {:?} in {}: {}", text, category.name, e);
                    words_failed += 1;
                }
            }
        }

        Ok(ImportOutcome::Imported {
            category_id: category.id,
            words_created,
            words_failed,
        })
    }
}

/// Regular files in `dir`, sorted by path.
fn list_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Reads and parses one import file.
pub fn read_import(path: &Path) -> Result<CategoryImport, ImportError> {
    let raw = std::fs::read(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&raw).map_err(|source| ImportError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a `collections.json` schema export, a JSON array of collection
/// definitions.
pub fn read_collections(path: &Path) -> Result<Vec<Value>, ImportError> {
    let raw = std::fs::read(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&raw).map_err(|source| ImportError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Sends the schema export at `path` to the backend and returns the number
/// of collection definitions it held.
///
/// # Errors
///
/// Returns [`ImportError::Read`]/[`ImportError::Parse`] for an unreadable
/// file or one that is not a JSON array, and [`ImportError::Client`] if the
/// backend rejects the import.
pub async fn import_collections_file(
    client: &PocketBase,
    path: &Path,
    delete_missing: bool,
) -> Result<usize, ImportError> {
    let collections = read_collections(path)?;
    let count = collections.len();
    info!(
        "Importing {} collection schema(s) from {}",
        count,
        path.display()
    );
    client.import_collections(collections, delete_missing).await?;
    Ok(count)
}
