/// Sorting the direct children of a root directory into generated folders.
///
/// A pass is computed up front from a single listing of the root
/// ([`FileOrganizer::plan`]) and then carried out move by move
/// ([`FileOrganizer::execute`]). Only direct children are considered, so a
/// folder created during the pass is never revisited by that pass. Files are
/// moved first, then pre-existing user folders, and the sort log is written
/// once at the very end.
use crate::config::CompiledFilters;
use crate::error::{OrganizeError, OrganizeResult};
use crate::file_category::{Category, category_for, extension_of};
use crate::operation_log::{self, MoveRecord, Origin, SORT_LOG_FILENAME};
use crate::period::{period_key_for, starts_with_month_name};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Which folder layout a pass produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// `<root>/<Category>/<file>`
    Type,
    /// `<root>/<Month Year>/<file>`
    Date,
    /// `<root>/<Month Year>/<Category>/<file>`
    All,
}

impl SortMode {
    pub fn label(&self) -> &'static str {
        match self {
            SortMode::Type => "type",
            SortMode::Date => "date",
            SortMode::All => "date and type",
        }
    }

    /// Whether a child folder named `name` is one this mode generates, and
    /// so must not be relocated as a user folder.
    pub fn is_generated_folder(&self, name: &str) -> bool {
        match self {
            SortMode::Type => Category::from_dir_name(name).is_some(),
            SortMode::Date | SortMode::All => starts_with_month_name(name),
        }
    }
}

/// A move computed by [`FileOrganizer::plan`] but not yet performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedMove {
    pub origin: Origin,
    pub destination: PathBuf,
    /// Destination folder relative to the root, e.g. `"June 2023/Documents"`.
    pub folder: String,
}

/// Outcome of a completed sort pass.
#[derive(Debug, Clone, Serialize)]
pub struct SortReport {
    pub mode: SortMode,
    /// Moves in the order they were performed, as written to the log.
    pub records: Vec<MoveRecord>,
    /// Number of items moved into each destination folder.
    pub folders: BTreeMap<String, usize>,
}

impl SortReport {
    pub fn files_moved(&self) -> usize {
        self.records.iter().filter(|r| !r.origin.is_folder()).count()
    }

    pub fn folders_moved(&self) -> usize {
        self.records.iter().filter(|r| r.origin.is_folder()).count()
    }
}

/// A direct child of the root as seen at the start of a pass.
struct RootEntry {
    name: String,
    path: PathBuf,
    modified: SystemTime,
}

/// Plans and performs sort passes, honoring the configured filters.
#[derive(Debug, Clone, Default)]
pub struct FileOrganizer {
    filters: CompiledFilters,
}

impl FileOrganizer {
    pub fn new(filters: CompiledFilters) -> Self {
        Self { filters }
    }

    /// Runs a full pass: [`plan`](Self::plan) followed by [`execute`](Self::execute).
    pub fn sort(&self, root: &Path, mode: SortMode) -> OrganizeResult<SortReport> {
        let plan = self.plan(root, mode)?;
        self.execute(root, mode, plan, |_| {})
    }

    /// Computes every move a pass in `mode` would make, without touching the disk.
    ///
    /// Files come first, then user folders; each group is ordered by name.
    ///
    /// # Errors
    ///
    /// Fails if `root` is not an existing directory or cannot be listed, or if
    /// `root` or any of its children has a name that is not valid UTF-8.
    pub fn plan(&self, root: &Path, mode: SortMode) -> OrganizeResult<Vec<PlannedMove>> {
        let (files, dirs) = self.scan(root)?;
        let mut plan = Vec::with_capacity(files.len() + dirs.len());

        for file in files {
            let folder = match mode {
                SortMode::Type => vec![category_for(&extension_of(&file.path)).dir_name().to_string()],
                SortMode::Date => vec![period_key_for(file.modified)],
                SortMode::All => vec![
                    period_key_for(file.modified),
                    category_for(&extension_of(&file.path)).dir_name().to_string(),
                ],
            };
            plan.push(planned(root, Origin::File(file.path), &file.name, folder));
        }

        for dir in dirs {
            if mode.is_generated_folder(&dir.name) {
                continue;
            }
            let folder = match mode {
                SortMode::Type => vec![Category::Others.dir_name().to_string()],
                SortMode::Date => vec![period_key_for(dir.modified)],
                SortMode::All => vec![
                    period_key_for(dir.modified),
                    Category::Others.dir_name().to_string(),
                ],
            };
            plan.push(planned(
                root,
                Origin::RelocatedFolder(dir.path),
                &dir.name,
                folder,
            ));
        }

        Ok(plan)
    }

    /// Performs `plan` in order and writes the sort log.
    ///
    /// `on_move` is called after each successful move. The first failure
    /// aborts the pass; moves already made stay in place and no log is
    /// written for them.
    pub fn execute<F>(
        &self,
        root: &Path,
        mode: SortMode,
        plan: Vec<PlannedMove>,
        mut on_move: F,
    ) -> OrganizeResult<SortReport>
    where
        F: FnMut(&MoveRecord),
    {
        validate_root(root)?;

        let mut records = Vec::with_capacity(plan.len());
        let mut folders: BTreeMap<String, usize> = BTreeMap::new();

        for step in plan {
            if let Some(parent) = step.destination.parent() {
                ensure_dir(parent)?;
            }
            move_item(step.origin.path(), &step.destination)?;
            tracing::debug!(
                from = %step.origin.path().display(),
                to = %step.destination.display(),
                "moved"
            );

            let record = MoveRecord {
                origin: step.origin,
                destination: step.destination,
            };
            on_move(&record);
            records.push(record);
            *folders.entry(step.folder).or_insert(0) += 1;
        }

        operation_log::write(root, &records)?;
        tracing::info!(
            root = %root.display(),
            mode = mode.label(),
            moves = records.len(),
            "sort pass complete"
        );

        Ok(SortReport {
            mode,
            records,
            folders,
        })
    }

    /// Lists the root's direct children, split into files and folders.
    fn scan(&self, root: &Path) -> OrganizeResult<(Vec<RootEntry>, Vec<RootEntry>)> {
        validate_root(root)?;

        let scan_failed = |e| OrganizeError::ScanFailed {
            path: root.to_path_buf(),
            source: e,
        };

        let mut files = Vec::new();
        let mut dirs = Vec::new();

        if root.to_str().is_none() {
            return Err(OrganizeError::NonUtf8Path {
                path: root.to_path_buf(),
            });
        }

        for entry in fs::read_dir(root).map_err(scan_failed)? {
            let entry = entry.map_err(scan_failed)?;
            // The log is text, so a lossy name could not be restored.
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(_) => return Err(OrganizeError::NonUtf8Path { path: entry.path() }),
            };
            if name == SORT_LOG_FILENAME || !self.filters.should_include(&name) {
                continue;
            }

            let path = entry.path();
            // Follows symlinks; dangling ones are neither files nor folders.
            let metadata = match fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            let modified = metadata.modified().map_err(|e| OrganizeError::ScanFailed {
                path: path.clone(),
                source: e,
            })?;

            let item = RootEntry {
                name,
                path,
                modified,
            };
            if metadata.is_file() {
                files.push(item);
            } else if metadata.is_dir() {
                dirs.push(item);
            }
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        dirs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok((files, dirs))
    }
}

fn planned(root: &Path, origin: Origin, name: &str, folder: Vec<String>) -> PlannedMove {
    let mut destination = root.to_path_buf();
    for component in &folder {
        destination.push(component);
    }
    destination.push(name);

    PlannedMove {
        origin,
        destination,
        folder: folder.join("/"),
    }
}

pub(crate) fn validate_root(root: &Path) -> OrganizeResult<()> {
    if !root.exists() {
        return Err(OrganizeError::invalid_base_path(root, "base path does not exist"));
    }
    if !root.is_dir() {
        return Err(OrganizeError::invalid_base_path(root, "base path is not a directory"));
    }
    Ok(())
}

/// Creates `dir` and any missing parents. An existing directory is not an error.
pub(crate) fn ensure_dir(dir: &Path) -> OrganizeResult<()> {
    fs::create_dir_all(dir).map_err(|e| OrganizeError::DirectoryCreationFailed {
        path: dir.to_path_buf(),
        source: e,
    })
}

pub(crate) fn move_item(from: &Path, to: &Path) -> OrganizeResult<()> {
    fs::rename(from, to).map_err(|e| OrganizeError::MoveFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source: e,
    })
}

/// Sorts the files of `root` into category folders.
///
/// Pre-existing folders whose names are not category names are moved,
/// whole, into `Others`.
///
/// # Examples
///
/// ```no_run
/// use foldersort::sort_by_type;
///
/// match sort_by_type("/home/user/Downloads") {
///     Ok(report) => println!("Moved {} files", report.files_moved()),
///     Err(e) => eprintln!("Sort failed: {}", e),
/// }
/// ```
pub fn sort_by_type(root: impl AsRef<Path>) -> OrganizeResult<SortReport> {
    FileOrganizer::default().sort(root.as_ref(), SortMode::Type)
}

/// Sorts the files of `root` into `"<Month> <Year>"` folders by modification time.
///
/// Pre-existing folders not named after a month are moved, whole, into the
/// period folder of their own modification time.
pub fn sort_by_date(root: impl AsRef<Path>) -> OrganizeResult<SortReport> {
    FileOrganizer::default().sort(root.as_ref(), SortMode::Date)
}

/// Sorts the files of `root` into `"<Month> <Year>/<Category>"` folders.
///
/// Pre-existing folders not named after a month go to `"<Month> <Year>/Others"`.
pub fn sort_all(root: impl AsRef<Path>) -> OrganizeResult<SortReport> {
    FileOrganizer::default().sort(root.as_ref(), SortMode::All)
}
