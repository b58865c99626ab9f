//! foldersort - sort a directory into type or month folders, and undo it
//!
//! This library classifies the direct children of a root directory by file
//! extension and/or modification month, moves them into generated folders,
//! records every move in a `.sort_log` file at the root, and replays that log
//! in reverse to restore the original layout.

pub mod cli;
pub mod config;
pub mod error;
pub mod file_category;
pub mod file_organizer;
pub mod operation_log;
pub mod output;
pub mod period;
pub mod undo;

pub use config::{CompiledFilters, ConfigError, FilterConfig};
pub use error::{OrganizeError, OrganizeResult};
pub use file_category::{Category, category_for};
pub use file_organizer::{
    FileOrganizer, PlannedMove, SortMode, SortReport, sort_all, sort_by_date, sort_by_type,
};
pub use operation_log::{MoveRecord, Origin};
pub use period::period_key;
pub use undo::{UndoManager, UndoReport, undo_sort};

pub use cli::{SortCommand, run_cli};
