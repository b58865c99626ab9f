/// File categorization by extension.
///
/// This module maps a lower-cased, dotted file extension (e.g. `".png"`) to one of
/// a fixed set of categories. The category names double as the folder names the
/// sort engine creates on disk, so they are part of the observable behavior.
///
/// # Examples
///
/// ```
/// use foldersort::file_category::{Category, category_for};
///
/// assert_eq!(category_for(".png"), Category::Images);
/// assert_eq!(category_for(".blend"), Category::EditingFiles);
/// assert_eq!(category_for(".xyz"), Category::Others);
/// ```
use std::path::Path;

/// Represents a broad file category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Category {
    /// Raster image files (PNG, JPG, GIF, etc.)
    Images,
    /// Document files (PDF, DOCX, TXT, etc.)
    Documents,
    /// Video files (MP4, MKV, AVI, etc.)
    Videos,
    /// Audio files (MP3, WAV, FLAC, etc.)
    Audio,
    /// Source code and markup (Python, JavaScript, HTML, etc.)
    Scripts,
    /// Archive files (ZIP, RAR, 7Z, etc.)
    Archives,
    /// Project files of creative tools (PSD, Blender, After Effects, etc.)
    EditingFiles,
    /// Anything not matched by the table
    Others,
}

/// Extension table. Order matters only for readability; the sets are disjoint.
const CATEGORY_TABLE: &[(Category, &[&str])] = &[
    (
        Category::Images,
        &[".png", ".jpg", ".jpeg", ".gif", ".bmp", ".webp", ".tiff"],
    ),
    (
        Category::Documents,
        &[
            ".pdf", ".docx", ".doc", ".txt", ".pptx", ".xlsx", ".csv", ".odt", ".rtf",
        ],
    ),
    (
        Category::Videos,
        &[
            ".mp4", ".mkv", ".avi", ".mov", ".wmv", ".flv", ".webm", ".mpeg", ".mpg",
        ],
    ),
    (
        Category::Audio,
        &[".mp3", ".wav", ".aac", ".flac", ".ogg", ".m4a", ".wma", ".opus"],
    ),
    (
        Category::Scripts,
        &[
            ".py", ".js", ".sh", ".html", ".css", ".java", ".cpp", ".c", ".php", ".rb", ".go",
            ".swift", ".ts", ".json", ".xml", ".sql",
        ],
    ),
    (Category::Archives, &[".zip", ".rar", ".7z", ".tar", ".gz"]),
    (
        Category::EditingFiles,
        &[
            ".psd", ".prproj", ".aep", ".blend", ".ai", ".indd", ".eps", ".svg",
        ],
    ),
];

impl Category {
    /// Every category, in the order folders are listed in summaries.
    pub const ALL: [Category; 8] = [
        Category::Images,
        Category::Documents,
        Category::Videos,
        Category::Audio,
        Category::Scripts,
        Category::Archives,
        Category::EditingFiles,
        Category::Others,
    ];

    /// Returns the folder name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use foldersort::file_category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "Images");
    /// assert_eq!(Category::EditingFiles.dir_name(), "Editing Files");
    /// assert_eq!(Category::Others.dir_name(), "Others");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Images => "Images",
            Category::Documents => "Documents",
            Category::Videos => "Videos",
            Category::Audio => "Audio",
            Category::Scripts => "Scripts",
            Category::Archives => "Archives",
            Category::EditingFiles => "Editing Files",
            Category::Others => "Others",
        }
    }

    /// Looks up a category by its folder name. Exact, case-sensitive match.
    pub fn from_dir_name(name: &str) -> Option<Category> {
        Self::ALL.iter().copied().find(|c| c.dir_name() == name)
    }

    /// The extensions mapped to this category. Empty for `Others`.
    pub fn extensions(&self) -> &'static [&'static str] {
        CATEGORY_TABLE
            .iter()
            .find(|(category, _)| category == self)
            .map(|(_, exts)| *exts)
            .unwrap_or(&[])
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Maps an extension to its category.
///
/// `extension` is expected lower-cased with its leading dot, or empty.
/// Unknown and empty extensions yield [`Category::Others`].
pub fn category_for(extension: &str) -> Category {
    Category::ALL
        .into_iter()
        .find(|category| category.extensions().contains(&extension))
        .unwrap_or(Category::Others)
}

/// Returns the lower-cased final suffix of `path` including the dot.
///
/// Dotfiles without a further suffix (`.bashrc`) and extensionless names
/// yield an empty string.
///
/// ```
/// use foldersort::file_category::extension_of;
/// use std::path::Path;
///
/// assert_eq!(extension_of(Path::new("Photo.JPG")), ".jpg");
/// assert_eq!(extension_of(Path::new("backup.tar.gz")), ".gz");
/// assert_eq!(extension_of(Path::new("Makefile")), "");
/// ```
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}
