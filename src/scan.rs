//! Content directory discovery.
//!
//! Only the top level of the content root matters:
//!
//! ```text
//! content/
//! ├── about.md          # Page, slug "about"
//! ├── contact.md        # Page, slug "contact"
//! ├── images/           # Asset bundle, files copied as-is
//! │   ├── logo.png
//! │   └── nested/       # Ignored: bundles are not copied recursively
//! └── .drafts/          # Hidden entries are skipped
//! ```
//!
//! Listings are sorted by name so the homepage and the route table come out
//! in the same order on every machine.

use std::fs;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Everything a build needs to know about the content root.
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    /// Page slugs (markdown file stems).
    pub pages: Vec<String>,
    /// Asset bundle directory names.
    pub asset_dirs: Vec<String>,
}

pub fn scan(root: &Path) -> std::io::Result<Inventory> {
    Ok(Inventory {
        pages: list_files_with_extension(root, "md")?,
        asset_dirs: list_subdirs(root)?,
    })
}

/// Names of the immediate subdirectories of `root`.
pub fn list_subdirs(root: &Path) -> std::io::Result<Vec<String>> {
    let mut names: Vec<String> = top_level_entries(root)?
        .into_iter()
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| !is_hidden(name))
        .collect();
    names.sort();
    Ok(names)
}

/// Stems of the regular files directly in `dir` whose extension is `ext`.
///
/// `list_files_with_extension(content, "md")` on `about.md` yields `about`.
pub fn list_files_with_extension(dir: &Path, ext: &str) -> std::io::Result<Vec<String>> {
    let mut stems = Vec::new();
    for entry in top_level_entries(dir)? {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().is_none_or(|e| e != ext) {
            continue;
        }
        let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
            continue;
        };
        if !stem.is_empty() && !is_hidden(&stem) {
            stems.push(stem);
        }
    }
    stems.sort();
    Ok(stems)
}

/// Entries directly under `root`, symlinks resolved.
///
/// A missing or unreadable root is an error. An entry whose target cannot be
/// stat'ed (a dangling symlink, say) is neither a page nor a directory and
/// is skipped.
fn top_level_entries(root: &Path) -> std::io::Result<Vec<DirEntry>> {
    fs::metadata(root)?;

    let mut entries = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(err) if err.depth() > 0 => {
                tracing::warn!(
                    path = ?err.path(),
                    error = %err,
                    "skipping unreadable content entry"
                );
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(entries)
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;
    use tempfile::TempDir;

    fn content_tree() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::write(root.join("zebra.md"), "# Zebra").unwrap();
        fs::write(root.join("about.md"), "# About").unwrap();
        fs::write(root.join("notes.txt"), "not a page").unwrap();
        fs::create_dir_all(root.join("images/nested")).unwrap();
        fs::create_dir_all(root.join("fonts")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        tmp
    }

    #[test]
    fn lists_markdown_stems_sorted() {
        let tmp = content_tree();
        let pages = list_files_with_extension(tmp.path(), "md").unwrap();
        assert_eq!(pages, vec!["about", "zebra"]);
    }

    #[test]
    fn lists_only_immediate_subdirs() {
        let tmp = content_tree();
        let dirs = list_subdirs(tmp.path()).unwrap();
        assert_eq!(dirs, vec!["fonts", "images"]);
    }

    #[test]
    fn extension_match_is_exact() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.md"), "").unwrap();
        fs::write(tmp.path().join("b.mdx"), "").unwrap();
        fs::write(tmp.path().join("c.md.bak"), "").unwrap();
        assert_eq!(list_files_with_extension(tmp.path(), "md").unwrap(), vec!["a"]);
    }

    #[test]
    fn directory_named_like_a_page_is_not_a_page() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("weird.md")).unwrap();
        assert!(list_files_with_extension(tmp.path(), "md").unwrap().is_empty());
        assert_eq!(list_subdirs(tmp.path()).unwrap(), vec!["weird.md"]);
    }

    #[test]
    fn missing_root_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        let err = list_subdirs(&missing).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = list_files_with_extension(&missing, "md").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_skipped() {
        let tmp = content_tree();
        std::os::unix::fs::symlink(tmp.path().join("gone"), tmp.path().join("dangling")).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("gone.md"), tmp.path().join("ghost.md"))
            .unwrap();

        assert_eq!(list_subdirs(tmp.path()).unwrap(), vec!["fonts", "images"]);
        assert_eq!(
            list_files_with_extension(tmp.path(), "md").unwrap(),
            vec!["about", "zebra"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_is_listed() {
        let tmp = content_tree();
        std::os::unix::fs::symlink(tmp.path().join("images"), tmp.path().join("pics")).unwrap();
        assert_eq!(
            list_subdirs(tmp.path()).unwrap(),
            vec!["fonts", "images", "pics"]
        );
    }

    #[test]
    fn empty_root_yields_empty_inventory() {
        let tmp = TempDir::new().unwrap();
        let inventory = scan(tmp.path()).unwrap();
        assert!(inventory.pages.is_empty());
        assert!(inventory.asset_dirs.is_empty());
    }

    #[test]
    fn scan_collects_both_listings() {
        let tmp = content_tree();
        let inventory = scan(tmp.path()).unwrap();
        assert_eq!(inventory.pages, vec!["about", "zebra"]);
        assert_eq!(inventory.asset_dirs, vec!["fonts", "images"]);
    }
}
