//! Asset bundle copying.
//!
//! Each subdirectory of the content root is published as one bundle under a
//! random directory name:
//!
//! ```text
//! content/images/logo.png   →   build/q8s0d3k1m2zf/logo.png
//! content/images/hero.jpg   →   build/q8s0d3k1m2zf/hero.jpg
//! ```
//!
//! Only regular files directly inside the bundle are copied. Modification
//! time and permission bits are carried over.

use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::ident::IdGenerator;
use crate::types::CopiedDir;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn io_at(path: &Path) -> impl FnOnce(io::Error) -> AssetError + '_ {
    move |source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Copy every bundle in `dirs` into `output_dir/<id>/`.
pub fn copy_assets(
    dirs: &[String],
    content_dir: &Path,
    output_dir: &Path,
    ids: &mut IdGenerator,
) -> Result<Vec<CopiedDir>, AssetError> {
    let mut copied = Vec::with_capacity(dirs.len());
    for name in dirs {
        let id = ids.next_id();
        let src_dir = content_dir.join(name);
        let dst_dir = output_dir.join(&id);

        // create_dir, not create_dir_all: an existing target is an error.
        fs::create_dir(&dst_dir).map_err(io_at(&dst_dir))?;
        let files = copy_dir_files(&src_dir, &dst_dir)?;
        tracing::debug!(dir = %name, %id, files, "asset directory copied");

        copied.push(CopiedDir {
            name: name.clone(),
            id,
            files,
        });
    }
    Ok(copied)
}

/// Copy the regular files directly in `src` into `dst`. Returns the count.
fn copy_dir_files(src: &Path, dst: &Path) -> Result<usize, AssetError> {
    let mut count = 0;
    for entry in WalkDir::new(src)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| AssetError::Io {
            path: src.to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let dst_file = dst.join(entry.file_name());
        copy_preserving_metadata(entry.path(), &dst_file)?;
        count += 1;
    }
    Ok(count)
}

/// Copy contents and permissions, then restore access and modification time.
pub fn copy_preserving_metadata(src: &Path, dst: &Path) -> Result<(), AssetError> {
    fs::copy(src, dst).map_err(io_at(src))?;

    let meta = fs::metadata(src).map_err(io_at(src))?;
    let mut times = FileTimes::new().set_modified(meta.modified().map_err(io_at(src))?);
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    // A read-only copy cannot be opened for writing; the owner may still
    // set its times through a read handle on unix.
    #[cfg(unix)]
    let file = File::open(dst);
    #[cfg(not(unix))]
    let file = File::options().write(true).open(dst);

    file.and_then(|f| f.set_times(times))
        .map_err(io_at(dst))?;
    Ok(())
}
