//! Records passed between pipeline stages.

/// A page written to the build directory.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPage {
    /// Source file stem, the public route (`about.md` → `about`).
    pub slug: String,
    /// Random identifier; the page lives at `<id>.html`.
    pub id: String,
    /// Text of the page's single `<h1>`.
    pub title: String,
}

/// An asset directory copied to the build directory.
#[derive(Debug, Clone, PartialEq)]
pub struct CopiedDir {
    /// Directory name under the content root, the public route prefix.
    pub name: String,
    /// Random identifier; the files live under `<id>/`.
    pub id: String,
    /// Number of files copied.
    pub files: usize,
}
