//! Page and homepage generation.
//!
//! ## Output Structure
//!
//! ```text
//! build/
//! ├── 4k2m9x0qz7ab.html     # about.md
//! ├── p0c8w1n5r3ty.html     # contact.md
//! └── h7d2j6v4s1eu.html     # Homepage
//! ```
//!
//! Filenames carry no trace of the source slug. The mapping back to human
//! routes is returned as [`GeneratedPage`] records and ends up only in the
//! route table.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::MarkdownConfig;
use crate::ident::IdGenerator;
use crate::render::{self, RenderError, Templates};
use crate::types::GeneratedPage;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Page '{slug}': {source}")]
    Page {
        slug: String,
        #[source]
        source: RenderError,
    },
    #[error("Homepage: {0}")]
    Homepage(#[source] RenderError),
}

/// Render every page in `slugs` and write it to `output_dir/<id>.html`.
///
/// The first failing page aborts the run; pages written before it stay on
/// disk.
pub fn make_pages(
    slugs: &[String],
    content_dir: &Path,
    output_dir: &Path,
    templates: &dyn Templates,
    markdown: &MarkdownConfig,
    ids: &mut IdGenerator,
) -> Result<Vec<GeneratedPage>, GenerateError> {
    let mut generated = Vec::with_capacity(slugs.len());
    for slug in slugs {
        let source = fs::read_to_string(content_dir.join(format!("{slug}.md")))?;
        let body = render::markdown_to_html(&source, markdown);
        let (output, title) =
            render::make_page(templates, &body).map_err(|source| GenerateError::Page {
                slug: slug.clone(),
                source,
            })?;

        let id = ids.next_id();
        fs::write(output_dir.join(format!("{id}.html")), output)?;
        tracing::debug!(%slug, %id, %title, "page written");

        generated.push(GeneratedPage {
            slug: slug.clone(),
            id,
            title,
        });
    }
    Ok(generated)
}

/// Render the homepage listing `pages` and write it under a fresh id.
///
/// The home template sees only `(slug, title)` pairs. Returns the id.
pub fn make_homepage(
    pages: &[GeneratedPage],
    output_dir: &Path,
    templates: &dyn Templates,
    ids: &mut IdGenerator,
) -> Result<String, GenerateError> {
    let listing: Vec<(String, String)> = pages
        .iter()
        .map(|p| (p.slug.clone(), p.title.clone()))
        .collect();

    let home_html = templates
        .render_home(&listing)
        .map_err(GenerateError::Homepage)?;
    let (output, _) = render::make_page(templates, &home_html).map_err(GenerateError::Homepage)?;

    let id = ids.next_id();
    fs::write(output_dir.join(format!("{id}.html")), output)?;
    tracing::debug!(%id, pages = pages.len(), "homepage written");
    Ok(id)
}
