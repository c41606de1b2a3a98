//! Build orchestration.
//!
//! A build is a straight line with no retries:
//!
//! ```text
//! precondition → init → pages → homepage → assets → route table
//! ```
//!
//! The output directory must not exist when the build starts; it is created
//! with a single `create_dir`, so a directory that appears in the meantime
//! still fails the build. The first error stops the build and leaves whatever
//! was already written in place. Remove the output directory (or pass
//! `clean`) before trying again.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

use crate::assets::{self, AssetError};
use crate::config::{ConfigError, SiteConfig};
use crate::generate::{self, GenerateError};
use crate::ident::IdGenerator;
use crate::render::{self, RenderError, SiteTemplates, Templates};
use crate::routes::{self, RouteTable};
use crate::scan;
use crate::types::{CopiedDir, GeneratedPage};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Build directory {0} already exists. Please remove it first.")]
    OutputExists(PathBuf),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("Page '{slug}': {source}")]
    Check {
        slug: String,
        #[source]
        source: RenderError,
    },
}

/// Per-run knobs that are not part of the site config.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Seed for the identifier generator; `None` draws from the OS.
    pub seed: Option<u64>,
    /// Remove an existing output directory instead of refusing to build.
    pub clean: bool,
}

/// What a finished build produced.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub output_dir: PathBuf,
    pub pages: Vec<GeneratedPage>,
    pub homepage_id: String,
    pub dirs: Vec<CopiedDir>,
}

pub fn build(config: &SiteConfig, options: &BuildOptions) -> Result<BuildReport, BuildError> {
    config.validate()?;
    let output_dir = config.output_dir.clone();

    if options.clean && output_dir.exists() {
        tracing::info!(dir = %output_dir.display(), "removing previous build");
        fs::remove_dir_all(&output_dir)?;
    }
    match fs::create_dir(&output_dir) {
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(BuildError::OutputExists(output_dir));
        }
        result => result?,
    }

    let templates = SiteTemplates::load(&config.templates_dir);
    let mut ids = match options.seed {
        Some(seed) => IdGenerator::seeded(seed, config.ids.length),
        None => IdGenerator::from_entropy(config.ids.length),
    };

    let slugs = scan::list_files_with_extension(&config.content_dir, "md")?;
    tracing::info!(count = slugs.len(), "generating pages");
    let pages = generate::make_pages(
        &slugs,
        &config.content_dir,
        &output_dir,
        &templates,
        &config.markdown,
        &mut ids,
    )?;

    let homepage_id = generate::make_homepage(&pages, &output_dir, &templates, &mut ids)?;
    tracing::info!(id = %homepage_id, "homepage generated");

    let asset_dirs = scan::list_subdirs(&config.content_dir)?;
    tracing::info!(count = asset_dirs.len(), "copying asset directories");
    let dirs = assets::copy_assets(&asset_dirs, &config.content_dir, &output_dir, &mut ids)?;

    RouteTable {
        homepage_id: &homepage_id,
        pages: &pages,
        dirs: &dirs,
        trailing_slash_redirects: config.routes.trailing_slash_redirects,
        canonical_host_redirect: config.routes.canonical_host_redirect,
    }
    .write(&output_dir)?;
    tracing::info!(ids = ids.issued(), "route table written");

    if let Some(path) = &config.mapping_file {
        routes::write_mapping(&dirs, path)?;
        tracing::info!(path = %path.display(), "directory mapping written");
    }

    Ok(BuildReport {
        output_dir,
        pages,
        homepage_id,
        dirs,
    })
}

/// Validate content without writing anything.
///
/// Every page is rendered through the page template and, like the homepage,
/// must yield exactly one title. Returns the `(slug, title)` pairs and the
/// asset directory names.
pub fn check(config: &SiteConfig) -> Result<(Vec<(String, String)>, Vec<String>), BuildError> {
    let inventory = scan::scan(&config.content_dir)?;
    let templates = SiteTemplates::load(&config.templates_dir);

    let mut titled = Vec::with_capacity(inventory.pages.len());
    for slug in &inventory.pages {
        let source = fs::read_to_string(config.content_dir.join(format!("{slug}.md")))?;
        let body = render::markdown_to_html(&source, &config.markdown);
        let (_, title) =
            render::make_page(&templates, &body).map_err(|source| BuildError::Check {
                slug: slug.clone(),
                source,
            })?;
        titled.push((slug.clone(), title));
    }

    let home = templates
        .render_home(&titled)
        .and_then(|html| render::extract_title(&html))
        .map_err(GenerateError::Homepage)?;
    tracing::debug!(title = %home, "homepage title");

    Ok((titled, inventory.asset_dirs))
}
