//! # cloaksite
//!
//! A minimal static site generator that publishes every page and asset
//! directory under a random identifier. Readers still use readable routes
//! (`/about`, `/images/logo.png`); an Apache `.htaccess` rewrites them to the
//! real, unguessable locations.
//!
//! # Pipeline
//!
//! One linear pass, no incremental state:
//!
//! ```text
//! 1. Precondition   build/ must not exist
//! 2. Pages          content/*.md      →  build/<id>.html
//! 3. Homepage       page list         →  build/<id>.html
//! 4. Assets         content/<dir>/*   →  build/<id>/*
//! 5. Route table    all of the above  →  build/.htaccess
//! 6. Mapping        asset dirs        →  mapping_file (optional)
//! ```
//!
//! The first error aborts the build. Nothing is rolled back.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`pipeline`] | Orchestrates a build; also the write-free `check` |
//! | [`scan`] | Lists pages and asset directories in the content root |
//! | [`render`] | Markdown conversion, templates, `<h1>` title extraction |
//! | [`generate`] | Writes pages and the homepage under random ids |
//! | [`assets`] | Copies asset directories, preserving file metadata |
//! | [`routes`] | Renders and writes `.htaccess` and the directory mapping |
//! | [`ident`] | Random identifier generation |
//! | [`config`] | `cloaksite.toml` loading and validation |
//! | [`types`] | Records passed between stages |
//! | [`output`] | CLI report formatting |
//!
//! # Design Decisions
//!
//! ## One Title Per Page
//!
//! Every page, and the rendered homepage, must contain exactly one `<h1>`.
//! The title feeds the homepage listing and the `<title>` element; guessing
//! between several headings or inventing one from the filename would hide
//! content mistakes, so both cases fail the build.
//!
//! ## Unique Identifiers
//!
//! Identifiers are 12 characters of `a-z0-9` by default. The generator also
//! remembers what it issued during the build and draws again on a repeat, so
//! two artifacts can never end up at the same path. Builds can be seeded
//! (`--seed`) to make the output reproducible.
//!
//! ## Sorted Listings
//!
//! Pages and asset directories are processed in name order, which fixes the
//! homepage listing and the route table order across machines.

pub mod assets;
pub mod config;
pub mod generate;
pub mod ident;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod routes;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
