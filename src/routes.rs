//! Apache route table.
//!
//! The build directory is served by Apache; `.htaccess` maps public routes
//! to the randomized files:
//!
//! ```text
//! DirectoryIndex h7d2j6v4s1eu.html
//!
//! RewriteEngine On
//! RewriteRule ^about$ /4k2m9x0qz7ab.html [L]
//! RewriteRule ^images/(.*)$ /q8s0d3k1m2zf/$1 [L]
//! ```
//!
//! Rules appear in build order: pages first, then asset directories. Slugs
//! and directory names are regex-escaped in the patterns, so `a.b` only
//! matches itself.
//!
//! The optional mapping manifest lists one `name<TAB>id` line per asset
//! directory for tooling that needs to find the copied files.

use std::fs;
use std::path::Path;

use crate::types::{CopiedDir, GeneratedPage};

pub const HTACCESS: &str = ".htaccess";

/// Everything the route table needs to know about one build.
#[derive(Debug, Clone)]
pub struct RouteTable<'a> {
    pub homepage_id: &'a str,
    pub pages: &'a [GeneratedPage],
    pub dirs: &'a [CopiedDir],
    /// Emit `^slug/$ → /slug` permanent redirects after the page rules.
    pub trailing_slash_redirects: bool,
    /// Emit a `www.` → bare host redirect ahead of every other rule.
    pub canonical_host_redirect: bool,
}

impl RouteTable<'_> {
    pub fn render(&self) -> String {
        let mut out = format!("DirectoryIndex {}.html\n\nRewriteEngine On\n", self.homepage_id);
        if self.canonical_host_redirect {
            out.push_str("RewriteCond %{HTTP_HOST} ^www\\.(.*)$ [NC]\n");
            out.push_str("RewriteRule ^(.*)$ https://%1/$1 [R=301,L]\n");
        }
        for page in self.pages {
            out.push_str(&format!(
                "RewriteRule ^{}$ /{}.html [L]\n",
                regex::escape(&page.slug),
                page.id
            ));
        }
        if self.trailing_slash_redirects {
            for page in self.pages {
                out.push_str(&format!(
                    "RewriteRule ^{}/$ /{} [R=301,L]\n",
                    regex::escape(&page.slug),
                    page.slug
                ));
            }
        }
        for dir in self.dirs {
            out.push_str(&format!(
                "RewriteRule ^{}/(.*)$ /{}/$1 [L]\n",
                regex::escape(&dir.name),
                dir.id
            ));
        }
        out
    }

    /// Write the table to `output_dir/.htaccess`.
    pub fn write(&self, output_dir: &Path) -> std::io::Result<()> {
        fs::write(output_dir.join(HTACCESS), self.render())
    }
}

/// `name<TAB>id` per asset directory, in build order.
pub fn render_mapping(dirs: &[CopiedDir]) -> String {
    dirs.iter()
        .map(|dir| format!("{}\t{}\n", dir.name, dir.id))
        .collect()
}

/// Write the asset directory manifest to `path`, creating its parent.
pub fn write_mapping(dirs: &[CopiedDir], path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_mapping(dirs))
}
