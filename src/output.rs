//! CLI output formatting.
//!
//! Output is route-first: every artifact is listed by its public route, with
//! the randomized location it resolves to on the right.
//!
//! ## Build
//!
//! ```text
//! Pages
//! 001 About → /about
//!     File: 4k2m9x0qz7ab.html
//! 002 Contact → /contact
//!     File: p0c8w1n5r3ty.html
//!
//! Home → h7d2j6v4s1eu.html
//!
//! Assets
//! 001 /images/ → q8s0d3k1m2zf/ (2 files)
//!
//! Generated 2 pages, 1 asset directory in build
//! ```
//!
//! Each report has a `format_*` function returning lines (pure, testable)
//! and a `print_*` wrapper that writes them to stdout.

use crate::pipeline::BuildReport;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(count: usize, word: &str, words: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {words}")
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();

    if !report.pages.is_empty() {
        lines.push("Pages".to_string());
        for (i, page) in report.pages.iter().enumerate() {
            lines.push(format!(
                "{} {} → /{}",
                format_index(i + 1),
                page.title,
                page.slug
            ));
            lines.push(format!("    File: {}.html", page.id));
        }
        lines.push(String::new());
    }

    lines.push(format!("Home → {}.html", report.homepage_id));

    if !report.dirs.is_empty() {
        lines.push(String::new());
        lines.push("Assets".to_string());
        for (i, dir) in report.dirs.iter().enumerate() {
            lines.push(format!(
                "{} /{}/ → {}/ ({})",
                format_index(i + 1),
                dir.name,
                dir.id,
                plural(dir.files, "file", "files")
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {} in {}",
        plural(report.pages.len(), "page", "pages"),
        plural(report.dirs.len(), "asset directory", "asset directories"),
        report.output_dir.display()
    ));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(pages: &[(String, String)], dirs: &[String]) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Pages".to_string());
    for (i, (slug, title)) in pages.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), title));
        lines.push(format!("    Source: {}.md", slug));
    }

    if !dirs.is_empty() {
        lines.push(String::new());
        lines.push("Assets".to_string());
        for (i, dir) in dirs.iter().enumerate() {
            lines.push(format!("{} {}/", format_index(i + 1), dir));
        }
    }
    lines
}

pub fn print_check_output(pages: &[(String, String)], dirs: &[String]) {
    for line in format_check_output(pages, dirs) {
        println!("{}", line);
    }
}
