//! Markdown conversion, templates, and title extraction.
//!
//! ## Templates
//!
//! Two template roles exist:
//!
//! | Role | File | Parameters |
//! |------|------|------------|
//! | page | `templates/page.html` | `title`, `content` (HTML fragment) |
//! | home | `templates/home.html` | `pages`, a list of `(slug, title)` pairs |
//!
//! User templates use Jinja syntax and are rendered by minijinja with
//! auto-escaping off, so `{{ content }}` inserts the page body verbatim. A
//! role whose file is missing falls back to a built-in Maud template.
//!
//! ## Titles
//!
//! Every rendered page, the homepage included, must contain exactly one
//! `<h1>`. Its trimmed text becomes the page title. The heading is not
//! removed from the body.

use maud::{DOCTYPE, PreEscaped, html};
use minijinja::{AutoEscape, Environment, context, path_loader};
use pulldown_cmark::{Options, Parser, html as md_html};
use std::path::Path;
use thiserror::Error;

use crate::config::MarkdownConfig;

pub const PAGE_TEMPLATE: &str = "page.html";
pub const HOME_TEMPLATE: &str = "home.html";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No <h1> found in the content")]
    NoTitle,
    #[error("More than one <h1> found in the content ({0} headings)")]
    AmbiguousTitle(usize),
    #[error("The <h1> in the content is empty")]
    EmptyTitle,
    #[error("HTML parse error: {0}")]
    Html(String),
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

// ============================================================================
// Markdown
// ============================================================================

pub fn markdown_to_html(markdown: &str, config: &MarkdownConfig) -> String {
    let mut options = Options::empty();
    options.set(Options::ENABLE_TABLES, config.tables);
    options.set(Options::ENABLE_STRIKETHROUGH, config.strikethrough);
    options.set(Options::ENABLE_FOOTNOTES, config.footnotes);

    let parser = Parser::new_ext(markdown, options);
    let mut html = String::new();
    md_html::push_html(&mut html, parser);
    html
}

// ============================================================================
// Templates
// ============================================================================

/// The two rendering operations the pipeline needs from a template set.
pub trait Templates {
    /// Wrap a body fragment into a full page.
    fn render_page(&self, title: &str, content: &str) -> Result<String, RenderError>;

    /// Render the homepage body from `(slug, title)` pairs.
    fn render_home(&self, pages: &[(String, String)]) -> Result<String, RenderError>;
}

/// Templates loaded from a directory, with built-in fallbacks per role.
pub struct SiteTemplates {
    env: Environment<'static>,
    has_page: bool,
    has_home: bool,
}

impl SiteTemplates {
    pub fn load(dir: &Path) -> Self {
        let has_page = dir.join(PAGE_TEMPLATE).is_file();
        let has_home = dir.join(HOME_TEMPLATE).is_file();
        for (name, present) in [(PAGE_TEMPLATE, has_page), (HOME_TEMPLATE, has_home)] {
            if !present {
                tracing::info!(template = name, dir = %dir.display(), "using built-in template");
            }
        }

        let mut env = Environment::new();
        env.set_loader(path_loader(dir));
        env.set_auto_escape_callback(|_| AutoEscape::None);
        Self {
            env,
            has_page,
            has_home,
        }
    }

    /// Template set made only of the built-in templates.
    pub fn builtin() -> Self {
        Self {
            env: Environment::new(),
            has_page: false,
            has_home: false,
        }
    }

    /// Which roles are served from files: `(page, home)`.
    pub fn sources(&self) -> (bool, bool) {
        (self.has_page, self.has_home)
    }
}

impl Templates for SiteTemplates {
    fn render_page(&self, title: &str, content: &str) -> Result<String, RenderError> {
        if !self.has_page {
            return Ok(builtin_page(title, content));
        }
        let template = self.env.get_template(PAGE_TEMPLATE)?;
        Ok(template.render(context! { title, content })?)
    }

    fn render_home(&self, pages: &[(String, String)]) -> Result<String, RenderError> {
        if !self.has_home {
            return Ok(builtin_home(pages));
        }
        let template = self.env.get_template(HOME_TEMPLATE)?;
        Ok(template.render(context! { pages })?)
    }
}

fn builtin_page(title: &str, content: &str) -> String {
    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
            }
            body {
                main {
                    (PreEscaped(content))
                }
            }
        }
    };
    markup.into_string()
}

fn builtin_home(pages: &[(String, String)]) -> String {
    let markup = html! {
        h1 { "Home" }
        ul.pages {
            @for (slug, title) in pages {
                li {
                    a href={ "/" (slug) } { (title) }
                }
            }
        }
    };
    markup.into_string()
}

// ============================================================================
// Page assembly
// ============================================================================

/// Trimmed text of the single `<h1>` in `html`.
///
/// Tag names compare case-insensitively, so raw `<H1>` in markdown counts.
pub fn extract_title(html: &str) -> Result<String, RenderError> {
    let dom = tl::parse(html, tl::ParserOptions::default())
        .map_err(|e| RenderError::Html(format!("{e:?}")))?;
    let parser = dom.parser();

    let headings: Vec<&tl::HTMLTag> = dom
        .nodes()
        .iter()
        .filter_map(|node| node.as_tag())
        .filter(|tag| tag.name().as_utf8_str().eq_ignore_ascii_case("h1"))
        .collect();

    match headings.as_slice() {
        [] => Err(RenderError::NoTitle),
        [heading] => {
            let text = heading.inner_text(parser);
            let title = html_escape::decode_html_entities(text.trim()).trim().to_string();
            if title.is_empty() {
                return Err(RenderError::EmptyTitle);
            }
            Ok(title)
        }
        many => Err(RenderError::AmbiguousTitle(many.len())),
    }
}

/// Render `content` through the page template and return `(output, title)`.
pub fn make_page(
    templates: &dyn Templates,
    content: &str,
) -> Result<(String, String), RenderError> {
    let title = extract_title(content)?;
    let output = templates.render_page(&title, content)?;
    Ok((output, title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn md(text: &str) -> String {
        markdown_to_html(text, &MarkdownConfig::default())
    }

    // =========================================================================
    // Title extraction
    // =========================================================================

    #[test]
    fn title_from_single_heading() {
        assert_eq!(extract_title(&md("# About\nHello")).unwrap(), "About");
    }

    #[test]
    fn title_is_trimmed() {
        assert_eq!(extract_title("<h1>\n  Spaced Out  \n</h1>").unwrap(), "Spaced Out");
    }

    #[test]
    fn title_includes_nested_inline_text() {
        let html = md("# The *quick* fox");
        assert_eq!(extract_title(&html).unwrap(), "The quick fox");
    }

    #[test]
    fn nested_heading_is_found() {
        let html = "<div><section><h1>Deep</h1></section></div>";
        assert_eq!(extract_title(html).unwrap(), "Deep");
    }

    #[test]
    fn entities_decoded_in_title() {
        assert_eq!(extract_title(&md("# Q&A")).unwrap(), "Q&A");
    }

    #[test]
    fn named_entities_decoded_in_title() {
        assert_eq!(extract_title("<h1>A &mdash; B</h1>").unwrap(), "A \u{2014} B");
        assert_eq!(extract_title("<h1>caf&eacute; &#x263A;</h1>").unwrap(), "caf\u{e9} \u{263a}");
    }

    #[test]
    fn uppercase_heading_tag_counts() {
        assert_eq!(extract_title("<H1>Upper</H1>").unwrap(), "Upper");
        let html = md("# A\n\n<H1>B</H1>\n");
        assert!(matches!(
            extract_title(&html),
            Err(RenderError::AmbiguousTitle(2))
        ));
    }

    #[test]
    fn empty_heading_is_error() {
        assert!(matches!(
            extract_title(&md("#\n\nbody")),
            Err(RenderError::EmptyTitle)
        ));
        assert!(matches!(
            extract_title("<h1>  &nbsp; </h1>"),
            Err(RenderError::EmptyTitle)
        ));
    }

    #[test]
    fn no_heading_is_error() {
        let html = md("## Only a subheading\n\ntext");
        assert!(matches!(extract_title(&html), Err(RenderError::NoTitle)));
    }

    #[test]
    fn two_headings_is_error() {
        let html = md("# One\n\n# Two");
        assert!(matches!(
            extract_title(&html),
            Err(RenderError::AmbiguousTitle(2))
        ));
    }

    // =========================================================================
    // Markdown
    // =========================================================================

    #[test]
    fn markdown_converts_inline_markup() {
        let html = md("This is **bold** and *italic*.");
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<em>italic</em>"));
    }

    #[test]
    fn tables_follow_config() {
        let source = "| a | b |\n|---|---|\n| 1 | 2 |\n";
        assert!(md(source).contains("<table>"));
        let off = MarkdownConfig {
            tables: false,
            ..MarkdownConfig::default()
        };
        assert!(!markdown_to_html(source, &off).contains("<table>"));
    }

    // =========================================================================
    // Templates
    // =========================================================================

    #[test]
    fn make_page_keeps_heading_in_body() {
        let templates = SiteTemplates::builtin();
        let (output, title) = make_page(&templates, &md("# About\nHello")).unwrap();
        assert_eq!(title, "About");
        assert!(output.contains("<title>About</title>"));
        assert!(output.contains("<h1>About</h1>"));
        assert!(output.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn builtin_home_links_by_slug() {
        let pages = vec![("about".to_string(), "About Us".to_string())];
        let home = SiteTemplates::builtin().render_home(&pages).unwrap();
        assert!(home.contains(r#"href="/about""#));
        assert!(home.contains("About Us"));
        assert_eq!(extract_title(&home).unwrap(), "Home");
    }

    #[test]
    fn builtin_home_escapes_titles() {
        let pages = vec![("x".to_string(), "<script>".to_string())];
        let home = SiteTemplates::builtin().render_home(&pages).unwrap();
        assert!(!home.contains("<script>"));
        assert!(home.contains("&lt;script&gt;"));
    }

    #[test]
    fn file_templates_take_precedence() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(PAGE_TEMPLATE),
            "<title>{{ title }}</title><body>{{ content }}</body>",
        )
        .unwrap();
        fs::write(
            tmp.path().join(HOME_TEMPLATE),
            "<h1>Index</h1>{% for slug, title in pages %}<a href=\"{{ slug }}\">{{ title }}</a>{% endfor %}",
        )
        .unwrap();

        let templates = SiteTemplates::load(tmp.path());
        assert_eq!(templates.sources(), (true, true));

        let page = templates.render_page("T", "<h1>T</h1><p>a &amp; b</p>").unwrap();
        assert_eq!(page, "<title>T</title><body><h1>T</h1><p>a &amp; b</p></body>");

        let pages = vec![
            ("one".to_string(), "One".to_string()),
            ("two".to_string(), "Two".to_string()),
        ];
        let home = templates.render_home(&pages).unwrap();
        assert_eq!(
            home,
            "<h1>Index</h1><a href=\"one\">One</a><a href=\"two\">Two</a>"
        );
    }

    #[test]
    fn missing_template_file_falls_back_to_builtin() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(PAGE_TEMPLATE), "{{ content }}").unwrap();

        let templates = SiteTemplates::load(tmp.path());
        assert_eq!(templates.sources(), (true, false));
        let home = templates.render_home(&[]).unwrap();
        assert!(home.contains("<h1>Home</h1>"));
    }

    #[test]
    fn broken_template_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(PAGE_TEMPLATE), "{% if %}").unwrap();
        let templates = SiteTemplates::load(tmp.path());
        assert!(matches!(
            templates.render_page("t", "<h1>t</h1>"),
            Err(RenderError::Template(_))
        ));
    }
}
