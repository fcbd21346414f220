use std::fmt::Write;
use std::path::Path;

use html_escape::{encode_double_quoted_attribute, encode_text};
use thiserror::Error;
use url::form_urlencoded;

use crate::data_models::Article;
use crate::search::Search;

const BUILTIN_TEMPLATE: &str = include_str!("../templates/index.html");

const QUERY_PLACEHOLDER: &str = "{{query}}";
const CONTENT_PLACEHOLDER: &str = "{{content}}";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("could not read template {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("template is missing the {0} placeholder")]
    MissingPlaceholder(&'static str),

    #[error("formatting failed")]
    Format(#[from] std::fmt::Error),
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Text(String),
    Query,
    Content,
}

/// HTML page layout, parsed once at startup.
///
/// The layout is plain HTML with two placeholders: `{{query}}` receives the
/// current search text (escaped for an attribute value) and `{{content}}`
/// receives the rendered results.
#[derive(Debug, Clone)]
pub struct PageTemplate {
    segments: Vec<Segment>,
}

impl Default for PageTemplate {
    fn default() -> Self {
        Self::parse(BUILTIN_TEMPLATE)
            .expect("built-in template must contain {{query}} and {{content}}")
    }
}

impl PageTemplate {
    pub fn load(path: &Path) -> Result<PageTemplate, RenderError> {
        let source = std::fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&source)
    }

    pub fn parse(source: &str) -> Result<PageTemplate, RenderError> {
        let mut segments = Vec::new();
        let mut rest = source;

        loop {
            let next_query = rest.find(QUERY_PLACEHOLDER);
            let next_content = rest.find(CONTENT_PLACEHOLDER);
            let (at, segment, len) = match (next_query, next_content) {
                (None, None) => break,
                (Some(q), Some(c)) if c < q => (c, Segment::Content, CONTENT_PLACEHOLDER.len()),
                (Some(q), _) => (q, Segment::Query, QUERY_PLACEHOLDER.len()),
                (None, Some(c)) => (c, Segment::Content, CONTENT_PLACEHOLDER.len()),
            };
            if at > 0 {
                segments.push(Segment::Text(rest[..at].to_string()));
            }
            segments.push(segment);
            rest = &rest[at + len..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        if !segments.contains(&Segment::Query) {
            return Err(RenderError::MissingPlaceholder(QUERY_PLACEHOLDER));
        }
        if !segments.contains(&Segment::Content) {
            return Err(RenderError::MissingPlaceholder(CONTENT_PLACEHOLDER));
        }
        Ok(PageTemplate { segments })
    }

    /// Render the page. `None` gives the bare index with no results.
    pub fn render(&self, search: Option<&Search>) -> Result<String, RenderError> {
        let content = match search {
            Some(search) => render_search(search)?,
            None => String::new(),
        };
        let query = search.map(|s| s.search_key.as_str()).unwrap_or("");

        let mut out = String::with_capacity(content.len() + 2048);
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Query => out.push_str(&encode_double_quoted_attribute(query)),
                Segment::Content => out.push_str(&content),
            }
        }
        Ok(out)
    }
}

fn render_search(search: &Search) -> Result<String, RenderError> {
    let mut out = String::new();

    if search.is_headlines() {
        writeln!(out, "<h2>Top headlines</h2>")?;
    }
    writeln!(
        out,
        "<p class=\"result-count\">About <strong>{}</strong> results{}</p>",
        search.results.total_results,
        if search.is_headlines() {
            String::new()
        } else {
            format!(" for <strong>{}</strong>", encode_text(&search.search_key))
        }
    )?;

    writeln!(out, "<ul class=\"search-results\">")?;
    for article in &search.results.articles {
        render_article(&mut out, article)?;
    }
    writeln!(out, "</ul>")?;

    render_pagination(&mut out, search)?;
    Ok(out)
}

fn render_article(out: &mut String, article: &Article) -> Result<(), RenderError> {
    writeln!(out, "<li class=\"news-article\">")?;
    if !article.url_to_image.is_empty() {
        writeln!(
            out,
            "  <img class=\"article-image\" src=\"{}\" alt=\"\">",
            encode_double_quoted_attribute(&article.url_to_image)
        )?;
    }
    writeln!(out, "  <div>")?;
    writeln!(
        out,
        "    <a target=\"_blank\" rel=\"noreferrer noopener\" href=\"{}\"><h3 class=\"title\">{}</h3></a>",
        encode_double_quoted_attribute(&article.url),
        encode_text(&article.title)
    )?;
    writeln!(out, "    <p class=\"description\">{}</p>", encode_text(&article.description))?;

    let mut metadata = vec![encode_text(&article.source.name).to_string()];
    if !article.author.is_empty() {
        metadata.push(encode_text(&article.author).to_string());
    }
    let date = article.format_publisher_date();
    if !date.is_empty() {
        metadata.push(date);
    }
    writeln!(out, "    <div class=\"metadata\">{}</div>", metadata.join(" &middot; "))?;
    writeln!(out, "  </div>")?;
    writeln!(out, "</li>")?;
    Ok(())
}

fn render_pagination(out: &mut String, search: &Search) -> Result<(), RenderError> {
    writeln!(out, "<div class=\"pagination\">")?;
    // The headlines feed is fetched unpaginated, so there is nowhere to link to.
    let navigable = !search.is_headlines();
    if navigable && search.current_page() > 1 {
        writeln!(
            out,
            "  <a href=\"{}\" class=\"button previous-page\">Previous</a>",
            encode_double_quoted_attribute(&page_link(search, search.previous_page()))
        )?;
    }
    writeln!(
        out,
        "  <span class=\"page-indicator\">Page {} of {}</span>",
        search.current_page(),
        search.total_pages
    )?;
    if navigable && !search.is_last_page() {
        writeln!(
            out,
            "  <a href=\"{}\" class=\"button next-page\">Next</a>",
            encode_double_quoted_attribute(&page_link(search, search.next_page))
        )?;
    }
    if navigable {
        writeln!(
            out,
            "  <a href=\"{}\" class=\"button last-page\">Last</a>",
            encode_double_quoted_attribute(&page_link(search, search.go_to_end()))
        )?;
    }
    writeln!(out, "</div>")?;
    Ok(())
}

fn page_link(search: &Search, page: i64) -> String {
    let query: String = form_urlencoded::byte_serialize(search.search_key.as_bytes()).collect();
    format!("/search?q={query}&page={page}")
}
