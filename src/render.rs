//! Views over [`UiState`]: the HTML page served by the web front end and
//! the plain-text output of the CLI.

use crate::controller::{SearchForm, UiState};
use crate::types::Citation;
use pulldown_cmark::escape::{escape_href, escape_html};
use pulldown_cmark::{html, CowStr, Event, LinkType, Options, Parser, Tag};
use url::{ParseError, Url};

const LINK_TARGET: &str = r#" target="_blank" rel="noopener noreferrer""#;

/// Renders answer markdown to HTML.
///
/// Every link opens in a new browsing context without opener or referrer.
/// Links with a scheme other than http, https or mailto get an empty href.
/// Raw HTML in the answer is escaped and shown as text.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let events = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) => Event::Text(raw),
        Event::Start(Tag::Link(kind, dest, title)) => Event::Html(open_link(kind, &dest, &title)),
        Event::End(Tag::Link(..)) => Event::Html(CowStr::Borrowed("</a>")),
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

fn open_link(kind: LinkType, dest: &str, title: &str) -> CowStr<'static> {
    let mut tag = String::from("<a href=\"");
    if kind == LinkType::Email {
        push_href(&mut tag, &format!("mailto:{}", dest));
    } else {
        push_href(&mut tag, dest);
    }
    tag.push('"');
    if !title.is_empty() {
        tag.push_str(" title=\"");
        push_escaped(&mut tag, title);
        tag.push('"');
    }
    tag.push_str(LINK_TARGET);
    tag.push('>');
    CowStr::from(tag)
}

// Writes into a String cannot fail.
fn push_escaped(out: &mut String, text: &str) {
    let _ = escape_html(&mut *out, text);
}

fn push_href(out: &mut String, href: &str) {
    if is_safe_href(href) {
        let _ = escape_href(&mut *out, href);
    }
}

/// Relative references and http, https or mailto URLs.
fn is_safe_href(href: &str) -> bool {
    match Url::parse(href) {
        Ok(url) => matches!(url.scheme(), "http" | "https" | "mailto"),
        Err(ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}

fn render_citations(out: &mut String, citations: &[Citation]) {
    if citations.is_empty() {
        return;
    }
    out.push_str("<div class=\"mt-4\">\n<h6>Sources</h6>\n<ol class=\"small\">\n");
    for citation in citations {
        out.push_str(&format!("<li data-index=\"{}\"><a href=\"", citation.index));
        push_href(out, &citation.url);
        out.push('"');
        out.push_str(LINK_TARGET);
        out.push_str(" class=\"text-decoration-none\">");
        push_escaped(out, &citation.url);
        out.push_str("</a></li>\n");
    }
    out.push_str("</ol>\n</div>\n");
}

/// Result card for the current state. Empty for `Idle` and `Loading`.
pub fn render_result(state: &UiState) -> String {
    let mut out = String::new();
    match state {
        UiState::Idle | UiState::Loading => {}
        UiState::Failure(error) => {
            out.push_str("<div class=\"card mt-4 p-4 shadow-sm\">\n<div class=\"text-danger\">Error: ");
            push_escaped(&mut out, &error.message);
            out.push_str("</div>\n</div>\n");
        }
        UiState::Success(result) => {
            out.push_str("<div class=\"card mt-4 p-4 shadow-sm\">\n<h5>Answer</h5>\n");
            out.push_str(&render_markdown(&result.answer));
            render_citations(&mut out, &result.citations);
            out.push_str("</div>\n");
        }
    }
    out
}

/// Full page: the form with the typed values, then the result card.
pub fn render_page(form: &SearchForm, state: &UiState) -> String {
    let mut out = String::from(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>AI Site Search</title>\n</head>\n<body>\n<div class=\"container py-5\">\n\
         <h1 class=\"text-center mb-4\">AI Site Search</h1>\n\
         <form class=\"card p-4 shadow-sm\" method=\"post\" action=\"/\">\n",
    );

    out.push_str(
        "<div class=\"mb-3\">\n<label for=\"site\" class=\"form-label\">Site URL</label>\n\
         <input id=\"site\" name=\"site\" class=\"form-control\" placeholder=\"example.com\" required value=\"",
    );
    push_escaped(&mut out, &form.site);
    out.push_str("\">\n</div>\n");

    out.push_str(
        "<div class=\"mb-3\">\n<label for=\"question\" class=\"form-label\">Question</label>\n\
         <textarea id=\"question\" name=\"question\" class=\"form-control\" rows=\"3\" \
         placeholder=\"What is on the pricing page?\" required>",
    );
    push_escaped(&mut out, &form.question);
    out.push_str("</textarea>\n</div>\n");

    if state.is_loading() {
        out.push_str("<button class=\"btn btn-primary\" type=\"submit\" disabled>Searching…</button>\n");
    } else {
        out.push_str("<button class=\"btn btn-primary\" type=\"submit\">Search</button>\n");
    }
    out.push_str("</form>\n");

    out.push_str(&render_result(state));
    out.push_str("</div>\n</body>\n</html>\n");
    out
}

/// Plain-text view for terminals, wrapping the answer at `width` columns.
pub fn render_text(state: &UiState, width: usize) -> String {
    match state {
        UiState::Success(result) => {
            let html = render_markdown(&result.answer);
            let mut out = html2text::from_read(html.as_bytes(), width.max(1));
            push_text_citations(&mut out, &result.citations);
            out
        }
        other => render_raw(other),
    }
}

/// Plain-text view that prints the answer markdown untouched.
pub fn render_raw(state: &UiState) -> String {
    match state {
        UiState::Idle => String::new(),
        UiState::Loading => "Searching…\n".to_string(),
        UiState::Failure(error) => format!("Error: {}\n", error.message),
        UiState::Success(result) => {
            let mut out = result.answer.clone();
            if !out.ends_with('\n') {
                out.push('\n');
            }
            push_text_citations(&mut out, &result.citations);
            out
        }
    }
}

fn push_text_citations(out: &mut String, citations: &[Citation]) {
    if citations.is_empty() {
        return;
    }
    out.push_str("\nSources\n");
    for citation in citations {
        out.push_str(&format!("[{}] {}\n", citation.index, citation.url));
    }
}
