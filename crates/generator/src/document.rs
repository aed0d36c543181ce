//! Base document parsing and meta tag injection.
//!
//! The base document is parsed once with `tl`. Parsing yields two things:
//! the byte offset right after the opening `<head …>` tag, and the byte
//! ranges of every managed tag anywhere inside `<head>`.
//! Rendering a route splices its generated block in at the first and cuts
//! the second out, so every other byte of the document is preserved.
//!
//! `tl` reads the text of `<title>`, `<script>`, `<style>` and `<textarea>`
//! as markup, so a bare `<` in a title derails it. Those contents are
//! blanked out with spaces in a same-length copy before parsing; offsets
//! into the copy are offsets into the original.

use std::ops::Range;

use route_kit_core::{RouteMeta, SiteConfig};
use tracing::{debug, trace};

use crate::error::{MaterializeError, Result};
use crate::meta::MetaTags;

/// A parsed, read-only base document.
#[derive(Debug, Clone)]
pub struct BaseDocument<'a> {
    html: &'a str,
    /// Offset just past the `>` of the opening `<head>` tag
    head_insert: usize,
    /// Sorted, disjoint ranges of stale managed tags
    stale: Vec<Range<usize>>,
}

impl<'a> BaseDocument<'a> {
    /// Parse `html` and locate its `<head>` and the managed tags inside it.
    pub fn parse(html: &'a str) -> Result<Self> {
        let masked = mask_raw_text(html)?;
        let dom = tl::parse(&masked, tl::ParserOptions::default())
            .map_err(|e| MaterializeError::Parse(format!("{:?}", e)))?;
        let parser = dom.parser();

        // First <head> in source order
        let mut head: Option<(usize, &tl::HTMLTag)> = None;
        for node in dom.nodes() {
            let Some(tag) = node.as_tag() else { continue };
            if !tag.name().as_utf8_str().eq_ignore_ascii_case("head") {
                continue;
            }
            let start = span_of(&masked, tag)?.start;
            if head.is_none_or(|(best, _)| start < best) {
                head = Some((start, tag));
            }
        }
        let (head_start, head) = head.ok_or(MaterializeError::MissingHead)?;
        let head_insert = opening_tag_end(html, head_start)?;

        // Every descendant, so tags inside <noscript> go too
        let mut stale: Vec<Range<usize>> = Vec::new();
        for handle in head.children().all(parser) {
            let Some(tag) = handle.as_tag() else {
                continue;
            };
            if !is_managed(tag) {
                continue;
            }
            let span = span_of(&masked, tag)?;
            trace!(tag = %&html[span.clone()], "stale managed tag");
            stale.push(extend_over_line_break(html, span, head_insert));
        }
        stale.sort_by_key(|span| span.start);
        stale.dedup_by(|later, earlier| later.start < earlier.end);

        debug!(stale = stale.len(), "parsed base document");

        Ok(Self {
            html,
            head_insert,
            stale,
        })
    }

    /// Number of managed tags in the base document that rendering replaces
    pub fn stale_tags(&self) -> usize {
        self.stale.len()
    }

    /// The document with stale tags removed and `block` inserted after `<head>`.
    pub fn render(&self, block: &str) -> String {
        let mut out = String::with_capacity(self.html.len() + block.len());
        out.push_str(&self.html[..self.head_insert]);
        out.push_str(block);

        let mut cursor = self.head_insert;
        for span in &self.stale {
            out.push_str(&self.html[cursor..span.start]);
            cursor = span.end;
        }
        out.push_str(&self.html[cursor..]);
        out
    }

    /// Render the managed tags of `route`.
    pub fn render_route(&self, route: &RouteMeta, site: &SiteConfig) -> String {
        self.render(&MetaTags::new(site, route).render())
    }
}

/// Replace the title, description, canonical, Open Graph and Twitter tags
/// of `base_html` with the ones generated for `route`.
pub fn inject_meta_tags(base_html: &str, route: &RouteMeta, site: &SiteConfig) -> Result<String> {
    Ok(BaseDocument::parse(base_html)?.render_route(route, site))
}

/// Whether a tag inside `<head>` is one of the tags this crate owns.
fn is_managed(tag: &tl::HTMLTag) -> bool {
    let name = tag.name().as_utf8_str().to_ascii_lowercase();
    match name.as_str() {
        "title" => true,
        "meta" => {
            let by_name = attribute(tag, "name").is_some_and(|n| {
                n.eq_ignore_ascii_case("description") || starts_with_ignore_case(&n, "twitter:")
            });
            by_name || attribute(tag, "property").is_some_and(|p| starts_with_ignore_case(&p, "og:"))
        }
        "link" => attribute(tag, "rel").is_some_and(|rel| {
            rel.split_ascii_whitespace()
                .any(|token| token.eq_ignore_ascii_case("canonical"))
        }),
        _ => false,
    }
}

fn attribute(tag: &tl::HTMLTag, key: &str) -> Option<String> {
    tag.attributes()
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .and_then(|(_, value)| value.map(|v| v.trim().to_string()))
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Byte range of a tag's raw source within `html`.
///
/// `tl` borrows from the input, so the raw slice points into `html`.
fn span_of(html: &str, tag: &tl::HTMLTag) -> Result<Range<usize>> {
    let raw = tag.raw().as_bytes();
    let start = (raw.as_ptr() as usize)
        .checked_sub(html.as_ptr() as usize)
        .filter(|start| start + raw.len() <= html.len())
        .ok_or_else(|| MaterializeError::Parse("tag lies outside the document".to_string()))?;
    Ok(start..start + raw.len())
}

/// Elements whose contents are text, not markup
const RAW_TEXT: &[&str] = &["title", "script", "style", "textarea"];

/// Copy of `html` with the contents of raw-text elements replaced by spaces.
///
/// Byte length is unchanged. A raw-text element without its closing tag is
/// a parse error rather than a guess.
fn mask_raw_text(html: &str) -> Result<String> {
    let bytes = html.as_bytes();
    let mut masked = bytes.to_vec();
    let mut i = 0;

    while let Some(offset) = html[i..].find('<') {
        let at = i + offset;
        if html[at..].starts_with("<!--") {
            i = html[at + 4..]
                .find("-->")
                .map_or(html.len(), |end| at + 4 + end + 3);
            continue;
        }

        // Tag names start with a letter; "<3" or "< b" is text
        let name_len = bytes[at + 1..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'-')
            .count();
        if name_len == 0 || !bytes[at + 1].is_ascii_alphabetic() {
            i = at + 1;
            continue;
        }
        let name = html[at + 1..at + 1 + name_len].to_ascii_lowercase();

        let Ok(open_end) = opening_tag_end(html, at) else {
            i = at + 1;
            continue;
        };
        if !RAW_TEXT.contains(&name.as_str()) || html[at..open_end].ends_with("/>") {
            i = open_end;
            continue;
        }

        let close = find_closing_tag(html, open_end, &name).ok_or_else(|| {
            MaterializeError::Parse(format!("unterminated <{}> element", name))
        })?;
        masked[open_end..close].fill(b' ');
        i = close;
    }

    // Only whole UTF-8 sequences were replaced, each byte by an ASCII space
    String::from_utf8(masked).map_err(|e| MaterializeError::Parse(e.to_string()))
}

/// Offset of the `</name` that closes a raw-text element, searching from `from`.
fn find_closing_tag(html: &str, from: usize, name: &str) -> Option<usize> {
    let bytes = html.as_bytes();
    let needle_len = name.len() + 2;
    let mut i = from;
    while let Some(offset) = html[i..].find("</") {
        let at = i + offset;
        let end = at + needle_len;
        if end <= bytes.len()
            && bytes[at + 2..end].eq_ignore_ascii_case(name.as_bytes())
            && bytes
                .get(end)
                .is_none_or(|&b| b.is_ascii_whitespace() || matches!(b, b'>' | b'/'))
        {
            return Some(at);
        }
        i = at + 2;
    }
    None
}

/// Offset just past the `>` closing the tag that starts at `start`.
/// Quoted attribute values may contain `>`.
fn opening_tag_end(html: &str, start: usize) -> Result<usize> {
    let mut quote = None;
    for (i, b) in html.bytes().enumerate().skip(start) {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Ok(i + 1),
            (None, _) => {}
        }
    }
    Err(MaterializeError::Parse("unterminated <head> tag".to_string()))
}

/// A tag alone at the start of its line takes its indentation and the
/// preceding line break with it, so removal leaves no blank line behind.
fn extend_over_line_break(html: &str, span: Range<usize>, floor: usize) -> Range<usize> {
    let bytes = html.as_bytes();
    let mut start = span.start;
    while start > floor && matches!(bytes[start - 1], b' ' | b'\t') {
        start -= 1;
    }
    if start > floor && bytes[start - 1] == b'\n' {
        start -= 1;
        if start > floor && bytes[start - 1] == b'\r' {
            start -= 1;
        }
        start..span.end
    } else {
        span
    }
}
