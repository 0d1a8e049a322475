//! Markdown link extraction
//!
//! Pulls internal link targets out of a note: `[[wikilinks]]` (with or
//! without `|display text`) and inline markdown links. External URLs and
//! same-document anchors are not links to other notes and are left out.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Link classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Link to another note in the same vault
    Internal,
    /// Link to an external URL
    External,
    /// Anchor within the same document
    Anchor,
}

/// A link found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLink {
    /// Link target as written (display text removed)
    pub target: String,
    /// Display text, when it differs from the target
    pub display: Option<String>,
    pub kind: LinkKind,
}

/// Classify a link destination
pub fn classify_link(url: &str) -> LinkKind {
    if url.starts_with('#') {
        LinkKind::Anchor
    } else if url.contains("://") || url.starts_with("mailto:") {
        LinkKind::External
    } else {
        LinkKind::Internal
    }
}

/// Extract wikilinks (`[[target]]`, `[[target|display]]`). Embeds
/// (`![[image.png]]`) are skipped.
pub fn extract_wikilinks(content: &str) -> Vec<ParsedLink> {
    let mut links = Vec::new();
    let mut chars = content.chars().peekable();
    let mut prev: Option<char> = None;
    let mut in_link = false;
    let mut is_embed = false;
    let mut link_text = String::new();

    while let Some(c) = chars.next() {
        if !in_link && c == '[' && chars.peek() == Some(&'[') {
            chars.next();
            in_link = true;
            is_embed = prev == Some('!');
            link_text.clear();
            prev = Some('[');
            continue;
        }
        if in_link && c == ']' && chars.peek() == Some(&']') {
            chars.next();
            in_link = false;
            if !is_embed {
                if let Some(link) = split_wikilink(&link_text) {
                    links.push(link);
                }
            }
            prev = Some(']');
            continue;
        }
        if in_link {
            if c == '\n' {
                // wikilinks never span lines
                in_link = false;
            } else {
                link_text.push(c);
            }
        }
        prev = Some(c);
    }

    links
}

fn split_wikilink(text: &str) -> Option<ParsedLink> {
    let (target, display) = match text.find('|') {
        Some(pipe) => (
            text[..pipe].trim().to_string(),
            Some(text[pipe + 1..].trim().to_string()),
        ),
        None => (text.trim().to_string(), None),
    };
    if target.is_empty() {
        return None;
    }
    let kind = classify_link(&target);
    Some(ParsedLink {
        target,
        display,
        kind,
    })
}

/// Extract inline markdown links (`[text](dest)`) using pulldown-cmark.
pub fn extract_markdown_links(content: &str) -> Vec<ParsedLink> {
    let parser = Parser::new_ext(content, Options::all());

    let mut links = Vec::new();
    let mut current_url = String::new();
    let mut current_text = String::new();
    let mut in_link = false;

    for event in parser {
        match event {
            Event::Start(Tag::Link { dest_url, .. }) => {
                in_link = true;
                current_url = dest_url.to_string();
                current_text.clear();
            }
            Event::End(TagEnd::Link) => {
                in_link = false;
                if !current_url.is_empty() {
                    let display = if current_text.is_empty() {
                        None
                    } else {
                        Some(std::mem::take(&mut current_text))
                    };
                    links.push(ParsedLink {
                        kind: classify_link(&current_url),
                        target: std::mem::take(&mut current_url),
                        display,
                    });
                }
            }
            Event::Text(text) if in_link => current_text.push_str(&text),
            Event::Code(code) if in_link => current_text.push_str(&code),
            _ => {}
        }
    }

    links
}

/// Internal link targets of a document, in order of appearance within each
/// syntax (markdown links first, then wikilinks). Duplicates are kept.
pub fn internal_link_targets(content: &str) -> Vec<String> {
    extract_markdown_links(content)
        .into_iter()
        .chain(extract_wikilinks(content))
        .filter(|link| link.kind == LinkKind::Internal)
        .map(|link| link.target)
        .collect()
}
