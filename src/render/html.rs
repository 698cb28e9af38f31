//! Rewrites the leaderboard rows of an HTML page.
//!
//! Only what the page needs is understood: elements are located by tag name
//! and class list, and their inner markup is replaced wholesale. Comments,
//! doctype and other `<!...>` constructs are skipped while scanning.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::Presenter;
use crate::view::{LeaderboardView, Slot, SlotContent, PLACEHOLDER_NAME, PLACEHOLDER_XP};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read page {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write page {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct HtmlPage {
    html: String,
}

impl HtmlPage {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn open(path: &Path) -> Result<Self, RenderError> {
        let html = fs::read_to_string(path).map_err(|source| RenderError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(html))
    }

    pub fn save(&self, path: &Path) -> Result<(), RenderError> {
        fs::write(path, &self.html).map_err(|source| RenderError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    /// Write every slot whose element exists. Returns how many were written.
    pub fn apply(&mut self, view: &LeaderboardView) -> usize {
        let mut written = 0;
        for slot in &view.slots {
            if self.apply_slot(slot) {
                written += 1;
            } else {
                tracing::debug!(selector = slot.selector, "slot element not found, skipping");
            }
        }
        written
    }

    fn apply_slot(&mut self, slot: &Slot) -> bool {
        let classes = selector_classes(slot.selector);
        let Some(element) = find_element(&self.html, &classes) else {
            return false;
        };

        let (inner, open_tag) = match &slot.content {
            SlotContent::Filled(standing) => {
                let color = escape(standing.tier.color);
                let inner = format!(
                    concat!(
                        r#"<div class="lb-rank"><span>{badge}</span></div>"#,
                        r#"<div class="lb-user"><span class="lb-name">{handle}</span>"#,
                        r#"<span class="lb-perk" style="color:{color}; font-size: 0.75rem;">{perk}</span></div>"#,
                        r#"<div class="lb-xp">{xp} <span class="xp-label">XP</span></div>"#,
                    ),
                    badge = slot.badge(),
                    handle = escape(&standing.handle()),
                    color = color,
                    perk = escape(standing.tier.perk),
                    xp = standing.xp_display(),
                );
                let open_tag = element.with_border_color(standing.tier.color);
                (inner, Some(open_tag))
            }
            SlotContent::Empty => (
                format!(
                    r#"<div class="lb-rank">{}</div><div class="lb-user">{}</div><div class="lb-xp">{}</div>"#,
                    slot.badge(),
                    PLACEHOLDER_NAME,
                    PLACEHOLDER_XP
                ),
                None,
            ),
        };

        self.html
            .replace_range(element.inner_start..element.inner_end, &inner);
        if let Some(open_tag) = open_tag {
            self.html
                .replace_range(element.open_start..element.inner_start, &open_tag);
        }
        true
    }
}

impl Presenter for HtmlPage {
    fn present(&mut self, view: &LeaderboardView) -> anyhow::Result<()> {
        let written = self.apply(view);
        tracing::debug!(written, "page rows updated");
        Ok(())
    }
}

/// `.lb-row.gold` -> `["lb-row", "gold"]`
fn selector_classes(selector: &str) -> Vec<&str> {
    selector.split('.').filter(|c| !c.is_empty()).collect()
}

#[derive(Debug, Clone)]
struct Element {
    open_start: usize,
    inner_start: usize,
    inner_end: usize,
    tag: String,
    attrs: Vec<(String, String)>,
}

impl Element {
    /// The opening tag with `border-left-color` set in its style attribute.
    fn with_border_color(&self, color: &str) -> String {
        let mut attrs = self.attrs.clone();
        let declaration = format!("border-left-color: {color};");
        match attrs.iter_mut().find(|(name, _)| name == "style") {
            Some((_, style)) => {
                let kept: Vec<&str> = style
                    .split(';')
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .filter(|d| {
                        d.split(':')
                            .next()
                            .map(|prop| prop.trim() != "border-left-color")
                            .unwrap_or(true)
                    })
                    .collect();
                let mut rebuilt: String = kept.iter().map(|d| format!("{d}; ")).collect();
                rebuilt.push_str(&declaration);
                *style = rebuilt;
            }
            None => attrs.push(("style".to_string(), declaration)),
        }

        let mut tag = format!("<{}", self.tag);
        for (name, value) in &attrs {
            tag.push(' ');
            tag.push_str(name);
            tag.push_str("=\"");
            tag.push_str(&value.replace('"', "&quot;"));
            tag.push('"');
        }
        tag.push('>');
        tag
    }
}

/// One tag found while scanning.
struct Tag<'a> {
    start: usize,
    end: usize,
    name: &'a str,
    closing: bool,
    self_closing: bool,
    body: &'a str,
}

/// Next tag at or after `from`, skipping `<!...>` and `<?...>`.
fn next_tag(html: &str, from: usize) -> Option<Tag<'_>> {
    let bytes = html.as_bytes();
    let mut pos = from;
    loop {
        let start = pos + html[pos..].find('<')?;
        let rest = &html[start + 1..];

        if rest.starts_with("!--") {
            let close = rest.find("-->")?;
            pos = start + 1 + close + 3;
            continue;
        }
        if rest.starts_with('!') || rest.starts_with('?') {
            pos = start + 1 + rest.find('>')? + 1;
            continue;
        }

        let closing = rest.starts_with('/');
        let name_start = start + 1 + usize::from(closing);
        let name_len = html[name_start..]
            .find(|c: char| !c.is_ascii_alphanumeric() && c != '-')
            .unwrap_or(html.len() - name_start);
        if name_len == 0 {
            pos = start + 1;
            continue;
        }

        // Find the closing '>' outside quoted attribute values.
        let mut quote: Option<u8> = None;
        let mut end = None;
        for (i, &b) in bytes.iter().enumerate().skip(name_start + name_len) {
            match quote {
                Some(q) if b == q => quote = None,
                Some(_) => {}
                None if b == b'"' || b == b'\'' => quote = Some(b),
                None if b == b'>' => {
                    end = Some(i + 1);
                    break;
                }
                None => {}
            }
        }
        let end = end?;

        let body = &html[name_start + name_len..end - 1];
        return Some(Tag {
            start,
            end,
            name: &html[name_start..name_start + name_len],
            closing,
            self_closing: body.trim_end().ends_with('/'),
            body,
        });
    }
}

fn parse_attrs(body: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    let mut rest = body.trim_end_matches('/').trim_start();

    while !rest.is_empty() {
        let name_len = rest
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(rest.len());
        let name = &rest[..name_len];
        rest = rest[name_len..].trim_start();

        let value = if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            match after_eq.chars().next() {
                Some(q @ ('"' | '\'')) => {
                    let inner = &after_eq[1..];
                    let close = inner.find(q).unwrap_or(inner.len());
                    rest = inner.get(close + 1..).unwrap_or("");
                    &inner[..close]
                }
                _ => {
                    let len = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
                    rest = &after_eq[len..];
                    &after_eq[..len]
                }
            }
        } else {
            ""
        };

        if !name.is_empty() {
            attrs.push((name.to_ascii_lowercase(), value.to_string()));
        }
        rest = rest.trim_start();
    }

    attrs
}

/// First element whose class list contains every class in `classes`.
fn find_element(html: &str, classes: &[&str]) -> Option<Element> {
    let mut pos = 0;
    while let Some(tag) = next_tag(html, pos) {
        pos = tag.end;
        if tag.closing || tag.self_closing {
            continue;
        }

        let attrs = parse_attrs(tag.body);
        let matches = attrs
            .iter()
            .find(|(name, _)| name == "class")
            .map(|(_, value)| {
                let have: Vec<&str> = value.split_whitespace().collect();
                classes.iter().all(|c| have.contains(c))
            })
            .unwrap_or(false);
        if !matches {
            continue;
        }

        // An unclosed match (e.g. inside <template> or a script string)
        // must not hide a later, well-formed one.
        let Some(inner_end) = matching_close(html, tag.end, tag.name) else {
            continue;
        };
        return Some(Element {
            open_start: tag.start,
            inner_start: tag.end,
            inner_end,
            tag: tag.name.to_string(),
            attrs,
        });
    }
    None
}

/// Offset of the `</name>` that closes an element whose content starts at `from`.
fn matching_close(html: &str, from: usize, name: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut pos = from;
    while let Some(tag) = next_tag(html, pos) {
        pos = tag.end;
        if !tag.name.eq_ignore_ascii_case(name) {
            continue;
        }
        if tag.closing {
            depth -= 1;
            if depth == 0 {
                return Some(tag.start);
            }
        } else if !tag.self_closing {
            depth += 1;
        }
    }
    None
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Visible text of `html` with whitespace collapsed.
#[cfg(test)]
pub(crate) fn text_content(html: &str) -> String {
    let mut text = String::new();
    let mut pos = 0;
    while let Some(tag) = next_tag(html, pos) {
        text.push_str(&html[pos..tag.start]);
        text.push(' ');
        pos = tag.end;
    }
    text.push_str(&html[pos..]);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Inner markup of the first element matching `selector`.
#[cfg(test)]
pub(crate) fn inner_html<'a>(html: &'a str, selector: &str) -> Option<&'a str> {
    let element = find_element(html, &selector_classes(selector))?;
    Some(&html[element.inner_start..element.inner_end])
}
