//! CDN rewriting of local image references in HTML and stylesheets.
//!
//! Only references that normalize to a known `/images/...` path are
//! rewritten. Anything absolute, unknown, or outside `images/` is left
//! exactly as written.

use crate::{config::CdnConfig, error::AssessResult, image_index::ImageIndex};
use regex::{Captures, Regex};
use std::borrow::Cow;

const ATTR_PATTERN: &str = r#"(src|href)\s*=\s*(?:"([^'"]+)"|'([^'"]+)')"#;
const SRCSET_PATTERN: &str = r#"(srcset)\s*=\s*(?:"([^'"]+)"|'([^'"]+)')"#;
const CSS_URL_PATTERN: &str = r#"url\((?:"([^'")]+)"|'([^'")]+)'|([^'")]+))\)"#;

/// `scheme://`, protocol-relative `//`, `data:` and `blob:` references.
pub fn is_absolute_ref(p: &str) -> bool {
    if p.starts_with("//") || p.starts_with("data:") || p.starts_with("blob:") {
        return true;
    }
    match p.split_once("://") {
        Some((scheme, _)) => !scheme.is_empty() && scheme.bytes().all(|b| b.is_ascii_alphabetic()),
        None => false,
    }
}

/// Canonical `/images/...` form of a reference.
///
/// Absolute references come back trimmed but otherwise unchanged.
/// Relative references lose leading `./` and `../` segments and one
/// leading `/`; if what remains is not under `images/` the raw input is
/// returned untouched.
pub fn normalize_ref(raw: &str) -> String {
    let trimmed = raw.trim();
    if is_absolute_ref(trimmed) {
        return trimmed.to_string();
    }

    let mut s = trimmed;
    while let Some(rest) = s.strip_prefix("./") {
        s = rest;
    }
    while let Some(rest) = s.strip_prefix("../") {
        s = rest;
    }
    let s = s.strip_prefix('/').unwrap_or(s);

    if !s.starts_with("images/") {
        return raw.to_string();
    }
    format!("/{s}")
}

pub struct CdnRewriter {
    /// Always ends in exactly one `/` when set.
    cdn_base: Option<String>,
    images: ImageIndex,
    debug: bool,
    attr_re: Regex,
    srcset_re: Regex,
    css_url_re: Regex,
}

impl CdnRewriter {
    pub fn new(config: &CdnConfig, images: ImageIndex) -> AssessResult<Self> {
        Ok(Self {
            cdn_base: config
                .cdn_base
                .as_deref()
                .map(|b| format!("{}/", b.trim_end_matches('/'))),
            images,
            debug: config.debug,
            attr_re: Regex::new(ATTR_PATTERN)?,
            srcset_re: Regex::new(SRCSET_PATTERN)?,
            css_url_re: Regex::new(CSS_URL_PATTERN)?,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.cdn_base.is_some()
    }

    pub fn images(&self) -> &ImageIndex {
        &self.images
    }

    /// Rewrite one reference. Returns `raw` unchanged when rewriting is
    /// disabled or the reference is not a known local image.
    pub fn to_cdn(&self, raw: &str) -> String {
        match self.cdn_base.as_deref() {
            Some(base) => self.rewrite_ref(raw, base),
            None => raw.to_string(),
        }
    }

    /// Rewrite `src`, `href` and `srcset` attribute values.
    pub fn rewrite_html<'a>(&self, html: &'a str) -> Cow<'a, str> {
        let Some(base) = self.cdn_base.as_deref() else {
            return Cow::Borrowed(html);
        };

        let attrs = self.attr_re.replace_all(html, |caps: &Captures| {
            let (quote, raw) = quoted(caps, 2);
            format!("{}={quote}{}{quote}", &caps[1], self.rewrite_ref(raw, base))
        });
        let srcsets = match self.srcset_re.replace_all(&attrs, |caps: &Captures| {
            let (quote, list) = quoted(caps, 2);
            format!("{}={quote}{}{quote}", &caps[1], self.rewrite_srcset(list, base))
        }) {
            Cow::Borrowed(_) => None,
            Cow::Owned(out) => Some(out),
        };

        match srcsets {
            Some(out) => Cow::Owned(out),
            None => attrs,
        }
    }

    /// Rewrite `url(...)` references, keeping their quote style.
    pub fn rewrite_css_urls<'a>(&self, code: &'a str) -> Cow<'a, str> {
        let Some(base) = self.cdn_base.as_deref() else {
            return Cow::Borrowed(code);
        };

        self.css_url_re.replace_all(code, |caps: &Captures| {
            let (quote, raw) = quoted(caps, 1);
            format!("url({quote}{}{quote})", self.rewrite_ref(raw, base))
        })
    }

    fn rewrite_ref(&self, raw: &str, base: &str) -> String {
        let normalized = normalize_ref(raw);
        if is_absolute_ref(&normalized) {
            return normalized;
        }
        if !normalized.starts_with("/images/") || !self.images.contains(&normalized) {
            return raw.to_string();
        }

        let out = format!("{base}{}", &normalized[1..]);
        if self.debug {
            log::info!("cdn: {raw} -> {out}");
        }
        out
    }

    /// Each comma-separated `url [descriptor]` candidate is rewritten on
    /// its own; only the first descriptor token is kept.
    fn rewrite_srcset(&self, list: &str, base: &str) -> String {
        list.split(',')
            .map(|candidate| {
                let mut tokens = candidate.split_whitespace();
                let url = self.rewrite_ref(tokens.next().unwrap_or(""), base);
                match tokens.next() {
                    Some(descriptor) => format!("{url} {descriptor}"),
                    None => url,
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The quote and the value of a match whose alternatives are
/// `"…"` at `first`, `'…'` at `first + 1`, and optionally bare at `first + 2`.
fn quoted<'h>(caps: &Captures<'h>, first: usize) -> (&'static str, &'h str) {
    if let Some(m) = caps.get(first) {
        ("\"", m.as_str())
    } else if let Some(m) = caps.get(first + 1) {
        ("'", m.as_str())
    } else {
        ("", caps.get(first + 2).map_or("", |m| m.as_str()))
    }
}
