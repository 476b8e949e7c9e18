//! Build-pipeline driver for the CDN rewriter.
//!
//! Hook order, one build:
//!   1. config_resolved(public_dir)
//!   2. build_start()             single scan of public_dir/images
//!   3. transform_index_html()    per HTML document
//!      transform(code, id)       per module, stylesheets only
//!
//! Both transforms are no-ops when no CDN base is configured.

use crate::{
    cdn_rewriter::CdnRewriter,
    config::CdnConfig,
    error::AssessResult,
    image_index::ImageIndex,
};
use std::path::{Path, PathBuf};

pub const PLUGIN_NAME: &str = "cdn-prefix-images-existing";

/// Extensions handled by `transform`, compared case-insensitively.
pub const STYLESHEET_EXTENSIONS: &[&str] = &["css", "scss", "sass", "less", "styl"];

pub struct CdnImagePrefixer {
    config: CdnConfig,
    public_dir: PathBuf,
    rewriter: CdnRewriter,
}

impl CdnImagePrefixer {
    pub fn new(config: CdnConfig) -> AssessResult<Self> {
        let rewriter = CdnRewriter::new(&config, ImageIndex::new())?;
        Ok(Self {
            config,
            public_dir: PathBuf::new(),
            rewriter,
        })
    }

    pub fn from_env() -> AssessResult<Self> {
        Self::new(CdnConfig::from_env())
    }

    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    pub fn config_resolved(&mut self, public_dir: impl Into<PathBuf>) {
        self.public_dir = public_dir.into();
    }

    /// Scan the public images once. Later transforms only read the result.
    pub fn build_start(&mut self) -> AssessResult<()> {
        let images = ImageIndex::collect_from(self.public_dir());
        log::info!(
            "{}: {} known images, cdn {}",
            self.name(),
            images.file_count(),
            self.config.cdn_base.as_deref().unwrap_or("disabled")
        );
        self.rewriter = CdnRewriter::new(&self.config, images)?;
        Ok(())
    }

    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }

    pub fn rewriter(&self) -> &CdnRewriter {
        &self.rewriter
    }

    pub fn transform_index_html(&self, html: &str) -> String {
        self.rewriter.rewrite_html(html).into_owned()
    }

    /// Rewrite a stylesheet module. `None` means "leave the module alone":
    /// not a stylesheet, rewriting disabled, or nothing changed.
    pub fn transform(&self, code: &str, id: &str) -> Option<String> {
        if !self.rewriter.is_enabled() || !is_stylesheet(id) {
            return None;
        }
        let out = self.rewriter.rewrite_css_urls(code);
        if out == code {
            None
        } else {
            Some(out.into_owned())
        }
    }
}

pub fn is_stylesheet(id: &str) -> bool {
    Path::new(id)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            STYLESHEET_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}
