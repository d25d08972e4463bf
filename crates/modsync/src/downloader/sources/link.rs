//! Download anchor detection on catalog listing pages
//!
//! A listing page carries two kinds of download links: one for the newest
//! file regardless of game version, and one per listed file that matches
//! the version filter. Only the second kind is safe to follow. The only
//! thing telling them apart is the set of CSS classes on the anchor, so the
//! matching rule lives behind [`AnchorMatcher`] and can be swapped when the
//! catalog's markup changes.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Classes carried by the version-specific download anchor
pub const DOWNLOAD_MARKER_CLASSES: [&str; 4] = ["button", "tip", "fa-icon-download", "icon-only"];

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("`a` is a valid CSS selector"));

/// Decides whether an anchor element is the download action to follow
pub trait AnchorMatcher: Send + Sync {
    fn is_download_anchor(&self, element: &ElementRef<'_>) -> bool;
}

/// Matches anchors whose `class` attribute contains every marker class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerClassMatcher {
    markers: HashSet<String>,
}

impl MarkerClassMatcher {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for MarkerClassMatcher {
    fn default() -> Self {
        Self::new(DOWNLOAD_MARKER_CLASSES)
    }
}

impl AnchorMatcher for MarkerClassMatcher {
    fn is_download_anchor(&self, element: &ElementRef<'_>) -> bool {
        let Some(class_attr) = element.value().attr("class") else {
            return false;
        };
        let classes: HashSet<&str> = class_attr.split_whitespace().collect();
        self.markers.iter().all(|marker| classes.contains(marker.as_str()))
    }
}

/// Finds the download link on a listing page
pub struct LinkResolver {
    matcher: Box<dyn AnchorMatcher>,
}

impl LinkResolver {
    pub fn new() -> Self {
        Self::with_matcher(MarkerClassMatcher::default())
    }

    pub fn with_matcher<M: AnchorMatcher + 'static>(matcher: M) -> Self {
        Self {
            matcher: Box::new(matcher),
        }
    }

    /// `href` of the first matching anchor in document order.
    ///
    /// Later matches are ignored. Matching anchors without an `href` are
    /// passed over.
    pub fn resolve_download_link(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let mut anchors = 0usize;

        for anchor in document.select(&ANCHOR_SELECTOR) {
            anchors += 1;
            if !self.matcher.is_download_anchor(&anchor) {
                continue;
            }
            match anchor.value().attr("href") {
                Some(href) if !href.trim().is_empty() => {
                    debug!("Matched download anchor #{}", anchors);
                    return Some(href.trim().to_string());
                }
                _ => trace!("Matching anchor #{} has no href", anchors),
            }
        }

        debug!("No download anchor among {} anchors", anchors);
        None
    }
}

impl Default for LinkResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LinkResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkResolver").finish_non_exhaustive()
    }
}
