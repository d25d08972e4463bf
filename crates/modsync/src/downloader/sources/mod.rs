//! Download source implementations
//!
//! - [`curseforge`]: two-step listing page + redirect fetch
//! - [`link`]: download anchor detection used by the listing step

pub mod curseforge;
pub mod link;

pub use curseforge::CurseForgeSource;
pub use link::{AnchorMatcher, LinkResolver, MarkerClassMatcher, DOWNLOAD_MARKER_CLASSES};
