//! Classification of registry response bodies.
//!
//! The registry answers with an HTML fragment meant for a browser. Only two
//! sentences matter; anything else is indeterminate.

use returncheck_core::UpstreamResult;

/// Present when the container is registered. The apostrophe that follows
/// ("Ireland's") arrives in inconsistent encodings, so the marker stops
/// short of it.
pub const MEMBER_MARKER: &str = "Your drink container is part of Re-turn Ireland";

/// Present when the container is not registered.
pub const NON_MEMBER_MARKER: &str = "Not in Re-turn Scheme";

/// Classify a successful registry response body.
pub fn classify(body: &str) -> UpstreamResult {
    if body.contains(MEMBER_MARKER) {
        UpstreamResult::Matched
    } else if body.contains(NON_MEMBER_MARKER) {
        UpstreamResult::NotMatched
    } else {
        UpstreamResult::Indeterminate
    }
}
