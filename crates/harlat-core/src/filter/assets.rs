//! Static-asset heuristics.
//!
//! These are loose substring/suffix checks over the raw URL string, not URL
//! path parsing. Capture URLs carry CDN prefixes, content hashes and query
//! strings, and a permissive match catches them where a strict parser would
//! not. False positives such as `/api/assets/` are a known property of the
//! heuristic.

/// URL schemes of long-lived connections, excluded from every aggregate
pub const STREAMING_SCHEMES: &[&str] = &["ws://", "wss://"];

pub const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".webp", ".ico", ".svg"];
pub const CODE_EXTENSIONS: &[&str] = &[".css", ".js"];
pub const FONT_EXTENSIONS: &[&str] = &[".woff", ".woff2", ".ttf", ".eot", ".otf"];
pub const MEDIA_EXTENSIONS: &[&str] = &[".mp3", ".mp4", ".avi", ".mov", ".wmv", ".flv"];
pub const ARCHIVE_EXTENSIONS: &[&str] = &[".pdf", ".zip", ".rar", ".tar", ".gz"];

/// Path fragments that mark static-resource directories
pub const ASSET_PATH_MARKERS: &[&str] = &[
    "/css/",
    "/js/",
    "/svg/",
    "/images/",
    "/img/",
    "/assets/",
    "/static/",
    "/fonts/",
    "/media/",
    "_next/static",
];

/// Check whether a URL uses a streaming/socket scheme (case-sensitive)
pub fn is_streaming(url: &str) -> bool {
    STREAMING_SCHEMES
        .iter()
        .any(|scheme| url.starts_with(scheme))
}

/// Check whether a URL looks like a static asset
pub fn is_static_asset(url: &str) -> bool {
    has_asset_extension(url) || has_asset_path(url)
}

fn asset_extensions() -> impl Iterator<Item = &'static str> {
    IMAGE_EXTENSIONS
        .iter()
        .chain(CODE_EXTENSIONS)
        .chain(FONT_EXTENSIONS)
        .chain(MEDIA_EXTENSIONS)
        .chain(ARCHIVE_EXTENSIONS)
        .copied()
}

/// Extension at the very end, or directly followed by a query string
fn has_asset_extension(url: &str) -> bool {
    asset_extensions().any(|ext| {
        url.ends_with(ext)
            || url
                .match_indices(ext)
                .any(|(idx, _)| url[idx + ext.len()..].starts_with('?'))
    })
}

fn has_asset_path(url: &str) -> bool {
    ASSET_PATH_MARKERS.iter().any(|marker| url.contains(marker))
}
