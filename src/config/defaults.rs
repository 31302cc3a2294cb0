//! Built-in defaults for the prerender middleware.

/// Rendering service used when nothing else is configured.
pub const DEFAULT_SERVICE_URL: &str = "http://service.prerender.io/";

/// Header carrying the rendering service token.
pub const X_PRERENDER_TOKEN: &str = "x-prerender-token";

/// Header set by Buffer's crawler in addition to its User-Agent.
pub const X_BUFFERBOT: &str = "x-bufferbot";

/// Legacy AJAX crawling query parameter.
pub const ESCAPED_FRAGMENT: &str = "_escaped_fragment_";

// googlebot, yahoo and bingbot are left out on purpose: they honor
// `_escaped_fragment_`, and matching them by User-Agent would look like
// cloaking to those engines.
pub const CRAWLER_USER_AGENTS: &[&str] = &[
    "baiduspider",
    "bufferbot",
    "developers.google.com/+/web/snippet",
    "embedly",
    "facebookexternalhit",
    "linkedinbot",
    "outbrain",
    "pinterest",
    "quora link preview",
    "rogerbot",
    "showyoubot",
    "slackbot",
    "twitterbot",
];

pub const EXTENSIONS_TO_IGNORE: &[&str] = &[
    ".ai", ".avi", ".css", ".dat", ".dmg", ".doc", ".exe", ".flv", ".gif", ".ico", ".iso",
    ".jpeg", ".jpg", ".js", ".less", ".m4a", ".m4v", ".mov", ".mp3", ".mp4", ".mpeg", ".mpg",
    ".pdf", ".png", ".ppt", ".psd", ".rar", ".rss", ".swf", ".tif", ".torrent", ".txt", ".wav",
    ".wmv", ".xls", ".xml", ".zip",
];

pub fn crawler_user_agents() -> Vec<String> {
    CRAWLER_USER_AGENTS.iter().map(|s| s.to_string()).collect()
}

pub fn extensions_to_ignore() -> Vec<String> {
    EXTENSIONS_TO_IGNORE.iter().map(|s| s.to_string()).collect()
}
