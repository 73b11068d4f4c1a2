use once_cell::sync::Lazy;

/// One known-automation marker. Patterns are matched as lowercase substrings
/// of the declared User-Agent, in table order; the first hit wins and its
/// label is what shows up in logs and events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignaturePattern {
    pub pattern: String,
    pub label: String,
}

impl SignaturePattern {
    fn new(pattern: &str, label: &str) -> Self {
        Self {
            pattern: pattern.to_lowercase(),
            label: label.to_string(),
        }
    }
}

/// Built-in table, ordered. Appending config extras never reorders these.
static BUILTIN_SIGNATURES: Lazy<Vec<SignaturePattern>> = Lazy::new(|| {
    vec![
        // Command-line HTTP clients
        SignaturePattern::new("curl", "curl"),
        SignaturePattern::new("wget", "wget"),
        SignaturePattern::new("httpie", "httpie"),
        // Scripted HTTP libraries
        SignaturePattern::new("python-requests", "python-requests"),
        SignaturePattern::new("python-urllib", "python-urllib"),
        SignaturePattern::new("aiohttp", "aiohttp"),
        SignaturePattern::new("go-http-client", "go-http-client"),
        SignaturePattern::new("okhttp", "okhttp"),
        SignaturePattern::new("libwww-perl", "libwww-perl"),
        SignaturePattern::new("java/", "java-httpclient"),
        SignaturePattern::new("node-fetch", "node-fetch"),
        SignaturePattern::new("axios", "axios"),
        // Crawling frameworks
        SignaturePattern::new("scrapy", "scrapy"),
        // Headless browsers and automation frameworks
        SignaturePattern::new("headlesschrome", "headless-chrome"),
        SignaturePattern::new("phantomjs", "phantomjs"),
        SignaturePattern::new("selenium", "selenium"),
        SignaturePattern::new("webdriver", "webdriver"),
        SignaturePattern::new("playwright", "playwright"),
        SignaturePattern::new("puppeteer", "puppeteer"),
        // Generic markers, last so specific labels win
        SignaturePattern::new("bot", "generic-bot"),
        SignaturePattern::new("spider", "generic-spider"),
        SignaturePattern::new("crawler", "generic-crawler"),
    ]
});

/// Outcome of classifying a declared client identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<'a> {
    /// The UA matched a known-automation pattern.
    AutomatedSignature(&'a SignaturePattern),
    /// No UA at all, an automation signal of its own.
    AutomatedAbsent,
    /// Nothing recognized; treat as human.
    HumanLikely,
}

/// The full, ordered pattern table: built-ins followed by config extras.
pub fn signature_table(extra: &[String]) -> Vec<SignaturePattern> {
    let mut table = BUILTIN_SIGNATURES.clone();
    for pattern in extra {
        table.push(SignaturePattern::new(pattern, pattern));
    }
    table
}

/// Pure classification of a declared client-identity string. Malformed or
/// unrecognized values fall through to `HumanLikely`; only the empty string
/// is `AutomatedAbsent`.
pub fn classify<'a>(ua: &str, table: &'a [SignaturePattern]) -> Classification<'a> {
    if ua.is_empty() {
        return Classification::AutomatedAbsent;
    }
    let ua_lower = ua.to_lowercase();
    for sig in table {
        if ua_lower.contains(&sig.pattern) {
            return Classification::AutomatedSignature(sig);
        }
    }
    Classification::HumanLikely
}
