//! Brand logo resolution chain.
//!
//! Tried in order until one strategy yields an image: known-domain table,
//! logo-by-domain service, website HTML scan, favicon fallbacks. When every
//! network strategy fails the text model supplies a one-line description as
//! a degraded result. Each network step runs under a short timeout and a
//! failure only moves on to the next strategy.

use std::time::Duration;

use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::services::populate::client::ChatClient;
use crate::services::populate::prompts;
use crate::services::upload::looks_like_svg;

/// Famous instrument brands whose domains are known up front.
const KNOWN_DOMAINS: &[(&str, &str)] = &[
    ("fender", "fender.com"),
    ("gibson", "gibson.com"),
    ("yamaha", "yamaha.com"),
    ("roland", "roland.com"),
    ("korg", "korg.com"),
    ("ibanez", "ibanez.com"),
    ("taylor", "taylorguitars.com"),
    ("martin", "martinguitar.com"),
    ("prs", "prsguitars.com"),
    ("gretsch", "gretschguitars.com"),
    ("epiphone", "epiphone.com"),
    ("squier", "squierguitars.com"),
    ("selmer", "selmer.fr"),
    ("steinway", "steinway.com"),
    ("pearl", "pearldrum.com"),
    ("tama", "tama.com"),
    ("zildjian", "zildjian.com"),
    ("shure", "shure.com"),
    ("tagima", "tagima.com.br"),
    ("giannini", "giannini.com.br"),
];

/// Keywords that mark an `<img>` tag as a likely logo.
const LOGO_KEYWORDS: &[&str] = &["logo", "brand", "marca"];

/// Result of a resolution attempt.
pub enum LogoOutcome {
    /// A fetched image, ready to store.
    Image { data: Vec<u8>, ext: &'static str },
    /// Degraded result: a textual description from the model.
    Descricao(String),
    /// Nothing could be resolved at all.
    NotFound,
}

/// Network logo resolver shared by the population service.
#[derive(Clone)]
pub struct LogoResolver {
    http: reqwest::Client,
    max_bytes: usize,
}

impl LogoResolver {
    pub fn new(probe_timeout: Duration, max_bytes: usize) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(2))
            .timeout(probe_timeout)
            .build()
            .map_err(|e| {
                AppError::Configuration(format!("Failed to build logo HTTP client: {}", e))
            })?;

        Ok(Self { http, max_bytes })
    }

    /// Run the full chain for one brand.
    pub async fn resolve(
        &self,
        nome: &str,
        website: Option<&str>,
        chat: &ChatClient,
    ) -> LogoOutcome {
        let domain = domain_for(nome, website);

        if let Some(image) = self.try_clearbit(&domain).await {
            return image;
        }

        let site_url = website
            .map(|w| w.to_string())
            .unwrap_or_else(|| format!("https://{}", domain));
        if let Some(image) = self.scan_website(&site_url).await {
            return image;
        }

        if let Some(image) = self.try_favicons(&site_url).await {
            return image;
        }

        debug!("No logo image found for '{}', asking for a description", nome);
        match chat.complete(&prompts::logo_descricao_prompt(nome)).await {
            Ok(text) if !text.trim().is_empty() => {
                LogoOutcome::Descricao(text.trim().to_string())
            }
            Ok(_) => LogoOutcome::NotFound,
            Err(e) => {
                debug!("Logo description fallback failed for '{}': {}", nome, e);
                LogoOutcome::NotFound
            }
        }
    }

    /// Probe the logo-by-domain service with HEAD, then fetch.
    async fn try_clearbit(&self, domain: &str) -> Option<LogoOutcome> {
        let url = format!("https://logo.clearbit.com/{}", urlencoding::encode(domain));

        match self.http.head(&url).send().await {
            Ok(resp) if resp.status().is_success() => {}
            Ok(resp) => {
                debug!("Logo service returned {} for {}", resp.status(), domain);
                return None;
            }
            Err(e) => {
                debug!("Logo service probe failed for {}: {}", domain, e);
                return None;
            }
        }

        self.fetch_image(&url).await
    }

    /// Fetch the brand website and scan the HTML for a logo candidate.
    async fn scan_website(&self, url: &str) -> Option<LogoOutcome> {
        let html = match self.http.get(url).send().await {
            Ok(resp) if resp.status().is_success() => resp.text().await.ok()?,
            Ok(resp) => {
                debug!("Website fetch returned {} for {}", resp.status(), url);
                return None;
            }
            Err(e) => {
                debug!("Website fetch failed for {}: {}", url, e);
                return None;
            }
        };

        if let Some(src) = find_og_image(&html).or_else(|| find_logo_img(&html)) {
            let absolute = absolutize(url, &src);
            if let Some(image) = self.fetch_image(&absolute).await {
                return Some(image);
            }
        }

        // An inline <svg> in the header is usable directly.
        if let Some(svg) = find_inline_svg(&html)
            && svg.len() <= self.max_bytes
        {
            return Some(LogoOutcome::Image {
                data: svg.into_bytes(),
                ext: "svg",
            });
        }

        None
    }

    /// Standard favicon locations, largest-first.
    async fn try_favicons(&self, site_url: &str) -> Option<LogoOutcome> {
        let base = base_url(site_url);
        for path in ["/apple-touch-icon.png", "/favicon.png", "/favicon.ico"] {
            let url = format!("{}{}", base, path);
            if let Some(image) = self.fetch_image(&url).await {
                return Some(image);
            }
        }
        None
    }

    /// Download a URL and keep it only if it is a recognizable image within
    /// the size cap.
    async fn fetch_image(&self, url: &str) -> Option<LogoOutcome> {
        let resp = match self.http.get(url).send().await {
            Ok(resp) if resp.status().is_success() => resp,
            Ok(resp) => {
                debug!("Image fetch returned {} for {}", resp.status(), url);
                return None;
            }
            Err(e) => {
                debug!("Image fetch failed for {}: {}", url, e);
                return None;
            }
        };

        let data = resp.bytes().await.ok()?.to_vec();
        if data.is_empty() || data.len() > self.max_bytes {
            return None;
        }

        if looks_like_svg(&data) {
            return Some(LogoOutcome::Image { data, ext: "svg" });
        }

        let ext = match image::guess_format(&data).ok()? {
            image::ImageFormat::Png => "png",
            image::ImageFormat::Jpeg => "jpg",
            image::ImageFormat::Gif => "gif",
            image::ImageFormat::WebP => "webp",
            image::ImageFormat::Ico => "ico",
            _ => return None,
        };

        Some(LogoOutcome::Image { data, ext })
    }
}

/// Domain for a brand: explicit website wins, then the known table, then a
/// `<slug>.com` guess.
fn domain_for(nome: &str, website: Option<&str>) -> String {
    if let Some(site) = website
        && let Some(host) = host_of(site)
    {
        return host;
    }

    let lower = nome.to_lowercase();
    for (key, domain) in KNOWN_DOMAINS {
        if lower.contains(key) {
            return domain.to_string();
        }
    }

    let slug: String = lower.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    format!("{}.com", slug)
}

fn host_of(url: &str) -> Option<String> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let host = rest.split('/').next()?.trim();
    if host.is_empty() {
        None
    } else {
        Some(host.trim_start_matches("www.").to_string())
    }
}

/// Scheme + host part of a URL, no trailing slash.
fn base_url(url: &str) -> String {
    let (scheme, rest) = match url.split_once("://") {
        Some((s, r)) => (s, r),
        None => ("https", url),
    };
    let host = rest.split('/').next().unwrap_or(rest);
    format!("{}://{}", scheme, host)
}

/// `og:image` / `og:logo` content attribute, if present.
fn find_og_image(html: &str) -> Option<String> {
    for marker in ["property=\"og:logo\"", "property=\"og:image\""] {
        if let Some(pos) = html.find(marker) {
            let tag_end = html[pos..].find('>').map(|e| pos + e)?;
            let tag = &html[html[..pos].rfind('<').unwrap_or(pos)..tag_end];
            if let Some(content) = attribute_value(tag, "content") {
                return Some(content);
            }
        }
    }
    None
}

/// First `<img>` whose src/alt/class carries a logo keyword.
fn find_logo_img(html: &str) -> Option<String> {
    let mut rest = html;
    while let Some(pos) = rest.find("<img") {
        let tag_end = rest[pos..].find('>')? + pos;
        let tag = &rest[pos..tag_end];
        let lower = tag.to_lowercase();
        if LOGO_KEYWORDS.iter().any(|k| lower.contains(k))
            && let Some(src) = attribute_value(tag, "src")
        {
            return Some(src);
        }
        rest = &rest[tag_end..];
    }
    None
}

/// First inline `<svg>...</svg>` block.
fn find_inline_svg(html: &str) -> Option<String> {
    let start = html.find("<svg")?;
    let end = html[start..].find("</svg>")? + start + "</svg>".len();
    Some(html[start..end].to_string())
}

fn attribute_value(tag: &str, name: &str) -> Option<String> {
    let marker = format!("{}=\"", name);
    let pos = tag.find(&marker)? + marker.len();
    let end = tag[pos..].find('"')? + pos;
    let value = tag[pos..end].trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Resolve a possibly-relative image URL against the page URL.
fn absolutize(page_url: &str, src: &str) -> String {
    if src.starts_with("http://") || src.starts_with("https://") {
        return src.to_string();
    }
    if let Some(rest) = src.strip_prefix("//") {
        return format!("https://{}", rest);
    }
    let base = base_url(page_url);
    if src.starts_with('/') {
        format!("{}{}", base, src)
    } else {
        format!("{}/{}", base, src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_prefers_website_host() {
        assert_eq!(
            domain_for("Fender", Some("https://www.fender.com/pt-BR")),
            "fender.com"
        );
    }

    #[test]
    fn domain_falls_back_to_known_table() {
        assert_eq!(domain_for("Gibson Guitars", None), "gibson.com");
    }

    #[test]
    fn domain_guesses_from_slug() {
        assert_eq!(domain_for("Some Obscure Brand", None), "someobscurebrand.com");
    }

    #[test]
    fn og_image_is_extracted() {
        let html = r#"<head><meta property="og:image" content="https://x.com/logo.png"></head>"#;
        assert_eq!(
            find_og_image(html).as_deref(),
            Some("https://x.com/logo.png")
        );
    }

    #[test]
    fn logo_img_matches_keywords() {
        let html = r#"<body><img src="/hero.jpg"><img class="site-logo" src="/img/logo.svg"></body>"#;
        assert_eq!(find_logo_img(html).as_deref(), Some("/img/logo.svg"));
    }

    #[test]
    fn inline_svg_is_captured() {
        let html = r#"<header><svg viewBox="0 0 10 10"><path d="M0 0"/></svg></header>"#;
        let svg = find_inline_svg(html).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn relative_urls_are_absolutized() {
        assert_eq!(
            absolutize("https://fender.com/about", "/img/logo.png"),
            "https://fender.com/img/logo.png"
        );
        assert_eq!(
            absolutize("https://fender.com", "//cdn.fender.com/l.png"),
            "https://cdn.fender.com/l.png"
        );
    }
}
