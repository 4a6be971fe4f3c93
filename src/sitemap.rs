//! Maps posts and static routes into [`SitemapEntry`]s and serializes them
//! as a `sitemap.xml` document.

use crate::post::Post;
use chrono::{DateTime, SecondsFormat, Utc};
use html_escape::encode_text;
use std::io::{self, Write};
use url::Url;

/// The `lastmod` value for a [`SitemapEntry`].
#[derive(Clone, Debug, PartialEq)]
pub enum LastModified {
    /// A post's date exactly as written in its source. Crawlers do their own
    /// parsing, so it isn't validated or reformatted.
    Verbatim(String),

    /// The time the sitemap was generated. Static routes carry this rather
    /// than a content-modification time, so it changes on every build.
    Generated(DateTime<Utc>),
}

impl LastModified {
    /// Renders the value for a `<lastmod>` element. Generated timestamps are
    /// RFC 3339 in UTC with millisecond precision.
    pub fn render(&self) -> String {
        match self {
            LastModified::Verbatim(date) => date.clone(),
            LastModified::Generated(dt) => {
                dt.to_rfc3339_opts(SecondsFormat::Millis, true)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: Option<LastModified>,
}

/// Builds the sitemap entries for a site: one per post, in the order given
/// (no re-sort), followed by one per static route in declared order. Post
/// entries carry the post's date verbatim (or nothing if the post has none);
/// static routes carry `generated_at`.
pub fn sitemap_entries<S: AsRef<str>>(
    posts: &[Post],
    base_url: &Url,
    static_routes: &[S],
    generated_at: DateTime<Utc>,
) -> Vec<SitemapEntry> {
    let posts = posts.iter().map(|post| SitemapEntry {
        url: page_url(base_url, &post.slug),
        last_modified: post.date.clone().map(LastModified::Verbatim),
    });
    let routes = static_routes.iter().map(|route| SitemapEntry {
        url: page_url(base_url, route.as_ref()),
        last_modified: Some(LastModified::Generated(generated_at)),
    });
    posts.chain(routes).collect()
}

/// Joins a site-relative path onto the base URL by concatenation, so
/// `/foo` under `https://example.com` is `https://example.com/foo`. The root
/// path `/` maps to the bare base URL.
pub fn page_url(base_url: &Url, path: &str) -> String {
    let base = base_url.as_str().trim_end_matches('/');
    match path {
        "" | "/" => base.to_owned(),
        _ if path.starts_with('/') => format!("{}{}", base, path),
        _ => format!("{}/{}", base, path),
    }
}

/// Writes `entries` to `w` as an XML `urlset` document. Entries without a
/// last-modified value have no `<lastmod>` element.
pub fn write_sitemap<W: Write>(
    entries: &[SitemapEntry],
    mut w: W,
) -> io::Result<()> {
    writeln!(w, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        w,
        r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#
    )?;
    for entry in entries {
        writeln!(w, "  <url>")?;
        writeln!(w, "    <loc>{}</loc>", encode_text(&entry.url))?;
        if let Some(last_modified) = &entry.last_modified {
            writeln!(
                w,
                "    <lastmod>{}</lastmod>",
                encode_text(&last_modified.render())
            )?;
        }
        writeln!(w, "  </url>")?;
    }
    writeln!(w, "</urlset>")?;
    Ok(())
}
