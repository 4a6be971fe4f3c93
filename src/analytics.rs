//! Renders the script tags that load Vercel Web Analytics and Google
//! Analytics on every page. Nothing is read back from either tracker; load
//! failures are left to the browser.

use html_escape::encode_double_quoted_attribute;

/// The tracking identifier used when the project file doesn't set one.
pub const DEFAULT_TRACKING_ID: &str = "G-5YSEFPTG53";

const GTAG_URL: &str = "https://www.googletagmanager.com/gtag/js";

/// The site-relative path Vercel serves its insights script from.
pub const VERCEL_INSIGHTS_SCRIPT: &str = "/_vercel/insights/script.js";

#[derive(Clone, Debug, PartialEq)]
pub struct Analytics {
    tracking_id: String,
    vercel_insights: bool,
}

impl Analytics {
    /// Creates the Google Analytics tags for `tracking_id`. The Vercel
    /// insights script is included unless disabled with
    /// [`Analytics::with_vercel_insights`].
    pub fn new(tracking_id: &str) -> Analytics {
        Analytics {
            tracking_id: tracking_id.to_owned(),
            vercel_insights: true,
        }
    }

    pub fn with_vercel_insights(mut self, enabled: bool) -> Analytics {
        self.vercel_insights = enabled;
        self
    }

    pub fn tracking_id(&self) -> &str {
        &self.tracking_id
    }

    /// Returns the HTML for the Vercel insights script (if enabled), the
    /// `gtag` loader script, and the inline `gtag` bootstrap configured with
    /// the tracking identifier. The result is meant to be dropped into the
    /// `<head>` of each page unescaped.
    pub fn script_tags(&self) -> String {
        let mut tags = String::new();
        if self.vercel_insights {
            tags.push_str(&format!(
                "<script defer src=\"{}\"></script>\n",
                VERCEL_INSIGHTS_SCRIPT
            ));
        }

        let id = url::form_urlencoded::byte_serialize(
            self.tracking_id.as_bytes(),
        )
        .collect::<String>();
        let src = format!("{}?id={}", GTAG_URL, id);
        tags.push_str(&format!(
            concat!(
                r#"<script async src="{src}"></script>"#,
                "\n",
                r#"<script id="google-analytics">"#,
                "\n",
                "  window.dataLayer = window.dataLayer || [];\n",
                "  function gtag(){{dataLayer.push(arguments);}}\n",
                "  gtag('js', new Date());\n",
                "  gtag('config', '{raw}');\n",
                "</script>",
            ),
            src = encode_double_quoted_attribute(&src),
            raw = js_string_contents(&self.tracking_id),
        ));
        tags
    }
}

impl Default for Analytics {
    fn default() -> Self {
        Analytics::new(DEFAULT_TRACKING_ID)
    }
}

// Escapes `s` for a single-quoted JavaScript string inside an inline
// `<script>` element, which must not contain a literal `<`.
fn js_string_contents(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '<' => escaped.push_str("\\x3c"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_tracking_id() {
        let tags = Analytics::default().script_tags();
        assert!(tags.contains(
            r#"src="https://www.googletagmanager.com/gtag/js?id=G-5YSEFPTG53""#
        ));
        assert!(tags.contains("gtag('config', 'G-5YSEFPTG53');"));
        assert!(tags.contains("function gtag(){dataLayer.push(arguments);}"));
    }

    #[test]
    fn test_substituted_tracking_id() {
        let analytics = Analytics::new("G-TEST");
        assert_eq!("G-TEST", analytics.tracking_id());
        let tags = analytics.script_tags();
        assert!(tags.contains("?id=G-TEST\""));
        assert!(tags.contains("gtag('config', 'G-TEST');"));
        assert!(!tags.contains(DEFAULT_TRACKING_ID));
    }

    #[test]
    fn test_vercel_insights_enabled_by_default() {
        let tags = Analytics::default().script_tags();
        assert!(tags.starts_with(
            r#"<script defer src="/_vercel/insights/script.js"></script>"#
        ));
        assert_eq!(3, tags.matches("</script>").count());
    }

    #[test]
    fn test_vercel_insights_disabled() {
        let tags = Analytics::default()
            .with_vercel_insights(false)
            .script_tags();
        assert!(!tags.contains(VERCEL_INSIGHTS_SCRIPT));
        assert_eq!(2, tags.matches("</script>").count());
        assert!(tags.contains("gtag('config', 'G-5YSEFPTG53');"));
    }

    #[test]
    fn test_tracking_id_is_escaped() {
        let tags = Analytics::new("a&b'c").script_tags();
        assert!(tags.contains("?id=a%26b%27c\""));
        assert!(tags.contains(r"gtag('config', 'a&b\'c');"));
    }

    #[test]
    fn test_tracking_id_cannot_close_inline_script() {
        let tags = Analytics::new("x</script><b>")
            .with_vercel_insights(false)
            .script_tags();
        assert!(tags.contains(r"gtag('config', 'x\x3c/script>\x3cb>');"));
        // Only the two tags we emit are closed.
        assert_eq!(2, tags.matches("</script>").count());
    }
}
