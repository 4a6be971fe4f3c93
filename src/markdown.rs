//! Converts post bodies from Markdown to HTML.

use pulldown_cmark::{html, Event, Options, Parser, Tag};

/// Converts markdown to HTML, appending the result to `out`.
///
/// The headings in a post are demoted by one level to be subordinate to the
/// post title (h1), so `#` becomes h2. Headings never go below h6.
pub fn to_html(out: &mut String, markdown: &str) {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let events = Parser::new_ext(markdown, options).map(|ev| match ev {
        Event::Start(Tag::Heading(level)) => {
            Event::Start(Tag::Heading(demote(level)))
        }
        Event::End(Tag::Heading(level)) => {
            Event::End(Tag::Heading(demote(level)))
        }
        ev => ev,
    });
    html::push_html(out, events);
}

fn demote(level: u32) -> u32 {
    std::cmp::min(level + 1, 6)
}

#[cfg(test)]
mod test {
    use super::*;

    fn render(markdown: &str) -> String {
        let mut out = String::new();
        to_html(&mut out, markdown);
        out
    }

    #[test]
    fn test_headings_are_demoted() {
        assert_eq!("<h2>Intro</h2>\n", render("# Intro"));
        assert_eq!("<h6>Deep</h6>\n", render("###### Deep"));
    }

    #[test]
    fn test_extensions() {
        assert!(render("~~gone~~").contains("<del>gone</del>"));
        assert!(render("| a |\n|---|\n| b |\n").contains("<table>"));
        assert!(render("- [x] done").contains(r#"type="checkbox""#));
    }
}
