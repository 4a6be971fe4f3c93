//! Templates and writes the site's HTML pages to disk: the home page with
//! the post listing, plus one page per post and per standalone page.

use crate::analytics::Analytics;
use crate::post::{Post, PostSummary};
use gtmpl::{Template, Value};
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Responsible for templating and writing HTML pages to disk.
pub struct Writer<'a> {
    /// The template for the home page.
    pub index_template: &'a Template,

    /// The template for post and standalone pages.
    pub post_template: &'a Template,

    /// The directory into which pages are written. A page with slug
    /// `/posts/foo` is written to `{output_directory}/posts/foo/index.html`.
    pub output_directory: &'a Path,

    /// The site title. This is made available to all templates as `title`.
    pub title: &'a str,

    /// The URL for the site's home page. This is made available to all
    /// templates as `home_page`, typically for the site-header link.
    pub home_page: &'a str,

    /// Renders the analytics scripts, made available to all templates as
    /// `analytics`.
    pub analytics: &'a Analytics,
}

impl Writer<'_> {
    /// Writes the home page from the (already ordered) post summaries.
    pub fn write_index(&self, summaries: &[PostSummary]) -> Result<()> {
        let page = Page {
            item: Value::Array(summaries.iter().map(Value::from).collect()),
            file_path: self.output_directory.join("index.html"),
            template: self.index_template,
        };
        self.write_page(&page)
    }

    /// Writes one page per post (or standalone page).
    pub fn write_posts(&self, posts: &[Post]) -> Result<()> {
        posts
            .iter()
            .map(|post| Page {
                item: post.to_value(),
                file_path: self.file_path(&post.slug),
                template: self.post_template,
            })
            .try_for_each(|page| self.write_page(&page))
    }

    fn file_path(&self, slug: &str) -> PathBuf {
        slug.split('/')
            .filter(|part| !part.is_empty())
            .fold(self.output_directory.to_owned(), |dir, part| dir.join(part))
            .join("index.html")
    }

    /// Takes a single [`Page`], templates it, and writes it to disk.
    fn write_page(&self, page: &Page) -> Result<()> {
        let mut value = page.to_value();
        if let Value::Object(obj) = &mut value {
            obj.insert("title".to_owned(), Value::String(self.title.to_owned()));
            obj.insert(
                "home_page".to_owned(),
                Value::String(self.home_page.to_owned()),
            );
            obj.insert(
                "analytics".to_owned(),
                Value::String(self.analytics.script_tags()),
            );
        }

        if let Some(dir) = page.file_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let context = gtmpl::Context::from(value)
            .map_err(|e| Error::Template(e.to_string()))?;
        page.template
            .execute(&mut std::fs::File::create(&page.file_path)?, &context)
            .map_err(|e| Error::Template(e.to_string()))?;
        debug!("Wrote `{}`", page.file_path.display());
        Ok(())
    }
}

/// An object representing an output HTML file. A [`Page`] can be converted
/// to a [`Value`] and thus rendered in a template via [`Page::to_value`].
struct Page<'a> {
    /// The main item for the page: a post, or the list of post summaries.
    item: Value,

    /// The target location on disk for the output file.
    file_path: PathBuf,

    /// The template with which the page will be rendered.
    template: &'a Template,
}

impl Page<'_> {
    /// Converts a [`Page`] into a [`Value::Object`] with the field `item`.
    fn to_value(&self) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("item".to_owned(), self.item.clone());
        Value::Object(m)
    }
}

/// Parses template source text into a [`Template`].
pub fn parse_template(contents: &str) -> Result<Template> {
    let mut template = Template::default();
    template
        .parse(contents)
        .map_err(|e| Error::Template(e.to_string()))?;
    Ok(template)
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error parsing or executing a template.
    Template(String),

    /// An error writing the output files.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => write!(f, "template: {}", err),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}
