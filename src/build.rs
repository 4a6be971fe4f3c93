//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site: parsing the posts
//! ([`crate::parser`]), listing them on the home page ([`crate::listing`]),
//! rendering pages ([`crate::write`]), and generating the sitemap
//! ([`crate::sitemap`]).

use crate::analytics::Analytics;
use crate::config::Config;
use crate::date::Timestamp;
use crate::listing::list_posts;
use crate::parser::{Error as ParseError, Parser as PostParser};
use crate::post::Post;
use crate::sitemap::{page_url, sitemap_entries, write_sitemap, SitemapEntry};
use crate::write::{parse_template, Error as WriteError, Writer};
use chrono::{DateTime, Utc};
use gtmpl::Template;
use log::{info, warn};
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// The name of the sitemap file in the output directory.
pub const SITEMAP_FILE: &str = "sitemap.xml";

/// Builds the site from a [`Config`] object. `generated_at` is recorded as
/// the last-modified time of every static route in the sitemap; callers
/// normally pass [`Utc::now`].
pub fn build_site(config: &Config, generated_at: DateTime<Utc>) -> Result<()> {
    let parser = PostParser::new(&config.content_directory);

    // collect all posts and standalone pages
    let posts = parser.parse_posts(&config.posts_source_directory)?;
    let pages = parser.parse_pages()?;
    warn_invalid_dates(&posts);

    // Parse the template files.
    let index_template = load_template(&config.index_template)?;
    let post_template = load_template(&config.post_template)?;

    clean_site(config)?;

    let home_page = page_url(&config.base_url, "/");
    let analytics = Analytics::new(&config.tracking_id)
        .with_vercel_insights(config.vercel_analytics);
    let writer = Writer {
        index_template: &index_template,
        post_template: &post_template,
        output_directory: &config.root_output_directory,
        title: &config.title,
        home_page: &home_page,
        analytics: &analytics,
    };
    writer.write_index(&list_posts(&posts))?;
    writer.write_posts(&posts)?;
    writer.write_posts(&pages)?;

    // The sitemap lists posts in repository order, not display order.
    let entries = sitemap_entries(
        &posts,
        &config.base_url,
        &config.static_routes,
        generated_at,
    );
    let sitemap_path = config.root_output_directory.join(SITEMAP_FILE);
    write_sitemap_file(&sitemap_path, &entries).map_err(|err| {
        Error::WriteSitemap {
            path: sitemap_path.clone(),
            err,
        }
    })?;

    info!(
        "Built {} posts, {} pages and {} sitemap entries into `{}`",
        posts.len(),
        pages.len(),
        entries.len(),
        config.root_output_directory.display()
    );
    Ok(())
}

/// Removes the output directory. A missing directory is not an error.
pub fn clean_site(config: &Config) -> Result<()> {
    rmdir(&config.root_output_directory)
}

fn write_sitemap_file(path: &Path, entries: &[SitemapEntry]) -> io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    write_sitemap(entries, &mut w)?;
    w.flush()
}

fn warn_invalid_dates(posts: &[Post]) {
    for post in posts {
        if let Some(date) = &post.date {
            if !Timestamp::parse(date).is_valid() {
                warn!(
                    "Post `{}` has an unparseable date `{}`; it is listed last",
                    post.id, date
                );
            }
        }
    }
}

// Loads a template file and parses it into a template.
fn load_template(path: &Path) -> Result<Template> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| Error::OpenTemplateFile {
            path: path.to_owned(),
            err: e,
        })?;
    Ok(parse_template(&contents)?)
}

fn rmdir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(x) => Ok(x),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Ok(()),
            _ => Err(Error::Clean {
                path: dir.to_owned(),
                err: e,
            }),
        },
    }
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during parsing, writing,
/// cleaning output directories, loading template files, and writing the
/// sitemap.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors during parsing.
    Parse(ParseError),

    /// Returned for errors templating or writing pages.
    Write(WriteError),

    /// Returned for I/O problems while cleaning the output directory.
    Clean { path: PathBuf, err: std::io::Error },

    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for I/O problems while writing the sitemap.
    WriteSitemap { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Clean { path, err } => {
                write!(f, "Cleaning directory '{}': {}", path.display(), err)
            }
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::WriteSitemap { path, err } => {
                write!(f, "Writing sitemap '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Clean { path: _, err } => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::WriteSitemap { path: _, err } => Some(err),
        }
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}
