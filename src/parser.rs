//! Defines the [`Parser`] and [`Error`] types, which load [`Post`]s from
//! Markdown source files on disk.

use std::{
    fmt,
    fs::{read_dir, File},
    path::{Component, Path, PathBuf},
};

use log::debug;
use serde::Deserialize;
use walkdir::WalkDir;

use crate::{markdown, post::Post};

const MARKDOWN_EXTENSION: &str = "md";

/// Parses [`Post`] objects from source files. Post IDs are the source paths
/// relative to the content directory, and slugs are the IDs without the
/// extension and with a leading `/` (e.g. `{content_directory}/posts/foo.md`
/// has ID `posts/foo.md` and slug `/posts/foo`).
pub struct Parser<'a> {
    content_directory: &'a Path,
}

impl<'a> Parser<'a> {
    pub fn new(content_directory: &'a Path) -> Parser<'a> {
        Parser { content_directory }
    }

    /// Searches `posts_directory` (recursively) for post files (extension =
    /// `.md`) and returns the parsed posts ordered by ID. A missing directory
    /// yields no posts. Each post file must be structured as follows:
    ///
    /// 1. Initial frontmatter fence (`---`)
    /// 2. YAML frontmatter with the field `title` and optionally `date` and
    ///    `description`
    /// 3. Terminal frontmatter fence (`---`)
    /// 4. Post body
    ///
    /// For example:
    ///
    /// ```md
    /// ---
    /// title: Hello, world!
    /// date: 2024-01-05
    /// description: A first post.
    /// ---
    /// # Hello
    ///
    /// World
    /// ```
    pub fn parse_posts(&self, posts_directory: &Path) -> Result<Vec<Post>> {
        if !posts_directory.is_dir() {
            debug!("No posts directory at `{}`", posts_directory.display());
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();
        for result in WalkDir::new(posts_directory) {
            let entry = result?;
            if entry.file_type().is_file() && is_markdown(entry.path()) {
                posts.push(self.parse_post(entry.path())?);
            }
        }
        posts.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(posts)
    }

    /// Parses the standalone pages: the `.md` files directly inside the
    /// content directory (e.g. `about.md`, whose slug is `/about`). The
    /// format is the same as for posts. Pages are ordered by ID.
    pub fn parse_pages(&self) -> Result<Vec<Post>> {
        if !self.content_directory.is_dir() {
            return Ok(Vec::new());
        }

        let mut pages = Vec::new();
        for result in read_dir(self.content_directory)? {
            let entry = result?;
            if entry.file_type()?.is_file() && is_markdown(&entry.path()) {
                pages.push(self.parse_post(&entry.path())?);
            }
        }
        pages.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(pages)
    }

    /// Parses a single [`Post`] from the source file at `path`, which must
    /// be inside the content directory.
    pub fn parse_post(&self, path: &Path) -> Result<Post> {
        self._parse_post(path).map_err(|e| {
            Error::Annotated(
                format!("parsing post `{}`", path.display()),
                Box::new(e),
            )
        })
    }

    fn _parse_post(&self, path: &Path) -> Result<Post> {
        fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
            const FENCE: &str = "---";
            if !input.starts_with(FENCE) {
                return Err(Error::FrontmatterMissingStartFence);
            }
            match input[FENCE.len()..].find(FENCE) {
                None => Err(Error::FrontmatterMissingEndFence),
                Some(offset) => Ok((
                    FENCE.len(),                        // yaml_start
                    FENCE.len() + offset,               // yaml_stop
                    FENCE.len() + offset + FENCE.len(), // body_start
                )),
            }
        }

        let id = self.id(path)?;

        use std::io::Read;
        let mut contents = String::new();
        File::open(path)?.read_to_string(&mut contents)?;
        let input: &str = &contents;

        let (yaml_start, yaml_stop, body_start) = frontmatter_indices(input)?;
        let frontmatter: Frontmatter =
            serde_yaml::from_str(&input[yaml_start..yaml_stop])?;

        let mut post = Post {
            slug: format!("/{}", id.strip_suffix(".md").unwrap_or(&id)),
            id,
            title: frontmatter.title,
            date: frontmatter.date,
            description: frontmatter.description,
            body: String::default(),
        };
        markdown::to_html(&mut post.body, &input[body_start..]);

        debug!("Parsed `{}` as `{}`", post.id, post.slug);
        Ok(post)
    }

    // Joins the components of the content-relative path with `/` regardless
    // of platform so IDs and slugs are stable.
    fn id(&self, path: &Path) -> Result<String> {
        let invalid = || InvalidFileNameError(path.to_owned());
        let relative = path
            .strip_prefix(self.content_directory)
            .map_err(|_| invalid())?;
        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    parts.push(part.to_str().ok_or_else(invalid)?)
                }
                _ => return Err(invalid().into()),
            }
        }
        Ok(parts.join("/"))
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == MARKDOWN_EXTENSION)
}

#[derive(Deserialize, Clone)]
struct Frontmatter {
    /// The title of the post.
    title: String,

    /// The date of the post, kept as written.
    #[serde(default)]
    date: Option<String>,

    /// A short description of the post.
    #[serde(default)]
    description: Option<String>,
}

/// Returned when a source path can't be turned into a post ID.
#[derive(Debug)]
pub struct InvalidFileNameError(PathBuf);

impl fmt::Display for InvalidFileNameError {
    /// Displays an [`InvalidFileNameError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid file name: {:?}", &self.0)
    }
}

impl std::error::Error for InvalidFileNameError {
    /// Implements the [`std::error::Error`] trait for [`InvalidFileNameError`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Post`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when a post source file is missing its starting frontmatter
    /// fence (`---`).
    FrontmatterMissingStartFence,

    /// Returned when a post source file is missing its terminal frontmatter
    /// fence (`---` i.e., the starting fence was found but the ending one was
    /// missing).
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the frontmatter as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// Returned for WalkDir I/O errors.
    WalkDir(walkdir::Error),

    /// Returned when a source path isn't valid UTF-8 or isn't inside the
    /// content directory.
    InvalidFileName(InvalidFileNameError),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "Post must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::InvalidFileName(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::InvalidFileName(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<InvalidFileNameError> for Error {
    fn from(err: InvalidFileNameError) -> Error {
        Error::InvalidFileName(err)
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for directory walks.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
