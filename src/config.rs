//! Loads the site [`Config`] from a `vellum.yaml` project file. Every project
//! setting has a default, so an empty project file is valid.

use crate::analytics::DEFAULT_TRACKING_ID;
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

/// The name of the project file.
pub const PROJECT_FILE: &str = "vellum.yaml";

/// The public URL of the site when the project file doesn't set one.
pub const DEFAULT_BASE_URL: &str = "https://ericventor.com";

/// The pages that aren't backed by posts, in sitemap order.
pub const DEFAULT_STATIC_ROUTES: [&str; 2] = ["/", "/about"];

#[derive(Deserialize)]
struct Project {
    #[serde(default = "default_base_url")]
    base_url: String,

    #[serde(default = "default_title")]
    title: String,

    #[serde(default = "default_tracking_id")]
    tracking_id: String,

    #[serde(default = "default_vercel_analytics")]
    vercel_analytics: bool,

    #[serde(default = "default_static_routes")]
    static_routes: Vec<String>,

    #[serde(default = "default_index_template")]
    index_template: PathBuf,

    #[serde(default = "default_post_template")]
    post_template: PathBuf,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_title() -> String {
    String::from("Eric Ventor")
}

fn default_tracking_id() -> String {
    DEFAULT_TRACKING_ID.to_owned()
}

fn default_vercel_analytics() -> bool {
    true
}

fn default_static_routes() -> Vec<String> {
    DEFAULT_STATIC_ROUTES.iter().map(|&r| r.to_owned()).collect()
}

fn default_index_template() -> PathBuf {
    PathBuf::from("theme/index.html")
}

fn default_post_template() -> PathBuf {
    PathBuf::from("theme/post.html")
}

/// The resolved configuration for a build. Relative paths from the project
/// file have been joined onto the project root.
#[derive(Clone, Debug)]
pub struct Config {
    /// The site title, made available to templates.
    pub title: String,

    /// The public URL of the site. Post slugs and static routes are appended
    /// to it to build sitemap URLs.
    pub base_url: Url,

    /// The analytics tracking identifier embedded in every page.
    pub tracking_id: String,

    /// Whether pages load the Vercel Web Analytics script.
    pub vercel_analytics: bool,

    /// The static routes listed in the sitemap after the posts.
    pub static_routes: Vec<String>,

    /// The directory holding standalone pages (e.g. `about.md`) and the
    /// `posts` directory.
    pub content_directory: PathBuf,

    /// The directory searched for post source files.
    pub posts_source_directory: PathBuf,

    /// The template for the home page.
    pub index_template: PathBuf,

    /// The template for post and standalone pages.
    pub post_template: PathBuf,

    /// The directory the site is rendered into.
    pub root_output_directory: PathBuf,
}

impl Config {
    /// Searches `dir` and its ancestors for a `vellum.yaml` project file and
    /// loads the first one found. If `output_directory` is `None`, the site
    /// is rendered into `_site` under the project root.
    pub fn from_directory(
        dir: &Path,
        output_directory: Option<&Path>,
    ) -> Result<Config> {
        for ancestor in dir.ancestors() {
            let path = ancestor.join(PROJECT_FILE);
            if path.is_file() {
                return Config::from_project_file(&path, output_directory)
                    .map_err(|e| {
                        Error::Annotated(
                            format!("loading `{}`", path.display()),
                            Box::new(e),
                        )
                    });
            }
        }
        Err(Error::MissingProjectFile(dir.to_owned()))
    }

    /// Loads the project file at `path`. See [`Config::from_directory`].
    pub fn from_project_file(
        path: &Path,
        output_directory: Option<&Path>,
    ) -> Result<Config> {
        let file = File::open(path).map_err(|err| Error::OpenProjectFile {
            path: path.to_owned(),
            err,
        })?;
        // An empty file deserializes as YAML null rather than an empty
        // mapping.
        let project: Option<Project> = serde_yaml::from_reader(file)?;
        let project = match project {
            Some(project) => project,
            None => serde_yaml::from_str("{}")?,
        };
        let project_root = match path.parent() {
            Some(root) => root,
            None => return Err(Error::MissingProjectFile(path.to_owned())),
        };
        Config::from_project(project, project_root, output_directory)
    }

    fn from_project(
        project: Project,
        project_root: &Path,
        output_directory: Option<&Path>,
    ) -> Result<Config> {
        let content_directory = project_root.join("content");
        Ok(Config {
            title: project.title,
            base_url: Url::parse(&project.base_url)?,
            tracking_id: project.tracking_id,
            vercel_analytics: project.vercel_analytics,
            static_routes: project.static_routes,
            posts_source_directory: content_directory.join("posts"),
            content_directory,
            index_template: project_root.join(project.index_template),
            post_template: project_root.join(project.post_template),
            root_output_directory: match output_directory {
                Some(dir) => dir.to_owned(),
                None => project_root.join("_site"),
            },
        })
    }
}

/// The result of loading a [`Config`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading the project configuration.
#[derive(Debug)]
pub enum Error {
    /// Returned when no project file exists in the directory or any of its
    /// ancestors.
    MissingProjectFile(PathBuf),

    /// Returned for I/O problems opening the project file.
    OpenProjectFile { path: PathBuf, err: std::io::Error },

    /// Returned when the project file isn't valid YAML or has the wrong
    /// shape.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when `base_url` isn't an absolute URL.
    UrlParse(url::ParseError),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingProjectFile(dir) => write!(
                f,
                "could not find `{}` in `{}` or any parent directory",
                PROJECT_FILE,
                dir.display()
            ),
            Error::OpenProjectFile { path, err } => {
                write!(f, "opening project file '{}': {}", path.display(), err)
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::UrlParse(err) => write!(f, "parsing `base_url`: {}", err),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingProjectFile(_) => None,
            Error::OpenProjectFile { path: _, err } => Some(err),
            Error::DeserializeYaml(err) => Some(err),
            Error::UrlParse(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts a [`url::ParseError`] into an [`Error`].
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn project(yaml: &str) -> Result<Config> {
        let project: Project = serde_yaml::from_str(yaml)?;
        Config::from_project(project, Path::new("/srv/blog"), None)
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let config = project("{}")?;
        assert_eq!("https://ericventor.com/", config.base_url.as_str());
        assert_eq!(DEFAULT_TRACKING_ID, config.tracking_id);
        assert!(config.vercel_analytics);
        assert_eq!(vec!["/", "/about"], config.static_routes);
        assert_eq!(
            PathBuf::from("/srv/blog/content/posts"),
            config.posts_source_directory
        );
        assert_eq!(
            PathBuf::from("/srv/blog/theme/index.html"),
            config.index_template
        );
        assert_eq!(PathBuf::from("/srv/blog/_site"), config.root_output_directory);
        Ok(())
    }

    #[test]
    fn test_overrides() -> Result<()> {
        let config = project(
            "base_url: https://example.org/blog/\n\
             tracking_id: G-TEST\n\
             vercel_analytics: false\n\
             static_routes: [/, /contact]\n\
             post_template: layouts/post.html\n",
        )?;
        assert_eq!("https://example.org/blog/", config.base_url.as_str());
        assert_eq!("G-TEST", config.tracking_id);
        assert!(!config.vercel_analytics);
        assert_eq!(vec!["/", "/contact"], config.static_routes);
        assert_eq!(
            PathBuf::from("/srv/blog/layouts/post.html"),
            config.post_template
        );
        Ok(())
    }

    #[test]
    fn test_invalid_base_url() {
        match project("base_url: not a url") {
            Err(Error::UrlParse(_)) => {}
            other => panic!("expected a URL parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_directory_searches_ancestors() -> Result<()> {
        let nested = Path::new("./testdata/site/content/posts");
        let config = Config::from_directory(nested, Some(Path::new("/tmp/out")))?;
        assert_eq!("Test Blog", config.title);
        assert_eq!("G-TESTDATA", config.tracking_id);
        assert_eq!(PathBuf::from("/tmp/out"), config.root_output_directory);
        assert!(config.posts_source_directory.ends_with("site/content/posts"));
        Ok(())
    }
}
