//! The library code for the `vellum` static site generator, which renders a
//! personal blog. The architecture can be broken down into a few steps:
//!
//! 1. Parsing posts from Markdown source files on disk ([`crate::parser`])
//! 2. Ordering the posts for the home page and summarizing them
//!    ([`crate::listing`]), with dates formatted by [`crate::date`]
//! 3. Rendering the home page, post pages, and standalone pages to disk
//!    ([`crate::write`]), each carrying the analytics scripts
//!    ([`crate::analytics`])
//! 4. Generating `sitemap.xml` from the posts and the static routes
//!    ([`crate::sitemap`])
//!
//! [`crate::build::build_site`] runs all of them for a [`crate::config::Config`].
//! The listing, date, and sitemap steps are pure functions over already-parsed
//! [`crate::post::Post`]s, so they can be used without touching the disk.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod analytics;
pub mod build;
pub mod config;
pub mod date;
pub mod listing;
mod markdown;
pub mod parser;
pub mod post;
pub mod sitemap;
pub mod write;
