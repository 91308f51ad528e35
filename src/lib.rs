//! The library code for the `quill` static site generator, which turns a web
//! novel manuscript (phases of volumes of chapters, as Markdown files) into a
//! browsable site. A build happens in two distinct steps:
//!
//! 1. Scanning the manuscript directory into [`manuscript::Phase`] records
//!    ([`crate::scanner`])
//! 2. Converting those records into output files on disk ([`crate::build`])
//!
//! The second step writes a JSON manifest of the whole tree
//! ([`crate::manifest`]) and then renders one page per phase, volume, and
//! chapter plus the home page ([`crate::write`]) using the theme's templates
//! ([`crate::templates`]). Chapter bodies go through a deliberately small
//! Markdown subset ([`crate::markdown`]).
//!
//! The generated pages carry a small script for theme, font size, reading
//! position, and arrow-key navigation. [`crate::reader`] models that runtime
//! so its rules can be tested here.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod manifest;
pub mod manuscript;
pub mod markdown;
pub mod reader;
pub mod scanner;
pub mod templates;
mod util;
pub mod value;
pub mod write;
