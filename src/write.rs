//! The page generators. A [`Writer`] turns scanned [`Phase`]s, [`Volume`]s,
//! and [`Chapter`]s into [`Page`]s, renders them with the [`Theme`]'s
//! templates, and writes them into the output tree:
//!
//! ```text
//! {output_directory}/index.html
//! {output_directory}/phases/{phase}/index.html
//! {output_directory}/phases/{phase}/chapters/{volume}/index.html
//! {output_directory}/phases/{phase}/chapters/{volume}/{chapter}.html
//! ```

use crate::config::{Labels, Site};
use crate::manuscript::{Chapter, Phase, Volume};
use crate::markdown;
use crate::templates::Theme;
use crate::util::ensure_dir;
use crate::value::{object, string};
use gtmpl::Template;
use gtmpl_value::Value;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Relative path from a home page back to the output root.
const HOME_ROOT: &str = "";
/// Relative path from a phase index back to the output root.
const PHASE_ROOT: &str = "../../";
/// Relative path from volume indexes and chapter pages back to the output root.
const VOLUME_ROOT: &str = "../../../../";

/// Responsible for templating and writing HTML pages to disk.
pub struct Writer<'a> {
    /// The templates for each page kind.
    pub theme: &'a Theme,

    /// Site-wide copy, made available to every template as `.site`.
    pub site: &'a Site,

    /// Fallback chapter labels for volume tables of contents.
    pub labels: &'a Labels,

    /// The root of the output tree.
    pub output_directory: &'a Path,
}

impl<'a> Writer<'a> {
    /// The home page, listing every phase that has at least one volume.
    pub fn home_page(&self, phases: &[Phase]) -> Page<'a> {
        let cards = phases
            .iter()
            .filter(|phase| !phase.volumes.is_empty())
            .map(|phase| {
                object(vec![
                    ("href", string(format!("phases/{}/index.html", phase.id))),
                    ("cover", string(format!("images/covers/{}.jpg", phase.id))),
                    ("fallback_cover", string("images/banner.jpg")),
                    ("label", string(phase.id.replacen("phase-", "PHASE ", 1).to_uppercase())),
                    ("title", string(&phase.title)),
                    ("description", string(&phase.description)),
                    ("volume_count", string(phase.volumes.len().to_string())),
                ])
            })
            .collect();

        Page {
            fields: vec![
                ("phases", Value::Array(cards)),
                ("subtitle_upper", string(self.site.subtitle.to_uppercase())),
            ],
            root: HOME_ROOT,
            file_path: self.output_directory.join("index.html"),
            prev: None,
            next: None,
            template: &self.theme.home,
        }
    }

    /// A phase's index page, listing its volumes.
    pub fn phase_page(&self, phase: &Phase) -> Page<'a> {
        let cards = phase
            .volumes
            .iter()
            .map(|volume| {
                object(vec![
                    ("href", string(format!("chapters/{}/index.html", volume.id))),
                    (
                        "cover",
                        string(format!("{}images/covers/{}.jpg", PHASE_ROOT, volume.id)),
                    ),
                    (
                        "fallback_cover",
                        string(format!("{}images/covers/default.jpg", PHASE_ROOT)),
                    ),
                    ("id", string(&volume.id)),
                    ("label", string(volume.card_label())),
                    ("title", string(&volume.title)),
                    ("subtitle", string(&volume.subtitle)),
                ])
            })
            .collect();

        Page {
            fields: vec![
                (
                    "phase",
                    object(vec![
                        ("id", string(&phase.id)),
                        ("title", string(&phase.title)),
                        ("subtitle_upper", string(phase.subtitle.to_uppercase())),
                        ("description", string(&phase.description)),
                    ]),
                ),
                ("volumes", Value::Array(cards)),
            ],
            root: PHASE_ROOT,
            file_path: self.phase_directory(phase).join("index.html"),
            prev: None,
            next: None,
            template: &self.theme.phase,
        }
    }

    /// A volume's table of contents, linked to its sibling volumes.
    pub fn volume_page(
        &self,
        phase: &Phase,
        volume: &Volume,
        prev: Option<&Volume>,
        next: Option<&Volume>,
    ) -> Page<'a> {
        let sibling = |v: &Volume| {
            object(vec![
                ("href", string(format!("../{}/index.html", v.id))),
                ("label", string(v.label())),
            ])
        };
        let chapters = volume
            .chapters
            .iter()
            .map(|chapter| {
                object(vec![
                    ("href", string(&chapter.html_file)),
                    ("label", string(chapter.kind.label(self.labels))),
                    ("title", string(&chapter.title)),
                ])
            })
            .collect();

        Page {
            fields: vec![
                ("phase", object(vec![("title", string(&phase.title))])),
                (
                    "volume",
                    object(vec![
                        ("id", string(&volume.id)),
                        ("label", string(volume.label())),
                        ("title", string(&volume.title)),
                        ("subtitle", string(&volume.subtitle)),
                        ("description", string(&volume.description)),
                    ]),
                ),
                ("chapters", Value::Array(chapters)),
            ],
            root: VOLUME_ROOT,
            file_path: self.volume_directory(phase, volume).join("index.html"),
            prev: prev.map(sibling),
            next: next.map(sibling),
            template: &self.theme.volume,
        }
    }

    /// A chapter page. `content` is the chapter's Markdown source; it is
    /// converted with [`markdown::to_html`].
    pub fn chapter_page(
        &self,
        phase: &Phase,
        volume: &Volume,
        chapter: &Chapter,
        content: &str,
        prev: Option<&Chapter>,
        next: Option<&Chapter>,
    ) -> Page<'a> {
        let sibling = |c: &Chapter| object(vec![("href", string(&c.html_file))]);

        Page {
            fields: vec![
                (
                    "volume",
                    object(vec![
                        ("label", string(volume.label())),
                        ("banner", string(volume.banner_label())),
                    ]),
                ),
                (
                    "chapter",
                    object(vec![
                        ("id", string(&chapter.id)),
                        ("title", string(&chapter.title)),
                    ]),
                ),
                ("content", string(markdown::to_html(content))),
            ],
            root: VOLUME_ROOT,
            file_path: self
                .volume_directory(phase, volume)
                .join(&chapter.html_file),
            prev: prev.map(sibling),
            next: next.map(sibling),
            template: &self.theme.chapter,
        }
    }

    /// Renders a [`Page`] to a string.
    pub fn render(&self, page: &Page<'_>) -> Result<String> {
        let context = gtmpl::Context::from(page.to_value(self.site))?;
        let mut buf: Vec<u8> = Vec::new();
        page.template.execute(&mut buf, &context)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Renders a [`Page`] and writes it to its file path, creating the parent
    /// directory if needed.
    pub fn write_page(&self, page: &Page<'_>) -> Result<()> {
        let html = self.render(page)?;
        if let Some(dir) = page.file_path.parent() {
            ensure_dir(dir)?;
        }
        std::fs::write(&page.file_path, html)?;
        Ok(())
    }

    pub fn render_home(&self, phases: &[Phase]) -> Result<String> {
        self.render(&self.home_page(phases))
    }

    pub fn render_phase(&self, phase: &Phase) -> Result<String> {
        self.render(&self.phase_page(phase))
    }

    pub fn render_volume(
        &self,
        phase: &Phase,
        volume: &Volume,
        prev: Option<&Volume>,
        next: Option<&Volume>,
    ) -> Result<String> {
        self.render(&self.volume_page(phase, volume, prev, next))
    }

    pub fn render_chapter(
        &self,
        phase: &Phase,
        volume: &Volume,
        chapter: &Chapter,
        content: &str,
        prev: Option<&Chapter>,
        next: Option<&Chapter>,
    ) -> Result<String> {
        self.render(&self.chapter_page(phase, volume, chapter, content, prev, next))
    }

    /// `{output_directory}/phases/{phase}`
    pub fn phase_directory(&self, phase: &Phase) -> PathBuf {
        self.output_directory.join("phases").join(&phase.id)
    }

    /// `{output_directory}/phases/{phase}/chapters/{volume}`
    pub fn volume_directory(&self, phase: &Phase, volume: &Volume) -> PathBuf {
        self.phase_directory(phase).join("chapters").join(&volume.id)
    }
}

/// An object representing an output HTML file. A [`Page`] can be converted to
/// a [`Value`] and thus rendered in a template via [`Page::to_value`].
pub struct Page<'a> {
    /// The page-specific template fields.
    fields: Vec<(&'static str, Value)>,

    /// The relative path from the page back to the output root, for links to
    /// shared assets.
    root: &'static str,

    /// The target location on disk for the output file.
    pub file_path: PathBuf,

    /// The previous sibling, if any.
    prev: Option<Value>,

    /// The next sibling, if any.
    next: Option<Value>,

    /// The template with which the page will be rendered.
    template: &'a Template,
}

impl Page<'_> {
    /// Converts a [`Page`] into a [`Value`]. The result is a [`Value::Object`]
    /// with the page's own fields plus `site`, `root`, `prev`, and `next`.
    fn to_value(&self, site: &Site) -> Value {
        let option_to_value = |opt: &Option<Value>| match opt {
            Some(v) => v.clone(),
            None => Value::Nil,
        };

        object(
            self.fields
                .iter()
                .map(|(k, v)| (*k, v.clone()))
                .chain(vec![
                    ("site", Value::from(site)),
                    ("root", string(self.root)),
                    ("prev", option_to_value(&self.prev)),
                    ("next", option_to_value(&self.next)),
                ]),
        )
    }
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
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

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => write!(f, "Rendering template: {}", err),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::Io(err) => std::error::Error::source(err),
        }
    }
}
