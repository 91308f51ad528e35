//! Loads the [`Theme`]: one template per page kind plus the static assets
//! (stylesheet, reader script) every page links to. `quill` embeds a default
//! theme; a project can point `theme_directory` at its own.
//!
//! A theme directory contains a `theme.yaml` listing the template files for
//! each page kind and an optional `static/` directory that is copied verbatim
//! into the output directory.

use gtmpl::Template;
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::util::ensure_dir;

const EMBEDDED_HOME: &str = include_str!("../theme/templates/home.html");
const EMBEDDED_PHASE: &str = include_str!("../theme/templates/phase.html");
const EMBEDDED_VOLUME: &str = include_str!("../theme/templates/volume.html");
const EMBEDDED_CHAPTER: &str = include_str!("../theme/templates/chapter.html");

const EMBEDDED_STATIC: &[(&str, &str)] = &[
    ("css/style.css", include_str!("../theme/static/css/style.css")),
    ("js/reader.js", include_str!("../theme/static/js/reader.js")),
];

#[derive(Deserialize)]
struct ThemeFile {
    home_template: Vec<PathBuf>,
    phase_template: Vec<PathBuf>,
    volume_template: Vec<PathBuf>,
    chapter_template: Vec<PathBuf>,
}

enum StaticAssets {
    Embedded,
    Directory(PathBuf),
}

/// The parsed templates for each page kind and the theme's static assets.
pub struct Theme {
    pub home: Template,
    pub phase: Template,
    pub volume: Template,
    pub chapter: Template,
    static_assets: StaticAssets,
}

impl Theme {
    /// The theme compiled into the binary.
    pub fn embedded() -> Result<Theme> {
        Ok(Theme {
            home: parse_str(EMBEDDED_HOME)?,
            phase: parse_str(EMBEDDED_PHASE)?,
            volume: parse_str(EMBEDDED_VOLUME)?,
            chapter: parse_str(EMBEDDED_CHAPTER)?,
            static_assets: StaticAssets::Embedded,
        })
    }

    /// Loads a theme from a directory containing a `theme.yaml` file.
    pub fn from_directory(dir: &Path) -> Result<Theme> {
        let theme_path = dir.join("theme.yaml");
        let theme_file = File::open(&theme_path).map_err(|e| Error::OpenThemeFile {
            path: theme_path.clone(),
            err: e,
        })?;
        let theme: ThemeFile = serde_yaml::from_reader(theme_file)?;
        let resolve = |relpaths: &[PathBuf]| -> Vec<PathBuf> {
            relpaths.iter().map(|relpath| dir.join(relpath)).collect()
        };

        Ok(Theme {
            home: parse_template(resolve(&theme.home_template).iter())?,
            phase: parse_template(resolve(&theme.phase_template).iter())?,
            volume: parse_template(resolve(&theme.volume_template).iter())?,
            chapter: parse_template(resolve(&theme.chapter_template).iter())?,
            static_assets: StaticAssets::Directory(dir.join("static")),
        })
    }

    /// Loads the theme named by `theme_directory`, or the embedded theme if
    /// there is none.
    pub fn load(theme_directory: Option<&Path>) -> Result<Theme> {
        match theme_directory {
            Some(dir) => Theme::from_directory(dir),
            None => Theme::embedded(),
        }
    }

    /// Writes the theme's static assets into `output_directory`, overwriting
    /// files of the same name.
    pub fn write_static(&self, output_directory: &Path) -> Result<()> {
        match &self.static_assets {
            StaticAssets::Embedded => {
                for (relpath, contents) in EMBEDDED_STATIC {
                    let path = output_directory.join(relpath);
                    if let Some(dir) = path.parent() {
                        ensure_dir(dir)?;
                    }
                    std::fs::write(&path, contents)?;
                }
                Ok(())
            }
            StaticAssets::Directory(dir) if dir.is_dir() => copy_dir(dir, output_directory),
            StaticAssets::Directory(_) => Ok(()),
        }
    }
}

fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    ensure_dir(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &dst.join(entry.file_name()))?;
        } else {
            std::fs::copy(entry.path(), dst.join(entry.file_name()))?;
        }
    }

    Ok(())
}

fn parse_str(contents: &str) -> Result<Template> {
    let mut template = Template::default();
    template.parse(contents).map_err(Error::ParseTemplate)?;
    Ok(template)
}

// Loads the template file contents, concatenates them, and parses the result
// into a template.
fn parse_template<P: AsRef<Path>>(template_files: impl Iterator<Item = P>) -> Result<Template> {
    let mut contents = String::new();
    for template_file in template_files {
        use std::io::Read;
        let template_file = template_file.as_ref();
        File::open(template_file)
            .map_err(|e| Error::OpenTemplateFile {
                path: template_file.to_owned(),
                err: e,
            })?
            .read_to_string(&mut contents)?;
    }
    parse_str(&contents)
}

pub type Result<T> = std::result::Result<T, Error>;

/// The error type for loading a theme.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O problems opening the `theme.yaml` file.
    OpenThemeFile { path: PathBuf, err: std::io::Error },

    /// Returned when `theme.yaml` isn't valid.
    DeserializeYaml(serde_yaml::Error),

    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate(String),

    /// Returned for other I/O errors, e.g. writing static assets.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OpenThemeFile { path, err: _ } => {
                write!(f, "Opening theme file '{}'", path.display())
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::OpenTemplateFile { path, err: _ } => {
                write!(f, "Opening template file '{}'", path.display())
            }
            Error::ParseTemplate(err) => write!(f, "Parsing template: {}", err),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`]. `DeserializeYaml`
    /// and `Io` display as their inner error, so they report its source.
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use std::error::Error as _;
        match self {
            Error::OpenThemeFile { path: _, err } => Some(err),
            Error::DeserializeYaml(err) => err.source(),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate(_) => None,
            Error::Io(err) => err.source(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_embedded_theme_parses() -> Result<()> {
        Theme::embedded()?;
        Ok(())
    }

    #[test]
    fn test_theme_directory_matches_embedded_layout() -> Result<()> {
        Theme::from_directory(&Path::new(env!("CARGO_MANIFEST_DIR")).join("theme"))?;
        Ok(())
    }

    #[test]
    fn test_missing_theme_file() {
        let dir = tempfile::tempdir().unwrap();
        match Theme::from_directory(dir.path()) {
            Err(Error::OpenThemeFile { path, .. }) => {
                assert_eq!(dir.path().join("theme.yaml"), path)
            }
            _ => panic!("expected OpenThemeFile error"),
        }
    }

    #[test]
    fn test_write_static_embedded() -> Result<()> {
        let dir = tempfile::tempdir()?;
        Theme::embedded()?.write_static(dir.path())?;
        assert!(dir.path().join("css/style.css").is_file());
        assert!(dir.path().join("js/reader.js").is_file());
        Ok(())
    }

    #[test]
    fn test_write_static_from_directory() -> Result<()> {
        let dir = tempfile::tempdir()?;
        Theme::from_directory(&Path::new(env!("CARGO_MANIFEST_DIR")).join("theme"))?
            .write_static(dir.path())?;
        assert_eq!(
            EMBEDDED_STATIC[1].1,
            std::fs::read_to_string(dir.path().join("js/reader.js"))?
        );
        Ok(())
    }
}
