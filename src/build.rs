//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site: scanning the manuscript
//! ([`crate::scanner`]), writing the JSON manifest ([`crate::manifest`]),
//! rendering phase, volume, chapter, and home pages ([`crate::write`]), and
//! copying the theme's static assets into the output directory.

use crate::config::Config;
use crate::manifest::{Manifest, MANIFEST_PATH};
use crate::manuscript::{Phase, Volume};
use crate::scanner::{Error as ScanError, Scanner};
use crate::templates::{Error as ThemeError, Theme};
use crate::util::{ensure_dir, read_lossy};
use crate::write::{Error as WriteError, Writer};
use chrono::{DateTime, Utc};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Counts of what a build produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub phases: usize,
    pub volumes: usize,
    pub chapters: usize,

    /// Chapters whose source file disappeared between scanning and writing.
    pub skipped_chapters: usize,
}

/// Builds the site from a [`Config`] object. This calls into
/// [`Scanner::scan_phases`] and then [`write_site`], which do the
/// heavy-lifting. `now` becomes the manifest's `lastUpdated` field.
pub fn build_site(config: &Config, now: DateTime<Utc>) -> Result<BuildSummary> {
    info!("[1/4] Scanning manuscript in `{}`", config.source_directory.display());
    let phases = Scanner::new(config).scan_phases()?;
    write_site(config, &phases, now)
}

/// Writes the manifest, every page, and the static assets for already-scanned
/// phases.
pub fn write_site(config: &Config, phases: &[Phase], now: DateTime<Utc>) -> Result<BuildSummary> {
    let theme = Theme::load(config.theme_directory.as_deref())?;
    let output_directory = &config.output_directory;

    info!("[2/4] Writing {}", MANIFEST_PATH);
    write_manifest(config, phases, now)?;

    info!("[3/4] Writing pages");
    let writer = Writer {
        theme: &theme,
        site: &config.site,
        labels: &config.labels,
        output_directory,
    };
    let mut summary = BuildSummary {
        phases: phases.len(),
        ..BuildSummary::default()
    };

    for phase in phases {
        writer.write_page(&writer.phase_page(phase))?;
        info!("  [phase] {}/index.html", phase.id);

        for (i, volume) in phase.volumes.iter().enumerate() {
            let prev = i.checked_sub(1).map(|j| &phase.volumes[j]);
            let next = phase.volumes.get(i + 1);
            writer.write_page(&writer.volume_page(phase, volume, prev, next))?;
            info!("    [volume] {}/index.html", volume.id);

            let (written, skipped) = write_chapters(config, &writer, phase, volume)?;
            info!("      {} chapters", written);
            summary.volumes += 1;
            summary.chapters += written;
            summary.skipped_chapters += skipped;
        }
    }

    info!("[4/4] Writing home page");
    writer.write_page(&writer.home_page(phases))?;
    theme.write_static(output_directory)?;

    info!(
        "Built {} phases, {} volumes, {} chapters into `{}`",
        summary.phases,
        summary.volumes,
        summary.chapters,
        output_directory.display()
    );
    Ok(summary)
}

fn write_manifest(config: &Config, phases: &[Phase], now: DateTime<Utc>) -> Result<()> {
    let path = config.output_directory.join(MANIFEST_PATH);
    if let Some(dir) = path.parent() {
        ensure_dir(dir)?;
    }
    let manifest = Manifest::new(&config.site, phases, now);
    write_manifest_to(File::create(&path)?, &manifest, &path)
}

// Buffers the JSON and flushes explicitly; dropping a BufWriter discards
// flush errors, which would leave a truncated manifest behind.
fn write_manifest_to<W: Write>(w: W, manifest: &Manifest<'_>, path: &Path) -> Result<()> {
    let mut w = BufWriter::new(w);
    manifest.write_to(&mut w).map_err(|err| Error::Manifest {
        path: path.to_owned(),
        err,
    })?;
    w.flush()?;
    Ok(())
}

// Writes every chapter page of a volume. A chapter whose source file is
// missing is skipped without affecting its siblings. Returns the number of
// pages written and skipped.
fn write_chapters(
    config: &Config,
    writer: &Writer<'_>,
    phase: &Phase,
    volume: &Volume,
) -> Result<(usize, usize)> {
    let source_directory = config
        .source_directory
        .join(&phase.source_folder)
        .join(&volume.source_folder);

    let (mut written, mut skipped) = (0, 0);
    for (i, chapter) in volume.chapters.iter().enumerate() {
        let source_path = source_directory.join(&chapter.source_file);
        if !source_path.is_file() {
            warn!("  Skipping {}: `{}` does not exist", chapter.id, source_path.display());
            skipped += 1;
            continue;
        }
        let content = read_lossy(&source_path)?;

        let prev = i.checked_sub(1).map(|j| &volume.chapters[j]);
        let next = volume.chapters.get(i + 1);
        writer.write_page(&writer.chapter_page(phase, volume, chapter, &content, prev, next))?;
        debug!("      [chapter] {}", chapter.html_file);
        written += 1;
    }
    Ok((written, skipped))
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during scanning,
/// writing, loading the theme, writing the manifest, and other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors during scanning.
    Scan(ScanError),

    /// Returned for errors rendering or writing pages.
    Write(WriteError),

    /// Returned for errors loading the theme or writing its static assets.
    Theme(ThemeError),

    /// Returned for errors serializing the manifest.
    Manifest { path: PathBuf, err: serde_json::Error },

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Scan(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Theme(err) => err.fmt(f),
            Error::Manifest { path, err: _ } => {
                write!(f, "Writing manifest '{}'", path.display())
            }
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`]. Every variant but
    /// `Manifest` displays as its inner error, so it reports the inner
    /// error's source rather than the inner error again.
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use std::error::Error as _;
        match self {
            Error::Scan(err) => err.source(),
            Error::Write(err) => err.source(),
            Error::Theme(err) => err.source(),
            Error::Manifest { path: _, err } => Some(err),
            Error::Io(err) => err.source(),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<ScanError> for Error {
    /// Converts [`ScanError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: ScanError) -> Error {
        Error::Scan(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<ThemeError> for Error {
    /// Converts [`ThemeError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: ThemeError) -> Error {
        Error::Theme(err)
    }
}
