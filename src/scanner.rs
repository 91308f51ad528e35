//! Defines the [`Scanner`] and [`Error`] types and the logic for turning the
//! manuscript tree on disk into [`Phase`] records. The expected layout is:
//!
//! ```text
//! {source_directory}/
//!     Phase_01_Urban_Legend/        (one folder per configured phase)
//!         Vol_01_Ghost_Signal/      (Vol_<number>_<name>)
//!             00_Prologue.md
//!             01_Chapter1_Part1.md  (<order>_Chapter<n>_Part<m>.md)
//!             Epilogue.md
//!             Vol_01_Outline.md     (optional; supplies the description)
//! ```

use std::{fmt, path::Path};

use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::{
    config::{Config, PhaseConfig},
    manuscript::{
        parse_chapter_file_name, parse_volume_folder_name, sort_chapters, Chapter,
        Phase, Volume, VolumeFolderName, MARKDOWN_EXTENSION,
    },
    markdown,
    util::read_lossy,
};

/// Scans [`Phase`]s, [`Volume`]s, and [`Chapter`]s from the source directory
/// named in a [`Config`].
pub struct Scanner<'a> {
    config: &'a Config,
}

impl<'a> Scanner<'a> {
    /// Constructs a new scanner over the configuration's source directory.
    pub fn new(config: &'a Config) -> Scanner<'a> {
        Scanner { config }
    }

    /// Scans every configured phase in order. Phases whose folder is missing
    /// are logged and left out of the result.
    pub fn scan_phases(&self) -> Result<Vec<Phase>> {
        let mut phases = Vec::with_capacity(self.config.phases.len());
        for phase in &self.config.phases {
            info!("Scanning {}...", phase.id);
            if let Some(scanned) = self.scan_phase(phase)? {
                info!("  found {} volumes", scanned.volumes.len());
                phases.push(scanned);
            }
        }
        Ok(phases)
    }

    /// Scans a single phase. Returns `None` if the phase's folder doesn't
    /// exist.
    pub fn scan_phase(&self, phase: &PhaseConfig) -> Result<Option<Phase>> {
        let phase_path = self.config.source_directory.join(&phase.source_folder);
        if !phase_path.is_dir() {
            warn!("Skipping {}: `{}` does not exist", phase.id, phase_path.display());
            return Ok(None);
        }

        let mut volumes = Vec::new();
        for entry in sorted_entries(&phase_path)? {
            if !entry.file_type().is_dir() {
                continue;
            }
            let folder_name = match file_name(&entry) {
                Some(name) => name,
                None => continue,
            };
            if !folder_name.starts_with("Vol_") {
                continue;
            }
            let folder = match parse_volume_folder_name(folder_name) {
                Some(folder) => folder,
                None => continue,
            };

            if let Some((first, last)) = phase.volume_range {
                if folder.num < first || folder.num > last {
                    warn!(
                        "{} lies outside of {}'s volume range {}-{}",
                        folder_name, phase.id, first, last
                    );
                }
            }

            volumes.push(
                self.scan_volume(&folder, folder_name, entry.path())
                    .map_err(|e| {
                        Error::Annotated(format!("scanning volume `{}`", folder_name), Box::new(e))
                    })?,
            );
        }

        volumes.sort_by_key(|v| v.num);

        Ok(Some(Phase {
            id: phase.id.clone(),
            title: phase.title.clone(),
            subtitle: phase.subtitle.clone(),
            description: phase.description.clone(),
            volumes,
            source_folder: phase.source_folder.clone(),
        }))
    }

    fn scan_volume(
        &self,
        folder: &VolumeFolderName,
        folder_name: &str,
        path: &Path,
    ) -> Result<Volume> {
        let outline_path = path.join(format!("Vol_{:02}_Outline.md", folder.num));
        let description = if outline_path.is_file() {
            markdown::first_paragraph(&read_lossy(&outline_path)?)
        } else {
            String::new()
        };

        Ok(Volume {
            id: folder.id.clone(),
            num: folder.num,
            title: folder.title.clone(),
            slug: slug::slugify(&folder.title),
            subtitle: self.config.volume_subtitle(&folder.title).to_owned(),
            description,
            source_folder: folder_name.to_owned(),
            chapters: self.scan_chapters(path)?,
        })
    }

    /// Searches a volume folder for chapter files and returns them in reading
    /// order (see [`sort_chapters`]). Markdown files whose names contain one
    /// of the configured excluded keywords, or that don't follow a chapter
    /// naming convention, are ignored.
    pub fn scan_chapters(&self, dir: &Path) -> Result<Vec<Chapter>> {
        let mut chapters = Vec::new();
        for entry in sorted_entries(dir)? {
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = match file_name(&entry) {
                Some(name) => name,
                None => continue,
            };
            if !file_name.ends_with(MARKDOWN_EXTENSION) || self.is_excluded(file_name) {
                continue;
            }
            let kind = match parse_chapter_file_name(file_name) {
                Some(kind) => kind,
                None => {
                    debug!("Ignoring `{}`", entry.path().display());
                    continue;
                }
            };

            let title = markdown::extract_title(&read_lossy(entry.path())?);
            chapters.push(Chapter::new(
                kind,
                file_name,
                &title.main,
                &title.sub,
                &self.config.labels,
            ));
        }

        sort_chapters(&mut chapters);
        Ok(chapters)
    }

    fn is_excluded(&self, file_name: &str) -> bool {
        self.config
            .excluded_keywords
            .iter()
            .any(|keyword| file_name.contains(keyword.as_str()))
    }
}

// Lists the immediate children of `dir`, sorted by file name so that scans
// are reproducible. Symlinks are followed; a child that can't be read (e.g. a
// dangling link) is logged and left out, but failing to list `dir` itself is
// an error.
fn sorted_entries(dir: &Path) -> Result<Vec<DirEntry>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
    {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(err) if err.depth() > 0 => warn!("Skipping unreadable entry: {}", err),
            Err(err) => return Err(err.into()),
        }
    }
    Ok(entries)
}

// The entry's name, or `None` (logged) if it isn't valid UTF-8. Such entries
// can't match any naming convention, so they are skipped like any other
// unrecognized file.
fn file_name(entry: &DirEntry) -> Option<&str> {
    let name = entry.file_name().to_str();
    if name.is_none() {
        warn!("Skipping `{}`: name is not valid UTF-8", entry.path().display());
    }
    name
}

/// Represents the result of a scan operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error scanning the manuscript tree.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O errors reading manuscript files.
    Io(std::io::Error),

    /// Returned for I/O errors listing directories.
    WalkDir(walkdir::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::Annotated(annotation, _) => annotation.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`]. `Io` and
    /// `WalkDir` display their inner error, so they skip past it; a
    /// [`walkdir::Error`] already prints its underlying I/O error.
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => std::error::Error::source(err),
            Error::WalkDir(_) => None,
            Error::Annotated(_, err) => Some(err.as_ref()),
        }
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for directory listings.
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

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::PROJECT_FILE;

    fn config() -> Config {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/project");
        Config::from_project_file(&path.join(PROJECT_FILE)).unwrap()
    }

    #[test]
    fn test_scan_phases_skips_missing_phase() -> Result<()> {
        let config = config();
        let phases = Scanner::new(&config).scan_phases()?;

        assert_eq!(1, phases.len());
        let phase = &phases[0];
        assert_eq!("phase-01", phase.id);
        assert_eq!("Phase_01_Urban_Legend", phase.source_folder);

        let ids: Vec<&str> = phase.volumes.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(vec!["vol-01", "vol-02"], ids);
        Ok(())
    }

    #[test]
    fn test_scan_volume_metadata() -> Result<()> {
        let config = config();
        let phases = Scanner::new(&config).scan_phases()?;
        let volume = &phases[0].volumes[0];

        assert_eq!(1, volume.num);
        assert_eq!("Ghost Signal", volume.title);
        assert_eq!("ghost-signal", volume.slug);
        assert_eq!("幽靈訊號", volume.subtitle);
        assert_eq!("午夜的電話亭響起，來電者是三年前死去的委託人。", volume.description);
        assert_eq!("Vol_01_Ghost_Signal", volume.source_folder);

        let second = &phases[0].volumes[1];
        assert_eq!("測試圖樣", second.subtitle);
        assert_eq!("", second.description);
        Ok(())
    }

    #[test]
    fn test_scan_chapters_order_and_titles() -> Result<()> {
        let config = config();
        let dir = config
            .source_directory
            .join("Phase_01_Urban_Legend/Vol_01_Ghost_Signal");
        let chapters = Scanner::new(&config).scan_chapters(&dir)?;

        let ids: Vec<&str> = chapters.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            vec!["prologue", "ch01-01", "ch01-02", "ch10-01", "epilogue"],
            ids
        );

        assert_eq!("序章", chapters[0].title);
        assert_eq!("第一章 幽靈訊號 - 午夜來電", chapters[1].title);
        assert_eq!("第一章 幽靈訊號 - 錯誤的號碼", chapters[2].title);
        assert_eq!("第十章 回聲", chapters[3].title);
        assert_eq!("終章 訊號消失", chapters[4].title);
        assert_eq!("01_Chapter1_Part1.md", chapters[1].source_file);
        assert_eq!("ch01-01.html", chapters[1].html_file);
        Ok(())
    }

    // A config whose source directory is a fresh temporary directory holding
    // an empty `Phase_01_Urban_Legend/Vol_01_Ghost_Signal` folder.
    fn scratch() -> (Config, tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let volume = dir.path().join("Phase_01_Urban_Legend/Vol_01_Ghost_Signal");
        std::fs::create_dir_all(&volume).unwrap();
        std::fs::write(volume.join("01_Chapter1_Part1.md"), "# 第一章\n").unwrap();
        let mut config = config();
        config.source_directory = dir.path().to_owned();
        (config, dir, volume)
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_skips_non_utf8_names() -> Result<()> {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let (config, dir, volume) = scratch();
        std::fs::write(volume.join(OsStr::from_bytes(b"notes_\xff.txt")), "")?;
        std::fs::write(volume.join(OsStr::from_bytes(b"02_Chapter1_Part2\xff.md")), "")?;
        std::fs::create_dir(
            dir.path()
                .join("Phase_01_Urban_Legend")
                .join(OsStr::from_bytes(b"Vol_02_\xff")),
        )?;

        let phases = Scanner::new(&config).scan_phases()?;
        assert_eq!(1, phases[0].volumes.len());
        let ids: Vec<&str> = phases[0].volumes[0]
            .chapters
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(vec!["ch01-01"], ids);
        Ok(())
    }

    #[test]
    fn test_scan_reads_non_utf8_chapter() -> Result<()> {
        let (config, _dir, volume) = scratch();
        // "# 第五章" in Big5
        std::fs::write(
            volume.join("05_Chapter5_Part1.md"),
            b"# \xb2\xc4\xa4\xad\xb3\xb9\n",
        )?;

        let chapters = Scanner::new(&config).scan_chapters(&volume)?;
        assert_eq!(2, chapters.len());
        assert_eq!("ch05-01", chapters[1].id);
        assert!(chapters[1].title.contains('\u{FFFD}'));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_follows_symlinks() -> Result<()> {
        use std::os::unix::fs::symlink;

        let (config, dir, volume) = scratch();
        symlink(
            volume.join("01_Chapter1_Part1.md"),
            volume.join("06_Chapter6_Part1.md"),
        )?;
        symlink(volume.join("missing.md"), volume.join("07_Chapter7_Part1.md"))?;
        let elsewhere = dir.path().join("drafts/Vol_02_Test_Pattern");
        std::fs::create_dir_all(&elsewhere)?;
        std::fs::write(elsewhere.join("01_Chapter1_Part1.md"), "# 測試\n")?;
        symlink(
            &elsewhere,
            dir.path().join("Phase_01_Urban_Legend/Vol_02_Test_Pattern"),
        )?;

        let phases = Scanner::new(&config).scan_phases()?;
        let volumes = &phases[0].volumes;
        assert_eq!(2, volumes.len());
        let ids: Vec<&str> = volumes[0].chapters.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(vec!["ch01-01", "ch06-01"], ids);
        assert_eq!("第一章", volumes[0].chapters[1].title);
        assert_eq!("vol-02", volumes[1].id);
        assert_eq!(1, volumes[1].chapters.len());
        Ok(())
    }

    #[test]
    fn test_annotated_error_chain() {
        let err = Error::Annotated(
            String::from("scanning volume `Vol_01_Ghost_Signal`"),
            Box::new(Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk on fire",
            ))),
        );
        assert_eq!(
            "scanning volume `Vol_01_Ghost_Signal`: disk on fire",
            format!("{:#}", anyhow::Error::new(err))
        );
    }

    #[test]
    fn test_scan_chapters_skips_excluded_keywords() -> Result<()> {
        let config = config();
        let dir = config
            .source_directory
            .join("Phase_01_Urban_Legend/Vol_01_Ghost_Signal");
        let chapters = Scanner::new(&config).scan_chapters(&dir)?;

        assert!(chapters
            .iter()
            .all(|c| config.excluded_keywords.iter().all(|k| !c.source_file.contains(k.as_str()))));
        assert_eq!(5, chapters.len());
        Ok(())
    }
}
