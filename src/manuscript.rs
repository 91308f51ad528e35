//! Defines the [`Phase`], [`Volume`], and [`Chapter`] records that a scan
//! produces, along with the naming conventions that map manuscript folders
//! and files onto them.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;

use crate::config::Labels;

pub const MARKDOWN_EXTENSION: &str = ".md";
pub const HTML_EXTENSION: &str = ".html";

lazy_static! {
    static ref VOLUME_FOLDER: Regex = Regex::new(r"Vol_(\d+)_(.+)").unwrap();
    static ref CHAPTER_FILE: Regex =
        Regex::new(r"(\d+)_Chapter(\d+)_Part(\d+)\.md").unwrap();
}

/// A top-level story arc.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub volumes: Vec<Volume>,
    pub source_folder: String,
}

/// A bound collection of chapters within a [`Phase`].
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    /// `vol-NN`, derived from the folder name.
    pub id: String,
    pub num: u32,

    /// The folder name less its `Vol_NN_` prefix, with underscores as spaces.
    pub title: String,

    /// The slugified title, e.g. `ghost-signal`.
    pub slug: String,
    pub subtitle: String,
    pub description: String,
    pub source_folder: String,
    pub chapters: Vec<Chapter>,
}

impl Volume {
    /// The short label used in links, e.g. `Vol.07`.
    pub fn label(&self) -> String {
        self.id.replacen("vol-", "Vol.", 1)
    }

    /// The label shown above chapter titles, e.g. `VOL.07 EXAMPLE NAME`.
    pub fn banner_label(&self) -> String {
        format!(
            "{} {}",
            self.id.to_uppercase().replacen('-', ".", 1),
            self.title.to_uppercase()
        )
    }

    /// The label shown on volume cards, e.g. `VOLUME 07`.
    pub fn card_label(&self) -> String {
        self.id.replacen("vol-", "VOLUME ", 1).to_uppercase()
    }
}

/// What a manuscript file is, as far as ordering and labelling are concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChapterKind {
    Prologue,
    Numbered { chapter: u32, part: u32 },
    Epilogue,
}

impl ChapterKind {
    /// The chapter's page id: `prologue`, `epilogue`, or `chNN-PP`.
    pub fn id(&self) -> String {
        match self {
            ChapterKind::Prologue => String::from("prologue"),
            ChapterKind::Epilogue => String::from("epilogue"),
            ChapterKind::Numbered { chapter, part } => {
                format!("ch{:02}-{:02}", chapter, part)
            }
        }
    }

    /// The label shown in a volume's table of contents.
    pub fn label(&self, labels: &Labels) -> String {
        match self {
            ChapterKind::Prologue => labels.prologue.clone(),
            ChapterKind::Epilogue => labels.epilogue.clone(),
            ChapterKind::Numbered { chapter, .. } => format!("第{}章", chapter),
        }
    }

    fn rank(&self) -> (u8, u32, u32) {
        match *self {
            ChapterKind::Prologue => (0, 0, 0),
            ChapterKind::Numbered { chapter, part } => (1, chapter, part),
            ChapterKind::Epilogue => (2, 0, 0),
        }
    }
}

impl PartialOrd for ChapterKind {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ChapterKind {
    /// Prologues come first and epilogues last; numbered chapters are ordered
    /// by chapter and then by part.
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// A single manuscript file and the page rendered from it.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    #[serde(skip)]
    pub kind: ChapterKind,
    pub title: String,
    pub source_file: String,
    pub html_file: String,
}

impl Chapter {
    /// Builds a chapter from its kind, source file name, and the headings
    /// extracted from the file (see [`crate::markdown::extract_title`]).
    pub fn new(
        kind: ChapterKind,
        source_file: &str,
        main_title: &str,
        sub_title: &str,
        labels: &Labels,
    ) -> Chapter {
        let title = match kind {
            ChapterKind::Prologue | ChapterKind::Epilogue if !main_title.is_empty() => {
                main_title.to_owned()
            }
            ChapterKind::Prologue | ChapterKind::Epilogue => kind.label(labels),
            ChapterKind::Numbered { .. } if !sub_title.is_empty() => {
                format!("{} - {}", main_title, sub_title)
            }
            ChapterKind::Numbered { .. } => main_title.to_owned(),
        };
        let id = kind.id();
        Chapter {
            html_file: format!("{}{}", id, HTML_EXTENSION),
            id,
            kind,
            title,
            source_file: source_file.to_owned(),
        }
    }
}

/// The pieces of a volume folder name such as `Vol_07_Example_Name`.
#[derive(Clone, Debug, PartialEq)]
pub struct VolumeFolderName {
    pub num: u32,
    pub id: String,
    pub title: String,
}

/// Parses a volume folder name. Returns `None` for folders that don't follow
/// the `Vol_<number>_<name>` convention.
pub fn parse_volume_folder_name(folder_name: &str) -> Option<VolumeFolderName> {
    let captures = VOLUME_FOLDER.captures(folder_name)?;
    let num: u32 = captures[1].parse().ok()?;
    Some(VolumeFolderName {
        num,
        id: format!("vol-{:02}", num),
        title: captures[2].replace('_', " "),
    })
}

/// Classifies a manuscript file name. Returns `None` for files that are not
/// chapters at all.
pub fn parse_chapter_file_name(file_name: &str) -> Option<ChapterKind> {
    if file_name.starts_with("00_Prologue") {
        return Some(ChapterKind::Prologue);
    }
    if file_name.starts_with("Epilogue") {
        return Some(ChapterKind::Epilogue);
    }
    let captures = CHAPTER_FILE.captures(file_name)?;
    Some(ChapterKind::Numbered {
        chapter: captures[2].parse().ok()?,
        part: captures[3].parse().ok()?,
    })
}

/// Sorts chapters into reading order. The sort is stable, so chapters that
/// share a kind keep their scan order.
pub fn sort_chapters(chapters: &mut [Chapter]) {
    chapters.sort_by(|a, b| a.kind.cmp(&b.kind));
}
