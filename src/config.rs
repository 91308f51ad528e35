//! Loads the project configuration from a `quill.yaml` file. Every field has
//! a default except the site title, so a minimal project file is a single
//! line.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "quill.yaml";

/// The translation table for volume titles that ships with `quill`. Entries
/// from the project file's `volume_subtitles` are merged over it.
const DEFAULT_VOLUME_SUBTITLES: &[(&str, &str)] = &[
    ("Ghost Signal", "幽靈訊號"),
    ("Memory Vendor", "記憶販賣者"),
    ("The Non Existent Floor", "不存在的樓層"),
    ("Steel Lullaby", "鋼鐵搖籃曲"),
    ("The Fake Expo", "虛假的博覽會"),
];

/// A phase as declared in the project file. Scanning a phase turns it into a
/// [`crate::manuscript::Phase`].
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct PhaseConfig {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: String,

    /// The phase's folder, relative to the source directory.
    pub source_folder: String,

    /// The inclusive range of volume numbers expected in this phase. Volumes
    /// outside of it are still built, but a warning is logged.
    #[serde(default)]
    pub volume_range: Option<(u32, u32)>,
}

impl PhaseConfig {
    fn new(
        id: &str,
        title: &str,
        subtitle: &str,
        description: &str,
        source_folder: &str,
        volume_range: (u32, u32),
    ) -> PhaseConfig {
        PhaseConfig {
            id: id.to_owned(),
            title: title.to_owned(),
            subtitle: subtitle.to_owned(),
            description: description.to_owned(),
            source_folder: source_folder.to_owned(),
            volume_range: Some(volume_range),
        }
    }
}

fn default_phases() -> Vec<PhaseConfig> {
    vec![
        PhaseConfig::new(
            "phase-01",
            "都市傳說篇",
            "Urban Legend",
            "為了賺藥錢而奔波的日常冒險",
            "Phase_01_Urban_Legend",
            (1, 7),
        ),
        PhaseConfig::new(
            "phase-02",
            "記憶迷宮篇",
            "Memory Labyrinth",
            "艾倫開始察覺記憶的斷層",
            "Phase_02_Memory_Labyrinth",
            (8, 15),
        ),
        PhaseConfig::new(
            "phase-03",
            "量子戰爭篇",
            "Quantum War",
            "七大企業與地下勢力全面開戰",
            "Phase_03_Quantum_War",
            (16, 30),
        ),
        PhaseConfig::new(
            "phase-04",
            "創世紀重構篇",
            "Genesis Reconstruction",
            "與世界創造者的對話",
            "Phase_04_Genesis",
            (31, 99),
        ),
    ]
}

/// Fallback display names for chapters without a title of their own.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Labels {
    #[serde(default = "Labels::default_prologue")]
    pub prologue: String,
    #[serde(default = "Labels::default_epilogue")]
    pub epilogue: String,
}

impl Labels {
    fn default_prologue() -> String {
        String::from("序章")
    }

    fn default_epilogue() -> String {
        String::from("終章")
    }
}

impl Default for Labels {
    fn default() -> Self {
        Labels {
            prologue: Labels::default_prologue(),
            epilogue: Labels::default_epilogue(),
        }
    }
}

/// A selling-point card on the home page.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Feature {
    #[serde(default)]
    pub icon: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Site-wide copy that every page template has access to.
#[derive(Clone, Debug, PartialEq)]
pub struct Site {
    pub title: String,
    pub subtitle: String,

    /// The navbar logo text.
    pub brand: String,
    pub tagline: String,
    pub quote: String,

    /// The home page's `<meta name="description">`.
    pub description: String,
    pub features: Vec<Feature>,
    pub copyright: String,
    pub language: String,

    /// The prefix for the reader's browser storage keys.
    pub storage_prefix: String,
}

#[derive(Deserialize)]
struct Project {
    title: String,
    #[serde(default)]
    subtitle: String,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    tagline: String,
    #[serde(default)]
    quote: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    features: Vec<Feature>,
    #[serde(default)]
    copyright: Option<String>,
    #[serde(default)]
    language: Language,

    #[serde(default)]
    source_directory: PathBuf,
    #[serde(default)]
    output_directory: OutputDirectory,
    #[serde(default)]
    theme_directory: Option<PathBuf>,

    #[serde(default)]
    storage_prefix: StoragePrefix,
    #[serde(default)]
    excluded_keywords: ExcludedKeywords,
    #[serde(default)]
    labels: Labels,
    #[serde(default = "default_phases")]
    phases: Vec<PhaseConfig>,
    #[serde(default)]
    volume_subtitles: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct Language(String);
impl Default for Language {
    fn default() -> Self {
        Language(String::from("zh-TW"))
    }
}

#[derive(Deserialize)]
struct OutputDirectory(PathBuf);
impl Default for OutputDirectory {
    fn default() -> Self {
        OutputDirectory(PathBuf::from("website"))
    }
}

#[derive(Deserialize)]
struct StoragePrefix(String);
impl Default for StoragePrefix {
    fn default() -> Self {
        StoragePrefix(String::from("quantum-agent"))
    }
}

#[derive(Deserialize)]
struct ExcludedKeywords(Vec<String>);
impl Default for ExcludedKeywords {
    fn default() -> Self {
        ExcludedKeywords(
            ["Outline", "Summary", "人設"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }
}

/// The resolved configuration for a build. All paths are absolute or relative
/// to the working directory, never to the project file.
#[derive(Clone, Debug)]
pub struct Config {
    pub site: Site,
    pub source_directory: PathBuf,
    pub output_directory: PathBuf,
    pub theme_directory: Option<PathBuf>,
    pub excluded_keywords: Vec<String>,
    pub labels: Labels,
    pub phases: Vec<PhaseConfig>,
    pub volume_subtitles: BTreeMap<String, String>,
}

impl Config {
    /// Searches `dir` and then each of its ancestors for a `quill.yaml` file
    /// and loads the first one found. A relative `dir` is resolved first, so
    /// `.` still reaches the real parent directories.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let dir = dir
            .canonicalize()
            .with_context(|| format!("Resolving project directory `{}`", dir.display()))?;
        for candidate in dir.ancestors() {
            let path = candidate.join(PROJECT_FILE);
            if path.is_file() {
                return Config::from_project_file(&path)
                    .with_context(|| format!("Loading configuration from `{}`", path.display()));
            }
        }
        Err(anyhow!(
            "Could not find `{}` in `{}` or any parent directory",
            PROJECT_FILE,
            dir.display()
        ))
    }

    /// Loads the configuration from a specific project file. Relative paths
    /// inside the file are resolved against the file's directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        use crate::util::open;
        let project: Project = serde_yaml::from_reader(open(path, "project")?)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => Ok(Config::resolve(project, project_root)),
        }
    }

    fn resolve(project: Project, project_root: &Path) -> Config {
        let brand = match project.brand {
            Some(brand) => brand,
            None => default_brand(&project.title, &project.subtitle),
        };
        let copyright = match project.copyright {
            Some(copyright) => copyright,
            None => format!("© {}. All rights reserved.", project.title),
        };

        let mut volume_subtitles: BTreeMap<String, String> = DEFAULT_VOLUME_SUBTITLES
            .iter()
            .map(|(title, subtitle)| (title.to_string(), subtitle.to_string()))
            .collect();
        volume_subtitles.extend(project.volume_subtitles);

        Config {
            site: Site {
                title: project.title,
                subtitle: project.subtitle,
                brand,
                tagline: project.tagline,
                quote: project.quote,
                description: project.description,
                features: project.features,
                copyright,
                language: project.language.0,
                storage_prefix: project.storage_prefix.0,
            },
            source_directory: project_root.join(project.source_directory),
            output_directory: project_root.join(project.output_directory.0),
            theme_directory: project
                .theme_directory
                .map(|relpath| project_root.join(relpath)),
            excluded_keywords: project.excluded_keywords.0,
            labels: project.labels,
            phases: project.phases,
            volume_subtitles,
        }
    }

    /// Replaces the output directory, e.g. with one passed on the command line.
    pub fn with_output_directory(mut self, output_directory: PathBuf) -> Config {
        self.output_directory = output_directory;
        self
    }

    /// Looks up the subtitle for a volume title, returning an empty string for
    /// titles missing from the table.
    pub fn volume_subtitle(&self, title: &str) -> &str {
        self.volume_subtitles
            .get(title)
            .map(String::as_str)
            .unwrap_or("")
    }
}

// "Quantum Agent: Code Reconstruction" -> "QUANTUM AGENT"
fn default_brand(title: &str, subtitle: &str) -> String {
    match subtitle.split(':').next().map(str::trim) {
        Some(prefix) if !prefix.is_empty() => prefix.to_uppercase(),
        _ => title.to_owned(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn testdata() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/project")
    }

    #[test]
    fn test_from_project_file() -> Result<()> {
        let root = testdata();
        let config = Config::from_project_file(&root.join(PROJECT_FILE))?;

        assert_eq!("機僕駭客：量子特務", config.site.title);
        assert_eq!("QUANTUM AGENT", config.site.brand);
        assert_eq!("zh-TW", config.site.language);
        assert_eq!("quantum-agent", config.site.storage_prefix);
        assert_eq!(root.join("manuscript"), config.source_directory);
        assert_eq!(root.join("website"), config.output_directory);
        assert_eq!(None, config.theme_directory);
        assert_eq!(2, config.phases.len());
        assert_eq!(Some((1, 7)), config.phases[0].volume_range);
        assert_eq!(Labels::default(), config.labels);
        Ok(())
    }

    #[test]
    fn test_volume_subtitles_merge_over_defaults() -> Result<()> {
        let config = Config::from_project_file(&testdata().join(PROJECT_FILE))?;
        assert_eq!("幽靈訊號", config.volume_subtitle("Ghost Signal"));
        assert_eq!("測試圖樣", config.volume_subtitle("Test Pattern"));
        assert_eq!("", config.volume_subtitle("Unknown Title"));
        Ok(())
    }

    #[test]
    fn test_from_directory_searches_parents() -> Result<()> {
        let nested = testdata().join("manuscript/Phase_01_Urban_Legend");
        let config = Config::from_directory(&nested)?;
        assert_eq!("機僕駭客：量子特務", config.site.title);
        Ok(())
    }

    #[test]
    fn test_from_directory_resolves_relative_paths() -> Result<()> {
        let root = testdata();
        let relative = root
            .strip_prefix(env!("CARGO_MANIFEST_DIR"))?
            .join("manuscript/./Phase_01_Urban_Legend");
        assert!(relative.is_relative());

        let config = Config::from_directory(&relative)?;
        assert!(config.source_directory.is_absolute());
        assert_eq!(root.canonicalize()?.join("manuscript"), config.source_directory);
        Ok(())
    }

    #[test]
    fn test_from_directory_missing_directory() {
        assert!(Config::from_directory(&testdata().join("no-such-dir")).is_err());
    }

    #[test]
    fn test_brand_and_copyright_overrides() -> Result<()> {
        let project: Project =
            serde_yaml::from_str("title: Example\nbrand: EX\ncopyright: (c) Someone")?;
        let config = Config::resolve(project, Path::new("/srv/novel"));
        assert_eq!("EX", config.site.brand);
        assert_eq!("(c) Someone", config.site.copyright);
        Ok(())
    }

    #[test]
    fn test_minimal_project_uses_defaults() -> Result<()> {
        let project: Project = serde_yaml::from_str("title: Example")?;
        let config = Config::resolve(project, Path::new("/srv/novel"));

        assert_eq!("Example", config.site.brand);
        assert_eq!("© Example. All rights reserved.", config.site.copyright);
        assert_eq!(PathBuf::from("/srv/novel/website"), config.output_directory);
        assert_eq!(4, config.phases.len());
        assert_eq!("Phase_04_Genesis", config.phases[3].source_folder);
        assert_eq!(
            vec!["Outline", "Summary", "人設"],
            config.excluded_keywords
        );
        Ok(())
    }

    #[test]
    fn test_with_output_directory() -> Result<()> {
        let project: Project = serde_yaml::from_str("title: Example")?;
        let config = Config::resolve(project, Path::new("/srv/novel"))
            .with_output_directory(PathBuf::from("/tmp/out"));
        assert_eq!(PathBuf::from("/tmp/out"), config.output_directory);
        Ok(())
    }
}
