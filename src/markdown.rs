//! The manuscript's Markdown dialect. Chapter bodies are converted line by
//! line: headings are dropped, every other non-blank line becomes a paragraph,
//! and bold, italic, and inline code are the only inline markup recognized.

use lazy_static::lazy_static;
use pulldown_cmark::{Event, Parser, Tag};
use regex::Regex;

lazy_static! {
    static ref H1: Regex = Regex::new(r"^#\s+(.+)$").unwrap();
    static ref H2: Regex = Regex::new(r"^##\s+(?:\[Part\s*\d+\]\s*)?(.+)$").unwrap();
    static ref STRONG: Regex = Regex::new(r"\*\*(.+?)\*\*").unwrap();
    static ref EMPHASIS: Regex = Regex::new(r"\*(.+?)\*").unwrap();
    static ref CODE: Regex = Regex::new(r"`(.+?)`").unwrap();
}

/// The headings a chapter file opens with.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Title {
    /// The text of the last `#` heading before the first `##` heading.
    pub main: String,

    /// The text of the first `##` heading, less any `[Part N]` prefix.
    pub sub: String,
}

/// Extracts the main title and subtitle from a chapter's headings. Scanning
/// stops at the first `##` heading.
pub fn extract_title(content: &str) -> Title {
    let mut title = Title::default();
    for line in content.lines() {
        if let Some(captures) = H1.captures(line) {
            title.main = captures[1].to_owned();
            continue;
        }
        if let Some(captures) = H2.captures(line) {
            title.sub = captures[1].to_owned();
            break;
        }
    }
    title
}

/// Converts a chapter body to HTML, one indented `<p>` element per non-blank,
/// non-heading line.
pub fn to_html(content: &str) -> String {
    let mut html = String::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let processed = STRONG.replace_all(trimmed, "<strong>$1</strong>");
        let processed = EMPHASIS.replace_all(&processed, "<em>$1</em>");
        let processed = CODE.replace_all(&processed, "<code>$1</code>");

        html.push_str("      <p>");
        html.push_str(&processed);
        html.push_str("</p>\n");
    }
    html
}

/// Returns the plain text of the first paragraph that isn't part of a
/// heading, or an empty string if there is none. Volume outlines use this to
/// supply the volume description.
pub fn first_paragraph(content: &str) -> String {
    let mut text = String::new();
    let mut in_paragraph = false;
    for ev in Parser::new(content) {
        match ev {
            Event::Start(Tag::Paragraph) => in_paragraph = true,
            Event::End(Tag::Paragraph) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    return trimmed.to_owned();
                }
                text.clear();
                in_paragraph = false;
            }
            Event::Text(s) | Event::Code(s) if in_paragraph => text.push_str(&s),
            Event::SoftBreak | Event::HardBreak if in_paragraph => text.push(' '),
            _ => {}
        }
    }
    String::new()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_extract_title() {
        let title = extract_title("# 第一章 幽靈訊號\n\n## [Part 1] 午夜來電\n\n## 其他\n");
        assert_eq!("第一章 幽靈訊號", title.main);
        assert_eq!("午夜來電", title.sub);
    }

    #[test]
    fn test_extract_title_last_h1_before_h2_wins() {
        let title = extract_title("# Draft\r\n# Final\r\n## Part\r\n# Ignored\r\n");
        assert_eq!("Final", title.main);
        assert_eq!("Part", title.sub);
    }

    #[test]
    fn test_extract_title_without_headings() {
        assert_eq!(Title::default(), extract_title("just prose\n"));
    }

    #[test]
    fn test_to_html() {
        let html = to_html("# Title\n\n  **Bold** and *soft* and `code`  \n\n#Tag\nplain\n");
        assert_eq!(
            concat!(
                "      <p><strong>Bold</strong> and <em>soft</em> and <code>code</code></p>\n",
                "      <p>plain</p>\n",
            ),
            html
        );
    }

    #[test]
    fn test_to_html_is_line_local() {
        // Markup never spans lines and list markers are not recognized.
        let html = to_html("*open\nclose*\n- item\n");
        assert_eq!(
            "      <p>*open</p>\n      <p>close*</p>\n      <p>- item</p>\n",
            html
        );
    }

    #[test]
    fn test_to_html_empty() {
        assert_eq!("", to_html("\n\n# Only a heading\n"));
    }

    #[test]
    fn test_first_paragraph() {
        let outline = "# Vol 01 Outline\n\n## 概要\n\n主角接到一通\n來自過去的電話。\n\n第二段\n";
        assert_eq!("主角接到一通 來自過去的電話。", first_paragraph(outline));
    }

    #[test]
    fn test_first_paragraph_missing() {
        assert_eq!("", first_paragraph("# Heading only\n"));
    }
}
