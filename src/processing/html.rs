//! HTML metadata extraction and HTML → markdown conversion

use std::path::Path;

use scraper::ElementRef;
use scraper::Html;
use scraper::Selector;

use crate::errors::AllycatError;
use crate::errors::Result;

/// Page-level metadata taken from the HTML head and file name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub content_type: String,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| AllycatError::ProcessingError(format!("Invalid selector {css:?}: {e:?}")))
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Classify a page by its file name
pub fn content_type_for(path: &Path) -> &'static str {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if filename.contains("members") {
        "member_list"
    } else if filename.contains("about") {
        "about"
    } else if filename.contains("news") {
        "news"
    } else {
        "unknown"
    }
}

/// Extract title, meta description and content type
pub fn extract_metadata(html: &str, path: &Path) -> Result<PageMetadata> {
    let document = Html::parse_document(html);

    let title = document
        .select(&selector("title")?)
        .next()
        .map(|t| element_text(&t))
        .unwrap_or_default();

    let description = document
        .select(&selector(r#"meta[name="description"]"#)?)
        .next()
        .and_then(|m| m.value().attr("content"))
        .unwrap_or_default()
        .trim()
        .to_string();

    Ok(PageMetadata {
        title,
        description,
        content_type: content_type_for(path).to_string(),
    })
}

/// Convert the main content of a page to markdown
///
/// The root is `<main>`, falling back to `<body>`. Output lists all headings
/// first, then paragraphs and lists in document order, then links.
pub fn html_to_markdown(html: &str) -> Result<String> {
    let document = Html::parse_document(html);

    let root = match document.select(&selector("main")?).next() {
        Some(main) => main,
        None => match document.select(&selector("body")?).next() {
            Some(body) => body,
            None => return Ok(String::new()),
        },
    };

    let mut lines: Vec<String> = Vec::new();

    for heading in root.select(&selector("h1, h2, h3, h4, h5, h6")?) {
        let level = heading.value().name()[1..].parse::<usize>().unwrap_or(1);
        lines.push(format!("{} {}", "#".repeat(level), element_text(&heading)));
        lines.push(String::new());
    }

    let li = selector("li")?;
    for block in root.select(&selector("p, ul, ol")?) {
        if block.value().name() == "p" {
            let text = element_text(&block);
            if !text.is_empty() {
                lines.push(text);
                lines.push(String::new());
            }
        } else {
            for item in block.select(&li) {
                let text = element_text(&item);
                if !text.is_empty() {
                    lines.push(format!("- {text}"));
                }
            }
            lines.push(String::new());
        }
    }

    for link in root.select(&selector("a")?) {
        let text = element_text(&link);
        let href = link.value().attr("href").unwrap_or_default();
        if !text.is_empty() && !href.is_empty() {
            lines.push(format!("[{text}]({href})"));
        }
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>
    About the AI Alliance
  </title>
  <meta name="description" content="Open, safe and responsible AI">
</head>
<body>
  <nav><a href="/ignored">Nav</a></nav>
  <main>
    <h1>About</h1>
    <p>The AI Alliance is a community.</p>
    <h2>Members</h2>
    <ul><li>IBM</li><li> </li><li>Meta</li></ul>
    <p>   </p>
    <p>See <a href="/members">the member list</a>.</p>
  </main>
</body>
</html>"#;

    #[test]
    fn test_extract_metadata() {
        let meta = extract_metadata(PAGE, Path::new("crawled/about_text.html")).unwrap();
        assert_eq!(meta.title, "About the AI Alliance");
        assert_eq!(meta.description, "Open, safe and responsible AI");
        assert_eq!(meta.content_type, "about");
    }

    #[test]
    fn test_extract_metadata_missing_fields() {
        let meta = extract_metadata("<p>hi</p>", Path::new("x/index_text.html")).unwrap();
        assert_eq!(meta, PageMetadata {
            title: String::new(),
            description: String::new(),
            content_type: "unknown".to_string(),
        });
    }

    #[test]
    fn test_content_type_precedence() {
        assert_eq!(content_type_for(Path::new("members_about_text.html")), "member_list");
        assert_eq!(content_type_for(Path::new("NEWS_2025_text.html")), "news");
        assert_eq!(content_type_for(Path::new("blog_text.html")), "unknown");
    }

    #[test]
    fn test_html_to_markdown_uses_main() {
        let markdown = html_to_markdown(PAGE).unwrap();
        let expected = [
            "# About",
            "",
            "## Members",
            "",
            "The AI Alliance is a community.",
            "",
            "- IBM",
            "- Meta",
            "",
            "See the member list.",
            "",
            "[the member list](/members)",
        ]
        .join("\n");
        assert_eq!(markdown, expected);
        assert!(!markdown.contains("Nav"));
    }

    #[test]
    fn test_html_to_markdown_falls_back_to_body() {
        let markdown = html_to_markdown("<html><body><p>Only body</p></body></html>").unwrap();
        assert_eq!(markdown, "Only body\n");
    }

    #[test]
    fn test_html_to_markdown_empty_page() {
        assert_eq!(html_to_markdown("").unwrap(), "");
    }
}
