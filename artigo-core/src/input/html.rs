//! Readable-text extraction from HTML pages.
//!
//! Two stages: harvest the text of content-bearing tags outside of page
//! chrome, and if that yields too little, fall back to the whole-page text
//! with blank lines removed. The caller decides whether the final result
//! is long enough to use.

use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;

/// Tags whose subtrees never contribute article text.
const CHROME_TAGS: [&str; 7] = ["script", "style", "nav", "footer", "header", "aside", "form"];

/// Content paragraphs shorter than this are treated as navigation noise.
const MIN_FRAGMENT_CHARS: usize = 20;

/// Below this many characters the content-tag harvest is considered to have
/// missed the article body.
pub const MIN_PAGE_CHARS: usize = 100;

static CONTENT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("p, h1, h2, h3, article, section").expect("valid selector")
});

/// Extracts the readable text of an HTML document.
///
/// May return fewer than [`MIN_PAGE_CHARS`] characters; callers must treat
/// that as "no usable content".
pub fn extract_readable_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut fragments = Vec::new();
    for element in document.select(&CONTENT_SELECTOR) {
        if inside_chrome(element) {
            continue;
        }
        let text = element.text().collect::<String>();
        let text = text.trim();
        if text.chars().count() > MIN_FRAGMENT_CHARS {
            fragments.push(text.to_string());
        }
    }

    let harvested = fragments.join("\n\n");
    if harvested.chars().count() >= MIN_PAGE_CHARS {
        return harvested;
    }

    whole_page_text(&document)
}

fn inside_chrome(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| CHROME_TAGS.contains(&ancestor.value().name()))
}

/// Whole-page text with chrome subtrees skipped and blank lines removed.
fn whole_page_text(document: &Html) -> String {
    let mut lines = Vec::new();

    for node in document.root_element().descendants() {
        if let Node::Text(text) = node.value() {
            let in_chrome = node
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|ancestor| CHROME_TAGS.contains(&ancestor.value().name()));
            if in_chrome {
                continue;
            }
            for line in text.lines() {
                let line = line.trim();
                if !line.is_empty() {
                    lines.push(line.to_string());
                }
            }
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harvests_paragraphs() {
        let body = "Conteudo do Artigo Cientifico ".repeat(5);
        let html = format!("<html><body><p>{body}</p></body></html>");
        let text = extract_readable_text(&html);
        assert!(text.contains("Conteudo do Artigo Cientifico"));
    }

    #[test]
    fn test_skips_navigation_and_scripts() {
        let article = "Texto principal do artigo com conteúdo suficiente para contar. ".repeat(3);
        let html = format!(
            "<html><body>\
             <nav><p>Menu inicial com muitos links e texto de navegação</p></nav>\
             <script>var x = 'nunca deveria aparecer no texto extraído';</script>\
             <p>{article}</p>\
             </body></html>"
        );
        let text = extract_readable_text(&html);
        assert!(text.contains("Texto principal"));
        assert!(!text.contains("Menu inicial"));
        assert!(!text.contains("nunca deveria aparecer"));
    }

    #[test]
    fn test_falls_back_to_whole_page_text() {
        // No content tags at all, but a body with plenty of loose text.
        let loose = "linha de texto solta no corpo da pagina\n".repeat(10);
        let html = format!("<html><body><div>{loose}</div></body></html>");
        let text = extract_readable_text(&html);
        assert!(text.contains("linha de texto solta"));
        assert!(!text.contains("\n\n"), "blank lines should be removed");
    }

    #[test]
    fn test_short_fragments_are_ignored_in_harvest() {
        let html = "<html><body><p>curto</p></body></html>";
        let text = extract_readable_text(html);
        // Falls back to whole-page text, which still contains the word.
        assert!(text.chars().count() < MIN_PAGE_CHARS);
    }
}
