// file: src/exporter/viewer.rs
// description: standalone html page embedding the highlighted pdf at its first matching page
// reference: RFC 3778 open parameters (#page, #zoom)

use crate::error::Result;
use crate::exporter::write_bytes;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;

pub struct ViewerPage {
    title: String,
    data: String,
    page: u32,
    zoom: u32,
}

impl ViewerPage {
    pub fn new(title: &str, pdf: &[u8], page: u32, zoom: u32) -> Self {
        Self {
            title: title.to_string(),
            data: STANDARD.encode(pdf),
            page: page.max(1),
            zoom,
        }
    }

    pub fn source(&self) -> String {
        format!(
            "data:application/pdf;base64,{}#page={}&zoom={}",
            self.data, self.page, self.zoom
        )
    }

    pub fn render(&self) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n\
             <body style=\"margin:0\">\n\
             <iframe src=\"{src}\" width=\"100%\" height=\"1000\" type=\"application/pdf\"></iframe>\n\
             </body>\n</html>\n",
            title = escape_html(&self.title),
            src = self.source()
        )
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        write_bytes(path, self.render().as_bytes())
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_anchors_first_page() {
        let viewer = ViewerPage::new("paper.pdf", b"%PDF", 3, 90);
        assert_eq!(
            viewer.source(),
            "data:application/pdf;base64,JVBERg==#page=3&zoom=90"
        );
    }

    #[test]
    fn test_render_escapes_title() {
        let html = ViewerPage::new("<a&b>.pdf", b"%PDF", 1, 90).render();
        assert!(html.contains("<title>&lt;a&amp;b&gt;.pdf</title>"));
        assert!(html.contains("<iframe src=\"data:application/pdf;base64,"));
    }

    #[test]
    fn test_page_zero_becomes_first_page() {
        let viewer = ViewerPage::new("x.pdf", b"", 0, 90);
        assert!(viewer.source().ends_with("#page=1&zoom=90"));
    }
}
