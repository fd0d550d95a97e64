//! Markdown renderer.
//!
//! Produces Pandoc-flavoured Markdown so the report converts cleanly to a
//! word processor file:
//!   pandoc report.md -o report.docx
//!
//! Paragraphs in a custom style become `custom-style` fenced divs, pictures
//! carry a `width` attribute, and the level 0 heading is the title.

use crate::document::{Block, Document, STYLE_LIST_BULLET, STYLE_LIST_BULLET_2, STYLE_NORMAL};

/// Render a document as Markdown.
pub fn render(document: &Document) -> String {
    let mut out = String::with_capacity(4096);
    let mut in_list = false;

    for block in document.blocks() {
        let bullet = match block {
            Block::Paragraph { style, .. } if style == STYLE_LIST_BULLET => Some(""),
            Block::Paragraph { style, .. } if style == STYLE_LIST_BULLET_2 => Some("  "),
            _ => None,
        };

        if in_list && bullet.is_none() {
            out.push('\n');
        }
        in_list = bullet.is_some();

        match block {
            Block::Heading { text, level } => {
                out.push_str(&"#".repeat(usize::from(*level) + 1));
                out.push(' ');
                out.push_str(&escape(text));
                out.push_str("\n\n");
            }
            Block::Paragraph { text, .. } if bullet.is_some() => {
                out.push_str(bullet.unwrap_or_default());
                out.push_str("- ");
                out.push_str(&escape(text));
                out.push('\n');
            }
            Block::Paragraph { text, .. } if text.is_empty() => {}
            Block::Paragraph { text, style } if style == STYLE_NORMAL => {
                out.push_str(&escape(text));
                out.push_str("\n\n");
            }
            Block::Paragraph { text, style } => {
                out.push_str(&format!("::: {{custom-style=\"{}\"}}\n", style));
                out.push_str(&escape(text));
                out.push_str("\n:::\n\n");
            }
            Block::Picture { path, width_cm } => {
                out.push_str(&format!(
                    "![](<{}>){{width={}cm}}\n\n",
                    path.display(),
                    width_cm
                ));
            }
        }
    }

    if in_list {
        out.push('\n');
    }
    out
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']' | '<' | '>') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ParagraphStyle;

    fn sample() -> Document {
        let mut doc = Document::new();
        doc.register_style(ParagraphStyle::new("Code Style").with_font("Cambria", 11.0))
            .unwrap();
        doc.add_heading("ACI Configuration for tenant acme", 0).unwrap();
        doc.add_heading("prod", 3).unwrap();
        doc.add_paragraph("The following bridge domains are defined in this VRF:", "Code Style")
            .unwrap();
        doc.add_paragraph("web. subnets: 10.0.0.1/24", STYLE_LIST_BULLET)
            .unwrap();
        doc.add_paragraph("exported subnets: 10.0.0.0/8", STYLE_LIST_BULLET_2)
            .unwrap();
        doc.add_paragraph("Bridge Domain: web", STYLE_NORMAL).unwrap();
        doc.add_picture("prod.png", 18.0);
        doc
    }

    #[test]
    fn renders_blocks() {
        let md = render(&sample());
        let expected = "# ACI Configuration for tenant acme\n\n\
                        #### prod\n\n\
                        ::: {custom-style=\"Code Style\"}\n\
                        The following bridge domains are defined in this VRF:\n\
                        :::\n\n\
                        - web. subnets: 10.0.0.1/24\n  \
                        - exported subnets: 10.0.0.0/8\n\n\
                        Bridge Domain: web\n\n\
                        ![](<prod.png>){width=18cm}\n\n";
        assert_eq!(md, expected);
    }

    #[test]
    fn trailing_list_is_terminated() {
        let mut doc = Document::new();
        doc.add_paragraph("EPG web", STYLE_LIST_BULLET).unwrap();
        assert_eq!(render(&doc), "- EPG web\n\n");
    }

    #[test]
    fn escapes_markdown_syntax() {
        assert_eq!(
            escape("pathep-[eth1/1] web_tier"),
            "pathep-\\[eth1/1\\] web\\_tier"
        );
    }
}
