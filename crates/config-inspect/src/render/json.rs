//! JSON renderer for report documents.
//!
//! Emits the registered styles and the block list, for tooling that builds
//! its own word processor output.

use tenantdoc_common::{FabricError, FabricResult};

use crate::document::Document;

/// Render a document as pretty-printed JSON.
pub fn render(document: &Document) -> FabricResult<String> {
    serde_json::to_string_pretty(document).map_err(|e| FabricError::Render {
        message: "failed to serialize document".to_string(),
        subject: None,
        source: Some(Box::new(e)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::STYLE_LIST_BULLET;

    #[test]
    fn renders_styles_and_blocks() {
        let mut doc = Document::new();
        doc.add_heading("Contracts", 1).unwrap();
        doc.add_paragraph("EPG web", STYLE_LIST_BULLET).unwrap();
        doc.add_picture("web.png", 18.0);

        let value: serde_json::Value = serde_json::from_str(&render(&doc).unwrap()).unwrap();
        assert_eq!(value["styles"][1]["name"], "List Bullet");
        assert_eq!(value["blocks"][0]["type"], "heading");
        assert_eq!(value["blocks"][0]["level"], 1);
        assert_eq!(value["blocks"][1]["style"], "List Bullet");
        assert_eq!(value["blocks"][2]["path"], "web.png");
    }
}
