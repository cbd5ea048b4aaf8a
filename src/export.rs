//! Printable export of a shopping list.
//!
//! Rendering is pure; the only side effect lives in [`open_in_browser`],
//! which writes the document to a temp file and hands it to the OS browser.

use std::path::PathBuf;

use crate::api::types::{ShoppingListDetail, ShoppingListItem};
use crate::error::Result;

/// One display line per item: quantity, unit, name, space-joined, with
/// absent parts omitted. An item with neither quantity nor unit is just
/// its name.
pub fn format_item(item: &ShoppingListItem) -> String {
    let mut parts = Vec::new();
    if let Some(quantity) = item.quantity.as_deref().filter(|q| !q.is_empty()) {
        parts.push(quantity);
    }
    if let Some(unit) = item.unit.as_deref().filter(|u| !u.is_empty()) {
        parts.push(unit);
    }
    parts.push(&item.name);
    parts.join(" ")
}

/// All item lines joined with single newlines. Zero items yields "".
pub fn render_lines(items: &[ShoppingListItem]) -> String {
    items.iter().map(format_item).collect::<Vec<_>>().join("\n")
}

/// Minimal static HTML document: title is the list name, body is exactly one
/// preformatted block holding the joined lines verbatim.
///
/// Item text is embedded without HTML escaping, faithfully reproducing the
/// upstream behavior. Names containing markup characters therefore produce
/// malformed output; changing that is a product decision, not a bug fix.
pub fn render_document(list: &ShoppingListDetail) -> String {
    format!(
        "<html><head><title>{}</title></head><body><pre>{}</pre></body></html>",
        list.name,
        render_lines(&list.items),
    )
}

/// Render the list, write it next to the other temp files, and open it with
/// the default browser. The file is fully written and closed before the
/// browser is launched. Returns the path for display.
pub fn open_in_browser(list: &ShoppingListDetail) -> Result<PathBuf> {
    let document = render_document(list);
    let path = std::env::temp_dir().join(format!("shopping-list-{}.html", list.id));
    std::fs::write(&path, document)?;
    open::that(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn item(quantity: Option<&str>, unit: Option<&str>, name: &str) -> ShoppingListItem {
        ShoppingListItem {
            id: 1,
            name: name.to_string(),
            quantity: quantity.map(str::to_string),
            unit: unit.map(str::to_string),
        }
    }

    fn list_with_items(items: Vec<ShoppingListItem>) -> ShoppingListDetail {
        ShoppingListDetail {
            id: 1,
            name: "Test List".to_string(),
            created_at: "2026-01-15T00:00:00Z".to_string(),
            recipes: vec![],
            items,
        }
    }

    #[rstest]
    #[case(Some("2"), Some("cups"), "Flour", "2 cups Flour")]
    #[case(Some("1"), None, "Sugar", "1 Sugar")]
    #[case(None, Some("tbsp"), "Sugar", "tbsp Sugar")]
    #[case(None, None, "Salt", "Salt")]
    #[case(Some(""), Some(""), "Salt", "Salt")]
    fn test_format_item_omits_absent_parts(
        #[case] quantity: Option<&str>,
        #[case] unit: Option<&str>,
        #[case] name: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(format_item(&item(quantity, unit, name)), expected);
    }

    #[test]
    fn test_render_lines_joins_with_newlines() {
        let items = vec![
            item(Some("2"), Some("cups"), "Flour"),
            item(Some("1"), Some("tbsp"), "Sugar"),
            item(None, None, "Salt"),
        ];

        assert_eq!(render_lines(&items), "2 cups Flour\n1 tbsp Sugar\nSalt");
    }

    #[test]
    fn test_render_lines_empty() {
        assert_eq!(render_lines(&[]), "");
    }

    #[test]
    fn test_render_document_structure() {
        let list = list_with_items(vec![item(Some("2"), Some("cups"), "Flour")]);

        let document = render_document(&list);

        assert_eq!(
            document,
            "<html><head><title>Test List</title></head>\
             <body><pre>2 cups Flour</pre></body></html>"
        );
        // Exactly one pre block.
        assert_eq!(document.matches("<pre>").count(), 1);
        assert_eq!(document.matches("</pre>").count(), 1);
    }

    #[test]
    fn test_render_document_title_is_list_name() {
        let mut list = list_with_items(vec![]);
        list.name = "Weekly Groceries".to_string();

        let document = render_document(&list);

        assert!(document.contains("<title>Weekly Groceries</title>"));
    }

    #[test]
    fn test_render_document_no_items_has_empty_pre() {
        let document = render_document(&list_with_items(vec![]));

        assert!(document.contains("<pre></pre>"));
    }

    #[test]
    fn test_render_document_does_not_escape_markup() {
        let list = list_with_items(vec![item(None, None, "<b>Chili & Lime</b>")]);

        let document = render_document(&list);

        assert!(document.contains("<pre><b>Chili & Lime</b></pre>"));
    }
}
