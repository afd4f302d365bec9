//! Rendered listing page
//!
//! The markup is built inline; no templating engine. Just enough structure
//! to drive every form route from a browser.

use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use shelf_types::Item;

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let items = state.items.list().await.map_err(|e| {
        tracing::error!("Failed to render listing: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Html(render_listing(&items)))
}

fn render_listing(items: &[Item]) -> String {
    let mut rows = String::new();
    for item in items {
        let name = escape(&item.name);
        let description = escape(&item.description);
        rows.push_str(&format!(
            "<li>#{id} <strong>{name}</strong> {description}\n\
             <form method=\"post\" action=\"/items/{id}/update\">\
             <input name=\"name\" value=\"{name}\">\
             <input name=\"description\" value=\"{description}\">\
             <button>Update</button></form>\n\
             <form method=\"post\" action=\"/items/{id}/delete\">\
             <button>Delete</button></form></li>\n",
            id = item.id,
        ));
    }

    format!(
        "<!DOCTYPE html>\n\
         <html><head><title>Items</title></head><body>\n\
         <h1>Items</h1>\n\
         <form method=\"post\" action=\"/items\">\
         <input name=\"name\" placeholder=\"Name\">\
         <input name=\"description\" placeholder=\"Description\">\
         <button>Add</button></form>\n\
         <ul>\n{rows}</ul>\n\
         </body></html>\n"
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape(r#"<b onclick="x & y">"#),
            "&lt;b onclick=&quot;x &amp; y&quot;&gt;"
        );
    }

    #[test]
    fn listing_contains_every_item_and_its_forms() {
        let items = vec![
            Item {
                id: 1,
                name: "hammer".to_string(),
                description: "claw".to_string(),
            },
            Item {
                id: 2,
                name: "<script>".to_string(),
                description: String::new(),
            },
        ];

        let page = render_listing(&items);
        assert!(page.contains("hammer"));
        assert!(page.contains("/items/1/update"));
        assert!(page.contains("/items/2/delete"));
        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;"));
    }
}
