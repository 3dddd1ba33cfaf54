//! Server-side HTML rendering. Plain string assembly over a shared layout;
//! everything user-supplied goes through [`escape`].

use crate::controllers::search::SearchOutcome;
use crate::models::{Paste, PasteSummary};

/// Canonical timestamp format, matching what the store writes.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn index(pastes: &[PasteSummary]) -> String {
    let mut body = String::from(
        "<h1>pastedump</h1>\n\
         <form action=\"/paste\" method=\"post\">\n\
         <p><input name=\"title\" placeholder=\"Title (optional)\"></p>\n\
         <p><textarea name=\"content\" rows=\"12\" cols=\"80\" required></textarea></p>\n\
         <p><input name=\"expires_in\" placeholder=\"Expires in minutes (optional)\">\n\
         <button type=\"submit\">Paste</button></p>\n\
         </form>\n\
         <h2>Recent pastes</h2>\n",
    );

    if pastes.is_empty() {
        body.push_str("<p>Nothing here yet.</p>\n");
    } else {
        body.push_str("<ul>\n");
        for paste in pastes {
            body.push_str(&format!(
                "<li><a href=\"/paste/{id}\">{title}</a> <small>{created_at}</small></li>\n",
                id = paste.id,
                title = escape(&paste.title),
                created_at = paste.created_at.format(TIMESTAMP_FORMAT),
            ));
        }
        body.push_str("</ul>\n");
    }

    layout("Home", &body)
}

pub fn paste(paste: &Paste) -> String {
    let mut body = format!(
        "<h1>{title}</h1>\n\
         <p><small>{id} &middot; created {created_at} &middot; {views} views</small></p>\n",
        title = escape(&paste.title),
        id = paste.id,
        created_at = paste.created_at.format(TIMESTAMP_FORMAT),
        views = paste.views(),
    );

    if let Some(expires_at) = paste.expires_at() {
        body.push_str(&format!(
            "<p><small>expires {}</small></p>\n",
            expires_at.format(TIMESTAMP_FORMAT)
        ));
    }

    body.push_str(&format!(
        "<pre>{content}</pre>\n<p><a href=\"/paste/{id}/raw\">raw</a></p>\n",
        content = escape(&paste.content),
        id = paste.id,
    ));

    layout(&paste.title, &body)
}

pub fn search(query: &str, outcome: &SearchOutcome) -> String {
    let mut body = format!(
        "<h1>Search</h1>\n\
         <form action=\"/search\" method=\"get\">\n\
         <p><input name=\"q\" value=\"{query}\" placeholder=\"Paste id\">\n\
         <button type=\"submit\">Search</button></p>\n\
         </form>\n",
        query = escape(query),
    );

    if let Some(message) = outcome.message {
        body.push_str(&format!("<p>{message}</p>\n"));
    }

    if !outcome.hits.is_empty() {
        body.push_str("<ul>\n");
        for hit in &outcome.hits {
            body.push_str(&format!(
                "<li><a href=\"/paste/{id}\">{title}</a> <small>{created_at}</small></li>\n",
                id = hit.id,
                title = escape(&hit.title),
                created_at = hit.created_at,
            ));
        }
        body.push_str("</ul>\n");
    }

    layout("Search", &body)
}

pub fn about(source: &str) -> String {
    layout("About", &markdown::to_html(source))
}

pub fn not_found() -> String {
    layout(
        "Not found",
        "<h1>404</h1>\n<p>No such paste. It may have expired.</p>\n\
         <p><a href=\"/\">Back to the front page</a></p>\n",
    )
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title} &ndash; pastedump</title>\n\
         </head>\n\
         <body>\n\
         <nav><a href=\"/\">home</a> &middot; <a href=\"/search\">search</a> &middot; \
         <a href=\"/about\">about</a></nav>\n\
         {body}\n\
         </body>\n\
         </html>\n",
        title = escape(title),
    )
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a & b"), "a &amp; b");
        assert_eq!(
            escape("<script>\"x\"</script>"),
            "&lt;script&gt;&quot;x&quot;&lt;/script&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_paste_page_escapes_content() {
        let page = paste(&Paste {
            id: "ab12cd34".to_string(),
            title: "<b>title</b>".to_string(),
            content: "<script>alert(1)</script>".to_string(),
            created_at: Utc::now(),
            expires_in: None,
            views: Some(4),
        });

        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(page.contains("&lt;b&gt;title&lt;/b&gt;"));
        assert!(page.contains("4 views"));
        assert!(page.contains("/paste/ab12cd34/raw"));
    }

    #[test]
    fn test_index_lists_pastes() {
        let page = index(&[PasteSummary {
            id: "ab12cd34".to_string(),
            title: "hello".to_string(),
            created_at: Utc::now(),
        }]);
        assert!(page.contains("<a href=\"/paste/ab12cd34\">hello</a>"));
    }

    #[test]
    fn test_empty_index_has_placeholder() {
        assert!(index(&[]).contains("Nothing here yet."));
    }

    #[test]
    fn test_not_found_page() {
        assert!(not_found().contains("404"));
    }

    #[test]
    fn test_about_renders_markdown() {
        let page = about("# pastedump\n\nsome *text*");
        assert!(page.contains("<h1>pastedump</h1>"));
    }
}
