//! HTML rendering for resolved import records.
//!
//! The document varies on exactly two axes: proxy vs. direct records
//! (`mod` meta tag vs. `vcs`/`root`), and tool vs. browser requests
//! (tools parse the meta tag and discard everything else; browsers get
//! a meta-refresh to the documentation viewer and a readable body).

use std::fmt::Write;

use crate::store::ImportRecord;

/// Documentation viewer the browser variant redirects to.
const DOC_VIEWER: &str = "https://godoc.org/";

/// Seconds before the browser meta-refresh fires.
const REFRESH_DELAY_SECS: u32 = 10;

/// Render the import document for `record`.
///
/// `from_tool` is true when the request carried `go-get=1`. All record
/// fields originate from network- or file-supplied data and are escaped
/// before being embedded in markup.
pub fn import_page(record: &ImportRecord, from_tool: bool) -> String {
    let prefix = escape(&record.prefix);
    let doc_url = format!("{DOC_VIEWER}{prefix}");

    let mut page = String::with_capacity(512);
    page.push_str("<!DOCTYPE html>\n<html>\n  <head>\n");

    if record.proxy.is_empty() {
        let _ = writeln!(
            page,
            r#"    <meta name="go-import" content="{prefix} {} {}">"#,
            escape(&record.vcs),
            escape(&record.root),
        );
    } else {
        let _ = writeln!(
            page,
            r#"    <meta name="go-import" content="{prefix} mod {}">"#,
            escape(&record.proxy),
        );
    }

    if !from_tool {
        page.push_str(
            "    <meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\" />\n",
        );
        let _ = writeln!(
            page,
            r#"    <meta http-equiv="refresh" content="{REFRESH_DELAY_SECS}; url={doc_url}" />"#,
        );
    }

    page.push_str("  </head>\n  <body>\n");

    if !from_tool {
        let _ = writeln!(
            page,
            "    <div>\n      <h1>{prefix} Found</h1>\n      \
             <p>Documentation at <a href=\"{doc_url}\">godoc.org/{prefix}</a></p>\n      \
             <p>Redirecting . . .</p>\n    </div>",
        );
    }

    page.push_str("  </body>\n</html>\n");
    page
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
