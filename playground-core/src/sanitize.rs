//! Best-effort repair of user markup before it is embedded in the preview
//!
//! Two passes run in order:
//! 1. A trailing unterminated tag (a `<` after the last `>`) is entity-escaped
//!    so it cannot swallow the markup the composer appends after it.
//! 2. Raw-text and embedding elements whose open tags outnumber their close
//!    tags get the missing close tags appended.
//!
//! Nested same-tag mismatches are not repaired.

use std::sync::LazyLock;

use regex::Regex;

/// Elements that change how the rest of the document is parsed when left open
pub const GUARDED_ELEMENTS: &[&str] = &["script", "style", "title", "textarea", "iframe"];

struct TagCounter {
    name: &'static str,
    open: Regex,
    close: Regex,
}

static COUNTERS: LazyLock<Vec<TagCounter>> = LazyLock::new(|| {
    GUARDED_ELEMENTS
        .iter()
        .map(|&name| TagCounter {
            name,
            open: Regex::new(&format!(r"(?i)<{}[\s/>]", name)).expect("valid open-tag pattern"),
            close: Regex::new(&format!(r"(?i)</{}\s*>", name)).expect("valid close-tag pattern"),
        })
        .collect()
});

/// Return markup that is safe to embed verbatim inside a larger document
pub fn sanitize_markup(markup: &str) -> String {
    let mut out = escape_trailing_fragment(markup);

    for counter in COUNTERS.iter() {
        let opens = counter.open.find_iter(&out).count();
        let closes = counter.close.find_iter(&out).count();
        for _ in closes..opens {
            out.push_str("</");
            out.push_str(counter.name);
            out.push('>');
        }
    }

    out
}

fn escape_trailing_fragment(markup: &str) -> String {
    let Some(lt) = markup.rfind('<') else {
        return markup.to_string();
    };
    if markup.rfind('>').is_some_and(|gt| gt > lt) {
        return markup.to_string();
    }

    let mut out = String::with_capacity(markup.len() + 8);
    out.push_str(&markup[..lt]);
    out.push_str(&escape_html(&markup[lt..]));
    out
}

/// Entity-escape text for HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}
