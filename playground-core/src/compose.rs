//! Preview document composition
//!
//! The composed document is a pure function of the three buffer contents and
//! the library selection: composing the same inputs twice yields identical
//! bytes.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Buffers, LibrarySelection};
use crate::sanitize::sanitize_markup;

/// `sandbox` attribute of the preview frame: scripts and modal dialogs only
pub const SANDBOX_PERMISSIONS: &str = "allow-scripts allow-modals";

/// Wrapper around the user markup that generates no box of its own
pub const TRANSPARENT_CONTAINER_OPEN: &str = r#"<div style="display: contents">"#;

/// Console-capture shim injected ahead of the user script
///
/// Mirrors `console.log/warn/error`, uncaught errors and unhandled
/// rejections to the parent frame as `{type: "console", method, args}`.
pub const CONSOLE_SHIM: &str = r#"(function () {
  var serialize = function (arg) {
    if (arg instanceof Error) {
      return String(arg);
    }
    if (arg !== null && typeof arg === 'object') {
      try {
        return JSON.stringify(arg);
      } catch (e) {
        return String(arg);
      }
    }
    return String(arg);
  };
  var send = function (method, args) {
    try {
      window.parent.postMessage({ type: 'console', method: method, args: args.map(serialize) }, '*');
    } catch (e) {}
  };
  ['log', 'warn', 'error'].forEach(function (method) {
    var original = console[method];
    console[method] = function () {
      var args = Array.prototype.slice.call(arguments);
      send(method, args);
      original.apply(console, args);
    };
  });
  window.addEventListener('error', function (e) {
    send('error', [e.message + ' at line ' + e.lineno]);
  });
  window.addEventListener('unhandledrejection', function (e) {
    var reason = e.reason;
    send('error', ['Unhandled promise rejection: ' + (reason && reason.message ? reason.message : String(reason))]);
  });
})();"#;

const CATCH_REPORT: &str =
    "  console.error(err && err.name ? err.name + ': ' + err.message : String(err));";

static SCRIPT_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</(script)").expect("valid script-close pattern"));
static COMMENT_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!--").expect("valid comment-open pattern"));
static STYLE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</(style)").expect("valid style-close pattern"));

/// Compose the preview document with a caller-provided console shim
pub fn compose(buffers: &Buffers, libraries: &LibrarySelection, shim: &str) -> String {
    let css = STYLE_CLOSE.replace_all(&buffers.css.content, r"<\/$1");
    // `<!--` inside a script element would switch the tokenizer to
    // double-escaped state and hide the closing tag
    let js = SCRIPT_CLOSE.replace_all(&buffers.js.content, r"<\/$1");
    let js = COMMENT_OPEN.replace_all(&js, r"<\!--");
    let markup = sanitize_markup(&buffers.html.content);

    let mut doc = String::with_capacity(
        shim.len() + css.len() + js.len() + markup.len() + 512,
    );

    doc.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    doc.push_str("<meta charset=\"UTF-8\">\n");
    doc.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    for tag in libraries.head_tags() {
        doc.push_str(&tag);
        doc.push('\n');
    }
    doc.push_str("<style>\n");
    doc.push_str(&css);
    doc.push_str("\n</style>\n</head>\n<body>\n");

    doc.push_str(TRANSPARENT_CONTAINER_OPEN);
    doc.push('\n');
    doc.push_str(&markup);
    doc.push_str("\n</div>\n");

    doc.push_str("<script>\n");
    doc.push_str(shim);
    doc.push_str("\ntry {\n");
    doc.push_str(&js);
    doc.push_str("\n} catch (err) {\n");
    doc.push_str(CATCH_REPORT);
    doc.push_str("\n}\n</script>\n</body>\n</html>\n");

    doc
}

/// Compose the preview document with the built-in console shim
pub fn compose_document(buffers: &Buffers, libraries: &LibrarySelection) -> String {
    compose(buffers, libraries, CONSOLE_SHIM)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn buffers(html: &str, css: &str, js: &str) -> Buffers {
        Buffers::new(html, css, js)
    }

    #[test]
    fn test_compose_is_deterministic() {
        let b = buffers("<p>hi</p>", "p{color:red}", "console.log('x')");
        let mut libs = LibrarySelection::new();
        libs.set("jquery", true);

        assert_eq!(compose_document(&b, &libs), compose_document(&b, &libs));
    }

    #[test]
    fn test_document_layout() {
        let b = buffers("<p>hi</p>", "p{color:red}", "run()");
        let doc = compose(&b, &LibrarySelection::new(), "/*shim*/");

        let expected = "<!DOCTYPE html>\n<html>\n<head>\n\
<meta charset=\"UTF-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
<style>\np{color:red}\n</style>\n</head>\n<body>\n\
<div style=\"display: contents\">\n<p>hi</p>\n</div>\n\
<script>\n/*shim*/\ntry {\nrun()\n} catch (err) {\n  \
console.error(err && err.name ? err.name + ': ' + err.message : String(err));\n\
}\n</script>\n</body>\n</html>\n";
        assert_eq!(doc, expected);
    }

    #[test]
    fn test_library_tags_precede_style_block() {
        let b = buffers("", "body{}", "");
        let libs: LibrarySelection = [("animate", true), ("jquery", true)].into_iter().collect();
        let doc = compose_document(&b, &libs);

        let animate = doc.find("animate.min.css").unwrap();
        let jquery = doc.find("jquery.min.js").unwrap();
        let style = doc.find("<style>").unwrap();
        assert!(animate < jquery);
        assert!(jquery < style);
    }

    #[test]
    fn test_user_code_cannot_close_host_elements() {
        let b = buffers("", "a{}</STYLE><b>", "var s = '</script><i>';");
        let doc = compose_document(&b, &LibrarySelection::new());

        assert!(doc.contains(r"a{}<\/STYLE><b>"));
        assert!(doc.contains(r"var s = '<\/script><i>';"));
        assert_eq!(doc.matches("</script>").count(), 1);
    }

    #[test]
    fn test_comment_open_in_script_is_neutralized() {
        let b = buffers("<p>after</p>", "", "var s = '<!--<script>';");
        let doc = compose_document(&b, &LibrarySelection::new());

        assert!(doc.contains(r"var s = '<\!--<script>';"));
        assert!(!doc.contains("<!--"));
        assert!(doc.ends_with("}\n</script>\n</body>\n</html>\n"));
    }

    #[test]
    fn test_markup_is_sanitized() {
        let b = buffers("<p>ok</p><textarea>", "", "");
        let doc = compose_document(&b, &LibrarySelection::new());
        assert!(doc.contains("<p>ok</p><textarea></textarea>\n</div>"));
    }

    #[test]
    fn test_shim_posts_console_messages() {
        assert!(CONSOLE_SHIM.contains("type: 'console'"));
        assert!(CONSOLE_SHIM.contains("['log', 'warn', 'error']"));
        assert!(CONSOLE_SHIM.contains("'unhandledrejection'"));
        assert!(CONSOLE_SHIM.contains("window.addEventListener('error'"));
    }
}
