//! Share links for the editor page

const SHARE_TEXT: &str = "Try this web code editor!";

/// Intent URLs for one page URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLinks {
    pub page: String,
    pub twitter: String,
    pub facebook: String,
    pub line: String,
}

fn encode(value: &str) -> String {
    js_sys::encode_uri_component(value).into()
}

impl ShareLinks {
    pub fn for_page(page: &str) -> Self {
        let url = encode(page);
        let text = encode(SHARE_TEXT);
        Self {
            page: page.to_string(),
            twitter: format!("https://twitter.com/intent/tweet?text={}&url={}", text, url),
            facebook: format!("https://www.facebook.com/sharer/sharer.php?u={}", url),
            line: format!(
                "https://social-plugins.line.me/lineit/share?url={}&text={}",
                url, text
            ),
        }
    }

    pub fn get(&self, target: &str) -> Option<&str> {
        match target {
            "twitter" => Some(&self.twitter),
            "facebook" => Some(&self.facebook),
            "line" => Some(&self.line),
            _ => None,
        }
    }
}

/// The current page URL
pub fn current_page() -> Option<String> {
    web_sys::window()?.location().href().ok()
}
