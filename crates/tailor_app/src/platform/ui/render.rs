use tailor_core::{AppViewModel, Banner};
use tailor_engine::ViewSink;
use url::Url;

/// Prints each view-model change to stdout.
pub struct TerminalRenderer {
    base: Option<Url>,
}

impl TerminalRenderer {
    pub fn new(base_url: &str) -> Self {
        Self {
            base: Url::parse(base_url).ok(),
        }
    }
}

impl ViewSink for TerminalRenderer {
    fn render(&self, view: AppViewModel) {
        for line in render(&view, self.base.as_ref()) {
            println!("{line}");
        }
    }
}

/// Text lines for one view state. Root-relative links are shown resolved
/// against `base` so the terminal can open them.
pub fn render(view: &AppViewModel, base: Option<&Url>) -> Vec<String> {
    if view.pending {
        return vec![view.submit_label.to_string()];
    }
    match &view.banner {
        Some(Banner::Success { title, text, link }) => {
            let href = base
                .and_then(|base| base.join(link).ok())
                .map(|url| url.to_string())
                .unwrap_or_else(|| link.clone());
            vec![format!("{title}: {text}"), format!("  Download here: {href}")]
        }
        Some(Banner::Error { title, message }) => vec![format!("{title}: {message}")],
        None => Vec::new(),
    }
}
