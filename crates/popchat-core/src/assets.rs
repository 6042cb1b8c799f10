//! Styling and scripts injected into the Twitch chat popout.

/// Added once the popout page has finished loading. Adds a translucent drag
/// strip along the top edge and hides the chat header, the input box and
/// the community highlight cards.
pub const CHAT_STYLESHEET: &str = r#"
body {
  margin: 0;
  padding: 0;
}
.drag-area {
  position: fixed;
  top: 0;
  left: 0;
  width: 100%;
  height: 30px;
  background-color: rgba(0, 0, 0, 0.1);
  z-index: 1000;
  cursor: move;
}
.Layout-sc-1xcs6mc-0.hsXgFK,
.Layout-sc-1xcs6mc-0.fiHaCw.stream-chat-header,
.Layout-sc-1xcs6mc-0.kILIqT.chat-input,
.Layout-sc-1xcs6mc-0.community-highlight-stack__card.community-highlight-stack__card--wide {
  display: none !important;
}
"#;

/// Appends the drag strip. `data-tauri-drag-region` makes a mouse-down on it
/// start a native window drag.
pub const DRAG_AREA_SCRIPT: &str = r#"
if (!document.querySelector('.drag-area')) {
  const dragArea = document.createElement('div');
  dragArea.classList.add('drag-area');
  dragArea.setAttribute('data-tauri-drag-region', '');
  document.body.appendChild(dragArea);
}
"#;

pub fn popout_url(channel: &str) -> String {
    format!("https://www.twitch.tv/popout/{}/chat", channel)
}

/// Script inserting [`CHAT_STYLESHEET`] into the page.
pub fn insert_stylesheet_script() -> String {
    // serde_json gives a correctly escaped JS string literal
    let css = serde_json::Value::String(CHAT_STYLESHEET.to_string());
    format!(
        "(() => {{ if (document.getElementById('popchat-style')) return; \
         const style = document.createElement('style'); \
         style.id = 'popchat-style'; \
         style.textContent = {}; \
         document.head.appendChild(style); }})();",
        css
    )
}

pub fn pointer_events_script(click_through: bool) -> String {
    let value = if click_through { "none" } else { "auto" };
    format!("document.body.style.pointerEvents = '{}';", value)
}

/// The chat window is transparent, so fading the document fades the window.
pub fn opacity_script(opacity: f64) -> String {
    format!(
        "document.documentElement.style.opacity = '{}';",
        opacity.clamp(0.0, 1.0)
    )
}

/// Everything to run once the popout page reports it has loaded.
pub fn page_ready_script(opacity: f64, click_through: bool) -> String {
    [
        insert_stylesheet_script(),
        DRAG_AREA_SCRIPT.to_string(),
        opacity_script(opacity),
        pointer_events_script(click_through),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popout_url() {
        assert_eq!(
            popout_url("some_streamer"),
            "https://www.twitch.tv/popout/some_streamer/chat"
        );
    }

    #[test]
    fn test_pointer_events_script() {
        assert_eq!(
            pointer_events_script(true),
            "document.body.style.pointerEvents = 'none';"
        );
        assert_eq!(
            pointer_events_script(false),
            "document.body.style.pointerEvents = 'auto';"
        );
    }

    #[test]
    fn test_opacity_script_is_clamped() {
        assert!(opacity_script(0.55).contains("'0.55'"));
        assert!(opacity_script(3.0).contains("'1'"));
    }

    #[test]
    fn test_stylesheet_is_embedded_as_string_literal() {
        let script = insert_stylesheet_script();
        assert!(script.contains("\\n.drag-area {"));
        assert!(script.contains("display: none !important;"));
    }

    #[test]
    fn test_page_ready_script_applies_state() {
        let script = page_ready_script(0.4, true);
        assert!(script.contains("data-tauri-drag-region"));
        assert!(script.contains("'0.4'"));
        assert!(script.contains("pointerEvents = 'none'"));
    }
}
