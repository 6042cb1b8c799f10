use std::sync::{Arc, Mutex};

use popchat_core::{ChatWindowSpec, Error, MainWindowMessage, WindowHost, WindowSpec, assets};
use tauri::{
    AppHandle, Emitter, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder,
    webview::PageLoadEvent, window::Color,
};

pub const MAIN_LABEL: &str = "main";
pub const CHAT_LABEL_PREFIX: &str = "chat-";

// Used for a dimension missing from the stored configuration.
const FALLBACK_WIDTH: f64 = 800.0;
const FALLBACK_HEIGHT: f64 = 600.0;

/// Opacity and click-through of the chat page, re-applied on every page load.
#[derive(Debug, Clone, Copy)]
struct ChatLook {
    opacity: f64,
    click_through: bool,
}

/// Label of the current chat window. Every chat window gets a fresh label.
#[derive(Debug, Default)]
struct ChatSlot {
    label: Option<String>,
    count: u32,
}

impl ChatSlot {
    fn next_label(&mut self) -> String {
        self.count += 1;
        format!("{}{}", CHAT_LABEL_PREFIX, self.count)
    }

    /// Track `label` as the chat window, then run the rest of its setup. The
    /// window stays tracked when `finish` fails so it can still be closed.
    fn adopt(
        &mut self,
        label: String,
        finish: impl FnOnce() -> Result<(), Error>,
    ) -> Result<(), Error> {
        self.label = Some(label);
        finish()
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn clear(&mut self) {
        self.label = None;
    }
}

/// [`WindowHost`] backed by Tauri webview windows.
pub struct TauriHost {
    app: AppHandle,
    chat: ChatSlot,
    look: Arc<Mutex<ChatLook>>,
}

impl TauriHost {
    pub fn new(app: AppHandle) -> Self {
        Self {
            app,
            chat: ChatSlot::default(),
            look: Arc::new(Mutex::new(ChatLook {
                opacity: 1.0,
                click_through: false,
            })),
        }
    }

    /// Create the control window. `on_ready` runs each time its page
    /// finishes loading.
    pub fn create_main_window<F>(
        &self,
        spec: &WindowSpec,
        on_ready: F,
    ) -> Result<WebviewWindow, Error>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let builder = WebviewWindowBuilder::new(
            &self.app,
            MAIN_LABEL,
            WebviewUrl::App("index.html".into()),
        )
        .title("PopChat")
        .on_page_load(move |_window, payload| {
            if matches!(payload.event(), PageLoadEvent::Finished) {
                on_ready();
            }
        });

        apply_window_spec(builder, spec)
            .build()
            .map_err(to_window_error)
    }

    fn chat_window(&self) -> Option<WebviewWindow> {
        self.chat
            .label()
            .and_then(|label| self.app.get_webview_window(label))
    }

    fn main_window(&self) -> Result<WebviewWindow, Error> {
        self.app
            .get_webview_window(MAIN_LABEL)
            .ok_or_else(|| Error::Window(format!("Window {} not found", MAIN_LABEL)))
    }

    fn update_look(&self, update: impl FnOnce(&mut ChatLook)) {
        let mut look = self.look.lock().unwrap_or_else(|e| e.into_inner());
        update(&mut look);
    }
}

fn apply_window_spec<'a>(
    builder: WebviewWindowBuilder<'a, tauri::Wry, AppHandle>,
    spec: &WindowSpec,
) -> WebviewWindowBuilder<'a, tauri::Wry, AppHandle> {
    let width = spec.size.width.map_or(FALLBACK_WIDTH, f64::from);
    let height = spec.size.height.map_or(FALLBACK_HEIGHT, f64::from);

    let mut builder = builder
        .inner_size(width, height)
        .decorations(!spec.frameless)
        .resizable(spec.resizable)
        .always_on_top(spec.always_on_top);

    if spec.transparent {
        builder = builder
            .transparent(true)
            .background_color(Color(0, 0, 0, 0));
    }

    // Without both coordinates the window system picks the placement
    if let (Some(x), Some(y)) = (spec.position.x, spec.position.y) {
        builder = builder.position(f64::from(x), f64::from(y));
    }

    builder
}

fn to_window_error(e: tauri::Error) -> Error {
    Error::Window(e.to_string())
}

impl WindowHost for TauriHost {
    fn open_chat(&mut self, spec: &ChatWindowSpec) -> Result<(), Error> {
        let url = spec
            .url
            .parse::<tauri::Url>()
            .map_err(|e| Error::Window(format!("Invalid URL {}: {}", spec.url, e)))?;

        let label = self.chat.next_label();

        self.update_look(|look| {
            look.opacity = spec.opacity;
            look.click_through = spec.click_through;
        });
        let look = Arc::clone(&self.look);

        let builder = WebviewWindowBuilder::new(&self.app, &label, WebviewUrl::External(url))
            .title(format!("{} chat", spec.channel))
            .skip_taskbar(true)
            .on_page_load(move |window, payload| {
                if !matches!(payload.event(), PageLoadEvent::Finished) {
                    return;
                }
                let current = *look.lock().unwrap_or_else(|e| e.into_inner());
                let script = assets::page_ready_script(current.opacity, current.click_through);
                if let Err(e) = window.eval(&script) {
                    tracing::error!("Failed to style chat window {}: {}", window.label(), e);
                }
            });

        let window = apply_window_spec(builder, &spec.window)
            .build()
            .map_err(to_window_error)?;

        tracing::info!("Chat window {} opened for {}", label, spec.channel);
        self.chat.adopt(label, || {
            window
                .set_ignore_cursor_events(spec.click_through)
                .map_err(to_window_error)
        })
    }

    fn close_chat(&mut self) -> Result<(), Error> {
        let window = self.chat_window();
        self.chat.clear();

        match window {
            Some(window) => window.close().map_err(to_window_error),
            None => Ok(()),
        }
    }

    fn has_chat(&self) -> bool {
        self.chat_window().is_some()
    }

    fn set_chat_opacity(&mut self, opacity: f64) -> Result<(), Error> {
        self.update_look(|look| look.opacity = opacity);

        let window = self
            .chat_window()
            .ok_or_else(|| Error::Window("No chat window".to_string()))?;
        window
            .eval(&assets::opacity_script(opacity))
            .map_err(to_window_error)
    }

    fn set_chat_click_through(&mut self, enabled: bool) -> Result<(), Error> {
        self.update_look(|look| look.click_through = enabled);

        let window = self
            .chat_window()
            .ok_or_else(|| Error::Window("No chat window".to_string()))?;
        window
            .set_ignore_cursor_events(enabled)
            .map_err(to_window_error)?;
        window
            .eval(&assets::pointer_events_script(enabled))
            .map_err(to_window_error)
    }

    fn minimize_main(&mut self) -> Result<(), Error> {
        self.main_window()?.minimize().map_err(to_window_error)
    }

    fn close_main(&mut self) -> Result<(), Error> {
        self.main_window()?.close().map_err(to_window_error)
    }

    fn notify_main(&mut self, message: MainWindowMessage) -> Result<(), Error> {
        let window = self.main_window()?;
        let event = message.event_name();
        let emitted = match message {
            MainWindowMessage::LoadUser(user) => window.emit(event, user),
            MainWindowMessage::UpdateClickThrough(enabled) => window.emit(event, enabled),
            MainWindowMessage::SetTransparency(percent) => window.emit(event, percent),
        };
        emitted.map_err(to_window_error)
    }
}
