use serde::{Deserialize, Serialize};

use crate::{
    assets,
    config::{Configuration, WindowPosition, WindowSize},
    host::{ChatWindowSpec, MainWindowMessage, WindowHost, WindowSpec},
    store::ConfigStore,
};

/// Commands sent by the control window. None of them has a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    ToggleClickThrough,
    SaveUser { username: String },
    OpenChat { username: String },
    AdjustOpacity { value: u8 },
    MinimizeWindow,
    CloseWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Main,
    Chat,
}

/// Geometry notifications coming from either window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    Moved {
        window: WindowKind,
        position: WindowPosition,
    },
    Resized {
        window: WindowKind,
        size: WindowSize,
    },
    Closing {
        window: WindowKind,
        position: WindowPosition,
        size: WindowSize,
    },
}

/// Everything the session reacts to, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Window(WindowEvent),
    MainWindowReady,
}

/// State shared by every command and window event for the lifetime of the
/// app: the configuration snapshot, the click-through flag, the store that
/// persists them and the windows they are applied to.
pub struct Session<H: WindowHost> {
    config: Configuration,
    click_through: bool,
    store: ConfigStore,
    host: H,
}

impl<H: WindowHost> Session<H> {
    pub fn new(config: Configuration, store: ConfigStore, host: H) -> Self {
        Self {
            click_through: config.is_click_through,
            config,
            store,
            host,
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn click_through(&self) -> bool {
        self.click_through
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Geometry and flags of the control window.
    pub fn main_window_spec(&self) -> WindowSpec {
        WindowSpec {
            size: self.config.main_window_size,
            position: self.config.main_window_position,
            transparent: true,
            frameless: true,
            resizable: true,
            always_on_top: false,
        }
    }

    /// Push the persisted state into the control page once it has loaded.
    pub fn main_window_ready(&mut self) {
        let mut messages = Vec::with_capacity(3);
        if !self.config.last_user.is_empty() {
            messages.push(MainWindowMessage::LoadUser(self.config.last_user.clone()));
        }
        messages.push(MainWindowMessage::UpdateClickThrough(self.click_through));
        messages.push(MainWindowMessage::SetTransparency(self.config.transparency));

        for message in messages {
            let event = message.event_name();
            if let Err(e) = self.host.notify_main(message) {
                tracing::error!("Failed to send {} to the control window: {}", event, e);
            }
        }
    }

    pub fn handle(&mut self, input: Input) {
        match input {
            Input::Command(command) => self.handle_command(command),
            Input::Window(event) => self.handle_window_event(event),
            Input::MainWindowReady => self.main_window_ready(),
        }
    }

    pub fn handle_command(&mut self, command: Command) {
        tracing::debug!("Handling command: {:?}", command);

        match command {
            Command::ToggleClickThrough => self.toggle_click_through(),
            Command::SaveUser { username } => {
                self.config.last_user = username;
                self.save();
            }
            Command::OpenChat { username } => self.open_chat(&username),
            Command::AdjustOpacity { value } => self.adjust_opacity(value),
            Command::MinimizeWindow => {
                if let Err(e) = self.host.minimize_main() {
                    tracing::error!("Failed to minimize the control window: {}", e);
                }
            }
            Command::CloseWindow => {
                if let Err(e) = self.host.close_main() {
                    tracing::error!("Failed to close the control window: {}", e);
                }
            }
        }
    }

    pub fn handle_window_event(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::Moved { window, position } => {
                *self.position_mut(window) = position;
            }
            WindowEvent::Resized { window, size } => {
                *self.size_mut(window) = size;
            }
            WindowEvent::Closing {
                window,
                position,
                size,
            } => {
                *self.size_mut(window) = size;
                *self.position_mut(window) = position;
            }
        }
        self.save();
    }

    fn toggle_click_through(&mut self) {
        self.click_through = !self.click_through;
        self.config.is_click_through = self.click_through;
        self.save();

        if self.host.has_chat() {
            if let Err(e) = self.host.set_chat_click_through(self.click_through) {
                tracing::error!("Failed to apply click-through: {}", e);
            }
        }
    }

    fn open_chat(&mut self, username: &str) {
        let channel = username.trim();
        if channel.is_empty() {
            tracing::warn!("No username given, not opening chat");
            return;
        }

        tracing::info!("Opening chat for {}", channel);

        if self.host.has_chat() {
            if let Err(e) = self.host.close_chat() {
                tracing::error!("Failed to close the previous chat window: {}", e);
            }
        }

        let spec = ChatWindowSpec {
            channel: channel.to_string(),
            url: assets::popout_url(channel),
            window: WindowSpec {
                size: self.config.chat_window_size,
                position: self.config.chat_position,
                transparent: true,
                frameless: true,
                resizable: true,
                always_on_top: true,
            },
            opacity: self.config.chat_opacity(),
            click_through: self.click_through,
        };
        tracing::debug!("Chat URL: {}", spec.url);

        if let Err(e) = self.host.open_chat(&spec) {
            tracing::error!("Failed to open chat for {}: {}", channel, e);
        }
    }

    fn adjust_opacity(&mut self, value: u8) {
        if !self.host.has_chat() {
            tracing::debug!("No chat window, ignoring opacity change");
            return;
        }

        let value = value.min(100);
        if let Err(e) = self.host.set_chat_opacity(crate::opacity_from_percent(value)) {
            tracing::error!("Failed to set chat opacity: {}", e);
        }
        self.config.transparency = value;
        self.save();
    }

    fn position_mut(&mut self, window: WindowKind) -> &mut WindowPosition {
        match window {
            WindowKind::Main => &mut self.config.main_window_position,
            WindowKind::Chat => &mut self.config.chat_position,
        }
    }

    fn size_mut(&mut self, window: WindowKind) -> &mut WindowSize {
        match window {
            WindowKind::Main => &mut self.config.main_window_size,
            WindowKind::Chat => &mut self.config.chat_window_size,
        }
    }

    fn save(&self) {
        self.store.save(&self.config);
    }
}
