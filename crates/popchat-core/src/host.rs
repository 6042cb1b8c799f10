use serde::{Deserialize, Serialize};

use crate::{
    Error,
    config::{WindowPosition, WindowSize},
};

/// Geometry and flags for a window about to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    pub size: WindowSize,
    pub position: WindowPosition,
    pub transparent: bool,
    pub frameless: bool,
    pub resizable: bool,
    pub always_on_top: bool,
}

/// Everything needed to open the chat overlay for one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatWindowSpec {
    pub channel: String,
    pub url: String,
    pub window: WindowSpec,
    /// 0.0-1.0
    pub opacity: f64,
    pub click_through: bool,
}

/// Notifications pushed to the control window's page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MainWindowMessage {
    LoadUser(String),
    UpdateClickThrough(bool),
    SetTransparency(u8),
}

impl MainWindowMessage {
    /// Name of the event the control page listens for.
    pub fn event_name(&self) -> &'static str {
        match self {
            MainWindowMessage::LoadUser(_) => "load-user",
            MainWindowMessage::UpdateClickThrough(_) => "update-click-through",
            MainWindowMessage::SetTransparency(_) => "set-transparency",
        }
    }
}

/// The windowing toolkit as seen by the session.
/// This abstraction allows mocking in tests.
pub trait WindowHost {
    /// Create the chat window. Any previous chat window has already been
    /// closed by the caller.
    fn open_chat(&mut self, spec: &ChatWindowSpec) -> Result<(), Error>;
    fn close_chat(&mut self) -> Result<(), Error>;
    fn has_chat(&self) -> bool;
    fn set_chat_opacity(&mut self, opacity: f64) -> Result<(), Error>;
    /// Pass mouse events through the chat window (forwarding them to what is
    /// underneath) and toggle the page's own pointer handling.
    fn set_chat_click_through(&mut self, enabled: bool) -> Result<(), Error>;
    fn minimize_main(&mut self) -> Result<(), Error>;
    fn close_main(&mut self) -> Result<(), Error>;
    fn notify_main(&mut self, message: MainWindowMessage) -> Result<(), Error>;
}
