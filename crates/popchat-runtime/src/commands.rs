use popchat_core::{Command, Input};
use tauri::{State, command};

use crate::driver::SessionSender;

/// Single entry point for the control window, e.g.
/// `invoke("dispatch", { command: { type: "open_chat", username: "name" } })`.
#[command]
pub fn dispatch(state: State<'_, SessionSender>, command: Command) -> Result<(), String> {
    state.send(Input::Command(command));
    Ok(())
}
