//! Translation of Tauri window events into session geometry events.
//!
//! All geometry is stored in logical pixels so it survives a change of
//! display scaling between runs.

use popchat_core::{WindowEvent as SessionEvent, WindowKind, WindowPosition, WindowSize};
use tauri::{PhysicalPosition, PhysicalSize, Window, WindowEvent};

use crate::host::{CHAT_LABEL_PREFIX, MAIN_LABEL};

pub fn window_kind(label: &str) -> Option<WindowKind> {
    if label == MAIN_LABEL {
        Some(WindowKind::Main)
    } else if label.starts_with(CHAT_LABEL_PREFIX) {
        Some(WindowKind::Chat)
    } else {
        None
    }
}

pub fn logical_position(position: PhysicalPosition<i32>, scale_factor: f64) -> WindowPosition {
    let logical = position.to_logical::<i32>(scale_factor);
    WindowPosition::new(logical.x, logical.y)
}

/// `None` for a zero-sized window, which is how some platforms report
/// minimizing.
pub fn logical_size(size: PhysicalSize<u32>, scale_factor: f64) -> Option<WindowSize> {
    if size.width == 0 || size.height == 0 {
        return None;
    }
    let logical = size.to_logical::<u32>(scale_factor);
    Some(WindowSize::new(logical.width, logical.height))
}

pub fn session_event(window: &Window, event: &WindowEvent) -> Option<SessionEvent> {
    let kind = window_kind(window.label())?;
    let scale_factor = window.scale_factor().unwrap_or(1.0);

    match event {
        WindowEvent::Moved(position) => {
            // Minimized windows get parked off-screen on Windows
            if window.is_minimized().unwrap_or(false) {
                return None;
            }
            Some(SessionEvent::Moved {
                window: kind,
                position: logical_position(*position, scale_factor),
            })
        }
        WindowEvent::Resized(size) => Some(SessionEvent::Resized {
            window: kind,
            size: logical_size(*size, scale_factor)?,
        }),
        WindowEvent::CloseRequested { .. } => {
            let position = window.outer_position().ok()?;
            let size = window.inner_size().ok()?;
            Some(SessionEvent::Closing {
                window: kind,
                position: logical_position(position, scale_factor),
                size: logical_size(size, scale_factor)?,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_kind() {
        assert_eq!(window_kind("main"), Some(WindowKind::Main));
        assert_eq!(window_kind("chat-1"), Some(WindowKind::Chat));
        assert_eq!(window_kind("chat-12"), Some(WindowKind::Chat));
        assert_eq!(window_kind("settings"), None);
    }

    #[test]
    fn test_logical_position_scales_down() {
        let position = logical_position(PhysicalPosition::new(300, -100), 2.0);
        assert_eq!(position, WindowPosition::new(150, -50));
    }

    #[test]
    fn test_logical_size_ignores_zero() {
        assert_eq!(
            logical_size(PhysicalSize::new(800, 1200), 2.0),
            Some(WindowSize::new(400, 600))
        );
        assert_eq!(logical_size(PhysicalSize::new(0, 0), 1.0), None);
    }
}
