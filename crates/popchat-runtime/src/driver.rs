//! The session runs on its own thread and is fed through a channel.
//!
//! Window events arrive on the main thread while commands arrive on IPC
//! threads. Funnelling both into one queue keeps them in arrival order, and
//! the main thread never blocks on the session while the session is waiting
//! for the main thread to build a window.

use std::{sync::mpsc as std_mpsc, thread, time::Duration};

use popchat_core::{Input, Session, WindowHost};
use tokio::sync::mpsc;

enum Message {
    Input(Input),
    Flush(std_mpsc::Sender<()>),
}

/// Handle for feeding the session thread. Managed as Tauri state.
#[derive(Clone)]
pub struct SessionSender(mpsc::UnboundedSender<Message>);

pub struct SessionReceiver(mpsc::UnboundedReceiver<Message>);

pub fn channel() -> (SessionSender, SessionReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SessionSender(tx), SessionReceiver(rx))
}

impl SessionSender {
    pub fn send(&self, input: Input) {
        if let Err(e) = self.0.send(Message::Input(input)) {
            tracing::warn!("Session has stopped, dropping {:?}", e.0.into_input());
        }
    }

    /// Block until every configuration save queued so far is on disk, or
    /// until `timeout` elapses.
    pub fn flush(&self, timeout: Duration) {
        let (done_tx, done_rx) = std_mpsc::channel();
        if self.0.send(Message::Flush(done_tx)).is_err() {
            return;
        }
        if done_rx.recv_timeout(timeout).is_err() {
            tracing::warn!("Timed out waiting for the configuration to be written");
        }
    }
}

impl Message {
    fn into_input(self) -> Option<Input> {
        match self {
            Message::Input(input) => Some(input),
            Message::Flush(_) => None,
        }
    }
}

pub fn spawn<H>(session: Session<H>, receiver: SessionReceiver) -> std::io::Result<()>
where
    H: WindowHost + Send + 'static,
{
    thread::Builder::new()
        .name("popchat-session".to_string())
        .spawn(move || run(session, receiver))?;
    Ok(())
}

fn run<H: WindowHost>(mut session: Session<H>, SessionReceiver(mut rx): SessionReceiver) {
    tracing::debug!("Session thread started");

    while let Some(message) = rx.blocking_recv() {
        match message {
            Message::Input(input) => session.handle(input),
            Message::Flush(done) => {
                tauri::async_runtime::block_on(session.store().flush());
                let _ = done.send(());
            }
        }
    }

    tracing::debug!("Session thread stopped");
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use popchat_core::{
        ChatWindowSpec, Command, ConfigStore, Error, MainWindowMessage, WindowEvent, WindowKind,
        WindowSize,
    };

    use super::*;

    /// Records the channel of every chat it is asked to open.
    #[derive(Clone, Default)]
    struct RecordingHost {
        opened: Arc<Mutex<Vec<String>>>,
    }

    impl WindowHost for RecordingHost {
        fn open_chat(&mut self, spec: &ChatWindowSpec) -> Result<(), Error> {
            self.opened.lock().unwrap().push(spec.channel.clone());
            Ok(())
        }

        fn close_chat(&mut self) -> Result<(), Error> {
            Ok(())
        }

        fn has_chat(&self) -> bool {
            false
        }

        fn set_chat_opacity(&mut self, _opacity: f64) -> Result<(), Error> {
            Ok(())
        }

        fn set_chat_click_through(&mut self, _enabled: bool) -> Result<(), Error> {
            Ok(())
        }

        fn minimize_main(&mut self) -> Result<(), Error> {
            Ok(())
        }

        fn close_main(&mut self) -> Result<(), Error> {
            Ok(())
        }

        fn notify_main(&mut self, _message: MainWindowMessage) -> Result<(), Error> {
            Ok(())
        }
    }

    #[test]
    fn test_inputs_are_handled_in_order_before_flush_returns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = ConfigStore::blocking(&path);
        let host = RecordingHost::default();
        let opened = Arc::clone(&host.opened);
        let session = Session::new(store.load(), store, host);

        let (sender, receiver) = channel();
        spawn(session, receiver).unwrap();

        sender.send(Input::Command(Command::SaveUser {
            username: "first".to_string(),
        }));
        sender.send(Input::Window(WindowEvent::Resized {
            window: WindowKind::Chat,
            size: WindowSize::new(320, 480),
        }));
        sender.send(Input::Command(Command::OpenChat {
            username: "last".to_string(),
        }));
        sender.send(Input::Command(Command::SaveUser {
            username: "last".to_string(),
        }));
        sender.flush(Duration::from_secs(5));

        let saved = ConfigStore::blocking(&path).load();
        assert_eq!(saved.last_user, "last");
        assert_eq!(saved.chat_window_size, WindowSize::new(320, 480));
        assert_eq!(*opened.lock().unwrap(), vec!["last".to_string()]);
    }

    #[test]
    fn test_send_after_receiver_dropped_does_not_panic() {
        let (sender, receiver) = channel();
        drop(receiver);
        sender.send(Input::MainWindowReady);
        sender.flush(Duration::from_millis(10));
    }
}
