mod commands;
mod driver;
mod events;
mod host;

use std::time::Duration;

use popchat_core::{
    CONFIG_FILE_NAME, ConfigStore, Configuration, Error, Input, Session, StorageOptions, WriteMode,
};
use tauri::RunEvent;
use tokio::runtime::Handle;
use tracing_subscriber::EnvFilter;

pub use host::TauriHost;

const EXIT_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

async fn open_store(options: &StorageOptions) -> Result<(ConfigStore, Configuration), Error> {
    let store = ConfigStore::open(options, &Handle::current())?;
    let config = match options.write_mode {
        WriteMode::Background => store.load_async().await,
        WriteMode::Blocking => store.load(),
    };
    Ok((store, config))
}

/// Open the configured store, falling back to a file in the working
/// directory when the configured location cannot be resolved.
fn load_configuration(options: StorageOptions) -> (ConfigStore, Configuration) {
    match tauri::async_runtime::block_on(open_store(&options)) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!(
                "Failed to open configuration store: {}, using ./{}",
                e,
                CONFIG_FILE_NAME
            );
            let store = ConfigStore::blocking(CONFIG_FILE_NAME);
            let config = store.load();
            (store, config)
        }
    }
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("PopChat starting");

    let (store, config) = load_configuration(StorageOptions::from_env());
    let (sender, receiver) = driver::channel();
    let event_sender = sender.clone();
    let exit_sender = sender.clone();

    let app = tauri::Builder::default()
        .manage(sender.clone())
        .invoke_handler(tauri::generate_handler![commands::dispatch])
        .setup(move |app| {
            let session = Session::new(config, store, TauriHost::new(app.handle().clone()));

            let ready = sender.clone();
            session
                .host()
                .create_main_window(&session.main_window_spec(), move || {
                    ready.send(Input::MainWindowReady)
                })?;

            driver::spawn(session, receiver)?;
            Ok(())
        })
        .on_window_event(move |window, event| {
            if let Some(event) = events::session_event(window, event) {
                event_sender.send(Input::Window(event));
            }
        })
        .build(tauri::generate_context!())
        .expect("error building PopChat");

    app.run(move |_app, event| {
        if let RunEvent::Exit = event {
            tracing::info!("PopChat exiting");
            exit_sender.flush(EXIT_FLUSH_TIMEOUT);
        }
    });
}
