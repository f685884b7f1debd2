//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() {
    env_logger::init();

    if std::env::args().skip(1).any(|arg| arg == "--shortcuts") {
        inkpad_core::ShortcutRegistry::print_all();
        return;
    }

    log::info!("Starting InkPad");
    let config = inkpad_app::AppConfig::load();
    if let Err(e) = inkpad_app::App::with_config(config).run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
