mod app;

use tracing::error;

fn main() {
    let wiring = match app::bootstrap::build_app() {
        Ok(wiring) => wiring,
        Err(err) => {
            error!(error = %err, "startup_failed");
            std::process::exit(1);
        }
    };

    if let Err(err) = app::console::run_console(wiring) {
        error!(error = %err, "console_failed");
        std::process::exit(1);
    }
}
