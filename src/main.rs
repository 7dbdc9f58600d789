use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    match loupe_gui::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("failed to start: {}", err);
            ExitCode::FAILURE
        }
    }
}
