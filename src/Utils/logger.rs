use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

/// Console logger for examples and quick experiments. Library code only uses
/// the `log` macros; binaries decide the backend.
pub fn init_console_logger(level: LevelFilter) {
    // a second init attempt (e.g. from several examples in one process) is
    // not an error worth surfacing
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto);
}
