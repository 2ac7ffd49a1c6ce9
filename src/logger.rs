struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match record.level() {
            log::Level::Info => eprintln!("{}", record.args()),
            level => eprintln!("{level}: {}", record.args()),
        }
    }

    fn flush(&self) {
    }
}

static LOGGER: StderrLogger = StderrLogger;

/// Initialise the global logger.
pub fn init(quiet: bool, verbose: bool) -> Result<(), log::SetLoggerError> {
    let level = match (quiet, verbose) {
        (true, _) => log::LevelFilter::Error,
        (_, true) => log::LevelFilter::Debug,
        _ => log::LevelFilter::Info,
    };
    log::set_max_level(level);
    log::set_logger(&LOGGER)
}
