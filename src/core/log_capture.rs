//! Test logger that keeps every record so tests can check where diagnostics went.
//!
//! Each test logs under its own target, so parallel tests never see each other's records.

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::{Mutex, Once};

struct CaptureLogger {
    records: Mutex<Vec<(String, Level, String)>>,
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};
static INIT: Once = Once::new();

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut records) = self.records.lock() {
            records.push((
                record.target().to_string(),
                record.level(),
                record.args().to_string(),
            ));
        }
    }

    fn flush(&self) {}
}

pub(crate) fn install() {
    INIT.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });
}

/// Records logged under `target`, oldest first.
pub(crate) fn records_for(target: &str) -> Vec<(Level, String)> {
    LOGGER
        .records
        .lock()
        .map(|records| {
            records
                .iter()
                .filter(|(t, _, _)| t == target)
                .map(|(_, level, message)| (*level, message.clone()))
                .collect()
        })
        .unwrap_or_default()
}
