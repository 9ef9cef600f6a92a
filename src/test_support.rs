//! Shared helpers for unit tests

use std::cell::RefCell;
use std::future::Future;

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::runtime::{Owner, init_executor};

/// Run `f` on a single-threaded runtime inside a fresh root owner
///
/// The owner is passed in so tests can clean it up to simulate teardown.
pub fn run_local<F, Fut>(f: F) -> Fut::Output
where
    F: FnOnce(Owner) -> Fut,
    Fut: Future,
{
    init_executor();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("tokio runtime");
    let local = tokio::task::LocalSet::new();

    let owner = Owner::new();
    owner.set();
    runtime.block_on(local.run_until(f(owner)))
}

thread_local! {
    static RECORDS: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Logger that keeps this crate's records per thread
struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target().starts_with("persist_cell")
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            RECORDS.with(|r| {
                r.borrow_mut()
                    .push((record.level(), record.args().to_string()))
            });
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

/// Start capturing log records on this thread, discarding earlier ones
pub fn capture_logs() {
    // Another test may have installed it already
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(LevelFilter::Trace);
    RECORDS.with(|r| r.borrow_mut().clear());
}

/// Records captured on this thread since [`capture_logs`]
pub fn captured_logs() -> Vec<(Level, String)> {
    RECORDS.with(|r| r.borrow().clone())
}

/// Captured messages at `level`
pub fn logs_at(level: Level) -> Vec<String> {
    captured_logs()
        .into_iter()
        .filter(|(l, _)| *l == level)
        .map(|(_, msg)| msg)
        .collect()
}
