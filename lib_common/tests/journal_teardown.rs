//! Journal teardown when a run fails on a journal write.
//!
//! Lives in its own test binary because it installs a global logger to
//! observe what teardown reports.

use std::path::Path;
use std::sync::Mutex;

use lib_common::core::{
    from_fn, CancellationToken, CentralEngine, DiscardSink, EngineError, LogPolicy, PrintPolicy,
    RateSpec, RecurrenceSpec,
};

struct CaptureLogger {
    warnings: Mutex<Vec<String>>,
}

impl log::Log for CaptureLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::Level::Warn
    }

    fn log(&self, record: &log::Record<'_>) {
        if record.level() == log::Level::Warn {
            if let Ok(mut warnings) = self.warnings.lock() {
                warnings.push(record.args().to_string());
            }
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    warnings: Mutex::new(Vec::new()),
};

// Writes to /dev/full stay buffered and every flush fails with ENOSPC, so
// both the first append and the teardown close fail.
#[cfg(target_os = "linux")]
#[tokio::test(start_paused = true)]
async fn failed_close_after_failed_append_is_logged() {
    if !Path::new("/dev/full").exists() {
        return;
    }
    log::set_logger(&LOGGER).expect("logger installed once");
    log::set_max_level(log::LevelFilter::Warn);

    let mut engine = CentralEngine::new(PrintPolicy::None, LogPolicy::to_file("/dev/full"));
    let mut producer = from_fn(|| Ok(r#"[{"seq":1}]"#.to_string()));
    let mut sink = DiscardSink::new();

    let err = engine
        .run(
            RateSpec::new(1000.0),
            RecurrenceSpec::fixed(3).unwrap(),
            &mut producer,
            &mut sink,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    // The append failure is what the caller sees.
    match err {
        EngineError::Journal { path, .. } => assert_eq!(path, Path::new("/dev/full")),
        other => panic!("expected a journal error, got {other:?}"),
    }
    assert_eq!(sink.discarded(), 1);

    let warnings = LOGGER.warnings.lock().unwrap();
    assert!(
        warnings.iter().any(|w| w.starts_with("Journal teardown after a failed run")),
        "teardown failure not reported: {warnings:?}"
    );
}
