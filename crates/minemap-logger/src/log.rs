use crate::severity::LogSeverity;
use crate::systime::now;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU8, Ordering};

// Messages below this severity are dropped
static MIN_SEVERITY: Lazy<AtomicU8> = Lazy::new(|| AtomicU8::new(LogSeverity::Info as u8));

pub fn set_min_severity(severity: LogSeverity) {
    MIN_SEVERITY.store(severity as u8, Ordering::Relaxed);
}

pub fn enabled(severity: LogSeverity) -> bool {
    severity >= LogSeverity::from_u8(MIN_SEVERITY.load(Ordering::Relaxed))
}

pub fn log(msg: String, log_severity: LogSeverity) {
    if !enabled(log_severity) {
        return;
    }
    match log_severity {
        LogSeverity::Error | LogSeverity::Fatal => {
            eprintln!("[{}] {} {}", log_severity, now(), msg)
        }
        _ => println!("[{}] {} {}", log_severity, now(), msg),
    }
}
