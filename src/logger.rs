use std::sync::Arc;

use colored::{self, Colorize};

#[repr(u8)]
#[derive(Clone, Copy)]
enum SEVERITY {
    FATAL = 2,
    WARN = 4,
    INFO = 5,
    VERBOSE = 6,
    DEBUG = 7,
}

pub trait Logging: Send + Sync {
    fn fatal(&self, message: &str);
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
    fn verbose(&self, message: &str);
    fn debug(&self, message: &str);
}

pub struct Logger {
    log_level: u8,
}

impl Logger {
    pub fn new(log_level: u8) -> Self {
        Logger { log_level }
    }

    fn enabled(&self, severity: SEVERITY) -> bool {
        self.log_level >= severity as u8
    }
}

// Logs go to stderr so the one-shot subcommands can keep stdout for JSON.
impl Logging for Logger {
    fn fatal(&self, message: &str) {
        if self.enabled(SEVERITY::FATAL) {
            let log_message = format!("[fatal] {message}");
            eprintln!("{}", log_message.red())
        }
    }

    fn warn(&self, message: &str) {
        if self.enabled(SEVERITY::WARN) {
            let log_message = format!("[warn] {message}");
            eprintln!("{}", log_message.yellow())
        }
    }

    fn info(&self, message: &str) {
        if self.enabled(SEVERITY::INFO) {
            let log_message = format!("[info] {message}");
            eprintln!("{}", log_message.green())
        }
    }

    fn verbose(&self, message: &str) {
        if self.enabled(SEVERITY::VERBOSE) {
            let log_message = format!("[verbose] {message}");
            eprintln!("{}", log_message.truecolor(128, 128, 128))
        }
    }

    fn debug(&self, message: &str) {
        if self.enabled(SEVERITY::DEBUG) {
            let log_message = format!("[debug] {message}");
            eprintln!("{}", log_message.truecolor(128, 128, 128))
        }
    }
}

impl<T: Logging + ?Sized> Logging for Arc<T> {
    fn fatal(&self, message: &str) {
        (**self).fatal(message)
    }

    fn warn(&self, message: &str) {
        (**self).warn(message)
    }

    fn info(&self, message: &str) {
        (**self).info(message)
    }

    fn verbose(&self, message: &str) {
        (**self).verbose(message)
    }

    fn debug(&self, message: &str) {
        (**self).debug(message)
    }
}
