use crate::error::InstallError;
use std::io::Write;

// https://apps.timwhitlock.info/emoji/tables/unicode
const EMOJI_FILE: &str = "\u{1F4C0}";
const EMOJI_KO: &str = "\u{274C}";
const EMOJI_OK: &str = "\u{2705}";

/// Status callbacks decoupling console formatting from the resolver logic.
pub trait StatusReporter {
    /// Announce a step about to run. No trailing newline until the outcome.
    fn begin(&self, label: &str);
    fn success(&self);
    fn failure(&self);
    fn info(&self, message: &str);
}

/// Emoji-prefixed console output, labels left-justified to a fixed width.
pub struct ConsoleReporter {
    justify: usize,
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self { justify: 48 }
    }
}

impl StatusReporter for ConsoleReporter {
    fn begin(&self, label: &str) {
        print!("{EMOJI_FILE} {:<width$}", label, width = self.justify);
        let _ = std::io::stdout().flush();
    }

    fn success(&self) {
        println!("{EMOJI_OK}");
    }

    fn failure(&self) {
        println!("{EMOJI_KO}");
    }

    fn info(&self, message: &str) {
        println!("   {message}");
    }
}

/// Run one step with begin/success/failure reporting around it.
pub fn run_step<T>(
    reporter: &dyn StatusReporter,
    label: &str,
    step: impl FnOnce() -> Result<T, InstallError>,
) -> Result<T, InstallError> {
    reporter.begin(label);
    match step() {
        Ok(value) => {
            reporter.success();
            Ok(value)
        }
        Err(e) => {
            reporter.failure();
            Err(e)
        }
    }
}
