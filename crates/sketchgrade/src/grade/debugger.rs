//! Per-grader feedback buffer.

/// Explanation lines for one grader run.
///
/// Disabled debuggers drop every line without formatting it.
#[derive(Clone, Debug, Default)]
pub struct Debugger {
    enabled: bool,
    lines: Vec<String>,
}

impl Debugger {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            lines: Vec::new(),
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a line; `line` is only evaluated when enabled.
    pub fn note(&mut self, line: impl FnOnce() -> String) {
        if self.enabled {
            self.lines.push(line());
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Hand over the collected lines and start empty.
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}
