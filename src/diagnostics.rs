//! Parser diagnostics: the `file:line:col: kind: message` stream.
//!
//! This is deliberately not built on a logging facade. The wire format is
//! part of the external interface (errors drive the process exit code,
//! notes/warnings are meant to be read by a human at a terminal), so
//! diagnostics are written straight to a caller-supplied sink rather than
//! routed through `log`/`tracing`, matching `parser_messg`/`fprintf(stderr,
//! ...)` in the original reader.

use std::fmt;
use std::io::{self, Write};

use crate::location::Location;

/// The five message kinds the reader and miner can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Error,
    Warning,
    /// A warning that is only ever printed once per document.
    WarningOnce,
    Note,
    Hint,
}

impl Kind {
    fn as_str(self) -> &'static str {
        match self {
            Kind::Error => "error",
            Kind::Warning => "warning",
            Kind::WarningOnce => "warning(once)",
            Kind::Note => "note",
            Kind::Hint => "hint",
        }
    }
}

/// One formatted diagnostic, addressed at a source location or at the
/// document as a whole.
pub struct Diagnostic<'a> {
    pub source: &'a str,
    pub location: Option<Location>,
    pub kind: Kind,
    pub message: &'a str,
}

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) if loc.line_no != 0 => {
                write!(f, "{}:{}: {}: {}", self.source, loc, self.kind.as_str(), self.message)
            }
            _ => write!(f, "{}: {}: {}", self.source, self.kind.as_str(), self.message),
        }
    }
}

/// Sink for a single document's diagnostics: owns the error counter, the
/// one-shot suppression flags, and the `extra_messages_allowed` toggle.
pub struct Diagnostics<W: Write> {
    out: W,
    source: String,
    errors: u32,
    /// Global opt-out for purely informational messages (unresolved-alias
    /// notes, skip notes, balance-checking notes). Errors and warnings are
    /// always printed.
    allow_extra: bool,
    warned_max_line_no: bool,
    warned_max_col_no: bool,
    warned_unresolved_alias: bool,
    warned_unknown_balance: bool,
}

impl<W: Write> Diagnostics<W> {
    pub fn new(out: W, source: impl Into<String>) -> Self {
        Diagnostics {
            out,
            source: source.into(),
            errors: 0,
            allow_extra: true,
            warned_max_line_no: false,
            warned_max_col_no: false,
            warned_unresolved_alias: false,
            warned_unknown_balance: false,
        }
    }

    pub fn with_extra_messages(mut self, allow: bool) -> Self {
        self.allow_extra = allow;
        self
    }

    pub fn extra_messages_allowed(&self) -> bool {
        self.allow_extra
    }

    pub fn errors(&self) -> u32 {
        self.errors
    }

    fn write(&mut self, location: Option<Location>, kind: Kind, message: fmt::Arguments<'_>) {
        let message = message.to_string();
        let diag = Diagnostic {
            source: &self.source,
            location,
            kind,
            message: &message,
        };
        // A write failure to stderr has nowhere sane to propagate to from
        // inside the parser's error-recovery path; best effort only.
        let _ = writeln!(self.out, "{}", diag);
    }

    /// Emits an error at `location` and increments the error counter.
    pub fn error(&mut self, location: Location, message: fmt::Arguments<'_>) {
        self.errors += 1;
        self.write(Some(location), Kind::Error, message);
    }

    /// Emits an error with no associated location.
    pub fn error_unlocated(&mut self, message: fmt::Arguments<'_>) {
        self.errors += 1;
        self.write(None, Kind::Error, message);
    }

    pub fn warning(&mut self, location: Location, message: fmt::Arguments<'_>) {
        self.write(Some(location), Kind::Warning, message);
    }

    pub fn note(&mut self, location: Location, message: fmt::Arguments<'_>) {
        self.write(Some(location), Kind::Note, message);
    }

    /// Emits `message` as `warning(once)` the first time it's called,
    /// silently does nothing afterwards. `flag` selects which one-shot
    /// latch to check — callers pass one of the `note_once_*`/`warn_once_*`
    /// helpers below rather than poking the flags directly.
    pub fn warn_once_max_line_no(&mut self, location: Location) {
        if !self.warned_max_line_no {
            self.warned_max_line_no = true;
            self.write(
                Some(location),
                Kind::Note,
                format_args!("this is the last tracked line number"),
            );
        }
    }

    pub fn warn_once_max_col_no(&mut self, location: Location) {
        if !self.warned_max_col_no {
            self.warned_max_col_no = true;
            self.write(
                Some(location),
                Kind::Note,
                format_args!("this is the last tracked column number"),
            );
        }
    }

    /// Returns `true` the first time it's called (caller should emit the
    /// unresolved-alias warning/note), `false` on every later call.
    pub fn latch_unresolved_alias(&mut self) -> bool {
        if self.warned_unresolved_alias {
            false
        } else {
            self.warned_unresolved_alias = true;
            true
        }
    }

    /// Returns `true` the first time it's called (caller should emit the
    /// unknown-tag-balance warning), `false` on every later call.
    pub fn latch_unknown_balance(&mut self) -> bool {
        if self.warned_unknown_balance {
            false
        } else {
            self.warned_unknown_balance = true;
            true
        }
    }
}

/// Convenience constructor matching the common case of reporting to
/// standard error.
pub fn stderr_diagnostics(source: impl Into<String>) -> Diagnostics<io::Stderr> {
    Diagnostics::new(io::stderr(), source)
}
