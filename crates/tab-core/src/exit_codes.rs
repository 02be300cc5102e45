//! Exit codes for the tabsplit CLI.
//!
//! Exit codes communicate operation outcome without requiring output parsing.
//!
//! Exit code ranges:
//! - 0: Success
//! - 1-3: Rejection verdicts (which gate refused the input; parse outcome
//!   from code, not output)
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors (bugs, should be reported)

/// Exit codes for tabsplit operations.
///
/// These codes are a stable contract for automation. Changes require
/// a major version bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    // ========================================================================
    // Success / Rejection Verdicts (0-3)
    // ========================================================================
    /// Success: input accepted, output produced
    Clean = 0,

    /// Receipt JSON failed structural validation
    ReceiptInvalid = 1,

    /// Share link or token could not be decoded
    LinkInvalid = 2,

    /// Vision analysis failed (upstream error or unusable reply)
    AnalysisFailed = 3,

    // ========================================================================
    // User / Environment Errors (10-19)
    // ========================================================================
    /// Invalid arguments
    ArgsError = 10,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates success.
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean)
    }

    /// Check if this exit code is a verdict on the input (codes 0-3).
    /// These are not faults - they communicate which gate refused.
    pub fn is_verdict(self) -> bool {
        (self as i32) < 10
    }

    /// Check if this exit code is a user/environment error (codes 10-19).
    /// These can be resolved by user action.
    pub fn is_user_error(self) -> bool {
        let code = self as i32;
        (10..20).contains(&code)
    }

    /// Check if this exit code is an internal error (codes 20-29).
    /// These indicate bugs and should be reported.
    pub fn is_internal_error(self) -> bool {
        let code = self as i32;
        code >= 20
    }

    /// Get the error code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::ReceiptInvalid => "ERR_RECEIPT",
            ExitCode::LinkInvalid => "ERR_LINK",
            ExitCode::AnalysisFailed => "ERR_ANALYSIS",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_values_are_stable() {
        assert_eq!(ExitCode::Clean.as_i32(), 0);
        assert_eq!(ExitCode::ReceiptInvalid.as_i32(), 1);
        assert_eq!(ExitCode::LinkInvalid.as_i32(), 2);
        assert_eq!(ExitCode::AnalysisFailed.as_i32(), 3);
        assert_eq!(ExitCode::ArgsError.as_i32(), 10);
        assert_eq!(ExitCode::InternalError.as_i32(), 20);
        assert_eq!(ExitCode::IoError.as_i32(), 21);
    }

    #[test]
    fn test_classification() {
        assert!(ExitCode::Clean.is_success());
        assert!(!ExitCode::ReceiptInvalid.is_success());
        assert!(ExitCode::ReceiptInvalid.is_verdict());
        assert!(ExitCode::LinkInvalid.is_verdict());
        assert!(ExitCode::ArgsError.is_user_error());
        assert!(ExitCode::IoError.is_internal_error());
        assert!(!ExitCode::AnalysisFailed.is_user_error());
    }

    #[test]
    fn test_display_includes_name_and_code() {
        assert_eq!(ExitCode::LinkInvalid.to_string(), "ERR_LINK (2)");
    }
}
