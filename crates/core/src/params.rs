//! Parameter resolution for the control binary

use std::ffi::OsString;

/// Display mode, volume and brightness applied when the hook gets no arguments
pub const DEFAULT_PARAMS: [&str; 6] = [
    "--mode",
    "1920x1200-60hz",
    "--vol",
    "1",
    "--brightness",
    "2",
];

/// The built-in default parameter list as owned strings
pub fn default_params() -> Vec<String> {
    DEFAULT_PARAMS.iter().map(|s| s.to_string()).collect()
}

/// Use `args` verbatim if any were given, otherwise `defaults`.
///
/// The two are never merged and nothing is validated. Arguments need not be
/// UTF-8.
pub fn resolve_params(args: &[OsString], defaults: &[OsString]) -> Vec<OsString> {
    if args.is_empty() {
        defaults.to_vec()
    } else {
        args.to_vec()
    }
}
