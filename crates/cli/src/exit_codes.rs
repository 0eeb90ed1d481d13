//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success (at least one report accepted)               |
//! | 1    | General error                                        |
//! | 2    | Usage error (bad arguments)                          |
//! | 3    | Nothing usable: every input file was rejected        |
//! | 4    | Settings or ignore-list could not be loaded          |
//!
//! Individual rejected files never change the exit code on their own; they
//! are reported next to the accepted summaries.

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure (e.g. cannot write output).
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Every file in the batch was rejected; zero summaries survived.
pub const EXIT_NOTHING_USABLE: u8 = 3;

/// settings.toml or the ignore-list exists but could not be read or parsed.
pub const EXIT_CONFIG: u8 = 4;
