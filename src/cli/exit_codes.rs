//! exit codes for gridfilter commands
//!
//! these follow Unix conventions where 0 = success and non-zero = error
//! specific codes help scripts distinguish between failure types

/// command completed successfully
pub const SUCCESS: i32 = 0;

/// general or unknown error
pub const ERROR: i32 = 1;

/// operator code not in the column's catalog
pub const UNKNOWN_OPERATOR: i32 = 2;

/// rows file missing or not a JSON array of objects
pub const ROWS_ERROR: i32 = 3;

/// invalid command-line arguments
pub const INVALID_ARGS: i32 = 4;

/// configuration file error
pub const CONFIG_ERROR: i32 = 5;

/// column not present in the rows
pub const COLUMN_NOT_FOUND: i32 = 6;
