//! Process exit codes. Part of the public contract for scripts wrapping
//! `qagate`.

use qagate_core::errors::CurateError;

pub const SUCCESS: i32 = 0;
pub const INTERNAL_ERROR: i32 = 1;
pub const CONFIG_ERROR: i32 = 2; // Bad config file, flags, or provider setup
pub const INPUT_ERROR: i32 = 3; // Input corpus missing or corrupt
pub const OUTPUT_ERROR: i32 = 4; // An output artifact could not be written

pub fn for_error(err: &CurateError) -> i32 {
    match err {
        CurateError::InputNotFound { .. } | CurateError::InputCorrupt { .. } => INPUT_ERROR,
        CurateError::Config { .. } => CONFIG_ERROR,
        CurateError::Output { .. } => OUTPUT_ERROR,
    }
}
