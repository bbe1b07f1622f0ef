//! Process exit codes
//!
//! Everything above 63 follows BSD `sysexits.h`.

pub const OK: i32 = 0;

/// `navtree check` found fragment failures or an unsorted index
pub const CHECK_FAILED: i32 = 1;

/// Bad arguments, or an index position past the end
pub const USAGE: i32 = 64;

/// Navigation data does not parse or violates the tree rules
pub const DATAERR: i32 = 65;

/// Documentation directory, navigation data or requested entry is missing
pub const NOINPUT: i32 = 66;

/// A deferred fragment could not be loaded
pub const UNAVAILABLE: i32 = 69;

pub const IOERR: i32 = 74;

/// Settings could not be read or parsed
pub const CONFIG: i32 = 78;
