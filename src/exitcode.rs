//! Process exit codes, following BSD sysexits.h

/// Bad command line: unknown flag value, blank name, malformed share id
pub const USAGE: i32 = 64;

/// Malformed snapshot, invalid node data, or a tree operation the engine refused
pub const DATAERR: i32 = 65;

/// Region (or shared snapshot) does not exist
pub const NOINPUT: i32 = 66;

/// Store could not be read or written
pub const SOFTWARE: i32 = 70;

/// Data directory could not be created
pub const CANTCREAT: i32 = 73;

/// Unreadable global config or bad `ORGTREE_*` value
pub const CONFIG: i32 = 78;
