//! Request middleware for tracing and origin filtering.

pub mod origin_blacklist;
pub mod trace;

pub use origin_blacklist::OriginBlacklist;
pub use trace::Trace;
