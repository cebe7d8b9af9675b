//! Accept loop handing sockets to the per-connection core.

pub mod listener;
