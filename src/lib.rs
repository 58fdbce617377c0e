// vcdctl: command-line client for VMware Cloud Director
// The library holds the session client, the resource accessors and the
// command dispatch used by the binary.

pub mod api;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod paging;
pub mod validation;
pub mod xml;
