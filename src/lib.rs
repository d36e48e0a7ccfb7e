//! problem-server: a line-oriented TCP service for small text problems.
//!
//! A client sends a problem identifier and the input lines that problem
//! needs; the server answers with one line of text and closes the
//! connection.
//!
//! Modules, leaf to root:
//! - `protocol`: newline framing of request fields
//! - `problems`: problem registry and the ten solvers
//! - `handler`: one request per connection
//! - `server`: accept loop
//! - `config` / `logging`: server startup
//! - `client`: request helper and input validation for the client binary

pub mod client;
pub mod config;
pub mod handler;
pub mod logging;
pub mod problems;
pub mod protocol;
pub mod server;
