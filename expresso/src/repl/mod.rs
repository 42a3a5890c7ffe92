//! Interactive session state, independent of any line editor.
//!
//! A [`ReplSession`] keeps variables bound with `:set` between lines and
//! turns each input line into a [`ReplResult`] the front end can print.

mod command;
mod session;

pub use command::Command;
pub use session::{render, ReplResult, ReplSession, ANSWER_VARIABLE};
