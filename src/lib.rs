//! Configuration engine of the gitview repository browser.
//!
//! Settings come from a system file (or the compiled-in defaults), the
//! user's file, the repository's git configuration and the command line.
//! [`utils::load_configuration`] runs that whole sequence and returns the
//! resulting [`core::engine::ConfigEngine`].
pub mod builders;
pub mod core;
pub mod utils;
