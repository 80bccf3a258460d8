//! Command-line interface for the `coursepath` application.
//!
//! This binary is a thin entry point; argument parsing, configuration and
//! the commands live in the `coursepath` library.

fn main() -> anyhow::Result<()> {
    coursepath::run()
}
