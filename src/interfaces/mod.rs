//! Input and output adapters for the command-line shell.

pub mod csv;
