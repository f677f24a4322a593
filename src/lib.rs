#![doc = include_str!("../README.md")]
//! > _Note_: This documentation is auto-generated
//! > from the project's README.md file.

pub mod codec;
pub mod cursor;
pub mod format;
pub mod types;
