//! Tool domain module.
//!
//! A tool is identified by its format and code. It is mounted on at most
//! one press and carries a regenerating flag that mirrors its open
//! regeneration record.

mod data;

pub use data::{NewTool, Tool, ToolData, ToolFormat, MAX_CODE_LENGTH, MAX_FORMAT_SIDE};
