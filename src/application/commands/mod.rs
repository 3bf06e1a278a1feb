//! 应用层 - 命令
//!
//! 只有一个写操作：生成并持久化音乐片段

mod generate_commands;

pub mod handlers;

pub use generate_commands::*;
