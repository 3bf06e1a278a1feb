//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod codec;
pub mod gateway;
pub mod storage;

pub use codec::*;
pub use gateway::*;
pub use storage::*;
