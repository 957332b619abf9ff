//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod audio;
pub mod generation;
pub mod remote;
pub mod secrets;

pub use audio::*;
pub use generation::*;
pub use remote::*;
pub use secrets::*;
