//! 工具函数模块

pub mod helpers;

pub use helpers::ServiceHelper;
