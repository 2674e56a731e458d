//! 应用配置
//!
//! 加载顺序：`config.toml` → `config.{APP_ENV}.toml` → `CAMPUS_*` 环境变量 → 显式覆盖项。

mod r#impl;
mod structs;

pub use structs::*;
