//! Web 路由处理器

pub mod faqs;
pub mod health;
pub mod stats;

pub use faqs::*;
pub use health::*;
pub use stats::*;
