//! Worker Layer - Background Task Processing
//!
//! 实现 GenerationWorker，执行已登记的生成运行

mod generation_worker;

pub use generation_worker::{GenerationWorker, GenerationWorkerConfig};
