//! Core systems for Horizon Measure.
//!
//! This crate provides the foundational pieces shared by the measurement
//! crates:
//!
//! - **Thread Pool**: background execution with awaitable task handles
//! - **Logging**: tracing targets, span names and performance spans
//!
//! # Background Task Example
//!
//! ```no_run
//! use horizon_measure_core::threadpool::{ThreadPool, ThreadPoolConfig};
//!
//! let pool = ThreadPool::new(ThreadPoolConfig::with_threads(2))?;
//! let handle = pool.spawn(|| "measured".len());
//! assert_eq!(handle.wait(), Ok(8));
//! # Ok::<(), horizon_measure_core::ThreadPoolError>(())
//! ```

mod error;
pub mod logging;
pub mod threadpool;

pub use error::{panic_message, TaskError, ThreadPoolError};
pub use logging::PerfSpan;
pub use threadpool::{TaskHandle, ThreadPool, ThreadPoolConfig};
