//! Thread pool for background task execution.
//!
//! Provides a global thread pool built on rayon with work-stealing scheduling.
//! Work submitted here never runs on the caller's thread; completion is
//! observed through a [`TaskHandle`], which is a `Future` and can also be
//! waited on synchronously.
//!
//! # Example
//!
//! ```no_run
//! use horizon_measure_core::threadpool::ThreadPool;
//!
//! // Get the global thread pool
//! let pool = ThreadPool::global();
//!
//! // Submit a simple task
//! let handle = pool.spawn(|| {
//!     // Expensive computation
//!     42
//! });
//!
//! // Wait for the result
//! assert_eq!(handle.wait(), Ok(42));
//! ```
//!
//! # Async Example
//!
//! ```no_run
//! use horizon_measure_core::threadpool::ThreadPool;
//!
//! # async fn run() {
//! let value = ThreadPool::global().spawn(|| 6 * 7).await;
//! assert_eq!(value, Ok(42));
//! # }
//! ```

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::task::{Context, Poll};

use rayon::{ThreadPool as RayonThreadPool, ThreadPoolBuilder};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::error::{panic_message, TaskError, ThreadPoolError};
use crate::logging::targets;

/// Global thread pool instance.
static GLOBAL_POOL: OnceLock<ThreadPool> = OnceLock::new();

/// Counter for unique task IDs.
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// A handle to a spawned task that allows waiting for its result.
///
/// The handle resolves exactly once. Awaiting it never blocks an executor
/// thread; [`TaskHandle::wait`] blocks the current thread instead and must not
/// be called from inside an async runtime.
#[derive(Debug)]
pub struct TaskHandle<T> {
    id: u64,
    receiver: oneshot::Receiver<Result<T, TaskError>>,
}

impl<T> TaskHandle<T> {
    /// Get the unique task ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Try to get the result without blocking.
    ///
    /// Returns `None` while the task is still running.
    pub fn try_get(&mut self) -> Option<Result<T, TaskError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(TaskError::Abandoned)),
        }
    }

    /// Wait for the task to complete and return its result.
    ///
    /// This blocks the current thread until the task finishes.
    pub fn wait(self) -> Result<T, TaskError> {
        self.receiver
            .blocking_recv()
            .unwrap_or(Err(TaskError::Abandoned))
    }
}

impl<T> Future for TaskHandle<T> {
    type Output = Result<T, TaskError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(TaskError::Abandoned)),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Configuration for creating a custom thread pool.
#[derive(Debug, Clone)]
pub struct ThreadPoolConfig {
    /// Number of worker threads. `None` means use the number of CPU cores.
    pub num_threads: Option<usize>,
    /// Name prefix for worker threads.
    pub thread_name: String,
    /// Stack size for worker threads in bytes.
    pub stack_size: Option<usize>,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            thread_name: "horizon-measure".to_string(),
            stack_size: None,
        }
    }
}

impl ThreadPoolConfig {
    /// Create a new configuration with custom thread count.
    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads: Some(num_threads),
            ..Default::default()
        }
    }

    /// Set the worker thread name prefix.
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}

/// A thread pool for executing background tasks.
///
/// The thread pool uses rayon's work-stealing scheduler. Tasks that panic are
/// contained: the panic is reported through the task's handle instead of
/// tearing down the worker.
pub struct ThreadPool {
    pool: RayonThreadPool,
    active_tasks: Arc<AtomicUsize>,
}

impl ThreadPool {
    /// Get the global thread pool instance.
    ///
    /// The global pool is lazily initialized with default settings
    /// (number of threads = number of CPU cores).
    pub fn global() -> &'static ThreadPool {
        GLOBAL_POOL.get_or_init(|| {
            ThreadPool::new(ThreadPoolConfig::default())
                .expect("Failed to create global thread pool")
        })
    }

    /// Initialize the global thread pool with custom configuration.
    ///
    /// This must be called before any other use of [`ThreadPool::global`].
    /// Returns an error if the pool has already been initialized.
    pub fn init_global(config: ThreadPoolConfig) -> Result<&'static ThreadPool, ThreadPoolError> {
        let pool = ThreadPool::new(config)?;
        GLOBAL_POOL
            .set(pool)
            .map_err(|_| ThreadPoolError::AlreadyInitialized)?;
        GLOBAL_POOL.get().ok_or(ThreadPoolError::AlreadyInitialized)
    }

    /// Create a new thread pool with the given configuration.
    pub fn new(config: ThreadPoolConfig) -> Result<Self, ThreadPoolError> {
        let thread_name = config.thread_name.clone();
        let mut builder =
            ThreadPoolBuilder::new().thread_name(move |index| format!("{thread_name}-{index}"));

        if let Some(num_threads) = config.num_threads {
            builder = builder.num_threads(num_threads);
        }

        if let Some(stack_size) = config.stack_size {
            builder = builder.stack_size(stack_size);
        }

        let pool = builder
            .build()
            .map_err(|e| ThreadPoolError::CreationFailed(e.to_string()))?;

        tracing::debug!(
            target: targets::THREADPOOL,
            threads = pool.current_num_threads(),
            name = %config.thread_name,
            "thread pool created"
        );

        Ok(Self {
            pool,
            active_tasks: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Get the number of threads in the pool.
    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Get the number of currently active (queued or running) tasks.
    pub fn active_tasks(&self) -> usize {
        self.active_tasks.load(Ordering::Acquire)
    }

    /// Spawn a task on the thread pool.
    ///
    /// Returns a handle that can be awaited or waited on for the result.
    pub fn spawn<F, T>(&self, task: F) -> TaskHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let id = NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = oneshot::channel();

        self.run_contained(id, task, move |result| {
            // The receiver may already be gone; nobody is interested then.
            let _ = sender.send(result);
        });

        TaskHandle { id, receiver }
    }

    /// Spawn a task and deliver its outcome to a callback.
    ///
    /// The callback runs on the worker thread that executed the task, right
    /// after the task finishes.
    pub fn spawn_with_callback<F, T, C>(&self, task: F, callback: C)
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
        C: FnOnce(Result<T, TaskError>) + Send + 'static,
    {
        let id = NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed);
        self.run_contained(id, task, callback);
    }

    /// Run `task` on the pool, catching panics, and hand the outcome to `deliver`.
    fn run_contained<F, T, D>(&self, id: u64, task: F, deliver: D)
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
        D: FnOnce(Result<T, TaskError>) + Send + 'static,
    {
        self.active_tasks.fetch_add(1, Ordering::AcqRel);
        let active_tasks = self.active_tasks.clone();

        self.pool.spawn(move || {
            let _span = tracing::trace_span!(target: targets::THREADPOOL, "task", id).entered();

            let result = panic::catch_unwind(AssertUnwindSafe(task))
                .map_err(|payload| TaskError::Panicked(panic_message(&*payload)));

            if let Err(err) = &result {
                tracing::warn!(target: targets::THREADPOOL, id, %err, "task failed");
            }

            active_tasks.fetch_sub(1, Ordering::AcqRel);
            deliver(result);
        });
    }
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("num_threads", &self.num_threads())
            .field("active_tasks", &self.active_tasks())
            .finish()
    }
}
