//! Worker pools.
//!
//! A worker pool accepts boxed futures and runs them off the caller's
//! thread. Submission never blocks.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::{Builder, Handle, Runtime};
use tracing::{debug, info};

use crate::error::{ExecError, ExecResult};

/// A job handed to a worker pool
pub type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Anything that can run jobs on worker threads.
pub trait WorkerPool: Send + Sync + 'static {
    /// Queue a job for execution.
    ///
    /// # Errors
    /// Returns `ExecError::Rejected` if the pool no longer accepts work.
    /// The job is dropped in that case.
    fn submit(&self, job: Job) -> ExecResult<()>;
}

// =============================================================================
// PoolConfig
// =============================================================================

/// Sizing of a [`JobExecutor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Runtime threads kept alive for the lifetime of the pool
    pub core_size: usize,
    /// Upper bound on jobs running at once, one thread each
    pub max_size: usize,
    /// How long an idle job thread lingers before it is reclaimed
    pub keep_alive: Duration,
    /// Thread name prefix; a sequence number is appended
    pub thread_name_prefix: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            core_size: 3,
            max_size: 5,
            keep_alive: Duration::from_secs(10),
            thread_name_prefix: "cueball-worker-".to_string(),
        }
    }
}

impl PoolConfig {
    /// Check sizes before building a runtime.
    pub fn validate(&self) -> ExecResult<()> {
        if self.core_size == 0 {
            return Err(ExecError::Config("core_size must be at least 1".to_string()));
        }
        if self.max_size < self.core_size {
            return Err(ExecError::Config(format!(
                "max_size ({}) must not be below core_size ({})",
                self.max_size, self.core_size
            )));
        }
        Ok(())
    }
}

// =============================================================================
// JobExecutor
// =============================================================================

/// Bounded thread pool backed by a dedicated multi-threaded tokio runtime.
///
/// Each job gets a thread from the runtime's blocking pool and is driven
/// there with `block_on`, so a job may block on I/O without holding up
/// the others. Threads are started on demand up to `max_size`; further jobs
/// queue in submission order. Idle threads exit after `keep_alive`.
///
/// Dropping the executor shuts the runtime down in the background; jobs
/// still running lose their timers and I/O.
pub struct JobExecutor {
    runtime: Option<Runtime>,
    handle: Handle,
    accepting: AtomicBool,
    config: PoolConfig,
}

impl JobExecutor {
    /// Build a pool with the given sizing.
    pub fn new(config: PoolConfig) -> ExecResult<Self> {
        config.validate()?;

        let prefix = config.thread_name_prefix.clone();
        let counter = Arc::new(AtomicUsize::new(0));
        let runtime = Builder::new_multi_thread()
            .worker_threads(config.core_size)
            .max_blocking_threads(config.max_size)
            .thread_keep_alive(config.keep_alive)
            .thread_name_fn(move || format!("{}{}", prefix, counter.fetch_add(1, Ordering::Relaxed)))
            .enable_all()
            .build()
            .map_err(|e| ExecError::Config(format!("failed to start worker pool: {}", e)))?;

        info!(
            core_size = config.core_size,
            max_size = config.max_size,
            keep_alive_secs = config.keep_alive.as_secs(),
            "Worker pool started"
        );

        Ok(Self {
            handle: runtime.handle().clone(),
            runtime: Some(runtime),
            accepting: AtomicBool::new(true),
            config,
        })
    }

    /// Sizing this pool was built with
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Stop accepting jobs. Jobs already submitted keep running.
    pub fn close(&self) {
        if self.accepting.swap(false, Ordering::SeqCst) {
            debug!("Worker pool closed to new jobs");
        }
    }
}

impl WorkerPool for JobExecutor {
    fn submit(&self, job: Job) -> ExecResult<()> {
        if !self.accepting.load(Ordering::SeqCst) {
            return Err(ExecError::Rejected("worker pool is closed".to_string()));
        }
        let handle = self.handle.clone();
        self.handle.spawn_blocking(move || handle.block_on(job));
        Ok(())
    }
}

impl Drop for JobExecutor {
    fn drop(&mut self) {
        self.accepting.store(false, Ordering::SeqCst);
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
            debug!("Worker pool shut down");
        }
    }
}

// =============================================================================
// HandlePool
// =============================================================================

/// Pool that spawns onto an existing tokio runtime.
#[derive(Debug, Clone)]
pub struct HandlePool {
    handle: Handle,
}

impl HandlePool {
    /// Wrap a runtime handle
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Use the runtime the caller is running on.
    ///
    /// # Errors
    /// Returns `ExecError::Config` outside a tokio runtime
    pub fn current() -> ExecResult<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| ExecError::Config(format!("no tokio runtime: {}", e)))
    }
}

impl WorkerPool for HandlePool {
    fn submit(&self, job: Job) -> ExecResult<()> {
        self.handle.spawn(job);
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
