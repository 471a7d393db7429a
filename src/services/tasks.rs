use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub type TaskResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
type TaskFuture = Pin<Box<dyn Future<Output = TaskResult> + Send>>;
type TaskFn = Box<dyn Fn() -> TaskFuture + Send + Sync>;

/// Retry policy for queued tasks: exponential backoff, doubled per attempt
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (zero-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff * 2u32.saturating_pow(attempt)
    }
}

struct QueuedTask {
    name: String,
    policy: RetryPolicy,
    job: TaskFn,
}

/// In-process background task queue.
///
/// Tasks are submitted fire-and-forget and executed sequentially by a worker
/// loop; a failing task is retried with exponential backoff up to its retry
/// cap, then dropped with an error log. Queued work dies with the process.
pub struct TaskQueue {
    tx: mpsc::UnboundedSender<QueuedTask>,
}

impl TaskQueue {
    /// Start the queue and its worker loop
    pub fn start() -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<QueuedTask>();

        tokio::spawn(async move {
            while let Some(task) = rx.recv().await {
                run_with_retries(task).await;
            }
        });

        Self { tx }
    }

    /// Fire-and-forget task submission
    pub fn submit<F, Fut>(&self, name: &str, policy: RetryPolicy, job: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskResult> + Send + 'static,
    {
        let task = QueuedTask {
            name: name.to_string(),
            policy,
            job: Box::new(move || Box::pin(job())),
        };

        if self.tx.send(task).is_err() {
            error!("task queue is closed, dropping task");
        }
    }
}

async fn run_with_retries(task: QueuedTask) {
    let mut attempt = 0;
    loop {
        match (task.job)().await {
            Ok(()) => {
                info!(task = %task.name, "task completed");
                return;
            }
            Err(e) if attempt < task.policy.max_retries => {
                let delay = task.policy.backoff_for(attempt);
                warn!(
                    task = %task.name,
                    error = %e,
                    attempt,
                    delay_secs = delay.as_secs(),
                    "task failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                error!(task = %task.name, error = %e, "task failed permanently");
                return;
            }
        }
    }
}

/// Run a job on a fixed interval. The first run happens one interval after
/// startup, not immediately.
pub fn spawn_periodic<F, Fut>(name: &'static str, every: Duration, job: F)
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = TaskResult> + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.tick().await;
        loop {
            interval.tick().await;
            info!(task = name, "periodic task starting");
            if let Err(e) = job().await {
                warn!(task = name, error = %e, "periodic task failed");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_for(0), Duration::from_secs(60));
        assert_eq!(policy.backoff_for(1), Duration::from_secs(120));
        assert_eq!(policy.backoff_for(2), Duration::from_secs(240));
    }

    #[tokio::test]
    async fn test_submitted_task_runs() {
        let queue = TaskQueue::start();
        let counter = Arc::new(AtomicU32::new(0));

        let task_counter = counter.clone();
        queue.submit("count", RetryPolicy::none(), move || {
            let task_counter = task_counter.clone();
            async move {
                task_counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_task_is_retried_up_to_cap() {
        let queue = TaskQueue::start();
        let attempts = Arc::new(AtomicU32::new(0));

        let task_attempts = attempts.clone();
        let policy = RetryPolicy {
            max_retries: 2,
            backoff: Duration::from_millis(1),
        };
        queue.submit("always-fails", policy, move || {
            let task_attempts = task_attempts.clone();
            async move {
                task_attempts.fetch_add(1, Ordering::SeqCst);
                Err("boom".into())
            }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        // Initial attempt plus two retries
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }
}
