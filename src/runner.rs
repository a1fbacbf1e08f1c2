//! Runs independent tasks in parallel and collects their failures.

use std::any::Any;
use std::cell::Cell;
use std::error::Error;
use std::fmt::{ self, Debug, Display };
use std::panic::{ self, AssertUnwindSafe };
use std::sync::{ Mutex, Once, PoisonError };
use std::thread;

/// What to do with failures of parallel tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorLogPolicy {
    /// Failures are only collected in the [`RunReport`].
    Noop,
    /// Failures are printed to standard error, with their cause chain.
    #[default]
    Stderr,
    /// Failures are emitted as `tracing` error events.
    Tracing,
    /// Both [`ErrorLogPolicy::Stderr`] and [`ErrorLogPolicy::Tracing`].
    StderrAndTracing,
}

impl ErrorLogPolicy {
    fn prints_to_stderr(self) -> bool {
        matches!(self, ErrorLogPolicy::Stderr | ErrorLogPolicy::StderrAndTracing)
    }

    fn uses_tracing(self) -> bool {
        matches!(self, ErrorLogPolicy::Tracing | ErrorLogPolicy::StderrAndTracing)
    }

    /// Logs `message`, and `cause` with its sources if given.
    pub fn log(self, message: &str, cause: Option<&(dyn Error + 'static)>) {
        if self.uses_tracing() {
            match cause {
                Some(e) => tracing::error!(error = %e, "{}", message),
                None => tracing::error!("{}", message),
            }
        }
        if self.prints_to_stderr() {
            eprintln!("{}", message);
            let mut source = cause;
            let mut prefix = "";
            while let Some(e) = source {
                eprintln!("\t{}{}", prefix, e);
                prefix = "caused by: ";
                source = e.source();
            }
        }
    }
}

/// Settings of [`run_in_parallel`].
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// How failures are logged.
    pub log_policy: ErrorLogPolicy,
    /// Whether all failures are logged again once every task is done.
    pub remind_failures_at_end: bool,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        RunnerOptions { log_policy: ErrorLogPolicy::Stderr, remind_failures_at_end: true }
    }
}

impl RunnerOptions {
    /// Sets the log policy.
    pub fn with_log_policy(mut self, log_policy: ErrorLogPolicy) -> Self {
        self.log_policy = log_policy;
        self
    }

    /// Sets whether failures are reminded at the end.
    pub fn with_remind_failures_at_end(mut self, remind: bool) -> Self {
        self.remind_failures_at_end = remind;
        self
    }
}

/// Why a task did not complete.
#[derive(Debug)]
pub enum TaskError<E> {
    /// The task returned an error.
    Failed(E),
    /// The task panicked, with the panic message if there was one.
    Panicked(String),
}

impl<E: Display> Display for TaskError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskError::Failed(e) => write!(f, "{}", e),
            TaskError::Panicked(msg) => write!(f, "task panicked: {}", msg),
        }
    }
}

impl<E: Error + 'static> Error for TaskError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TaskError::Failed(e) => e.source(),
            TaskError::Panicked(_) => None,
        }
    }
}

/// A task failure together with the input it ran on.
#[derive(Debug)]
pub struct TaskFailure<I, E> {
    /// Input of the failed task.
    pub input: I,
    /// What went wrong.
    pub error: TaskError<E>,
}

/// Outcome of [`run_in_parallel`].
#[derive(Debug)]
pub struct RunReport<I, E> {
    completed: usize,
    failures: Vec<TaskFailure<I, E>>,
}

impl<I, E> RunReport<I, E> {
    /// Number of tasks that finished without error.
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Failed tasks, in completion order.
    pub fn failures(&self) -> &[TaskFailure<I, E>] {
        &self.failures
    }

    /// `true` if no task failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Takes the failures out of the report.
    pub fn into_failures(self) -> Vec<TaskFailure<I, E>> {
        self.failures
    }
}

/// Runs `task` on every input, each on its own thread, and waits for all of them.
///
/// A task that fails or panics does not affect the others: its failure is logged
/// right away according to `options.log_policy` and recorded in the report.
/// Unless the policy prints to standard error, panics of tasks are not reported
/// by the default panic hook either.
///
/// ```rust
/// # use hashcode_io::runner::{ run_in_parallel, RunnerOptions, ErrorLogPolicy };
/// let options = RunnerOptions::default().with_log_policy(ErrorLogPolicy::Noop);
/// let report = run_in_parallel(vec![1, 2, 3], &options, |n: &i32| {
///     if *n == 2 { Err(std::fmt::Error) } else { Ok(()) }
/// });
/// assert_eq!(report.completed(), 2);
/// assert_eq!(report.failures()[0].input, 2);
/// ```
pub fn run_in_parallel<I, E, F>(inputs: impl IntoIterator<Item = I>, options: &RunnerOptions, task: F) -> RunReport<I, E>
where
    I: Debug + Sync,
    E: Error + Send + 'static,
    F: Fn(&I) -> Result<(), E> + Sync,
{
    let inputs: Vec<I> = inputs.into_iter().collect();
    let failures = Mutex::new(Vec::new());
    let mut completed = 0;
    let policy = options.log_policy;

    thread::scope(|s| {
        let task = &task;
        let failures = &failures;
        let handles: Vec<_> = inputs.iter().enumerate().map(|(index, input)| {
            s.spawn(move || {
                if !policy.prints_to_stderr() {
                    silence_panics_on_this_thread();
                }
                let error = match panic::catch_unwind(AssertUnwindSafe(|| task(input))) {
                    Ok(Ok(())) => return true,
                    Ok(Err(e)) => TaskError::Failed(e),
                    Err(payload) => TaskError::Panicked(panic_message(payload.as_ref())),
                };
                log_failure(policy, input, &error);
                failures.lock().unwrap_or_else(PoisonError::into_inner).push((index, error));
                false
            })
        }).collect();

        for (index, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(true) => completed += 1,
                Ok(false) => {}
                // the thread died outside the task, before its failure was recorded
                Err(payload) => {
                    let error = TaskError::Panicked(panic_message(payload.as_ref()));
                    log_failure(policy, &inputs[index], &error);
                    failures.lock().unwrap_or_else(PoisonError::into_inner).push((index, error));
                }
            }
        }
    });

    let mut slots: Vec<Option<I>> = inputs.into_iter().map(Some).collect();
    let failures: Vec<TaskFailure<I, E>> = failures
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner)
        .into_iter()
        .filter_map(|(index, error)| slots[index].take().map(|input| TaskFailure { input, error }))
        .collect();
    if !failures.is_empty() && options.remind_failures_at_end {
        remind_failures(&failures, policy);
    }
    RunReport { completed, failures }
}

fn log_failure<I: Debug, E: Error + 'static>(policy: ErrorLogPolicy, input: &I, error: &TaskError<E>) {
    if policy == ErrorLogPolicy::Noop {
        return;
    }
    match error {
        TaskError::Failed(e) => policy.log(
            &format!("Uncaught error thrown during task execution on input {:?}:", input),
            Some(e as &(dyn Error + 'static)),
        ),
        TaskError::Panicked(msg) => policy.log(
            &format!("Task panicked on input {:?}: {}", input, msg),
            None,
        ),
    }
}

fn remind_failures<I: Debug, E: Error + 'static>(failures: &[TaskFailure<I, E>], policy: ErrorLogPolicy) {
    if policy == ErrorLogPolicy::Noop {
        return;
    }
    policy.log(&format!("{} tasks terminated abruptly with an error", failures.len()), None);
    for failure in failures {
        let message = format!(
            "Reminder: this error was raised while running on input {:?}: {}",
            failure.input, failure.error
        );
        policy.log(&message, Some(&failure.error as &(dyn Error + 'static)));
    }
}

thread_local! {
    static QUIET_PANICS: Cell<bool> = const { Cell::new(false) };
}

static PANIC_HOOK: Once = Once::new();

/// Keeps the panic hook from printing panics raised on the calling thread.
///
/// The previous hook stays in charge of every other thread.
fn silence_panics_on_this_thread() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !QUIET_PANICS.try_with(Cell::get).unwrap_or(false) {
                previous(info);
            }
        }));
    });
    QUIET_PANICS.with(|quiet| quiet.set(true));
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{ run_in_parallel, silence_panics_on_this_thread, ErrorLogPolicy, RunnerOptions, TaskError, QUIET_PANICS };
    use std::cell::Cell;
    use std::collections::HashSet;
    use std::fmt;
    use std::sync::Mutex;
    use std::sync::atomic::{ AtomicUsize, Ordering };
    use std::time::{ Duration, Instant };

    #[derive(Debug)]
    struct Boom(u32);

    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "boom on {}", self.0)
        }
    }

    impl std::error::Error for Boom {}

    fn quiet() -> RunnerOptions {
        RunnerOptions::default().with_log_policy(ErrorLogPolicy::Noop)
    }

    #[test]
    fn runs_every_input() {
        let seen = Mutex::new(HashSet::new());
        let report = run_in_parallel(["test1.in", "test2.in", "test3.in"], &quiet(), |input| {
            seen.lock().unwrap().insert(input.to_string());
            Ok::<(), Boom>(())
        });
        assert!(report.is_success());
        assert_eq!(report.completed(), 3);
        let expected: HashSet<String> = ["test1.in", "test2.in", "test3.in"].iter().map(|s| s.to_string()).collect();
        assert_eq!(*seen.lock().unwrap(), expected);
    }

    #[test]
    fn runs_concurrently() {
        let start = Instant::now();
        let report = run_in_parallel(0..4u32, &quiet(), |_| {
            std::thread::sleep(Duration::from_millis(300));
            Ok::<(), Boom>(())
        });
        assert_eq!(report.completed(), 4);
        assert!(start.elapsed() < Duration::from_millis(1100), "took {:?}", start.elapsed());
    }

    #[test]
    fn failures_are_isolated() {
        let options = quiet().with_remind_failures_at_end(true);
        let report = run_in_parallel(1..=5u32, &options, |n| {
            if n % 2 == 0 { Err(Boom(*n)) } else { Ok(()) }
        });
        assert_eq!(report.completed(), 3);
        let mut failed: Vec<u32> = report.failures().iter().map(|f| f.input).collect();
        failed.sort();
        assert_eq!(failed, vec![2, 4]);
        assert!(report.failures().iter().all(|f| matches!(f.error, TaskError::Failed(Boom(n)) if n == f.input)));
    }

    #[test]
    fn panics_are_isolated() {
        let report = run_in_parallel(vec!["ok", "bad"], &quiet(), |input| {
            if *input == "bad" {
                panic!("cannot handle {}", input);
            }
            Ok::<(), Boom>(())
        });
        assert_eq!(report.completed(), 1);
        let failures = report.into_failures();
        assert_eq!(failures.len(), 1);
        match &failures[0].error {
            TaskError::Panicked(msg) => assert_eq!(msg, "cannot handle bad"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    /// Panics the first time it is formatted.
    struct FlakyDebug(u32);

    static FLAKY_DEBUG_CALLS: AtomicUsize = AtomicUsize::new(0);

    impl fmt::Debug for FlakyDebug {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            if FLAKY_DEBUG_CALLS.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("cannot format input");
            }
            write!(f, "flaky {}", self.0)
        }
    }

    #[test]
    fn panic_while_logging_is_recorded() {
        let options = RunnerOptions::default().with_remind_failures_at_end(false);
        let report = run_in_parallel(vec![FlakyDebug(3)], &options, |n| Err(Boom(n.0)));
        assert_eq!(report.completed(), 0);
        let failures = report.into_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].input.0, 3);
        match &failures[0].error {
            TaskError::Panicked(msg) => assert_eq!(msg, "cannot format input"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn quiet_panics_are_per_thread() {
        let quiet_inside = std::thread::spawn(|| {
            silence_panics_on_this_thread();
            QUIET_PANICS.with(Cell::get)
        }).join().unwrap();
        assert!(quiet_inside);
        assert!(!QUIET_PANICS.with(Cell::get));
    }

    #[test]
    fn stderr_policy_does_not_fail() {
        let options = RunnerOptions::default();
        let report = run_in_parallel(vec![7u32], &options, |n| Err(Boom(*n)));
        assert_eq!(report.failures().len(), 1);
    }

    #[test]
    fn tracing_policy_emits_events() {
        let subscriber = tracing_subscriber::fmt().with_test_writer().finish();
        tracing::subscriber::with_default(subscriber, || {
            let options = quiet().with_log_policy(ErrorLogPolicy::StderrAndTracing);
            let report = run_in_parallel(vec![1u32], &options, |n| Err(Boom(*n)));
            assert!(!report.is_success());
        });
    }
}
