use crate::crawl::Progress;
use core::fmt::{Debug, Formatter};
use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

/// Refresh rate for progress updates (10 Hz).
const REFRESH_INTERVAL_MS: u64 = 100;

const DETERMINATE_TEMPLATE: &str = "{prefix:>26.bold.cyan} [{bar:25}] {pos}/{len} {msg}";
const DETERMINATE_TEMPLATE_NO_COLOR: &str = "{prefix:>26} [{bar:25}] {pos}/{len} {msg}";
const INDETERMINATE_TEMPLATE: &str = "{prefix:>26.bold.cyan} [{spinner}] {elapsed}: {pos} user(s) {msg}";
const INDETERMINATE_TEMPLATE_NO_COLOR: &str = "{prefix:>26} [{spinner}] {elapsed}: {pos} user(s) {msg}";

const SPINNER_FRAMES: [&str; 8] = [
    "===>                     ",
    "      ===>               ",
    "            ===>         ",
    "                  ===>   ",
    "                     <===",
    "               <===      ",
    "         <===            ",
    "   <===                  ",
];

#[derive(Debug)]
struct DelayedProgressState {
    visible_after: Instant,
    visible: AtomicBool,
}

/// A progress bar on stderr that delays showing itself until a threshold is reached.
#[derive(Clone)]
pub struct ProgressReporter {
    bar: ProgressBar,
    state: Arc<DelayedProgressState>,
    refresh_task: Option<Arc<JoinHandle<()>>>,
    use_colors: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter.
    ///
    /// The progress bar will only become visible if the crawl continues beyond the delay threshold.
    /// When `use_colors` is false, progress bar chrome and warnings are rendered without ANSI styling.
    #[must_use]
    pub fn new(delay: Duration, use_colors: bool) -> Self {
        let bar = ProgressBar::hidden();
        let state = Arc::new(DelayedProgressState {
            visible_after: Instant::now() + delay,
            visible: AtomicBool::new(false),
        });

        Self {
            refresh_task: Some(Arc::new(tokio::spawn(refresh_task(bar.clone(), Arc::clone(&state))))),
            bar,
            state,
            use_colors,
        }
    }

    /// Create a reporter that never draws a bar but still prints warnings.
    #[must_use]
    pub fn hidden(use_colors: bool) -> Self {
        Self {
            bar: ProgressBar::hidden(),
            state: Arc::new(DelayedProgressState {
                visible_after: Instant::now(),
                visible: AtomicBool::new(false),
            }),
            refresh_task: None,
            use_colors,
        }
    }

    fn style(&self, determinate: bool) -> ProgressStyle {
        let template = match (determinate, self.use_colors) {
            (true, true) => DETERMINATE_TEMPLATE,
            (true, false) => DETERMINATE_TEMPLATE_NO_COLOR,
            (false, true) => INDETERMINATE_TEMPLATE,
            (false, false) => INDETERMINATE_TEMPLATE_NO_COLOR,
        };

        let style = if determinate {
            ProgressStyle::default_bar()
        } else {
            ProgressStyle::default_spinner()
        };

        let style = style.template(template).expect("could not create progress bar style");
        if determinate {
            style.progress_chars("=> ")
        } else {
            style.tick_strings(&SPINNER_FRAMES)
        }
    }
}

impl Progress for ProgressReporter {
    /// Start a new phase, switching between a bar (known size) and a spinner (unknown size).
    fn set_phase(&self, phase: &str, expected: Option<u64>) {
        self.bar.reset();
        self.bar.set_prefix(phase.to_string());
        self.bar.set_message("");

        if let Some(total) = expected {
            self.bar.disable_steady_tick();
            self.bar.set_length(total);
            self.bar.set_style(self.style(true));
        } else {
            self.bar.unset_length();
            self.bar.set_style(self.style(false));
            self.bar.enable_steady_tick(Duration::from_millis(REFRESH_INTERVAL_MS));
        }
    }

    fn advance(&self) {
        // A collection can grow while it is being walked
        if self.bar.length().is_some_and(|len| self.bar.position() >= len) {
            self.bar.inc_length(1);
        }
        self.bar.inc(1);
    }

    /// Print a warning line without disrupting the progress indicator.
    fn warn(&self, msg: &str) {
        let line = format!("Error: {msg}");
        if self.use_colors {
            self.bar.suspend(|| eprintln!("{}", line.yellow()));
        } else {
            self.bar.suspend(|| eprintln!("{line}"));
        }
    }

    /// Finish and clear the progress indicator.
    fn done(&self) {
        if let Some(task) = &self.refresh_task {
            task.abort();
        }
        if self.state.visible.load(Ordering::Relaxed) {
            self.bar.finish_and_clear();
        }
    }
}

impl Debug for ProgressReporter {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("bar", &self.bar)
            .field("state", &self.state)
            .field("refresh_task", &self.refresh_task.as_ref().map(|_| "<task>"))
            .field("use_colors", &self.use_colors)
            .finish()
    }
}

/// Background task that reveals the progress bar once the delay has passed.
async fn refresh_task(bar: ProgressBar, state: Arc<DelayedProgressState>) {
    let mut interval = tokio::time::interval(Duration::from_millis(REFRESH_INTERVAL_MS));
    loop {
        let _ = interval.tick().await;

        if Instant::now() >= state.visible_after {
            state.visible.store(true, Ordering::Relaxed);
            bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
            break;
        }
    }
}
