//! Frame loop driving a [`Session`] from a [`FrameSource`].
//!
//! The loop is strictly sequential: one frame, one `on_frame` call. A frame
//! that fails to parse is logged and skipped; only a read failure on the
//! underlying stream ends the loop with an error.
//!
//! The stop flag is checked at least every [`POLL_INTERVAL`], including while
//! the source has nothing to deliver and while realtime pacing sleeps.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::frames::{FrameError, FramePoll, FrameSource};
use crate::session::{Session, SessionEvent};

/// How the loop treats recorded timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pacing {
    /// Process frames as fast as they can be read.
    #[default]
    Immediate,
    /// Sleep between frames so they are replayed at their recorded rate.
    Realtime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopOptions {
    pub pacing: Pacing,
    /// Return once the round is won or lost.
    pub stop_when_over: bool,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            pacing: Pacing::Immediate,
            stop_when_over: true,
        }
    }
}

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopSummary {
    pub frames: usize,
    pub skipped: usize,
    pub letters: usize,
    pub guesses: usize,
    pub interrupted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum FrameLoopError {
    #[error("frame source failed after {frames} frame(s): {source}")]
    Source {
        frames: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Longest the loop waits before re-checking the stop flag.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Receives what happens during [`run_observed`].
pub trait LoopObserver {
    fn on_event(&mut self, event: &SessionEvent);

    /// Called after every processed frame, with the frame's (clamped) time.
    fn on_frame(&mut self, session: &Session, now: Duration) {
        let _ = (session, now);
    }
}

struct EventsOnly<F>(F);

impl<F: FnMut(&SessionEvent)> LoopObserver for EventsOnly<F> {
    fn on_event(&mut self, event: &SessionEvent) {
        (self.0)(event)
    }
}

/// Run until the source ends, `stop` is set, or (optionally) the round ends.
pub fn run<S, F>(
    source: &mut S,
    session: &mut Session,
    stop: &AtomicBool,
    options: LoopOptions,
    on_event: F,
) -> Result<LoopSummary, FrameLoopError>
where
    S: FrameSource + ?Sized,
    F: FnMut(&SessionEvent),
{
    run_observed(source, session, stop, options, &mut EventsOnly(on_event))
}

/// Like [`run`], also reporting every processed frame to `observer`.
pub fn run_observed<S, O>(
    source: &mut S,
    session: &mut Session,
    stop: &AtomicBool,
    options: LoopOptions,
    observer: &mut O,
) -> Result<LoopSummary, FrameLoopError>
where
    S: FrameSource + ?Sized,
    O: LoopObserver + ?Sized,
{
    let mut summary = LoopSummary::default();
    let mut last_at: Option<Duration> = None;

    loop {
        if stop.load(Ordering::SeqCst) {
            summary.interrupted = true;
            break;
        }

        let next = match source.poll_frame(POLL_INTERVAL) {
            FramePoll::Ready(next) => next,
            FramePoll::Pending => continue,
            FramePoll::Closed => {
                summary.interrupted = stop.load(Ordering::SeqCst);
                break;
            }
        };

        let frame = match next {
            Ok(frame) => frame,
            Err(FrameError::Io(e)) => {
                return Err(FrameLoopError::Source {
                    frames: summary.frames,
                    source: e,
                });
            }
            Err(e) => {
                log::warn!("Skipping frame: {}", e);
                summary.skipped += 1;
                continue;
            }
        };

        let mut at = frame.at;
        if let Some(prev) = last_at {
            if at < prev {
                log::warn!("Frame timestamp went backwards ({:?} < {:?}), clamping", at, prev);
                at = prev;
            } else if options.pacing == Pacing::Realtime && !sleep_unless_stopped(at - prev, stop)
            {
                summary.interrupted = true;
                break;
            }
        }
        last_at = Some(at);
        summary.frames += 1;

        let event = session.on_frame(&frame.result, at);
        if let Some(event) = &event {
            match event {
                SessionEvent::LetterAccepted { .. } => summary.letters += 1,
                SessionEvent::GuessScored { .. } => summary.guesses += 1,
            }
            observer.on_event(event);
        }
        observer.on_frame(session, at);

        if event.is_some() && options.stop_when_over && session.status().is_over() {
            break;
        }
    }

    log::debug!("Frame loop finished: {:?}", summary);
    Ok(summary)
}

/// Sleep for `duration` in short slices. Returns false if `stop` was set.
fn sleep_unless_stopped(duration: Duration, stop: &AtomicBool) -> bool {
    let deadline = Instant::now() + duration;
    loop {
        if stop.load(Ordering::SeqCst) {
            return false;
        }
        let left = deadline.saturating_duration_since(Instant::now());
        if left.is_zero() {
            return true;
        }
        thread::sleep(left.min(POLL_INTERVAL));
    }
}

/// Set by the Ctrl+C handler.
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Flag to pass to [`run`] so Ctrl+C stops the loop between frames.
pub fn ctrlc_flag() -> &'static AtomicBool {
    &CTRLC_RECEIVED
}

/// Set up the Ctrl+C handler.
///
/// This should be called once at program startup.
pub fn setup_ctrlc_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        CTRLC_RECEIVED.store(true, Ordering::SeqCst);
        eprintln!("\nReceived Ctrl+C, stopping...");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate::Word;
    use crate::frames::{Frame, ScriptedSource, ThreadedSource};
    use std::sync::Arc;
    use crate::gesture::Gesture;
    use crate::session::SessionSettings;

    fn frame(at: u64, gesture: Option<Gesture>) -> Frame {
        Frame {
            at: Duration::from_millis(at),
            result: gesture
                .map(|g| [(g, 9.0)].into_iter().collect())
                .unwrap_or_default(),
        }
    }

    fn session() -> Session {
        Session::new(Word::parse("APPLE").unwrap(), SessionSettings::default())
    }

    #[test]
    fn test_counts_frames_and_letters() {
        let mut source = ScriptedSource::new([
            frame(0, Some(Gesture::A)),
            frame(1500, Some(Gesture::A)),
            frame(3000, Some(Gesture::A)),
            frame(3100, None),
        ]);
        let mut session = session();
        let stop = AtomicBool::new(false);
        let mut events = Vec::new();

        let summary = run(&mut source, &mut session, &stop, LoopOptions::default(), |e| {
            events.push(e.clone())
        })
        .unwrap();

        assert_eq!(summary.frames, 4);
        assert_eq!(summary.letters, 1);
        assert_eq!(events.len(), 1);
        assert!(!summary.interrupted);
    }

    #[test]
    fn test_stop_flag_interrupts() {
        let mut source = ScriptedSource::new([frame(0, Some(Gesture::A))]);
        let mut session = session();
        let stop = AtomicBool::new(true);

        let summary = run(&mut source, &mut session, &stop, LoopOptions::default(), |_| {}).unwrap();
        assert!(summary.interrupted);
        assert_eq!(summary.frames, 0);
    }

    #[test]
    fn test_backwards_timestamps_are_clamped() {
        // The stale frame at 100 is treated as arriving at 5000.
        let mut source = ScriptedSource::new([
            frame(5000, Some(Gesture::B)),
            frame(100, Some(Gesture::B)),
            frame(7999, Some(Gesture::B)),
            frame(8000, Some(Gesture::B)),
        ]);
        let mut session = session();
        let stop = AtomicBool::new(false);
        let mut letters = Vec::new();

        run(&mut source, &mut session, &stop, LoopOptions::default(), |e| {
            if let SessionEvent::LetterAccepted { letter, .. } = e {
                letters.push(*letter);
            }
        })
        .unwrap();

        assert_eq!(letters, vec!['B']);
    }

    #[test]
    fn test_empty_source() {
        let mut source = ScriptedSource::default();
        let mut session = session();
        let stop = AtomicBool::new(false);
        let summary = run(&mut source, &mut session, &stop, LoopOptions::default(), |_| {}).unwrap();
        assert_eq!(summary, LoopSummary::default());
        assert!(session.rows().is_empty());
    }

    /// Never yields a frame until its sender is dropped.
    struct Quiet(std::sync::mpsc::Receiver<()>);

    impl FrameSource for Quiet {
        fn next_frame(&mut self) -> Option<Result<Frame, FrameError>> {
            let _ = self.0.recv();
            None
        }
    }

    fn stop_after(ms: u64) -> (Arc<AtomicBool>, thread::JoinHandle<()>) {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(ms));
            flag.store(true, Ordering::SeqCst);
        });
        (stop, handle)
    }

    #[test]
    fn test_stop_flag_interrupts_quiet_stream() {
        let (_hold, rx) = std::sync::mpsc::channel();
        let mut source = ThreadedSource::spawn(Quiet(rx));
        let mut session = session();
        let (stop, setter) = stop_after(100);

        let started = Instant::now();
        let summary = run(&mut source, &mut session, &stop, LoopOptions::default(), |_| {}).unwrap();
        setter.join().unwrap();

        assert!(summary.interrupted);
        assert_eq!(summary.frames, 0);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_stop_flag_interrupts_realtime_sleep() {
        let mut source = ScriptedSource::new([
            frame(0, Some(Gesture::A)),
            frame(600_000, Some(Gesture::A)),
        ]);
        let mut session = session();
        let (stop, setter) = stop_after(100);
        let options = LoopOptions {
            pacing: Pacing::Realtime,
            ..LoopOptions::default()
        };

        let started = Instant::now();
        let summary = run(&mut source, &mut session, &stop, options, |_| {}).unwrap();
        setter.join().unwrap();

        assert!(summary.interrupted);
        assert_eq!(summary.frames, 1);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    /// Ctrl+C arrives while the source is reading, then the stream ends.
    struct StopsThenEnds(Arc<AtomicBool>);

    impl FrameSource for StopsThenEnds {
        fn next_frame(&mut self) -> Option<Result<Frame, FrameError>> {
            self.0.store(true, Ordering::SeqCst);
            None
        }
    }

    #[test]
    fn test_stop_then_end_of_stream_reports_interrupted() {
        let stop = Arc::new(AtomicBool::new(false));
        let mut source = StopsThenEnds(Arc::clone(&stop));
        let mut session = session();

        let summary = run(&mut source, &mut session, &stop, LoopOptions::default(), |_| {}).unwrap();
        assert!(summary.interrupted);
    }

    #[derive(Default)]
    struct Recorder {
        events: usize,
        remaining: Vec<Option<Duration>>,
    }

    impl LoopObserver for Recorder {
        fn on_event(&mut self, _event: &SessionEvent) {
            self.events += 1;
        }

        fn on_frame(&mut self, session: &Session, now: Duration) {
            self.remaining
                .push(session.progress(now).map(|p| p.remaining));
        }
    }

    #[test]
    fn test_observer_sees_every_frame() {
        let mut source = ScriptedSource::new([
            frame(0, Some(Gesture::C)),
            frame(1000, Some(Gesture::C)),
            frame(3000, Some(Gesture::C)),
            frame(3100, None),
        ]);
        let mut session = session();
        let stop = AtomicBool::new(false);
        let mut recorder = Recorder::default();

        run_observed(&mut source, &mut session, &stop, LoopOptions::default(), &mut recorder)
            .unwrap();

        assert_eq!(recorder.events, 1);
        assert_eq!(
            recorder.remaining,
            vec![
                Some(Duration::from_millis(3000)),
                Some(Duration::from_millis(2000)),
                Some(Duration::from_millis(3000)),
                None,
            ]
        );
    }
}
