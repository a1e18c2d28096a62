//! Frame sources: where classified frames come from.
//!
//! The hand-landmark model and gesture classifier run outside this crate. They
//! hand us one JSON object per frame:
//!
//! ```text
//! {"t_ms": 1200, "gestures": [{"name": "A", "score": 8.5}, {"name": "👍", "score": 3.1}]}
//! {"t_ms": 1216, "gestures": []}
//! {"t_ms": 1232, "error": "model not loaded"}
//! ```
//!
//! `t_ms` is optional; frames without it are stamped from a monotonic clock
//! when read. A frame carrying `error` is a classifier failure and is
//! delivered as an empty result, the same as a frame with no hand.

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::classification::{ClassificationResult, GestureScore};
use crate::gesture::GestureVocabulary;

/// A classified frame with its capture time.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Time since the start of the stream.
    pub at: Duration,
    pub result: ClassificationResult,
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("failed to read frame: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed frame on line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome of waiting a bounded time for a frame.
#[derive(Debug)]
pub enum FramePoll {
    Ready(Result<Frame, FrameError>),
    /// Nothing arrived within the timeout; the stream is still open.
    Pending,
    Closed,
}

/// Anything that yields classified frames in order.
pub trait FrameSource {
    /// Next frame, `None` at end of stream. May block.
    fn next_frame(&mut self) -> Option<Result<Frame, FrameError>>;

    /// Wait at most `timeout` for the next frame.
    ///
    /// The default suits sources that never block for long and ignores the
    /// timeout.
    fn poll_frame(&mut self, timeout: Duration) -> FramePoll {
        let _ = timeout;
        match self.next_frame() {
            Some(next) => FramePoll::Ready(next),
            None => FramePoll::Closed,
        }
    }
}

/// Wire form of one line.
#[derive(Debug, Deserialize)]
struct RecordedFrame {
    #[serde(default)]
    t_ms: Option<u64>,
    #[serde(default)]
    gestures: Vec<RecordedGesture>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecordedGesture {
    name: String,
    score: f32,
}

/// Reads JSON-lines frames from a file, a pipe or stdin.
pub struct JsonLinesSource<R> {
    reader: R,
    vocabulary: GestureVocabulary,
    min_score: f32,
    started: Instant,
    line: usize,
    buf: String,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R, vocabulary: GestureVocabulary) -> Self {
        Self {
            reader,
            vocabulary,
            min_score: f32::NEG_INFINITY,
            started: Instant::now(),
            line: 0,
            buf: String::new(),
        }
    }

    /// Drop gestures scoring below `min_score` before they reach the pipeline.
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    fn convert(&self, recorded: RecordedFrame) -> Frame {
        let at = match recorded.t_ms {
            Some(ms) => Duration::from_millis(ms),
            None => self.started.elapsed(),
        };

        if let Some(error) = recorded.error {
            log::warn!("Classifier failed on line {}: {}", self.line, error);
            return Frame {
                at,
                result: ClassificationResult::empty(),
            };
        }

        let scores = recorded
            .gestures
            .into_iter()
            .filter(|g| g.score >= self.min_score)
            .filter_map(|g| match self.vocabulary.resolve(&g.name) {
                Some(gesture) => Some(GestureScore {
                    gesture,
                    score: g.score,
                }),
                None => {
                    log::debug!("Dropping unknown gesture label {:?}", g.name);
                    None
                }
            })
            .collect();

        Frame {
            at,
            result: ClassificationResult::new(scores),
        }
    }
}

impl<R: BufRead> FrameSource for JsonLinesSource<R> {
    fn next_frame(&mut self) -> Option<Result<Frame, FrameError>> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(FrameError::Io(e))),
            }
            self.line += 1;

            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }

            let parsed = serde_json::from_str::<RecordedFrame>(text).map_err(|source| {
                FrameError::Malformed {
                    line: self.line,
                    source,
                }
            });
            return Some(parsed.map(|recorded| self.convert(recorded)));
        }
    }
}

/// Runs a blocking source on a background thread so the consumer can wait
/// with a timeout.
///
/// The reader thread is detached. If it is stuck in a read when the consumer
/// goes away, it exits with the process.
pub struct ThreadedSource {
    rx: Receiver<Result<Frame, FrameError>>,
}

/// Frames buffered between the reader thread and the consumer.
const CHANNEL_CAPACITY: usize = 64;

impl ThreadedSource {
    pub fn spawn<S>(mut source: S) -> Self
    where
        S: FrameSource + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(CHANNEL_CAPACITY);

        thread::spawn(move || {
            while let Some(next) = source.next_frame() {
                let fatal = matches!(next, Err(FrameError::Io(_)));
                if tx.send(next).is_err() || fatal {
                    break; // Consumer gone, or the stream is unreadable
                }
            }
            log::debug!("Frame reader thread finished");
        });

        Self { rx }
    }
}

impl FrameSource for ThreadedSource {
    fn next_frame(&mut self) -> Option<Result<Frame, FrameError>> {
        self.rx.recv().ok()
    }

    fn poll_frame(&mut self, timeout: Duration) -> FramePoll {
        match self.rx.recv_timeout(timeout) {
            Ok(next) => FramePoll::Ready(next),
            Err(RecvTimeoutError::Timeout) => FramePoll::Pending,
            Err(RecvTimeoutError::Disconnected) => FramePoll::Closed,
        }
    }
}

/// Frames held in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ScriptedSource {
    frames: std::collections::VecDeque<Frame>,
}

#[cfg(test)]
impl ScriptedSource {
    pub(crate) fn new(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }
}

#[cfg(test)]
impl FrameSource for ScriptedSource {
    fn next_frame(&mut self) -> Option<Result<Frame, FrameError>> {
        self.frames.pop_front().map(Ok)
    }
}
