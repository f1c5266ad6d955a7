//! Gesture session: camera + classifier plumbing around the interpreter.
//!
//! A session is ticked from its own loop at a high rate; the [`Throttle`]
//! limits classification to ~30 Hz. Inference may complete asynchronously but
//! at most one job is in flight: while it is busy new frames are skipped, not
//! queued. Results are always processed on the session's thread, so the
//! interpreter stays the only writer of the interaction state.

use crate::constants::{CLASSIFY_INTERVAL_MS, SESSION_IDLE_SLEEP_MS};
use crate::error::{ClassifierError, SessionError};
use crate::gesture::ClassifierOutput;
use crate::interpreter::{ControlCommand, GestureInterpreter, Transition};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// One captured camera frame.
#[derive(Clone, Debug)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub sequence: u64,
    pub pixels: Arc<[u8]>,
}

pub trait CameraSource: Send {
    /// Acquire the device; returns its intrinsic frame size.
    fn open(&mut self) -> Result<(u32, u32), SessionError>;
    /// Latest frame, if one is available.
    fn next_frame(&mut self) -> Option<VideoFrame>;
    fn release(&mut self);
}

pub trait GestureClassifier: Send {
    fn load(&mut self) -> Result<(), SessionError>;
    fn recognize(
        &mut self,
        frame: &VideoFrame,
        timestamp_ms: u64,
    ) -> Result<ClassifierOutput, ClassifierError>;
}

#[derive(Debug)]
pub struct InferenceOutcome {
    pub timestamp_ms: u64,
    pub result: Result<ClassifierOutput, ClassifierError>,
}

/// How classification is scheduled relative to the session loop.
pub trait Inference: Send {
    fn prepare(&mut self) -> Result<(), SessionError>;
    /// Start classifying `frame`. Returns false, dropping the frame, while a
    /// previous job is still in flight.
    fn submit(&mut self, frame: VideoFrame, timestamp_ms: u64) -> bool;
    /// Finished result, if any. Clears the busy flag.
    fn poll(&mut self) -> Option<InferenceOutcome>;
    fn is_busy(&self) -> bool;
    /// Forget any in-flight job; its result will be discarded.
    fn cancel(&mut self);
}

/// Runs the classifier synchronously inside `submit`.
pub struct InlineInference<C> {
    classifier: C,
    ready: Option<InferenceOutcome>,
}

impl<C: GestureClassifier> InlineInference<C> {
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            ready: None,
        }
    }
}

impl<C: GestureClassifier> Inference for InlineInference<C> {
    fn prepare(&mut self) -> Result<(), SessionError> {
        self.classifier.load()
    }

    fn submit(&mut self, frame: VideoFrame, timestamp_ms: u64) -> bool {
        if self.ready.is_some() {
            return false;
        }
        let result = self.classifier.recognize(&frame, timestamp_ms);
        self.ready = Some(InferenceOutcome {
            timestamp_ms,
            result,
        });
        true
    }

    fn poll(&mut self) -> Option<InferenceOutcome> {
        self.ready.take()
    }

    fn is_busy(&self) -> bool {
        self.ready.is_some()
    }

    fn cancel(&mut self) {
        self.ready = None;
    }
}

enum WorkerRequest {
    Load,
    Classify {
        frame: VideoFrame,
        timestamp_ms: u64,
        generation: u64,
    },
}

enum WorkerReply {
    Loaded(Result<(), SessionError>),
    Classified {
        outcome: InferenceOutcome,
        generation: u64,
    },
}

/// Runs the classifier on a dedicated thread.
pub struct InferenceWorker {
    requests: Option<Sender<WorkerRequest>>,
    replies: Receiver<WorkerReply>,
    handle: Option<JoinHandle<()>>,
    in_flight: bool,
    generation: u64,
}

impl InferenceWorker {
    pub fn spawn<C: GestureClassifier + 'static>(mut classifier: C) -> Result<Self, SessionError> {
        let (req_tx, req_rx) = mpsc::channel::<WorkerRequest>();
        let (reply_tx, reply_rx) = mpsc::channel::<WorkerReply>();
        let handle = thread::Builder::new()
            .name("gesture-inference".into())
            .spawn(move || {
                while let Ok(request) = req_rx.recv() {
                    let reply = match request {
                        WorkerRequest::Load => WorkerReply::Loaded(classifier.load()),
                        WorkerRequest::Classify {
                            frame,
                            timestamp_ms,
                            generation,
                        } => WorkerReply::Classified {
                            outcome: InferenceOutcome {
                                timestamp_ms,
                                result: classifier.recognize(&frame, timestamp_ms),
                            },
                            generation,
                        },
                    };
                    if reply_tx.send(reply).is_err() {
                        break;
                    }
                }
                log::debug!("[inference] worker exiting");
            })?;
        Ok(Self {
            requests: Some(req_tx),
            replies: reply_rx,
            handle: Some(handle),
            in_flight: false,
            generation: 0,
        })
    }

    fn send(&self, request: WorkerRequest) -> bool {
        match &self.requests {
            Some(tx) => tx.send(request).is_ok(),
            None => false,
        }
    }
}

impl Inference for InferenceWorker {
    fn prepare(&mut self) -> Result<(), SessionError> {
        if !self.send(WorkerRequest::Load) {
            return Err(SessionError::ModelLoad("inference worker stopped".into()));
        }
        loop {
            match self.replies.recv() {
                Ok(WorkerReply::Loaded(result)) => return result,
                // Stale classification from before a re-setup.
                Ok(WorkerReply::Classified { .. }) => {
                    self.in_flight = false;
                }
                Err(_) => {
                    return Err(SessionError::ModelLoad("inference worker stopped".into()))
                }
            }
        }
    }

    fn submit(&mut self, frame: VideoFrame, timestamp_ms: u64) -> bool {
        if self.in_flight {
            return false;
        }
        let sent = self.send(WorkerRequest::Classify {
            frame,
            timestamp_ms,
            generation: self.generation,
        });
        self.in_flight = sent;
        sent
    }

    fn poll(&mut self) -> Option<InferenceOutcome> {
        loop {
            match self.replies.try_recv() {
                Ok(WorkerReply::Classified {
                    outcome,
                    generation,
                }) => {
                    if generation == self.generation {
                        self.in_flight = false;
                        return Some(outcome);
                    }
                }
                Ok(WorkerReply::Loaded(_)) => {}
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    self.in_flight = false;
                    return None;
                }
            }
        }
    }

    fn is_busy(&self) -> bool {
        self.in_flight
    }

    fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.in_flight = false;
    }
}

impl Drop for InferenceWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker after its current job.
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("[inference] worker panicked");
            }
        }
    }
}

/// Rate limiter over a monotonic millisecond clock.
#[derive(Clone, Copy, Debug)]
pub struct Throttle {
    interval_ms: u64,
    last_ms: Option<u64>,
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(CLASSIFY_INTERVAL_MS)
    }
}

impl Throttle {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    /// True (and restarts the interval) once `interval_ms` has elapsed since
    /// the last accepted tick.
    pub fn ready(&mut self, now_ms: u64) -> bool {
        match self.last_ms {
            Some(last) if now_ms.saturating_sub(last) < self.interval_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// Not set up yet.
    Idle,
    Running,
    /// Setup failed; waiting for a manual retry.
    Unavailable,
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Inactive,
    /// Throttled, busy, or no frame.
    Waiting,
    Submitted,
    Processed(Option<Transition>),
    ClassifierFailed,
}

pub struct GestureSession<I> {
    camera: Box<dyn CameraSource>,
    inference: I,
    interpreter: GestureInterpreter,
    throttle: Throttle,
    status: SessionStatus,
    frame_size: Option<(u32, u32)>,
    notified: bool,
}

impl<I: Inference> GestureSession<I> {
    pub fn new(
        camera: Box<dyn CameraSource>,
        inference: I,
        interpreter: GestureInterpreter,
    ) -> Self {
        Self {
            camera,
            inference,
            interpreter,
            throttle: Throttle::default(),
            status: SessionStatus::Idle,
            frame_size: None,
            notified: false,
        }
    }

    /// Open the camera and load the classifier. A failure is reported once
    /// as a warning and leaves the hand undetected; call again to retry.
    pub fn setup(&mut self) -> Result<(), SessionError> {
        let result = self
            .camera
            .open()
            .and_then(|size| self.inference.prepare().map(|_| size));
        match result {
            Ok((w, h)) => {
                self.frame_size = Some((w, h));
                self.throttle.reset();
                self.status = SessionStatus::Running;
                log::info!("[session] running, camera {}x{}", w, h);
                Ok(())
            }
            Err(e) => {
                if !self.notified {
                    log::warn!("[session] gesture input unavailable: {}", e);
                    self.notified = true;
                } else {
                    log::debug!("[session] setup failed again: {}", e);
                }
                self.camera.release();
                self.status = SessionStatus::Unavailable;
                self.interpreter.sensing_gap();
                Err(e)
            }
        }
    }

    pub fn tick(&mut self, now_ms: u64) -> TickOutcome {
        if self.status != SessionStatus::Running {
            return TickOutcome::Inactive;
        }
        let mut outcome = TickOutcome::Waiting;
        if !self.inference.is_busy() && self.throttle.ready(now_ms) {
            if let Some(frame) = self.camera.next_frame() {
                if self.inference.submit(frame, now_ms) {
                    outcome = TickOutcome::Submitted;
                }
            }
        }
        if let Some(done) = self.inference.poll() {
            outcome = match done.result {
                Ok(output) => {
                    let event = output.top_event(done.timestamp_ms);
                    TickOutcome::Processed(self.interpreter.process(event.as_ref()))
                }
                Err(e) => {
                    log::warn!("[session] classifier error: {}", e);
                    self.interpreter.sensing_gap();
                    TickOutcome::ClassifierFailed
                }
            };
        }
        outcome
    }

    pub fn apply_command(&mut self, command: ControlCommand) {
        self.interpreter.apply_command(command);
    }

    /// Stop scheduling, drop any in-flight result, and release the camera.
    pub fn teardown(&mut self) {
        if self.status == SessionStatus::Stopped {
            return;
        }
        self.inference.cancel();
        self.camera.release();
        self.status = SessionStatus::Stopped;
        self.interpreter.sensing_gap();
        log::info!("[session] stopped");
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn frame_size(&self) -> Option<(u32, u32)> {
        self.frame_size
    }

    pub fn interpreter(&self) -> &GestureInterpreter {
        &self.interpreter
    }
}

/// Messages accepted by a running session thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionMessage {
    Control(ControlCommand),
    /// Manual re-setup after an initialization failure.
    Retry,
}

pub struct SessionHandle {
    stop: Arc<AtomicBool>,
    messages: Sender<SessionMessage>,
    join: Option<JoinHandle<()>>,
}

impl SessionHandle {
    pub fn send(&self, message: SessionMessage) -> bool {
        self.messages.send(message).is_ok()
    }

    pub fn command(&self, command: ControlCommand) -> bool {
        self.send(SessionMessage::Control(command))
    }

    pub fn sender(&self) -> Sender<SessionMessage> {
        self.messages.clone()
    }

    pub fn is_running(&self) -> bool {
        self.join.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the loop to stop and wait for teardown.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.join.take() {
            if handle.join().is_err() {
                log::error!("[session] loop panicked");
            }
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Run `session` on its own thread: set up, tick until stopped, tear down.
pub fn spawn_session<I: Inference + 'static>(
    mut session: GestureSession<I>,
) -> Result<SessionHandle, SessionError> {
    let stop = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel::<SessionMessage>();
    let stop_flag = Arc::clone(&stop);
    let join = thread::Builder::new()
        .name("gesture-session".into())
        .spawn(move || {
            let start = instant::Instant::now();
            // Failure is already reported by setup; keep running for retries.
            let _ = session.setup();
            while !stop_flag.load(Ordering::Relaxed) {
                loop {
                    match rx.try_recv() {
                        Ok(SessionMessage::Control(cmd)) => session.apply_command(cmd),
                        Ok(SessionMessage::Retry) => {
                            if session.status() != SessionStatus::Running {
                                let _ = session.setup();
                            }
                        }
                        Err(_) => break,
                    }
                }
                let now_ms = start.elapsed().as_millis() as u64;
                session.tick(now_ms);
                thread::sleep(Duration::from_millis(SESSION_IDLE_SLEEP_MS));
            }
            session.teardown();
        })?;
    Ok(SessionHandle {
        stop,
        messages: tx,
        join: Some(join),
    })
}
