mod mic;
mod sim;

use anyhow::Context;
use heart_core::{
    interaction_channel, spawn_session, AnimationFrame, AudioSampler, ControlCommand,
    EngineConfig, GestureInterpreter, GestureSession, InferenceWorker, SessionMessage,
    SharedLevel, SilentAudio,
};
use instant::Instant;
use sim::{ScriptedClassifier, SimulatedCamera};
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const RENDER_INTERVAL_MS: u64 = 16;
const DEFAULT_RUN_SECONDS: f32 = 20.0;

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut args = std::env::args().skip(1);
    let seconds: f32 = match args.next() {
        Some(s) => s.parse().context("seconds must be a number")?,
        None => DEFAULT_RUN_SECONDS,
    };
    let seed: u64 = match args.next() {
        Some(s) => s.parse().context("seed must be an unsigned integer")?,
        None => EngineConfig::default().seed,
    };
    let config = EngineConfig {
        seed,
        ..EngineConfig::default()
    };
    log::info!("[native] running {:.1}s with seed {}", seconds, seed);

    // Gesture side: the interpreter (sole state writer) moves into the session thread.
    let (writer, reader) = interaction_channel();
    let interpreter = GestureInterpreter::new(writer, &config);
    let inference = InferenceWorker::spawn(ScriptedClassifier::new(config.seed_for(7)))?;
    let session = GestureSession::new(
        Box::new(SimulatedCamera::new(640, 480)),
        inference,
        interpreter,
    );
    let session = spawn_session(session)?;

    // Audio: microphone loudness if available, silence otherwise.
    let level = SharedLevel::new();
    let mic_stream = match mic::start_microphone(level.clone()) {
        Ok(stream) => Some(stream),
        Err(e) => {
            log::warn!("[audio] microphone unavailable, running silent: {e}");
            None
        }
    };
    let audio: Box<dyn AudioSampler> = if mic_stream.is_some() {
        Box::new(level)
    } else {
        Box::new(SilentAudio)
    };

    let quit = Arc::new(AtomicBool::new(false));
    spawn_control_surface(session.sender(), Arc::clone(&quit))?;

    let mut frame = AnimationFrame::new(reader, audio, &config);
    let start = Instant::now();
    let mut last_report = start;
    while start.elapsed().as_secs_f32() < seconds && !quit.load(Ordering::Relaxed) {
        let summary = frame.frame();
        if last_report.elapsed() >= Duration::from_secs(1) {
            last_report = Instant::now();
            let bytes = bytemuck::cast_slice::<_, u8>(frame.points()).len()
                + bytemuck::cast_slice::<_, u8>(frame.beads()).len()
                + bytemuck::cast_slice::<_, u8>(frame.photo_instances()).len()
                + bytemuck::cast_slice::<_, u8>(frame.particles()).len();
            log::info!(
                "[frame] mode={:?} progress={:.2} hand={} shaking={} focus={:?} particles={} audio={:.2} spin={:.2}/{:.2} upload={}B",
                summary.mode,
                summary.progress,
                summary.hand_detected,
                summary.shaking,
                summary.focused_index,
                summary.active_particles,
                summary.audio_level,
                summary.ornament_angle,
                summary.photo_angle,
                bytes
            );
        }
        thread::sleep(Duration::from_millis(RENDER_INTERVAL_MS));
    }

    session.stop();
    drop(mic_stream);
    log::info!("[native] done");
    Ok(())
}

/// Read stdin lines: `c` forces chaos, `f` forces the heart, `r` retries
/// gesture setup, `q` quits.
fn spawn_control_surface(
    messages: Sender<SessionMessage>,
    quit: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    thread::Builder::new()
        .name("control-surface".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                let message = match line.trim() {
                    "c" => SessionMessage::Control(ControlCommand::ForceChaos),
                    "f" => SessionMessage::Control(ControlCommand::ForceFormed),
                    "r" => SessionMessage::Retry,
                    "q" => {
                        quit.store(true, Ordering::Relaxed);
                        break;
                    }
                    "" => continue,
                    other => {
                        log::warn!("[control] unknown command {other:?} (c/f/r/q)");
                        continue;
                    }
                };
                if messages.send(message).is_err() {
                    break;
                }
            }
        })?;
    Ok(())
}
