//! Per-tick orchestration: step state, write uniforms, draw, decide whether to
//! schedule another tick.
//!
//! The driver does not own a GPU. It talks to a `FrameSink`, which the star
//! renderer implements over a real queue/encoder and tests implement with a
//! recorder.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::animation::{AnimationController, AnimationPhase, RotationPolicy, Tick};
use crate::config::ShapeConfig;
use crate::time::FrameTime;

use super::pipeline::StarVariant;
use super::uniforms::{UniformInput, UniformLayout};

/// Receiver of one frame's GPU work.
pub trait FrameSink {
    /// Writes the complete uniform block.
    fn write_uniforms(&mut self, bytes: &[u8]);

    /// Encodes one draw using the static geometry and the last written block.
    fn draw(&mut self);
}

/// Shared stop flag. Cloning shares the flag; cancelling is idempotent.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// What the host should do after a tick.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Schedule {
    /// Arm exactly one more tick.
    Rearm,
    /// Arm nothing.
    Done,
}

#[derive(Debug, Clone)]
enum Motion {
    /// Fixed-step rotation.
    Spin(AnimationController),
    /// Elapsed-time driven particle field; position math lives in the shader.
    /// `origin` is the clock reading at the first tick.
    Drift { origin: Option<f32> },
}

/// Drives one renderer's ticks.
#[derive(Debug, Clone)]
pub struct FrameDriver {
    config: ShapeConfig,
    layout: UniformLayout,
    motion: Motion,
    input: UniformInput,
    cancel: CancelToken,
    finished: bool,
    frames: u64,
}

impl FrameDriver {
    pub fn new(config: &ShapeConfig, variant: &StarVariant) -> Self {
        let motion = match variant {
            StarVariant::Field(_) => Motion::Drift { origin: None },
            _ => Motion::Spin(AnimationController::new(config.animation.as_ref())),
        };
        Self {
            config: config.clone(),
            layout: UniformLayout::select(config, variant),
            motion,
            input: UniformInput::default(),
            cancel: CancelToken::new(),
            finished: false,
            frames: 0,
        }
    }

    /// Starts the animation, if one is configured.
    pub fn start(&mut self) {
        if let Motion::Spin(controller) = &mut self.motion {
            controller.start();
        }
    }

    /// Runs one tick against `sink`.
    ///
    /// Order within a tick: advance state, write the full uniform block, draw.
    /// The cancel flag is checked before any work and again before re-arming,
    /// so a cancel observed mid-tick lets the tick finish but arms nothing.
    pub fn tick<S: FrameSink>(&mut self, time: FrameTime, sink: &mut S) -> Schedule {
        if self.finished || self.cancel.is_cancelled() {
            return Schedule::Done;
        }

        let outcome = match &mut self.motion {
            Motion::Spin(controller) => {
                let outcome = controller.advance();
                self.input.rotation = packed_rotation(controller);
                outcome
            }
            Motion::Drift { origin } => {
                let origin = *origin.get_or_insert(time.elapsed);
                self.input.elapsed = (time.elapsed - origin).max(0.0);
                Tick::Continue
            }
        };

        if outcome == Tick::Halted {
            self.finished = true;
            return Schedule::Done;
        }

        self.emit(sink);

        if outcome == Tick::Last || self.cancel.is_cancelled() {
            self.finished = true;
            Schedule::Done
        } else {
            Schedule::Rearm
        }
    }

    /// Draws the current state without advancing it. No-op once cancelled.
    pub fn redraw<S: FrameSink>(&mut self, sink: &mut S) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.emit(sink);
    }

    fn emit<S: FrameSink>(&mut self, sink: &mut S) {
        let block = self.layout.pack(&self.config, self.input);
        log::trace!("frame {}: writing {:?}", self.frames, block);
        sink.write_uniforms(block.as_bytes());
        sink.draw();
        self.frames += 1;
    }

    /// Cancels further ticks. Idempotent.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        if let Motion::Spin(controller) = &mut self.motion {
            controller.stop();
        }
    }

    /// Handle that cancels this driver from elsewhere.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// True once the driver will not re-arm on its own.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished || self.cancel.is_cancelled()
    }

    /// Rotation in radians as last packed.
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.input.rotation
    }

    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[inline]
    pub fn layout(&self) -> UniformLayout {
        self.layout
    }

    pub fn phase(&self) -> Option<AnimationPhase> {
        match &self.motion {
            Motion::Spin(controller) => Some(controller.phase()),
            Motion::Drift { .. } => None,
        }
    }
}

/// Narrows the controller's rotation for the uniform block. Infinite spins are
/// folded again after the cast, since values just under 2π round up to it in f32.
fn packed_rotation(controller: &AnimationController) -> f32 {
    let rotation = controller.rotation() as f32;
    match controller.policy() {
        Some(RotationPolicy::Infinite) => rotation % std::f32::consts::TAU,
        _ => rotation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::FRAME_INTERVAL_MS;
    use crate::config::{Animation, FieldConfig, Rgb};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Write(Vec<u8>),
        Draw,
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Recorder {
        fn draws(&self) -> usize {
            self.calls.iter().filter(|c| **c == Call::Draw).count()
        }

        fn writes(&self) -> usize {
            self.calls.iter().filter(|c| matches!(c, Call::Write(_))).count()
        }

        fn each_draw_preceded_by_one_write(&self) -> bool {
            self.calls.chunks(2).all(|pair| matches!(pair, [Call::Write(_), Call::Draw]))
        }
    }

    impl FrameSink for Recorder {
        fn write_uniforms(&mut self, bytes: &[u8]) {
            self.calls.push(Call::Write(bytes.to_vec()));
        }

        fn draw(&mut self) {
            self.calls.push(Call::Draw);
        }
    }

    fn time(tick: u64) -> FrameTime {
        FrameTime::at((tick as f64 * FRAME_INTERVAL_MS / 1000.0) as f32, tick)
    }

    fn spinning_filled() -> ShapeConfig {
        ShapeConfig::new(Rgb::new(0.0, 0.0, 1.0))
            .filled(true)
            .animated(Animation::infinite(3000.0))
    }

    fn started(config: &ShapeConfig) -> FrameDriver {
        let mut d = FrameDriver::new(config, &StarVariant::from_config(config));
        d.start();
        d
    }

    #[test]
    fn infinite_spin_draws_every_tick() {
        let mut d = started(&spinning_filled());
        let mut sink = Recorder::default();
        for t in 0..180 {
            assert_eq!(d.tick(time(t), &mut sink), Schedule::Rearm);
        }
        assert_eq!(sink.draws(), 180);
        assert_eq!(sink.writes(), 180);
        assert!(sink.each_draw_preceded_by_one_write());
    }

    #[test]
    fn stop_mid_sequence_ends_all_gpu_work() {
        let mut d = started(&spinning_filled());
        let mut sink = Recorder::default();
        let mut armed = true;

        for t in 0..180 {
            if t == 90 {
                d.cancel();
            }
            if !armed {
                continue;
            }
            armed = d.tick(time(t), &mut sink) == Schedule::Rearm;
        }

        assert!(sink.draws() <= 91);
        assert_eq!(sink.draws(), 90);
        assert_eq!(sink.writes(), sink.draws());
        assert!(sink.each_draw_preceded_by_one_write());

        let before = sink.calls.len();
        assert_eq!(d.tick(time(200), &mut sink), Schedule::Done);
        d.redraw(&mut sink);
        d.cancel();
        assert_eq!(sink.calls.len(), before);
    }

    #[test]
    fn token_cancel_from_clone() {
        let mut d = started(&spinning_filled());
        let token = d.cancel_token();
        let mut sink = Recorder::default();
        assert_eq!(d.tick(time(0), &mut sink), Schedule::Rearm);
        token.cancel();
        assert!(d.is_finished());
        assert_eq!(d.tick(time(1), &mut sink), Schedule::Done);
        assert_eq!(sink.draws(), 1);
    }

    #[test]
    fn static_shape_draws_once() {
        let config = ShapeConfig::new(Rgb::white());
        let mut d = started(&config);
        let mut sink = Recorder::default();
        assert_eq!(d.tick(time(0), &mut sink), Schedule::Done);
        assert_eq!(d.tick(time(1), &mut sink), Schedule::Done);
        assert_eq!(sink.draws(), 1);
        assert_eq!(d.rotation(), 0.0);
    }

    #[test]
    fn bounded_rotation_stops_rearming_at_target() {
        let config = ShapeConfig::new(Rgb::white()).animated(Animation::bounded(180.0, 200.4));
        let mut d = started(&config);
        let mut sink = Recorder::default();

        let mut ticks = 0;
        while d.tick(time(ticks), &mut sink) == Schedule::Rearm {
            ticks += 1;
            assert!(ticks < 100);
        }

        assert_eq!(sink.draws(), 6);
        assert!(d.rotation() as f64 >= std::f64::consts::PI - 1e-6);
        assert_eq!(d.phase(), Some(AnimationPhase::Stopped));
    }

    #[test]
    fn redraw_keeps_rotation() {
        let mut d = started(&spinning_filled());
        let mut sink = Recorder::default();
        d.tick(time(0), &mut sink);
        let rotation = d.rotation();
        d.redraw(&mut sink);
        assert_eq!(d.rotation(), rotation);
        assert_eq!(sink.calls[0], sink.calls[2]);
    }

    #[test]
    fn written_rotation_is_first_word() {
        let mut d = started(&spinning_filled());
        let mut sink = Recorder::default();
        d.tick(time(0), &mut sink);
        let Call::Write(bytes) = &sink.calls[0] else { panic!("expected a write") };
        let words: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        assert_eq!(words.len(), 4);
        assert_eq!(words[0], d.rotation());
        assert_eq!(&words[1..], &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn field_writes_elapsed_time_forever() {
        let config = ShapeConfig::new(Rgb::new(1.0, 1.0, 0.0));
        let mut d = FrameDriver::new(&config, &StarVariant::Field(FieldConfig::default()));
        d.start();
        let mut sink = Recorder::default();
        for t in 0..50 {
            assert_eq!(d.tick(FrameTime::at(t as f32 * 0.5, t), &mut sink), Schedule::Rearm);
        }
        let Some(Call::Write(bytes)) = sink.calls.iter().rev().nth(1) else {
            panic!("expected a write before the last draw")
        };
        let elapsed = f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        assert_eq!(elapsed, 24.5);
        assert_eq!(d.phase(), None);
    }

    #[test]
    fn field_elapsed_starts_at_first_tick() {
        let config = ShapeConfig::new(Rgb::white());
        let mut d = FrameDriver::new(&config, &StarVariant::Field(FieldConfig::default()));
        d.start();
        let mut sink = Recorder::default();
        d.tick(FrameTime::at(3.0, 0), &mut sink);
        d.tick(FrameTime::at(4.25, 1), &mut sink);
        let Call::Write(bytes) = &sink.calls[2] else { panic!("expected a write") };
        let elapsed = f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        assert_eq!(elapsed, 1.25);
    }

    #[test]
    fn infinite_rotation_stays_below_full_turn_after_narrowing() {
        let mut controller =
            AnimationController::with_step(RotationPolicy::Infinite, std::f64::consts::TAU - 1e-8);
        controller.start();
        controller.advance();
        assert!(controller.rotation() < std::f64::consts::TAU);

        let packed = packed_rotation(&controller);
        assert!((0.0..std::f32::consts::TAU).contains(&packed), "packed {packed}");
    }

    #[test]
    fn bounded_rotation_is_not_folded() {
        let mut controller = AnimationController::with_step(
            RotationPolicy::Bounded { target: 3.0 * std::f64::consts::PI },
            1.5 * std::f64::consts::PI,
        );
        controller.start();
        controller.advance();
        controller.advance();
        assert!(packed_rotation(&controller) > std::f32::consts::TAU);
    }
}
