//! Touch input dispatcher.
//!
//! Turns raw per-pointer touch events into the overall gesture state
//! machine and fans every accepted event out to the live gesture
//! detectors. All mutable state sits behind one mutex that is taken by
//! [`TouchInputDispatcher::handle_touch_input`],
//! [`TouchInputDispatcher::update_touch_pointer`] and the hold-timer
//! callback, so the input thread and the timer thread always see a
//! consistent pointer snapshot.
//!
//! Malformed input (negative timestamps, unknown pointers, events that make
//! no sense in the current state) is dropped and reported as `false`;
//! touch drivers are not trusted to deliver well-formed sequences.

use super::dpi::ScreenDpi;
use super::gestures::GestureState;
use super::hold_timer::HoldTimer;
use super::touch::{Pointer, Touch, TouchInput, TouchSample, MAX_POINTERS};
use crate::actions::{ActionForwarder, ActionHandler};
use crate::config::GestureConfig;
use crate::detectors::{self, GestureDetector};
use glam::Vec2;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Entry point for platform touch events.
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
pub struct TouchInputDispatcher {
    shared: Arc<Mutex<DispatchState>>,
    actions: ActionForwarder,
    dpi: ScreenDpi,
}

impl Default for TouchInputDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TouchInputDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("TouchInputDispatcher")
            .field("gesture", &state.gesture)
            .field("pointers", &state.pointers)
            .field("detectors", &state.detectors.len())
            .field("dpi", &self.dpi.get())
            .finish()
    }
}

impl TouchInputDispatcher {
    /// Create a dispatcher with the default configuration.
    pub fn new() -> Self {
        Self::with_config(GestureConfig::default())
    }

    /// Create a dispatcher with the given configuration.
    pub fn with_config(config: GestureConfig) -> Self {
        let actions = ActionForwarder::new();
        let dpi = ScreenDpi::new(config.screen_dpi);

        tracing::info!(
            hold_timeout_ms = config.hold_timeout_ms,
            dpi = config.screen_dpi,
            "Creating touch input dispatcher"
        );

        let shared = Arc::new_cyclic(|weak: &Weak<Mutex<DispatchState>>| {
            let weak = weak.clone();
            let timer = HoldTimer::spawn(move |generation| {
                if let Some(shared) = weak.upgrade() {
                    lock_state(&shared).on_hold_timeout(generation);
                }
            });
            Mutex::new(DispatchState::new(config, dpi.clone(), actions.clone(), timer))
        });

        Self {
            shared,
            actions,
            dpi,
        }
    }

    /// Feed one raw touch event.
    ///
    /// `time` is a monotonic timestamp in nanoseconds, `pointer` the slot
    /// index (`0` is the primary pointer) and `size` the contact radius in
    /// pixels, `0` if the device does not report one.
    ///
    /// Returns the answer of the most specific consumer callback that ran,
    /// `true` if none did, and `false` if the event was rejected.
    pub fn handle_touch_input(
        &self,
        event: TouchInput,
        x: f32,
        y: f32,
        time: i64,
        pointer: i32,
        size: f32,
    ) -> bool {
        if time < 0 {
            tracing::debug!(%event, time, "Dropping touch event with negative timestamp");
            return false;
        }
        let Some(index) = pointer_index(pointer) else {
            tracing::debug!(%event, pointer, "Dropping touch event for untracked pointer");
            return false;
        };

        self.lock()
            .handle(event, index, Touch::new(x, y, time), size)
    }

    /// Feed one raw touch event given as a [`TouchSample`].
    pub fn handle_touch(&self, sample: TouchSample) -> bool {
        self.handle_touch_input(
            sample.event,
            sample.x,
            sample.y,
            sample.time,
            sample.pointer,
            sample.size,
        )
    }

    /// Refresh a pointer's position without driving the gesture state machine.
    ///
    /// For platforms that deliver coalesced coordinates separately from
    /// discrete events; a following [`TouchInput::Move`] makes the movement
    /// count for recognition.
    pub fn update_touch_pointer(&self, pointer: i32, x: f32, y: f32, time: i64, size: f32) -> bool {
        if time < 0 {
            return false;
        }
        let Some(index) = pointer_index(pointer) else {
            return false;
        };

        self.lock().update(index, Touch::new(x, y, time), size)
    }

    /// Set the screen density used for pointer sizes and swipe distances.
    ///
    /// Returns `false` and keeps the old value for non-finite or
    /// non-positive densities.
    pub fn set_screen_dpi(&self, dpi: f32) -> bool {
        let updated = self.dpi.set(dpi);
        if updated {
            tracing::debug!(dpi, "Screen DPI updated");
        }
        updated
    }

    /// Current screen density.
    pub fn screen_dpi(&self) -> f32 {
        self.dpi.get()
    }

    /// Register the gesture consumer, replacing any previous one.
    pub fn register_handler(&self, handler: Box<dyn ActionHandler>) {
        self.actions.register(handler);
    }

    /// Remove the gesture consumer.
    pub fn unregister_handler(&self) -> Option<Box<dyn ActionHandler>> {
        self.actions.unregister()
    }

    /// Current overall gesture state.
    pub fn gesture_state(&self) -> GestureState {
        self.lock().gesture
    }

    /// Number of live gesture detectors.
    pub fn active_detectors(&self) -> usize {
        self.lock().detectors.len()
    }

    /// Snapshot of the pointer in slot `index`.
    pub fn pointer(&self, index: usize) -> Option<Pointer> {
        self.lock().pointers.get(index).copied()
    }

    fn lock(&self) -> MutexGuard<'_, DispatchState> {
        lock_state(&self.shared)
    }
}

fn lock_state(shared: &Mutex<DispatchState>) -> MutexGuard<'_, DispatchState> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

fn pointer_index(pointer: i32) -> Option<usize> {
    usize::try_from(pointer)
        .ok()
        .filter(|&index| index < MAX_POINTERS)
}

/// Everything the input thread and the hold timer share.
struct DispatchState {
    config: GestureConfig,
    dpi: ScreenDpi,
    actions: ActionForwarder,
    pointers: [Pointer; MAX_POINTERS],
    gesture: GestureState,
    detectors: Vec<Box<dyn GestureDetector>>,
    timer: HoldTimer,
    /// Bumped on every timer start and stop; stale timeouts carry an older value
    hold_generation: u64,
    /// Whether lifting the remaining pointer completes a two-finger tap
    two_finger_tap: Option<Vec2>,
    /// Whether slot 0 holds the secondary pointer after the primary lifted
    promoted: bool,
}

impl DispatchState {
    fn new(config: GestureConfig, dpi: ScreenDpi, actions: ActionForwarder, timer: HoldTimer) -> Self {
        Self {
            config,
            dpi,
            actions,
            pointers: [Pointer::default(); MAX_POINTERS],
            gesture: GestureState::Unknown,
            detectors: Vec::new(),
            timer,
            hold_generation: 0,
            two_finger_tap: None,
            promoted: false,
        }
    }

    fn handle(&mut self, event: TouchInput, index: usize, touch: Touch, size: f32) -> bool {
        match event {
            TouchInput::Abort => self.abort(),
            TouchInput::Down => self.down(index, touch, size),
            TouchInput::Up => self.up(index, touch),
            TouchInput::Move => self.motion(index, touch, size),
        }
    }

    fn set_state(&mut self, gesture: GestureState) {
        if self.gesture != gesture {
            tracing::debug!(from = %self.gesture, to = %gesture, "Gesture state changed");
            self.gesture = gesture;
        }
    }

    fn start_hold_timer(&mut self) {
        self.hold_generation += 1;
        self.timer.start(self.hold_generation, self.config.hold_timeout());
    }

    fn stop_hold_timer(&mut self) {
        self.hold_generation += 1;
        self.timer.stop();
    }

    fn contact_size(&self, reported: f32) -> f32 {
        if reported > 0.0 {
            reported
        } else {
            self.dpi.default_pointer_size()
        }
    }

    fn any_moving(&self) -> bool {
        self.pointers.iter().any(|p| p.valid() && p.moving)
    }

    fn abort(&mut self) -> bool {
        self.stop_hold_timer();
        self.set_state(GestureState::Unknown);
        for pointer in &mut self.pointers {
            pointer.reset();
        }
        self.detectors.clear();
        self.two_finger_tap = None;
        self.promoted = false;

        self.actions.touch_abort();
        true
    }

    fn down(&mut self, index: usize, touch: Touch, size: f32) -> bool {
        if !touch.valid() {
            tracing::debug!(index, ?touch, "Dropping down event with invalid position");
            return false;
        }
        let size = self.contact_size(size);

        if index == 0 {
            if self.gesture != GestureState::Unknown {
                tracing::debug!(state = %self.gesture, "Primary pointer down mid-gesture, restarting");
                self.pointers[1].reset();
            }

            self.pointers[0].press(touch, size);
            self.detectors =
                detectors::standard_set(&self.actions, &self.dpi, &self.config.swipe);
            self.two_finger_tap = None;
            self.promoted = false;
            self.set_state(GestureState::SingleTouch);

            let result = self.actions.single_touch_start(touch.pos());
            self.start_hold_timer();
            self.notify_detectors(TouchInput::Down, index);
            return result;
        }

        let result = match self.gesture {
            GestureState::SingleTouch | GestureState::SingleTouchHold => {
                self.pointers[index].press(touch, size);
                self.set_state(GestureState::MultiTouchStart);

                self.actions
                    .multi_touch_start(self.pointers[0].down.pos(), MAX_POINTERS);
                let result = self.actions.multi_touch_down(touch.pos(), index);
                self.start_hold_timer();
                result
            }
            GestureState::MultiTouchDone => {
                self.pointers[index].press(touch, size);
                self.promoted = false;
                self.set_state(GestureState::MultiTouchStart);

                let result = self.actions.multi_touch_down(touch.pos(), index);
                self.stop_hold_timer();
                result
            }
            _ => {
                tracing::debug!(index, state = %self.gesture, "Ignoring additional pointer");
                return false;
            }
        };

        self.notify_detectors(TouchInput::Down, index);
        result
    }

    fn motion(&mut self, index: usize, touch: Touch, size: f32) -> bool {
        if !self.pointers[index].valid()
            || matches!(
                self.gesture,
                GestureState::Unknown | GestureState::MultiTouchDone
            )
        {
            tracing::trace!(index, state = %self.gesture, "Dropping unexpected move");
            return false;
        }

        {
            let pointer = &mut self.pointers[index];
            pointer.current = touch;
            if size > 0.0 {
                pointer.size = size;
            }
            if pointer.refresh_moving() {
                tracing::debug!(index, travel = pointer.travel(), "Pointer started moving");
            }
        }

        let mut result = true;

        if self.any_moving() {
            match self.gesture {
                GestureState::SingleTouch => {
                    self.stop_hold_timer();
                    self.set_state(GestureState::Pan);
                    result = self
                        .actions
                        .touch_gesture_start(self.pointers[index].down.pos());
                }
                GestureState::MultiTouchStart => {
                    self.stop_hold_timer();
                    self.set_state(GestureState::MultiTouch);
                    for pointer in self.pointers.iter_mut().filter(|p| p.valid()) {
                        pointer.last = pointer.current;
                    }
                }
                _ => {}
            }
        }

        let pointer = self.pointers[index];
        let position = pointer.current.pos();
        let offset = pointer.delta();
        let velocity = pointer.velocity(true).unwrap_or(Vec2::ZERO);

        match self.gesture {
            GestureState::Pan => {
                result = self.actions.touch_gesture_pan(position, offset, velocity);
            }
            GestureState::SingleTouchHold => {
                result = self.actions.single_touch_move(position, offset, velocity);
            }
            GestureState::MultiTouch | GestureState::MultiTouchHold => {
                result = self
                    .actions
                    .multi_touch_move(position, offset, velocity, index);
            }
            _ => {}
        }

        self.notify_detectors(TouchInput::Move, index);
        self.pointers[index].last = self.pointers[index].current;
        result
    }

    fn up(&mut self, mut index: usize, touch: Touch) -> bool {
        // After the primary lifted, the remaining contact sits in slot 0
        // but may still be reported under its original index.
        if self.gesture == GestureState::MultiTouchDone
            && self.promoted
            && index == 1
            && !self.pointers[1].valid()
        {
            tracing::trace!(index, "Remaining pointer lifted under its original index");
            index = 0;
        }

        if !self.pointers[index].valid() || self.gesture == GestureState::Unknown {
            tracing::trace!(index, state = %self.gesture, "Dropping unexpected up");
            return false;
        }

        self.pointers[index].current = touch;
        self.stop_hold_timer();

        let pointer = self.pointers[index];
        let position = touch.pos();
        let result;

        match self.gesture {
            GestureState::SingleTouch | GestureState::SingleTouchHold => {
                result = self.actions.single_touch_end(position);
                if self.gesture == GestureState::SingleTouch {
                    self.actions.tap(pointer.down.pos(), 1);
                }
                self.set_state(GestureState::Unknown);
            }
            GestureState::Pan => {
                let velocity = pointer.velocity(false).unwrap_or(Vec2::ZERO);
                result = self
                    .actions
                    .touch_gesture_end(position, pointer.total_delta(), velocity);
                self.set_state(GestureState::Unknown);
            }
            GestureState::MultiTouchStart
            | GestureState::MultiTouchHold
            | GestureState::MultiTouch => {
                result = self.actions.multi_touch_up(position, index);

                self.two_finger_tap = (self.gesture == GestureState::MultiTouchStart
                    && !self.any_moving())
                .then(|| {
                    let [first, second] = &self.pointers;
                    (first.down.pos() + second.down.pos()) / 2.0
                });
                self.set_state(GestureState::MultiTouchDone);
            }
            GestureState::MultiTouchDone => {
                let velocity = pointer.velocity(false).unwrap_or(Vec2::ZERO);
                result = self
                    .actions
                    .touch_gesture_end(position, pointer.total_delta(), velocity);

                if let Some(center) = self.two_finger_tap.take() {
                    if !pointer.moving {
                        self.actions.tap(center, MAX_POINTERS);
                    }
                }
                self.set_state(GestureState::Unknown);
            }
            GestureState::Unknown => return false,
        }

        self.notify_detectors(TouchInput::Up, index);

        if self.gesture == GestureState::Unknown {
            for pointer in &mut self.pointers {
                pointer.reset();
            }
            if !self.detectors.is_empty() {
                tracing::debug!(
                    remaining = self.detectors.len(),
                    "Discarding detectors after final lift"
                );
                self.detectors.clear();
            }
            self.two_finger_tap = None;
            self.promoted = false;
        } else {
            // The remaining pointer becomes the primary one.
            self.pointers[index].reset();
            self.promoted = index == 0;
            if index == 0 {
                self.pointers[0] = self.pointers[1];
                self.pointers[1].reset();
            }
        }

        result
    }

    fn update(&mut self, index: usize, touch: Touch, size: f32) -> bool {
        let pointer = &mut self.pointers[index];
        if !pointer.valid() {
            return false;
        }

        pointer.last = pointer.current;
        pointer.current = touch;
        if size > 0.0 {
            pointer.size = size;
        }
        if pointer.refresh_moving() {
            tracing::debug!(index, travel = pointer.travel(), "Pointer started moving");
        }

        let pointer = *pointer;
        for detector in &mut self.detectors {
            detector.on_touch_update(index, &pointer);
        }
        true
    }

    fn on_hold_timeout(&mut self, generation: u64) {
        if generation != self.hold_generation {
            tracing::trace!(
                generation,
                current = self.hold_generation,
                "Discarding stale hold timeout"
            );
            return;
        }

        let position = self.pointers[0].down.pos();
        match self.gesture {
            GestureState::SingleTouch if !self.any_moving() => {
                self.set_state(GestureState::SingleTouchHold);
                self.actions.single_touch_hold(position);
                self.actions.long_press(position, 1);
            }
            GestureState::MultiTouchStart if !self.any_moving() => {
                self.set_state(GestureState::MultiTouchHold);
                self.actions.multi_touch_hold(position, MAX_POINTERS);
                self.actions.long_press(position, MAX_POINTERS);
            }
            _ => {}
        }
    }

    fn notify_detectors(&mut self, event: TouchInput, index: usize) {
        let pointer = self.pointers[index];
        for detector in &mut self.detectors {
            let used = match event {
                TouchInput::Down => detector.on_touch_down(index, &pointer),
                TouchInput::Up => detector.on_touch_up(index, &pointer),
                TouchInput::Move => detector.on_touch_move(index, &pointer),
                TouchInput::Abort => false,
            };
            tracing::trace!(detector = detector.name(), %event, index, used, "Detector notified");
        }

        self.detectors.retain(|detector| {
            let done = detector.is_done();
            if done {
                tracing::trace!(detector = detector.name(), "Detector finished");
            }
            !done
        });
    }
}
