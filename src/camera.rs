use std::time::{Duration, Instant};

use eframe::egui::{Pos2, Rect, Vec2};
use tracing::trace;

use crate::timer::Generation;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    /// Scale a search hit is brought to.
    pub focus_scale: f32,
    pub fly_duration: Duration,
    /// Zoom change per scroll pixel.
    pub zoom_step: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.05,
            max_scale: 6.0,
            focus_scale: 2.0,
            fly_duration: Duration::from_millis(1000),
            zoom_step: 0.0018,
        }
    }
}

/// Pan/zoom mapping: `screen = viewport_center + translate + world * scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTransform {
    pub translate: Vec2,
    pub scale: f32,
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl CameraTransform {
    pub const IDENTITY: Self = Self {
        translate: Vec2::ZERO,
        scale: 1.0,
    };

    /// The transform that puts `world` at the viewport centre.
    pub fn centered_on(world: Pos2, scale: f32) -> Self {
        Self {
            translate: -world.to_vec2() * scale,
            scale,
        }
    }

    pub fn world_to_screen(&self, center: Pos2, world: Pos2) -> Pos2 {
        center + self.translate + world.to_vec2() * self.scale
    }

    pub fn screen_to_world(&self, center: Pos2, screen: Pos2) -> Pos2 {
        ((screen - center - self.translate) / self.scale).to_pos2()
    }

    fn lerp(&self, target: &Self, t: f32) -> Self {
        Self {
            translate: self.translate + (target.translate - self.translate) * t,
            scale: self.scale + (target.scale - self.scale) * t,
        }
    }
}

/// Cubic ease-in-out over `[0, 1]`.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraPhase {
    Idle,
    UserDragging,
    Animating,
}

#[derive(Clone, Copy, Debug)]
struct Flight {
    from: CameraTransform,
    to: CameraTransform,
    started: Instant,
    duration: Duration,
    generation: Generation,
}

#[derive(Clone, Copy, Debug)]
enum CameraState {
    Idle,
    UserDragging,
    Animating(Flight),
}

#[derive(Debug)]
pub struct Camera {
    config: CameraConfig,
    transform: CameraTransform,
    state: CameraState,
    generation: Generation,
}

impl Camera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            transform: CameraTransform::IDENTITY,
            state: CameraState::Idle,
            generation: Generation::default(),
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn transform(&self) -> CameraTransform {
        self.transform
    }

    pub fn phase(&self) -> CameraPhase {
        match self.state {
            CameraState::Idle => CameraPhase::Idle,
            CameraState::UserDragging => CameraPhase::UserDragging,
            CameraState::Animating(_) => CameraPhase::Animating,
        }
    }

    /// Destination of the running flight, if any.
    pub fn target(&self) -> Option<CameraTransform> {
        match self.state {
            CameraState::Animating(flight) => Some(flight.to),
            _ => None,
        }
    }

    fn clamp_scale(&self, scale: f32) -> f32 {
        if scale.is_finite() {
            scale.clamp(self.config.min_scale, self.config.max_scale)
        } else {
            self.transform.scale
        }
    }

    pub fn begin_drag(&mut self) {
        self.state = CameraState::UserDragging;
    }

    pub fn drag_by(&mut self, delta: Vec2) {
        self.state = CameraState::UserDragging;
        self.transform.translate += delta;
    }

    pub fn end_drag(&mut self) {
        if matches!(self.state, CameraState::UserDragging) {
            self.state = CameraState::Idle;
        }
    }

    /// Zoom factor for a scroll of `scroll` pixels, limited per event.
    pub fn scroll_factor(&self, scroll: f32) -> f32 {
        (1.0 + scroll * self.config.zoom_step).clamp(0.85, 1.15)
    }

    /// Scroll zoom keeping the world point under `anchor` fixed on screen.
    pub fn zoom_at(&mut self, factor: f32, anchor: Pos2, center: Pos2) {
        if matches!(self.state, CameraState::Animating(_)) {
            self.state = CameraState::Idle;
        }

        let world_before = self.transform.screen_to_world(center, anchor);
        self.transform.scale = self.clamp_scale(self.transform.scale * factor);
        self.transform.translate = anchor - center - world_before.to_vec2() * self.transform.scale;
    }

    /// Starts an eased flight towards `world` at `scale`, replacing any
    /// flight in progress. The new flight starts from the current transform.
    pub fn navigate_to(&mut self, world: Pos2, scale: f32, duration: Duration, now: Instant) {
        let to = CameraTransform::centered_on(world, self.clamp_scale(scale));
        self.state = CameraState::Animating(Flight {
            from: self.transform,
            to,
            started: now,
            duration,
            generation: self.generation,
        });
    }

    /// Advances the flight. Returns `true` while still animating.
    pub fn tick(&mut self, now: Instant) -> bool {
        let CameraState::Animating(flight) = self.state else {
            return false;
        };

        if flight.generation != self.generation {
            trace!(
                stale = flight.generation.value(),
                current = self.generation.value(),
                "dropping stale camera flight"
            );
            self.state = CameraState::Idle;
            return false;
        }

        let elapsed = now.saturating_duration_since(flight.started);
        if flight.duration.is_zero() || elapsed >= flight.duration {
            self.transform = flight.to;
            self.state = CameraState::Idle;
            return false;
        }

        let progress = elapsed.as_secs_f32() / flight.duration.as_secs_f32();
        self.transform = flight.from.lerp(&flight.to, ease_in_out_cubic(progress));
        true
    }

    /// Marks the running flight stale; it is dropped on the next tick.
    pub fn invalidate(&mut self) {
        self.generation = self.generation.next();
    }

    pub fn reset(&mut self) {
        self.transform = CameraTransform::IDENTITY;
        self.state = CameraState::Idle;
    }

    /// Frames `bounds` inside a viewport of `viewport` size.
    pub fn fit(&mut self, bounds: Rect, viewport: Vec2) {
        let span = bounds.size().max(Vec2::splat(1.0));
        let scale = self.clamp_scale((viewport.x / span.x).min(viewport.y / span.y) * 0.9);
        self.transform = CameraTransform::centered_on(bounds.center(), scale);
        self.state = CameraState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    #[test]
    fn transform_round_trips_points() {
        let transform = CameraTransform {
            translate: vec2(30.0, -12.0),
            scale: 2.5,
        };
        let center = pos2(400.0, 300.0);
        let world = pos2(-17.0, 42.0);

        let screen = transform.world_to_screen(center, world);
        let back = transform.screen_to_world(center, screen);
        assert!((back - world).length() < 1e-4);
    }

    #[test]
    fn zoom_is_clamped_and_keeps_anchor_fixed() {
        let mut camera = Camera::new(CameraConfig::default());
        let center = pos2(400.0, 300.0);
        let anchor = pos2(520.0, 250.0);
        let world_under_anchor = camera.transform().screen_to_world(center, anchor);

        for _ in 0..200 {
            camera.zoom_at(1.15, anchor, center);
        }
        assert_eq!(camera.transform().scale, 6.0);
        let after = camera.transform().world_to_screen(center, world_under_anchor);
        assert!((after - anchor).length() < 1e-2);

        for _ in 0..400 {
            camera.zoom_at(0.85, anchor, center);
        }
        assert_eq!(camera.transform().scale, 0.05);
    }

    #[test]
    fn scroll_factor_is_limited_per_event() {
        let camera = Camera::new(CameraConfig::default());
        assert_eq!(camera.scroll_factor(0.0), 1.0);
        assert_eq!(camera.scroll_factor(10_000.0), 1.15);
        assert_eq!(camera.scroll_factor(-10_000.0), 0.85);
    }

    #[test]
    fn drag_moves_and_returns_to_idle() {
        let mut camera = Camera::new(CameraConfig::default());
        camera.begin_drag();
        camera.drag_by(vec2(10.0, 5.0));
        camera.drag_by(vec2(-4.0, 1.0));
        assert_eq!(camera.phase(), CameraPhase::UserDragging);

        camera.end_drag();
        assert_eq!(camera.phase(), CameraPhase::Idle);
        assert_eq!(camera.transform().translate, vec2(6.0, 6.0));
    }

    #[test]
    fn flight_eases_to_target_then_idles() {
        let mut camera = Camera::new(CameraConfig::default());
        let start = Instant::now();
        let second = Duration::from_millis(1000);

        camera.navigate_to(pos2(100.0, 50.0), 2.0, second, start);
        assert_eq!(camera.phase(), CameraPhase::Animating);

        assert!(camera.tick(start + Duration::from_millis(250)));
        let quarter = camera.transform();
        // Cubic ease-in-out covers 1/16 of the way at t = 0.25.
        assert!((quarter.scale - (1.0 + 1.0 / 16.0)).abs() < 1e-4);

        assert!(!camera.tick(start + second));
        assert_eq!(camera.phase(), CameraPhase::Idle);
        assert_eq!(
            camera.transform(),
            CameraTransform::centered_on(pos2(100.0, 50.0), 2.0)
        );
    }

    #[test]
    fn new_flight_restarts_from_mid_animation() {
        let mut camera = Camera::new(CameraConfig::default());
        let start = Instant::now();
        let second = Duration::from_millis(1000);

        camera.navigate_to(pos2(100.0, 0.0), 2.0, second, start);
        camera.tick(start + Duration::from_millis(500));
        let midway = camera.transform();

        let restart = start + Duration::from_millis(500);
        camera.navigate_to(pos2(-100.0, 0.0), 3.0, second, restart);
        camera.tick(restart);
        assert_eq!(camera.transform(), midway);
        assert_eq!(
            camera.target(),
            Some(CameraTransform::centered_on(pos2(-100.0, 0.0), 3.0))
        );

        camera.tick(restart + second);
        assert_eq!(camera.transform().scale, 3.0);
    }

    #[test]
    fn invalidated_flight_is_dropped() {
        let mut camera = Camera::new(CameraConfig::default());
        let start = Instant::now();

        camera.navigate_to(pos2(10.0, 10.0), 2.0, Duration::from_secs(1), start);
        camera.invalidate();

        assert!(!camera.tick(start + Duration::from_millis(10)));
        assert_eq!(camera.phase(), CameraPhase::Idle);
        assert_eq!(camera.transform(), CameraTransform::IDENTITY);
    }

    #[test]
    fn target_scale_is_clamped() {
        let mut camera = Camera::new(CameraConfig::default());
        let start = Instant::now();

        camera.navigate_to(Pos2::ZERO, 50.0, Duration::from_millis(10), start);
        camera.tick(start + Duration::from_millis(10));
        assert_eq!(camera.transform().scale, camera.config().max_scale);
    }

    #[test]
    fn fit_centers_bounds() {
        let mut camera = Camera::new(CameraConfig::default());
        let bounds = Rect::from_min_max(pos2(-100.0, 0.0), pos2(100.0, 100.0));

        camera.fit(bounds, vec2(800.0, 600.0));
        let center = pos2(400.0, 300.0);
        let screen = camera.transform().world_to_screen(center, bounds.center());
        assert!((screen - center).length() < 1e-3);
        assert!((camera.transform().scale - 3.6).abs() < 1e-4);
    }
}
