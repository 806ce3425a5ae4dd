//! Property-based invariant tests for the camera and the debounced search.
//!
//! 1. No gesture or flight ever leaves the scale outside its bounds.
//! 2. Screen and world mappings invert each other.
//! 3. A debounced query only lands once its window has passed untouched,
//!    and always carries the latest input.

use std::time::{Duration, Instant};

use eframe::egui::{pos2, vec2};
use proptest::prelude::*;
use treescope::layout::layout_tree;
use treescope::{Camera, CameraConfig, CameraTransform, SearchConfig, SearchController, Tree, TreeNode};

#[derive(Clone, Debug)]
enum Gesture {
    Zoom(f32),
    Drag(f32, f32),
    Fly { x: f32, y: f32, scale: f32, after_ms: u64 },
}

fn gesture_strategy() -> impl Strategy<Value = Gesture> {
    prop_oneof![
        (0.01f32..20.0).prop_map(Gesture::Zoom),
        (-500.0f32..500.0, -500.0f32..500.0).prop_map(|(x, y)| Gesture::Drag(x, y)),
        (-1e4f32..1e4, -1e4f32..1e4, 0.0f32..100.0, 0u64..1500)
            .prop_map(|(x, y, scale, after_ms)| Gesture::Fly { x, y, scale, after_ms }),
    ]
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Camera bounds
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn scale_stays_within_bounds(gestures in prop::collection::vec(gesture_strategy(), 1..40)) {
        let config = CameraConfig::default();
        let mut camera = Camera::new(config);
        let center = pos2(400.0, 300.0);
        let mut now = Instant::now();

        for gesture in gestures {
            match gesture {
                Gesture::Zoom(factor) => camera.zoom_at(factor, pos2(350.0, 280.0), center),
                Gesture::Drag(x, y) => {
                    camera.begin_drag();
                    camera.drag_by(vec2(x, y));
                    camera.end_drag();
                }
                Gesture::Fly { x, y, scale, after_ms } => {
                    camera.navigate_to(pos2(x, y), scale, config.fly_duration, now);
                    now += Duration::from_millis(after_ms);
                    camera.tick(now);
                }
            }

            let scale = camera.transform().scale;
            prop_assert!(
                (config.min_scale..=config.max_scale).contains(&scale),
                "scale {} escaped [{}, {}]",
                scale, config.min_scale, config.max_scale
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Mapping round trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn screen_world_round_trip(
        tx in -1e3f32..1e3,
        ty in -1e3f32..1e3,
        scale in 0.05f32..6.0,
        wx in -1e3f32..1e3,
        wy in -1e3f32..1e3,
    ) {
        let transform = CameraTransform { translate: vec2(tx, ty), scale };
        let center = pos2(640.0, 360.0);
        let world = pos2(wx, wy);

        let back = transform.screen_to_world(center, transform.world_to_screen(center, world));
        prop_assert!((back - world).length() < 1e-2, "{:?} came back as {:?}", world, back);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Debounce
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn debounced_query_lands_only_after_quiet_window(
        keystrokes in prop::collection::vec((0u64..600, "[a-z]{0,4}"), 1..20),
    ) {
        let tree = Tree::new(TreeNode::new("r", "Root")).unwrap();
        let layout = layout_tree(&tree, &Default::default());
        let config = SearchConfig::default();
        let mut search = SearchController::new(config);

        let start = Instant::now();
        let mut now = start;
        let mut last_input: Option<(Instant, String)> = None;

        for (delay_ms, text) in keystrokes {
            now += Duration::from_millis(delay_ms);
            if let Some(applied) = search.poll(now, &layout).map(str::to_owned) {
                let (typed_at, typed) = last_input.clone().unwrap();
                prop_assert_eq!(applied, typed);
                prop_assert!(now.duration_since(typed_at) >= config.debounce);
            }

            search.set_query(text.clone(), now);
            prop_assert_eq!(search.raw_query(), text.as_str());
            last_input = Some((now, text));
        }

        let (typed_at, typed) = last_input.unwrap();
        prop_assert_eq!(search.poll(typed_at + config.debounce - Duration::from_millis(1), &layout), None);
        prop_assert_eq!(search.poll(typed_at + config.debounce, &layout), Some(typed.as_str()));
    }
}
