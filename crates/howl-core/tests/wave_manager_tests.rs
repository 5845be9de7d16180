// Phase playback, cycle hooks and variance.

use howl_core::{CyclicalWave, InterpolationType, WaveManager, WavePoint};
use proptest::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Ev {
    EndOfCycle,
    Iterations,
    SpeedReached,
    AmplitudeReached,
}

fn triangle() -> CyclicalWave {
    CyclicalWave::from_points(
        "triangle",
        [WavePoint::new(0.0, 0.0), WavePoint::new(0.5, 1.0)],
        InterpolationType::Linear,
    )
    .expect("valid shape")
}

fn steady(speed: f64) -> WaveManager<Ev> {
    let mut waves = WaveManager::new(7);
    waves.add_wave(triangle());
    waves.set_speed(speed);
    waves.set_speed_variance(0.0);
    waves.set_amplitude_variance(0.0);
    waves
}

#[test]
fn large_step_crosses_several_boundaries() {
    let mut waves = steady(1.0);
    let mut fired = Vec::new();
    waves.stop_after_iterations(2, Ev::Iterations);
    waves.update(3.5, |w, ev| fired.push((ev, w.iteration())));
    assert_eq!(waves.iteration(), 3);
    assert!((waves.phase() - 0.5).abs() < 1e-9, "phase was {}", waves.phase());
    assert_eq!(fired, vec![(Ev::Iterations, 2)], "hook fires once, at its boundary");
}

#[test]
fn end_of_cycle_hook_waits_for_the_next_boundary() {
    let mut waves = steady(1.0);
    let mut fired = 0;
    waves.stop_at_end_of_cycle(Ev::EndOfCycle);
    waves.update(0.5, |_, _| fired += 1);
    assert_eq!(fired, 0);
    waves.update(0.6, |_, _| fired += 1);
    assert_eq!(fired, 1);
    waves.update(2.0, |_, _| fired += 1);
    assert_eq!(fired, 1, "hooks are one-shot");
}

#[test]
fn end_of_cycle_hooks_fire_before_iteration_hooks() {
    let mut waves = steady(1.0);
    let mut fired = Vec::new();
    waves.stop_after_iterations(1, Ev::Iterations);
    waves.stop_at_end_of_cycle(Ev::EndOfCycle);
    waves.update(1.0, |_, ev| fired.push(ev));
    assert_eq!(fired, vec![Ev::EndOfCycle, Ev::Iterations]);
}

#[test]
fn handler_can_restart_and_retune_mid_update() {
    let mut waves = steady(1.0);
    waves.stop_at_end_of_cycle(Ev::EndOfCycle);
    waves.update(1.25, |w, _| {
        w.restart();
        w.set_speed(2.0);
    });
    // 0.25 s left after the boundary, played at the new speed.
    assert_eq!(waves.iteration(), 0);
    assert!((waves.phase() - 0.5).abs() < 1e-9, "phase was {}", waves.phase());
}

#[test]
fn hook_registered_by_handler_waits_for_a_later_boundary() {
    let mut waves = steady(1.0);
    let mut boundaries = Vec::new();
    waves.stop_at_end_of_cycle(Ev::EndOfCycle);
    waves.update(3.5, |w, ev| {
        boundaries.push(w.iteration());
        w.stop_at_end_of_cycle(ev);
    });
    assert_eq!(boundaries, vec![1, 2, 3]);
}

#[test]
fn restart_keeps_hooks_and_targets() {
    let mut waves = steady(1.0);
    waves.stop_after_iterations(1, Ev::Iterations);
    assert_eq!(waves.set_target_speed(2.0, 0.5, None), None);
    waves.update(0.4, |_, _| {});
    waves.restart();
    assert_eq!(waves.phase(), 0.0);
    assert_eq!(waves.iteration(), 0);
    assert_eq!(waves.target_speed(), 2.0);

    let mut fired = Vec::new();
    waves.update(5.0, |_, ev| fired.push(ev));
    assert_eq!(fired, vec![Ev::Iterations]);
}

#[test]
fn clear_pending_drops_hooks() {
    let mut waves = steady(1.0);
    waves.stop_at_end_of_cycle(Ev::EndOfCycle);
    waves.stop_after_iterations(1, Ev::Iterations);
    waves.clear_pending();
    waves.update(3.0, |_, ev| panic!("unexpected {ev:?}"));
}

#[test]
fn speed_and_amplitude_targets_report_completion() {
    let mut waves = steady(1.0);
    assert_eq!(
        waves.set_target_speed(1.0, 0.5, Some(Ev::SpeedReached)),
        Some(Ev::SpeedReached),
        "nothing to ease, so the event comes straight back"
    );
    assert_eq!(waves.set_target_speed(2.0, 0.5, Some(Ev::SpeedReached)), None);
    assert_eq!(waves.set_target_amplitude(0.5, 1.0, Some(Ev::AmplitudeReached)), None);

    let mut fired = Vec::new();
    waves.update(0.4, |_, ev| fired.push(ev));
    assert!(fired.is_empty());
    waves.update(0.6, |_, ev| fired.push(ev));
    assert_eq!(fired, vec![Ev::AmplitudeReached]);
    waves.update(1.5, |_, ev| fired.push(ev));
    assert_eq!(fired, vec![Ev::AmplitudeReached, Ev::SpeedReached]);
    assert_eq!(waves.current_speed(), 2.0);
    assert_eq!(waves.current_amplitude(), 0.5);
}

#[test]
fn phase_follows_an_easing_speed_within_one_step() {
    let easing = || {
        let mut waves = steady(1.0);
        let _ = waves.set_target_speed(3.0, 1.0, None);
        waves
    };
    let mut fine = easing();
    for _ in 0..25 {
        fine.update(0.1, |_, _| {});
    }
    let mut coarse = easing();
    coarse.update(2.5, |_, _| {});

    // Two seconds averaging speed 2, then half a second at 3: five and a half cycles.
    for waves in [&fine, &coarse] {
        assert_eq!(waves.iteration(), 5);
        assert!((waves.phase() - 0.5).abs() < 1e-9, "phase was {}", waves.phase());
        assert_eq!(waves.current_speed(), 3.0);
    }
}

#[test]
fn speed_completion_is_reported_inside_a_long_step() {
    let mut waves = steady(1.0);
    assert_eq!(waves.set_target_speed(2.0, 1.0, Some(Ev::SpeedReached)), None);
    let mut fired = Vec::new();
    waves.update(10.0, |w, ev| {
        if ev == Ev::SpeedReached {
            fired.push(w.current_speed());
        }
    });
    assert_eq!(fired, vec![2.0]);
    // One second averaging 1.5, then nine at 2.
    assert_eq!(waves.iteration(), 19);
    assert!((waves.phase() - 0.5).abs() < 1e-9, "phase was {}", waves.phase());
}

#[test]
fn zero_speed_holds_phase() {
    let mut waves = steady(0.0);
    waves.update(10.0, |_, _| {});
    assert_eq!(waves.phase(), 0.0);
    assert_eq!(waves.iteration(), 0);
}

#[test]
fn position_scales_with_amplitude_and_velocity_with_speed() {
    let mut waves = steady(2.0);
    waves.set_amplitude(0.5);
    waves.update(0.1, |_, _| {});
    let (position, velocity) = waves.position_and_velocity("triangle");
    // Phase 0.2 on a 0 -> 1 ramp over half a cycle.
    assert!((position - 0.2).abs() < 1e-9, "position was {position}");
    assert!((velocity - 2.0).abs() < 1e-9, "velocity was {velocity}");
    assert!((waves.position("triangle") - 0.2).abs() < 1e-9);
}

#[test]
fn unknown_wave_reads_as_silence() {
    let waves = steady(1.0);
    assert_eq!(waves.position("missing"), 0.0);
    assert_eq!(waves.position_and_velocity("missing"), (0.0, 0.0));
    assert!(!waves.has_wave("missing"));
    assert!(waves.has_wave("triangle"));
}

#[test]
fn add_wave_as_overrides_the_shape_name() {
    let mut waves = steady(1.0);
    waves.add_wave_as("alias", triangle());
    assert!(waves.has_wave("alias"));
    assert_eq!(waves.wave("alias").map(|w| w.name()), Some("triangle"));
}

#[test]
fn variance_factors_stay_in_range() {
    let mut waves: WaveManager<Ev> = WaveManager::new(99);
    waves.add_wave(triangle());
    waves.set_speed_variance(0.3);
    waves.set_amplitude_variance(0.4);
    let mut draws = 0;
    for _ in 0..200 {
        waves.update(0.37, |_, _| {});
        let speed = waves.speed_variance_factor();
        let amplitude = waves.amplitude_variance_factor();
        assert!((0.7 - 1e-12..=1.3 + 1e-12).contains(&speed), "speed factor {speed}");
        assert!((0.6 - 1e-12..=1.0).contains(&amplitude), "amplitude factor {amplitude}");
        let position = waves.position("triangle");
        let plain = waves.position_without_variance("triangle");
        assert!(position <= plain + 1e-12, "variance only removes amplitude");
        draws += 1;
    }
    assert_eq!(draws, 200);
    assert!(waves.iteration() > 10);
}

#[test]
fn first_cycle_after_restart_has_no_variance() {
    let mut waves: WaveManager<Ev> = WaveManager::new(3);
    waves.set_speed_variance(0.5);
    waves.set_amplitude_variance(0.5);
    waves.update(5.3, |_, _| {});
    waves.restart();
    assert_eq!(waves.speed_variance_factor(), 1.0);
    assert_eq!(waves.amplitude_variance_factor(), 1.0);
}

#[test]
fn amplitude_variance_eases_in() {
    let mut waves: WaveManager<Ev> = WaveManager::new(11);
    waves.set_speed_variance(0.0);
    waves.set_amplitude_variance(1.0);
    waves.set_amplitude_variance_ease_in(4.0);
    waves.update(1.0, |_, _| {});
    // One cycle into a four-cycle ease-in: at most a quarter of the amplitude can go.
    assert!(waves.amplitude_variance_factor() >= 0.75 - 1e-12);
}

#[test]
fn same_seed_same_variance() {
    let run = |seed| {
        let mut waves: WaveManager<Ev> = WaveManager::new(seed);
        waves.set_speed_variance(0.5);
        let mut factors = Vec::new();
        for _ in 0..20 {
            waves.update(0.7, |_, _| {});
            factors.push(waves.speed_variance_factor());
        }
        factors
    };
    assert_eq!(run(5), run(5));
    assert_ne!(run(5), run(6));
}

#[test]
#[should_panic(expected = "time delta may not be negative")]
fn negative_step_panics() {
    let mut waves = steady(1.0);
    waves.update(-0.1, |_, _| {});
}

fn cyclic_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).abs();
    d.min(1.0 - d)
}

proptest! {
    #[test]
    fn split_steps_match_a_single_step(
        speed in 0.1f64..5.0,
        first in 0.0f64..4.0,
        second in 0.0f64..4.0,
        seed in any::<u64>(),
    ) {
        let build = || {
            let mut waves: WaveManager<Ev> = WaveManager::new(seed);
            waves.add_wave(triangle());
            waves.set_speed(speed);
            waves.set_speed_variance(0.3);
            waves.set_amplitude_variance(0.3);
            waves
        };
        let mut split = build();
        split.update(first, |_, _| {});
        split.update(second, |_, _| {});
        let mut single = build();
        single.update(first + second, |_, _| {});

        prop_assert_eq!(split.iteration(), single.iteration());
        prop_assert!(cyclic_distance(split.phase(), single.phase()) < 1e-6,
            "{} vs {}", split.phase(), single.phase());
        prop_assert_eq!(split.amplitude_variance_factor(), single.amplitude_variance_factor());
        prop_assert!((split.position("triangle") - single.position("triangle")).abs() < 1e-5);
    }
}

proptest! {
    #[test]
    fn split_steps_match_a_single_step_while_easing(
        speed in 0.1f64..5.0,
        target in 0.1f64..5.0,
        rate in 0.05f64..2.0,
        first in 0.0f64..4.0,
        second in 0.0f64..4.0,
        seed in any::<u64>(),
    ) {
        let build = || {
            let mut waves: WaveManager<Ev> = WaveManager::new(seed);
            waves.add_wave(triangle());
            waves.set_speed(speed);
            waves.set_speed_variance(0.3);
            waves.set_amplitude_variance(0.3);
            let _ = waves.set_target_speed(target, rate, None);
            waves
        };
        let mut split = build();
        split.update(first, |_, _| {});
        split.update(second, |_, _| {});
        let mut single = build();
        single.update(first + second, |_, _| {});

        prop_assert_eq!(split.iteration(), single.iteration());
        prop_assert!(cyclic_distance(split.phase(), single.phase()) < 1e-6,
            "{} vs {}", split.phase(), single.phase());
        prop_assert!((split.current_speed() - single.current_speed()).abs() < 1e-9);
    }
}
