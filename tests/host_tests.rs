use howl::{ActivityHost, HostConfig, Pulse};
use proptest::prelude::*;

fn quiet_host(seed: u64) -> ActivityHost {
    ActivityHost::new(HostConfig {
        activity_change_probability: 0.0,
        seed,
    })
}

#[test]
fn silent_until_an_activity_is_set() {
    let mut host = ActivityHost::default();
    assert!(host.current_activity().is_none());
    host.update_state(0.0);
    assert_eq!(host.pulse_at_time(0.0), Pulse::default());
    assert_eq!(host.pulse_at_time(1.0), Pulse::default());
}

#[test]
fn unknown_names_are_rejected() {
    let mut host = ActivityHost::default();
    let err = host.set_activity_by_name("nope").unwrap_err();
    assert!(err.to_string().contains("nope"), "{err}");
    assert!(host.current_activity().is_none());
}

#[test]
fn set_by_name() {
    let mut host = ActivityHost::default();
    host.set_activity_by_name("vibro").unwrap();
    assert_eq!(host.current_activity().map(|info| info.name), Some("vibro"));
}

#[test]
fn change_picks_another_selectable_activity() {
    let mut host = quiet_host(17);
    host.set_activity_by_name("lick").unwrap();
    for _ in 0..50 {
        let before = host.current_activity().map(|info| info.name);
        host.change_activity();
        let after = host.current_activity().copied().unwrap();
        assert_ne!(Some(after.name), before);
        assert!(after.randomly_select, "picked {}", after.name);
    }
}

#[test]
fn zero_probability_never_changes() {
    let mut host = quiet_host(5);
    host.set_activity_by_name("chaos").unwrap();
    for i in 0..10_000 {
        host.update_state(i as f64);
    }
    assert_eq!(host.current_activity().map(|info| info.name), Some("chaos"));
}

#[test]
fn full_probability_changes_eventually() {
    let mut host = ActivityHost::new(HostConfig {
        activity_change_probability: 1.0,
        seed: 3,
    });
    host.set_activity_by_name("chaos").unwrap();
    // Three expected changes per minute; an hour in one-second steps.
    let changed = (0..3_600).any(|i| {
        host.update_state(i as f64);
        host.current_activity().map(|info| info.name) != Some("chaos")
    });
    assert!(changed);
}

#[test]
fn change_probability_is_clamped() {
    let mut host = ActivityHost::default();
    host.set_activity_change_probability(4.0);
    assert_eq!(host.config().activity_change_probability, 1.0);
    host.set_activity_change_probability(-1.0);
    assert_eq!(host.config().activity_change_probability, 0.0);
}

#[test]
fn first_call_after_a_change_only_resyncs() {
    let mut a = quiet_host(8);
    let mut b = quiet_host(8);
    a.set_activity_by_name("penetration").unwrap();
    b.set_activity_by_name("penetration").unwrap();

    // A far-off starting time must not be simulated as one huge step.
    let _ = a.pulse_at_time(4_096.0);
    let _ = b.pulse_at_time(0.0);
    for i in 1..=200 {
        let step = i as f64 * 0.0625;
        assert_eq!(a.pulse_at_time(4_096.0 + step), b.pulse_at_time(step));
    }
}

#[test]
fn time_going_backwards_resyncs() {
    let mut host = quiet_host(8);
    host.set_activity_by_name("milker").unwrap();

    let last = (0..=32)
        .map(|i| host.pulse_at_time(i as f64 * 0.0625))
        .last()
        .unwrap();
    // Rewinding simulates nothing, so the output holds.
    assert_eq!(host.pulse_at_time(0.5), last);
    assert_eq!(host.pulse_at_time(0.5), last);
}

#[test]
fn same_seed_same_stream() {
    let stream = |seed: u64| {
        let mut host = ActivityHost::new(HostConfig {
            activity_change_probability: 1.0,
            seed,
        });
        host.change_activity();
        (0..2_000)
            .map(|i| {
                let time = i as f64 * 0.1;
                host.update_state(time);
                host.pulse_at_time(time)
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(stream(77), stream(77));
}

proptest! {
    #[test]
    fn arbitrary_times_never_step_backwards(
        times in proptest::collection::vec(-100.0f64..100.0, 1..60),
        seed in any::<u64>(),
    ) {
        let mut host = quiet_host(seed);
        host.set_activity_by_name("penetration").unwrap();
        let mut last: Option<(f64, Pulse)> = None;
        for time in times {
            host.update_state(time);
            let pulse = host.pulse_at_time(time);
            prop_assert!(pulse.amp_a.is_finite() && pulse.freq_b.is_finite(), "{:?}", pulse);
            if let Some((last_time, last_pulse)) = last {
                if time <= last_time {
                    prop_assert_eq!(pulse, last_pulse, "no simulation for a rewind");
                }
            }
            last = Some((time, pulse));
        }
    }
}
