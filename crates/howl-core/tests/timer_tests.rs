// Keyed one-shot timers and handler re-entrancy.

use howl_core::TimerManager;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Ev {
    A,
    B,
    C,
}

#[test]
fn non_positive_duration_hands_the_event_back() {
    let mut timers = TimerManager::new();
    assert_eq!(timers.add_timer("k", 0.0, Ev::A), Some(Ev::A));
    assert_eq!(timers.add_timer("k", -2.0, Ev::B), Some(Ev::B));
    assert_eq!(timers.add_timer("k", f64::NAN, Ev::C), Some(Ev::C));
    assert!(timers.is_empty());
}

#[test]
fn replacing_a_key_fires_only_the_newest() {
    let mut timers = TimerManager::new();
    assert_eq!(timers.add_timer("k", 5.0, Ev::A), None);
    assert_eq!(timers.add_timer("k", 3.0, Ev::B), None);
    let mut fired = Vec::new();
    timers.update(3.0, |_, ev| fired.push(ev));
    assert_eq!(fired, vec![Ev::B]);
    timers.update(10.0, |_, ev| fired.push(ev));
    assert_eq!(fired, vec![Ev::B], "the replaced timer never fires");
}

#[test]
fn expiry_order_is_scheduling_order() {
    let mut timers = TimerManager::new();
    let _ = timers.add_timer("c", 1.0, Ev::C);
    let _ = timers.add_timer("a", 2.0, Ev::A);
    let _ = timers.add_timer("b", 0.5, Ev::B);
    let mut fired = Vec::new();
    timers.update(2.0, |_, ev| fired.push(ev));
    assert_eq!(fired, vec![Ev::C, Ev::A, Ev::B]);
}

#[test]
fn handler_can_reschedule_its_own_key() {
    let mut timers = TimerManager::new();
    let _ = timers.add_timer("tick", 1.0, Ev::A);
    let mut fired = 0;
    timers.update(1.0, |timers, ev| {
        fired += 1;
        assert!(!timers.has_timer("tick"), "removed before the handler runs");
        let _ = timers.add_timer("tick", 2.0, ev);
    });
    assert_eq!(fired, 1, "a timer added by a handler waits for the next update");
    assert_eq!(timers.remaining_time("tick"), Some(2.0));
    timers.update(2.0, |_, _| fired += 1);
    assert_eq!(fired, 2);
}

#[test]
fn handler_can_cancel_a_pending_timer() {
    let mut timers = TimerManager::new();
    let _ = timers.add_timer("first", 1.0, Ev::A);
    let _ = timers.add_timer("second", 1.0, Ev::B);
    let mut fired = Vec::new();
    timers.update(1.0, |timers, ev| {
        fired.push(ev);
        timers.cancel_timer("second");
    });
    assert_eq!(fired, vec![Ev::A]);
    assert!(timers.is_empty());
}

#[test]
fn handler_replacing_a_pending_key_starts_it_fresh() {
    let mut timers = TimerManager::new();
    let _ = timers.add_timer("first", 1.0, Ev::A);
    let _ = timers.add_timer("second", 1.0, Ev::B);
    let mut fired = Vec::new();
    timers.update(1.0, |timers, ev| {
        fired.push(ev);
        if ev == Ev::A {
            let _ = timers.add_timer("second", 4.0, Ev::C);
        }
    });
    assert_eq!(fired, vec![Ev::A]);
    assert_eq!(timers.remaining_time("second"), Some(4.0));
}

#[test]
fn progress_queries() {
    let mut timers: TimerManager = TimerManager::default();
    let _ = timers.add_timer("k", 4.0, ());
    timers.update(1.0, |_, _| {});
    assert_eq!(timers.remaining_time("k"), Some(3.0));
    assert_eq!(timers.elapsed_time("k"), Some(1.0));
    assert_eq!(timers.proportion_elapsed("k"), Some(0.25));
    assert_eq!(timers.proportion_elapsed("missing"), None);
    assert_eq!(timers.len(), 1);

    assert!(timers.cancel_timer("k"));
    assert!(!timers.cancel_timer("k"));
    assert!(!timers.has_timer("k"));
}

#[test]
fn clear_removes_everything() {
    let mut timers = TimerManager::new();
    let _ = timers.add_timer("a", 1.0, Ev::A);
    let _ = timers.add_timer("b", 1.0, Ev::B);
    timers.clear();
    timers.update(5.0, |_, ev| panic!("unexpected {ev:?}"));
}

#[test]
#[should_panic(expected = "time delta may not be negative")]
fn negative_step_panics() {
    let mut timers: TimerManager = TimerManager::new();
    timers.update(-0.5, |_, _| {});
}
