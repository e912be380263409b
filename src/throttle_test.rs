use super::*;

#[test]
fn first_event_is_always_admitted() {
    let mut gate = ThrottleGate::new();
    assert!(gate.admit(Instant::now()));
}

#[test]
fn event_inside_window_is_rejected() {
    let mut gate = ThrottleGate::new();
    let t0 = Instant::now();
    assert!(gate.admit(t0));
    assert!(!gate.admit(t0 + Duration::from_millis(10)));
}

#[test]
fn event_after_window_is_admitted() {
    let mut gate = ThrottleGate::new();
    let t0 = Instant::now();
    assert!(gate.admit(t0));
    assert!(gate.admit(t0 + Duration::from_millis(60)));
}

#[test]
fn event_exactly_at_window_edge_is_admitted() {
    let mut gate = ThrottleGate::new();
    let t0 = Instant::now();
    assert!(gate.admit(t0));
    assert!(gate.admit(t0 + Duration::from_millis(THROTTLE_WINDOW_MS)));
}

#[test]
fn rejection_does_not_advance_the_gate() {
    let mut gate = ThrottleGate::new();
    let t0 = Instant::now();
    assert!(gate.admit(t0));
    assert!(!gate.admit(t0 + Duration::from_millis(30)));
    assert_eq!(gate.last_accepted_at(), Some(t0));
    // 55ms after the accepted event, even though only 25ms after the rejected one.
    assert!(gate.admit(t0 + Duration::from_millis(55)));
}

#[test]
fn gates_are_independent() {
    let mut a = ThrottleGate::new();
    let mut b = ThrottleGate::new();
    let t0 = Instant::now();
    assert!(a.admit(t0));
    assert!(b.admit(t0 + Duration::from_millis(5)));
    assert!(!a.admit(t0 + Duration::from_millis(10)));
}

#[test]
fn custom_window_is_honoured() {
    let mut gate = ThrottleGate::with_window(Duration::from_millis(200));
    let t0 = Instant::now();
    assert!(gate.admit(t0));
    assert!(!gate.admit(t0 + Duration::from_millis(150)));
    assert!(gate.admit(t0 + Duration::from_millis(200)));
    assert_eq!(gate.window(), Duration::from_millis(200));
}

#[test]
fn earlier_clock_reading_is_rejected() {
    let t0 = Instant::now();
    let mut gate = ThrottleGate::new();
    assert!(gate.admit(t0 + Duration::from_millis(100)));
    assert!(!gate.admit(t0));
}
