#![allow(clippy::unwrap_used)]

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_fits() {
    assert_eq!(truncate("Alice", 10), "Alice");
    assert_eq!(truncate("Alice", 5), "Alice");
}

#[test]
fn test_truncate_long_address() {
    assert_eq!(truncate("12 Rue des Lilas", 8), "12 Rue …");
}

#[test]
fn test_truncate_accents() {
    assert_eq!(truncate("Hélène Dupré", 7), "Hélène…");
}

#[test]
fn test_truncate_zero() {
    assert_eq!(truncate("Alice", 0), "");
}

// ── scrolling ─────────────────────────────────────────────────

#[test]
fn test_scroll_down_moves_window() {
    let (mut index, mut scroll) = (0, 0);
    for _ in 0..5 {
        scroll_down(&mut index, &mut scroll, 10, 3);
    }
    assert_eq!(index, 5);
    assert_eq!(scroll, 3);
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (2, 0);
    scroll_down(&mut index, &mut scroll, 3, 5);
    assert_eq!(index, 2);
}

#[test]
fn test_scroll_up_pulls_window() {
    let (mut index, mut scroll) = (3, 3);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (2, 2));
    let (mut index, mut scroll) = (0, 0);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_scroll_to_ends() {
    let (mut index, mut scroll) = (4, 2);
    scroll_to_bottom(&mut index, &mut scroll, 20, 5);
    assert_eq!((index, scroll), (19, 15));
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_clamp_scroll() {
    let mut scroll = 0;
    clamp_scroll(12, &mut scroll, 5);
    assert_eq!(scroll, 8);
    clamp_scroll(3, &mut scroll, 5);
    assert_eq!(scroll, 3);
    clamp_scroll(4, &mut scroll, 5);
    assert_eq!(scroll, 3);
}
