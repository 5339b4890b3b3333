// Native integration tests for `cosmos-folio`.
// Only the DOM-free state machines are exercised here so they run under
// `cargo test` on the host; browser behaviour lives in tests/web.rs.

use std::cell::RefCell;
use std::rc::Rc;

use cosmos_folio::config::{CosmosConfig, DownloadConfig, SiteConfig};
use cosmos_folio::cosmos::{Comet, CometSpawner, Orb, Scene, Tint, Viewport};
use cosmos_folio::download::{DownloadRequest, confirm_download};
use cosmos_folio::drawer::{CloseReason, DrawerMachine, DrawerState, TrapKey, wrap_target};
use cosmos_folio::random::Sequence;
use cosmos_folio::reveal::RevealSet;
use cosmos_folio::schedule::VirtualClock;
use cosmos_folio::typing::{Mode, TypingCycle, TypingTiming};

fn timing() -> TypingTiming {
    TypingTiming { type_delay_ms: 100.0, delete_delay_ms: 50.0, pause_ms: 1500.0 }
}

#[test]
fn typing_runs_on_virtual_time() {
    let cycle = Rc::new(RefCell::new(
        TypingCycle::new(vec!["ab".into(), "c".into()], timing()).unwrap(),
    ));
    let mut clock = VirtualClock::new();
    clock.spawn(Rc::clone(&cycle), 0.0);

    clock.advance(0.0);
    assert_eq!(cycle.borrow().text(), "a");
    clock.advance(100.0);
    assert_eq!(cycle.borrow().text(), "ab");
    assert_eq!(cycle.borrow().mode(), Mode::Deleting);

    // nothing is erased during the pause
    assert_eq!(clock.advance(1499.0), 0);
    assert_eq!(cycle.borrow().text(), "ab");

    clock.advance(1.0);
    assert_eq!(cycle.borrow().text(), "a");
    clock.advance(50.0);
    assert_eq!(cycle.borrow().text(), "");
    assert_eq!(cycle.borrow().index(), 1);

    clock.advance(50.0);
    assert_eq!(cycle.borrow().text(), "c");
}

#[test]
fn typing_wraps_to_first_phrase() {
    let mut cycle = TypingCycle::new(vec!["x".into(), "y".into()], timing()).unwrap();
    // type + delete each single-char phrase
    for _ in 0..4 {
        cycle.tick();
    }
    assert_eq!(cycle.index(), 0);
    assert_eq!(cycle.shown(), 0);
}

#[test]
fn drawer_open_close_round_trip() {
    let mut m = DrawerMachine::new();
    let initial = m.state().flags();
    m.toggle();
    assert_eq!(m.state(), DrawerState::Open);
    let open = m.state().flags();
    assert!(open.aria_expanded && open.overlay_visible && open.scroll_locked && open.key_trap_installed);
    m.close(CloseReason::Escape);
    assert_eq!(m.state().flags(), initial);
}

#[test]
fn forced_close_removes_key_trap() {
    let mut m = DrawerMachine::new();
    m.open();
    m.close(CloseReason::ViewportWidened);
    assert!(!m.state().flags().key_trap_installed);
}

#[test]
fn focus_trap_with_two_focusables() {
    let tab = TrapKey::from_key("Tab", false);
    let shift_tab = TrapKey::from_key("Tab", true);
    assert_eq!(tab, TrapKey::Tab { backwards: false });
    assert_eq!(shift_tab, TrapKey::Tab { backwards: true });
    assert_eq!(wrap_target(Some(1), 2, false), Some(0));
    assert_eq!(wrap_target(Some(0), 2, true), Some(1));
}

#[test]
fn reveal_is_monotonic() {
    let mut set = RevealSet::new(3, 0.3);
    for ratio in [0.0, 0.1, 0.2, 0.29] {
        set.observe(0, true, ratio);
    }
    assert!(!set.is_revealed(0));
    assert!(set.observe(0, true, 0.5));
    set.observe(0, false, 0.0);
    assert!(set.is_revealed(0));
    assert_eq!(set.remaining(), 2);
}

#[test]
fn comet_progress_is_monotonic_and_pruned_once_done() {
    let vp = Viewport::new(1000.0, 800.0, 1.0);
    let mut scene = Scene::new(vp, &CosmosConfig::default(), false, &mut Sequence::constant(0.5));
    scene.push_comet(Comet::from_path(
        (0.0, 0.0),
        (300.0, 100.0),
        (600.0, 500.0),
        (1000.0, 800.0),
        2500.0,
        2.0,
        Tint::Purple,
    ));

    let mut last = 0.0;
    for _ in 0..40 {
        scene.advance(16.0);
        let p = scene.comets()[0].progress();
        assert!(p >= last && p <= 1.0);
        last = p;
    }
    assert_eq!(scene.prune(), 0);

    scene.advance(5000.0);
    let comet = &scene.comets()[0];
    assert_eq!(comet.progress(), 1.0);
    assert_eq!(comet.position(), comet.end());
    assert_eq!(scene.prune(), 1);
    assert!(scene.comets().is_empty());
}

#[test]
fn comet_trail_is_bounded() {
    let mut c = Comet::from_path((0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), 10_000.0, 2.0, Tint::Cyan);
    for _ in 0..25 {
        c.update(16.0);
    }
    assert_eq!(c.trail().len(), cosmos_folio::cosmos::TRAIL_LEN);
}

#[test]
fn orb_wraps_to_opposite_edge() {
    let vp = Viewport::new(100.0, 100.0, 1.0);
    let mut right = Orb::with_motion(105.0, 50.0, 1.0, 0.0);
    right.update(16.0, &vp);
    assert!((right.x + 5.0).abs() < 1e-9);

    let mut top = Orb::with_motion(50.0, -5.0, 1.0, -std::f64::consts::FRAC_PI_2);
    top.update(16.0, &vp);
    assert!((top.y - 105.0).abs() < 1e-9);
}

#[test]
fn comet_spawner_schedule() {
    let vp = Viewport::new(800.0, 600.0, 1.0);
    let cfg = CosmosConfig::default();
    let scene = Rc::new(RefCell::new(Scene::new(vp, &cfg, false, &mut Sequence::constant(0.5))));
    let mut clock = VirtualClock::new();
    // 0.5 never rolls a double comet and waits 7 s between spawns
    clock.spawn(CometSpawner::new(Rc::clone(&scene), Sequence::constant(0.5), &cfg), cfg.first_comet_delay_ms);

    clock.advance(1499.0);
    assert!(scene.borrow().comets().is_empty());
    clock.advance(1.0);
    assert_eq!(scene.borrow().comets().len(), 1);
    clock.advance(6999.0);
    assert_eq!(scene.borrow().comets().len(), 1);
    clock.advance(1.0);
    assert_eq!(scene.borrow().comets().len(), 2);
}

#[test]
fn comet_spawner_can_double_up() {
    let vp = Viewport::new(800.0, 600.0, 1.0);
    let cfg = CosmosConfig::default();
    let scene = Rc::new(RefCell::new(Scene::new(vp, &cfg, false, &mut Sequence::constant(0.5))));
    let mut clock = VirtualClock::new();
    clock.spawn(CometSpawner::new(Rc::clone(&scene), Sequence::constant(0.1), &cfg), 0.0);
    clock.advance(0.0);
    assert_eq!(scene.borrow().comets().len(), 2);
    let next = clock.next_due_in().unwrap();
    assert!((next - 4600.0).abs() < 1e-6);
}

#[test]
fn reduced_motion_spawner_keeps_ticking_without_comets() {
    let vp = Viewport::new(800.0, 600.0, 1.0);
    let cfg = CosmosConfig::default();
    let scene = Rc::new(RefCell::new(Scene::new(vp, &cfg, true, &mut Sequence::constant(0.5))));
    let mut clock = VirtualClock::new();
    clock.spawn(CometSpawner::new(Rc::clone(&scene), Sequence::constant(0.1), &cfg), cfg.first_comet_delay_ms);

    let steps = clock.advance(60_000.0);
    assert!(steps > 5);
    assert!(scene.borrow().comets().is_empty());
    assert!(scene.borrow().blobs().is_empty());
    assert_eq!(scene.borrow().orbs().len(), cfg.reduced_orb_count);
}

#[test]
fn download_defaults_and_decline() {
    let cfg = DownloadConfig::default();
    let req = DownloadRequest::resolve(None, None, &cfg);
    assert_eq!(req.filename, "CV.pdf");
    assert!(confirm_download(&|_: &str| false, &cfg.confirm_message, req).is_none());
}

#[test]
fn partial_config_keeps_other_defaults() {
    let cfg = SiteConfig::from_json(r#"{ "cosmos": { "orb_count": 12 }, "to_top": { "threshold_px": 400 } }"#).unwrap();
    assert_eq!(cfg.cosmos.orb_count, 12);
    assert_eq!(cfg.cosmos.reduced_orb_count, 20);
    assert_eq!(cfg.to_top.threshold_px, 400.0);
    assert_eq!(cfg.drawer, SiteConfig::default().drawer);
}
