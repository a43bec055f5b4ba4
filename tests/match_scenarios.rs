//! End-to-end match scenarios driven through the public frame API

use space_duel::app::SimContext;
use space_duel::game::geometry::Rect;
use space_duel::game::{GameMatch, Intent, MatchPhase, MatchSetup, PlayerSlot, TickOutcome, Winner};
use uuid::Uuid;

const FRAME_MS: u64 = 16;

fn setup(class_a: &str, class_b: &str, map: Option<&str>) -> MatchSetup {
    MatchSetup {
        players: [
            PlayerSlot::new(Uuid::new_v4(), "Ada", class_a),
            PlayerSlot::new(Uuid::new_v4(), "Linus", class_b),
        ],
        map: map.map(str::to_string),
    }
}

fn start(ctx: &SimContext, class_a: &str, class_b: &str, map: Option<&str>) -> GameMatch {
    GameMatch::new(ctx, setup(class_a, class_b, map), 0).unwrap()
}

/// Put seat 1 right in front of seat 0's cannon, and seat 0 in front of seat 1's
fn face_to_face(game: &mut GameMatch) {
    let (x0, y0) = (game.combatant(0).x, game.combatant(0).y);
    let target = game.combatant_mut(1);
    target.x = x0 + 40.0;
    target.y = y0 - 4.0;
}

fn press(fire: [bool; 2], shield: [bool; 2]) -> [Intent; 2] {
    [0usize, 1].map(|seat| Intent {
        fire: fire[seat],
        shield: shield[seat],
        ..Intent::default()
    })
}

fn idle() -> [Intent; 2] {
    [Intent::default(); 2]
}

fn fire_0() -> [Intent; 2] {
    press([true, false], [false, false])
}

#[test]
fn lethal_damage_ends_match_with_kill_win() {
    let ctx = SimContext::default();
    let mut game = start(&ctx, "ASSAULT", "ASSAULT", None);
    face_to_face(&mut game);

    let mut outcome = TickOutcome::Running;
    for volley in 0..10 {
        assert_eq!(outcome, TickOutcome::Running, "ended early at volley {volley}");
        outcome = game.tick(fire_0(), FRAME_MS + volley * 250);
    }

    assert_eq!(outcome, TickOutcome::Ended { winner: Winner::Player(0) });
    assert_eq!(game.combatant(1).health(), 0.0);
    assert!(game.remaining_ms() > 0);
    assert_eq!(game.total_damage_dealt(0), 100.0);
    assert_eq!(game.score(0), 10_000);
    assert_eq!(game.score(1), 0);
}

#[test]
fn equal_health_at_time_expiry_is_a_draw() {
    let ctx = SimContext::default();
    let mut game = start(&ctx, "ASSAULT", "ASSAULT", None);
    face_to_face(&mut game);

    for volley in 0..5 {
        let outcome = game.tick(press([true, true], [false, false]), FRAME_MS + volley * 250);
        assert_eq!(outcome, TickOutcome::Running);
    }
    assert_eq!(game.combatant(0).health(), 50.0);
    assert_eq!(game.combatant(1).health(), 50.0);

    assert_eq!(game.tick(idle(), 180_000), TickOutcome::Ended { winner: Winner::Draw });
    assert_eq!(game.remaining_ms(), 0);

    let record = match game.tick(idle(), 183_000) {
        TickOutcome::ReturnToLobby(record) => record,
        other => panic!("expected a record, got {other:?}"),
    };
    assert_eq!(record.winner_id, None);
    // 2500 for damage dealt + 2500 for survival, no victory bonus
    assert_eq!((record.player1_score, record.player2_score), (5_000, 5_000));
    assert_eq!(record.duration_ms, 180_000);
}

#[test]
fn shield_absorbs_hits_only_while_up() {
    let ctx = SimContext::default();
    let mut game = start(&ctx, "ASSAULT", "ASSAULT", None);
    face_to_face(&mut game);

    game.tick(press([false, false], [false, true]), 0);
    assert!(game.combatant(1).shield_active());

    game.tick(fire_0(), 1_000);
    assert_eq!(game.last_hits().len(), 1);
    assert_eq!(game.combatant(1).health(), 100.0);
    // Negated hits still count toward the shooter's damage
    assert_eq!(game.total_damage_dealt(0), 10.0);

    game.tick(fire_0(), 2_500);
    assert!(!game.combatant(1).shield_active());
    assert_eq!(game.last_hits().len(), 1);
    assert_eq!(game.combatant(1).health(), 90.0);
    assert_eq!(game.total_damage_dealt(0), 20.0);
}

#[test]
fn combo_grows_inside_window_and_resets_after() {
    let mut ctx = SimContext::default();
    ctx.classes
        .merge_json(
            r#"[{"id": "BREACHER", "name": "Breacher", "health": 100, "damage": 40,
                 "bullet_speed": 7, "move_speed": 5, "size": 32, "color": [200, 120, 40]}]"#,
        )
        .unwrap();
    let mut game = start(&ctx, "BREACHER", "TANK", None);
    face_to_face(&mut game);

    game.tick(fire_0(), FRAME_MS);
    assert_eq!(game.combatant(1).health(), 110.0);
    assert_eq!(game.combo(0), 1.0);

    game.tick(fire_0(), FRAME_MS + 1_500);
    assert_eq!(game.combatant(1).health(), 70.0);
    assert!((game.combo(0) - 1.1).abs() < 1e-6);

    game.tick(fire_0(), FRAME_MS + 4_500);
    assert_eq!(game.combatant(1).health(), 30.0);
    assert_eq!(game.combo(0), 1.0);
    assert_eq!(game.damage_by_class(0).get("TANK"), Some(&120.0));
}

#[test]
fn wall_removes_projectile_on_first_overlap() {
    let ctx = SimContext::default();
    let mut game = start(&ctx, "ASSAULT", "ASSAULT", Some("CLASSIC"));
    let wall = Rect::new(384.0, 120.0, 32.0, 360.0);
    assert!(game
        .obstacles()
        .unwrap()
        .obstacles()
        .iter()
        .any(|o| o.bounds() == wall));

    game.tick(fire_0(), FRAME_MS);
    let mut frames = 1;
    while let Some(projectile) = game.combatant(0).projectiles().first() {
        assert!(!projectile.hitbox().intersects(&wall));
        assert!(frames < 100, "projectile never reached the wall");
        frames += 1;
        game.tick(idle(), frames * FRAME_MS);
    }

    // 7 px per frame from x = 201.6: the hitbox first crosses x = 384 on frame 26
    assert_eq!(frames, 26);
    assert_eq!(game.combatant(1).health(), 100.0);
    assert_eq!(game.phase(), MatchPhase::Running);
}

#[test]
fn second_shot_inside_cooldown_is_refused() {
    let ctx = SimContext::default();
    let mut game = start(&ctx, "ASSAULT", "ASSAULT", None);

    game.tick(fire_0(), 100);
    game.tick(fire_0(), 349);
    assert_eq!(game.combatant(0).projectiles().len(), 1);

    game.tick(fire_0(), 350);
    assert_eq!(game.combatant(0).projectiles().len(), 2);
}

#[test]
fn open_arena_keeps_ships_inside() {
    let ctx = SimContext::default();
    let mut game = start(&ctx, "SCOUT", "SCOUT", None);
    let push = [Intent::movement(-1.0, -1.0), Intent::movement(1.0, 1.0)];

    for frame in 1..200 {
        game.tick(push, frame * FRAME_MS);
    }

    let arena = game.arena().bounds();
    for seat in 0..2 {
        let hull = game.combatant(seat).hull();
        assert!(hull.x >= arena.x && hull.y >= arena.y);
        assert!(hull.right() <= arena.right() && hull.bottom() <= arena.bottom());
    }
    // A step that would leave the arena is refused, so the ship stops short of the corner
    let corner = game.combatant(0);
    assert!(corner.x < 7.0 && corner.y < 7.0);
}

#[test]
fn final_scores_are_frozen_and_record_is_emitted_once() {
    let ctx = SimContext::default();
    let mut game = start(&ctx, "ASSAULT", "TANK", Some("ARENA"));
    game.combatant_mut(1).take_damage(150.0);

    assert!(matches!(game.tick(idle(), 5_000), TickOutcome::Ended { .. }));
    let record = match game.tick(idle(), 8_000) {
        TickOutcome::ReturnToLobby(record) => record,
        other => panic!("expected a record, got {other:?}"),
    };
    assert_eq!(record.winner_id, Some(game.players()[0].id));
    assert_eq!(game.final_scores(), Some([record.player1_score, record.player2_score]));

    let before = (game.score(0), game.score(1));
    for frame in 0..10 {
        assert_eq!(game.tick(fire_0(), 9_000 + frame * FRAME_MS), TickOutcome::Closed);
    }
    assert_eq!((game.score(0), game.score(1)), before);
    assert!(game.combatant(0).projectiles().is_empty());
}

#[test]
fn health_never_leaves_its_range() {
    let ctx = SimContext::default();
    let mut game = start(&ctx, "SNIPER", "SCOUT", None);
    face_to_face(&mut game);

    for frame in 0..400u64 {
        let intents = press([true, true], [frame % 97 == 0, frame % 131 == 0]);
        game.tick(intents, frame * FRAME_MS);
        for seat in 0..2 {
            let c = game.combatant(seat);
            assert!((0.0..=c.max_health()).contains(&c.health()));
        }
    }
    assert!(game.is_over());
}
