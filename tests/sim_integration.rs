//! End-to-end scenarios over the public simulation API.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use glam::DVec2;

use korovany::body::{Body, BodyPartId, PartStatus};
use korovany::combat::{resolve_attack, AttackRoll};
use korovany::config::AimWeights;
use korovany::entity::{
    DeathCause, Enemy, EnemyId, EnemyKind, EnemyState, Korovan, KorovanId, PlayerInput,
    PlayerSighting, KOROVAN_HP,
};
use korovany::geo::Geography;
use korovany::items::Inventory;
use korovany::rng::SimRng;
use korovany::sim::check_invariants;
use korovany::{ActionError, Autopilot, AutopilotMode, Faction, GameState, SimConfig, SimEvent};

fn session(faction: Faction, seed: u64) -> GameState {
    GameState::new(SimConfig::default(), faction, seed).unwrap()
}

#[test]
fn test_hostile_player_in_detect_range_starts_chase() {
    let mut rng = SimRng::from_seed_u64(1);
    let pos = DVec2::new(-150.0, -150.0);
    let mut enemy = Enemy::new(EnemyId(0), EnemyKind::ElfWarrior, pos, 0.0, &mut rng);
    assert_eq!(enemy.state(), EnemyState::Patrol);
    let tick = enemy.think(
        0.016,
        PlayerSighting {
            pos: pos + DVec2::new(10.0, 0.0),
            alive: true,
            hostile: true,
        },
        &mut rng,
    );
    assert!(tick.aggro);
    assert_eq!(enemy.state(), EnemyState::Chase);
}

#[test]
fn test_chasing_enemy_in_range_swings_once() {
    let mut rng = SimRng::from_seed_u64(2);
    let pos = DVec2::new(0.0, 0.0);
    let mut enemy = Enemy::new(EnemyId(0), EnemyKind::ElfWarrior, pos, 0.0, &mut rng);
    enemy.alert();
    let sighting = PlayerSighting {
        pos: DVec2::new(2.0, 0.0),
        alive: true,
        hostile: true,
    };
    let first = enemy.think(0.016, sighting, &mut rng);
    let damage = first.attack.unwrap();
    assert!((14..=20).contains(&damage));
    let second = enemy.think(0.016, sighting, &mut rng);
    assert!(second.attack.is_none());
}

#[test]
fn test_hp_pool_counts_vital_parts_only() {
    let mut body = Body::new();
    let _ = body.part_mut(BodyPartId::Torso).hit(50);
    for limb in [
        BodyPartId::RightArm,
        BodyPartId::LeftArm,
        BodyPartId::RightLeg,
        BodyPartId::LeftLeg,
    ] {
        let _ = body.part_mut(limb).hit(1_000);
        assert_eq!(body.part(limb).status(), PartStatus::Severed);
    }
    assert_eq!(body.total_hp(), 230);
    assert!(body.alive());
}

#[test]
fn test_severed_part_ignores_further_hits() {
    let mut body = Body::new();
    let _ = body.part_mut(BodyPartId::LeftEye).hit(30);
    assert_eq!(body.part(BodyPartId::LeftEye).status(), PartStatus::Severed);
    assert!(body.part_mut(BodyPartId::LeftEye).hit(10).is_empty());
    assert_eq!(body.part(BodyPartId::LeftEye).hp(), 0);
}

#[test]
fn test_caravan_breaks_on_third_blow_and_pays_once() {
    let road = Geography::standard().road;
    let mut rng = SimRng::from_seed_u64(3);
    let mut korovan = Korovan::new(KorovanId(0), &road, &mut rng);
    assert_eq!(korovan.hp(), KOROVAN_HP);
    let gold = korovan.gold();

    let hit = korovan.attack(60).unwrap();
    assert!(hit.loot.is_none());
    let hit = korovan.attack(60).unwrap();
    assert_eq!(hit.hp, 30);
    assert!(!korovan.is_looted());

    let hit = korovan.attack(60).unwrap();
    assert_eq!(hit.hp, 0);
    assert!(korovan.is_looted());
    let loot = hit.loot.unwrap();
    assert_eq!(loot.gold, gold);

    let mut inventory = Inventory::new(0, None);
    loot.grant(&mut inventory);
    assert_eq!(korovan.attack(60).unwrap_err(), ActionError::AlreadyLooted);
    assert_eq!(inventory.gold, gold);
    assert_eq!(korovan.gold(), 0);
}

#[test]
fn test_resolver_rates() {
    const TRIALS: u32 = 100_000;
    let aim = AimWeights::default();
    let mut rng = SimRng::from_seed_u64(4);

    let clumsy = AttackRoll {
        attacker_damage: 20,
        attacker_agility: 5,
        defender_armor: 0,
        defender_agility: 0,
    };
    let dodges = (0..TRIALS)
        .filter(|_| !resolve_attack(&mut rng, clumsy, &aim).hit)
        .count();
    assert_eq!(dodges, 0);

    let nimble = AttackRoll {
        defender_agility: 20,
        ..clumsy
    };
    let mut dodged = 0u32;
    let mut crits = 0u32;
    for _ in 0..TRIALS {
        let r = resolve_attack(&mut rng, nimble, &aim);
        if r.hit {
            crits += u32::from(r.crit);
        } else {
            dodged += 1;
        }
    }
    let dodge_rate = f64::from(dodged) / f64::from(TRIALS);
    let crit_rate = f64::from(crits) / f64::from(TRIALS - dodged);
    assert!((dodge_rate - 0.4).abs() < 0.01, "dodge rate {dodge_rate}");
    assert!((crit_rate - 0.1).abs() < 0.01, "crit rate {crit_rate}");
}

#[test]
fn test_same_seed_and_inputs_replay_exactly() {
    let run = || {
        let mut state = session(Faction::Villain, 77);
        let mut pilot = Autopilot::new(AutopilotMode::Raid);
        let mut events = Vec::new();
        for _ in 0..400 {
            let input = pilot.input(&state);
            events.extend(state.step(0.05, &input));
        }
        (state.views(), events)
    };
    let (views_a, events_a) = run();
    let (views_b, events_b) = run();
    assert_eq!(views_a, views_b);
    assert_eq!(events_a, events_b);
}

#[test]
fn test_invariants_hold_through_raid() {
    for faction in [Faction::Elves, Faction::Guards, Faction::Villain, Faction::Neutral] {
        let mut state = session(faction, 9);
        let mut pilot = Autopilot::new(AutopilotMode::Raid);
        for frame in 0..600 {
            let input = pilot.input(&state);
            state.step(0.05, &input);
            if frame % 50 == 0 {
                let violations = check_invariants(&state);
                assert!(violations.is_empty(), "{faction}: {violations:?}");
            }
        }
    }
}

#[test]
fn test_striking_a_guard_alerts_its_caravan() {
    let mut state = session(Faction::Guards, 12);
    let guard_id = state.korovans[0].guards[0];
    let guard_pos = state.enemy(guard_id).unwrap().pos;
    state.player.pos = guard_pos + DVec2::new(0.0, -1.0);
    let input = PlayerInput {
        heading: Some(0.0),
        attack: true,
        ..PlayerInput::default()
    };
    let events = state.step(0.016, &input);
    assert!(events
        .iter()
        .any(|e| matches!(e, SimEvent::KorovanAlerted { .. })));
    assert!(state.korovans.iter().any(Korovan::is_under_attack));
    assert!(state.player.attack_cooldown() > 0.0);
}

#[test]
fn test_bleeding_out_ends_the_session() {
    let mut state = session(Faction::Guards, 5);
    state.enemies.clear();
    state.korovans.clear();
    let _ = state.player.body.part_mut(BodyPartId::Torso).hit(190);
    assert!(state.player.body.part(BodyPartId::Torso).is_bleeding());

    let mut died = false;
    for _ in 0..200 {
        let events = state.step(0.1, &PlayerInput::default());
        died |= events
            .iter()
            .any(|e| matches!(e, SimEvent::PlayerDied { cause: DeathCause::BledOut }));
        if state.player.is_dead() {
            break;
        }
    }
    assert!(died);
    assert_eq!(state.player.death(), Some(DeathCause::BledOut));
    assert!(state.step(0.1, &PlayerInput::default()).is_empty());
}

#[test]
fn test_killing_an_enemy_grants_loot_and_counts() {
    let mut state = session(Faction::Villain, 8);
    let target = state
        .enemies
        .iter()
        .position(|e| e.kind() == EnemyKind::PalaceGuard)
        .unwrap();
    // Lone target with one HP left, right in front of the player.
    let pos = state.enemies[target].pos;
    let keep = state.enemies[target].clone();
    state.korovans.clear();
    state.enemies.retain(|e| e.id == keep.id);
    state.enemies[0].id = EnemyId(0);
    let _ = state.enemies[0].take_damage(keep.hp() - 1);
    state.player.pos = pos + DVec2::new(0.0, -1.0);

    let gold = state.player.inventory.gold;
    let input = PlayerInput {
        heading: Some(0.0),
        attack: true,
        ..PlayerInput::default()
    };
    let mut killed = false;
    for _ in 0..100 {
        let events = state.step(0.1, &input);
        killed |= events.iter().any(|e| matches!(e, SimEvent::EnemyKilled { .. }));
        if killed {
            break;
        }
        state.player.pos = state.enemies[0].pos + DVec2::new(0.0, -1.0);
    }
    assert!(killed);
    assert_eq!(state.player.kills, 1);
    assert_eq!(state.killstreak, 1);
    assert!(state.player.inventory.gold >= gold + 20);
    assert!(state.log.lines().any(|l| l.msg.contains("killed")));
}

#[test]
fn test_body_copies_are_independent() {
    let original = Body::new();
    let mut copy = original;
    let _ = copy.apply_bleed(5);
    assert_eq!(original, Body::new());
    assert_ne!(copy.total_hp(), original.total_hp());
}

#[test]
fn test_autopilot_copies_steer_alike() {
    let state = GameState::new(SimConfig::default(), Faction::Guards, 9).unwrap();
    let pilot = Autopilot::new(AutopilotMode::Wander);
    let (mut a, mut b) = (pilot, pilot);
    assert_eq!(a.input(&state), b.input(&state));
}
