//! Property-based tests for the terrain, collision, combat and body models.
//!
//! Run with: cargo test --release prop_world

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::sync::OnceLock;

use glam::DVec2;
use proptest::prelude::*;

use korovany::body::{Body, BodyPartId, PartStatus};
use korovany::collision::{resolve_against_buildings, BuildingBox};
use korovany::combat::{resolve_attack, AttackRoll};
use korovany::config::AimWeights;
use korovany::geo::Geography;
use korovany::rng::SimRng;
use korovany::terrain::HeightField;

fn field() -> &'static HeightField {
    static FIELD: OnceLock<HeightField> = OnceLock::new();
    FIELD.get_or_init(|| HeightField::new(Geography::standard()))
}

fn coord() -> impl Strategy<Value = f64> {
    -340.0f64..340.0
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Off the bridges the walkable height is the drawn height; on a deck it
    /// is that deck's constant.
    #[test]
    fn prop_gameplay_height_contract(x in coord(), y in coord()) {
        let f = field();
        let p = DVec2::new(x, y);
        match f.geography().bridge_at(p) {
            Some(b) => prop_assert!((f.gameplay(p) - f.deck_height(b.kind)).abs() < 1e-12),
            None => prop_assert!((f.gameplay(p) - f.visual(p)).abs() < 1e-12),
        }
    }

    /// Heights are always finite.
    #[test]
    fn prop_heights_finite(x in -1000.0f64..1000.0, y in -1000.0f64..1000.0) {
        let f = field();
        let p = DVec2::new(x, y);
        prop_assert!(f.visual(p).is_finite());
        prop_assert!(f.at(p).is_finite());
    }

    /// A single box never leaves the circle strictly inside its grown footprint.
    #[test]
    fn prop_resolve_leaves_box(
        cx in -50.0f64..50.0,
        cy in -50.0f64..50.0,
        hw in 0.5f64..20.0,
        hd in 0.5f64..20.0,
        px in -80.0f64..80.0,
        py in -80.0f64..80.0,
        r in 0.0f64..4.0,
    ) {
        let b = BuildingBox::new(cx, cy, hw, hd);
        let out = resolve_against_buildings(&[b], DVec2::new(px, py), r);
        prop_assert!(!b.contains_expanded(out, r));
    }

    /// Dodges deal nothing; hits deal between 1 and double damage plus jitter.
    #[test]
    fn prop_attack_bounds(
        damage in 0u32..500,
        att_agi in 0u32..40,
        armor in 0u32..100,
        def_agi in 0u32..40,
        seed in any::<u64>(),
    ) {
        let mut rng = SimRng::from_seed_u64(seed);
        let roll = AttackRoll {
            attacker_damage: damage,
            attacker_agility: att_agi,
            defender_armor: armor,
            defender_agility: def_agi,
        };
        let r = resolve_attack(&mut rng, roll, &AimWeights::default());
        if r.hit {
            prop_assert!(r.damage >= 1);
            prop_assert!(r.damage <= damage * 2 + 3);
            prop_assert!(r.target_part.is_some());
        } else {
            prop_assert_eq!(r.damage, 0);
            prop_assert!(r.target_part.is_none());
            prop_assert!(!r.crit);
        }
    }

    /// However a body is beaten, severed parts sit at 0 HP, vital parts are
    /// never severed, and the snapshot reproduces it exactly.
    #[test]
    fn prop_body_invariants(
        hits in prop::collection::vec((0usize..8, 0u32..250), 0..40),
    ) {
        let mut body = Body::new();
        for (part, dmg) in hits {
            let _ = body.part_mut(BodyPartId::ALL[part]).hit(dmg);
        }
        for part in body.parts() {
            if part.status() == PartStatus::Severed {
                prop_assert_eq!(part.hp(), 0);
                prop_assert!(!part.id().is_vital());
            }
        }
        prop_assert!(body.total_hp() <= body.max_total_hp());
        let alive = body.part(BodyPartId::Head).hp() > 0 && body.part(BodyPartId::Torso).hp() > 0;
        prop_assert_eq!(body.alive(), alive);
        let restored = Body::from_snapshot(&body.to_snapshot());
        prop_assert_eq!(restored.parts(), body.parts());
    }
}
