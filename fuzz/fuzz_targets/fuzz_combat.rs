#![no_main]

//! Combat and body fuzzer.
//!
//! Resolves arbitrary attacks and lands them on a body, checking the
//! resolver bounds and the per-part invariants after every hit.

use arbitrary::Arbitrary;
use korovany::body::{Body, BodyPartId, PartStatus};
use korovany::combat::{resolve_attack, AttackRoll};
use korovany::config::AimWeights;
use korovany::items::ItemId;
use korovany::rng::SimRng;
use libfuzzer_sys::fuzz_target;

/// One attack to resolve and apply.
#[derive(Arbitrary, Debug)]
struct Blow {
    damage: u16,
    attacker_agility: u8,
    defender_armor: u8,
    defender_agility: u8,
    /// Aim at a specific part instead of the resolver's pick.
    forced_part: Option<u8>,
}

/// Structured input for combat fuzzing.
#[derive(Arbitrary, Debug)]
struct CombatInput {
    seed: u64,
    blows: Vec<Blow>,
    /// Prosthetics to try fitting between blows.
    prosthetics: Vec<bool>,
    treatment: u8,
}

fuzz_target!(|input: CombatInput| {
    let mut rng = SimRng::from_seed_u64(input.seed);
    let mut body = Body::new();
    let aim = AimWeights::default();

    for (i, blow) in input.blows.iter().take(64).enumerate() {
        let roll = AttackRoll {
            attacker_damage: u32::from(blow.damage),
            attacker_agility: u32::from(blow.attacker_agility),
            defender_armor: u32::from(blow.defender_armor),
            defender_agility: u32::from(blow.defender_agility),
        };
        let result = resolve_attack(&mut rng, roll, &aim);
        if !result.hit {
            assert_eq!(result.damage, 0);
            continue;
        }
        assert!(result.damage >= 1);

        let target = blow
            .forced_part
            .map(|p| BodyPartId::ALL[usize::from(p) % BodyPartId::ALL.len()])
            .or(result.target_part);
        let _ = body.take_hit(result.damage, target, &mut rng);

        if input.prosthetics.get(i).copied().unwrap_or(false) {
            let _ = body.fit_prosthetic(ItemId::IronArm);
            let _ = body.fit_prosthetic(ItemId::WoodenLeg);
        }
        let bleed = body.bleed_tick();
        let _ = body.apply_bleed(bleed);
        body.apply_treatment(u32::from(input.treatment));

        for part in body.parts() {
            assert!(part.hp() <= part.max_hp());
            if part.status() == PartStatus::Severed {
                assert_eq!(part.hp(), 0);
                assert!(!part.id().is_vital());
            }
            if part.status() == PartStatus::Prosthetic {
                assert!(part.prosthetic().is_some());
            }
        }
    }

    let restored = Body::from_snapshot(&body.to_snapshot());
    assert_eq!(restored.parts(), body.parts());
});
