//! Bias correction for slot ordering.
//!
//! The source lists every bout's winner in slot 1, so an unshuffled dataset
//! teaches any consumer "slot 1 wins" instead of anything about the fight.
//! Each record independently flips a fair coin: tails swaps the two
//! fighters' fields wholesale and labels the record 0, heads keeps the row
//! and labels it 1. Either way the slot named by the label holds the
//! original winner.

use rand::Rng;

use crate::db::FightRow;
use crate::extract::RawFight;

/// Apply the randomized relabeling to one extracted fight.
///
/// The random source is injected so tests can force both branches; callers
/// in production pass `rand::thread_rng()`, which needs no synchronization.
pub fn label_fight(rng: &mut impl Rng, fight: RawFight) -> FightRow {
    let (slot_1, slot_2, winner_label) = if rng.gen_bool(0.5) {
        (fight.fighter_1, fight.fighter_2, 1)
    } else {
        (fight.fighter_2, fight.fighter_1, 0)
    };

    FightRow {
        fighter_1: slot_1.name,
        fighter_1_kd: slot_1.knockdowns,
        fighter_1_str: slot_1.strikes,
        fighter_1_td: slot_1.takedowns,
        fighter_1_sub: slot_1.submissions,
        fighter_2: slot_2.name,
        fighter_2_kd: slot_2.knockdowns,
        fighter_2_str: slot_2.strikes,
        fighter_2_td: slot_2.takedowns,
        fighter_2_sub: slot_2.submissions,
        weight_class: fight.weight_class,
        method: fight.method,
        round: fight.round,
        time_seconds: fight.time_seconds,
        winner_label,
        event_name: fight.event_name,
    }
}

// ── Tests ──
