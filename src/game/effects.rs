//! Ability effect registry
//!
//! Maps an effect identifier to its behaviour. Each effect may touch only the
//! two played cards, the actor's and opponent's [`Vitals`], and the reveal
//! callback; it returns a description for the battle log.
//!
//! Arithmetic is checked. An effect that cannot compute a value fails with
//! [`DuelError::EffectFailure`]; callers apply effects to staged copies and
//! commit only on success, so a failed effect leaves no trace.

use crate::core::{Card, EffectId, EffectKind, Vitals};
use crate::{DuelError, Result};
use rand::{Rng, RngCore};

/// Everything an effect is allowed to read and write
pub struct EffectContext<'a> {
    pub acting_card: &'a mut Card,
    pub opposing_card: &'a mut Card,
    pub actor: &'a mut Vitals,
    pub opponent: &'a mut Vitals,
    /// Discloses the opponent's hand; timing is the caller's concern
    pub reveal: &'a mut dyn FnMut(),
}

/// Resolve an effect identifier. Pure; unknown identifiers resolve to `None`.
pub fn lookup(id: &EffectId) -> Option<EffectKind> {
    id.kind()
}

/// Run an effect against the given context
pub fn apply_effect(kind: EffectKind, ctx: &mut EffectContext<'_>, rng: &mut dyn RngCore) -> Result<String> {
    match kind {
        EffectKind::Burn => {
            damage(ctx, 2)?;
            Ok("Burn deals 2 damage!".to_string())
        }
        EffectKind::Freeze => {
            weaken(ctx.opposing_card, 2);
            Ok("Freeze reduces enemy card power by 2!".to_string())
        }
        EffectKind::Steal => {
            ctx.acting_card.power = ctx.opposing_card.power;
            Ok("Steal copies the enemy card's power!".to_string())
        }
        EffectKind::Shield => {
            ctx.actor.shield = true;
            Ok("Shield protects from damage this turn!".to_string())
        }
        EffectKind::RevealHand => {
            (ctx.reveal)();
            Ok("Reveal Hand exposes enemy cards!".to_string())
        }
        EffectKind::DiceRoll => {
            let roll = rng.gen_range(1..=6);
            let amount = match roll {
                1 | 2 => 3,
                3 | 4 => 1,
                _ => 5,
            };
            damage(ctx, amount)?;
            Ok(format!("Dice Roll landed on {roll} and dealt {amount} damage!"))
        }
        EffectKind::Shock => {
            ctx.opposing_card.power = 0;
            Ok("Shock completely nullifies the enemy card's power!".to_string())
        }
        EffectKind::Sturdy => {
            weaken(ctx.opposing_card, 2);
            Ok("Sturdy reduces enemy card power by 2!".to_string())
        }
        EffectKind::Gust => {
            weaken(ctx.opposing_card, 1);
            Ok("Gust reduces enemy card power by 1!".to_string())
        }
        EffectKind::Heal => {
            heal(ctx, 3)?;
            Ok("Heal restores 3 health points!".to_string())
        }
        EffectKind::Poison => {
            damage(ctx, 3)?;
            Ok("Poison deals 3 damage over time!".to_string())
        }
        EffectKind::Protect => {
            ctx.actor.shield = true;
            Ok("Protect creates a shield against damage!".to_string())
        }
        EffectKind::Spellcast => match rng.gen_range(0..3) {
            0 => {
                damage(ctx, 3)?;
                Ok("Spellcast: Fireball deals 3 damage!".to_string())
            }
            1 => {
                weaken(ctx.opposing_card, 2);
                Ok("Spellcast: Frost reduces enemy card power by 2!".to_string())
            }
            _ => {
                damage(ctx, 2)?;
                ctx.opposing_card.power = 0;
                Ok("Spellcast: Lightning deals 2 damage and negates enemy card power!".to_string())
            }
        },
        EffectKind::Summon => {
            let amount = rng.gen_range(1..=4);
            damage(ctx, amount)?;
            Ok(format!("Summon calls a creature that deals {amount} damage!"))
        }
        EffectKind::Foresight => {
            (ctx.reveal)();
            Ok("Foresight reveals the enemy's hand!".to_string())
        }
        EffectKind::Chaos => {
            std::mem::swap(&mut ctx.acting_card.power, &mut ctx.opposing_card.power);
            Ok("Chaos swaps the power of both cards!".to_string())
        }
        EffectKind::Ethereal => {
            ctx.actor.shield = true;
            Ok("Ethereal form lets attacks pass through!".to_string())
        }
        EffectKind::Crystallize => {
            heal(ctx, 1)?;
            ctx.actor.shield = true;
            Ok("Crystallize encases you in crystal and restores 1 health!".to_string())
        }
        EffectKind::Drain => {
            damage(ctx, 2)?;
            heal(ctx, 2)?;
            Ok("Drain steals 2 health from the enemy!".to_string())
        }
    }
}

fn damage(ctx: &mut EffectContext<'_>, amount: i32) -> Result<()> {
    ctx.opponent.hp = ctx
        .opponent
        .hp
        .checked_sub(amount)
        .ok_or_else(|| failure(ctx.acting_card, "damage overflowed opponent HP"))?;
    Ok(())
}

fn heal(ctx: &mut EffectContext<'_>, amount: i32) -> Result<()> {
    ctx.actor.hp = ctx
        .actor
        .hp
        .checked_add(amount)
        .ok_or_else(|| failure(ctx.acting_card, "healing overflowed actor HP"))?;
    Ok(())
}

/// Power never drops below zero
fn weaken(card: &mut Card, amount: i32) {
    card.power = card.power.saturating_sub(amount).max(0);
}

fn failure(card: &Card, reason: &str) -> DuelError {
    DuelError::EffectFailure {
        card: card.name.clone(),
        reason: reason.to_string(),
    }
}
