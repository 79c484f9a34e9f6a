//! Meta-progression: credits, event unlocks and garage upgrades.
//!
//! The race core never calls into this module.  The host picks a race with
//! [`Career::start_event`], runs it, and feeds the resulting
//! [`RaceComplete`] back through [`Career::apply_result`].

use crate::catalog::{GameCatalog, UpgradeSlot, VehicleUpgrade};
use crate::error::RaceResult;
use crate::session::{RaceComplete, RaceContext};
use crate::track::TrackDescriptor;
use crate::vehicle::VehicleProfile;
use bevy::prelude::*;

/// Starting balance for a new career.
pub const STARTING_CREDITS: u32 = 2000;

/// Result of a garage purchase attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Purchased { level: u32, cost: u32 },
    MaxLevel,
    InsufficientCredits { cost: u32 },
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Career {
    pub credits: u32,
    /// Campaign index of the selected event, normalised into the campaign.
    pub current_event_order: i64,
    /// How many campaign events can be entered.
    pub events_unlocked: usize,
    pub vehicle_id: String,
    pub upgrades: Vec<VehicleUpgrade>,
    pub profile: VehicleProfile,
}

impl Career {
    /// Fresh career in the catalog's default car.
    pub fn new(catalog: &GameCatalog) -> RaceResult<Self> {
        let car = catalog.default_car()?;
        Ok(Self {
            credits: STARTING_CREDITS,
            current_event_order: 0,
            events_unlocked: 1,
            vehicle_id: car.id.clone(),
            upgrades: Vec::new(),
            profile: VehicleProfile::build(catalog, car, &[]),
        })
    }

    /// Build the race context for campaign `order` without selecting it.
    pub fn select_race(&self, catalog: &GameCatalog, order: i64) -> RaceResult<RaceContext> {
        let event = catalog.event_by_order(order)?;
        let track = match catalog.track(&event.track_id) {
            Some(entry) => entry.descriptor(),
            None => {
                warn!(
                    "[career] Event '{}' names unknown track '{}'",
                    event.id, event.track_id
                );
                TrackDescriptor {
                    id: Some(event.track_id.clone()),
                    ..Default::default()
                }
            }
        };
        Ok(RaceContext {
            event_id: Some(event.id.clone()),
            track,
            vehicle: self.profile.clone(),
        })
    }

    /// Select campaign `order` and return its race context.
    pub fn start_event(&mut self, catalog: &GameCatalog, order: i64) -> RaceResult<RaceContext> {
        let context = self.select_race(catalog, order)?;
        let len = catalog.campaign_length().max(1) as i64;
        self.current_event_order = order.rem_euclid(len);
        info!(
            "[career] Starting event {} ({:?})",
            self.current_event_order, context.event_id
        );
        Ok(context)
    }

    /// The event after the current one, wrapping at the end of the campaign.
    pub fn start_next_event(&mut self, catalog: &GameCatalog) -> RaceResult<RaceContext> {
        self.start_event(catalog, self.current_event_order + 1)
    }

    /// Pay out the current event for finishing at `position` and unlock the
    /// next one.  Returns the credits awarded.
    pub fn complete_event(&mut self, catalog: &GameCatalog, position: u32) -> RaceResult<u32> {
        let event = catalog.event_by_order(self.current_event_order)?;
        let reward = event.rewards.payout(position);
        self.credits = self.credits.saturating_add(reward);

        let order = self.current_event_order.max(0) as usize;
        self.events_unlocked = self
            .events_unlocked
            .max(order + 2)
            .min(catalog.campaign_length());
        info!(
            "[career] '{}' P{} → +{} credits ({} total, {} events unlocked)",
            event.id, position, reward, self.credits, self.events_unlocked
        );
        Ok(reward)
    }

    /// Apply a finished race.  Races without an event id (free runs) pay
    /// nothing.
    pub fn apply_result(
        &mut self,
        catalog: &GameCatalog,
        result: &RaceComplete,
    ) -> RaceResult<u32> {
        if result.event_id.is_none() {
            return Ok(0);
        }
        self.complete_event(catalog, result.position)
    }

    pub fn upgrade_level(&self, slot: UpgradeSlot) -> u32 {
        self.upgrades
            .iter()
            .find(|u| u.slot == slot)
            .map_or(0, |u| u.level)
    }

    /// Buy the next level of `slot` if affordable, then rebuild the profile.
    pub fn purchase_upgrade(
        &mut self,
        catalog: &GameCatalog,
        slot: UpgradeSlot,
    ) -> RaceResult<PurchaseOutcome> {
        let definition = catalog.upgrade(slot).inspect_err(|e| {
            debug_assert!(false, "{e}");
        })?;
        let current = self.upgrade_level(slot);
        if current >= definition.max_level {
            return Ok(PurchaseOutcome::MaxLevel);
        }
        let cost = definition.cost(current);
        if self.credits < cost {
            return Ok(PurchaseOutcome::InsufficientCredits { cost });
        }

        match self.upgrades.iter_mut().find(|u| u.slot == slot) {
            Some(owned) => owned.level += 1,
            None => self.upgrades.push(VehicleUpgrade { slot, level: 1 }),
        }
        self.credits -= cost;

        let base = match catalog.car(&self.vehicle_id) {
            Ok(car) => car,
            Err(_) => catalog.default_car()?,
        };
        self.profile = VehicleProfile::build(catalog, base, &self.upgrades);
        info!("[career] Bought {} level {} for {}", slot, current + 1, cost);
        Ok(PurchaseOutcome::Purchased {
            level: current + 1,
            cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn career() -> (GameCatalog, Career) {
        let catalog = GameCatalog::default();
        let career = Career::new(&catalog).unwrap();
        (catalog, career)
    }

    #[test]
    fn new_career_starts_with_credits_and_first_event() {
        let (_, career) = career();
        assert_eq!(career.credits, 2000);
        assert_eq!(career.events_unlocked, 1);
        assert_eq!(career.vehicle_id, "vx-orion");
    }

    #[test]
    fn select_race_uses_catalog_track() {
        let (catalog, career) = career();
        let context = career.select_race(&catalog, 0).unwrap();
        let event = &catalog.events[0];
        assert_eq!(context.event_id.as_deref(), Some(event.id.as_str()));
        assert_eq!(context.track.id.as_deref(), Some(event.track_id.as_str()));
        assert!(context.track.laps.is_some());
        assert_eq!(context.vehicle, career.profile);
    }

    #[test]
    fn event_order_wraps() {
        let (catalog, mut career) = career();
        let len = catalog.campaign_length() as i64;
        career.start_event(&catalog, len + 1).unwrap();
        assert_eq!(career.current_event_order, 1);
        career.start_event(&catalog, -1).unwrap();
        assert_eq!(career.current_event_order, len - 1);
        career.start_next_event(&catalog).unwrap();
        assert_eq!(career.current_event_order, 0);
    }

    #[test]
    fn completing_pays_and_unlocks_the_next_event() {
        let (catalog, mut career) = career();
        career.start_event(&catalog, 0).unwrap();
        let expected = catalog.events[0].rewards.payout(1);
        let paid = career.complete_event(&catalog, 1).unwrap();
        assert_eq!(paid, expected);
        assert_eq!(career.credits, 2000 + expected);
        assert_eq!(career.events_unlocked, 2);
    }

    #[test]
    fn unlocks_are_capped_at_campaign_length() {
        let (catalog, mut career) = career();
        let last = catalog.campaign_length() as i64 - 1;
        career.start_event(&catalog, last).unwrap();
        career.complete_event(&catalog, 20).unwrap();
        assert_eq!(career.events_unlocked, catalog.campaign_length());
    }

    #[test]
    fn free_runs_pay_nothing() {
        let (catalog, mut career) = career();
        let result = RaceComplete {
            event_id: None,
            position: 1,
            best_lap: None,
            total_time: 10.0,
        };
        assert_eq!(career.apply_result(&catalog, &result).unwrap(), 0);
        assert_eq!(career.credits, 2000);
    }

    #[test]
    fn purchase_spends_credits_and_rebuilds_profile() {
        let (catalog, mut career) = career();
        let before = career.profile.top_speed;
        let cost = catalog.upgrade(UpgradeSlot::Engine).unwrap().cost(0);
        let outcome = career.purchase_upgrade(&catalog, UpgradeSlot::Engine).unwrap();
        assert_eq!(outcome, PurchaseOutcome::Purchased { level: 1, cost });
        assert_eq!(career.credits, 2000 - cost);
        assert_eq!(career.upgrade_level(UpgradeSlot::Engine), 1);
        assert!(career.profile.top_speed > before);
    }

    #[test]
    fn purchase_refuses_when_broke_or_maxed() {
        let (catalog, mut career) = career();
        career.credits = 0;
        let outcome = career.purchase_upgrade(&catalog, UpgradeSlot::Aero).unwrap();
        assert!(matches!(outcome, PurchaseOutcome::InsufficientCredits { .. }));
        assert!(career.upgrades.is_empty());

        career.credits = u32::MAX / 2;
        let max = catalog.upgrade(UpgradeSlot::Aero).unwrap().max_level;
        for _ in 0..max {
            career.purchase_upgrade(&catalog, UpgradeSlot::Aero).unwrap();
        }
        assert_eq!(
            career.purchase_upgrade(&catalog, UpgradeSlot::Aero).unwrap(),
            PurchaseOutcome::MaxLevel
        );
        assert_eq!(career.upgrade_level(UpgradeSlot::Aero), max);
    }
}
