//! Unit tests for pd-lifecycle.

use pd_core::{DispatchConfig, ParcelKey, Priority, ScriptedRng, Tick, ValidationError};

use crate::{
    LifecycleError, Parcel, ParcelStatus, ParcelStore, Transition, WeightCategory, advance,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const MISS: u32 = u32::MAX;
const HIT: u32 = 0;

fn parcel(id: &str, weight: f64, priority: Priority) -> Parcel {
    Parcel::new(id, "Karachi", weight, priority, "C", Tick(0)).unwrap()
}

/// A parcel dispatched to "Ali" at T0 with arrival at T20.
fn dispatched() -> Parcel {
    let mut p = parcel("P1", 10.0, Priority::Low);
    p.apply(Transition::Promote, Tick(0)).unwrap();
    p.apply(Transition::Dispatch { agent: "Ali".into(), arrival: Tick(20) }, Tick(0)).unwrap();
    p
}

/// Drive `p` from Loading to its first DeliveryAttempt (no signal loss).
fn to_delivery_attempt(p: &mut Parcel, cfg: &DispatchConfig) -> Tick {
    let mut rng = ScriptedRng::constant(MISS);
    advance(p, Tick(5), cfg, &mut rng).unwrap();
    assert_eq!(p.status(), ParcelStatus::InTransit);
    advance(p, Tick(20), cfg, &mut rng).unwrap();
    assert_eq!(p.status(), ParcelStatus::DeliveryAttempt);
    Tick(20)
}

// ── Parcel creation ───────────────────────────────────────────────────────────

#[cfg(test)]
mod creation {
    use super::*;

    #[test]
    fn derived_fields() {
        let p = parcel("P1", 12.7, Priority::Medium);
        assert_eq!(p.priority_score(), 2_012);
        assert_eq!(p.weight_category(), WeightCategory::Medium);
        assert_eq!(p.status(), ParcelStatus::PickupQueue);
        assert_eq!(p.assigned_agent(), None);
        assert_eq!(p.delivery_attempts(), 0);
        assert_eq!(p.history().len(), 1);
        assert_eq!(p.history()[0].description, "Pickup Request Created");
    }

    #[test]
    fn weight_category_boundaries() {
        assert_eq!(WeightCategory::of(4.99), WeightCategory::Light);
        assert_eq!(WeightCategory::of(5.0), WeightCategory::Medium);
        assert_eq!(WeightCategory::of(19.99), WeightCategory::Medium);
        assert_eq!(WeightCategory::of(20.0), WeightCategory::Heavy);
    }

    #[test]
    fn rejects_bad_weight() {
        for w in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Parcel::new("P", "X", w, Priority::Low, "A", Tick(0)),
                Err(ValidationError::Weight(_))
            ));
        }
    }

    #[test]
    fn rejects_empty_id() {
        assert_eq!(
            Parcel::new("  ", "X", 1.0, Priority::Low, "A", Tick(0)).unwrap_err(),
            ValidationError::EmptyId
        );
    }

    #[test]
    fn score_orders_priority_before_weight() {
        assert!(Parcel::score(Priority::Medium, 0.5) > Parcel::score(Priority::Low, 999.0));
        assert_eq!(Parcel::score(Priority::Urgent, 7.9), 3_007);
    }
}

// ── Transitions ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod transitions {
    use super::*;

    #[test]
    fn every_change_appends_one_event() {
        let mut p = parcel("P1", 3.0, Priority::Low);
        let before = p.history().len();
        let change = p.apply(Transition::Promote, Tick(4)).unwrap();
        assert_eq!((change.from, change.to), (ParcelStatus::PickupQueue, ParcelStatus::Warehouse));
        assert_eq!(p.history().len(), before + 1);
        let last = p.history().last().unwrap();
        assert_eq!(last.description, "Arrived at Warehouse");
        assert_eq!(last.at, Tick(4));
        assert_eq!(p.last_update(), Tick(4));
    }

    #[test]
    fn rejected_transition_leaves_parcel_untouched() {
        let mut p = parcel("P1", 3.0, Priority::Low);
        let snapshot = p.clone();
        let err = p.apply(Transition::Depart, Tick(1)).unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidTransition { from: ParcelStatus::PickupQueue, .. }));
        assert_eq!(p, snapshot);
    }

    #[test]
    fn dispatch_sets_assignment_and_window() {
        let p = dispatched();
        assert_eq!(p.status(), ParcelStatus::Loading);
        assert_eq!(p.assigned_agent(), Some("Ali"));
        assert_eq!(p.dispatch_time(), Some(Tick(0)));
        assert_eq!(p.arrival_time(), Some(Tick(20)));
        assert_eq!(p.history().last().unwrap().description, "Loaded onto Ali's Vehicle");
    }

    #[test]
    fn cancel_only_before_dispatch() {
        let mut waiting = parcel("P1", 1.0, Priority::Low);
        waiting.apply(Transition::Promote, Tick(0)).unwrap();
        waiting.apply(Transition::Cancel, Tick(1)).unwrap();
        assert_eq!(waiting.status(), ParcelStatus::Cancelled);
        assert_eq!(waiting.history().last().unwrap().description, "Cancelled by User");

        let mut loading = dispatched();
        assert!(loading.apply(Transition::Cancel, Tick(1)).is_err());
        assert_eq!(loading.status(), ParcelStatus::Loading);
    }

    #[test]
    fn report_missing_releases_agent() {
        let mut p = dispatched();
        let change = p
            .apply(Transition::ReportMissing { reason: "Theft".into() }, Tick(3))
            .unwrap();
        assert_eq!(change.released_agent.as_deref(), Some("Ali"));
        assert_eq!(p.assigned_agent(), None);
        assert_eq!(p.status(), ParcelStatus::UnderInvestigation);
        assert_eq!(p.history().last().unwrap().description, "Reported Missing: Theft");
    }

    #[test]
    fn revert_dispatch_clears_window() {
        let mut p = dispatched();
        let change = p.apply(Transition::RevertDispatch, Tick(2)).unwrap();
        assert_eq!(change.released_agent.as_deref(), Some("Ali"));
        assert_eq!(p.status(), ParcelStatus::Warehouse);
        assert_eq!(p.arrival_time(), None);
        assert_eq!(p.dispatch_time(), None);
        assert_eq!(p.history().last().unwrap().description, "Undo: Dispatch Reverted");
    }

    #[test]
    fn revert_create_always_cancels() {
        for status_path in [vec![], vec![Transition::Promote]] {
            let mut p = parcel("P1", 1.0, Priority::Low);
            for t in status_path {
                p.apply(t, Tick(0)).unwrap();
            }
            p.apply(Transition::RevertCreate, Tick(1)).unwrap();
            assert_eq!(p.status(), ParcelStatus::Cancelled);
        }
        let mut p = dispatched();
        p.apply(Transition::RevertCreate, Tick(1)).unwrap();
        assert_eq!(p.status(), ParcelStatus::Cancelled);
        assert_eq!(p.assigned_agent(), None);
    }

    #[test]
    fn permits_table_matches_targets() {
        assert!(Transition::Cancel.permits(ParcelStatus::PickupQueue));
        assert!(Transition::Cancel.permits(ParcelStatus::Warehouse));
        assert!(!Transition::Cancel.permits(ParcelStatus::Loading));
        assert!(!Transition::RevertDispatch.permits(ParcelStatus::PickupQueue));
        for s in ParcelStatus::ALL {
            assert!(Transition::ReportMissing { reason: String::new() }.permits(s));
        }
        assert_eq!(Transition::DeclareLost.target(), ParcelStatus::Missing);
    }
}

// ── Automatic rules ───────────────────────────────────────────────────────────

#[cfg(test)]
mod advance_rules {
    use super::*;

    #[test]
    fn loading_waits_for_loading_window() {
        let cfg = DispatchConfig::default();
        let mut p = dispatched();
        let mut rng = ScriptedRng::constant(MISS);
        assert_eq!(advance(&mut p, Tick(4), &cfg, &mut rng).unwrap(), None);
        let change = advance(&mut p, Tick(5), &cfg, &mut rng).unwrap().unwrap();
        assert_eq!(change.to, ParcelStatus::InTransit);
        assert_eq!(p.history().last().unwrap().description, "Vehicle Departed");
    }

    #[test]
    fn in_transit_waits_for_arrival() {
        let cfg = DispatchConfig::default();
        let mut p = dispatched();
        let mut rng = ScriptedRng::constant(MISS);
        advance(&mut p, Tick(5), &cfg, &mut rng).unwrap();
        assert_eq!(advance(&mut p, Tick(19), &cfg, &mut rng).unwrap(), None);
        let change = advance(&mut p, Tick(20), &cfg, &mut rng).unwrap().unwrap();
        assert_eq!(change.to, ParcelStatus::DeliveryAttempt);
        assert_eq!(p.history().last().unwrap().location, "Karachi");
    }

    #[test]
    fn signal_loss_releases_agent() {
        let cfg = DispatchConfig::default();
        let mut p = dispatched();
        advance(&mut p, Tick(5), &cfg, &mut ScriptedRng::constant(MISS)).unwrap();
        let change = advance(&mut p, Tick(6), &cfg, &mut ScriptedRng::new([HIT])).unwrap().unwrap();
        assert_eq!(change.to, ParcelStatus::Missing);
        assert_eq!(change.released_agent.as_deref(), Some("Ali"));
        assert_eq!(p.history().last().unwrap().description, "Signal Lost - Investigation Started");
    }

    #[test]
    fn delivered_after_two_failures() {
        let cfg = DispatchConfig::default();
        let mut p = dispatched();
        let mut now = to_delivery_attempt(&mut p, &cfg);

        // fail, (no loss, arrive), fail, (no loss, arrive), succeed
        let mut rng = ScriptedRng::new([MISS, MISS, MISS, MISS, HIT]);
        for _ in 0..2 {
            let change = advance(&mut p, now, &cfg, &mut rng).unwrap().unwrap();
            assert_eq!(change.to, ParcelStatus::InTransit);
            assert_eq!(p.arrival_time(), Some(now + cfg.retry_window_secs));
            now = now + cfg.retry_window_secs;
            advance(&mut p, now, &cfg, &mut rng).unwrap();
            assert_eq!(p.status(), ParcelStatus::DeliveryAttempt);
        }
        let change = advance(&mut p, now, &cfg, &mut rng).unwrap().unwrap();
        assert_eq!(change.to, ParcelStatus::Delivered);
        assert_eq!(change.released_agent.as_deref(), Some("Ali"));
        assert_eq!(p.delivery_attempts(), 2);
        assert_eq!(p.history().last().unwrap().description, "Handed to Recipient");
    }

    #[test]
    fn returned_after_three_failures() {
        let cfg = DispatchConfig::default();
        let mut p = dispatched();
        let mut now = to_delivery_attempt(&mut p, &cfg);
        let mut rng = ScriptedRng::constant(MISS);

        for _ in 0..2 {
            advance(&mut p, now, &cfg, &mut rng).unwrap();
            now = now + cfg.retry_window_secs;
            advance(&mut p, now, &cfg, &mut rng).unwrap();
        }
        let change = advance(&mut p, now, &cfg, &mut rng).unwrap().unwrap();
        assert_eq!(change.to, ParcelStatus::Returned);
        assert_eq!(change.released_agent.as_deref(), Some("Ali"));
        assert_eq!(p.delivery_attempts(), 3);
        assert_eq!(p.history().last().unwrap().description, "Max Attempts Reached - RTS");
    }

    #[test]
    fn inactive_statuses_never_fire() {
        let cfg = DispatchConfig::default();
        let mut p = parcel("P1", 1.0, Priority::Low);
        p.apply(Transition::Promote, Tick(0)).unwrap();
        let mut rng = ScriptedRng::constant(HIT);
        assert_eq!(advance(&mut p, Tick(1_000), &cfg, &mut rng).unwrap(), None);
        // No draw is consumed for inactive parcels.
        assert_eq!(rng.remaining(), 0);
    }
}

// ── Live monitoring ───────────────────────────────────────────────────────────

#[cfg(test)]
mod monitoring {
    use super::*;

    #[test]
    fn progress_and_eta() {
        let p = dispatched();
        assert_eq!(p.progress(Tick(0)), Some(0.0));
        assert_eq!(p.progress(Tick(10)), Some(0.5));
        assert_eq!(p.progress(Tick(99)), Some(1.0));
        assert_eq!(p.eta_remaining(Tick(15)), Some(5));
        assert_eq!(p.eta_remaining(Tick(25)), Some(0));
    }

    #[test]
    fn undispatched_has_no_progress() {
        let p = parcel("P1", 1.0, Priority::Low);
        assert_eq!(p.progress(Tick(10)), None);
        assert_eq!(p.eta_remaining(Tick(10)), None);
    }
}

// ── ParcelStore ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod store {
    use super::*;

    #[test]
    fn keys_follow_creation_order() {
        let mut store = ParcelStore::new();
        assert_eq!(store.insert(parcel("A", 1.0, Priority::Low)).unwrap(), ParcelKey(0));
        assert_eq!(store.insert(parcel("B", 1.0, Priority::Low)).unwrap(), ParcelKey(1));
        assert_eq!(store.get_by_key(ParcelKey(1)).unwrap().id(), "B");
        assert_eq!(store.key_of("A"), Some(ParcelKey(0)));
        let ids: Vec<&str> = store.iter().map(Parcel::id).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn duplicate_id_rejected() {
        let mut store = ParcelStore::new();
        store.insert(parcel("A", 1.0, Priority::Low)).unwrap();
        assert_eq!(
            store.insert(parcel("A", 2.0, Priority::Urgent)).unwrap_err(),
            LifecycleError::Validation(ValidationError::DuplicateId("A".into()))
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn status_queries() {
        let mut store = ParcelStore::new();
        for id in ["A", "B", "C"] {
            store.insert(parcel(id, 1.0, Priority::Low)).unwrap();
        }
        store.get_mut("B").unwrap().apply(Transition::ReportMissing { reason: "x".into() }, Tick(1)).unwrap();
        store.get_mut("C").unwrap().apply(Transition::Promote, Tick(1)).unwrap();

        let investigated: Vec<&str> = store.under_investigation().map(Parcel::id).collect();
        assert_eq!(investigated, vec!["B"]);

        let counts = store.status_counts();
        assert_eq!(counts.get(&ParcelStatus::PickupQueue), Some(&1));
        assert_eq!(counts.get(&ParcelStatus::Warehouse), Some(&1));
        assert_eq!(counts.get(&ParcelStatus::UnderInvestigation), Some(&1));
        assert_eq!(counts.get(&ParcelStatus::Delivered), None);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let store = ParcelStore::new();
        assert_eq!(store.require("nope").unwrap_err(), LifecycleError::NotFound("nope".into()));
        assert!(store.get("nope").is_none());
    }
}

// ── History (property) ────────────────────────────────────────────────────────

#[cfg(test)]
mod history_properties {
    use super::*;
    use proptest::prelude::*;

    fn transition_strategy() -> impl Strategy<Value = Transition> {
        prop_oneof![
            Just(Transition::Promote),
            (0u64..50).prop_map(|a| Transition::Dispatch { agent: "Ali".into(), arrival: Tick(a) }),
            Just(Transition::Depart),
            Just(Transition::SignalLost),
            Just(Transition::Arrive),
            Just(Transition::Deliver),
            (0u64..50).prop_map(|a| Transition::Retry { arrival: Tick(a) }),
            Just(Transition::ReturnMaxAttempts),
            Just(Transition::ReportMissing { reason: "x".into() }),
            Just(Transition::Recover),
            Just(Transition::DeclareLost),
            Just(Transition::Cancel),
            Just(Transition::RevertCreate),
            Just(Transition::RevertDispatch),
        ]
    }

    proptest! {
        /// A permitted transition appends exactly one event and lands on its
        /// target; a rejected one changes nothing.
        #[test]
        fn one_event_per_change(ts in proptest::collection::vec(transition_strategy(), 0..40)) {
            let mut p = parcel("P", 4.0, Priority::Low);
            for (i, t) in ts.into_iter().enumerate() {
                let before = p.clone();
                let target = t.target();
                match p.apply(t, Tick(i as u64)) {
                    Ok(change) => {
                        prop_assert_eq!(p.history().len(), before.history().len() + 1);
                        prop_assert_eq!(p.status(), target);
                        prop_assert_eq!(change.from, before.status());
                    }
                    Err(_) => {
                        prop_assert_eq!(&p, &before);
                    }
                }
                prop_assert_eq!(p.priority_score(), 1_004);
            }
        }
    }
}
