//! The `DispatchCoordinator` and its operations.

use std::collections::HashSet;

use pd_agent::AgentPool;
use pd_core::{CityId, DispatchConfig, DispatchRng, ParcelKey, PdError, Priority, SimClock, Tick, ValidationError};
use pd_lifecycle::{Parcel, ParcelStatus, ParcelStore, StatusChange, Transition, advance};
use pd_queue::{PriorityDispatchQueue, UndoAction, UndoKind, UndoLog};
use pd_spatial::{DfsRouteFinder, Path, RouteFinder, RouteGraph, RouteSet};
use tracing::{debug, info, warn};

use crate::{
    CoordinatorError, CoordinatorResult, Dispatch, DispatchOutcome, DispatchView,
    InvestigationResult, ParcelRequest, Quote, Resolution, Session, Submission, TickReport,
    UndoOutcome,
};

/// A request that passed validation, with everything needed to commit it.
struct Validated {
    priority: Priority,
    zone:     String,
    quote:    Quote,
}

// ── DispatchCoordinator ───────────────────────────────────────────────────────

/// Orchestrates the dispatch engine.
///
/// Owns the road graph, the agent pool, the parcel database, the priority
/// queue, the active (in-transit) list, the undo log, and the random
/// source.  The queue and the active list hold [`ParcelKey`] handles into
/// the database, never parcels.
///
/// # Queue and active-list hygiene
///
/// A parcel that leaves `Warehouse` while queued (cancelled, reported
/// missing) leaves a stale heap entry behind.  Stale entries are discarded
/// when extracted.  A membership set keeps each parcel queued at most once.
/// The active list is pruned to parcels in Loading / InTransit /
/// DeliveryAttempt after every tick and every manual transition.
///
/// Create via [`CoordinatorBuilder`][crate::CoordinatorBuilder].
pub struct DispatchCoordinator<R: DispatchRng, F: RouteFinder = DfsRouteFinder> {
    pub(crate) config:  DispatchConfig,
    pub(crate) clock:   SimClock,
    pub(crate) hq:      CityId,
    pub(crate) graph:   RouteGraph,
    pub(crate) agents:  AgentPool,
    pub(crate) parcels: ParcelStore,
    pub(crate) queue:   PriorityDispatchQueue,
    pub(crate) queued:  HashSet<ParcelKey>,
    pub(crate) active:  Vec<ParcelKey>,
    pub(crate) undo:    UndoLog,
    pub(crate) rng:     R,
    pub(crate) finder:  F,
}

impl<R: DispatchRng, F: RouteFinder> DispatchCoordinator<R, F> {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn now(&self) -> Tick {
        self.clock.now()
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn hq(&self) -> CityId {
        self.hq
    }

    pub fn graph(&self) -> &RouteGraph {
        &self.graph
    }

    pub fn agents(&self) -> &AgentPool {
        &self.agents
    }

    pub fn parcels(&self) -> &ParcelStore {
        &self.parcels
    }

    pub fn parcel(&self, id: &str) -> Option<&Parcel> {
        self.parcels.get(id)
    }

    /// Heap entries, stale ones included.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Parcels on the active list (Loading, InTransit, DeliveryAttempt).
    pub fn in_transit(&self) -> impl Iterator<Item = &Parcel> + '_ {
        self.active.iter().filter_map(move |&k| self.parcels.get_by_key(k))
    }

    /// Borrowed view of the whole state.
    pub fn view(&self) -> DispatchView<'_> {
        DispatchView {
            now:     self.clock.now(),
            config:  &self.config,
            graph:   &self.graph,
            agents:  &self.agents,
            parcels: &self.parcels,
            queue:   &self.queue,
            active:  &self.active,
        }
    }

    // ── Submission ────────────────────────────────────────────────────────

    /// Validate `request` and price it without changing any state.
    pub fn quote(&self, request: &ParcelRequest) -> CoordinatorResult<Quote> {
        self.validate(request).map(|v| v.quote)
    }

    /// Validate, quote, ask `confirm`, and on approval create the parcel.
    ///
    /// A created parcel is promoted to `Warehouse`, queued, and recorded in
    /// the undo log.  Validation failures and a declined confirmation leave
    /// the state untouched.
    pub fn submit(
        &mut self,
        request: ParcelRequest,
        session: &Session,
        confirm: impl FnOnce(&Quote) -> bool,
    ) -> CoordinatorResult<Submission> {
        let validated = self.validate(&request)?;
        if !confirm(&validated.quote) {
            info!(parcel = %request.id, "submission declined");
            return Ok(Submission::Declined(validated.quote));
        }

        let now = self.clock.now();
        let mut parcel = Parcel::new(
            request.id.as_str(),
            request.destination.as_str(),
            request.weight,
            validated.priority,
            validated.zone,
            now,
        )?;
        parcel.note(format!("Created by: {}", session.user), "Portal", now);
        parcel.apply(Transition::Promote, now)?;
        let score = parcel.priority_score();

        let key = self.parcels.insert(parcel)?;
        self.enqueue(key, score);
        self.undo.push(UndoAction::create(request.id.as_str()));

        info!(
            parcel = %request.id,
            destination = %request.destination,
            cost = validated.quote.cost,
            user = %session.user,
            "parcel submitted",
        );
        Ok(Submission::Created(validated.quote))
    }

    /// [`submit`](Self::submit) with automatic confirmation.
    pub fn submit_confirmed(&mut self, request: ParcelRequest, session: &Session) -> CoordinatorResult<Quote> {
        match self.submit(request, session, |_| true)? {
            Submission::Created(q) | Submission::Declined(q) => Ok(q),
        }
    }

    fn validate(&self, request: &ParcelRequest) -> CoordinatorResult<Validated> {
        if request.id.trim().is_empty() {
            return Err(ValidationError::EmptyId.into());
        }
        if self.parcels.contains(&request.id) {
            return Err(ValidationError::DuplicateId(request.id.clone()).into());
        }
        if !request.weight.is_finite() || request.weight <= 0.0 {
            return Err(ValidationError::Weight(request.weight).into());
        }
        let priority = Priority::try_from(request.priority)?;
        let destination = self
            .graph
            .city_by_name(&request.destination)
            .ok_or_else(|| ValidationError::UnknownDestination(request.destination.clone()))?;
        let zone = self.graph.city(destination).map(|c| c.zone.clone()).unwrap_or_default();

        let routes = self.finder.find_routes(&self.graph, self.hq, destination, self.config.max_routes)?;
        let route = routes.recommended().cloned();
        let distance = route.as_ref().map_or(0, |p| p.distance);
        let cost = self.config.pricing.quote(request.weight, f64::from(distance), priority);

        Ok(Validated {
            priority,
            zone,
            quote: Quote {
                parcel_id:   request.id.clone(),
                destination: request.destination.clone(),
                weight:      request.weight,
                priority,
                distance,
                cost,
                route,
            },
        })
    }

    // ── Dispatch ──────────────────────────────────────────────────────────

    /// Dispatch the highest-priority waiting parcel.
    ///
    /// `select` receives the retained candidate routes and the index of the
    /// recommended (shortest) one, and returns the index to use; `None` or
    /// an out-of-range index falls back to the recommendation.
    ///
    /// Running out of agents or routes is reported as an outcome, not an
    /// error.  If an error does occur the parcel is put back in the queue.
    pub fn process_next(
        &mut self,
        select: impl FnOnce(&RouteSet, usize) -> Option<usize>,
    ) -> CoordinatorResult<DispatchOutcome> {
        let Some(key) = self.next_pending() else {
            debug!("dispatch queue empty");
            return Ok(DispatchOutcome::QueueEmpty);
        };
        let result = self.dispatch(key, select);
        if result.is_err() {
            self.requeue(key);
        }
        result
    }

    /// [`process_next`](Self::process_next) always taking the recommended route.
    pub fn process_next_recommended(&mut self) -> CoordinatorResult<DispatchOutcome> {
        self.process_next(|_, _| None)
    }

    fn dispatch(
        &mut self,
        key:    ParcelKey,
        select: impl FnOnce(&RouteSet, usize) -> Option<usize>,
    ) -> CoordinatorResult<DispatchOutcome> {
        let now = self.clock.now();
        let (parcel_id, destination, priority, score) = {
            let p = self.parcel_at(key)?;
            (p.id().to_string(), p.destination().to_string(), p.priority(), p.priority_score())
        };

        // ── Agent ─────────────────────────────────────────────────────────
        let Some(agent_id) = self.agents.find_available(priority) else {
            self.enqueue(key, score);
            warn!(parcel = %parcel_id, "no agent available, parcel requeued");
            return Ok(DispatchOutcome::NoAgentAvailable { parcel_id });
        };
        let agent = self
            .agents
            .agent(agent_id)
            .map(|a| a.name().to_string())
            .ok_or(PdError::AgentNotFound(agent_id))?;

        // ── Route ─────────────────────────────────────────────────────────
        let to = self.graph.require(&destination)?;
        let mut routes = self.finder.find_routes(&self.graph, self.hq, to, self.config.max_routes)?;
        let Some(recommended) = routes.min_route_index() else {
            self.parcel_at_mut(key)?.apply(Transition::NoRoute, now)?;
            warn!(parcel = %parcel_id, destination = %destination, "no route available, returned to sender");
            return Ok(DispatchOutcome::NoRouteAvailable { parcel_id, blocked_road: None });
        };
        let mut index = select(&routes, recommended)
            .filter(|&i| i < routes.len())
            .unwrap_or(recommended);

        // ── Blockage roll ─────────────────────────────────────────────────
        let mut rerouted = false;
        let mut blocked_road = None;
        if self.rng.percent_hit(self.config.blockage_percent) {
            rerouted = true;
            blocked_road = self.graph.block_random_road(&mut self.rng);
            routes = self.finder.find_routes(&self.graph, self.hq, to, self.config.max_routes)?;
            match routes.min_route_index() {
                Some(i) => index = i,
                None => {
                    self.parcel_at_mut(key)?.apply(Transition::BlockageReturn, now)?;
                    warn!(parcel = %parcel_id, "rerouting failed after blockage, returned to sender");
                    return Ok(DispatchOutcome::NoRouteAvailable { parcel_id, blocked_road });
                }
            }
        }
        let route: Path = routes
            .get(index)
            .cloned()
            .ok_or_else(|| CoordinatorError::Config(format!("route index {index} out of range")))?;

        // ── Commit ────────────────────────────────────────────────────────
        let transit_secs = self.rng.between(self.config.transit_secs_min, self.config.transit_secs_max);
        let eta = now + u64::from(transit_secs) + self.config.loading_secs;

        self.agents.assign(&agent)?;
        let applied = self
            .parcel_at_mut(key)?
            .apply(Transition::Dispatch { agent: agent.clone(), arrival: eta }, now);
        if let Err(e) = applied {
            self.roll_back_assignment(&agent);
            return Err(e.into());
        }
        if !self.active.contains(&key) {
            self.active.push(key);
        }
        self.undo.push(UndoAction::dispatch(parcel_id.as_str()));

        info!(
            parcel = %parcel_id,
            agent = %agent,
            route = %route.describe(&self.graph),
            distance = route.distance,
            eta = %eta,
            rerouted,
            "parcel dispatched",
        );
        Ok(DispatchOutcome::Dispatched(Dispatch {
            parcel_id,
            agent,
            route,
            route_index: index,
            transit_secs,
            eta,
            rerouted,
            blocked_road,
        }))
    }

    // ── Time ──────────────────────────────────────────────────────────────

    /// Advance logical time to `now` and apply the automatic lifecycle rules
    /// to every active parcel.
    ///
    /// Time never moves backwards: an earlier `now` is treated as the
    /// current tick.
    pub fn tick(&mut self, now: Tick) -> CoordinatorResult<TickReport> {
        let now = self.clock.advance_to(now);
        let mut transitions = Vec::new();

        for i in 0..self.active.len() {
            let key = self.active[i];
            let Some(parcel) = self.parcels.get_by_key_mut(key) else { continue };
            if let Some(change) = advance(parcel, now, &self.config, &mut self.rng)? {
                self.release_agent(&change);
                transitions.push(change);
            }
        }
        self.prune_active();

        debug!(tick = %now, changed = transitions.len(), active = self.active.len(), "tick complete");
        Ok(TickReport { tick: now, transitions, active: self.active.len() })
    }

    /// [`tick`](Self::tick) at `secs` seconds past the current time.
    pub fn step(&mut self, secs: u64) -> CoordinatorResult<TickReport> {
        let next = self.clock.now() + secs;
        self.tick(next)
    }

    // ── Administrative actions ────────────────────────────────────────────

    /// Open an investigation on `id`, from any status.  Frees its agent.
    pub fn report_missing(&mut self, id: &str, reason: &str) -> CoordinatorResult<StatusChange> {
        let now = self.clock.now();
        let key = self.parcels.require(id)?;
        let change = self
            .parcel_at_mut(key)?
            .apply(Transition::ReportMissing { reason: reason.to_string() }, now)?;
        if let Some(agent) = &change.released_agent {
            warn!(parcel = %id, agent = %agent, "agent capacity freed");
        }
        self.release_agent(&change);
        self.prune_active();
        warn!(parcel = %id, reason, "parcel reported missing");
        Ok(change)
    }

    /// Resolve every open investigation, in creation order.
    ///
    /// Each case is recovered (back to `Warehouse` and the queue) with the
    /// configured recovery odds, otherwise declared lost with compensation.
    pub fn resolve_investigations(&mut self) -> CoordinatorResult<Vec<InvestigationResult>> {
        let now = self.clock.now();
        let cases: Vec<ParcelKey> = self
            .parcels
            .iter_keyed()
            .filter(|(_, p)| p.status() == ParcelStatus::UnderInvestigation)
            .map(|(k, _)| k)
            .collect();
        if cases.is_empty() {
            debug!("no pending investigations");
        }

        let mut results = Vec::with_capacity(cases.len());
        for key in cases {
            let recovered = self.rng.percent_hit(self.config.recovery_percent);
            let transition = if recovered { Transition::Recover } else { Transition::DeclareLost };
            let (parcel_id, weight, score) = {
                let parcel = self.parcel_at_mut(key)?;
                parcel.apply(transition, now)?;
                (parcel.id().to_string(), parcel.weight(), parcel.priority_score())
            };

            let resolution = if recovered {
                self.enqueue(key, score);
                info!(parcel = %parcel_id, "investigation resolved: recovered");
                Resolution::Recovered
            } else {
                let compensation = self.config.pricing.compensation(weight);
                info!(parcel = %parcel_id, compensation, "investigation resolved: declared lost");
                Resolution::Lost { compensation }
            };
            results.push(InvestigationResult { parcel_id, resolution });
        }
        Ok(results)
    }

    /// Cancel a parcel that has not been dispatched yet.
    pub fn cancel(&mut self, id: &str) -> CoordinatorResult<StatusChange> {
        let now = self.clock.now();
        let key = self.parcels.require(id)?;
        let change = self.parcel_at_mut(key)?.apply(Transition::Cancel, now)?;
        info!(parcel = %id, "parcel cancelled");
        Ok(change)
    }

    /// Pop and apply the most recent undo action.
    ///
    /// Returns `Ok(None)` when the log is empty.  An action that no longer
    /// applies (unknown parcel) is discarded and reported with `change: None`.
    pub fn undo_last(&mut self) -> CoordinatorResult<Option<UndoOutcome>> {
        let Some(action) = self.undo.pop() else {
            debug!("nothing to undo");
            return Ok(None);
        };
        let Some(key) = self.parcels.key_of(&action.parcel_id) else {
            warn!(action = %action, "undo target no longer exists, discarded");
            return Ok(Some(UndoOutcome { action, change: None }));
        };

        let now = self.clock.now();
        let transition = match action.kind {
            UndoKind::Create   => Transition::RevertCreate,
            UndoKind::Dispatch => Transition::RevertDispatch,
        };
        let change = match self.parcel_at_mut(key)?.apply(transition, now) {
            Ok(change) => change,
            Err(e) => {
                warn!(action = %action, error = %e, "undo no longer applies, discarded");
                return Ok(Some(UndoOutcome { action, change: None }));
            }
        };

        self.release_agent(&change);
        if action.kind == UndoKind::Dispatch {
            self.requeue(key);
        }
        self.prune_active();
        info!(action = %action, "undo applied");
        Ok(Some(UndoOutcome { action, change: Some(change) }))
    }

    /// Block or unblock the road between two named cities.
    pub fn set_road_blocked(&mut self, u: &str, v: &str, blocked: bool) -> CoordinatorResult<()> {
        let (a, b) = (self.graph.require(u)?, self.graph.require(v)?);
        self.graph.set_blocked(a, b, blocked)?;
        info!(from = %u, to = %v, blocked, "road status changed");
        Ok(())
    }

    pub fn add_city(&mut self, name: &str, zone: &str) -> CoordinatorResult<CityId> {
        let id = self.graph.add_city(name, zone)?;
        info!(city = %name, zone = %zone, "city added");
        Ok(id)
    }

    pub fn add_road(&mut self, u: &str, v: &str, distance: u32) -> CoordinatorResult<()> {
        self.graph.add_road_by_name(u, v, distance)?;
        info!(from = %u, to = %v, distance, "road added");
        Ok(())
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn parcel_at(&self, key: ParcelKey) -> CoordinatorResult<&Parcel> {
        self.parcels
            .get_by_key(key)
            .ok_or_else(|| CoordinatorError::ParcelNotFound(key.to_string()))
    }

    fn parcel_at_mut(&mut self, key: ParcelKey) -> CoordinatorResult<&mut Parcel> {
        self.parcels
            .get_by_key_mut(key)
            .ok_or_else(|| CoordinatorError::ParcelNotFound(key.to_string()))
    }

    /// Queue `key` unless it is already queued.
    pub(crate) fn enqueue(&mut self, key: ParcelKey, score: u32) {
        if self.queued.insert(key) {
            self.queue.insert(key, score);
        }
    }

    /// Queue `key` again if its parcel is waiting in the warehouse.
    fn requeue(&mut self, key: ParcelKey) {
        if let Some(p) = self.parcels.get_by_key(key)
            && p.status() == ParcelStatus::Warehouse
        {
            let score = p.priority_score();
            self.enqueue(key, score);
        }
    }

    /// Extract the best waiting parcel, discarding stale entries.
    fn next_pending(&mut self) -> Option<ParcelKey> {
        while let Some(entry) = self.queue.extract_max() {
            self.queued.remove(&entry.key);
            match self.parcels.get_by_key(entry.key) {
                Some(p) if p.status() == ParcelStatus::Warehouse => return Some(entry.key),
                Some(p) => debug!(parcel = %p.id(), status = %p.status(), "dropping stale queue entry"),
                None => {}
            }
        }
        None
    }

    fn release_agent(&mut self, change: &StatusChange) {
        let Some(name) = &change.released_agent else { return };
        match self.agents.release(name) {
            Ok(load) => debug!(agent = %name, load, "agent released"),
            Err(e) => warn!(agent = %name, error = %e, "released agent is not in the pool"),
        }
    }

    /// Undo an `assign` whose parcel transition failed.
    pub(crate) fn roll_back_assignment(&mut self, agent: &str) {
        match self.agents.release(agent) {
            Ok(load) => debug!(agent = %agent, load, "assignment rolled back"),
            Err(e) => warn!(agent = %agent, error = %e, "assignment rollback failed"),
        }
    }

    pub(crate) fn prune_active(&mut self) {
        let parcels = &self.parcels;
        self.active
            .retain(|&k| parcels.get_by_key(k).is_some_and(|p| p.status().is_active()));
    }
}
