// libs/appointment-cell/src/services/calendar.rs
use std::collections::BTreeSet;

use chrono::{Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use shared_models::catalog;

use crate::models::{AppointmentRecord, CalendarError, CalendarEvent};
use crate::services::agenda::AppointmentGateway;
use crate::services::form::EventForm;
use crate::services::mapper;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    Month,
    #[default]
    Week,
    Day,
}

impl CalendarView {
    /// Inclusive date range shown for `anchor`. Weeks start on Sunday.
    pub fn visible_range(&self, anchor: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            CalendarView::Day => (anchor, anchor),
            CalendarView::Week => {
                let start = anchor - Duration::days(anchor.weekday().num_days_from_sunday() as i64);
                (start, start + Duration::days(6))
            }
            CalendarView::Month => {
                let first = NaiveDate::from_ymd_opt(anchor.year(), anchor.month(), 1).unwrap_or(anchor);
                let last = first
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(first);
                (first, last)
            }
        }
    }

    fn step(&self, anchor: NaiveDate, forward: bool) -> NaiveDate {
        let moved = match (self, forward) {
            (CalendarView::Day, true) => anchor.checked_add_signed(Duration::days(1)),
            (CalendarView::Day, false) => anchor.checked_sub_signed(Duration::days(1)),
            (CalendarView::Week, true) => anchor.checked_add_signed(Duration::days(7)),
            (CalendarView::Week, false) => anchor.checked_sub_signed(Duration::days(7)),
            (CalendarView::Month, true) => anchor.checked_add_months(Months::new(1)),
            (CalendarView::Month, false) => anchor.checked_sub_months(Months::new(1)),
        };
        moved.unwrap_or(anchor)
    }
}

/// Local view of the agenda kept in sync with the backend.
///
/// Mutations are applied locally first and rolled back when the backend
/// rejects them.
pub struct CalendarState<G: AppointmentGateway> {
    gateway: G,
    events: Vec<CalendarEvent>,
    active_categories: BTreeSet<String>,
    current_date: NaiveDate,
    view: CalendarView,
    loading: bool,
}

impl<G: AppointmentGateway> CalendarState<G> {
    pub fn new(gateway: G, today: NaiveDate) -> Self {
        Self {
            gateway,
            events: Vec::new(),
            active_categories: catalog::all_ids().map(str::to_string).collect(),
            current_date: today,
            view: CalendarView::default(),
            loading: false,
        }
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn event(&self, id: &str) -> Option<&CalendarEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn view(&self) -> CalendarView {
        self.view
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    // ==========================================================================
    // FILTERS
    // ==========================================================================

    /// Events of active categories, ordered by start. Events whose specialty
    /// is not in the catalog are always shown.
    pub fn visible_events(&self) -> Vec<&CalendarEvent> {
        let mut visible: Vec<&CalendarEvent> = self
            .events
            .iter()
            .filter(|e| match &e.props.category_id {
                Some(id) => self.active_categories.contains(id),
                None => true,
            })
            .collect();
        visible.sort_by_key(|e| e.start);
        visible
    }

    /// Returns false for ids outside the catalog.
    pub fn toggle_category(&mut self, id: &str, checked: bool) -> bool {
        if catalog::find_by_id(id).is_none() {
            warn!("Ignoring unknown category filter {}", id);
            return false;
        }
        if checked {
            self.active_categories.insert(id.to_string());
        } else {
            self.active_categories.remove(id);
        }
        true
    }

    pub fn is_category_active(&self, id: &str) -> bool {
        self.active_categories.contains(id)
    }

    // ==========================================================================
    // NAVIGATION
    // ==========================================================================

    pub fn visible_range(&self) -> (NaiveDate, NaiveDate) {
        self.view.visible_range(self.current_date)
    }

    pub fn set_view(&mut self, view: CalendarView) {
        self.view = view;
    }

    pub fn prev(&mut self) {
        self.current_date = self.view.step(self.current_date, false);
    }

    pub fn next(&mut self) {
        self.current_date = self.view.step(self.current_date, true);
    }

    pub fn today(&mut self, today: NaiveDate) {
        self.current_date = today;
    }

    /// Mini-calendar selection: focus the day in day view.
    pub fn jump_to_day(&mut self, date: NaiveDate) {
        self.current_date = date;
        self.view = CalendarView::Day;
    }

    // ==========================================================================
    // SYNCHRONIZATION
    // ==========================================================================

    /// Replaces the local events with the backend's view of the visible
    /// range. On failure the previous events are kept.
    pub async fn load_period(&mut self) -> Result<usize, CalendarError> {
        let (start, end) = self.visible_range();
        self.loading = true;
        let result = self.gateway.fetch_by_period(start, end).await;
        self.loading = false;

        let records = result.map_err(|e| {
            warn!("Failed to load appointments for {} - {}: {}", start, end, e);
            CalendarError::from(e)
        })?;

        let now = Local::now().naive_local();
        self.events = records.into_iter().map(|r| mapper::to_event(r, now)).collect();
        info!("Loaded {} appointments for {} - {}", self.events.len(), start, end);
        Ok(self.events.len())
    }

    pub async fn create_event(&mut self, form: &EventForm) -> Result<CalendarEvent, CalendarError> {
        form.validate()?;

        let pending = form.to_event(mapper::local_id(), None);
        let local_id = pending.id.clone();
        let record = pending.to_record();
        self.events.push(pending);

        match self.gateway.create(&record).await {
            Ok(saved) => {
                let event = Self::reconcile(saved, &local_id);
                if let Some(slot) = self.events.iter_mut().find(|e| e.id == local_id) {
                    *slot = event.clone();
                }
                debug!("Event {} confirmed as {}", local_id, event.id);
                Ok(event)
            }
            Err(err) => {
                warn!("Create failed, dropping {}: {}", local_id, err);
                self.events.retain(|e| e.id != local_id);
                Err(err.into())
            }
        }
    }

    pub async fn update_event(&mut self, id: &str, form: &EventForm) -> Result<CalendarEvent, CalendarError> {
        form.validate()?;

        let idx = self.synced_position(id)?;
        let previous = self.events[idx].clone();
        let updated = form.to_event(previous.id.clone(), Some(&previous));
        self.commit(idx, previous, updated).await
    }

    /// Drag or resize on the grid.
    pub async fn move_event(
        &mut self,
        id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<CalendarEvent, CalendarError> {
        if end <= start {
            return Err(CalendarError::InvalidForm(
                "o término deve ser posterior ao início".to_string(),
            ));
        }

        let idx = self.synced_position(id)?;
        let previous = self.events[idx].clone();
        let mut moved = previous.clone();
        moved.start = start;
        moved.end = end;
        self.commit(idx, previous, moved).await
    }

    pub async fn delete_event(&mut self, id: &str) -> Result<(), CalendarError> {
        let idx = self.synced_position(id)?;
        let removed = self.events.remove(idx);

        match self.gateway.delete(id).await {
            Ok(()) => {
                info!("Event {} removed", id);
                Ok(())
            }
            Err(err) => {
                warn!("Delete failed, restoring {}: {}", id, err);
                let idx = idx.min(self.events.len());
                self.events.insert(idx, removed);
                Err(err.into())
            }
        }
    }

    async fn commit(
        &mut self,
        idx: usize,
        previous: CalendarEvent,
        updated: CalendarEvent,
    ) -> Result<CalendarEvent, CalendarError> {
        let record = updated.to_record();
        self.events[idx] = updated;

        match self.gateway.update(&previous.id, &record).await {
            Ok(saved) => {
                let event = Self::reconcile(saved, &previous.id);
                self.events[idx] = event.clone();
                Ok(event)
            }
            Err(err) => {
                warn!("Update failed, restoring {}: {}", previous.id, err);
                self.events[idx] = previous;
                Err(err.into())
            }
        }
    }

    fn position(&self, id: &str) -> Result<usize, CalendarError> {
        self.events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| CalendarError::EventNotFound(id.to_string()))
    }

    /// Like `position`, but refuses events that only carry a local id.
    fn synced_position(&self, id: &str) -> Result<usize, CalendarError> {
        let idx = self.position(id)?;
        if self.events[idx].is_local() {
            return Err(CalendarError::NotSynced(id.to_string()));
        }
        Ok(idx)
    }

    /// Server version of an event. Responses without an id keep `known_id`.
    fn reconcile(saved: AppointmentRecord, known_id: &str) -> CalendarEvent {
        let has_id = saved.id.is_some();
        let mut event = mapper::to_event(saved, Local::now().naive_local());
        if !has_id {
            event.id = known_id.to_string();
        }
        event
    }
}
