//! FeedbackStore - sole owner of the feedback collection.
//!
//! Every mutation follows the same path: validate, apply to the in-memory
//! collection, write the whole collection to the key-value store, then notify
//! listeners. A failed write is reported as a [`PersistenceWarning`] on the
//! returned [`Committed`] and never rolls the change back.
//!
//! ## Example
//!
//! ```ignore
//! use feedback_portal::{Draft, FeedbackStore, FilterMode, InMemoryKeyValueStore};
//!
//! let mut store = FeedbackStore::open(InMemoryKeyValueStore::new());
//! let created = store.create(
//!     Draft::new()
//!         .name("Ada")
//!         .email("ada@example.com")
//!         .course("Compilers")
//!         .feedback_text("Loved the parser labs."),
//! )?;
//!
//! store.set_filter(FilterMode::FiveOnly);
//! for item in store.derived_view() {
//!     println!("{} {}", item.id(), item.entry.name);
//! }
//! ```

mod clock;

use chrono::{DateTime, Utc};
use std::collections::HashSet;

#[cfg(feature = "emitter")]
use crate::emitter::FeedbackEmitter;
use crate::config::StoreConfig;
use crate::entry::{Draft, EntryId, FeedbackEntry};
use crate::error::{FeedbackError, PersistenceWarning};
use crate::storage::{snapshot, KeyValueStore};
use crate::validation::{validate, ValidationErrors};
use crate::view::{project, FeedbackStats, FilterMode, SortMode, ViewItem, ViewState};

pub use clock::{Clock, SystemClock};

/// Kind of committed mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Change {
    Created,
    Updated,
    Deleted,
}

/// Result of a mutation that was applied in memory.
///
/// `warning` is set when the collection could not be written to storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Committed<T> {
    pub value: T,
    pub warning: Option<PersistenceWarning>,
}

impl<T> Committed<T> {
    pub fn is_persisted(&self) -> bool {
        self.warning.is_none()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

pub struct FeedbackStore<S: KeyValueStore, C: Clock = SystemClock> {
    /// Newest first.
    entries: Vec<FeedbackEntry>,
    view: ViewState,
    draft: Draft,
    storage: S,
    clock: C,
    config: StoreConfig,
    last_id: u64,
    #[cfg(feature = "emitter")]
    emitter: FeedbackEmitter,
}

impl<S: KeyValueStore> FeedbackStore<S, SystemClock> {
    /// Open with the wall clock and default configuration.
    pub fn open(storage: S) -> Self {
        Self::open_with(storage, SystemClock, StoreConfig::default())
    }
}

impl<S: KeyValueStore, C: Clock> FeedbackStore<S, C> {
    /// Load the persisted collection (empty if absent or unreadable) and
    /// start with a blank draft and default view.
    pub fn open_with(storage: S, clock: C, config: StoreConfig) -> Self {
        let entries = snapshot::load_entries(&storage, &config.feedbacks_key);
        let last_id = entries.iter().map(|e| e.id.get()).max().unwrap_or(0);

        Self {
            entries,
            view: ViewState::default(),
            draft: Draft::default(),
            storage,
            clock,
            config,
            last_id,
            #[cfg(feature = "emitter")]
            emitter: FeedbackEmitter::new(),
        }
    }

    // -- mutations ---------------------------------------------------------

    /// Validate and prepend a new entry. Clears the draft and any edit.
    pub fn create(&mut self, draft: Draft) -> Result<Committed<FeedbackEntry>, FeedbackError> {
        self.check(&draft)?;

        let created_at = self.clock.now();
        let id = self.next_id(created_at);
        let entry = FeedbackEntry::from_draft(id, created_at, draft);

        self.entries.insert(0, entry.clone());
        self.reset_edit();
        tracing::debug!(id = id.get(), total = self.entries.len(), "feedback created");

        Ok(self.commit(Change::Created, entry))
    }

    /// Point the draft at an existing entry, loading a copy of its values.
    pub fn begin_edit(&mut self, id: EntryId) -> Result<&Draft, FeedbackError> {
        let draft = self.get(id).ok_or(FeedbackError::NotFound(id))?.to_draft();
        self.draft = draft;
        self.view.edit_target = Some(id);
        Ok(&self.draft)
    }

    /// Replace the entry under edit with `draft`, keeping its id and
    /// creation time.
    pub fn update(&mut self, draft: Draft) -> Result<Committed<FeedbackEntry>, FeedbackError> {
        let target = self
            .view
            .edit_target
            .ok_or(FeedbackError::NoEditInProgress)?;
        self.check(&draft)?;
        let position = self
            .position(target)
            .ok_or(FeedbackError::NotFound(target))?;

        let original = &self.entries[position];
        let entry = FeedbackEntry::from_draft(original.id, original.created_at, draft);
        self.entries[position] = entry.clone();
        self.reset_edit();
        tracing::debug!(id = target.get(), "feedback updated");

        Ok(self.commit(Change::Updated, entry))
    }

    /// Commit the store's own draft: an update if an edit is in progress,
    /// otherwise a new entry. On validation failure the draft is kept.
    pub fn submit(&mut self) -> Result<Committed<FeedbackEntry>, FeedbackError> {
        let draft = self.draft.clone();
        if self.view.edit_target.is_some() {
            self.update(draft)
        } else {
            self.create(draft)
        }
    }

    /// Drop the edit target and the draft. Nothing is persisted.
    pub fn cancel_edit(&mut self) {
        self.reset_edit();
    }

    /// Remove an entry. Callers confirm with the user before calling this;
    /// there is no undo.
    pub fn delete(&mut self, id: EntryId) -> Result<Committed<FeedbackEntry>, FeedbackError> {
        let position = self.position(id).ok_or(FeedbackError::NotFound(id))?;
        let removed = self.entries.remove(position);

        if self.view.edit_target == Some(id) {
            self.reset_edit();
        }
        tracing::debug!(id = id.get(), total = self.entries.len(), "feedback deleted");

        Ok(self.commit(Change::Deleted, removed))
    }

    // -- view state --------------------------------------------------------

    pub fn set_filter(&mut self, mode: FilterMode) {
        self.view.filter = mode;
    }

    pub fn set_sort(&mut self, mode: SortMode) {
        self.view.sort = mode;
    }

    pub fn filter(&self) -> FilterMode {
        self.view.filter
    }

    pub fn sort(&self) -> SortMode {
        self.view.sort
    }

    pub fn view_state(&self) -> ViewState {
        self.view
    }

    /// Current filter and sort applied to the collection. Recomputed on
    /// every call; the borrow ends before the next mutation.
    pub fn derived_view(&self) -> Vec<ViewItem<'_>> {
        project(&self.entries, self.view.filter, self.view.sort)
    }

    pub fn stats(&self) -> FeedbackStats {
        FeedbackStats::from_entries(&self.entries)
    }

    // -- reads -------------------------------------------------------------

    /// The canonical collection, newest first.
    pub fn entries(&self) -> &[FeedbackEntry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&FeedbackEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// The form buffer. Changes here never reach a stored entry until
    /// `submit` or `update` succeeds.
    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    /// Field errors the current draft would fail with, without committing.
    pub fn validate_draft(&self) -> ValidationErrors {
        validate(&self.draft, &self.config.limits)
    }

    pub fn edit_target(&self) -> Option<EntryId> {
        self.view.edit_target
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Listen for committed changes; see [`crate::emitter`] for event names.
    #[cfg(feature = "emitter")]
    pub fn on<F>(&mut self, event: &str, listener: F) -> String
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.emitter.on(event, listener)
    }

    #[cfg(feature = "emitter")]
    pub fn remove_listener(&mut self, listener_id: &str) -> bool {
        self.emitter.remove_listener(listener_id)
    }

    // -- internals ---------------------------------------------------------

    fn check(&self, draft: &Draft) -> Result<(), FeedbackError> {
        let errors = validate(draft, &self.config.limits);
        if errors.is_empty() {
            Ok(())
        } else {
            tracing::debug!(fields = errors.len(), "draft rejected");
            Err(FeedbackError::Validation(errors))
        }
    }

    fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Millisecond timestamp, bumped past every id already issued or loaded.
    /// Once `u64::MAX` is taken, falls back to the first free id.
    fn next_id(&mut self, created_at: DateTime<Utc>) -> EntryId {
        let millis = u64::try_from(created_at.timestamp_millis()).unwrap_or(0);
        let id = match self.last_id.checked_add(1) {
            Some(next) => millis.max(next),
            None => self.unused_id(millis),
        };
        self.last_id = self.last_id.max(id);
        EntryId(id)
    }

    fn unused_id(&self, from: u64) -> u64 {
        let taken: HashSet<u64> = self.entries.iter().map(|e| e.id.get()).collect();
        (from..=u64::MAX)
            .chain(0..from)
            .find(|id| !taken.contains(id))
            .unwrap_or(from)
    }

    fn reset_edit(&mut self) {
        self.view.edit_target = None;
        self.draft.clear();
    }

    fn commit(&mut self, change: Change, entry: FeedbackEntry) -> Committed<FeedbackEntry> {
        let warning = self.persist();
        self.notify(change, &entry);
        Committed {
            value: entry,
            warning,
        }
    }

    fn persist(&self) -> Option<PersistenceWarning> {
        let key = &self.config.feedbacks_key;
        match snapshot::save_entries(&self.storage, key, &self.entries) {
            Ok(()) => None,
            Err(error) => {
                tracing::warn!(key = %key, error = %error, "feedback collection not saved");
                Some(PersistenceWarning {
                    key: key.clone(),
                    error,
                })
            }
        }
    }

    #[cfg(feature = "emitter")]
    fn notify(&mut self, change: Change, entry: &FeedbackEntry) {
        self.emitter.enqueue(change, entry);
        self.emitter.emit_queued();
    }

    #[cfg(not(feature = "emitter"))]
    fn notify(&mut self, _change: Change, _entry: &FeedbackEntry) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{Rating, RatingTier};
    use crate::storage::InMemoryKeyValueStore;
    use crate::validation::Field;
    use chrono::{Duration, TimeZone};
    use std::cell::Cell;

    /// Advances one second per reading.
    struct StepClock {
        ticks: Cell<i64>,
    }

    impl StepClock {
        fn new() -> Self {
            Self {
                ticks: Cell::new(0),
            }
        }
    }

    impl Clock for StepClock {
        fn now(&self) -> DateTime<Utc> {
            let tick = self.ticks.get();
            self.ticks.set(tick + 1);
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap() + Duration::seconds(tick)
        }
    }

    fn store() -> FeedbackStore<InMemoryKeyValueStore, StepClock> {
        FeedbackStore::open_with(
            InMemoryKeyValueStore::new(),
            StepClock::new(),
            StoreConfig::default(),
        )
    }

    fn draft(rating: u8) -> Draft {
        Draft::new()
            .name("Linus")
            .email("linus@uni.fi")
            .course("Operating Systems")
            .rating(Rating::new(rating).unwrap())
            .feedback_text("Hard but very rewarding.")
    }

    #[test]
    fn create_prepends_and_clears_draft() {
        let mut store = store();
        store.draft_mut().name = "half typed".into();

        let first = store.create(draft(3)).unwrap();
        let second = store.create(draft(5)).unwrap();

        assert!(first.is_persisted());
        assert_eq!(store.entries()[0].id, second.value.id);
        assert_eq!(store.entries()[1].id, first.value.id);
        assert_eq!(store.draft(), &Draft::default());
        assert!(second.value.id > first.value.id);
    }

    #[test]
    fn ids_stay_unique_within_one_millisecond() {
        struct Frozen;
        impl Clock for Frozen {
            fn now(&self) -> DateTime<Utc> {
                Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
            }
        }

        let mut store =
            FeedbackStore::open_with(InMemoryKeyValueStore::new(), Frozen, StoreConfig::default());
        let a = store.create(draft(4)).unwrap().value.id;
        let b = store.create(draft(4)).unwrap().value.id;
        assert_eq!(b.get(), a.get() + 1);
    }

    #[test]
    fn invalid_create_leaves_collection_alone() {
        let mut store = store();
        let err = store.create(draft(4).name("")).unwrap_err();
        assert!(err.validation_errors().unwrap().contains(Field::Name));
        assert!(store.is_empty());
    }

    #[test]
    fn edit_round_trip_keeps_identity() {
        let mut store = store();
        let created = store.create(draft(2)).unwrap().value;

        let loaded = store.begin_edit(created.id).unwrap().clone();
        assert_eq!(loaded.rating.get(), 2);
        assert_eq!(store.edit_target(), Some(created.id));

        store.draft_mut().rating = Rating::new(4).unwrap();
        assert_eq!(store.get(created.id).unwrap().rating.get(), 2);

        let updated = store.submit().unwrap().value;
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.rating.get(), 4);
        assert_eq!(updated.tier(), RatingTier::Excellent);
        assert_eq!(store.edit_target(), None);
        assert_eq!(store.draft(), &Draft::default());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn direct_update_resets_draft() {
        let mut store = store();
        let id = store.create(draft(3)).unwrap().into_value().id;
        store.begin_edit(id).unwrap();
        store.draft_mut().name = "Leftover".into();

        let updated = store.update(draft(1)).unwrap().into_value();
        assert_eq!(updated.id, id);
        assert_eq!(updated.tier(), RatingTier::NeedsImprovement);
        assert_eq!(store.edit_target(), None);
        assert_eq!(store.draft(), &Draft::default());
    }

    #[test]
    fn ids_stay_unique_after_loading_max_id() {
        let kv = InMemoryKeyValueStore::new();
        let top = FeedbackEntry::from_draft(
            EntryId(u64::MAX),
            Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap(),
            draft(5),
        );
        snapshot::save_entries(&kv, "feedbacks", &[top]).unwrap();

        let mut store = FeedbackStore::open_with(kv, StepClock::new(), StoreConfig::default());
        let a = store.create(draft(4)).unwrap().into_value().id;
        let b = store.create(draft(3)).unwrap().into_value().id;

        let ids: HashSet<EntryId> = store.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), 3);
        assert_ne!(a, EntryId(u64::MAX));
        assert_ne!(b, EntryId(u64::MAX));

        store.delete(a).unwrap();
        assert!(store.get(EntryId(u64::MAX)).is_some());
        assert!(store.get(b).is_some());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn update_without_edit_fails() {
        let mut store = store();
        store.create(draft(5)).unwrap();
        assert_eq!(
            store.update(draft(1)).unwrap_err(),
            FeedbackError::NoEditInProgress
        );
        assert_eq!(store.entries()[0].rating.get(), 5);
    }

    #[test]
    fn invalid_update_keeps_edit_open() {
        let mut store = store();
        let id = store.create(draft(5)).unwrap().value.id;
        store.begin_edit(id).unwrap();

        assert!(store.update(draft(5).email("nope")).is_err());
        assert_eq!(store.edit_target(), Some(id));
        assert_eq!(store.get(id).unwrap().email, "linus@uni.fi");
    }

    #[test]
    fn deleting_edit_target_clears_edit() {
        let mut store = store();
        let id = store.create(draft(5)).unwrap().value.id;
        store.begin_edit(id).unwrap();

        let removed = store.delete(id).unwrap().value;
        assert_eq!(removed.id, id);
        assert_eq!(store.edit_target(), None);
        assert_eq!(store.draft(), &Draft::default());
        assert_eq!(store.begin_edit(id).unwrap_err(), FeedbackError::NotFound(id));
    }

    #[test]
    fn cancel_discards_draft() {
        let mut store = store();
        let id = store.create(draft(5)).unwrap().value.id;
        store.begin_edit(id).unwrap();
        store.draft_mut().course = "Something else".into();

        store.cancel_edit();
        assert_eq!(store.edit_target(), None);
        assert_eq!(store.draft(), &Draft::default());
        assert_eq!(store.get(id).unwrap().course, "Operating Systems");
    }

    #[test]
    fn mutations_are_written_through() {
        let kv = InMemoryKeyValueStore::new();
        let mut store = FeedbackStore::open_with(kv.clone(), StepClock::new(), StoreConfig::default());
        let id = store.create(draft(5)).unwrap().value.id;

        let saved = snapshot::load_entries(&kv, "feedbacks");
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id, id);

        store.delete(id).unwrap();
        assert!(snapshot::load_entries(&kv, "feedbacks").is_empty());
    }

    #[test]
    fn view_changes_do_not_persist() {
        let kv = InMemoryKeyValueStore::new();
        let mut store = FeedbackStore::open_with(kv.clone(), StepClock::new(), StoreConfig::default());
        store.set_filter(FilterMode::FiveOnly);
        store.set_sort(SortMode::LowestRated);

        assert!(kv.is_empty().unwrap());
        assert_eq!(store.view_state().filter, FilterMode::FiveOnly);
        assert_eq!(store.sort(), SortMode::LowestRated);
    }
}
