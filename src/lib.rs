mod config;
mod entry;
mod error;
mod store;
mod validation;
mod view;

#[cfg(feature = "emitter")]
pub mod emitter;
pub mod storage;

pub use config::StoreConfig;
pub use entry::{Draft, EntryId, FeedbackEntry, InvalidRating, Rating, RatingTier};
pub use error::{FeedbackError, PersistenceWarning};
pub use storage::{InMemoryKeyValueStore, KeyValueStore, Preferences, StorageError};
pub use store::{Change, Clock, Committed, FeedbackStore, SystemClock};
pub use validation::{
    validate, Field, FieldError, FieldErrorKind, ValidationErrors, ValidationLimits,
};
pub use view::{FeedbackStats, FilterMode, SortMode, UnknownMode, ViewItem, ViewState};

#[cfg(feature = "emitter")]
pub use emitter::{FEEDBACK_CREATED, FEEDBACK_DELETED, FEEDBACK_UPDATED};
