#![allow(dead_code)]

pub mod clock;
pub mod storage;

use feedback_portal::{Draft, FeedbackStore, Rating, StoreConfig};

use clock::ManualClock;
use storage::FlakyStore;

pub type TestStore = FeedbackStore<FlakyStore, ManualClock>;

pub fn open(kv: &FlakyStore, clock: &ManualClock) -> TestStore {
    FeedbackStore::open_with(kv.clone(), clock.clone(), StoreConfig::default())
}

pub fn rating(value: u8) -> Rating {
    Rating::new(value).unwrap()
}

pub fn valid_draft(name: &str, stars: u8) -> Draft {
    Draft::new()
        .name(name)
        .email(format!("{}@campus.edu", name.to_lowercase()))
        .course("Distributed Systems")
        .rating(rating(stars))
        .feedback_text("Clear lectures and fair exams.")
}
