mod client;
mod errors;
mod feed;
pub mod types;

pub use client::{LessonClient, LessonSource};
pub use errors::{FetchError, Result};
pub use feed::{FeedState, LessonFeed};
pub use types::{Lesson, LessonId, LessonResponse};
