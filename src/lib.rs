pub mod config;
pub mod lessons;
pub mod submit;

// 重新导出课程侧类型
pub use lessons::{FeedState, Lesson, LessonClient, LessonFeed, LessonSource};

// 重新导出上传会话侧类型
pub use submit::{
    EndReason,
    SelectedFile,
    SessionSnapshot,
    SubmitConfig,
    SubmitController,
    SubmitEvent,
    SubmitSessionHandle,
    UploadState,
};

#[cfg(test)]
mod tests;
