use serde::Deserialize;
use uuid::Uuid;

/// 课程 ID
///
/// 每次解码时本地生成，刷新后同一课程会拿到新 ID，不能跨请求持久化。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LessonId(Uuid);

impl LessonId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LessonId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LessonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Lesson {
    /// 本地生成，不来自接口
    #[serde(skip)]
    pub id: LessonId,
    pub mentor_name: String,
    pub lesson_title: String,
    pub video_thumbnail_url: String,
    pub lesson_image_url: String,
    pub video_url: String,
}

impl Lesson {
    /// 接口不返回课程介绍，用固定模板生成
    pub fn lesson_notes(&self) -> String {
        format!(
            "In this lesson with {}, you'll learn:\n\n\
             • Fundamental techniques\n\
             • Practical exercises\n\
             • Performance tips\n\n\
             Duration: 45 minutes\n\
             Difficulty: Intermediate",
            self.mentor_name
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LessonResponse {
    pub lessons: Vec<Lesson>,
}
