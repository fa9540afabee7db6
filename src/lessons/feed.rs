use std::sync::Arc;
use tokio::sync::watch;
use tracing::warn;
use super::client::LessonSource;
use super::types::Lesson;

/// 课程列表的拉取状态
#[derive(Debug, Clone)]
pub enum FeedState {
    /// 正在拉取
    Loading,
    /// 拉取成功
    Loaded(Vec<Lesson>),
    /// 拉取失败，保留错误文案供展示
    Failed(String),
}

/// 课程列表状态机，拉取期间状态始终可观测
pub struct LessonFeed {
    source: Arc<dyn LessonSource>,
    state_tx: watch::Sender<FeedState>,
}

impl LessonFeed {
    pub fn new(source: Arc<dyn LessonSource>) -> Self {
        let (state_tx, _) = watch::channel(FeedState::Loading);
        Self { source, state_tx }
    }

    /// 当前状态
    pub fn state(&self) -> FeedState {
        self.state_tx.borrow().clone()
    }

    /// 订阅状态变化，适合只关心最新状态的渲染端
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state_tx.subscribe()
    }

    /// 重新拉取课程列表
    ///
    /// 失败不向上冒泡，错误进入 Failed 状态供展示。
    pub async fn refresh(&self) {
        self.state_tx.send_replace(FeedState::Loading);

        match self.source.fetch_lessons().await {
            Ok(lessons) => {
                self.state_tx.send_replace(FeedState::Loaded(lessons));
            }
            Err(err) => {
                warn!(error = %err, "lesson fetch failed");
                self.state_tx.send_replace(FeedState::Failed(err.to_string()));
            }
        }
    }
}
