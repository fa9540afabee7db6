use std::ops::Range;
use std::time::Duration;
use tokio::sync::oneshot;

/// 上传对话框的状态机
#[derive(Debug, Clone, PartialEq)]
pub enum UploadState {
    /// 空闲（未开始上传）
    Idle,
    /// 上传中，progress 取值范围 [0.0, 1.0)
    Uploading { progress: f64 },
    /// 上传成功
    Success,
    /// 失败（终态，无对应迁移入口，渲染层仍需处理）
    Failure,
    /// 可重试的失败
    Retry { error: String },
}

/// 已选中的练习文件（模拟，不读磁盘）
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    /// 展示用文件名，如 "Practice_2025-06-01 10.30.00.mp3"
    pub display_name: String,

    /// 固定的大小/格式标签，仅用于展示
    pub detail_label: String,
}

/// 会话的完整可观测状态快照
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub state: UploadState,
    pub selected_file: Option<SelectedFile>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            state: UploadState::Idle,
            selected_file: None,
        }
    }
}

/// 会话结束原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// 用户在空闲状态下取消
    Cancelled,
    /// 用户确认上传成功后退出
    Completed,
    /// 用户确认终态失败后退出
    Failed,
    /// 控制端全部释放
    Shutdown,
}

#[derive(Debug, Clone)]
pub struct SubmitConfig {
    /// 模拟传输的步进间隔
    pub tick_interval: Duration,

    /// 每次步进增加的进度
    pub progress_step: f64,

    /// 在该进度区间内（开区间）掷硬币决定是否失败
    pub failure_band: Range<f64>,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(50),
            progress_step: 0.02,
            failure_band: 0.3..0.7,
        }
    }
}

/// 会话命令
pub(crate) enum SessionCommand {
    /// 选择（模拟生成）一个练习文件
    SelectFile {
        reply: oneshot::Sender<SelectedFile>,
    },

    /// 清除已选文件
    ClearFile {
        reply: oneshot::Sender<()>,
    },

    /// 开始上传
    StartUpload {
        reply: oneshot::Sender<()>,
    },

    /// 取消（仅空闲状态下结束会话）
    Cancel {
        reply: oneshot::Sender<()>,
    },

    /// 失败后重试上传
    RetryUpload {
        reply: oneshot::Sender<()>,
    },

    /// 失败后换文件（回到空闲，保留已选文件）
    SelectDifferentFile {
        reply: oneshot::Sender<()>,
    },

    /// 确认上传成功，结束会话
    AcknowledgeDone {
        reply: oneshot::Sender<()>,
    },

    /// 确认终态失败，结束会话
    AcknowledgeFailure {
        reply: oneshot::Sender<()>,
    },
}

#[derive(Debug, Clone)]
pub enum SubmitEvent {
    /// 选中了新文件
    FileSelected { file: SelectedFile },

    /// 已选文件被清除
    FileCleared,

    /// 状态变更
    StateChanged {
        old: UploadState,
        new: UploadState,
    },

    /// 上传进度更新
    Progress { progress: f64 },

    /// 会话结束
    SessionEnded { reason: EndReason },
}
