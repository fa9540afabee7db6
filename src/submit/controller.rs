use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use super::errors::{Result, SubmitError};
use super::picker::{FilePicker, SimulatedPicker};
use super::random::{CoinFlip, ThreadRngFlip};
use super::session::SubmitSessionWorker;
use super::types::{EndReason, SelectedFile, SessionCommand, SessionSnapshot, SubmitConfig, SubmitEvent};

#[derive(Clone)]
pub struct SubmitController {
    command_tx: mpsc::Sender<SessionCommand>,
    event_tx: broadcast::Sender<SubmitEvent>,
    snapshot_rx: watch::Receiver<SessionSnapshot>,
}

/// 会话句柄 - 包含控制器和工作任务
pub struct SubmitSessionHandle {
    pub controller: SubmitController,
    pub worker_handle: JoinHandle<EndReason>,
}

impl SubmitSessionHandle {
    pub async fn shutdown(self) -> Result<EndReason> {
        drop(self.controller);
        self.worker_handle.await
            .map_err(|err| SubmitError::internal(format!("Worker panic: {}", err)))
    }
}

impl SubmitController {
    /// 用默认的文件选择器和随机源开启会话
    pub fn open(config: SubmitConfig) -> SubmitSessionHandle {
        Self::open_with(
            config,
            Arc::new(SimulatedPicker),
            Arc::new(ThreadRngFlip::default()),
        )
    }

    pub fn open_with(
        config: SubmitConfig,
        picker: Arc<dyn FilePicker>,
        coin: Arc<dyn CoinFlip>,
    ) -> SubmitSessionHandle {
        let (command_tx, command_rx) = mpsc::channel(32);
        // 最大缓存 256 个事件
        let (event_tx, _) = broadcast::channel(256);
        let (snapshot_tx, snapshot_rx) = watch::channel(SessionSnapshot::default());

        let worker_handle = tokio::spawn(SubmitSessionWorker::run(
            config,
            picker,
            coin,
            command_rx,
            snapshot_tx,
            event_tx.clone(),
        ));

        let controller = Self {
            command_tx,
            event_tx,
            snapshot_rx,
        };

        SubmitSessionHandle {
            controller,
            worker_handle,
        }
    }

    /// Pick a simulated practice file
    pub async fn select_file(&self) -> Result<SelectedFile> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(SessionCommand::SelectFile { reply: reply_tx })
            .await
            .map_err(|_| SubmitError::SessionClosed)?;

        // 等待响应
        reply_rx
            .await
            .map_err(|_| SubmitError::SessionClosed)
    }

    /// Clear the selected file
    pub async fn clear_file(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(SessionCommand::ClearFile { reply: reply_tx })
            .await
            .map_err(|_| SubmitError::SessionClosed)?;

        reply_rx
            .await
            .map_err(|_| SubmitError::SessionClosed)
    }

    /// Start the simulated upload
    pub async fn start_upload(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(SessionCommand::StartUpload { reply: reply_tx })
            .await
            .map_err(|_| SubmitError::SessionClosed)?;

        reply_rx
            .await
            .map_err(|_| SubmitError::SessionClosed)
    }

    /// Cancel the session (only from idle)
    pub async fn cancel(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(SessionCommand::Cancel { reply: reply_tx })
            .await
            .map_err(|_| SubmitError::SessionClosed)?;

        reply_rx
            .await
            .map_err(|_| SubmitError::SessionClosed)
    }

    /// Retry after a failed attempt
    pub async fn retry_upload(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(SessionCommand::RetryUpload { reply: reply_tx })
            .await
            .map_err(|_| SubmitError::SessionClosed)?;

        reply_rx
            .await
            .map_err(|_| SubmitError::SessionClosed)
    }

    /// Go back to idle after a failed attempt, keeping the file
    pub async fn select_different_file(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(SessionCommand::SelectDifferentFile { reply: reply_tx })
            .await
            .map_err(|_| SubmitError::SessionClosed)?;

        reply_rx
            .await
            .map_err(|_| SubmitError::SessionClosed)
    }

    /// Acknowledge a successful upload
    pub async fn acknowledge_done(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(SessionCommand::AcknowledgeDone { reply: reply_tx })
            .await
            .map_err(|_| SubmitError::SessionClosed)?;

        reply_rx
            .await
            .map_err(|_| SubmitError::SessionClosed)
    }

    /// Acknowledge the terminal failure state
    pub async fn acknowledge_failure(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(SessionCommand::AcknowledgeFailure { reply: reply_tx })
            .await
            .map_err(|_| SubmitError::SessionClosed)?;

        reply_rx
            .await
            .map_err(|_| SubmitError::SessionClosed)
    }

    /// 当前状态快照
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// 订阅状态快照，适合只关心最新状态的渲染端
    pub fn watch_state(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_rx.clone()
    }

    /// 订阅事件
    ///
    /// 注意：
    /// - 如果接收速度跟不上发送速度，可能会丢失事件（lagged error）
    /// - 每个订阅者都会收到完整的事件副本
    /// - 订阅者应该尽快处理事件，避免阻塞
    pub fn subscribe_events(&self) -> broadcast::Receiver<SubmitEvent> {
        self.event_tx.subscribe()
    }
}
