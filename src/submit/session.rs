use std::mem;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info};
use super::driver::{self, DriverTick, TickOutcome, TransportDriver};
use super::picker::FilePicker;
use super::random::CoinFlip;
use super::types::{
    EndReason, SelectedFile, SessionCommand, SessionSnapshot, SubmitConfig, SubmitEvent,
    UploadState,
};

/// 模拟失败统一使用的错误文案
pub(crate) const NETWORK_ERROR: &str = "Network error occurred";

/// 会话工作器，持有全部可变状态，单任务内串行处理命令和步进信号
pub(crate) struct SubmitSessionWorker {
    config: SubmitConfig,
    picker: Arc<dyn FilePicker>,
    coin: Arc<dyn CoinFlip>,

    state: UploadState,
    selected_file: Option<SelectedFile>,

    /// 当前尝试的驱动器，None 表示没有正在进行的传输
    driver: Option<TransportDriver>,
    /// 尝试序号，随步进信号一起发出，用于丢弃旧一轮的残留信号
    attempt: u64,
    tick_tx: mpsc::UnboundedSender<DriverTick>,

    snapshot_tx: watch::Sender<SessionSnapshot>,
    event_tx: broadcast::Sender<SubmitEvent>,
}

impl SubmitSessionWorker {
    pub(crate) async fn run(
        config: SubmitConfig,
        picker: Arc<dyn FilePicker>,
        coin: Arc<dyn CoinFlip>,
        mut command_rx: mpsc::Receiver<SessionCommand>,
        snapshot_tx: watch::Sender<SessionSnapshot>,
        event_tx: broadcast::Sender<SubmitEvent>,
    ) -> EndReason {
        let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();

        let mut worker = Self {
            config,
            picker,
            coin,
            state: UploadState::Idle,
            selected_file: None,
            driver: None,
            attempt: 0,
            tick_tx,
            snapshot_tx,
            event_tx,
        };

        let reason = loop {
            tokio::select! {
                command = command_rx.recv() => {
                    match command {
                        Some(command) => {
                            if let Some(reason) = worker.handle_command(command) {
                                break reason;
                            }
                        }
                        // 所有控制端已释放
                        None => break EndReason::Shutdown,
                    }
                }
                Some(tick) = tick_rx.recv() => {
                    worker.handle_tick(tick);
                }
            }
        };

        worker.stop_driver();
        worker.send_event(SubmitEvent::SessionEnded { reason });
        info!(?reason, "submit session ended");

        reason
    }

    /// 处理一条命令，返回 Some 表示会话结束
    ///
    /// 回执在状态变更之后发送，调用端 await 返回时变更已可见。
    fn handle_command(&mut self, command: SessionCommand) -> Option<EndReason> {
        match command {
            SessionCommand::SelectFile { reply } => {
                let file = self.picker.pick();
                self.selected_file = Some(file.clone());
                self.publish_snapshot();
                self.send_event(SubmitEvent::FileSelected { file: file.clone() });
                let _ = reply.send(file);
                None
            }

            SessionCommand::ClearFile { reply } => {
                if self.selected_file.take().is_some() {
                    self.publish_snapshot();
                    self.send_event(SubmitEvent::FileCleared);
                }
                let _ = reply.send(());
                None
            }

            SessionCommand::StartUpload { reply } => {
                if self.selected_file.is_some() && self.state == UploadState::Idle {
                    self.begin_attempt();
                } else {
                    debug!(state = ?self.state, "start_upload ignored");
                }
                let _ = reply.send(());
                None
            }

            SessionCommand::Cancel { reply } => {
                if self.state != UploadState::Idle {
                    debug!(state = ?self.state, "cancel ignored");
                    let _ = reply.send(());
                    return None;
                }
                let _ = reply.send(());
                Some(EndReason::Cancelled)
            }

            SessionCommand::RetryUpload { reply } => {
                if matches!(self.state, UploadState::Retry { .. }) && self.selected_file.is_some() {
                    self.begin_attempt();
                } else {
                    debug!(state = ?self.state, "retry_upload ignored");
                }
                let _ = reply.send(());
                None
            }

            SessionCommand::SelectDifferentFile { reply } => {
                // 只回到空闲，已选文件保留
                if matches!(self.state, UploadState::Retry { .. }) {
                    self.set_state(UploadState::Idle);
                } else {
                    debug!(state = ?self.state, "select_different_file ignored");
                }
                let _ = reply.send(());
                None
            }

            SessionCommand::AcknowledgeDone { reply } => {
                if self.state != UploadState::Success {
                    debug!(state = ?self.state, "acknowledge_done ignored");
                    let _ = reply.send(());
                    return None;
                }
                let _ = reply.send(());
                Some(EndReason::Completed)
            }

            SessionCommand::AcknowledgeFailure { reply } => {
                if self.state != UploadState::Failure {
                    debug!(state = ?self.state, "acknowledge_failure ignored");
                    let _ = reply.send(());
                    return None;
                }
                let _ = reply.send(());
                Some(EndReason::Failed)
            }
        }
    }

    fn handle_tick(&mut self, tick: DriverTick) {
        // 旧一轮尝试的残留信号
        if tick.0 != self.attempt {
            return;
        }

        let UploadState::Uploading { progress } = &self.state else {
            return;
        };
        let progress = *progress;

        let outcome = driver::advance(progress, &self.config, self.coin.as_ref());
        match outcome {
            TickOutcome::Advanced(next) => {
                // 上传中的进度推进不算状态迁移，只发 Progress
                self.state = UploadState::Uploading { progress: next };
                self.publish_snapshot();
                self.send_event(SubmitEvent::Progress { progress: next });
            }
            TickOutcome::Failed => {
                self.stop_driver();
                self.set_state(UploadState::Retry {
                    error: NETWORK_ERROR.to_string(),
                });
            }
            TickOutcome::Completed => {
                self.stop_driver();
                self.set_state(UploadState::Success);
            }
        }
    }

    /// 开始一轮新的上传尝试，进度归零
    fn begin_attempt(&mut self) {
        self.stop_driver();
        self.attempt += 1;
        self.set_state(UploadState::Uploading { progress: 0.0 });
        self.driver = Some(TransportDriver::spawn(
            self.config.tick_interval,
            self.attempt,
            self.tick_tx.clone(),
        ));
    }

    fn set_state(&mut self, new: UploadState) {
        let old = mem::replace(&mut self.state, new.clone());
        self.publish_snapshot();
        self.send_event(SubmitEvent::StateChanged { old, new });
    }

    fn publish_snapshot(&self) {
        self.snapshot_tx.send_replace(SessionSnapshot {
            state: self.state.clone(),
            selected_file: self.selected_file.clone(),
        });
    }

    fn send_event(&self, event: SubmitEvent) {
        let _ = self.event_tx.send(event);
    }

    fn stop_driver(&mut self) {
        // Drop 即取消内部任务
        self.driver = None;
    }
}
