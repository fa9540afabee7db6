use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use super::random::CoinFlip;
use super::types::SubmitConfig;

/// 带尝试序号的步进信号，旧一轮尝试残留的信号据此被丢弃
#[derive(Debug, Clone, Copy)]
pub(crate) struct DriverTick(pub(crate) u64);

/// 单次步进的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum TickOutcome {
    /// 进度前进到新值
    Advanced(f64),
    /// 模拟网络失败
    Failed,
    /// 到达 100%
    Completed,
}

/// 模拟传输驱动器，按固定间隔向会话发送步进信号
///
/// Drop 时取消内部任务，不会在会话结束后继续发信号。
pub(crate) struct TransportDriver {
    token: CancellationToken,
}

impl TransportDriver {
    pub(crate) fn spawn(
        period: Duration,
        attempt: u64,
        tick_tx: mpsc::UnboundedSender<DriverTick>,
    ) -> Self {
        let token = CancellationToken::new();

        tokio::spawn({
            let token = token.clone();

            async move {
                // 首个信号在一个完整周期之后
                let mut interval = interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

                loop {
                    tokio::select! {
                        _ = token.cancelled() => {
                            break;
                        }
                        _ = interval.tick() => {
                            if tick_tx.send(DriverTick(attempt)).is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        });

        Self { token }
    }
}

impl Drop for TransportDriver {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// 对当前进度执行一次步进
///
/// 失败判定用的是步进前的进度，且优先于完成判定；
/// 只有进度落在失败区间（开区间）内才消耗一次硬币。
pub(crate) fn advance(progress: f64, config: &SubmitConfig, coin: &dyn CoinFlip) -> TickOutcome {
    let next = progress + config.progress_step;
    let in_band = progress > config.failure_band.start && progress < config.failure_band.end;

    if in_band && coin.flip() {
        TickOutcome::Failed
    } else if next >= 1.0 {
        TickOutcome::Completed
    } else {
        TickOutcome::Advanced(next)
    }
}
