#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::broadcast;
    use crate::lessons::*;
    use crate::submit::*;
    use crate::submit::coins::{FixedCoin, PanicCoin, ScriptCoin};

    // 间隔远大于测试时长，断言期间不会出现步进信号
    fn slow_config() -> SubmitConfig {
        SubmitConfig {
            tick_interval: Duration::from_secs(600),
            ..SubmitConfig::default()
        }
    }

    fn fast_config() -> SubmitConfig {
        SubmitConfig {
            tick_interval: Duration::from_millis(1),
            ..SubmitConfig::default()
        }
    }

    // 慢会话里硬币不应被触碰
    fn open_idle(config: SubmitConfig) -> SubmitSessionHandle {
        SubmitController::open_with(config, Arc::new(SimulatedPicker), Arc::new(PanicCoin))
    }

    #[tokio::test]
    async fn test_select_and_clear_file() {
        let handle = open_idle(slow_config());
        let controller = &handle.controller;

        let file = controller.select_file().await.unwrap();
        assert!(file.display_name.starts_with("Practice_"));
        assert!(file.display_name.ends_with(".mp3"));
        assert_eq!(file.detail_label, "15.2 MB • MP3 Audio");

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.state, UploadState::Idle);
        assert_eq!(snapshot.selected_file, Some(file));

        controller.clear_file().await.unwrap();
        assert_eq!(controller.snapshot().selected_file, None);

        // 重复清除没有效果
        controller.clear_file().await.unwrap();
        assert_eq!(controller.snapshot().selected_file, None);

        assert_eq!(handle.shutdown().await.unwrap(), EndReason::Shutdown);
    }

    #[tokio::test]
    async fn test_start_upload_preconditions() {
        let handle = open_idle(slow_config());
        let controller = &handle.controller;

        // 未选文件时开始上传是静默空操作
        controller.start_upload().await.unwrap();
        assert_eq!(controller.snapshot().state, UploadState::Idle);

        controller.select_file().await.unwrap();
        controller.start_upload().await.unwrap();
        assert_eq!(
            controller.snapshot().state,
            UploadState::Uploading { progress: 0.0 }
        );

        // 上传中重复开始同样无效
        controller.start_upload().await.unwrap();
        assert_eq!(
            controller.snapshot().state,
            UploadState::Uploading { progress: 0.0 }
        );

        // 非成功状态下确认完成同样无效，会话继续存活
        controller.acknowledge_done().await.unwrap();
        assert_eq!(
            controller.snapshot().state,
            UploadState::Uploading { progress: 0.0 }
        );

        assert_eq!(handle.shutdown().await.unwrap(), EndReason::Shutdown);
    }

    #[tokio::test]
    async fn test_upload_completes_after_fifty_ticks() {
        let handle = SubmitController::open_with(
            fast_config(),
            Arc::new(SimulatedPicker),
            Arc::new(FixedCoin(false)),
        );
        let controller = &handle.controller;
        let mut events = controller.subscribe_events();

        controller.select_file().await.unwrap();
        controller.start_upload().await.unwrap();

        let mut progress_events = Vec::new();
        loop {
            match events.recv().await.unwrap() {
                SubmitEvent::Progress { progress } => progress_events.push(progress),
                SubmitEvent::StateChanged { new: UploadState::Success, old } => {
                    assert!(matches!(old, UploadState::Uploading { .. }));
                    break;
                }
                SubmitEvent::StateChanged { new: UploadState::Retry { error }, .. } => {
                    panic!("unexpected failure: {error}");
                }
                _ => {}
            }
        }

        // 49 次进度事件，第 50 拍直接迁移到成功
        assert_eq!(progress_events.len(), 49);
        assert!(progress_events.windows(2).all(|w| w[0] < w[1]));
        assert!(progress_events.iter().all(|p| *p > 0.0 && *p < 1.0));
        assert!((progress_events.last().unwrap() - 0.98).abs() < 1e-9);

        assert_eq!(controller.snapshot().state, UploadState::Success);

        controller.acknowledge_done().await.unwrap();
        assert_eq!(handle.shutdown().await.unwrap(), EndReason::Completed);
    }

    #[tokio::test]
    async fn test_upload_fails_in_band() {
        let handle = SubmitController::open_with(
            fast_config(),
            Arc::new(SimulatedPicker),
            Arc::new(FixedCoin(true)),
        );
        let controller = &handle.controller;
        let mut events = controller.subscribe_events();

        controller.select_file().await.unwrap();
        controller.start_upload().await.unwrap();

        let mut last_progress = 0.0_f64;
        let error = loop {
            match events.recv().await.unwrap() {
                SubmitEvent::Progress { progress } => last_progress = progress,
                SubmitEvent::StateChanged { new: UploadState::Retry { error }, .. } => break error,
                SubmitEvent::StateChanged { new: UploadState::Success, .. } => {
                    panic!("must fail with an always-true coin");
                }
                _ => {}
            }
        };

        assert_eq!(error, "Network error occurred");
        // 失败发生在进度首次严格超过 0.3 的那一拍
        assert_eq!(last_progress, 0.32);

        // 失败后驱动器停止，不再有任何事件
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(matches!(
            events.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
        assert!(matches!(controller.snapshot().state, UploadState::Retry { .. }));

        assert_eq!(handle.shutdown().await.unwrap(), EndReason::Shutdown);
    }

    #[tokio::test]
    async fn test_retry_restarts_from_zero() {
        // 第一次进失败区间就失败，之后脚本耗尽一路成功
        let handle = SubmitController::open_with(
            fast_config(),
            Arc::new(SimulatedPicker),
            Arc::new(ScriptCoin::new([true])),
        );
        let controller = &handle.controller;
        let mut events = controller.subscribe_events();

        controller.select_file().await.unwrap();
        controller.start_upload().await.unwrap();

        // 等第一轮失败
        loop {
            if let SubmitEvent::StateChanged { new: UploadState::Retry { .. }, .. } =
                events.recv().await.unwrap()
            {
                break;
            }
        }

        controller.retry_upload().await.unwrap();

        // 重试从零开始
        loop {
            if let SubmitEvent::StateChanged { old: UploadState::Retry { .. }, new } =
                events.recv().await.unwrap()
            {
                assert_eq!(new, UploadState::Uploading { progress: 0.0 });
                break;
            }
        }

        loop {
            match events.recv().await.unwrap() {
                SubmitEvent::StateChanged { new: UploadState::Success, .. } => break,
                SubmitEvent::StateChanged { new: UploadState::Retry { error }, .. } => {
                    panic!("second attempt must succeed: {error}");
                }
                _ => {}
            }
        }

        controller.acknowledge_done().await.unwrap();
        assert_eq!(handle.shutdown().await.unwrap(), EndReason::Completed);
    }

    #[tokio::test]
    async fn test_select_different_file_returns_to_idle() {
        let handle = SubmitController::open_with(
            fast_config(),
            Arc::new(SimulatedPicker),
            Arc::new(FixedCoin(true)),
        );
        let controller = &handle.controller;
        let mut events = controller.subscribe_events();

        let file = controller.select_file().await.unwrap();
        controller.start_upload().await.unwrap();

        loop {
            if let SubmitEvent::StateChanged { new: UploadState::Retry { .. }, .. } =
                events.recv().await.unwrap()
            {
                break;
            }
        }

        controller.select_different_file().await.unwrap();

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.state, UploadState::Idle);
        // 已选文件保留
        assert_eq!(snapshot.selected_file, Some(file));

        // 空闲状态下该操作是空操作
        controller.select_different_file().await.unwrap();
        assert_eq!(controller.snapshot().state, UploadState::Idle);

        assert_eq!(handle.shutdown().await.unwrap(), EndReason::Shutdown);
    }

    #[tokio::test]
    async fn test_cancel_from_idle_ends_session() {
        let handle = open_idle(slow_config());
        let controller = handle.controller.clone();

        controller.cancel().await.unwrap();
        assert_eq!(handle.worker_handle.await.unwrap(), EndReason::Cancelled);

        // 会话结束后所有操作报错
        assert!(matches!(
            controller.select_file().await,
            Err(SubmitError::SessionClosed)
        ));
        assert!(matches!(
            controller.start_upload().await,
            Err(SubmitError::SessionClosed)
        ));
    }

    #[tokio::test]
    async fn test_cancel_ignored_while_uploading() {
        let handle = open_idle(slow_config());
        let controller = &handle.controller;

        controller.select_file().await.unwrap();
        controller.start_upload().await.unwrap();

        controller.cancel().await.unwrap();
        assert_eq!(
            controller.snapshot().state,
            UploadState::Uploading { progress: 0.0 }
        );

        // 控制端全部释放时会话以 Shutdown 收尾
        assert_eq!(handle.shutdown().await.unwrap(), EndReason::Shutdown);
    }

    #[tokio::test]
    async fn test_session_end_event() {
        let handle = open_idle(slow_config());
        let controller = handle.controller.clone();
        let mut events = controller.subscribe_events();

        controller.cancel().await.unwrap();

        loop {
            if let SubmitEvent::SessionEnded { reason } = events.recv().await.unwrap() {
                assert_eq!(reason, EndReason::Cancelled);
                break;
            }
        }

        assert_eq!(handle.worker_handle.await.unwrap(), EndReason::Cancelled);
    }

    #[tokio::test]
    async fn test_watch_snapshot_updates() {
        let handle = open_idle(slow_config());
        let controller = &handle.controller;

        let mut watcher = controller.watch_state();
        assert_eq!(watcher.borrow().state, UploadState::Idle);

        controller.select_file().await.unwrap();

        watcher.changed().await.unwrap();
        let snapshot = watcher.borrow_and_update().clone();
        assert!(snapshot.selected_file.is_some());

        assert_eq!(handle.shutdown().await.unwrap(), EndReason::Shutdown);
    }

    const LESSONS_BODY: &str = r#"{
        "lessons": [
            {
                "mentor_name": "Kaushiki Chakraborty",
                "lesson_title": "Raga Basics",
                "video_thumbnail_url": "https://example.com/raga-thumb.jpg",
                "lesson_image_url": "https://example.com/raga.jpg",
                "video_url": "https://example.com/raga.mp4"
            },
            {
                "mentor_name": "Mahesh Kale",
                "lesson_title": "Taan Practice",
                "video_thumbnail_url": "https://example.com/taan-thumb.jpg",
                "lesson_image_url": "https://example.com/taan.jpg",
                "video_url": "https://example.com/taan.mp4"
            }
        ]
    }"#;

    // 按顺序吐出预设响应，最后一个响应之后重复它
    fn start_lessons_server(port: u16, mut responses: Vec<(u16, &'static str)>) -> String {
        let server = tiny_http::Server::http(("127.0.0.1", port)).unwrap();
        responses.reverse();

        std::thread::spawn(move || {
            let mut last = (200, "{\"lessons\": []}");
            for request in server.incoming_requests() {
                let (status, body) = responses.pop().unwrap_or(last);
                last = (status, body);

                let header: tiny_http::Header =
                    "Content-Type: application/json".parse().unwrap();
                let response = tiny_http::Response::from_string(body)
                    .with_status_code(status)
                    .with_header(header);
                let _ = request.respond(response);
            }
        });

        format!("http://127.0.0.1:{port}/lessons")
    }

    #[tokio::test]
    async fn test_feed_recovers_after_bad_payload() {
        let endpoint = start_lessons_server(
            18601,
            vec![(200, "not json at all"), (200, LESSONS_BODY)],
        );

        let client = LessonClient::new(&endpoint).unwrap();
        let feed = LessonFeed::new(Arc::new(client));
        assert!(matches!(feed.state(), FeedState::Loading));

        feed.refresh().await;
        let FeedState::Failed(error) = feed.state() else {
            panic!("expected a decode failure");
        };
        assert!(error.contains("Decode error"));

        feed.refresh().await;
        let FeedState::Loaded(lessons) = feed.state() else {
            panic!("expected lessons after recovery");
        };
        assert_eq!(lessons.len(), 2);
        assert_eq!(lessons[0].lesson_title, "Raga Basics");
        assert_eq!(lessons[1].mentor_name, "Mahesh Kale");
    }

    #[tokio::test]
    async fn test_feed_reports_server_error() {
        let endpoint = start_lessons_server(18602, vec![(500, "oops")]);

        let client = LessonClient::new(&endpoint).unwrap();
        let feed = LessonFeed::new(Arc::new(client));

        feed.refresh().await;
        let FeedState::Failed(error) = feed.state() else {
            panic!("expected a server error");
        };
        assert!(error.contains("500"));
    }
}
