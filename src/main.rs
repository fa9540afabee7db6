use std::io::Write;
use std::sync::Arc;
use practicum::config::Config;
use practicum::lessons::{FeedState, LessonClient, LessonFeed};
use practicum::submit::{
    SimulatedPicker, SubmitConfig, SubmitController, SubmitEvent, ThreadRngFlip, UploadState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = Config::load_or_default();

    let client = LessonClient::new(&config.endpoint)?;
    let feed = LessonFeed::new(Arc::new(client));
    feed.refresh().await;
    if matches!(feed.state(), FeedState::Failed(_)) {
        // 一次简单重试
        feed.refresh().await;
    }
    print_feed(&feed.state());

    // 模拟提交一段练习录音；演示里把失败概率调低
    let handle = SubmitController::open_with(
        SubmitConfig::default(),
        Arc::new(SimulatedPicker),
        Arc::new(ThreadRngFlip::new(0.02)),
    );
    let controller = &handle.controller;
    let mut events = controller.subscribe_events();

    let file = controller.select_file().await?;
    println!("Selected {} ({})", file.display_name, file.detail_label);
    controller.start_upload().await?;

    let mut attempts = 1u32;
    loop {
        match events.recv().await? {
            SubmitEvent::Progress { progress } => {
                print!("\rUploading... {:3.0}%", progress * 100.0);
                std::io::stdout().flush()?;
            }
            SubmitEvent::StateChanged { new: UploadState::Retry { error }, .. } => {
                println!("\rUpload failed: {error}");
                if attempts >= 3 {
                    controller.select_different_file().await?;
                    controller.cancel().await?;
                } else {
                    attempts += 1;
                    println!("Retrying (attempt {attempts})");
                    controller.retry_upload().await?;
                }
            }
            SubmitEvent::StateChanged { new: UploadState::Success, .. } => {
                println!("\rUpload complete.    ");
                controller.acknowledge_done().await?;
            }
            SubmitEvent::SessionEnded { reason } => {
                println!("Session ended: {reason:?}");
                break;
            }
            _ => {}
        }
    }

    handle.shutdown().await?;

    Ok(())
}

fn print_feed(state: &FeedState) {
    match state {
        FeedState::Loading => println!("Loading lessons..."),
        FeedState::Loaded(lessons) => {
            println!("Lessons ({}):", lessons.len());
            for lesson in lessons {
                println!("  {} ({})", lesson.lesson_title, lesson.mentor_name);
            }
        }
        FeedState::Failed(error) => println!("Lesson fetch failed: {error}"),
    }
}
