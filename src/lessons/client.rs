use async_trait::async_trait;
use url::Url;
use super::errors::{FetchError, Result};
use super::types::{Lesson, LessonResponse};

/// 课程数据源，便于测试时注入假数据
#[async_trait]
pub trait LessonSource: Send + Sync {
    async fn fetch_lessons(&self) -> Result<Vec<Lesson>>;
}

/// Lesson catalog API client
#[derive(Debug, Clone)]
pub struct LessonClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl LessonClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: Url::parse(endpoint)?,
        })
    }
}

#[async_trait]
impl LessonSource for LessonClient {
    async fn fetch_lessons(&self) -> Result<Vec<Lesson>> {
        let response = self.client.get(self.endpoint.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::server(status.as_u16()));
        }

        // 先取原文再解码，解码失败与网络失败分开归类
        let body = response.text().await?;
        let decoded: LessonResponse = serde_json::from_str(&body)?;

        Ok(decoded.lessons)
    }
}
