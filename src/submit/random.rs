use rand::Rng;

/// 失败判定的随机源，便于测试时注入固定结果
pub trait CoinFlip: Send + Sync {
    /// Returns true when the simulated transfer should fail.
    fn flip(&self) -> bool;
}

/// 基于线程本地随机数的硬币
#[derive(Debug, Clone)]
pub struct ThreadRngFlip {
    probability: f64,
}

impl ThreadRngFlip {
    /// 概率会被截断到 [0.0, 1.0]
    pub fn new(probability: f64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
        }
    }
}

impl Default for ThreadRngFlip {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl CoinFlip for ThreadRngFlip {
    fn flip(&self) -> bool {
        rand::thread_rng().gen_bool(self.probability)
    }
}
