use chrono::Utc;
use super::types::SelectedFile;

/// 模拟文件的固定大小/格式标签
const DETAIL_LABEL: &str = "15.2 MB • MP3 Audio";

/// 文件选择器，便于测试时注入固定文件
pub trait FilePicker: Send + Sync {
    fn pick(&self) -> SelectedFile;
}

/// 生成带当前时间戳的模拟录音文件，不访问磁盘
#[derive(Debug, Clone, Default)]
pub struct SimulatedPicker;

impl FilePicker for SimulatedPicker {
    fn pick(&self) -> SelectedFile {
        let timestamp = Utc::now().format("%Y-%m-%d %H.%M.%S");
        SelectedFile {
            display_name: format!("Practice_{}.mp3", timestamp),
            detail_label: DETAIL_LABEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picked_file_has_expected_shape() {
        let file = SimulatedPicker.pick();
        assert!(file.display_name.starts_with("Practice_"));
        assert!(file.display_name.ends_with(".mp3"));
        assert_eq!(file.detail_label, "15.2 MB • MP3 Audio");
    }
}
