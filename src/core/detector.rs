use crate::domain::model::StreamId;
use std::collections::HashMap;

/// 單一串流上一次輸出的報告
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamState {
    last_report: String,
}

impl StreamState {
    pub fn last_report(&self) -> &str {
        &self.last_report
    }

    /// 判斷新報告是否需要通知，並無條件記住新報告。
    pub fn evaluate(&mut self, report: &str) -> bool {
        let notify = !report.is_empty() && report != self.last_report;
        if self.last_report != report {
            self.last_report.clear();
            self.last_report.push_str(report);
        }
        notify
    }
}

/// 每個串流各自獨立的變化偵測
#[derive(Debug, Default)]
pub struct ChangeDetector {
    streams: HashMap<StreamId, StreamState>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(&mut self, stream: StreamId, report: &str) -> bool {
        self.streams.entry(stream).or_default().evaluate(report)
    }

    pub fn last_report(&self, stream: StreamId) -> &str {
        self.streams
            .get(&stream)
            .map(StreamState::last_report)
            .unwrap_or("")
    }
}
