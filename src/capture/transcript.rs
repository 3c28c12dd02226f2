/// Folds partial and final recognition results into one cumulative transcript
///
/// Finalized segments are kept; the latest partial is appended after them and replaced by the
/// next partial or final.
#[derive(Debug, Default, Clone)]
pub struct TranscriptAccumulator {
    finals: Vec<String>,
    partial: Option<String>,
}

impl TranscriptAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a recognition result and return the cumulative text
    pub fn push(&mut self, text: &str, partial: bool) -> String {
        let text = text.trim();
        if partial {
            self.partial = Some(text.to_string()).filter(|t| !t.is_empty());
        } else {
            self.partial = None;
            if !text.is_empty() {
                self.finals.push(text.to_string());
            }
        }
        self.text()
    }

    pub fn text(&self) -> String {
        self.finals
            .iter()
            .map(String::as_str)
            .chain(self.partial.as_deref())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn clear(&mut self) {
        self.finals.clear();
        self.partial = None;
    }
}
