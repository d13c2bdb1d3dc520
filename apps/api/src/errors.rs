use serde::Serialize;

/// Per-request error accumulator. Stages append human-readable strings to the
/// relevant bucket and processing continues unless the condition is fatal.
///
/// No stage error escapes past the request handler — external-capability
/// failures are caught at the call site and converted into bucket entries.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ErrorBucket {
    pub templates: Vec<String>,
    pub fonts: Vec<String>,
    pub generation: Vec<String>,
    pub misc: Vec<String>,
}

impl ErrorBucket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn template(&mut self, msg: impl Into<String>) {
        self.templates.push(msg.into());
    }

    pub fn font(&mut self, msg: impl Into<String>) {
        self.fonts.push(msg.into());
    }

    pub fn generation(&mut self, msg: impl Into<String>) {
        self.generation.push(msg.into());
    }

    pub fn misc(&mut self, msg: impl Into<String>) {
        self.misc.push(msg.into());
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
            && self.fonts.is_empty()
            && self.generation.is_empty()
            && self.misc.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bucket_is_empty() {
        assert!(ErrorBucket::new().is_empty());
    }

    #[test]
    fn test_bucket_routes_messages() {
        let mut bucket = ErrorBucket::new();
        bucket.template("no frames");
        bucket.font("Inter Bold failed to load");
        bucket.generation("planner returned no slides");
        bucket.misc("cancelled");

        assert!(!bucket.is_empty());
        assert_eq!(bucket.templates, vec!["no frames"]);
        assert_eq!(bucket.fonts.len(), 1);
        assert_eq!(bucket.generation.len(), 1);
        assert_eq!(bucket.misc.len(), 1);
    }

    #[test]
    fn test_bucket_serializes_all_four_keys() {
        let bucket = ErrorBucket::new();
        let value = serde_json::to_value(&bucket).unwrap();
        for key in ["templates", "fonts", "generation", "misc"] {
            assert!(value.get(key).is_some(), "missing bucket key {key}");
        }
    }
}
