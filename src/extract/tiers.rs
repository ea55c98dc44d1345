//! Quality tier ladder.

use std::fmt;

/// One rung of the quality ladder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityTier {
    /// Maximum video height in pixels.
    pub max_height: u32,
    /// Preferred container extension.
    pub container: String,
}

impl QualityTier {
    pub fn new(max_height: u32, container: impl Into<String>) -> Self {
        Self {
            max_height,
            container: container.into(),
        }
    }

    /// Engine format selector: preferred container first, then any container,
    /// then a pre-merged stream, always capped at `max_height`.
    pub fn format_selector(&self) -> String {
        let h = self.max_height;
        let c = &self.container;
        format!(
            "bestvideo[height<={h}][ext={c}]+bestaudio[ext=m4a]/bestvideo[height<={h}]+bestaudio/best[height<={h}]"
        )
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}p", self.max_height)
    }
}

/// Tiers ordered from highest to lowest quality, consumed by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityLadder {
    tiers: Vec<QualityTier>,
}

impl QualityLadder {
    /// Build a ladder from heights. Heights are sorted highest first and
    /// deduplicated so the order is always top-down.
    pub fn new(heights: &[u32], container: &str) -> Self {
        let mut heights: Vec<u32> = heights.iter().copied().filter(|h| *h > 0).collect();
        heights.sort_unstable_by(|a, b| b.cmp(a));
        heights.dedup();

        Self {
            tiers: heights
                .into_iter()
                .map(|h| QualityTier::new(h, container))
                .collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&QualityTier> {
        self.tiers.get(index)
    }

    /// Whether a lower tier follows `index`.
    pub fn has_next(&self, index: usize) -> bool {
        index + 1 < self.tiers.len()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QualityTier> {
        self.tiers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ladder_is_top_down() {
        let ladder = QualityLadder::new(&[480, 1080, 720, 720], "mp4");
        let heights: Vec<u32> = ladder.iter().map(|t| t.max_height).collect();
        assert_eq!(heights, vec![1080, 720, 480]);
    }

    #[test]
    fn test_has_next() {
        let ladder = QualityLadder::new(&[720, 480], "mp4");
        assert!(ladder.has_next(0));
        assert!(!ladder.has_next(1));
        assert!(ladder.get(2).is_none());
    }

    #[test]
    fn test_format_selector_caps_height() {
        let tier = QualityTier::new(720, "mp4");
        let selector = tier.format_selector();
        assert!(selector.starts_with("bestvideo[height<=720][ext=mp4]+bestaudio[ext=m4a]"));
        assert!(selector.ends_with("/best[height<=720]"));
        assert_eq!(tier.to_string(), "720p");
    }
}
