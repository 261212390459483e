//! Train type classification.
//!
//! Raw TDX train type names are verbose and inconsistent across rolling
//! stock generations ("自強(3000)", "普悠瑪", "區間快" ...). The board only
//! needs a small closed set of display categories, each with a fixed accent
//! color. Classification is an ordered substring table evaluated top to
//! bottom; the first match wins, and anything unmatched falls back to
//! [`Category::Other`], so the mapping is total and deterministic.

/// Display category for a train, derived from its raw type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Taroko Express tilting trains.
    Taroko,
    /// Puyuma Express tilting trains.
    Puyuma,
    /// Tze-Chiang limited express (including EMU3000 "新自強").
    TzeChiang,
    /// Chu-Kuang express.
    ChuKuang,
    /// Fu-Hsing semi-express.
    FuHsing,
    /// Fast local ("區間快") — limited-stop commuter service.
    FastLocal,
    /// Local ("區間") — all-stops commuter service.
    Local,
    /// Ordinary ("普快") legacy stock.
    Ordinary,
    /// Anything the table does not recognise.
    Other,
}

impl Category {
    /// Short display label (Chinese, matching on-board signage).
    pub fn label(&self) -> &'static str {
        match self {
            Category::Taroko => "太魯閣",
            Category::Puyuma => "普悠瑪",
            Category::TzeChiang => "自強",
            Category::ChuKuang => "莒光",
            Category::FuHsing => "復興",
            Category::FastLocal => "區間快",
            Category::Local => "區間",
            Category::Ordinary => "普快",
            Category::Other => "列車",
        }
    }

    /// Accent color for board cards.
    pub fn color(&self) -> &'static str {
        match self {
            Category::Taroko => "#b3365f",
            Category::Puyuma => "#8e3b9e",
            Category::TzeChiang => "#d0342c",
            Category::ChuKuang => "#e08e0b",
            Category::FuHsing => "#2e8b57",
            Category::FastLocal => "#1c8c93",
            Category::Local => "#2f6eb5",
            Category::Ordinary => "#6b7280",
            Category::Other => "#6b7280",
        }
    }
}

/// Ordered pattern table. "區間快" must precede "區間", and the named
/// tilting trains must precede the generic "自強" bucket, because matching
/// is by substring.
const PATTERNS: &[(&str, Category)] = &[
    ("太魯閣", Category::Taroko),
    ("普悠瑪", Category::Puyuma),
    ("自強", Category::TzeChiang),
    ("莒光", Category::ChuKuang),
    ("復興", Category::FuHsing),
    ("區間快", Category::FastLocal),
    ("區間", Category::Local),
    ("普快", Category::Ordinary),
];

/// Classify a raw train type name into a display category.
///
/// Total: every input maps to exactly one category.
pub fn classify(type_name: &str) -> Category {
    for (pattern, category) in PATTERNS {
        if type_name.contains(pattern) {
            return *category;
        }
    }
    Category::Other
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Classification is total: any string maps to some category
        /// without panicking.
        #[test]
        fn total_over_arbitrary_names(s in ".*") {
            let _ = classify(&s);
        }

        /// The fast-local pattern always takes priority over plain local.
        #[test]
        fn fast_local_beats_local(prefix in "[a-z]{0,4}", suffix in "[a-z]{0,4}") {
            let name = format!("{prefix}區間快{suffix}");
            prop_assert_eq!(classify(&name), Category::FastLocal);
        }
    }
}
