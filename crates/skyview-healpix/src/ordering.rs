//! Pixel ordering schemes.

use std::fmt;

/// The two HEALPix pixel numbering schemes.
///
/// Resolved once when a map is loaded so aggregation loops never branch on
/// header strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PixelOrdering {
    /// Iso-latitude rings, numbered from the north pole.
    Ring,
    /// Hierarchical: the four children of a pixel occupy a contiguous block.
    #[default]
    Nest,
}

impl PixelOrdering {
    /// Resolve an `ORDERING` header value.
    ///
    /// Anything beginning with `R` is ring ordering; everything else,
    /// including an empty value, is treated as nested.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Self {
        if keyword.trim_start().starts_with(['R', 'r']) {
            PixelOrdering::Ring
        } else {
            PixelOrdering::Nest
        }
    }
}

impl fmt::Display for PixelOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelOrdering::Ring => f.write_str("RING"),
            PixelOrdering::Nest => f.write_str("NESTED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_keyword() {
        assert_eq!(PixelOrdering::from_keyword("RING"), PixelOrdering::Ring);
        assert_eq!(PixelOrdering::from_keyword("  ring"), PixelOrdering::Ring);
    }

    #[test]
    fn test_other_keywords_are_nested() {
        assert_eq!(PixelOrdering::from_keyword("NESTED"), PixelOrdering::Nest);
        assert_eq!(PixelOrdering::from_keyword("NEST"), PixelOrdering::Nest);
        assert_eq!(PixelOrdering::from_keyword(""), PixelOrdering::Nest);
    }

    #[test]
    fn test_display_matches_header_values() {
        assert_eq!(PixelOrdering::Ring.to_string(), "RING");
        assert_eq!(PixelOrdering::Nest.to_string(), "NESTED");
    }
}
