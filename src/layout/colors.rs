use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorPair {
    pub fill: String,
    pub stroke: String,
}

impl ColorPair {
    fn from_static((fill, stroke): (&str, &str)) -> Self {
        Self {
            fill: fill.to_string(),
            stroke: stroke.to_string(),
        }
    }
}

const DEFAULT_COLORS: (&str, &str) = ("#F3F4F6", "#9CA3AF");

const KNOWN_CATEGORY_COLORS: [(&str, (&str, &str)); 5] = [
    ("HACCP", ("#FDE2E1", "#D9534F")),
    ("Quality", ("#DCEBFB", "#3B82C4")),
    ("Production", ("#E3F4E1", "#4C9A48")),
    ("Logistics", ("#FFF1D6", "#D98E04")),
    ("R&D", ("#EDE4FA", "#7E57C2")),
];

const PASTEL_PALETTE: [(&str, &str); 8] = [
    ("#FCE7F3", "#DB2777"),
    ("#E0F2FE", "#0284C7"),
    ("#ECFCCB", "#65A30D"),
    ("#FEF9C3", "#CA8A04"),
    ("#EDE9FE", "#7C3AED"),
    ("#CCFBF1", "#0D9488"),
    ("#FFEDD5", "#EA580C"),
    ("#E2E8F0", "#475569"),
];

/// Fill and stroke for a task category. Known categories use a curated
/// pair; anything else hashes into a fixed pastel palette, so the same
/// string always gets the same colors.
pub fn color_for(category: Option<&str>) -> ColorPair {
    let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) else {
        return ColorPair::from_static(DEFAULT_COLORS);
    };
    if let Some((_, pair)) = KNOWN_CATEGORY_COLORS
        .iter()
        .find(|(name, _)| *name == category)
    {
        return ColorPair::from_static(*pair);
    }
    let idx = category_hash(category) as usize % PASTEL_PALETTE.len();
    ColorPair::from_static(PASTEL_PALETTE[idx])
}

fn category_hash(category: &str) -> u32 {
    category
        .chars()
        .fold(0u32, |hash, ch| hash.wrapping_mul(31).wrapping_add(ch as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haccp_has_a_fixed_pair() {
        let first = color_for(Some("HACCP"));
        assert_eq!(first.fill, "#FDE2E1");
        assert_eq!(first.stroke, "#D9534F");
        assert_eq!(first, color_for(Some("HACCP")));
    }

    #[test]
    fn missing_category_is_neutral() {
        let neutral = ColorPair::from_static(DEFAULT_COLORS);
        assert_eq!(color_for(None), neutral);
        assert_eq!(color_for(Some("")), neutral);
        assert_eq!(color_for(Some("   ")), neutral);
    }

    #[test]
    fn unknown_category_is_stable() {
        let a = color_for(Some("UnknownCategoryXYZ"));
        let b = color_for(Some("UnknownCategoryXYZ"));
        assert_eq!(a, b);
        assert!(PASTEL_PALETTE.iter().any(|(fill, _)| *fill == a.fill));
    }

    #[test]
    fn hash_is_order_sensitive() {
        assert_ne!(category_hash("ab"), category_hash("ba"));
        assert_eq!(category_hash("ab"), 97 * 31 + 98);
    }

    #[test]
    fn category_is_trimmed_before_lookup() {
        assert_eq!(color_for(Some(" Quality ")), color_for(Some("Quality")));
    }
}
