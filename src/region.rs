//! Region classification of city codes.

/// Each key is the last prefecture code of the region. Ascending.
pub const REGION_BOUNDARIES: [(u8, &str); 8] = [
    (7, "北海道・東北"),
    (14, "関東地方"),
    (20, "北陸・甲信越"),
    (24, "東海地方"),
    (30, "関西地方"),
    (35, "中国地方"),
    (39, "四国地方"),
    (47, "九州・沖縄"),
];

/// Maps city codes to one of the broad regions of Japan.
///
/// A city code starts with its prefecture code, so a code below
/// `(boundary + 1) * 1000` belongs to a prefecture at or before `boundary`.
/// Boundaries are scanned in ascending order and the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionTable {
    boundaries: &'static [(u8, &'static str)],
}

impl Default for RegionTable {
    fn default() -> Self {
        Self {
            boundaries: &REGION_BOUNDARIES,
        }
    }
}

impl RegionTable {
    /// Table over custom `(last prefecture code, region name)` boundaries, ascending.
    pub fn new(boundaries: &'static [(u8, &'static str)]) -> Self {
        Self { boundaries }
    }

    /// Region of a numeric city code, or `None` past the last boundary.
    pub fn classify(&self, city_code: u32) -> Option<&'static str> {
        self.boundaries
            .iter()
            .find(|(boundary, _)| city_code < (u32::from(*boundary) + 1) * 1000)
            .map(|(_, name)| *name)
    }

    pub fn region_of_prefecture(&self, prefecture_code: u8) -> Option<&'static str> {
        self.boundaries
            .iter()
            .find(|(boundary, _)| prefecture_code <= *boundary)
            .map(|(_, name)| *name)
    }
}
