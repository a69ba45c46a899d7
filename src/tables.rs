//! Prefecture reference table.

use crate::error::{Error, Result};

/// The 47 prefectures of Japan keyed by their JIS X 0401 code.
pub const PREFECTURES: [(u8, &str); 47] = [
    (1, "北海道"),
    (2, "青森県"),
    (3, "岩手県"),
    (4, "宮城県"),
    (5, "秋田県"),
    (6, "山形県"),
    (7, "福島県"),
    (8, "茨城県"),
    (9, "栃木県"),
    (10, "群馬県"),
    (11, "埼玉県"),
    (12, "千葉県"),
    (13, "東京都"),
    (14, "神奈川県"),
    (15, "新潟県"),
    (16, "富山県"),
    (17, "石川県"),
    (18, "福井県"),
    (19, "山梨県"),
    (20, "長野県"),
    (21, "岐阜県"),
    (22, "静岡県"),
    (23, "愛知県"),
    (24, "三重県"),
    (25, "滋賀県"),
    (26, "京都府"),
    (27, "大阪府"),
    (28, "兵庫県"),
    (29, "奈良県"),
    (30, "和歌山県"),
    (31, "鳥取県"),
    (32, "島根県"),
    (33, "岡山県"),
    (34, "広島県"),
    (35, "山口県"),
    (36, "徳島県"),
    (37, "香川県"),
    (38, "愛媛県"),
    (39, "高知県"),
    (40, "福岡県"),
    (41, "佐賀県"),
    (42, "長崎県"),
    (43, "熊本県"),
    (44, "大分県"),
    (45, "宮崎県"),
    (46, "鹿児島県"),
    (47, "沖縄県"),
];

/// The prefectures a collection run visits, in ascending code order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefectureTable {
    entries: Vec<(u8, &'static str)>,
}

impl Default for PrefectureTable {
    fn default() -> Self {
        Self {
            entries: PREFECTURES.to_vec(),
        }
    }
}

impl PrefectureTable {
    /// Restrict the table to `codes`. Order and duplicates in `codes` are ignored.
    pub fn only(codes: &[u8]) -> Result<Self> {
        if let Some(unknown) = codes.iter().find(|c| !(1..=47).contains(*c)) {
            return Err(Error::UnknownPrefecture(*unknown));
        }
        let entries = PREFECTURES
            .iter()
            .filter(|(code, _)| codes.contains(code))
            .copied()
            .collect();
        Ok(Self { entries })
    }

    pub fn name(&self, code: u8) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, name)| *name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &'static str)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_table_is_complete_and_ascending() {
        let table = PrefectureTable::default();
        assert_eq!(table.len(), 47);
        let codes: Vec<u8> = table.iter().map(|(c, _)| c).collect();
        assert_eq!(codes, (1..=47).collect::<Vec<u8>>());
        assert_eq!(table.name(13), Some("東京都"));
        assert_eq!(table.name(47), Some("沖縄県"));
        assert_eq!(table.name(48), None);
    }

    #[test]
    fn test_only_sorts_and_dedups() {
        let table = PrefectureTable::only(&[27, 13, 27, 1]).expect("valid codes");
        let codes: Vec<u8> = table.iter().map(|(c, _)| c).collect();
        assert_eq!(codes, vec![1, 13, 27]);
        assert_eq!(table.name(1), Some("北海道"));
        assert_eq!(table.name(2), None);
    }

    #[test]
    fn test_only_rejects_unknown_code() {
        assert!(matches!(
            PrefectureTable::only(&[13, 0]),
            Err(Error::UnknownPrefecture(0))
        ));
        assert!(matches!(
            PrefectureTable::only(&[48]),
            Err(Error::UnknownPrefecture(48))
        ));
    }

    #[test]
    fn test_only_empty() {
        let table = PrefectureTable::only(&[]).expect("empty selection");
        assert!(table.is_empty());
    }
}
