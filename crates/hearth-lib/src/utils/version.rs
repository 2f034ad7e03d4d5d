use std::cmp::Ordering;

/// Numeric decomposition of a version directory name, used only for ordering.
///
/// `Ord` is lexicographic over the components; when one key is a prefix of the
/// other, the longer key is greater (`1.20 < 1.20.0`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionKey(Vec<u64>);

impl VersionKey {
    pub fn new(parts: Vec<u64>) -> Self {
        VersionKey(parts)
    }

    /// Extract the key from a raw directory name.
    ///
    /// Forge directories are named `<mc>-<loader>` (e.g. `1.20.1-47.4.0`) and only
    /// the loader part after the last hyphen is significant. NeoForge directories
    /// are plain `X.Y.Z` and are used whole.
    pub fn extract(name: &str) -> Self {
        let version = if name.contains("forge") {
            match name.rsplit_once('-') {
                Some((_, tail)) => tail,
                None => "0",
            }
        } else {
            name.rsplit_once('-').map(|(_, tail)| tail).unwrap_or(name)
        };

        VersionKey(version.split('.').map(Self::parse_part).collect())
    }

    fn parse_part(segment: &str) -> u64 {
        let digits: String = segment.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return 0;
        }
        // Only overflow can fail here
        digits.parse().unwrap_or(u64::MAX)
    }

    pub fn parts(&self) -> &[u64] {
        &self.0
    }
}

impl std::fmt::Display for VersionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", joined)
    }
}

impl From<Vec<u64>> for VersionKey {
    fn from(parts: Vec<u64>) -> Self {
        VersionKey(parts)
    }
}

pub fn compare_keys(a: &VersionKey, b: &VersionKey) -> Ordering {
    a.cmp(b)
}
