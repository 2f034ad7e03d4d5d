/// Version directory discovery for installed Forge / NeoForge servers
use crate::launcher::error::{LaunchError, LaunchResult};
use crate::launcher::types::{LoaderKind, LoaderRoot, VersionCandidate};
use crate::utils::version::{compare_keys, VersionKey};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::path::Path;

static DOTTED_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)+$").expect("version pattern is valid"));

/// Check a directory name against the grammar of the loader it lives under.
///
/// Forge: `<anything with a digit>-<dotted version>`, e.g. `1.20.1-47.4.0`.
/// NeoForge: a bare dotted version, e.g. `20.4.100`.
pub fn is_valid_version_name(kind: LoaderKind, name: &str) -> bool {
    match kind {
        LoaderKind::Forge => {
            name.chars().any(|c| c.is_ascii_digit())
                && name
                    .split_once('-')
                    .is_some_and(|(_, loader)| DOTTED_VERSION.is_match(loader))
        }
        LoaderKind::NeoForge => DOTTED_VERSION.is_match(name),
    }
}

/// List the version directories directly below `root`.
///
/// The grammar is chosen by the root directory's own name, so only roots named
/// `forge` or `neoforge` can yield candidates. A missing or unreadable root is
/// not an error; it just contributes nothing. Results are sorted by name so the
/// order does not depend on the platform's directory listing.
pub fn scan(root: &LoaderRoot) -> Vec<VersionCandidate> {
    if !root.path.is_dir() {
        log::warn!(
            "{} directory not found or is not a directory: {:?}",
            root.kind,
            root.path
        );
        return Vec::new();
    }

    log::info!("Found {} directory: {:?}", root.kind, root.path);

    let Some(kind) = parent_kind(&root.path) else {
        log::warn!(
            "Directory {:?} is not named after a supported loader, skipping",
            root.path
        );
        return Vec::new();
    };
    if kind != root.kind {
        log::warn!(
            "Root {:?} was configured as {} but is named like {}; using {}",
            root.path,
            root.kind,
            kind,
            kind
        );
    }

    let entries = match std::fs::read_dir(&root.path) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Unable to list files in directory {:?}: {}", root.path, e);
            return Vec::new();
        }
    };

    let mut candidates: Vec<VersionCandidate> = entries
        .flatten()
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            if is_valid_version_name(kind, &name) {
                Some(VersionCandidate {
                    path: entry.path(),
                    kind,
                    name,
                })
            } else {
                log::debug!("Ignoring non-version directory {:?}", entry.path());
                None
            }
        })
        .collect();

    candidates.sort_by(|a, b| a.name.cmp(&b.name));
    log::debug!(
        "{} version directories under {:?}: {:?}",
        candidates.len(),
        root.path,
        candidates.iter().map(|c| &c.name).collect::<Vec<_>>()
    );
    candidates
}

/// Scan every root in order and concatenate the results
pub fn scan_all(roots: &[LoaderRoot]) -> Vec<VersionCandidate> {
    roots.iter().flat_map(scan).collect()
}

fn parent_kind(root: &Path) -> Option<LoaderKind> {
    root.file_name()
        .and_then(|n| n.to_str())
        .and_then(LoaderKind::from_dir_name)
}

/// Pick the candidate with the greatest version key.
///
/// On equal keys the earliest candidate wins, so the result is stable for a
/// given input order.
pub fn pick_latest(candidates: &[VersionCandidate]) -> LaunchResult<&VersionCandidate> {
    let mut latest: Option<(&VersionCandidate, VersionKey)> = None;

    for candidate in candidates {
        let key = VersionKey::extract(&candidate.name);
        let newer = match &latest {
            Some((_, best)) => compare_keys(&key, best) == Ordering::Greater,
            None => true,
        };
        if newer {
            latest = Some((candidate, key));
        }
    }

    match latest {
        Some((candidate, key)) => {
            log::info!(
                "Latest version: {} {} (key {}) at {:?}",
                candidate.kind,
                candidate.name,
                key,
                candidate.path
            );
            Ok(candidate)
        }
        None => Err(LaunchError::NoCandidates { roots: Vec::new() }),
    }
}

/// Scan `roots` and return the newest version directory across all of them
pub fn find_latest(roots: &[LoaderRoot]) -> LaunchResult<VersionCandidate> {
    let candidates = scan_all(roots);
    match pick_latest(&candidates) {
        Ok(latest) => Ok(latest.clone()),
        Err(LaunchError::NoCandidates { .. }) => {
            log::error!("No valid version directories found.");
            Err(LaunchError::NoCandidates {
                roots: roots.iter().map(|r| r.path.clone()).collect(),
            })
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn candidate(kind: LoaderKind, name: &str) -> VersionCandidate {
        VersionCandidate {
            path: Path::new("libraries").join(kind.as_str()).join(name),
            kind,
            name: name.to_string(),
        }
    }

    #[test]
    fn forge_grammar() {
        assert!(is_valid_version_name(LoaderKind::Forge, "1.20.1-47.4.0"));
        assert!(is_valid_version_name(LoaderKind::Forge, "1.12.2-14.23.5.2860"));
        assert!(is_valid_version_name(LoaderKind::Forge, "1.20.1-47.4"));
        // Substring after the first hyphen must be a dotted version
        assert!(!is_valid_version_name(LoaderKind::Forge, "1.20.1-47.4.0-beta"));
        assert!(!is_valid_version_name(LoaderKind::Forge, "1.20.1-47"));
        assert!(!is_valid_version_name(LoaderKind::Forge, "47.4.0"));
        assert!(!is_valid_version_name(LoaderKind::Forge, "notaversion"));
    }

    #[test]
    fn neoforge_grammar() {
        assert!(is_valid_version_name(LoaderKind::NeoForge, "20.4.100"));
        assert!(is_valid_version_name(LoaderKind::NeoForge, "21.1"));
        assert!(!is_valid_version_name(LoaderKind::NeoForge, "21"));
        assert!(!is_valid_version_name(LoaderKind::NeoForge, "21.0.0-beta"));
        assert!(!is_valid_version_name(LoaderKind::NeoForge, "1.20.1-47.4.0"));
        // ASCII digits only
        assert!(!is_valid_version_name(LoaderKind::NeoForge, "٢٠.٤"));
        assert!(!is_valid_version_name(LoaderKind::Forge, "1.20.1-٤٧.٤"));
    }

    #[test]
    fn scan_keeps_only_valid_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let forge = tmp.path().join("forge");
        fs::create_dir_all(forge.join("1.20.1-47.4.0")).unwrap();
        fs::create_dir_all(forge.join("notaversion")).unwrap();
        fs::write(forge.join("readme.txt"), "hello").unwrap();

        let found = scan(&LoaderRoot::new(&forge, LoaderKind::Forge));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "1.20.1-47.4.0");
        assert_eq!(found[0].kind, LoaderKind::Forge);
        assert_eq!(found[0].path, forge.join("1.20.1-47.4.0"));
    }

    #[test]
    fn scan_uses_directory_name_for_grammar() {
        let tmp = tempfile::tempdir().unwrap();

        // Neoforge-style names under a directory that is not a loader name
        let other = tmp.path().join("fabric");
        fs::create_dir_all(other.join("20.4.100")).unwrap();
        assert!(scan(&LoaderRoot::new(&other, LoaderKind::NeoForge)).is_empty());

        // Misconfigured kind: the directory name decides
        let neo = tmp.path().join("neoforge");
        fs::create_dir_all(neo.join("20.4.100")).unwrap();
        let found = scan(&LoaderRoot::new(&neo, LoaderKind::Forge));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, LoaderKind::NeoForge);
    }

    #[test]
    fn scan_missing_root_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let root = LoaderRoot::new(tmp.path().join("forge"), LoaderKind::Forge);
        assert!(scan(&root).is_empty());

        // A plain file in place of the root
        fs::write(tmp.path().join("neoforge"), "").unwrap();
        let root = LoaderRoot::new(tmp.path().join("neoforge"), LoaderKind::NeoForge);
        assert!(scan(&root).is_empty());
    }

    #[test]
    fn scan_order_is_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        let neo = tmp.path().join("neoforge");
        for name in ["21.1.65", "20.4.100", "20.2.3"] {
            fs::create_dir_all(neo.join(name)).unwrap();
        }
        let names: Vec<String> = scan(&LoaderRoot::new(&neo, LoaderKind::NeoForge))
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["20.2.3", "20.4.100", "21.1.65"]);
    }

    #[test]
    fn pick_latest_across_loaders() {
        let candidates = vec![
            candidate(LoaderKind::NeoForge, "20.4.100"),
            candidate(LoaderKind::Forge, "1.20.1-47.4.0"),
        ];
        let latest = pick_latest(&candidates).unwrap();
        assert_eq!(latest.name, "1.20.1-47.4.0");
    }

    #[test]
    fn pick_latest_prefers_longer_key_and_first_tie() {
        let candidates = vec![
            candidate(LoaderKind::NeoForge, "21.1"),
            candidate(LoaderKind::NeoForge, "21.1.0"),
        ];
        assert_eq!(pick_latest(&candidates).unwrap().name, "21.1.0");

        // 1.20.1-47.4.0 and 1.19.2-47.4.0 share a key; first one stays
        let ties = vec![
            candidate(LoaderKind::Forge, "1.19.2-47.4.0"),
            candidate(LoaderKind::Forge, "1.20.1-47.4.0"),
        ];
        assert_eq!(pick_latest(&ties).unwrap().name, "1.19.2-47.4.0");
    }

    #[test]
    fn pick_latest_empty_fails() {
        let err = pick_latest(&[]).unwrap_err();
        assert!(matches!(err, LaunchError::NoCandidates { .. }));
    }

    #[test]
    fn find_latest_reports_roots() {
        let tmp = tempfile::tempdir().unwrap();
        let roots = vec![
            LoaderRoot::under_libraries(tmp.path(), LoaderKind::NeoForge),
            LoaderRoot::under_libraries(tmp.path(), LoaderKind::Forge),
        ];
        match find_latest(&roots) {
            Err(LaunchError::NoCandidates { roots: reported }) => assert_eq!(reported.len(), 2),
            other => panic!("expected NoCandidates, got {:?}", other),
        }
    }
}
