//! Test-file pattern expansion.
//!
//! Expands the positional file/directory/glob arguments (or the default
//! patterns when none are given) into a sorted, de-duplicated list of
//! test files by walking the directory tree and matching relative paths
//! against a small glob syntax: `*` within one path component, `**`
//! across components.

use std::path::{Path, PathBuf};

/// Patterns applied when no positional arguments are given.
pub const DEFAULT_PATTERNS: &[&str] = &[
    "test.ts",
    "test-*.ts",
    "test/**/*.ts",
    "**/__tests__/**/*.ts",
    "**/*.test.ts",
];

/// Source file extensions recognized when a directory is given directly.
const SOURCE_EXTS: &[&str] = &["ts", "tsx"];

/// Expands patterns relative to `base` into matching file paths.
///
/// Each pattern is tried in order: an existing file is taken as-is, an
/// existing directory contributes every `.ts`/`.tsx` file beneath it,
/// and anything else is treated as a glob matched against paths
/// relative to `base`. The result is sorted and de-duplicated.
pub fn expand_patterns(
    base: &Path,
    patterns: &[String],
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let direct = base.join(pattern);
        if direct.is_file() {
            files.push(direct);
        } else if direct.is_dir() {
            walk_dir(&direct, &mut |path| {
                if has_source_ext(path) {
                    files.push(path.to_path_buf());
                }
            })?;
        } else {
            walk_dir(base, &mut |path| {
                if let Ok(rel) = path.strip_prefix(base) {
                    if matches_pattern(pattern, rel) {
                        files.push(path.to_path_buf());
                    }
                }
            })?;
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

/// Returns `true` if the relative path matches the glob pattern.
pub fn matches_pattern(pattern: &str, rel: &Path) -> bool {
    let pat: Vec<&str> = pattern.split('/').collect();
    let comps: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let comps: Vec<&str> = comps.iter().map(String::as_str).collect();
    match_components(&pat, &comps)
}

/// Matches pattern components against path components; `**` spans zero
/// or more components.
fn match_components(pat: &[&str], comps: &[&str]) -> bool {
    match pat.first() {
        None => comps.is_empty(),
        Some(&"**") => (0..=comps.len()).any(|i| match_components(&pat[1..], &comps[i..])),
        Some(first) => match comps.first() {
            Some(name) => {
                match_component(first, name) && match_components(&pat[1..], &comps[1..])
            }
            None => false,
        },
    }
}

/// Matches one pattern component against one path component; `*`
/// matches any run of characters (including none) within the component.
fn match_component(pat: &str, name: &str) -> bool {
    let parts: Vec<&str> = pat.split('*').collect();
    if parts.len() == 1 {
        return pat == name;
    }

    let mut rest = name;
    match rest.strip_prefix(parts[0]) {
        Some(r) => rest = r,
        None => return false,
    }
    let last = parts[parts.len() - 1];
    match rest.strip_suffix(last) {
        Some(r) => rest = r,
        None => return false,
    }
    for mid in &parts[1..parts.len() - 1] {
        if mid.is_empty() {
            continue;
        }
        match rest.find(mid) {
            Some(i) => rest = &rest[i + mid.len()..],
            None => return false,
        }
    }
    true
}

/// Recursively walks `dir`, invoking the callback for every file.
///
/// Skips `node_modules` and hidden directories so that default patterns
/// like `**/*.test.ts` don't sweep up dependency trees.
fn walk_dir(
    dir: &Path,
    on_file: &mut dyn FnMut(&Path),
) -> Result<(), Box<dyn std::error::Error>> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name == "node_modules" || name.starts_with('.') {
                continue;
            }
            walk_dir(&path, on_file)?;
        } else {
            on_file(&path);
        }
    }
    Ok(())
}

/// Returns `true` if the file has a recognized source extension.
fn has_source_ext(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SOURCE_EXTS.contains(&e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(base: &Path, rel: &str) {
        let path = base.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, "").unwrap();
    }

    fn expand(base: &Path, patterns: &[&str]) -> Vec<String> {
        let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        expand_patterns(base, &patterns)
            .unwrap()
            .into_iter()
            .map(|p| {
                p.strip_prefix(base)
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }

    #[test]
    fn literal_component_match() {
        assert!(matches_pattern("test.ts", Path::new("test.ts")));
        assert!(!matches_pattern("test.ts", Path::new("other.ts")));
        assert!(!matches_pattern("test.ts", Path::new("sub/test.ts")));
    }

    #[test]
    fn star_within_component() {
        assert!(matches_pattern("test-*.ts", Path::new("test-foo.ts")));
        assert!(matches_pattern("test-*.ts", Path::new("test-.ts")));
        assert!(!matches_pattern("test-*.ts", Path::new("test.ts")));
        assert!(!matches_pattern("test-*.ts", Path::new("sub/test-foo.ts")));
    }

    #[test]
    fn star_does_not_cross_separators() {
        assert!(!matches_pattern("*.ts", Path::new("sub/file.ts")));
    }

    #[test]
    fn double_star_spans_components() {
        assert!(matches_pattern("test/**/*.ts", Path::new("test/a.ts")));
        assert!(matches_pattern("test/**/*.ts", Path::new("test/deep/nested/a.ts")));
        assert!(!matches_pattern("test/**/*.ts", Path::new("src/a.ts")));
    }

    #[test]
    fn double_star_matches_zero_components() {
        assert!(matches_pattern("**/*.test.ts", Path::new("a.test.ts")));
        assert!(matches_pattern("**/*.test.ts", Path::new("deep/a.test.ts")));
        assert!(!matches_pattern("**/*.test.ts", Path::new("a.ts")));
    }

    #[test]
    fn tests_dir_pattern() {
        assert!(matches_pattern(
            "**/__tests__/**/*.ts",
            Path::new("src/__tests__/a.ts")
        ));
        assert!(matches_pattern(
            "**/__tests__/**/*.ts",
            Path::new("__tests__/deep/a.ts")
        ));
        assert!(!matches_pattern(
            "**/__tests__/**/*.ts",
            Path::new("src/tests/a.ts")
        ));
    }

    #[test]
    fn multiple_stars_in_component() {
        assert!(match_component("a*b*c", "aXbYc"));
        assert!(match_component("a*b*c", "abc"));
        assert!(!match_component("a*b*c", "acb"));
    }

    #[test]
    fn expands_default_patterns() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "test.ts");
        touch(dir.path(), "test-util.ts");
        touch(dir.path(), "test/nested/spec.ts");
        touch(dir.path(), "src/__tests__/unit.ts");
        touch(dir.path(), "src/thing.test.ts");
        touch(dir.path(), "src/thing.ts");
        touch(dir.path(), "README.md");

        let patterns: Vec<String> = DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect();
        let found = expand_patterns(dir.path(), &patterns).unwrap();
        let names: Vec<String> = found
            .iter()
            .map(|p| {
                p.strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();

        assert_eq!(
            names,
            vec![
                "src/__tests__/unit.ts",
                "src/thing.test.ts",
                "test/nested/spec.ts",
                "test-util.ts",
                "test.ts",
            ]
        );
    }

    #[test]
    fn direct_file_argument() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "anything.ts");
        let found = expand(dir.path(), &["anything.ts"]);
        assert_eq!(found, vec!["anything.ts"]);
    }

    #[test]
    fn directory_argument_collects_sources() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "test/a.ts");
        touch(dir.path(), "test/b.tsx");
        touch(dir.path(), "test/fixture.json");

        let found = expand(dir.path(), &["test"]);
        assert_eq!(found, vec!["test/a.ts", "test/b.tsx"]);
    }

    #[test]
    fn node_modules_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.test.ts");
        touch(dir.path(), "node_modules/dep/b.test.ts");

        let found = expand(dir.path(), &["**/*.test.ts"]);
        assert_eq!(found, vec!["a.test.ts"]);
    }

    #[test]
    fn results_are_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "test.ts");

        let found = expand(dir.path(), &["test.ts", "test.ts", "*.ts"]);
        assert_eq!(found, vec!["test.ts"]);
    }

    #[test]
    fn unmatched_glob_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "main.rs");
        let found = expand(dir.path(), &["*.ts"]);
        assert!(found.is_empty());
    }
}
