//! Include/exclude glob filtering of changed paths

use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        source: regex::Error,
    },
}

/// A compiled glob.
///
/// `*` and `?` stay within one path segment, `**` crosses segments. A
/// pattern without `/` is also tried against the file name alone.
#[derive(Debug, Clone)]
struct Glob {
    regex: Regex,
    match_file_name: bool,
}

impl Glob {
    fn new(pattern: &str) -> Result<Self, FilterError> {
        let regex = Regex::new(&glob_to_regex(pattern)).map_err(|source| FilterError::InvalidGlob {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            regex,
            match_file_name: !pattern.contains('/'),
        })
    }

    fn matches(&self, path: &str) -> bool {
        if self.regex.is_match(path) {
            return true;
        }
        self.match_file_name
            && path
                .rsplit('/')
                .next()
                .is_some_and(|name| self.regex.is_match(name))
    }
}

fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::from("^");
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                if chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("(?:.*/)?");
                } else {
                    out.push_str(".*");
                }
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            c => out.push_str(&regex::escape(&c.to_string())),
        }
    }

    out.push('$');
    out
}

/// Decides which changed files make it into the tour
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    include: Vec<Glob>,
    exclude: Vec<Glob>,
}

impl PathFilter {
    pub fn new<I, E, S, T>(include: I, exclude: E) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Ok(Self {
            include: include
                .into_iter()
                .map(|p| Glob::new(p.as_ref()))
                .collect::<Result<_, _>>()?,
            exclude: exclude
                .into_iter()
                .map(|p| Glob::new(p.as_ref()))
                .collect::<Result<_, _>>()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// True when `path` matches an include (or there are none) and no exclude
    pub fn allows(&self, path: &str) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|g| g.matches(path));
        included && !self.exclude.iter().any(|g| g.matches(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(include: &[&str], exclude: &[&str]) -> PathFilter {
        PathFilter::new(include.iter(), exclude.iter()).unwrap()
    }

    #[test]
    fn test_empty_filter_allows_everything() {
        let f = PathFilter::default();
        assert!(f.is_empty());
        assert!(f.allows("anything/at/all.rs"));
    }

    #[test]
    fn test_star_stays_in_segment() {
        let f = filter(&["src/*.rs"], &[]);
        assert!(f.allows("src/main.rs"));
        assert!(!f.allows("src/nested/mod.rs"));
        assert!(!f.allows("tests/main.rs"));
    }

    #[test]
    fn test_double_star_crosses_segments() {
        let f = filter(&["src/**/*.rs"], &[]);
        assert!(f.allows("src/main.rs"));
        assert!(f.allows("src/a/b/c.rs"));
        assert!(!f.allows("src/a/b/c.py"));

        let f = filter(&["docs/**"], &[]);
        assert!(f.allows("docs/guide/intro.md"));
    }

    #[test]
    fn test_pattern_without_slash_matches_file_name() {
        let f = filter(&[], &["*.lock", "package-lock.json"]);
        assert!(!f.allows("Cargo.lock"));
        assert!(!f.allows("sub/dir/yarn.lock"));
        assert!(!f.allows("web/package-lock.json"));
        assert!(f.allows("src/lock.rs"));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let f = filter(&["src/**"], &["src/generated/**"]);
        assert!(f.allows("src/lib.rs"));
        assert!(!f.allows("src/generated/api.rs"));
        assert!(!f.allows("README.md"));
    }

    #[test]
    fn test_question_mark_and_literals() {
        let f = filter(&["v?.txt", "a+b.(c)"], &[]);
        assert!(f.allows("v1.txt"));
        assert!(!f.allows("v10.txt"));
        assert!(f.allows("a+b.(c)"));
        assert!(!f.allows("aab.(c)"));
    }

    #[test]
    fn test_glob_to_regex() {
        assert_eq!(glob_to_regex("*.rs"), r"^[^/]*\.rs$");
        assert_eq!(glob_to_regex("**/x"), "^(?:.*/)?x$");
    }
}
