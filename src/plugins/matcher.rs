//! File pattern matching for command and extension discovery.
//!
//! Pattern lists are ordered. Plain patterns include files, patterns starting
//! with `!` exclude them, and `{a,b}` groups expand into alternatives before
//! compiling with [`glob::Pattern`]. A pattern without `/` is matched against
//! the file name only, so `*.js` finds `nested/dir/cmd.js` during a recursive
//! scan.

use std::path::{Path, PathBuf};

use anyhow::Result;
use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

use super::error::PluginLoadError;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
struct Rule {
    negate: bool,
    match_base: bool,
    alternatives: Vec<Pattern>,
}

impl Rule {
    fn compile(raw: &str) -> Result<Self, PluginLoadError> {
        let (negate, body) = match raw.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let match_base = !body.contains('/');
        let body = body.strip_prefix("./").unwrap_or(body);
        let alternatives = expand_braces(body)
            .iter()
            .map(|alt| {
                Pattern::new(&normalize(alt))
                    .map_err(|e| PluginLoadError::invalid_pattern(raw, e.msg.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            negate,
            match_base,
            alternatives,
        })
    }

    /// Whether the candidate passes this rule, with negation applied.
    fn accepts(&self, relative: &str) -> bool {
        let target = if self.match_base {
            relative.rsplit('/').next().unwrap_or(relative)
        } else {
            relative
        };
        let hit = self
            .alternatives
            .iter()
            .any(|p| p.matches_with(target, MATCH_OPTIONS));
        hit != self.negate
    }
}

/// Compiled, ordered include/exclude pattern list.
#[derive(Debug, Clone)]
pub struct FileMatcher {
    rules: Vec<Rule>,
}

impl FileMatcher {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, PluginLoadError> {
        let rules = patterns
            .iter()
            .map(|p| Rule::compile(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Tests a `/`-separated path relative to the scan root.
    ///
    /// Includes are consulted until the first exclude appears; from then on a
    /// candidate must pass every remaining rule. A list that starts with an
    /// exclude includes everything it does not reject.
    pub fn is_match(&self, relative: &str) -> bool {
        let mut excluding = false;
        let mut matched = false;
        for (i, rule) in self.rules.iter().enumerate() {
            if rule.negate {
                excluding = true;
                if i == 0 {
                    matched = true;
                }
            }
            let accepted = rule.accepts(relative);
            if excluding && matched && !accepted {
                return false;
            }
            if !excluding && !matched {
                matched = accepted;
            }
        }
        matched
    }
}

/// Lists regular files under `root` accepted by `matcher`.
///
/// Paths are relative to `root`, in depth-first order with entries sorted by
/// file name. With `recursive` unset only the top level is read.
pub fn list_files(root: &Path, matcher: &FileMatcher, recursive: bool) -> Result<Vec<PathBuf>> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut found = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(root)?;
        if matcher.is_match(&to_slash(relative)) {
            found.push(relative.to_path_buf());
        }
    }

    Ok(found)
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Rewrites constructs `glob` rejects into their lenient reading: a `[`
/// without a closing `]` is literal, and `**` inside a longer segment acts
/// like `*`.
fn normalize(pattern: &str) -> String {
    let segments: Vec<String> = pattern
        .split('/')
        .map(|segment| {
            if segment == "**" || !segment.contains("**") {
                return segment.to_string();
            }
            let mut collapsed = String::with_capacity(segment.len());
            for c in segment.chars() {
                if !(c == '*' && collapsed.ends_with('*')) {
                    collapsed.push(c);
                }
            }
            collapsed
        })
        .collect();
    let joined = segments.join("/");

    let chars: Vec<char> = joined.chars().collect();
    let mut out = String::with_capacity(joined.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == '[' {
            let first_member = if chars.get(i + 1) == Some(&'!') { i + 2 } else { i + 1 };
            let closes = chars
                .get(first_member + 1..)
                .is_some_and(|rest| rest.contains(&']'));
            if !closes {
                out.push_str("[[]");
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Expands `{a,b}` groups, including nested ones. Groups without a
/// top-level comma or without a closing brace stay literal.
fn expand_braces(pattern: &str) -> Vec<String> {
    let bytes = pattern.as_bytes();
    let mut search_from = 0;

    while let Some(offset) = pattern[search_from..].find('{') {
        let open = search_from + offset;
        let mut depth = 0usize;
        let mut commas = Vec::new();
        let mut close = None;

        for (i, &b) in bytes.iter().enumerate().skip(open) {
            match b {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(i);
                        break;
                    }
                }
                b',' if depth == 1 => commas.push(i),
                _ => {}
            }
        }

        let Some(close) = close else {
            break;
        };
        if commas.is_empty() {
            search_from = open + 1;
            continue;
        }

        let prefix = &pattern[..open];
        let suffix = &pattern[close + 1..];
        let mut bounds = vec![open];
        bounds.extend(commas);
        bounds.push(close);

        return bounds
            .windows(2)
            .flat_map(|w| {
                let alternative = &pattern[w[0] + 1..w[1]];
                expand_braces(&format!("{prefix}{alternative}{suffix}"))
            })
            .collect();
    }

    vec![pattern.to_string()]
}
