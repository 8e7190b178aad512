//! Git output parsers

use super::error::GitError;
use super::types::{BranchListing, RepositoryStatus};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Parse `git status --porcelain=v2` output into disjoint path sets.
///
/// Each path lands in exactly one set: renames win, then index additions,
/// then deletions on either side, and everything else counts as modified.
pub fn parse_status_output(output: &str) -> RepositoryStatus {
    let mut status = RepositoryStatus::new();

    for line in output.lines() {
        if line.is_empty() || line.starts_with("# ") || line.starts_with("! ") {
            continue;
        }

        if let Some(path) = line.strip_prefix("? ") {
            status.not_added.insert(unquote_path(path));
        } else if line.starts_with("1 ") {
            // 1 <XY> <sub> <mH> <mI> <mW> <hH> <hI> <path>
            let parts: Vec<&str> = line.splitn(9, ' ').collect();
            if parts.len() == 9 {
                classify_ordinary(&mut status, parts[1], unquote_path(parts[8]));
            }
        } else if line.starts_with("2 ") {
            // 2 <XY> <sub> <mH> <mI> <mW> <hH> <hI> <X><score> <path><tab><origPath>
            let parts: Vec<&str> = line.splitn(10, ' ').collect();
            if parts.len() == 10 {
                let new_path = parts[9].split('\t').next().unwrap_or(parts[9]);
                status.renamed.insert(unquote_path(new_path));
            }
        } else if line.starts_with("u ") {
            // u <XY> <sub> <m1> <m2> <m3> <mW> <h1> <h2> <h3> <path>
            let parts: Vec<&str> = line.splitn(11, ' ').collect();
            if parts.len() == 11 {
                status.modified.insert(unquote_path(parts[10]));
            }
        }
    }

    status
}

fn classify_ordinary(status: &mut RepositoryStatus, xy: &str, path: PathBuf) {
    let mut codes = xy.chars();
    let x = codes.next().unwrap_or('.');
    let y = codes.next().unwrap_or('.');

    let bucket = if x == 'A' {
        &mut status.created
    } else if x == 'D' || y == 'D' {
        &mut status.deleted
    } else {
        &mut status.modified
    };
    bucket.insert(path);
}

/// Undo git's C-style quoting of paths with special or non-ASCII bytes
fn unquote_path(raw: &str) -> PathBuf {
    let Some(inner) = raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')) else {
        return PathBuf::from(raw);
    };

    let mut bytes = Vec::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next() {
            Some('n') => bytes.push(b'\n'),
            Some('t') => bytes.push(b'\t'),
            Some('"') => bytes.push(b'"'),
            Some('\\') => bytes.push(b'\\'),
            Some(d) if d.is_digit(8) => {
                let mut value = d.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|n| n.to_digit(8)) {
                        Some(next) => {
                            value = value * 8 + next;
                            chars.next();
                        }
                        None => break,
                    }
                }
                bytes.push(value as u8);
            }
            Some(other) => {
                bytes.push(b'\\');
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(other.encode_utf8(&mut buf).as_bytes());
            }
            None => bytes.push(b'\\'),
        }
    }

    PathBuf::from(String::from_utf8_lossy(&bytes).into_owned())
}

/// Parse `git branch` output (with or without `--all`)
pub fn parse_branch_output(output: &str) -> BranchListing {
    let mut listing = BranchListing::default();

    for line in output.lines() {
        let Some(rest) = line.get(2..) else {
            continue;
        };
        let is_current = line.starts_with('*');
        let name = rest.trim();

        // "(HEAD detached at 1a2b3c)" and similar placeholders are not branches
        if name.is_empty() || name.starts_with('(') {
            continue;
        }

        let name = match name.split_once(" -> ") {
            Some((symbolic, _)) => symbolic,
            None => name,
        };

        if is_current {
            listing.current = Some(name.to_string());
        }
        listing.all.push(name.to_string());
    }

    listing
}

/// Parse `git tag --list` output
pub fn parse_tag_output(output: &str) -> BTreeSet<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Map a failed git invocation onto the most specific [`GitError`]
pub fn classify_failure(command: &str, stdout: &str, stderr: &str) -> GitError {
    let combined = format!("{stdout}\n{stderr}");

    if combined.contains("not a git repository") {
        GitError::NotARepository
    } else if combined.contains("CONFLICT") || combined.contains("Automatic merge failed") {
        GitError::MergeConflict {
            detail: first_matching_line(&combined, &["CONFLICT", "Automatic merge failed"]),
        }
    } else if combined.contains("no tracking information") || combined.contains("has no upstream branch") {
        GitError::NoUpstream {
            detail: first_matching_line(&combined, &["no tracking information", "no upstream branch"]),
        }
    } else {
        let message = if stderr.trim().is_empty() {
            stdout.trim()
        } else {
            stderr.trim()
        };
        GitError::CommandFailed {
            command: command.to_string(),
            stderr: message.to_string(),
        }
    }
}

fn first_matching_line(text: &str, needles: &[&str]) -> String {
    text.lines()
        .find(|line| needles.iter().any(|needle| line.contains(needle)))
        .unwrap_or_default()
        .trim()
        .to_string()
}
