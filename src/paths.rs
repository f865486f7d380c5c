//! Slash-normalized relative path arithmetic
//!
//! The pipeline keeps paths as plain `String`s with `/` separators so that
//! plan output and link targets are identical across platforms. The root of
//! the processed directory is represented as the empty string.

use std::path::Path;

/// Converts an OS path to a slash-separated string.
pub fn to_slash(path: &Path) -> String {
    let s = path.to_string_lossy().replace('\\', "/");
    s.strip_prefix("./").unwrap_or(&s).to_string()
}

/// The directory part of `path`, or `""` for a bare file name.
pub fn dir_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(i) => &path[..i],
        None => "",
    }
}

/// The final component of `path`.
pub fn file_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(i) => &path[i + 1..],
        None => path,
    }
}

/// The file name without a trailing `.md` extension.
pub fn stem(path: &str) -> &str {
    let name = file_name(path);
    name.strip_suffix(".md").unwrap_or(name)
}

/// Joins two slash paths. Either side may be empty.
pub fn join(base: &str, rest: &str) -> String {
    if base.is_empty() {
        rest.to_string()
    } else if rest.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{rest}")
    }
}

/// Collapses `.` and `..` components. `..` past the root is kept, so
/// `../x` stays `../x` but `a/../x` becomes `x`.
pub fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if matches!(parts.last(), Some(&p) if p != "..") {
                    parts.pop();
                } else {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}

/// The relative path from directory `from` to file `to`, both given
/// relative to the same root.
pub fn relative_between(from: &str, to: &str) -> String {
    let from = normalize(from);
    let to = normalize(to);
    let from_parts: Vec<&str> = from.split('/').filter(|p| !p.is_empty()).collect();
    let to_parts: Vec<&str> = to.split('/').filter(|p| !p.is_empty()).collect();

    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::new();
    for _ in common..from_parts.len() {
        parts.push("..");
    }
    parts.extend(&to_parts[common..]);
    parts.join("/")
}

/// Orders strings so that embedded numbers compare by value: `a2` before
/// `a10`. Ties on numeric value fall back to byte order.
pub fn natural_cmp(a: &str, b: &str) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    let mut ai = a.char_indices().peekable();
    let mut bi = b.char_indices().peekable();
    loop {
        match (ai.peek().copied(), bi.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some((apos, ac)), Some((bpos, bc))) => {
                if ac.is_ascii_digit() && bc.is_ascii_digit() {
                    let arun = digit_run(a, apos);
                    let brun = digit_run(b, bpos);
                    let anum: u128 = arun.parse().unwrap_or(u128::MAX);
                    let bnum: u128 = brun.parse().unwrap_or(u128::MAX);
                    match anum.cmp(&bnum) {
                        Ordering::Equal => {}
                        other => return other,
                    }
                    for _ in 0..arun.len() {
                        ai.next();
                    }
                    for _ in 0..brun.len() {
                        bi.next();
                    }
                } else {
                    let afold = ac.to_lowercase().next().unwrap_or(ac);
                    let bfold = bc.to_lowercase().next().unwrap_or(bc);
                    match afold.cmp(&bfold) {
                        Ordering::Equal => {
                            ai.next();
                            bi.next();
                        }
                        other => return other,
                    }
                }
            }
        }
    }
}

fn digit_run(s: &str, start: usize) -> &str {
    let end = s[start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(s.len(), |i| start + i);
    &s[start..end]
}

/// Sorts lexicographically and removes duplicates.
pub fn sort_unique(mut items: Vec<String>) -> Vec<String> {
    items.sort();
    items.dedup();
    items
}
