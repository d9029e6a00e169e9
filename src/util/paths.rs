//! Portable relative path resolution.
//!
//! Paths are handled as strings in a canonical `/`-separated form, so a
//! Windows drive path such as `C:\proj` resolves the same way on every host.
//! None of the functions here touch the filesystem beyond reading the
//! current working directory for relative inputs.

use std::path::{Path, MAIN_SEPARATOR_STR};

/// The current directory sentinel.
pub const CURDIR: &str = ".";

/// The parent directory sentinel.
pub const PARDIR: &str = "..";

/// Convert every backslash to a forward slash.
pub fn to_slash(path: &str) -> String {
    path.replace('\\', "/")
}

/// Split a slash-separated path into its root and the remainder.
///
/// Recognized roots are `/` and a drive prefix (`C:/`, or a bare `C:`).
/// A drive-relative path like `C:foo` has no root.
fn split_root(path: &str) -> Option<(String, &str)> {
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        if bytes.len() == 2 {
            return Some((format!("{}/", path), ""));
        }
        if bytes[2] == b'/' {
            return Some((path[..3].to_string(), &path[3..]));
        }
        return None;
    }
    path.strip_prefix('/').map(|rest| ("/".to_string(), rest))
}

/// Check whether a path is absolute in either POSIX or drive form.
pub fn is_absolute(path: &str) -> bool {
    split_root(&to_slash(path)).is_some()
}

/// Case normalization used for prefix comparison.
fn normcase(component: &str) -> String {
    component.to_lowercase()
}

/// Collapse `.`, `..` and repeated separators in an absolute path.
///
/// `..` above the root stays at the root.
fn collapse(path: &str) -> String {
    let Some((root, rest)) = split_root(path) else {
        return path.to_string();
    };

    let mut parts: Vec<&str> = Vec::new();
    for part in rest.split('/') {
        match part {
            "" | CURDIR => {}
            PARDIR => {
                parts.pop();
            }
            name => parts.push(name),
        }
    }

    let mut out = root;
    out.push_str(&parts.join("/"));
    out
}

/// Make a path absolute and separator-canonical.
///
/// Relative inputs are joined onto the current working directory. The path
/// does not need to exist.
pub fn normalize(path: impl AsRef<Path>) -> String {
    let raw = to_slash(&path.as_ref().to_string_lossy());

    let joined = if split_root(&raw).is_some() {
        raw
    } else {
        let cwd = std::env::current_dir()
            .map(|dir| to_slash(&dir.to_string_lossy()))
            .unwrap_or_else(|_| "/".to_string());
        format!("{}/{}", cwd.trim_end_matches('/'), raw)
    };

    collapse(&joined)
}

/// Split a path into its components.
///
/// The first component is the root (`/`, `C:/`), a leading `.` or `..`
/// sentinel, or an empty string for other relative paths. The remaining
/// components are plain names.
pub fn split_all(path: &str) -> Vec<String> {
    let path = to_slash(path);

    let (mut head, rest) = match split_root(&path) {
        Some((root, rest)) => (root, rest),
        None => (String::new(), path.as_str()),
    };

    let mut names = rest.split('/').filter(|s| !s.is_empty()).peekable();
    if head.is_empty() {
        if let Some(first) = names.next_if(|first| *first == CURDIR || *first == PARDIR) {
            head = first.to_string();
        }
    }

    std::iter::once(head)
        .chain(names.map(str::to_string))
        .collect()
}

/// Compute the relative path that leads from `origin` to `dest`.
///
/// Both locations are normalized first. When their roots differ (different
/// drives) no relative path exists and the normalized `dest` is returned.
/// The common prefix is matched case-insensitively while the returned
/// components keep the casing of `dest`. Identical locations yield `"."`.
pub fn relative_path(origin: impl AsRef<Path>, dest: impl AsRef<Path>) -> String {
    let origin = normalize(origin);
    let dest = normalize(dest);

    let origin_parts: Vec<String> = split_all(&origin).iter().map(|p| normcase(p)).collect();
    // Keep dest casing for the output
    let dest_parts = split_all(&dest);

    if origin_parts[0] != normcase(&dest_parts[0]) {
        return dest;
    }

    let common = origin_parts
        .iter()
        .zip(&dest_parts)
        .take_while(|(o, d)| **o == normcase(d))
        .count();

    let mut segments: Vec<&str> = vec![PARDIR; origin_parts.len() - common];
    segments.extend(dest_parts[common..].iter().map(String::as_str));

    if segments.is_empty() {
        CURDIR.to_string()
    } else {
        segments.join(MAIN_SEPARATOR_STR)
    }
}
