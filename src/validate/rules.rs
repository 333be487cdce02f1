// src/validate/rules.rs
// =============================================================================
// The individual trap rules, as plain functions.
//
// Each `check_*` returns Ok(()) or the TrapReason that rejects the URL. The
// `*_base` helpers find the grouping key for the stateful rules (query cap,
// fragment duplicates); they work on the raw URL string, so a URL that
// doesn't have the expected shape simply has no base and skips that rule.
// =============================================================================

use super::TrapReason;
use percent_encoding::percent_decode_str;
use std::collections::HashSet;
use url::Url;

// File suffixes that never lead to crawlable text
pub const BLOCKED_EXTENSIONS: &[&str] = &[
    "css", "js", "bmp", "gif", "jpg", "jpeg", "ico", "png", "tif", "tiff", "mid", "mp2", "mp3",
    "mp4", "wav", "avi", "mov", "mpeg", "ram", "m4v", "mkv", "ogg", "ogv", "pdf", "ps", "eps",
    "tex", "ppt", "pptx", "doc", "docx", "xls", "xlsx", "names", "data", "dat", "exe", "bz2",
    "tar", "msi", "bin", "7z", "psd", "dmg", "iso", "epub", "dll", "cnf", "tgz", "sha1", "mat",
    "thmx", "mso", "arff", "rtf", "jar", "csv", "rm", "smil", "wmv", "swf", "wma", "zip", "rar",
    "gz",
];

// Coarse depth limit: every '/' in the URL counts, including the two after
// the scheme
//
// Example:
//   "http://x.ics.uci.edu/a/b/c/d/e"  -> 7 slashes, Ok
//   "http://x.ics.uci.edu/a/b/c/d/e/" -> 8 slashes, TooDeep
pub fn check_depth(url: &str, max_slashes: usize) -> Result<(), TrapReason> {
    if url.matches('/').count() >= max_slashes {
        Err(TrapReason::TooDeep)
    } else {
        Ok(())
    }
}

// Looks at every directory in the path; the last segment (the file name) is
// left alone
//
// Parameters:
//   path: the URL path as `Url::path()` gives it (percent-encoded)
//   max_len: longest allowed directory name, in characters
//
// Returns: Ok(()) or the first directory rule that fails
//
// Segments are percent-decoded first, so "/%C3%A9t%C3%A9/" is the 3-character
// directory "été" and "%41" repeats "a".
pub fn check_directories(path: &str, max_len: usize) -> Result<(), TrapReason> {
    let segments: Vec<&str> = path.split('/').collect();
    let directories = &segments[..segments.len().saturating_sub(1)];

    let mut seen = HashSet::new();
    for encoded in directories {
        let directory = percent_decode_str(encoded).decode_utf8_lossy();
        let lower = directory.to_lowercase();

        if lower == "files" {
            return Err(TrapReason::FilesDirectory);
        }
        if directory.chars().count() > max_len {
            return Err(TrapReason::LongDirectory);
        }
        if !seen.insert(lower) {
            return Err(TrapReason::RepeatedDirectory);
        }
    }

    Ok(())
}

// "http(s)://<host...>?<query>" -> everything before the '?'
//
// Returns: the base URL, or None when the URL has no non-empty query
//
// The rightmost '?' that still has something after it wins, so a '?'
// inside the query belongs to the query.
pub fn query_base(url: &str) -> Option<&str> {
    let prefix = if url.starts_with("https://") {
        "https://".len()
    } else if url.starts_with("http://") {
        "http://".len()
    } else {
        return None;
    };

    url.rmatch_indices('?')
        .map(|(i, _)| i)
        .find(|&i| i > prefix && i + 1 < url.len())
        .map(|i| &url[..i])
}

// "<anything>#<fragment>" -> everything before the last '#'
pub fn fragment_base(url: &str) -> Option<&str> {
    url.rfind('#').filter(|&i| i > 0).map(|i| &url[..i])
}

pub fn has_blocked_extension(path: &str) -> bool {
    let path = path.to_lowercase();
    path.rsplit_once('.')
        .is_some_and(|(_, extension)| BLOCKED_EXTENSIONS.contains(&extension))
}

// Scheme, host scope and file extension
//
// Parameters:
//   url: the parsed candidate
//   scope_domain: substring the host must contain (e.g. ".ics.uci.edu")
//
// Returns: Ok(()) or Scheme / OffScope / BlockedExtension / Malformed (no host)
pub fn check_scope(url: &Url, scope_domain: &str) -> Result<(), TrapReason> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(TrapReason::Scheme);
    }

    let host = url.host_str().ok_or(TrapReason::Malformed)?;
    if !host.contains(scope_domain) {
        return Err(TrapReason::OffScope);
    }

    if has_blocked_extension(url.path()) {
        return Err(TrapReason::BlockedExtension);
    }

    Ok(())
}
