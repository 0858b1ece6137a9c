//! Reference-list extraction from raw tool output.
//!
//! Kept free of process handling so the parsing can be checked against
//! captured output strings.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::VcsError;

#[allow(clippy::expect_used)]
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(?:tags)/(\S+)$").expect("constant regex pattern is valid"));

#[allow(clippy::expect_used)]
static FIRST_WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\S+)").expect("constant regex pattern is valid"));

/// Collect the first capture group of every match, in output order
pub fn reference_list(output: &str, pattern: &Regex) -> Vec<String> {
    pattern
        .captures_iter(output)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Matches `refs/remotes/<remote_name>/<branch>` at the end of a `show-ref` line.
///
/// The ref path must start a field, so `myorigin` is not taken for `origin`.
pub fn branch_pattern(remote_name: &str) -> Result<Regex, VcsError> {
    Regex::new(&format!(
        r"(?m)(?:^|\s)refs/remotes/{}/(\S+)$",
        regex::escape(remote_name)
    ))
    .map_err(VcsError::backend)
}

/// Matches `tags/<tag>` at the end of a `show-ref` line
pub fn tag_pattern() -> &'static Regex {
    &TAG_PATTERN
}

/// Matches the first word of each line (`hg branches`, `hg tags`, `bzr tags`)
pub fn first_word_pattern() -> &'static Regex {
    &FIRST_WORD_PATTERN
}
