//! core::repo_ref
//!
//! Parsing of user-supplied repository identifiers.
//!
//! # Accepted shapes
//!
//! Tried in this order, after trimming surrounding whitespace:
//!
//! 1. `https://github.com/owner/repo` (scheme and host case-insensitive,
//!    optional trailing `/` and `.git`)
//! 2. `git@github.com:owner/repo` (optional trailing `.git`)
//! 3. `owner/repo`
//!
//! Other hosts, `http://` URLs and other `user@host:path` remotes are
//! rejected. Owner and name must each match `^[A-Za-z0-9._-]+$`.
//!
//! # Example
//!
//! ```
//! use delete_branch_on_merge::core::repo_ref::parse_repository;
//!
//! let repo = parse_repository("git@github.com:octocat/Hello-World.git").unwrap();
//! assert_eq!(repo.owner(), "octocat");
//! assert_eq!(repo.name(), "Hello-World");
//!
//! assert!(parse_repository("https://gitlab.com/octocat/hello-world").is_err());
//! ```

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use super::errors::AppError;
use super::types::RepositoryRef;

pub const MSG_REQUIRED: &str = "Repository identifier is required";
pub const MSG_INVALID_URL: &str = "Invalid GitHub URL format";
pub const MSG_EXPECTED_FORMAT: &str = "Expected format: owner/repo";
pub const MSG_INVALID_CHARS: &str = "Invalid repository name characters";

const HTTPS_PREFIX: &str = "https://";
const HTTP_PREFIX: &str = "http://";
const GITHUB_HOST_PATH: &str = "github.com/";
const SSH_PREFIX: &str = "git@";
const GITHUB_SSH_PREFIX: &str = "git@github.com:";

static SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("segment pattern is valid"));

/// Parse a repository identifier into owner and name.
///
/// # Errors
///
/// Returns an `InvalidArguments` [`AppError`] whose message is one of the
/// `MSG_*` constants in this module.
pub fn parse_repository(input: &str) -> Result<RepositoryRef, AppError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AppError::invalid_arguments(MSG_REQUIRED));
    }

    let (owner, name) = if let Some(rest) = strip_prefix_ignore_case(input, HTTPS_PREFIX) {
        parse_https(rest)?
    } else if strip_prefix_ignore_case(input, HTTP_PREFIX).is_some() {
        return Err(AppError::invalid_arguments(MSG_EXPECTED_FORMAT));
    } else if input.starts_with(SSH_PREFIX) || (input.contains('@') && input.contains(':')) {
        parse_ssh(input)?
    } else {
        parse_slug(input)?
    };

    validate_segment(owner)?;
    validate_segment(name)?;

    Ok(RepositoryRef::new(owner, name))
}

impl FromStr for RepositoryRef {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_repository(s)
    }
}

/// `rest` is everything after `https://`.
fn parse_https(rest: &str) -> Result<(&str, &str), AppError> {
    let path = strip_prefix_ignore_case(rest, GITHUB_HOST_PATH)
        .ok_or_else(|| AppError::invalid_arguments(MSG_EXPECTED_FORMAT))?;
    let path = path.strip_suffix('/').unwrap_or(path);
    let path = path.strip_suffix(".git").unwrap_or(path);
    two_segments(path).ok_or_else(|| AppError::invalid_arguments(MSG_INVALID_URL))
}

fn parse_ssh(input: &str) -> Result<(&str, &str), AppError> {
    let path = input
        .strip_prefix(GITHUB_SSH_PREFIX)
        .ok_or_else(|| AppError::invalid_arguments(MSG_EXPECTED_FORMAT))?;
    let path = path.strip_suffix(".git").unwrap_or(path);
    two_segments(path).ok_or_else(|| AppError::invalid_arguments(MSG_INVALID_URL))
}

fn parse_slug(input: &str) -> Result<(&str, &str), AppError> {
    let parts: Vec<&str> = input.split('/').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(AppError::invalid_arguments(MSG_INVALID_CHARS));
    }
    match parts.as_slice() {
        [owner, name] => Ok((*owner, *name)),
        _ => Err(AppError::invalid_arguments(MSG_EXPECTED_FORMAT)),
    }
}

/// Split `owner/name`, requiring exactly two non-empty segments.
fn two_segments(path: &str) -> Option<(&str, &str)> {
    let mut parts = path.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
            Some((owner, name))
        }
        _ => None,
    }
}

fn validate_segment(segment: &str) -> Result<(), AppError> {
    if SEGMENT_RE.is_match(segment) {
        Ok(())
    } else {
        Err(AppError::invalid_arguments(MSG_INVALID_CHARS))
    }
}

/// ASCII case-insensitive `strip_prefix`. Safe on non-ASCII input.
fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        s.get(prefix.len()..)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ErrorKind;

    fn ok(input: &str) -> (String, String) {
        let repo = parse_repository(input).unwrap_or_else(|e| panic!("{}: {}", input, e));
        (repo.owner().to_string(), repo.name().to_string())
    }

    fn err(input: &str) -> String {
        let err = parse_repository(input).expect_err(input);
        assert_eq!(err.kind(), ErrorKind::InvalidArguments, "{}", input);
        err.message().to_string()
    }

    fn pair(owner: &str, name: &str) -> (String, String) {
        (owner.to_string(), name.to_string())
    }

    mod slug {
        use super::*;

        #[test]
        fn plain() {
            assert_eq!(ok("octocat/hello-world"), pair("octocat", "hello-world"));
        }

        #[test]
        fn keeps_case() {
            assert_eq!(ok("OctoCat/Hello-World"), pair("OctoCat", "Hello-World"));
        }

        #[test]
        fn dots_underscores_digits() {
            assert_eq!(ok("my_org.1/repo.name_2"), pair("my_org.1", "repo.name_2"));
        }

        #[test]
        fn trims_whitespace() {
            assert_eq!(ok("  octocat/hello-world\n\t"), pair("octocat", "hello-world"));
        }

        #[test]
        fn empty_segments() {
            assert_eq!(err("/repo"), MSG_INVALID_CHARS);
            assert_eq!(err("owner/"), MSG_INVALID_CHARS);
            assert_eq!(err("owner//repo"), MSG_INVALID_CHARS);
            assert_eq!(err("/"), MSG_INVALID_CHARS);
        }

        #[test]
        fn wrong_segment_count() {
            assert_eq!(err("octocat"), MSG_EXPECTED_FORMAT);
            assert_eq!(err("a/b/c"), MSG_EXPECTED_FORMAT);
        }

        #[test]
        fn bad_characters() {
            assert_eq!(err("octo cat/hello-world"), MSG_INVALID_CHARS);
            for bad in ["o@x/r", "o/r#1", "o/r%20", "o/r?", "o/*", "ö/r", "o/répo"] {
                assert_eq!(err(bad), MSG_INVALID_CHARS, "{}", bad);
            }
        }
    }

    mod https {
        use super::*;

        #[test]
        fn with_and_without_git_suffix() {
            assert_eq!(ok("https://github.com/octocat/hello-world"), pair("octocat", "hello-world"));
            assert_eq!(
                ok("https://github.com/octocat/hello-world.git"),
                pair("octocat", "hello-world")
            );
        }

        #[test]
        fn trailing_slash() {
            assert_eq!(ok("https://github.com/octocat/hello-world/"), pair("octocat", "hello-world"));
            assert_eq!(
                ok("https://github.com/octocat/hello-world.git/"),
                pair("octocat", "hello-world")
            );
        }

        #[test]
        fn case_insensitive_scheme_and_host() {
            assert_eq!(ok("HTTPS://GitHub.COM/octocat/Repo"), pair("octocat", "Repo"));
        }

        #[test]
        fn wrong_path_shape() {
            assert_eq!(err("https://github.com/"), MSG_INVALID_URL);
            assert_eq!(err("https://github.com/octocat"), MSG_INVALID_URL);
            assert_eq!(err("https://github.com/octocat/repo/tree/main"), MSG_INVALID_URL);
            assert_eq!(err("https://github.com//repo"), MSG_INVALID_URL);
        }

        #[test]
        fn other_hosts() {
            assert_eq!(err("https://gitlab.com/octocat/repo"), MSG_EXPECTED_FORMAT);
            assert_eq!(err("https://github.example.com/octocat/repo"), MSG_EXPECTED_FORMAT);
            assert_eq!(err("http://github.com/octocat/repo"), MSG_EXPECTED_FORMAT);
            assert_eq!(err("HTTP://github.com/octocat/repo"), MSG_EXPECTED_FORMAT);
        }

        #[test]
        fn bad_characters_in_url() {
            assert_eq!(err("https://github.com/octo%20cat/repo"), MSG_INVALID_CHARS);
        }
    }

    mod ssh {
        use super::*;

        #[test]
        fn with_and_without_git_suffix() {
            assert_eq!(ok("git@github.com:octocat/hello-world.git"), pair("octocat", "hello-world"));
            assert_eq!(ok("git@github.com:octocat/hello-world"), pair("octocat", "hello-world"));
        }

        #[test]
        fn wrong_path_shape() {
            assert_eq!(err("git@github.com:octocat"), MSG_INVALID_URL);
            assert_eq!(err("git@github.com:a/b/c.git"), MSG_INVALID_URL);
        }

        #[test]
        fn other_hosts() {
            assert_eq!(err("git@gitlab.com:octocat/repo.git"), MSG_EXPECTED_FORMAT);
            assert_eq!(err("deploy@github.com:octocat/repo.git"), MSG_EXPECTED_FORMAT);
            assert_eq!(err("git@GitHub.com:octocat/repo"), MSG_EXPECTED_FORMAT);
        }
    }

    #[test]
    fn empty_input() {
        assert_eq!(err(""), MSG_REQUIRED);
        assert_eq!(err("   \t\n"), MSG_REQUIRED);
    }

    #[test]
    fn from_str_delegates() {
        let repo: RepositoryRef = "octocat/hello-world".parse().unwrap();
        assert_eq!(repo.full_name(), "octocat/hello-world");
        assert!("nope".parse::<RepositoryRef>().is_err());
    }

    #[test]
    fn non_ascii_prefix_does_not_panic() {
        assert_eq!(err("hé/x"), MSG_INVALID_CHARS);
        assert_eq!(err("ééééééééé"), MSG_EXPECTED_FORMAT);
    }
}
