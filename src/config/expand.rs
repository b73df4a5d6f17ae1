// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! `~` and `$VAR` expansion for path-like config values.

use std::env;

/// Expand a leading `~` to `$HOME`, then substitute `$VAR` and `${VAR}`.
///
/// Unset variables are left in place verbatim, and so is `~user`.
pub fn expand_path(raw: &str) -> String {
    expand_with(raw, |name| env::var(name).ok())
}

pub(crate) fn expand_with<F>(raw: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let tilde_expanded = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => match lookup("HOME") {
            Some(home) => format!("{}{}", home, rest),
            None => raw.to_string(),
        },
        _ => raw.to_string(),
    };
    expand_vars(&tilde_expanded, &lookup)
}

fn expand_vars<F>(input: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], end)
        };

        if name.is_empty() {
            out.push('$');
            rest = after;
            continue;
        }

        match lookup(name) {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[pos..pos + 1 + consumed]),
        }
        rest = &after[consumed..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_env(name: &str) -> Option<String> {
        match name {
            "HOME" => Some("/home/volttron".to_string()),
            "VOLTTRON_HOME" => Some("/srv/vhome".to_string()),
            _ => None,
        }
    }

    #[test]
    fn expands_leading_tilde() {
        assert_eq!(expand_with("~/volttron/env/bin/python", fake_env), "/home/volttron/volttron/env/bin/python");
        assert_eq!(expand_with("~", fake_env), "/home/volttron");
    }

    #[test]
    fn leaves_other_tildes_alone() {
        assert_eq!(expand_with("~other/dir", fake_env), "~other/dir");
        assert_eq!(expand_with("/a/~/b", fake_env), "/a/~/b");
    }

    #[test]
    fn expands_plain_and_braced_vars() {
        assert_eq!(expand_with("$VOLTTRON_HOME/configs", fake_env), "/srv/vhome/configs");
        assert_eq!(expand_with("${VOLTTRON_HOME}x", fake_env), "/srv/vhomex");
    }

    #[test]
    fn unset_vars_are_kept_verbatim() {
        assert_eq!(expand_with("$NOPE/a", fake_env), "$NOPE/a");
        assert_eq!(expand_with("${NOPE}/a", fake_env), "${NOPE}/a");
        assert_eq!(expand_with("cost: 5$", fake_env), "cost: 5$");
        assert_eq!(expand_with("${unterminated", fake_env), "${unterminated");
    }
}
