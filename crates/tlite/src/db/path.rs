use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("reading home dir: home directory could not be determined")]
    HomeDirUnavailable,
}

/// Resolves a user-supplied database path: environment variables are
/// expanded first, then a leading `~/` is replaced with the home directory.
/// Absolute and relative paths pass through verbatim.
pub fn resolve(raw: &str) -> Result<String, PathError> {
    resolve_with(raw, |name| std::env::var(name).ok(), dirs::home_dir())
}

fn resolve_with<F>(raw: &str, lookup: F, home: Option<PathBuf>) -> Result<String, PathError>
where
    F: Fn(&str) -> Option<String>,
{
    let expanded = expand_env(raw, &lookup);

    if let Some(rest) = expanded.strip_prefix("~/") {
        let home = home.ok_or(PathError::HomeDirUnavailable)?;
        return Ok(home.join(rest).to_string_lossy().into_owned());
    }

    Ok(expanded)
}

/// Shell-style `${VAR}` / `$VAR` expansion. Unresolved variables expand to
/// the empty string; a `$` not followed by a variable name stays literal.
fn expand_env<F>(input: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            out.push(ch);
            continue;
        }

        match chars.peek() {
            Some('{') => {
                chars.next();
                let mut name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if closed {
                    if let Some(value) = lookup(&name) {
                        out.push_str(&value);
                    }
                } else {
                    // Unclosed brace: keep the text literally.
                    out.push_str("${");
                    out.push_str(&name);
                }
            }
            Some(c) if c.is_ascii_alphabetic() || *c == '_' => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if let Some(value) = lookup(&name) {
                    out.push_str(&value);
                }
            }
            _ => out.push('$'),
        }
    }

    out
}
