use std::{
    env,
    path::{Path, PathBuf},
};

use crate::error::{ConfigError, Result};

/// Returns the user's home directory.
///
/// Checks `HOME`, then `USERPROFILE`, and falls back to the current
/// directory when neither is set.
pub fn home_dir() -> PathBuf {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns `$XDG_CONFIG_HOME`, defaulting to `~/.config`.
pub fn xdg_config_home() -> PathBuf {
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(".config"))
}

/// The conventional download folder, `<home>/Downloads`.
pub fn downloads_dir() -> PathBuf {
    home_dir().join("Downloads")
}

/// Expands a leading `~` and `$VAR` / `${VAR}` references in `path`.
///
/// # Examples
///
/// ```
/// use pkgview_config::paths::expand_path;
///
/// std::env::set_var("HOME", "/home/alice");
/// assert_eq!(
///     expand_path("~/Downloads").unwrap(),
///     std::path::PathBuf::from("/home/alice/Downloads")
/// );
/// ```
pub fn expand_path(path: &str) -> Result<PathBuf> {
    let path = path.trim();
    let mut result = String::with_capacity(path.len());
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '~' if result.is_empty() && matches!(chars.peek(), None | Some('/')) => {
                result.push_str(&home_dir().to_string_lossy());
            }
            '$' if chars.peek() == Some(&'{') => {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => name.push(c),
                        None => return Err(ConfigError::UnclosedVariable(format!("${{{name}"))),
                    }
                }
                result.push_str(&lookup_var(&name, path)?);
            }
            '$' => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if !(c.is_alphanumeric() || c == '_') {
                        break;
                    }
                    name.push(c);
                    chars.next();
                }
                if name.is_empty() {
                    result.push('$');
                } else {
                    result.push_str(&lookup_var(&name, path)?);
                }
            }
            _ => result.push(c),
        }
    }

    Ok(PathBuf::from(result))
}

fn lookup_var(name: &str, input: &str) -> Result<String> {
    if name == "HOME" {
        return Ok(home_dir().to_string_lossy().into_owned());
    }
    env::var(name).map_err(|_| {
        ConfigError::MissingEnvVar {
            var: name.to_string(),
            input: input.to_string(),
        }
    })
}

/// Makes `path` absolute against the current working directory.
pub fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::test_utils::with_env;

    #[test]
    #[serial]
    fn test_home_and_downloads() {
        with_env(vec![("HOME", Some("/tmp/home"))], || {
            assert_eq!(home_dir(), PathBuf::from("/tmp/home"));
            assert_eq!(downloads_dir(), PathBuf::from("/tmp/home/Downloads"));
        });
    }

    #[test]
    #[serial]
    fn test_home_falls_back_to_userprofile() {
        with_env(
            vec![("HOME", None), ("USERPROFILE", Some("/users/bob"))],
            || {
                assert_eq!(home_dir(), PathBuf::from("/users/bob"));
            },
        );
    }

    #[test]
    #[serial]
    fn test_xdg_config_home() {
        with_env(
            vec![("HOME", Some("/tmp/home")), ("XDG_CONFIG_HOME", None)],
            || {
                assert_eq!(xdg_config_home(), PathBuf::from("/tmp/home/.config"));
            },
        );
        with_env(vec![("XDG_CONFIG_HOME", Some("/tmp/cfg"))], || {
            assert_eq!(xdg_config_home(), PathBuf::from("/tmp/cfg"));
        });
    }

    #[test]
    #[serial]
    fn test_expand_path() {
        with_env(
            vec![("HOME", Some("/tmp/home")), ("PKGVIEW_TEST_DIR", Some("dl"))],
            || {
                assert_eq!(expand_path("~").unwrap(), PathBuf::from("/tmp/home"));
                assert_eq!(
                    expand_path("~/Downloads").unwrap(),
                    PathBuf::from("/tmp/home/Downloads")
                );
                assert_eq!(
                    expand_path("$HOME/${PKGVIEW_TEST_DIR}/x").unwrap(),
                    PathBuf::from("/tmp/home/dl/x")
                );
                assert_eq!(expand_path("a/~/b").unwrap(), PathBuf::from("a/~/b"));
                assert_eq!(expand_path("~user").unwrap(), PathBuf::from("~user"));
                assert_eq!(expand_path("cost$").unwrap(), PathBuf::from("cost$"));
            },
        );
    }

    #[test]
    #[serial]
    fn test_expand_path_errors() {
        with_env(vec![("PKGVIEW_MISSING_VAR", None)], || {
            assert!(matches!(
                expand_path("${PKGVIEW_TEST_DIR"),
                Err(ConfigError::UnclosedVariable(_))
            ));
            assert!(matches!(
                expand_path("$PKGVIEW_MISSING_VAR/x"),
                Err(ConfigError::MissingEnvVar { .. })
            ));
        });
    }

    #[test]
    fn test_absolute() {
        assert_eq!(absolute(Path::new("/abs")).unwrap(), PathBuf::from("/abs"));
        assert!(absolute(Path::new("rel")).unwrap().is_absolute());
    }
}
