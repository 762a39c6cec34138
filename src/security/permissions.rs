// src/security/permissions.rs - File permission checks for credential security
//
// Files holding API keys should not be readable by group or others.

use std::path::Path;

/// Result of a permission audit on a single file.
#[derive(Debug, Clone)]
pub struct PermissionCheck {
    pub path: String,
    pub is_secure: bool,
    pub message: String,
}

/// Audit the credential file and the config file.
pub fn audit_permissions(env_file: &Path, config_file: &Path) -> Vec<PermissionCheck> {
    vec![
        check_path(env_file, 0o600, "credential file"),
        check_path(config_file, 0o600, "config file"),
    ]
}

/// Check a single path against an expected permission mode.
pub fn check_path(path: &Path, expected_mode: u32, description: &str) -> PermissionCheck {
    if !path.exists() {
        return PermissionCheck {
            path: path.display().to_string(),
            is_secure: true,
            message: format!("{} does not exist (OK)", description),
        };
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(path) {
            Ok(metadata) => {
                let mode = metadata.permissions().mode() & 0o777;
                let is_secure = is_mode_acceptable(mode, expected_mode);
                let message = if is_secure {
                    format!("{}: mode {:03o} (OK)", description, mode)
                } else {
                    format!(
                        "{}: mode {:03o} is too permissive (expected {:03o})",
                        description, mode, expected_mode
                    )
                };
                PermissionCheck {
                    path: path.display().to_string(),
                    is_secure,
                    message,
                }
            }
            Err(e) => PermissionCheck {
                path: path.display().to_string(),
                is_secure: false,
                message: format!("{}: failed to read metadata: {}", description, e),
            },
        }
    }

    #[cfg(not(unix))]
    {
        let _ = expected_mode;
        PermissionCheck {
            path: path.display().to_string(),
            is_secure: true,
            message: format!(
                "{}: permission check not applicable on this platform",
                description
            ),
        }
    }
}

/// Group and other bits must not exceed the expected mode's.
#[cfg(unix)]
fn is_mode_acceptable(actual: u32, expected: u32) -> bool {
    let group_other_actual = actual & 0o077;
    let group_other_expected = expected & 0o077;

    if group_other_expected == 0 {
        return group_other_actual == 0;
    }

    group_other_actual <= group_other_expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_returns_both_checks() {
        let checks = audit_permissions(
            Path::new("/nonexistent/.env"),
            Path::new("/nonexistent/config.toml"),
        );
        assert_eq!(checks.len(), 2);
        for check in &checks {
            assert!(!check.message.is_empty());
        }
    }

    #[test]
    fn test_nonexistent_path_is_secure() {
        let check = check_path(Path::new("/nonexistent/path"), 0o600, "test");
        assert!(check.is_secure);
        assert!(check.message.contains("does not exist"));
    }

    #[cfg(unix)]
    #[test]
    fn test_world_readable_env_file_flagged() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "OPENAI_API_KEY=sk-test").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let check = check_path(&path, 0o600, "credential file");
        assert!(!check.is_secure);
        assert_eq!(check.path, path.display().to_string());
        assert!(check.message.contains("mode 644 is too permissive"));

        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600)).unwrap();
        assert!(check_path(&path, 0o600, "credential file").is_secure);
    }

    #[cfg(unix)]
    #[test]
    fn test_is_mode_acceptable() {
        assert!(is_mode_acceptable(0o600, 0o600));
        assert!(is_mode_acceptable(0o400, 0o600));
        assert!(!is_mode_acceptable(0o644, 0o600));
        assert!(!is_mode_acceptable(0o666, 0o600));
        assert!(is_mode_acceptable(0o700, 0o700));
        assert!(!is_mode_acceptable(0o755, 0o700));
    }
}
