/// Architecture label used in prebuilt asset names (Node-style spellings,
/// since the published binaries follow that convention).
fn arch_label() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        "x86" => "ia32",
        other => other,
    }
}

/// Best-effort libc flavor for the Linux triple.
///
/// The compile-time target env answers for normal builds; exotic targets fall
/// back to probing for a musl loader on disk, and any probe failure means
/// `gnu` (the common case).
fn detect_libc() -> &'static str {
    if cfg!(target_env = "musl") {
        return "musl";
    }
    if cfg!(target_env = "gnu") {
        return "gnu";
    }
    match std::fs::read_dir("/lib") {
        Ok(entries) => {
            for entry in entries.flatten() {
                if entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with("ld-musl-")
                {
                    return "musl";
                }
            }
            "gnu"
        }
        Err(_) => "gnu",
    }
}

/// The platform/architecture(/libc) identifier naming a matching prebuilt
/// extension asset. Pure function of the process environment; never fails.
#[must_use]
pub fn platform_triple() -> String {
    let arch = arch_label();
    match std::env::consts::OS {
        "macos" => format!("darwin-{arch}"),
        "windows" => format!("win32-{arch}"),
        "linux" => format!("linux-{arch}-{}", detect_libc()),
        other => format!("{other}-{arch}"),
    }
}

/// Native-library file extension for the running platform.
#[must_use]
pub fn lib_extension() -> &'static str {
    match std::env::consts::OS {
        "macos" => "dylib",
        "windows" => "dll",
        _ => "so",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triple_is_stable_across_calls() {
        assert_eq!(platform_triple(), platform_triple());
    }

    #[test]
    fn triple_carries_a_known_os_prefix() {
        let triple = platform_triple();
        let os = std::env::consts::OS;
        let expected = match os {
            "macos" => "darwin-",
            "windows" => "win32-",
            "linux" => "linux-",
            other => return assert!(triple.starts_with(other)),
        };
        assert!(triple.starts_with(expected), "{triple}");
    }

    #[test]
    fn linux_triple_names_a_libc() {
        if std::env::consts::OS == "linux" {
            let triple = platform_triple();
            assert!(
                triple.ends_with("-gnu") || triple.ends_with("-musl"),
                "{triple}"
            );
        }
    }

    #[test]
    fn extension_matches_platform_family() {
        let ext = lib_extension();
        match std::env::consts::OS {
            "macos" => assert_eq!(ext, "dylib"),
            "windows" => assert_eq!(ext, "dll"),
            _ => assert_eq!(ext, "so"),
        }
    }
}
