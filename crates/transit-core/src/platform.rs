//! Per-user directories for config, saved stations and cached responses.
//!
//! Unix follows the XDG base-directory layout on every platform, macOS
//! included, so the files are easy to find from a terminal. Windows uses the
//! usual known folders.

#[cfg(any(unix, test))]
use std::ffi::OsString;
use std::path::PathBuf;

const APP_DIR: &str = "transit";

pub fn data_dir() -> PathBuf {
    #[cfg(unix)]
    {
        xdg_dir("XDG_DATA_HOME", ".local/share")
    }
    #[cfg(windows)]
    {
        known_folder(dirs::data_local_dir())
    }
}

pub fn config_dir() -> PathBuf {
    #[cfg(unix)]
    {
        xdg_dir("XDG_CONFIG_HOME", ".config")
    }
    #[cfg(windows)]
    {
        known_folder(dirs::config_dir())
    }
}

pub fn cache_dir() -> PathBuf {
    #[cfg(unix)]
    {
        xdg_dir("XDG_CACHE_HOME", ".cache")
    }
    #[cfg(windows)]
    {
        known_folder(dirs::cache_dir())
    }
}

pub fn temp_dir() -> PathBuf {
    std::env::temp_dir()
}

#[cfg(unix)]
fn xdg_dir(var: &str, home_relative: &str) -> PathBuf {
    resolve_xdg(std::env::var_os(var), dirs::home_dir(), home_relative)
}

#[cfg(windows)]
fn known_folder(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(temp_dir).join(APP_DIR)
}

#[cfg(any(unix, test))]
/// XDG rules: the variable wins only when it holds an absolute path,
/// otherwise `$HOME/<home_relative>`, otherwise the temp dir.
fn resolve_xdg(var: Option<OsString>, home: Option<PathBuf>, home_relative: &str) -> PathBuf {
    let base = var
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .or_else(|| home.map(|h| h.join(home_relative)))
        .unwrap_or_else(temp_dir);
    base.join(APP_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_xdg_variable_wins() {
        let dir = resolve_xdg(
            Some(OsString::from("/srv/xdg")),
            Some(PathBuf::from("/home/u")),
            ".config",
        );
        assert_eq!(dir, PathBuf::from("/srv/xdg/transit"));
    }

    #[test]
    fn relative_xdg_variable_is_ignored() {
        let dir = resolve_xdg(
            Some(OsString::from("relative/xdg")),
            Some(PathBuf::from("/home/u")),
            ".local/share",
        );
        assert_eq!(dir, PathBuf::from("/home/u/.local/share/transit"));
    }

    #[test]
    fn no_home_falls_back_to_temp() {
        let dir = resolve_xdg(None, None, ".cache");
        assert_eq!(dir, temp_dir().join("transit"));
    }
}
