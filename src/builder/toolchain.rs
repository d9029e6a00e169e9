//! Toolchain identity and the session-wide link profile.

use std::fmt;
use std::str::FromStr;

use semver::Version;

use crate::util::config::Config;

/// The family of a toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolchainFamily {
    /// Microsoft Visual C++
    #[default]
    Msvc,
    /// GCC or Clang
    Gcc,
}

impl ToolchainFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolchainFamily::Msvc => "msvc",
            ToolchainFamily::Gcc => "gcc",
        }
    }

    /// Get the object file extension.
    pub fn object_extension(&self) -> &'static str {
        match self {
            ToolchainFamily::Msvc => "obj",
            ToolchainFamily::Gcc => "o",
        }
    }
}

impl fmt::Display for ToolchainFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolchainFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "msvc" | "cl" => Ok(ToolchainFamily::Msvc),
            "gcc" | "clang" => Ok(ToolchainFamily::Gcc),
            other => Err(format!("unknown toolchain family `{}`", other)),
        }
    }
}

/// The toolchain a session is configured for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toolchain {
    pub family: ToolchainFamily,
    pub version: Option<Version>,
}

impl Toolchain {
    pub fn new(family: ToolchainFamily, version: Option<&str>) -> Self {
        Toolchain {
            family,
            version: version.and_then(parse_version_flexible),
        }
    }

    /// Build from the `[toolchain]` config section.
    pub fn from_config(config: &Config) -> Self {
        let family = match config.toolchain.family.as_deref().map(str::parse::<ToolchainFamily>) {
            Some(Ok(family)) => family,
            Some(Err(e)) => {
                tracing::warn!("{}, using {}", e, ToolchainFamily::default());
                ToolchainFamily::default()
            }
            None => ToolchainFamily::default(),
        };
        Toolchain::new(family, config.toolchain.version.as_deref())
    }
}

/// Parse a version string into semver::Version, handling incomplete versions.
///
/// Handles versions like "6.0", "14.3.1" or "6".
pub fn parse_version_flexible(version_str: &str) -> Option<Version> {
    let clean_version = version_str
        .trim()
        .split(|c: char| !c.is_ascii_digit() && c != '.')
        .next()
        .unwrap_or(version_str);

    if let Ok(v) = clean_version.parse() {
        return Some(v);
    }

    let parts: Vec<&str> = clean_version.split('.').collect();
    let major = parts.first().and_then(|s| s.parse().ok())?;
    let minor = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(0);
    let patch = parts.get(2).and_then(|s| s.parse().ok()).unwrap_or(0);

    Some(Version::new(major, minor, patch))
}

/// Link and search-path settings applied once per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProfile {
    /// Platform libraries
    pub libraries: Vec<String>,
    /// Library search directory, relative to the session root
    pub library_dir: String,
    /// Search directory used when the toolchain is the legacy version
    pub legacy_library_dir: String,
    /// Toolchain version that selects `legacy_library_dir`
    pub legacy_version: Version,
    pub compile_flags: Vec<String>,
    pub link_flags: Vec<String>,
}

impl Default for SessionProfile {
    fn default() -> Self {
        let strings = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };

        SessionProfile {
            libraries: strings(&["SDL", "SDLmain", "msvcrt", "user32", "kernel32", "gdi32.lib"]),
            library_dir: "win32/SDL/lib".to_string(),
            legacy_library_dir: "win32/SDL/lib_vc6".to_string(),
            legacy_version: Version::new(6, 0, 0),
            compile_flags: strings(&["/MT", "/ZI", "/Od", "/W 3", "/WL"]),
            link_flags: strings(&["/SUBSYSTEM:WINDOWS", "/NODEFAULTLIB", "/MACHINE:X86", "/DEBUG"]),
        }
    }
}

impl SessionProfile {
    /// Apply the `[session]` config overrides on top of the defaults.
    pub fn from_config(config: &Config) -> Self {
        let mut profile = SessionProfile::default();
        let session = &config.session;

        if let Some(libraries) = &session.libraries {
            profile.libraries = libraries.clone();
        }
        if let Some(dir) = &session.library_dir {
            profile.library_dir = dir.clone();
        }
        if let Some(dir) = &session.legacy_library_dir {
            profile.legacy_library_dir = dir.clone();
        }
        if let Some(version) = session.legacy_version.as_deref() {
            match parse_version_flexible(version) {
                Some(v) => profile.legacy_version = v,
                None => tracing::warn!("ignoring unparsable legacy-version `{}`", version),
            }
        }
        if let Some(flags) = &session.compile_flags {
            profile.compile_flags = flags.clone();
        }
        if let Some(flags) = &session.link_flags {
            profile.link_flags = flags.clone();
        }

        profile
    }

    /// The library search directory for `toolchain`.
    pub fn library_dir_for(&self, toolchain: &Toolchain) -> &str {
        if toolchain.version.as_ref() == Some(&self.legacy_version) {
            &self.legacy_library_dir
        } else {
            &self.library_dir
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_flexible() {
        assert_eq!(parse_version_flexible("6.0"), Some(Version::new(6, 0, 0)));
        assert_eq!(parse_version_flexible("6"), Some(Version::new(6, 0, 0)));
        assert_eq!(parse_version_flexible("14.3.1"), Some(Version::new(14, 3, 1)));
        assert_eq!(parse_version_flexible("14.0Exp"), Some(Version::new(14, 0, 0)));
        assert_eq!(parse_version_flexible("latest"), None);
    }

    #[test]
    fn test_family_parse() {
        assert_eq!("MSVC".parse::<ToolchainFamily>(), Ok(ToolchainFamily::Msvc));
        assert_eq!("clang".parse::<ToolchainFamily>(), Ok(ToolchainFamily::Gcc));
        assert!("tcc".parse::<ToolchainFamily>().is_err());
        assert_eq!(ToolchainFamily::Gcc.object_extension(), "o");
    }

    #[test]
    fn test_library_dir_switch() {
        let profile = SessionProfile::default();

        let legacy = Toolchain::new(ToolchainFamily::Msvc, Some("6.0"));
        assert_eq!(profile.library_dir_for(&legacy), "win32/SDL/lib_vc6");

        let modern = Toolchain::new(ToolchainFamily::Msvc, Some("14.3"));
        assert_eq!(profile.library_dir_for(&modern), "win32/SDL/lib");

        let unknown = Toolchain::new(ToolchainFamily::Msvc, None);
        assert_eq!(profile.library_dir_for(&unknown), "win32/SDL/lib");
    }

    #[test]
    fn test_profile_from_config() {
        let mut config = Config::default();
        config.session.legacy_version = Some("7.1".to_string());
        config.session.libraries = Some(vec!["m".to_string()]);
        config.toolchain.version = Some("7.1".to_string());

        let profile = SessionProfile::from_config(&config);
        let toolchain = Toolchain::from_config(&config);

        assert_eq!(profile.libraries, vec!["m"]);
        assert_eq!(profile.library_dir_for(&toolchain), "win32/SDL/lib_vc6");
        assert_eq!(profile.compile_flags, SessionProfile::default().compile_flags);
    }
}
