/// Build metadata stamped by `build.rs`.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub git_status: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
}

impl BuildMetadata {
    /// Multi-line summary printed by the `version` command.
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("fleet_wizard {} ({} {})", self.version, self.git_hash, self.git_status),
            format!("built {} for {} [{}]", self.timestamp, self.target, self.profile),
            self.rustc.to_string(),
        ]
    }
}

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("FLEET_WIZARD_BUILD_HASH").unwrap_or("unknown"),
        git_status: option_env!("FLEET_WIZARD_BUILD_STATUS").unwrap_or("unknown"),
        timestamp: option_env!("FLEET_WIZARD_BUILD_TIMESTAMP").unwrap_or("unknown"),
        target: option_env!("FLEET_WIZARD_BUILD_TARGET").unwrap_or("unknown"),
        profile: option_env!("FLEET_WIZARD_BUILD_PROFILE").unwrap_or("unknown"),
        rustc: option_env!("FLEET_WIZARD_BUILD_RUSTC").unwrap_or("unknown"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_line_carries_package_version() {
        let meta = current();
        assert_eq!(meta.version, env!("CARGO_PKG_VERSION"));
        assert!(meta.lines()[0].contains(meta.version));
    }
}
