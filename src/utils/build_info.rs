/// Compile-time build metadata produced by `build.rs`.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub git_status: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
}

const UNKNOWN: &str = "unknown";

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("PASSPORT_WIZARD_BUILD_HASH").unwrap_or(UNKNOWN),
        git_status: option_env!("PASSPORT_WIZARD_BUILD_STATUS").unwrap_or(UNKNOWN),
        timestamp: option_env!("PASSPORT_WIZARD_BUILD_TIMESTAMP").unwrap_or(UNKNOWN),
        target: option_env!("PASSPORT_WIZARD_BUILD_TARGET").unwrap_or(UNKNOWN),
        profile: option_env!("PASSPORT_WIZARD_BUILD_PROFILE").unwrap_or(UNKNOWN),
    }
}
