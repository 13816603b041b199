use crate::error::SecretsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Darwin,
    Linux,
}

impl Platform {
    pub fn current() -> Result<Self, SecretsError> {
        Self::from_os(std::env::consts::OS)
    }

    fn from_os(os: &'static str) -> Result<Self, SecretsError> {
        match os {
            "macos" => Ok(Platform::Darwin),
            "linux" => Ok(Platform::Linux),
            other => Err(SecretsError::UnsupportedPlatform {
                os: other,
                arch: std::env::consts::ARCH,
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Darwin => "darwin",
            Platform::Linux => "linux",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    Amd64,
    Arm64,
}

impl Arch {
    pub fn current() -> Result<Self, SecretsError> {
        Self::from_arch(std::env::consts::ARCH)
    }

    fn from_arch(arch: &'static str) -> Result<Self, SecretsError> {
        match arch {
            "x86_64" => Ok(Arch::Amd64),
            "aarch64" => Ok(Arch::Arm64),
            other => Err(SecretsError::UnsupportedPlatform {
                os: std::env::consts::OS,
                arch: other,
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
        }
    }
}

/// Release asset name, e.g. `sops-v3.11.0.linux.amd64`.
pub fn sops_filename(version: &str, platform: Platform, arch: Arch) -> String {
    format!(
        "sops-{version}.{platform}.{arch}",
        platform = platform.as_str(),
        arch = arch.as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_asset_naming() {
        assert_eq!(
            sops_filename("v3.11.0", Platform::Linux, Arch::Amd64),
            "sops-v3.11.0.linux.amd64"
        );
        assert_eq!(
            sops_filename("v3.11.0", Platform::Darwin, Arch::Arm64),
            "sops-v3.11.0.darwin.arm64"
        );
    }

    #[test]
    fn maps_rust_target_names() {
        assert_eq!(Platform::from_os("macos").unwrap(), Platform::Darwin);
        assert_eq!(Arch::from_arch("x86_64").unwrap(), Arch::Amd64);
        assert!(Platform::from_os("windows").is_err());
        assert!(Arch::from_arch("riscv64").is_err());
    }
}
