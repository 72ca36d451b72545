// ABOUTME: Host target description (operating system and CPU architecture).
// ABOUTME: Maps Rust's compile-time consts onto the names used by pack release assets.

use std::fmt;

/// Operating system family of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    Darwin,
    Windows,
    Other,
}

impl Os {
    fn from_rust(os: &str) -> Self {
        match os {
            "linux" => Os::Linux,
            "macos" => Os::Darwin,
            "windows" => Os::Windows,
            _ => Os::Other,
        }
    }

    /// POSIX-like hosts probe `PATH` one binary at a time.
    pub fn is_posix(&self) -> bool {
        matches!(self, Os::Linux | Os::Darwin)
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Os::Linux => "linux",
            Os::Darwin => "darwin",
            Os::Windows => "win32",
            Os::Other => std::env::consts::OS,
        };
        f.write_str(name)
    }
}

/// CPU architecture of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X64,
    Arm64,
    Ppc64,
    S390x,
    Other,
}

impl Arch {
    fn from_rust(arch: &str) -> Self {
        match arch {
            "x86_64" => Arch::X64,
            "aarch64" => Arch::Arm64,
            "powerpc64" => Arch::Ppc64,
            "s390x" => Arch::S390x,
            _ => Arch::Other,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Arch::X64 => "x64",
            Arch::Arm64 => "arm64",
            Arch::Ppc64 => "ppc64",
            Arch::S390x => "s390x",
            Arch::Other => std::env::consts::ARCH,
        };
        f.write_str(name)
    }
}

/// The machine commands execute on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    pub arch: Arch,
    pub os: Os,
}

impl Target {
    pub fn new(arch: Arch, os: Os) -> Self {
        Self { arch, os }
    }

    /// The target this binary was compiled for.
    pub fn host() -> Self {
        Self {
            arch: Arch::from_rust(std::env::consts::ARCH),
            os: Os::from_rust(std::env::consts::OS),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.os, self.arch)
    }
}
