//! CPU architectures for universal macOS binaries.

/// CPU architecture of one slice of a universal binary.
///
/// # Examples
///
/// ```
/// use release_bundler::bundler::Arch;
///
/// assert_eq!(Arch::AArch64.apple_target_triple(), "aarch64-apple-darwin");
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Arch {
    /// x86_64 / Intel Macs
    X86_64,
    /// AArch64 / Apple Silicon
    AArch64,
}

impl Arch {
    /// Slices combined by `lipo` into a universal binary.
    pub const UNIVERSAL: [Arch; 2] = [Arch::X86_64, Arch::AArch64];

    /// Rust target triple for this architecture on macOS.
    pub fn apple_target_triple(&self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64-apple-darwin",
            Arch::AArch64 => "aarch64-apple-darwin",
        }
    }
}
