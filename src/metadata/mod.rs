//! Metadata and binary discovery from single Cargo.toml

use crate::bundler::{DmgSettings, MacOsSettings, PackageSettings};
use crate::error::{BundlerError, CliError, Result};
use std::path::Path;

/// Everything the pipeline needs from the project's Cargo.toml
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectManifest {
    /// Product, binary and version
    pub package: PackageSettings,

    /// `[package.metadata.bundle.macos]`
    pub macos: MacOsSettings,

    /// `[package.metadata.bundle.dmg]`
    pub dmg: DmgSettings,
}

/// Load the project manifest (single read + parse)
///
/// - binary name: first `[[bin]]` name, else `package.name`
/// - product name: `package.metadata.bundle.product_name`, else the package
///   name with its first letter upper-cased
pub fn load_manifest(cargo_toml_path: &Path) -> Result<ProjectManifest> {
    let manifest = std::fs::read_to_string(cargo_toml_path)
        .map_err(|e| manifest_error(cargo_toml_path, e.to_string()))?;

    parse_manifest(cargo_toml_path, &manifest)
}

fn parse_manifest(cargo_toml_path: &Path, manifest: &str) -> Result<ProjectManifest> {
    let toml_value: toml::Table = toml::from_str(manifest)
        .map_err(|e| manifest_error(cargo_toml_path, format!("invalid TOML: {}", e)))?;

    let package = toml_value
        .get("package")
        .and_then(|v| v.as_table())
        .ok_or_else(|| manifest_error(cargo_toml_path, "no [package] section"))?;

    let name = package
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| manifest_error(cargo_toml_path, "missing 'name' in [package]"))?;

    let version = package
        .get("version")
        .and_then(|v| v.as_str())
        .ok_or_else(|| manifest_error(cargo_toml_path, "missing 'version' in [package]"))?
        .to_string();

    // Try [[bin]] section first
    let binary_name = toml_value
        .get("bin")
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .and_then(|first| first.get("name"))
        .and_then(|v| v.as_str())
        .unwrap_or(name)
        .to_string();

    let bundle = package
        .get("metadata")
        .and_then(|m| m.get("bundle"))
        .and_then(|b| b.as_table());

    let product_name = bundle
        .and_then(|b| b.get("product_name"))
        .and_then(|v| v.as_str())
        .map(String::from)
        .unwrap_or_else(|| capitalize(name));

    let macos = match bundle.and_then(|b| b.get("macos")) {
        Some(value) => value
            .clone()
            .try_into::<MacOsSettings>()
            .map_err(|e| manifest_error(cargo_toml_path, format!("[package.metadata.bundle.macos]: {}", e)))?,
        None => MacOsSettings::default(),
    };

    let dmg = match bundle.and_then(|b| b.get("dmg")) {
        Some(value) => value
            .clone()
            .try_into::<DmgSettings>()
            .map_err(|e| manifest_error(cargo_toml_path, format!("[package.metadata.bundle.dmg]: {}", e)))?,
        None => DmgSettings::default(),
    };

    Ok(ProjectManifest {
        package: PackageSettings {
            product_name,
            binary_name,
            version,
        },
        macos,
        dmg,
    })
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn manifest_error(path: &Path, reason: impl Into<String>) -> BundlerError {
    BundlerError::Cli(CliError::Manifest {
        path: path.to_path_buf(),
        reason: reason.into(),
    })
}
