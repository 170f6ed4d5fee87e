//! macOS `.app` bundle assembly.
//!
//! The bundle is the template tree with the executable dropped into
//! `Contents/MacOS`. A re-run replaces the previous bundle entirely, so files
//! removed from the template do not linger.

use std::path::{Path, PathBuf};

use crate::bundler::{Error, Result, Settings, Stage, platform::require, utils::fs};

/// Assemble the bundle and return its path.
///
/// # Process
/// 1. Check the executable and the template exist (before touching disk)
/// 2. Remove any previous bundle
/// 3. Create `Contents/MacOS`
/// 4. Copy the template tree into the bundle root
/// 5. Copy the executable into `Contents/MacOS`
///
/// # Errors
///
/// - [`Error::MissingPrerequisite`] if the executable or template is absent
/// - [`Error::BundleAssemblyFailure`] for any filesystem error after that;
///   the partial bundle must not be used
pub async fn bundle_project(settings: &Settings) -> Result<PathBuf> {
    let binary = settings.binary_path();
    let template = settings.template_path();
    require(Stage::Bundle, &binary)?;
    if !template.is_dir() {
        return Err(Error::MissingPrerequisite {
            stage: Stage::Bundle,
            path: template,
        });
    }

    let bundle = settings.app_bundle_path();
    log::info!(
        "Assembling {} from {}",
        bundle.display(),
        template.display()
    );

    assemble(settings, &binary, &template, &bundle)
        .await
        .map_err(|cause| Error::BundleAssemblyFailure {
            path: bundle.clone(),
            cause: Box::new(cause),
        })?;

    log::info!("✓ Created {}", bundle.display());
    Ok(bundle)
}

async fn assemble(settings: &Settings, binary: &Path, template: &Path, bundle: &Path) -> Result<()> {
    fs::remove_dir_all(bundle).await?;

    let binary_dir = settings.app_binary_directory();
    fs::create_dir_all(&binary_dir).await?;
    fs::copy_dir(template, bundle).await?;
    fs::copy_file(binary, &binary_dir.join(settings.binary_name())).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{PackageSettings, SettingsBuilder};

    fn settings(root: &Path) -> Settings {
        SettingsBuilder::new()
            .manifest_path(root.join("Cargo.toml"))
            .package_settings(PackageSettings {
                product_name: "Demo".into(),
                binary_name: "demo".into(),
                version: "0.1.0".into(),
            })
            .build()
            .unwrap()
    }

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[tokio::test]
    async fn bundle_contains_template_and_executable() {
        let tmp = tempfile::tempdir().unwrap();
        let s = settings(tmp.path());
        write(&s.binary_path(), "placeholder");
        write(&s.template_path().join("Contents/Info.plist"), "<plist/>");

        let bundle = bundle_project(&s).await.unwrap();

        assert_eq!(bundle, s.app_bundle_path());
        assert_eq!(
            std::fs::read_to_string(s.bundled_binary_path()).unwrap(),
            "placeholder"
        );
        assert_eq!(
            std::fs::read_to_string(bundle.join("Contents/Info.plist")).unwrap(),
            "<plist/>"
        );
    }

    #[tokio::test]
    async fn rerun_replaces_previous_bundle() {
        let tmp = tempfile::tempdir().unwrap();
        let s = settings(tmp.path());
        write(&s.binary_path(), "v1");
        write(&s.template_path().join("Contents/Info.plist"), "<plist/>");
        write(&s.app_bundle_path().join("Contents/stale.txt"), "old");

        bundle_project(&s).await.unwrap();
        write(&s.binary_path(), "v2");
        bundle_project(&s).await.unwrap();

        assert!(!s.app_bundle_path().join("Contents/stale.txt").exists());
        assert_eq!(std::fs::read_to_string(s.bundled_binary_path()).unwrap(), "v2");
    }

    #[tokio::test]
    async fn missing_template_fails_without_touching_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let s = settings(tmp.path());
        write(&s.binary_path(), "placeholder");

        let err = bundle_project(&s).await.unwrap_err();

        assert!(matches!(
            err,
            Error::MissingPrerequisite { stage: Stage::Bundle, ref path } if *path == s.template_path()
        ));
        assert!(!s.app_directory().exists());
    }

    #[tokio::test]
    async fn missing_executable_is_a_missing_prerequisite() {
        let tmp = tempfile::tempdir().unwrap();
        let s = settings(tmp.path());
        write(&s.template_path().join("Contents/Info.plist"), "<plist/>");

        let err = bundle_project(&s).await.unwrap_err();
        assert!(matches!(
            err,
            Error::MissingPrerequisite { ref path, .. } if *path == s.binary_path()
        ));
    }
}
