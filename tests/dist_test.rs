use module_release::config::ReleaseConfig;
use module_release::dist::{self, LinkOutcome};
use module_release::ReleaseError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn project(name: &str) -> (TempDir, ReleaseConfig) {
    let dir = tempfile::tempdir().unwrap();
    let config = ReleaseConfig {
        name: Some(name.to_string()),
        project_root: dir.path().to_path_buf(),
        ..ReleaseConfig::default()
    };
    (dir, config)
}

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, path.to_string_lossy().as_bytes()).unwrap();
}

#[test]
fn test_copy_statics_copies_existing_entries() {
    let (dir, config) = project("mymod");
    let root = dir.path();
    touch(&root.join("module.json"));
    touch(&root.join("README.md"));
    touch(&root.join("packs/items.db"));
    touch(&root.join("packs/nested/spells.db"));

    let copied = dist::copy_statics(&config).unwrap();
    assert_eq!(copied, 3);

    let dist_dir = root.join("dist");
    assert!(dist_dir.join("module.json").is_file());
    assert!(dist_dir.join("README.md").is_file());
    assert!(dist_dir.join("packs/nested/spells.db").is_file());
    assert!(!dist_dir.join("images").exists());
}

#[test]
fn test_clean_removes_only_stale_outputs() {
    let (dir, config) = project("mymod");
    let root = dir.path();
    touch(&root.join("src/mymod.ts"));
    touch(&root.join("dist/lang/en.json"));
    touch(&root.join("dist/mymod.js"));
    touch(&root.join("dist/module.json"));
    touch(&root.join("dist/fonts/a.woff"));
    touch(&root.join("dist/keep.txt"));

    let removed = dist::clean(&config).unwrap();
    assert_eq!(removed.len(), 3);

    assert!(!root.join("dist/lang").exists());
    assert!(!root.join("dist/mymod.js").exists());
    assert!(!root.join("dist/module.json").exists());
    // no stylesheet source, so fonts survive
    assert!(root.join("dist/fonts/a.woff").exists());
    assert!(root.join("dist/keep.txt").exists());
}

#[test]
fn test_clean_without_dist_is_ok() {
    let (dir, config) = project("mymod");
    touch(&dir.path().join("src/mymod.less"));
    assert!(dist::clean(&config).unwrap().is_empty());
}

#[test]
fn test_build_cleans_then_copies() {
    let (dir, config) = project("mymod");
    let root = dir.path();
    touch(&root.join("src/mymod.scss"));
    touch(&root.join("dist/mymod.css"));
    fs::write(root.join("module.json"), "{}").unwrap();

    assert_eq!(dist::build(&config).unwrap(), 1);
    assert!(!root.join("dist/mymod.css").exists());
    assert_eq!(fs::read_to_string(root.join("dist/module.json")).unwrap(), "{}");
}

#[cfg(unix)]
#[test]
fn test_link_and_unlink() {
    let (dir, mut config) = project("mymod");
    let data = tempfile::tempdir().unwrap();
    config.data_path = Some(data.path().to_path_buf());
    fs::create_dir(dir.path().join("dist")).unwrap();

    let target = data.path().join("Data/modules/mymod");

    assert_eq!(
        dist::link(&config, false).unwrap(),
        LinkOutcome::Created(target.clone())
    );
    assert!(fs::symlink_metadata(&target).unwrap().file_type().is_symlink());

    assert_eq!(
        dist::link(&config, false).unwrap(),
        LinkOutcome::AlreadyLinked(target.clone())
    );

    assert_eq!(
        dist::link(&config, true).unwrap(),
        LinkOutcome::Removed(target.clone())
    );
    assert!(fs::symlink_metadata(&target).is_err());

    assert_eq!(
        dist::link(&config, true).unwrap(),
        LinkOutcome::NotLinked(target)
    );
}

#[test]
fn test_link_refuses_real_directory() {
    let (dir, mut config) = project("mymod");
    let data = tempfile::tempdir().unwrap();
    config.data_path = Some(data.path().to_path_buf());
    fs::create_dir(dir.path().join("dist")).unwrap();
    fs::create_dir_all(data.path().join("Data/modules/mymod")).unwrap();

    assert!(matches!(dist::link(&config, false), Err(ReleaseError::Link(_))));
    assert!(matches!(dist::link(&config, true), Err(ReleaseError::Link(_))));
    assert!(data.path().join("Data/modules/mymod").is_dir());
}

#[test]
fn test_link_requires_built_dist() {
    let (_dir, mut config) = project("mymod");
    let data = tempfile::tempdir().unwrap();
    config.data_path = Some(data.path().to_path_buf());

    assert!(matches!(dist::link(&config, false), Err(ReleaseError::Link(_))));
}
