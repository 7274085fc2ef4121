//! Staging of the distributable bundle.
//!
//! `build` clears stale output from the dist folder and copies the static
//! assets into it; `watch` repeats the copy whenever the manifest changes;
//! `link` exposes the dist folder inside the host application's data
//! directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use notify::{Event, EventKind, RecursiveMode, Watcher};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::ReleaseConfig;
use crate::error::{ReleaseError, Result};

const WATCH_DEBOUNCE: Duration = Duration::from_millis(200);

/// Build outputs that `clean` may remove from the dist folder.
///
/// TypeScript projects emit the first group, Less/SASS projects the second.
pub fn stale_outputs(config: &ReleaseConfig) -> Result<Vec<String>> {
    let name = config.project_name()?;
    let src = config.project_root.join("src");
    let mut files = Vec::new();

    if src.join(format!("{}.ts", name)).exists() {
        files.extend(
            ["lang", "templates", "assets", "module"]
                .iter()
                .map(|s| s.to_string()),
        );
        files.push(format!("{}.js", name));
        files.extend(
            ["module.json", "system.json", "template.json"]
                .iter()
                .map(|s| s.to_string()),
        );
    }

    if src.join(format!("{}.less", name)).exists() || src.join(format!("{}.scss", name)).exists() {
        files.push("fonts".to_string());
        files.push(format!("{}.css", name));
    }

    Ok(files)
}

/// Removes stale build outputs from the dist folder, ignoring missing entries.
///
/// # Returns
/// * `Ok(Vec<PathBuf>)` - the paths that were actually removed
pub fn clean(config: &ReleaseConfig) -> Result<Vec<PathBuf>> {
    let dist = config.dist_path();
    let mut removed = Vec::new();

    for entry in stale_outputs(config)? {
        let path = dist.join(&entry);
        let metadata = match fs::symlink_metadata(&path) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e.into()),
        };

        if metadata.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
        debug!(path = %path.display(), "removed");
        removed.push(path);
    }

    Ok(removed)
}

/// Copies every configured static entry that exists into the dist folder.
///
/// # Returns
/// * `Ok(usize)` - number of top-level entries copied
pub fn copy_statics(config: &ReleaseConfig) -> Result<usize> {
    let dist = config.dist_path();
    let mut copied = 0;

    for entry in &config.statics {
        let source = config.project_root.join(entry);
        if !source.exists() {
            debug!(entry = %entry, "static entry not present, skipping");
            continue;
        }
        copy_recursive(&source, &dist.join(entry))?;
        copied += 1;
    }

    info!(copied, dist = %dist.display(), "copied static files");
    Ok(copied)
}

/// `clean` followed by `copy_statics`.
pub fn build(config: &ReleaseConfig) -> Result<usize> {
    clean(config)?;
    copy_statics(config)
}

fn copy_recursive(source: &Path, dest: &Path) -> Result<()> {
    if source.is_file() {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, dest)?;
        return Ok(());
    }

    for entry in WalkDir::new(source) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// True when a filesystem event touches `manifest`.
pub fn touches_manifest(event: &Event, manifest: &Path) -> bool {
    let relevant_kind = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Any
    );
    relevant_kind
        && event
            .paths
            .iter()
            .any(|p| p.file_name().is_some() && p.file_name() == manifest.file_name())
}

/// Copies the static files, then copies them again each time the manifest
/// changes. Blocks until the watcher goes away.
pub fn watch(config: &ReleaseConfig) -> Result<()> {
    copy_statics(config)?;

    let manifest = config.manifest_path();
    let (tx, rx) = mpsc::channel::<Event>();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    // Watch the directory rather than the file so editors that replace the
    // file on save are still seen.
    watcher.watch(&config.project_root, RecursiveMode::NonRecursive)?;
    info!(path = %manifest.display(), "watching for changes");

    while let Ok(event) = rx.recv() {
        if !touches_manifest(&event, &manifest) {
            continue;
        }

        std::thread::sleep(WATCH_DEBOUNCE);
        while rx.try_recv().is_ok() {}

        info!("manifest changed, copying static files");
        if let Err(e) = copy_statics(config) {
            warn!(error = %e, "copy failed");
        }
    }

    Ok(())
}

/// Result of [`link`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    Created(PathBuf),
    AlreadyLinked(PathBuf),
    Removed(PathBuf),
    NotLinked(PathBuf),
}

/// Location of the module inside the host application's data directory.
pub fn link_target(config: &ReleaseConfig) -> Result<PathBuf> {
    let data_path = config
        .data_path
        .as_ref()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| ReleaseError::missing_config("no user data path configured"))?;

    Ok(data_path
        .join("Data")
        .join("modules")
        .join(config.project_name()?))
}

/// Symlinks the dist folder into the data directory, or removes that link.
///
/// Never touches a path at the link location that is not a symlink.
pub fn link(config: &ReleaseConfig, remove: bool) -> Result<LinkOutcome> {
    let target = link_target(config)?;
    let existing = fs::symlink_metadata(&target).ok();

    if remove {
        return match existing {
            None => Ok(LinkOutcome::NotLinked(target)),
            Some(m) if m.file_type().is_symlink() => {
                remove_link(&target)?;
                Ok(LinkOutcome::Removed(target))
            }
            Some(_) => Err(ReleaseError::link(format!(
                "'{}' is not a symbolic link",
                target.display()
            ))),
        };
    }

    let dist = config.dist_path();
    if !dist.is_dir() {
        return Err(ReleaseError::link(format!(
            "'{}' does not exist; run build first",
            dist.display()
        )));
    }
    let dist = dist.canonicalize()?;

    if let Some(m) = existing {
        if m.file_type().is_symlink() && fs::read_link(&target)? == dist {
            return Ok(LinkOutcome::AlreadyLinked(target));
        }
        return Err(ReleaseError::link(format!(
            "'{}' already exists",
            target.display()
        )));
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    create_link(&dist, &target)?;
    info!(link = %target.display(), dist = %dist.display(), "linked dist folder");
    Ok(LinkOutcome::Created(target))
}

#[cfg(unix)]
fn create_link(original: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
fn create_link(original: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(original, link)
}

#[cfg(unix)]
fn remove_link(link: &Path) -> io::Result<()> {
    fs::remove_file(link)
}

#[cfg(windows)]
fn remove_link(link: &Path) -> io::Result<()> {
    fs::remove_dir(link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind};

    fn config_named(name: &str, root: &Path) -> ReleaseConfig {
        ReleaseConfig {
            name: Some(name.to_string()),
            project_root: root.to_path_buf(),
            ..ReleaseConfig::default()
        }
    }

    #[test]
    fn test_stale_outputs_plain_project() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_named("plain", dir.path());
        assert!(stale_outputs(&config).unwrap().is_empty());
    }

    #[test]
    fn test_stale_outputs_typescript_and_scss() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/mymod.ts"), "").unwrap();
        fs::write(dir.path().join("src/mymod.scss"), "").unwrap();

        let outputs = stale_outputs(&config_named("mymod", dir.path())).unwrap();
        assert_eq!(
            outputs,
            vec![
                "lang",
                "templates",
                "assets",
                "module",
                "mymod.js",
                "module.json",
                "system.json",
                "template.json",
                "fonts",
                "mymod.css",
            ]
        );
    }

    #[test]
    fn test_touches_manifest() {
        let manifest = Path::new("/proj/module.json");
        let modify = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/proj/module.json"));
        let create = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/proj/module.json"));
        let other = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/proj/README.md"));
        let removed = Event::new(EventKind::Remove(RemoveKind::File))
            .add_path(PathBuf::from("/proj/module.json"));

        assert!(touches_manifest(&modify, manifest));
        assert!(touches_manifest(&create, manifest));
        assert!(!touches_manifest(&other, manifest));
        assert!(!touches_manifest(&removed, manifest));
    }

    #[test]
    fn test_link_requires_data_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_named("mymod", dir.path());
        assert!(matches!(
            link(&config, false),
            Err(ReleaseError::MissingConfiguration(_))
        ));
    }
}
