//! Release workflow orchestration
//!
//! Keeps the update and publish sequences apart from argument parsing so they
//! can be driven programmatically, and against a mock repository in tests.

use std::fs;

use serde_json::Value;
use tracing::{debug, info};

use crate::config::ReleaseConfig;
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::manifest::{apply_version, CompactOptions, Manifest};
use crate::version::resolve_version;

/// Result of a manifest update
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    /// Version recorded before the update
    pub previous: String,

    /// Version written (or, on a dry run, that would be written)
    pub version: String,

    pub download_url: String,

    /// False on a dry run
    pub written: bool,
}

impl UpdateOutcome {
    pub fn tag_name(&self) -> String {
        format!("v{}", self.version)
    }

    pub fn tag_message(&self) -> String {
        format!("Updated to {}", self.version)
    }

    pub fn commit_message(&self) -> String {
        format!("version bump v{}", self.version)
    }
}

/// Arguments for the publish workflow
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PublishWorkflowArgs {
    /// Literal version or bump level; falls back to the package descriptor
    pub version: Option<String>,

    /// Preview mode - resolve the version but write, commit and tag nothing
    pub dry_run: bool,
}

/// Result of a successful publish workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub update: UpdateOutcome,

    /// The tag that was created
    pub tag: String,

    /// Commit id, absent on a dry run
    pub commit: Option<String>,
}

/// The version request to use: the explicit argument if given, otherwise the
/// `version` field of the package descriptor when that file exists.
pub fn requested_version(config: &ReleaseConfig, explicit: Option<&str>) -> Result<Option<String>> {
    if let Some(request) = explicit {
        return Ok(Some(request.to_string()));
    }

    let package_path = config.package_path();
    if !package_path.is_file() {
        return Ok(None);
    }

    let package: Value = serde_json::from_str(&fs::read_to_string(&package_path)?)?;
    let version = package
        .get("version")
        .and_then(Value::as_str)
        .map(str::to_string);
    debug!(path = %package_path.display(), ?version, "read version request from package file");
    Ok(version)
}

fn plan_update(config: &ReleaseConfig, request: Option<&str>) -> Result<(Manifest, UpdateOutcome)> {
    let (repository, _raw_url) = config.require_urls()?;
    let manifest = Manifest::load(&config.manifest_path())?;
    let request = requested_version(config, request)?;

    let previous = manifest.version()?.to_string();
    let target = resolve_version(request.as_deref(), &previous)?;
    let manifest = apply_version(manifest, &target, Some(repository), &config.release_names())?;

    let download_url = manifest
        .download_url()
        .ok_or_else(|| ReleaseError::invalid_manifest("download URL was not written"))?
        .to_string();

    let outcome = UpdateOutcome {
        previous,
        version: target.to_string(),
        download_url,
        written: false,
    };
    Ok((manifest, outcome))
}

/// Resolves the next version and rewrites the manifest's version and URLs.
///
/// Steps, each aborting on error:
/// 1. Require the repository URLs in `config`
/// 2. Load the manifest
/// 3. Resolve the target version from `request` (or the package descriptor)
/// 4. Derive the URLs and write the manifest, unless `dry_run`
pub fn update_manifest(
    config: &ReleaseConfig,
    request: Option<&str>,
    dry_run: bool,
) -> Result<UpdateOutcome> {
    let (manifest, mut outcome) = plan_update(config, request)?;

    if dry_run {
        info!(version = %outcome.version, "dry run, manifest left untouched");
        return Ok(outcome);
    }

    manifest.save(&config.manifest_path(), &CompactOptions::default())?;
    outcome.written = true;
    info!(from = %outcome.previous, to = %outcome.version, "updated manifest version");
    Ok(outcome)
}

/// Main publish workflow
///
/// 1. Resolve the target version and check its tag is free
/// 2. Rewrite the manifest
/// 3. Commit all tracked changes as `version bump v{version}`
/// 4. Tag `v{version}` with message `Updated to {version}`
///
/// A failure after step 2 leaves the manifest written and uncommitted.
pub fn run_publish_workflow<R: Repository>(
    config: &ReleaseConfig,
    args: &PublishWorkflowArgs,
    repo: &R,
) -> Result<WorkflowResult> {
    let (_, planned) = plan_update(config, args.version.as_deref())?;
    let tag = planned.tag_name();

    if repo.tag_exists(&tag)? {
        return Err(git2::Error::from_str(&format!("tag '{}' already exists", tag)).into());
    }

    if args.dry_run {
        return Ok(WorkflowResult {
            update: planned,
            tag,
            commit: None,
        });
    }

    let update = update_manifest(config, args.version.as_deref(), false)?;
    let commit = repo.commit_tracked(&update.commit_message())?;
    repo.create_annotated_tag(&tag, &update.tag_message())?;
    info!(tag = %tag, commit = %commit, "published release");

    Ok(WorkflowResult {
        update,
        tag,
        commit: Some(commit),
    })
}
