//! cli::submit
//!
//! The end-to-end flow behind every `em` invocation: resolve the
//! remote, authenticate, derive branch names and request text from the
//! latest commit, push, open the request on the forge, and when a
//! merge was asked for and succeeded, bring the local checkout back in
//! line with the remote.

use std::path::Path;

use anyhow::{Context, Result};

use crate::auth::CredentialGate;
use crate::forge::{
    create_and_maybe_merge, create_forge, create_token_check, DispatchOutcome, MergeOutcome,
    MergeRequestSpec,
};
use crate::git::Git;
use crate::host::{PlatformProbe, RemoteDescriptor};
use crate::naming::{NamingError, RefNameSanitizer};
use crate::secrets::KeychainSecretStore;
use crate::ui::output::{self, Verbosity};
use crate::ui::prompts;

use super::args::Cli;

/// Submit the current branch as a merge request.
pub fn submit(args: &Cli, verbosity: Verbosity) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
    runtime.block_on(submit_async(args, verbosity))
}

async fn submit_async(args: &Cli, verbosity: Verbosity) -> Result<()> {
    let git = Git::open(Path::new(".")).context("Not inside a git repository")?;

    let remote = git.first_remote().context("Failed to find a git remote")?;
    let url = git
        .remote_url(&remote)
        .with_context(|| format!("Failed to read the URL of remote '{remote}'"))?;
    let descriptor = RemoteDescriptor::parse(&url)?;
    output::debug(
        format!("remote '{}' -> {}:{}", remote, descriptor.host, descriptor.repo_path),
        verbosity,
    );

    let provider = PlatformProbe::new().detect(&descriptor.host).await?;
    output::debug(format!("detected platform: {provider}"), verbosity);

    let store = KeychainSecretStore::new();
    let check = create_token_check(provider, &descriptor.host);
    let gate = CredentialGate::new(&store, provider.token_name());
    let token = gate.obtain(check.as_ref(), prompts::password).await?;

    let message = git.head_message().context("Failed to read the latest commit")?;
    let (default_title, default_description) = split_message(&message);
    let title = args.title.clone().unwrap_or(default_title);
    let description = args.description.clone().unwrap_or(default_description);

    let current = git.current_branch().context("Failed to read the current branch")?;
    let (source, target) = derive_branches(
        args.source.as_deref(),
        args.dest.as_deref(),
        &message,
        &current,
        &git.default_branch(&remote),
    )?;

    if source != current {
        git.create_branch(&source)
            .with_context(|| format!("Failed to create branch '{source}'"))?;
    }
    git.push(&remote, &source)
        .with_context(|| format!("Failed to push '{source}' to '{remote}'"))?;

    let forge = create_forge(provider, &descriptor, &token);
    let spec = MergeRequestSpec {
        source_branch: source.clone(),
        target_branch: target.clone(),
        title,
        description,
        squash: args.squash,
        auto_merge: args.merge,
    };
    let method = spec.merge_method();
    let outcome = create_and_maybe_merge(forge.as_ref(), spec)
        .await
        .context("Failed to create the merge request")?;

    output::print("Created merge request!", verbosity);
    output::print(&outcome.request.url, verbosity);
    report_merge(&outcome, method, verbosity);

    if outcome.merged() {
        restore_local_state(&git, &remote, &source, &target, verbosity)?;
    }

    Ok(())
}

/// Report what happened after creation. A refused merge is surfaced as
/// a warning, not a failure: the request exists on the forge.
fn report_merge(outcome: &DispatchOutcome, method: crate::forge::MergeMethod, verbosity: Verbosity) {
    match &outcome.merge {
        MergeOutcome::Merged => {
            output::print(format!("Merged by {method} method"), verbosity);
            if outcome.branch_cleanup_error.is_none() {
                output::print(
                    format!("Deleted source branch {}", outcome.request.source_branch),
                    verbosity,
                );
            }
        }
        MergeOutcome::Skipped => {
            output::print("Skipping merge", verbosity);
        }
        MergeOutcome::Failed(e) => {
            output::warn(format!("merge request was created but not merged: {e}"), verbosity);
        }
    }
    if let Some(e) = &outcome.branch_cleanup_error {
        output::warn(format!("could not delete the remote source branch: {e}"), verbosity);
    }
}

/// After a confirmed merge, move the local checkout onto a fresh copy
/// of the target branch and drop the local branches the merge made
/// obsolete.
fn restore_local_state(
    git: &Git,
    remote: &str,
    source: &str,
    target: &str,
    verbosity: Verbosity,
) -> Result<()> {
    output::debug(format!("updating local '{target}' from '{remote}'"), verbosity);
    git.fetch(remote)
        .with_context(|| format!("Failed to fetch from '{remote}'"))?;
    if git.branch_exists(target) {
        git.delete_branch(target)
            .with_context(|| format!("Failed to delete stale local branch '{target}'"))?;
    }
    git.checkout_tracking(remote, target)
        .with_context(|| format!("Failed to check out '{target}' from '{remote}'"))?;
    if git.branch_exists(source) {
        git.delete_branch(source)
            .with_context(|| format!("Failed to delete merged branch '{source}'"))?;
    }
    Ok(())
}

/// Work out the source and target branches.
///
/// The source is the explicit `--source`, else the sanitized full
/// commit message (a multi-line message collapses into one branch
/// name; `--title` never changes it). The target is the explicit
/// `--dest`, else the branch currently checked out when the source is
/// a different branch, else the remote's default.
fn derive_branches(
    source_arg: Option<&str>,
    dest_arg: Option<&str>,
    message: &str,
    current: &str,
    default_branch: &str,
) -> Result<(String, String), NamingError> {
    let source = match source_arg {
        Some(name) => name.to_string(),
        None => RefNameSanitizer::new().sanitize(message)?,
    };
    let target = match dest_arg {
        Some(name) => name.to_string(),
        None if source != current => current.to_string(),
        None => default_branch.to_string(),
    };
    Ok((source, target))
}

/// Split a commit message into title (first line) and description
/// (everything after, trimmed).
fn split_message(message: &str) -> (String, String) {
    let mut lines = message.lines();
    let title = lines.next().unwrap_or("").trim().to_string();
    let description = lines.collect::<Vec<_>>().join("\n").trim().to_string();
    (title, description)
}
