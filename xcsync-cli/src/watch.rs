//! Watch mode
//!
//! Watches the directories of every configuration and runs a full sync pass
//! after each burst of file system events.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use xcsync_core::pbxproj::descriptor_path;
use xcsync_core::{Configuration, SyncOptions};

/// Default quiet period before a burst of events triggers a pass
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub sync: SyncOptions,
    pub debounce: Duration,
}

/// Watch until interrupted
///
/// One pass runs at startup. Failed passes are logged and watching goes on.
pub async fn watch(options: WatchOptions) -> Result<()> {
    let configurations = Configuration::from_file(&options.sync.configuration_path)
        .context("Failed to load configurations")?;
    let roots = watch_roots(&options.sync.src_root, &configurations);
    let project_dir = project_dir(&options.sync.project_path);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                let _ = tx.send(event);
            }
            Err(e) => tracing::warn!("Watch error: {}", e),
        },
        Config::default(),
    )
    .context("Failed to create file watcher")?;

    for root in &roots {
        if root.exists() {
            watcher
                .watch(root, RecursiveMode::Recursive)
                .with_context(|| format!("Failed to watch {}", root.display()))?;
            tracing::info!("Watching {}", root.display());
        } else {
            tracing::warn!("Directory does not exist, not watching: {}", root.display());
        }
    }

    run_pass(&options.sync).await;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping watch");
                break;
            }
            event = rx.recv() => {
                let Some(event) = event else { break };
                if !is_relevant(&event, &project_dir) {
                    continue;
                }
                // Let the burst settle
                while let Ok(Some(_)) = tokio::time::timeout(options.debounce, rx.recv()).await {}
                run_pass(&options.sync).await;
            }
        }
    }

    drop(watcher);
    Ok(())
}

async fn run_pass(options: &SyncOptions) {
    let options = options.clone();
    match tokio::task::spawn_blocking(move || xcsync_core::run(&options)).await {
        Ok(Ok(report)) => crate::print_report(&report),
        Ok(Err(e)) => tracing::error!("Sync failed: {:#}", anyhow::Error::from(e)),
        Err(e) => tracing::error!("Sync task panicked: {}", e),
    }
}

/// Disk directories of all configurations, without nested duplicates
pub fn watch_roots(src_root: &Path, configurations: &[Configuration]) -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = configurations
        .iter()
        .map(|configuration| absolute(&src_root.join(&configuration.file_path)))
        .collect();
    roots.sort();
    roots.dedup();

    // Recursive watches already cover nested directories
    let mut kept: Vec<PathBuf> = Vec::with_capacity(roots.len());
    for root in roots {
        if !kept.iter().any(|parent| root.starts_with(parent)) {
            kept.push(root);
        }
    }
    kept
}

/// Whether an event should trigger a pass
///
/// Reads and writes of the project bundle itself are ignored, the latter so
/// that saving the project does not start another pass.
pub fn is_relevant(event: &Event, project_dir: &Path) -> bool {
    if matches!(event.kind, EventKind::Access(_) | EventKind::Other) {
        return false;
    }
    event.paths.iter().any(|path| !path.starts_with(project_dir))
}

fn project_dir(project_path: &Path) -> PathBuf {
    let descriptor = absolute(&descriptor_path(project_path));
    descriptor
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or(descriptor)
}

fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind};
    use tempfile::TempDir;

    #[test]
    fn test_watch_roots_skip_nested_and_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for dir in ["App/Views", "App/Views/Cells", "Models"] {
            std::fs::create_dir_all(root.join(dir)).unwrap();
        }
        let configurations = vec![
            Configuration::new("App/Views", "App/Views", "App"),
            Configuration::new("App/Views/Cells", "App/Views/Cells", "App"),
            Configuration::new("App/Models", "Models", "App"),
            Configuration::new("App/Other", "Models", "Tool"),
        ];

        let roots = watch_roots(root, &configurations);
        let base = absolute(root);
        assert_eq!(roots, vec![base.join("App/Views"), base.join("Models")]);
    }

    #[test]
    fn test_project_writes_are_not_relevant() {
        let project_dir = PathBuf::from("/src/App.xcodeproj");

        let save = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(project_dir.join("project.pbxproj"));
        assert!(!is_relevant(&save, &project_dir));

        let created = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/src/Views/New.swift"));
        assert!(is_relevant(&created, &project_dir));

        let read = Event::new(EventKind::Access(AccessKind::Any))
            .add_path(PathBuf::from("/src/Views/New.swift"));
        assert!(!is_relevant(&read, &project_dir));
    }

    #[test]
    fn test_project_dir_of_bundle_and_descriptor() {
        let temp_dir = TempDir::new().unwrap();
        let bundle = temp_dir.path().join("App.xcodeproj");
        std::fs::create_dir_all(&bundle).unwrap();
        std::fs::write(bundle.join("project.pbxproj"), "").unwrap();

        let expected = absolute(&bundle);
        assert_eq!(project_dir(&bundle), expected);
        assert_eq!(project_dir(&bundle.join("project.pbxproj")), expected);
    }
}
