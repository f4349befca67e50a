// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The importable-module index and its incremental background scanner.
//!
//! The index is an explicit, owned registry: constructed once, passed by reference
//! (inside an [`Arc`]) to whichever components need it. It is never a process-wide
//! singleton. The scanner performs one bounded unit of work per [`ModuleScanner::step`]
//! call (one directory of one search-path entry), so it can be polled from an idle slot
//! in a main loop; [`spawn_background_scan`] wraps the same stepping in a long-lived
//! tokio task for hosts that prefer that. Either way, completion queries work against
//! the partial index at any point: best effort, never all-or-nothing.

use std::{collections::{BTreeSet, HashSet, VecDeque},
          path::{Path, PathBuf},
          sync::Arc};

use tokio::sync::watch;

use crate::StdMutex;

const MODULE_FILE_EXTENSION: &str = "py";
const PACKAGE_MARKER: &str = "__init__.py";

/// Registry of dotted module names discovered so far.
#[derive(Debug, Default)]
pub struct ModuleIndex {
    inner: StdMutex<ModuleIndexInner>,
}

#[derive(Debug, Default)]
struct ModuleIndexInner {
    modules: BTreeSet<String>,
    scan_complete: bool,
}

impl ModuleIndex {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    pub fn insert(&self, dotted_name: impl Into<String>) {
        self.lock().modules.insert(dotted_name.into());
    }

    /// All module names starting with `prefix`, at whatever point the scan has reached.
    #[must_use]
    pub fn complete(&self, prefix: &str) -> BTreeSet<String> {
        self.lock()
            .modules
            .iter()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// The last-component names of modules directly under the dotted package `parent`,
    /// for `from parent import <Tab>`.
    #[must_use]
    pub fn submodules(&self, parent: &str) -> BTreeSet<String> {
        let want = format!("{parent}.");
        self.lock()
            .modules
            .iter()
            .filter_map(|name| {
                let rest = name.strip_prefix(&want)?;
                if rest.contains('.') {
                    None
                } else {
                    Some(rest.to_string())
                }
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize { self.lock().modules.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.lock().modules.is_empty() }

    #[must_use]
    pub fn scan_complete(&self) -> bool { self.lock().scan_complete }

    fn mark_scan_complete(&self) { self.lock().scan_complete = true; }

    fn lock(&self) -> std::sync::MutexGuard<'_, ModuleIndexInner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Incremental filesystem scanner feeding a [`ModuleIndex`]. Visited directories are
/// tracked by canonical path, so symbolic-link cycles terminate and each real module
/// path is recorded exactly once.
#[derive(Debug)]
pub struct ModuleScanner {
    index: Arc<ModuleIndex>,
    work: VecDeque<ScanUnit>,
    visited: HashSet<PathBuf>,
}

#[derive(Debug)]
struct ScanUnit {
    dir: PathBuf,
    /// Dotted package prefix, empty at a search-path root.
    package: String,
}

impl ModuleScanner {
    #[must_use]
    pub fn new(index: Arc<ModuleIndex>, search_paths: Vec<PathBuf>) -> Self {
        let work = search_paths
            .into_iter()
            .map(|dir| ScanUnit {
                dir,
                package: String::new(),
            })
            .collect();
        Self {
            index,
            work,
            visited: HashSet::new(),
        }
    }

    /// Perform one bounded unit of work: scan a single directory. Returns `false` once
    /// no work remains (at which point the index is marked complete).
    pub fn step(&mut self) -> bool {
        let Some(unit) = self.work.pop_front() else {
            self.index.mark_scan_complete();
            return false;
        };
        self.scan_dir(&unit.dir, &unit.package);
        true
    }

    /// Drive [`Self::step`] to exhaustion. Meant for tests and small path sets; hosts
    /// with big search paths use [`spawn_background_scan`] instead.
    pub fn run_to_completion(&mut self) {
        while self.step() {}
    }

    fn scan_dir(&mut self, dir: &Path, package: &str) {
        // Canonicalize to detect symlink cycles; a dir we cannot canonicalize cannot be
        // read either, so skipping it is the per-entry error policy in action.
        let real = match dir.canonicalize() {
            Ok(real) => real,
            Err(error) => {
                tracing::debug!(
                    message = "module scan: cannot canonicalize dir, skipping",
                    dir = ?dir,
                    error = %error
                );
                return;
            }
        };
        if !self.visited.insert(real) {
            return;
        }

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(error) => {
                tracing::debug!(
                    message = "module scan: cannot read dir, skipping",
                    dir = ?dir,
                    error = %error
                );
                return;
            }
        };

        for entry in entries {
            let Ok(entry) = entry else { continue };
            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|name| name.to_str())
            else {
                continue;
            };

            if path.is_dir() {
                if path.join(PACKAGE_MARKER).is_file() {
                    let dotted = join_dotted(package, file_name);
                    self.index.insert(&dotted);
                    self.work.push_back(ScanUnit {
                        dir: path,
                        package: dotted,
                    });
                }
            } else if let Some(stem) = file_name.strip_suffix(&format!(".{MODULE_FILE_EXTENSION}"))
                && stem != "__init__"
                && is_identifier(stem)
            {
                self.index.insert(join_dotted(package, stem));
            }
        }
    }
}

fn join_dotted(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_alphanumeric() || ch == '_')
}

/// Handle to a background scan task. Request shutdown, then await it, in the same way
/// other long-lived tasks in this workspace shut down.
#[derive(Debug)]
pub struct BackgroundScan {
    shutdown_sender: watch::Sender<bool>,
    task: tokio::task::JoinHandle<()>,
}

/// Run the scanner to exhaustion on a blocking worker, one bounded step at a time,
/// checking for shutdown between steps.
#[must_use]
pub fn spawn_background_scan(mut scanner: ModuleScanner) -> BackgroundScan {
    let (shutdown_sender, shutdown_receiver) = watch::channel(false);
    let task = tokio::task::spawn_blocking(move || {
        loop {
            if *shutdown_receiver.borrow() {
                break;
            }
            if !scanner.step() {
                break;
            }
        }
    });
    BackgroundScan {
        shutdown_sender,
        task,
    }
}

impl BackgroundScan {
    pub fn request_shutdown(&self) { let _ = self.shutdown_sender.send(true); }

    pub async fn await_shutdown(self) { let _ = self.task.await; }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "coil_scan_{tag}_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_scan_records_modules_and_packages() {
        let root = temp_dir("basic");
        std::fs::write(root.join("alpha.py"), "").unwrap();
        std::fs::write(root.join("notes.txt"), "").unwrap();
        let pkg = root.join("pkg");
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::write(pkg.join("__init__.py"), "").unwrap();
        std::fs::write(pkg.join("beta.py"), "").unwrap();

        let index = Arc::new(ModuleIndex::new());
        let mut scanner = ModuleScanner::new(index.clone(), vec![root.clone()]);
        scanner.run_to_completion();

        let all: Vec<String> = index.complete("").into_iter().collect();
        assert_eq!(all, vec!["alpha", "pkg", "pkg.beta"]);
        assert!(index.scan_complete());

        assert_eq!(
            index.submodules("pkg").into_iter().collect::<Vec<_>>(),
            vec!["beta"]
        );

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_queries_work_on_a_partial_index() {
        let root = temp_dir("partial");
        std::fs::write(root.join("alpha.py"), "").unwrap();
        let pkg = root.join("pkg");
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::write(pkg.join("__init__.py"), "").unwrap();
        std::fs::write(pkg.join("beta.py"), "").unwrap();

        let index = Arc::new(ModuleIndex::new());
        let mut scanner = ModuleScanner::new(index.clone(), vec![root.clone()]);

        // One step scans only the root directory; `pkg.beta` is not known yet, but the
        // index still answers.
        assert!(scanner.step());
        let partial = index.complete("");
        assert!(partial.contains("alpha"));
        assert!(partial.contains("pkg"));
        assert!(!partial.contains("pkg.beta"));
        assert!(!index.scan_complete());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_terminates_and_yields_each_module_once() {
        let root = temp_dir("cycle");
        let pkg = root.join("pkg");
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::write(pkg.join("__init__.py"), "").unwrap();
        std::fs::write(pkg.join("gamma.py"), "").unwrap();
        // pkg/loop -> pkg, a directory cycle. Give it a package marker via the cycle
        // itself (loop/__init__.py is pkg/__init__.py).
        std::os::unix::fs::symlink(&pkg, pkg.join("loop")).unwrap();

        let index = Arc::new(ModuleIndex::new());
        let mut scanner = ModuleScanner::new(index.clone(), vec![root.clone()]);
        scanner.run_to_completion();

        // Termination is the property under test; "gamma" must be there exactly once
        // under its real path.
        assert!(index.complete("").contains("pkg.gamma"));
        assert!(!index.complete("").contains("pkg.loop.gamma"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_background_scan_shutdown() {
        let root = temp_dir("bg");
        std::fs::write(root.join("alpha.py"), "").unwrap();

        let index = Arc::new(ModuleIndex::new());
        let scanner = ModuleScanner::new(index.clone(), vec![root.clone()]);
        let background = spawn_background_scan(scanner);
        background.request_shutdown();
        background.await_shutdown().await;

        let _ = std::fs::remove_dir_all(&root);
    }
}
