use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::models::{ClipboardMode, ClipboardSnapshot, Operation};

static SHARED: OnceCell<Arc<PendingFileOperation>> = OnceCell::new();

/// Files staged by a copy or cut, waiting for a paste.
pub struct PendingFileOperation {
    mode: ClipboardMode,
    state: Mutex<ClipboardSnapshot>,
}

impl PendingFileOperation {
    pub fn new(mode: ClipboardMode) -> Self {
        Self {
            mode,
            state: Mutex::new(ClipboardSnapshot::default()),
        }
    }

    /// Process-wide instance. Created on first use, in permissive mode unless
    /// [`shared_with`](Self::shared_with) ran first.
    pub fn shared() -> &'static PendingFileOperation {
        &**init_in(&SHARED, ClipboardMode::Permissive)
    }

    /// The process-wide instance as an owned handle. `mode` only applies if
    /// this call creates it.
    pub fn shared_with(mode: ClipboardMode) -> Arc<PendingFileOperation> {
        Arc::clone(init_in(&SHARED, mode))
    }

    pub fn mode(&self) -> ClipboardMode {
        self.mode
    }

    fn lock(&self) -> MutexGuard<'_, ClipboardSnapshot> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replaces files and operation together. Pairs are not validated.
    pub fn set_items(&self, files: &[PathBuf], operation: Operation) {
        let files = if operation == Operation::None && self.mode == ClipboardMode::Strict {
            Vec::new()
        } else {
            files.to_vec()
        };
        tracing::debug!(count = files.len(), ?operation, "clipboard updated");

        let mut state = self.lock();
        state.files = files;
        state.operation = operation;
    }

    pub fn items(&self) -> Vec<PathBuf> {
        self.lock().files.clone()
    }

    pub fn operation(&self) -> Operation {
        self.lock().operation
    }

    pub fn has_items(&self) -> bool {
        self.lock().has_items()
    }

    pub fn snapshot(&self) -> ClipboardSnapshot {
        self.lock().clone()
    }

    /// Returns what a paste should act on. A move is consumed, a copy stays.
    pub fn take(&self) -> ClipboardSnapshot {
        let mut state = self.lock();
        let snapshot = state.clone();
        if snapshot.operation == Operation::Move {
            *state = ClipboardSnapshot::default();
        }
        snapshot
    }

    pub fn clear(&self) {
        *self.lock() = ClipboardSnapshot::default();
    }
}

fn init_in(cell: &OnceCell<Arc<PendingFileOperation>>, mode: ClipboardMode) -> &Arc<PendingFileOperation> {
    let shared = cell.get_or_init(|| {
        tracing::debug!(?mode, "creating shared clipboard");
        Arc::new(PendingFileOperation::new(mode))
    });
    if shared.mode != mode {
        tracing::debug!(requested = ?mode, active = ?shared.mode, "shared clipboard already created");
    }
    shared
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn starts_empty() {
        let clip = PendingFileOperation::new(ClipboardMode::Permissive);
        assert!(!clip.has_items());
        assert_eq!(clip.operation(), Operation::None);
        assert!(clip.items().is_empty());
    }

    #[test]
    fn copy_holds_items() {
        let clip = PendingFileOperation::new(ClipboardMode::Permissive);
        clip.set_items(&paths(&["/tmp/a", "/tmp/b"]), Operation::Copy);

        assert!(clip.has_items());
        assert_eq!(clip.operation(), Operation::Copy);
        assert_eq!(clip.items(), paths(&["/tmp/a", "/tmp/b"]));
    }

    #[test]
    fn returned_items_are_a_copy() {
        let clip = PendingFileOperation::new(ClipboardMode::Permissive);
        let mut source = paths(&["/tmp/a", "/tmp/b"]);
        clip.set_items(&source, Operation::Copy);
        source.push(PathBuf::from("/tmp/c"));

        let mut items = clip.items();
        items.clear();
        items.push(PathBuf::from("/elsewhere"));

        assert_eq!(clip.items(), paths(&["/tmp/a", "/tmp/b"]));
    }

    #[test]
    fn clear_resets_everything() {
        let clip = PendingFileOperation::new(ClipboardMode::Permissive);
        clip.set_items(&paths(&["/tmp/a"]), Operation::Move);
        clip.clear();

        assert!(!clip.has_items());
        assert_eq!(clip.operation(), Operation::None);
        assert!(clip.items().is_empty());
    }

    #[test]
    fn empty_move_has_no_items() {
        let clip = PendingFileOperation::new(ClipboardMode::Permissive);
        clip.set_items(&[], Operation::Move);
        assert!(!clip.has_items());
        assert_eq!(clip.operation(), Operation::Move);
    }

    #[test]
    fn permissive_keeps_files_without_operation() {
        let clip = PendingFileOperation::new(ClipboardMode::Permissive);
        clip.set_items(&paths(&["/tmp/a"]), Operation::None);

        assert!(!clip.has_items());
        assert_eq!(clip.items(), paths(&["/tmp/a"]));
    }

    #[test]
    fn strict_drops_files_without_operation() {
        let clip = PendingFileOperation::new(ClipboardMode::Strict);
        clip.set_items(&paths(&["/tmp/a"]), Operation::None);

        assert!(!clip.has_items());
        assert!(clip.items().is_empty());

        clip.set_items(&paths(&["/tmp/a"]), Operation::Copy);
        assert!(clip.has_items());
    }

    #[test]
    fn take_consumes_move_but_not_copy() {
        let clip = PendingFileOperation::new(ClipboardMode::Permissive);
        clip.set_items(&paths(&["/tmp/a"]), Operation::Copy);
        assert!(clip.take().has_items());
        assert!(clip.has_items());

        clip.set_items(&paths(&["/tmp/b"]), Operation::Move);
        let taken = clip.take();
        assert_eq!(taken.operation, Operation::Move);
        assert_eq!(taken.files, paths(&["/tmp/b"]));
        assert!(!clip.has_items());
        assert_eq!(clip.operation(), Operation::None);
    }

    #[test]
    fn first_initializer_picks_the_mode() {
        let cell = OnceCell::new();
        let first = Arc::clone(init_in(&cell, ClipboardMode::Strict));
        let second = Arc::clone(init_in(&cell, ClipboardMode::Permissive));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.mode(), ClipboardMode::Strict);
    }

    #[test]
    fn shared_with_hands_out_the_shared_instance() {
        let handle = PendingFileOperation::shared_with(ClipboardMode::Permissive);
        assert!(std::ptr::eq(&*handle, PendingFileOperation::shared()));
    }

    #[test]
    fn shared_returns_one_instance() {
        let first = PendingFileOperation::shared() as *const PendingFileOperation;
        let second = PendingFileOperation::shared() as *const PendingFileOperation;
        assert_eq!(first, second);
    }

    #[test]
    fn shared_is_race_free_across_threads() {
        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    PendingFileOperation::shared() as *const PendingFileOperation as usize
                })
            })
            .collect();

        let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(addrs[0], PendingFileOperation::shared() as *const _ as usize);
    }
}
