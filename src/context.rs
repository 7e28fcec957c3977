use std::path::PathBuf;
use std::sync::Arc;

use crate::clipboard::PendingFileOperation;
use crate::credentials::CredentialStore;
use crate::models::ClipboardMode;
use crate::prefs::{JsonPrefs, MemoryPrefs, PreferenceStore};
use crate::settings::AppSettings;
use crate::theme::ThemeStore;

/// Everything the screens share, handed around by reference.
#[derive(Clone)]
pub struct AppContext {
    pub credentials: CredentialStore,
    pub themes: ThemeStore,
    pub clipboard: Arc<PendingFileOperation>,
}

impl AppContext {
    pub fn new(prefs: Arc<dyn PreferenceStore>, clipboard: Arc<PendingFileOperation>) -> Self {
        Self {
            credentials: CredentialStore::new(Arc::clone(&prefs)),
            themes: ThemeStore::new(prefs),
            clipboard,
        }
    }

    pub fn from_settings(settings: &AppSettings) -> Self {
        Self::open(settings.resolved_prefs_dir(), settings.clipboard_mode)
    }

    /// Production wiring: on-disk preferences and the process-wide clipboard.
    pub fn open(prefs_dir: PathBuf, clipboard_mode: ClipboardMode) -> Self {
        tracing::info!(prefs_dir = %prefs_dir.display(), mode = ?clipboard_mode, "building app context");
        Self::new(
            Arc::new(JsonPrefs::open(prefs_dir)),
            PendingFileOperation::shared_with(clipboard_mode),
        )
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryPrefs::new()),
            Arc::new(PendingFileOperation::new(Default::default())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Operation;

    #[test]
    fn clones_share_clipboard_and_prefs() {
        let ctx = AppContext::in_memory();
        let other = ctx.clone();

        ctx.clipboard.set_items(&[PathBuf::from("/tmp/a")], Operation::Copy);
        ctx.themes.set_theme("dark");
        ctx.credentials.save("key");

        assert!(other.clipboard.has_items());
        assert_eq!(other.themes.get_theme(), "dark");
        assert_eq!(other.credentials.get().as_deref(), Some("key"));
    }

    #[test]
    fn independent_contexts_are_isolated() {
        let a = AppContext::in_memory();
        let b = AppContext::in_memory();
        a.clipboard.set_items(&[PathBuf::from("/tmp/a")], Operation::Move);
        a.themes.set_theme("nordic");

        assert!(!b.clipboard.has_items());
        assert_eq!(b.themes.get_theme(), "light");
    }

    #[test]
    fn open_wires_the_shared_clipboard() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::open(dir.path().to_path_buf(), ClipboardMode::Permissive);
        assert!(std::ptr::eq(&*ctx.clipboard, PendingFileOperation::shared()));

        ctx.clipboard.set_items(&[PathBuf::from("/tmp/a")], Operation::Copy);
        assert!(PendingFileOperation::shared().has_items());
        assert_eq!(
            PendingFileOperation::shared().items(),
            vec![PathBuf::from("/tmp/a")]
        );
        ctx.clipboard.clear();
    }

    #[test]
    fn open_writes_prefs_under_the_given_dir() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::open(dir.path().to_path_buf(), ClipboardMode::Permissive);
        ctx.themes.set_theme("solarized").wait().unwrap();
        assert!(dir.path().join("ThemePrefs.json").exists());
    }
}
