use arboard::Clipboard;

pub struct ClipboardService;

impl ClipboardService {
    /// Puts `text` on the system clipboard.
    pub fn copy(text: &str) -> Result<(), String> {
        let mut clipboard = Clipboard::new().map_err(|e| e.to_string())?;
        clipboard.set_text(text.to_string()).map_err(|e| e.to_string())
    }
}
