//! Side-effect commands returned by the update layer
//!
//! `update()` never touches the window, the clipboard, or threads; it
//! describes the effect and the runtime executes it.

/// A side effect to be executed by the runtime
#[derive(Debug, Clone)]
pub enum Cmd {
    /// Repaint the window
    Redraw,
    /// Mirror this text to the system clipboard
    CopyToClipboard(String),
    /// Start a background font inventory build for this generation
    BuildInventory {
        family: Option<String>,
        size_px: f32,
        generation: u64,
    },
    /// Persist the current configuration
    SaveConfig,
    Quit,
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Whether executing this command should trigger a repaint
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::Redraw => true,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
            _ => false,
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_redraw_through_batch() {
        let cmd = Cmd::Batch(vec![Cmd::SaveConfig, Cmd::Batch(vec![Cmd::Redraw])]);
        assert!(cmd.needs_redraw());

        let cmd = Cmd::Batch(vec![Cmd::SaveConfig, Cmd::CopyToClipboard("x".into())]);
        assert!(!cmd.needs_redraw());
    }
}
