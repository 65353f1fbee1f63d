//! Console state owned by the caller.
//!
//! Everything the renderer reads after bring-up lives here: the active
//! mode, the glyph table and the text grid. The caller owns the context
//! (usually in a static or on the loader's heap) and passes it by
//! reference; there are no hidden globals.

use crate::activate::ActivationResult;
use crate::error::VesaInitError;
use crate::font::GlyphTable;
use crate::grid::TextGrid;

/// Progress of the init sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    Start,
    GeneralInfoQueried,
    ModeSelected,
    ModeActivated,
    FontLoaded,
    TextGridReady,
    Done,
    /// Absorbing failure state.
    Failed(VesaInitError),
}

impl InitState {
    /// Position in the success path; `None` for `Failed`.
    const fn ordinal(&self) -> Option<u8> {
        match self {
            Self::Start => Some(0),
            Self::GeneralInfoQueried => Some(1),
            Self::ModeSelected => Some(2),
            Self::ModeActivated => Some(3),
            Self::FontLoaded => Some(4),
            Self::TextGridReady => Some(5),
            Self::Done => Some(6),
            Self::Failed(_) => None,
        }
    }
}

/// Published console state.
pub struct DisplayContext {
    state: InitState,
    mode: Option<ActivationResult>,
    font: GlyphTable,
    text: Option<TextGrid>,
}

impl DisplayContext {
    pub const fn new() -> Self {
        Self {
            state: InitState::Start,
            mode: None,
            font: GlyphTable::new(),
            text: None,
        }
    }

    pub fn state(&self) -> InitState {
        self.state
    }

    /// True once the sequence reached `Done`.
    pub fn is_ready(&self) -> bool {
        self.state == InitState::Done
    }

    /// Active mode, set once the mode switch succeeded.
    pub fn mode(&self) -> Option<&ActivationResult> {
        self.mode.as_ref()
    }

    pub fn font(&self) -> &GlyphTable {
        &self.font
    }

    pub fn text(&self) -> Option<&TextGrid> {
        self.text.as_ref()
    }

    pub fn text_mut(&mut self) -> Option<&mut TextGrid> {
        self.text.as_mut()
    }

    /// Visible text rows (0 until the grid exists).
    pub fn text_rows(&self) -> usize {
        self.text.as_ref().map_or(0, |t| t.geometry().text_rows)
    }

    /// Back to `Start` with nothing published.
    pub(crate) fn reset(&mut self) {
        self.state = InitState::Start;
        self.mode = None;
        self.font = GlyphTable::new();
        self.text = None;
    }

    /// Move one step along the success path. Out-of-order moves and moves
    /// out of `Failed` are ignored.
    pub(crate) fn advance(&mut self, next: InitState) {
        match (self.state.ordinal(), next.ordinal()) {
            (Some(cur), Some(to)) if to == cur + 1 => self.state = next,
            _ => log::warn!(target: "vesacon", "ignored state move {:?} -> {:?}", self.state, next),
        }
    }

    pub(crate) fn fail(&mut self, error: VesaInitError) {
        self.state = InitState::Failed(error);
    }

    pub(crate) fn set_mode(&mut self, mode: ActivationResult) {
        self.mode = Some(mode);
    }

    pub(crate) fn font_mut(&mut self) -> &mut GlyphTable {
        &mut self.font
    }

    pub(crate) fn set_text(&mut self, text: TextGrid) {
        self.text = Some(text);
    }
}

impl Default for DisplayContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::boxed::Box;

    #[test]
    fn test_new_context_empty() {
        let ctx = Box::new(DisplayContext::new());
        assert_eq!(ctx.state(), InitState::Start);
        assert!(ctx.mode().is_none());
        assert!(ctx.text().is_none());
        assert!(!ctx.font().is_loaded());
        assert_eq!(ctx.text_rows(), 0);
    }

    #[test]
    fn test_advance_is_strictly_sequential() {
        let mut ctx = Box::new(DisplayContext::new());
        ctx.advance(InitState::ModeSelected);
        assert_eq!(ctx.state(), InitState::Start);
        ctx.advance(InitState::GeneralInfoQueried);
        ctx.advance(InitState::ModeSelected);
        assert_eq!(ctx.state(), InitState::ModeSelected);
        ctx.advance(InitState::GeneralInfoQueried);
        assert_eq!(ctx.state(), InitState::ModeSelected);
    }

    #[test]
    fn test_failed_is_absorbing() {
        let mut ctx = Box::new(DisplayContext::new());
        ctx.fail(VesaInitError::BadSignature);
        ctx.advance(InitState::GeneralInfoQueried);
        assert_eq!(ctx.state(), InitState::Failed(VesaInitError::BadSignature));
        assert!(!ctx.is_ready());
    }
}
