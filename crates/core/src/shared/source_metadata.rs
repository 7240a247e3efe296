use std::path::PathBuf;

/// Describes an opened frame source.
///
/// Frame dimensions are fixed for the lifetime of one session.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceMetadata {
    pub width: u32,
    pub height: u32,
    pub total_frames: usize,
    pub source_path: Option<PathBuf>,
}

impl SourceMetadata {
    pub fn is_sequence(&self) -> bool {
        self.total_frames > 1
    }
}
