pub mod collaborators;
pub mod composer;
pub mod editor;
pub mod meme_record;
pub mod overlay;
pub mod scene;
pub mod session_list;

// --- public re-exports ---
pub use collaborators::{
    Acquisition, FileImageSource, FileShareSink, ImageSource, ShareSink, SourceKind,
};
pub use composer::{ComposeError, MemeComposer};
pub use editor::{CaptionField, EditorConfig, EditorError, EditorState, MemeEditor, ShareOutcome};
pub use meme_record::MemeRecord;
pub use scene::{CaptureRegion, EditorScene};
pub use session_list::SessionList;
