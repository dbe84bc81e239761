use crate::domain::collaborators::SourceError;
use crate::domain::editor::EditorError;
use crate::domain::overlay::FontError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/Oエラーが発生しました")]
    Io(#[from] std::io::Error),

    #[error("画像の読み書きに失敗しました")]
    Source(#[from] SourceError),

    #[error("フォントの読み込みに失敗しました")]
    Font(#[from] FontError),

    #[error("エディタの操作に失敗しました")]
    Editor(#[from] EditorError),

    #[error("ミームが 1 件も作成されませんでした: {0}")]
    NoMemesCreated(String),
}
