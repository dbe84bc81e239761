//! エディタの外部協力者 (画像の取得元・共有先) の契約と、ファイルを使った実装。
//!
//! どちらもコールバックを 1 回だけ呼び出して結果を通知します。
//! コールバックは `FnOnce` なので、2 回以上呼ばれることは型で防がれます。

use image::{ImageFormat, RgbaImage};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 画像の取得元の種類。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Camera,
    PhotoLibrary,
}

/// 画像取得の結果。成功かキャンセルのどちらか一方が必ず 1 回通知されます。
#[derive(Debug, Clone, PartialEq)]
pub enum Acquisition {
    Picked(RgbaImage),
    Cancelled,
}

/// 画像の取得元 (カメラ・フォトライブラリ)。
pub trait ImageSource {
    /// 指定した種類の取得元が利用可能か。
    fn is_available(&self, kind: SourceKind) -> bool;

    /// 画像を取得し、結果を `on_complete` に 1 回だけ渡します。
    fn acquire<'a>(&mut self, kind: SourceKind, on_complete: Box<dyn FnOnce(Acquisition) + 'a>);
}

/// 合成画像の共有先 (共有シート・書き出し先)。
pub trait ShareSink {
    /// 合成画像を受け取り、共有が完了したかどうかを `on_complete` に 1 回だけ渡します。
    fn share<'a>(&mut self, composite: &RgbaImage, on_complete: Box<dyn FnOnce(bool) + 'a>);
}

// --- エラー定義 ---

/// ファイルを使った取得元・共有先で発生する可能性のあるエラー。
#[derive(Debug, Error)]
pub enum SourceError {
    /// パスが存在しない、またはファイルではない場合。
    #[error("無効なパスです: {0}")]
    InvalidPath(String),
    /// 画像としてデコードできなかった場合。
    #[error("画像を読み込めません: {0}")]
    Decode(#[source] image::ImageError),
    /// 画像の書き出しに失敗した場合。
    #[error("画像を書き出せません: {0}")]
    Encode(#[source] image::ImageError),
}

// --- ファイルを使った実装 ---

/// 画像ファイルをフォトライブラリに見立てた取得元。カメラは利用できません。
#[derive(Debug)]
pub struct FileImageSource {
    path: PathBuf,
    image: RgbaImage,
}

impl FileImageSource {
    /// 画像ファイルを開いてデコードします。
    ///
    /// パスが存在し、ファイルであることを検証してから読み込みます。
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SourceError::InvalidPath(format!(
                "パス '{}' は存在しません。",
                path.display()
            )));
        }
        if !path.is_file() {
            return Err(SourceError::InvalidPath(format!(
                "パス '{}' はファイルではありません。",
                path.display()
            )));
        }

        let image = image::open(path).map_err(SourceError::Decode)?.to_rgba8();
        Ok(Self {
            path: path.to_path_buf(),
            image,
        })
    }

    pub fn as_path(&self) -> &Path {
        &self.path
    }
}

impl ImageSource for FileImageSource {
    fn is_available(&self, kind: SourceKind) -> bool {
        kind == SourceKind::PhotoLibrary
    }

    fn acquire<'a>(&mut self, kind: SourceKind, on_complete: Box<dyn FnOnce(Acquisition) + 'a>) {
        match kind {
            SourceKind::PhotoLibrary => on_complete(Acquisition::Picked(self.image.clone())),
            SourceKind::Camera => on_complete(Acquisition::Cancelled),
        }
    }
}

/// 合成画像を PNG ファイルとして書き出す共有先。
///
/// 書き出しに成功した場合のみ「完了」を通知します。
#[derive(Debug)]
pub struct FileShareSink {
    path: PathBuf,
    last_error: Option<SourceError>,
}

impl FileShareSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_error: None,
        }
    }

    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// 直近の書き出しで発生したエラーを取り出します。
    pub fn take_error(&mut self) -> Option<SourceError> {
        self.last_error.take()
    }
}

impl ShareSink for FileShareSink {
    fn share<'a>(&mut self, composite: &RgbaImage, on_complete: Box<dyn FnOnce(bool) + 'a>) {
        match composite.save_with_format(&self.path, ImageFormat::Png) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "ミーム画像を書き出しました");
                self.last_error = None;
                on_complete(true);
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "ミーム画像の書き出しに失敗しました"
                );
                self.last_error = Some(SourceError::Encode(e));
                on_complete(false);
            }
        }
    }
}
