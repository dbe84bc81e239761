// rusttype クレートのフォント型をインポートします。
use rusttype::Font;
use std::fmt;
// ファイルシステムからフォントを読み込むために、標準ライブラリのfsモジュールをインポートします。
use std::fs;
use std::path::Path;
use thiserror::Error;

/// 組み込みのデフォルトフォント (DejaVu Sans Condensed Bold)。
///
/// 太く縮められた書体で、ポスター風のキャプションに近い見た目になります。
const DEFAULT_FONT_BYTES: &[u8] = include_bytes!("../../../fonts/DejaVuSansCondensed-Bold.ttf");

/// フォントの読み込み時に発生する可能性のあるエラー。
#[derive(Debug, Error)]
pub enum FontError {
    /// フォントファイルを読み込めなかった場合。
    #[error("フォントファイルを読み込めません: {0}")]
    Io(#[from] std::io::Error),

    /// バイト列が TTF/OTF として解釈できなかった場合。
    #[error("無効なフォントデータです: {0}")]
    InvalidFontData(String),
}

/// キャプション描画に使うフォントを管理するためのラッパー構造体。
///
/// この構造体は `rusttype::Font` を保持し、
/// ファイルまたは埋め込みデータからのフォントの読み込みを簡潔に行うための
/// コンストラクタを提供します。
#[derive(Clone)]
pub struct CaptionFont {
    font: Font<'static>,
    // ログやデバッグ表示用に、どこから読み込んだフォントかを覚えておく。
    origin: String,
}

impl CaptionFont {
    /// 新しい `CaptionFont` インスタンスを作成します。
    ///
    /// 指定されたパスからフォントファイルを読み込むか、パスが指定されていない場合は
    /// デフォルトの埋め込みフォントを使用します。
    ///
    /// # 引数
    ///
    /// * `font_path`: TTFやOTFなどのフォントファイルへのパスを含む `Option`。
    ///   - `Some(path)`: 指定されたパスからフォントを読み込みます。
    ///   - `None`: バイナリに埋め込まれたデフォルトフォントを使用します。
    ///
    /// # 戻り値
    ///
    /// フォントの読み込みと解析に成功した場合は `Ok(CaptionFont)` を返します。
    /// ファイルが存在しない、またはフォントデータが無効な場合は `Err(FontError)` を返します。
    pub fn new(font_path: Option<&Path>) -> Result<Self, FontError> {
        match font_path {
            Some(path) => {
                // ファイル読み込みは失敗する可能性があるため、`?` 演算子で呼び出し元へ伝播させる。
                let font_bytes = fs::read(path)?;
                let font = Font::try_from_vec(font_bytes).ok_or_else(|| {
                    FontError::InvalidFontData(path.display().to_string())
                })?;
                tracing::debug!(path = %path.display(), "キャプション用フォントを読み込みました");
                Ok(Self {
                    font,
                    origin: path.display().to_string(),
                })
            }
            None => Self::builtin(),
        }
    }

    /// 埋め込みのデフォルトフォントを読み込みます。
    pub fn builtin() -> Result<Self, FontError> {
        let font = Font::try_from_bytes(DEFAULT_FONT_BYTES).ok_or_else(|| {
            FontError::InvalidFontData("builtin:DejaVuSansCondensed-Bold".to_string())
        })?;
        Ok(Self {
            font,
            origin: "builtin:DejaVuSansCondensed-Bold".to_string(),
        })
    }

    /// 内部に保持している `rusttype::Font` への不変参照を返します。
    pub fn font(&self) -> &Font<'static> {
        &self.font
    }

    /// フォントの読み込み元 (パスまたは `builtin:...`)。
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

impl fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptionFont")
            .field("origin", &self.origin)
            .finish()
    }
}
