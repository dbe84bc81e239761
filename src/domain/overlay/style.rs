use super::font::{CaptionFont, FontError};
use image::Rgba;
use std::path::Path;

/// キャプションの既定フォントサイズ (px)。
pub const DEFAULT_FONT_SIZE: f32 = 40.0;
/// キャプションの既定の縁取り幅 (px)。
pub const DEFAULT_STROKE_WIDTH: u32 = 3;
/// 塗りの色 (白)。
pub const DEFAULT_FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);
/// 縁取りの色 (黒)。
pub const DEFAULT_STROKE: Rgba<u8> = Rgba([0, 0, 0, 255]);
/// フォントサイズの上限 (px)。これより大きい値は上限に丸めます。
pub const MAX_FONT_SIZE: f32 = 512.0;
/// 縁取り幅の上限 (px)。膨張処理の計算量は半径の 2 乗に比例する。
pub const MAX_STROKE_WIDTH: u32 = 32;

/// キャプション文字の見た目 (フォント・サイズ・塗り・縁取り)。
///
/// 白い塗りに黒い縁取り、太い縮め書体という、ポスター風の定番スタイルを表現します。
/// 上下どちらのキャプションにも同じスタイルが適用されます。
#[derive(Debug, Clone)]
pub struct OverlayStyle {
    font: CaptionFont,
    font_size: f32,
    fill: Rgba<u8>,
    stroke: Rgba<u8>,
    stroke_width: u32,
}

impl OverlayStyle {
    /// 指定したフォントと既定値 (サイズ 40、白塗り、黒の 3px 縁取り) でスタイルを作成します。
    pub fn new(font: CaptionFont) -> Self {
        Self {
            font,
            font_size: DEFAULT_FONT_SIZE,
            fill: DEFAULT_FILL,
            stroke: DEFAULT_STROKE,
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }

    /// フォントファイルのパス (省略時は組み込みフォント) からスタイルを作成します。
    pub fn load(font_path: Option<&Path>) -> Result<Self, FontError> {
        Ok(Self::new(CaptionFont::new(font_path)?))
    }

    /// フォントサイズを変更します。
    ///
    /// 0 以下や NaN は既定値に、`MAX_FONT_SIZE` を超える値は上限に置き換えます。
    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = if font_size.is_nan() || font_size <= 0.0 {
            DEFAULT_FONT_SIZE
        } else {
            font_size.min(MAX_FONT_SIZE)
        };
        self
    }

    /// 縁取り幅を変更します。`MAX_STROKE_WIDTH` を超える値は上限に置き換えます。
    pub fn with_stroke_width(mut self, stroke_width: u32) -> Self {
        self.stroke_width = stroke_width.min(MAX_STROKE_WIDTH);
        self
    }

    pub fn with_colors(mut self, fill: Rgba<u8>, stroke: Rgba<u8>) -> Self {
        self.fill = fill;
        self.stroke = stroke;
        self
    }

    // --- ゲッターメソッド ---

    pub fn font(&self) -> &CaptionFont {
        &self.font
    }
    pub fn font_size(&self) -> f32 {
        self.font_size
    }
    pub fn fill(&self) -> Rgba<u8> {
        self.fill
    }
    pub fn stroke(&self) -> Rgba<u8> {
        self.stroke
    }
    pub fn stroke_width(&self) -> u32 {
        self.stroke_width
    }
}
