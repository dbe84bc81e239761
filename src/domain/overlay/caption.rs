//! キャプション文字列をラスタライズし、キャンバスへ合成するモジュール。
//!
//! 文字の被覆率 (coverage) を 8bit のマスクとして描き、
//! そのマスクを円形カーネルで膨張させたものを縁取りとして使います。
//! 合成時は「縁取り → 塗り」の順にアルファブレンドします。

use super::style::OverlayStyle;
use image::{GrayImage, Pixel, Rgba, RgbaImage};
use imageproc::morphology::{grayscale_dilate, Mask};
use rusttype::{point, PositionedGlyph, Scale};

/// キャプションと領域の上端 (または下端) との間の余白 (px)。
pub const CAPTION_MARGIN: u32 = 8;

/// キャプションを領域のどこに配置するか。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionAnchor {
    /// 上端・中央揃え。
    TopCenter,
    /// 下端・中央揃え。
    BottomCenter,
}

/// ラスタライズ済みのキャプション。
///
/// `fill` と `stroke` は同じ寸法のマスクで、縁取り幅ぶんの余白を四辺に含みます。
#[derive(Debug, Clone)]
pub struct CaptionBitmap {
    fill: GrayImage,
    stroke: GrayImage,
}

impl CaptionBitmap {
    /// 文字列を指定スタイルでラスタライズします。
    ///
    /// 文字列は加工せずそのまま描画します (大文字化やプレースホルダーの特別扱いはしない)。
    /// 空文字列の場合は被覆のない (透明な) ビットマップになります。
    pub fn rasterize(text: &str, style: &OverlayStyle) -> Self {
        let pad = style.stroke_width();
        let font = style.font().font();
        let scale = Scale::uniform(style.font_size());
        let v_metrics = font.v_metrics(scale);

        let origin = point(pad as f32, pad as f32 + v_metrics.ascent);
        let glyphs: Vec<PositionedGlyph<'_>> = font.layout(text, scale, origin).collect();

        // 最後のグリフの送り幅までを文字列の幅とする
        let text_width = glyphs
            .last()
            .map(|g| g.position().x - origin.x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
            .max(0.0);
        let text_height = (v_metrics.ascent - v_metrics.descent).ceil().max(0.0);
        let width = (text_width.ceil() as u32).saturating_add(pad.saturating_mul(2)).max(1);
        let height = (text_height as u32).saturating_add(pad.saturating_mul(2)).max(1);

        let mut fill = GrayImage::new(width, height);
        for glyph in &glyphs {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue; // 空白など
            };
            glyph.draw(|gx, gy, coverage| {
                let x = bb.min.x + gx as i32;
                let y = bb.min.y + gy as i32;
                if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
                    return;
                }
                let value = (coverage * 255.0).round().clamp(0.0, 255.0) as u8;
                let px = fill.get_pixel_mut(x as u32, y as u32);
                // グリフ同士が重なる場合は濃い方を採用
                px.0[0] = px.0[0].max(value);
            });
        }

        let stroke = if pad == 0 {
            GrayImage::new(width, height)
        } else {
            let radius = u8::try_from(pad).unwrap_or(u8::MAX);
            grayscale_dilate(&fill, &Mask::disk(radius))
        };

        Self { fill, stroke }
    }

    pub fn width(&self) -> u32 {
        self.fill.width()
    }

    pub fn height(&self) -> u32 {
        self.fill.height()
    }

    /// 塗りの被覆マスク。
    pub fn fill_mask(&self) -> &GrayImage {
        &self.fill
    }

    /// 縁取りの被覆マスク。
    pub fn stroke_mask(&self) -> &GrayImage {
        &self.stroke
    }

    /// キャンバス上の配置位置 (左上) を計算します。キャンバス外にはみ出す場合は負の値もありえます。
    pub fn placement(&self, canvas_width: u32, canvas_height: u32, anchor: CaptionAnchor) -> (i64, i64) {
        let x = (canvas_width as i64 - self.width() as i64) / 2;
        let y = match anchor {
            CaptionAnchor::TopCenter => CAPTION_MARGIN as i64,
            CaptionAnchor::BottomCenter => {
                canvas_height as i64 - CAPTION_MARGIN as i64 - self.height() as i64
            }
        };
        (x, y)
    }

    /// キャンバスへ合成します。キャンバス外の部分は切り捨てられます。
    pub fn draw_onto(&self, canvas: &mut RgbaImage, anchor: CaptionAnchor, style: &OverlayStyle) {
        let (canvas_width, canvas_height) = canvas.dimensions();
        let (x0, y0) = self.placement(canvas_width, canvas_height, anchor);

        for (x, y, fill) in self.fill.enumerate_pixels() {
            let cx = x0 + x as i64;
            let cy = y0 + y as i64;
            if cx < 0 || cy < 0 || cx >= canvas_width as i64 || cy >= canvas_height as i64 {
                continue;
            }
            let stroke_coverage = self.stroke.get_pixel(x, y).0[0];
            let fill_coverage = fill.0[0];
            if stroke_coverage == 0 && fill_coverage == 0 {
                continue;
            }

            let px = canvas.get_pixel_mut(cx as u32, cy as u32);
            if stroke_coverage > 0 {
                px.blend(&with_coverage(style.stroke(), stroke_coverage));
            }
            if fill_coverage > 0 {
                px.blend(&with_coverage(style.fill(), fill_coverage));
            }
        }
    }
}

/// 色のアルファ値に被覆率を掛け合わせる。
fn with_coverage(color: Rgba<u8>, coverage: u8) -> Rgba<u8> {
    let alpha = (color.0[3] as u16 * coverage as u16 + 127) / 255;
    Rgba([color.0[0], color.0[1], color.0[2], alpha as u8])
}
