//! ミームの合成と記録を担うモジュール。
//!
//! `compose` は画面 (背景画像 + 上下キャプション) を 1 枚の画像に平坦化し、
//! `finalize_and_record` はその結果を `MemeRecord` としてセッション一覧に追加します。

use super::meme_record::MemeRecord;
use super::overlay::{CaptionAnchor, CaptionBitmap, OverlayStyle};
use super::scene::{CaptureGuard, CaptureRegion, EditorScene, CAPTURE_FILL};
use super::session_list::SessionList;
use image::{imageops, RgbaImage};
use std::sync::Arc;
use thiserror::Error;

/// 合成時に発生する可能性のあるエラー。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    /// 元画像が設定されていない状態で合成が要求された場合。
    #[error("元画像が設定されていません")]
    MissingImage,

    /// キャプチャ領域が空、またはビューポートからはみ出している場合。
    #[error("キャプチャ領域 {region:?} がビューポート {viewport:?} に収まっていません")]
    InvalidRegion {
        region: CaptureRegion,
        viewport: (u32, u32),
    },
}

/// 画面を 1 枚の画像に平坦化し、`MemeRecord` を組み立てるコンポーネント。
///
/// セッション一覧は外部から注入され、このコンポーネントが保持します。
#[derive(Debug)]
pub struct MemeComposer {
    style: OverlayStyle,
    session: SessionList,
}

impl MemeComposer {
    pub fn new(style: OverlayStyle, session: SessionList) -> Self {
        Self { style, session }
    }

    // --- ゲッターメソッド ---

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }
    pub fn session(&self) -> &SessionList {
        &self.session
    }

    /// セッション一覧を取り出します (セッション終了時など)。
    pub fn into_session(self) -> SessionList {
        self.session
    }

    /// 画面の `region` 部分を 1 枚の画像に平坦化します。
    ///
    /// キャプチャの間だけクロームを隠し、背景の塗りを白に差し替えます。
    /// 成功・失敗にかかわらず、戻った時点でクロームと塗りは呼び出し前の状態に戻っています。
    ///
    /// # 戻り値
    /// * `Ok(RgbaImage)`: `region` と同じ寸法の合成画像。
    /// * `Err(ComposeError::MissingImage)`: 元画像が無い場合 (キャプチャは行わない)。
    /// * `Err(ComposeError::InvalidRegion)`: 領域が不正な場合。
    pub fn compose(
        &self,
        scene: &mut EditorScene,
        region: CaptureRegion,
    ) -> Result<RgbaImage, ComposeError> {
        if scene.source_image().is_none() {
            return Err(ComposeError::MissingImage);
        }

        let guard = CaptureGuard::engage(scene, CAPTURE_FILL);
        let composite = self.render(guard.scene(), region)?;
        drop(guard);

        tracing::debug!(
            width = composite.width(),
            height = composite.height(),
            "ミーム画像を合成しました"
        );
        Ok(composite)
    }

    /// 画面を現在の見た目のまま (クロームやプレースホルダーも含めて) 描画します。
    #[cfg(test)]
    fn preview(&self, scene: &EditorScene) -> Result<RgbaImage, ComposeError> {
        self.render(scene, scene.full_region())
    }

    /// 合成結果を `MemeRecord` にまとめ、セッション一覧の末尾に追加します。
    ///
    /// 文字列の検証や重複排除は行いません。
    pub fn finalize_and_record(
        &mut self,
        top_text: impl Into<String>,
        bottom_text: impl Into<String>,
        source_image: Arc<RgbaImage>,
        composite_image: RgbaImage,
    ) -> &MemeRecord {
        let record = MemeRecord::new(top_text, bottom_text, source_image, composite_image);
        tracing::info!(
            session_len = self.session.len() + 1,
            "ミームをセッションに記録しました"
        );
        self.session.append(record)
    }

    /// 背景 → キャプション → クロームの順に描画する。
    fn render(&self, scene: &EditorScene, region: CaptureRegion) -> Result<RgbaImage, ComposeError> {
        let (width, height) = scene.viewport();
        if region.is_empty() || !region.fits_within(width, height) {
            return Err(ComposeError::InvalidRegion {
                region,
                viewport: (width, height),
            });
        }

        let background = scene.render_background();
        let mut canvas =
            imageops::crop_imm(&background, region.x, region.y, region.width, region.height)
                .to_image();

        // キャプションは文字列をそのまま描画する (プレースホルダーも特別扱いしない)
        CaptionBitmap::rasterize(scene.top_text(), &self.style).draw_onto(
            &mut canvas,
            CaptionAnchor::TopCenter,
            &self.style,
        );
        CaptionBitmap::rasterize(scene.bottom_text(), &self.style).draw_onto(
            &mut canvas,
            CaptionAnchor::BottomCenter,
            &self.style,
        );

        scene.draw_chrome(&mut canvas, region);
        Ok(canvas)
    }
}
