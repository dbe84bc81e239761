//! エディタ画面の「見た目の状態」を表現するモジュール。
//!
//! 画面 (ビューポート) は次の要素で構成されます。
//! - 背景の塗り (画像が無い部分はプレースホルダーの濃いグレー)
//! - 画像ビュー (ビューポート全体にアスペクト比を保って中央配置)
//! - 上下のキャプション入力欄
//! - ナビゲーションバー (上端) とツールバー (下端) の UI クローム
//!
//! キャプチャ時にはクロームを隠し、背景の塗りを差し替える必要があるため、
//! その一時的な変更を [`CaptureGuard`] がスコープ単位で管理します。

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use std::sync::Arc;

/// 画像が無い部分に表示されるプレースホルダーの塗り (濃いグレー)。
pub const PLACEHOLDER_FILL: Rgba<u8> = Rgba([85, 85, 85, 255]);
/// キャプチャ中に使う背景の塗り (白)。
pub const CAPTURE_FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);
/// ナビゲーションバー・ツールバーの高さ (px)。
pub const BAR_HEIGHT: u32 = 44;
/// バーの色。
pub const BAR_COLOR: Rgba<u8> = Rgba([247, 247, 247, 255]);

/// UI クローム (ミームの一部ではない部品) の表示状態。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeState {
    pub toolbar_visible: bool,
    pub navigation_bar_visible: bool,
}

impl ChromeState {
    pub const VISIBLE: Self = Self {
        toolbar_visible: true,
        navigation_bar_visible: true,
    };
    pub const HIDDEN: Self = Self {
        toolbar_visible: false,
        navigation_bar_visible: false,
    };
}

/// 合成画像として切り出す矩形 (ビューポート座標, px)。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// ビューポート全体を覆う領域。
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// 領域が `width` × `height` のビューポートに収まっているか。
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        let right = self.x.checked_add(self.width);
        let bottom = self.y.checked_add(self.height);
        matches!((right, bottom), (Some(r), Some(b)) if r <= width && b <= height)
    }
}

/// エディタ画面の見た目の状態。
#[derive(Debug, Clone)]
pub struct EditorScene {
    // 設定で固定されたビューポート。None の場合は画像の寸法に合わせる。
    fixed_viewport: Option<(u32, u32)>,
    viewport: (u32, u32),
    background_fill: Rgba<u8>,
    chrome: ChromeState,
    source_image: Option<Arc<RgbaImage>>,
    top_text: String,
    bottom_text: String,
}

impl EditorScene {
    /// 画像の無い初期状態の画面を作成します。
    pub fn new(
        fixed_viewport: Option<(u32, u32)>,
        top_text: impl Into<String>,
        bottom_text: impl Into<String>,
    ) -> Self {
        Self {
            fixed_viewport,
            viewport: fixed_viewport.unwrap_or((0, 0)),
            background_fill: PLACEHOLDER_FILL,
            chrome: ChromeState::VISIBLE,
            source_image: None,
            top_text: top_text.into(),
            bottom_text: bottom_text.into(),
        }
    }

    // --- ゲッターメソッド ---

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }
    pub fn full_region(&self) -> CaptureRegion {
        CaptureRegion::full(self.viewport.0, self.viewport.1)
    }
    pub fn background_fill(&self) -> Rgba<u8> {
        self.background_fill
    }
    pub fn chrome(&self) -> ChromeState {
        self.chrome
    }
    pub fn source_image(&self) -> Option<&Arc<RgbaImage>> {
        self.source_image.as_ref()
    }
    pub fn top_text(&self) -> &str {
        &self.top_text
    }
    pub fn bottom_text(&self) -> &str {
        &self.bottom_text
    }

    // --- 状態の変更 ---

    pub fn set_background_fill(&mut self, fill: Rgba<u8>) {
        self.background_fill = fill;
    }

    pub fn set_chrome(&mut self, chrome: ChromeState) {
        self.chrome = chrome;
    }

    /// 画像ビューに画像を設定します。ビューポートが固定されていなければ画像の寸法に合わせます。
    pub fn set_source_image(&mut self, image: Arc<RgbaImage>) {
        if self.fixed_viewport.is_none() {
            self.viewport = image.dimensions();
        }
        self.source_image = Some(image);
    }

    pub fn clear_source_image(&mut self) {
        self.source_image = None;
    }

    pub fn set_top_text(&mut self, text: impl Into<String>) {
        self.top_text = text.into();
    }

    pub fn set_bottom_text(&mut self, text: impl Into<String>) {
        self.bottom_text = text.into();
    }

    // --- 描画 ---

    /// 背景の塗りと画像ビューをビューポート全体に描画します。
    pub fn render_background(&self) -> RgbaImage {
        let (width, height) = self.viewport;
        let mut canvas = RgbaImage::from_pixel(width, height, self.background_fill);

        if let Some(image) = &self.source_image {
            if let Some((w, h, x, y)) = aspect_fit(image.dimensions(), self.viewport) {
                if (w, h) == image.dimensions() {
                    imageops::overlay(&mut canvas, &**image, x, y);
                } else {
                    let resized = imageops::resize(&**image, w, h, FilterType::Triangle);
                    imageops::overlay(&mut canvas, &resized, x, y);
                }
            }
        }
        canvas
    }

    /// 表示中のクロームを、`region` を原点とするキャンバスへ描画します。
    pub fn draw_chrome(&self, canvas: &mut RgbaImage, region: CaptureRegion) {
        let (width, height) = self.viewport;
        let bar_height = BAR_HEIGHT.min(height);
        if width == 0 || bar_height == 0 {
            return;
        }

        let mut bars = Vec::with_capacity(2);
        if self.chrome.navigation_bar_visible {
            bars.push(0);
        }
        if self.chrome.toolbar_visible {
            bars.push(height - bar_height);
        }
        for bar_y in bars {
            let rect = Rect::at(-(region.x as i32), bar_y as i32 - region.y as i32)
                .of_size(width, bar_height);
            // 範囲外の部分は imageproc 側でクリップされる
            draw_filled_rect_mut(canvas, rect, BAR_COLOR);
        }
    }
}

/// `image` を `viewport` にアスペクト比を保って収めたときの (幅, 高さ, x, y)。
/// どちらかの寸法が 0 の場合は None。
fn aspect_fit(image: (u32, u32), viewport: (u32, u32)) -> Option<(u32, u32, i64, i64)> {
    let (iw, ih) = image;
    let (vw, vh) = viewport;
    if iw == 0 || ih == 0 || vw == 0 || vh == 0 {
        return None;
    }
    let scale = (vw as f64 / iw as f64).min(vh as f64 / ih as f64);
    let w = ((iw as f64 * scale).round() as u32).clamp(1, vw);
    let h = ((ih as f64 * scale).round() as u32).clamp(1, vh);
    let x = (vw - w) as i64 / 2;
    let y = (vh - h) as i64 / 2;
    Some((w, h, x, y))
}

/// キャプチャの間だけクロームを隠し、背景の塗りを差し替えるガード。
///
/// `Drop` で必ず元の状態に戻すため、キャプチャがエラーで中断した場合でも
/// エディタの見た目が壊れたまま残ることはありません。
#[derive(Debug)]
pub struct CaptureGuard<'a> {
    scene: &'a mut EditorScene,
    saved_chrome: ChromeState,
    saved_fill: Rgba<u8>,
}

impl<'a> CaptureGuard<'a> {
    /// クロームを隠し、背景を `capture_fill` に変更します。
    pub fn engage(scene: &'a mut EditorScene, capture_fill: Rgba<u8>) -> Self {
        let saved_chrome = scene.chrome;
        let saved_fill = scene.background_fill;
        scene.chrome = ChromeState::HIDDEN;
        scene.background_fill = capture_fill;
        tracing::trace!("キャプチャ用にクロームを非表示にしました");
        Self {
            scene,
            saved_chrome,
            saved_fill,
        }
    }

    /// キャプチャ中の画面。
    pub fn scene(&self) -> &EditorScene {
        self.scene
    }
}

impl Drop for CaptureGuard<'_> {
    fn drop(&mut self) {
        self.scene.chrome = self.saved_chrome;
        self.scene.background_fill = self.saved_fill;
        tracing::trace!("クロームと背景の塗りを復元しました");
    }
}
