use image::RgbaImage;
use std::sync::Arc;

/// 完成したミーム 1 件を表す、生成後は変更されない値。
///
/// 4 つのフィールドは `new` で同時に設定され、以後は読み取り専用です。
/// - `source_image` は呼び出し元と共有する元画像 (`Arc` で参照のみ保持し、変更しない)。
/// - `composite_image` はキャプションを焼き込んだ合成画像で、このレコードが所有する。
#[derive(Debug, Clone, PartialEq)]
pub struct MemeRecord {
    top_text: String,
    bottom_text: String,
    source_image: Arc<RgbaImage>,
    composite_image: RgbaImage,
}

impl MemeRecord {
    /// 新しい `MemeRecord` を作成します。
    ///
    /// 元画像と合成画像の両方が揃っていることは型で保証されます
    /// (どちらも `Option` ではない)。
    pub fn new(
        top_text: impl Into<String>,
        bottom_text: impl Into<String>,
        source_image: Arc<RgbaImage>,
        composite_image: RgbaImage,
    ) -> Self {
        Self {
            top_text: top_text.into(),
            bottom_text: bottom_text.into(),
            source_image,
            composite_image,
        }
    }

    // --- ゲッターメソッド ---

    pub fn top_text(&self) -> &str {
        &self.top_text
    }
    pub fn bottom_text(&self) -> &str {
        &self.bottom_text
    }
    pub fn source_image(&self) -> &Arc<RgbaImage> {
        &self.source_image
    }
    pub fn composite_image(&self) -> &RgbaImage {
        &self.composite_image
    }
}
