//! ミームエディタの状態機械。
//!
//! 状態は `Empty` (画像なし) → `ImageLoaded` (画像あり) → `Composed` (合成済み) と遷移します。
//! リセットはどの状態からでも `Empty` に戻します。
//! 合成・共有 (finalize) は画像がある間だけ許可されます。

use super::collaborators::{Acquisition, ImageSource, ShareSink, SourceKind};
use super::composer::{ComposeError, MemeComposer};
use super::scene::EditorScene;
use super::session_list::SessionList;
use image::RgbaImage;
use std::sync::Arc;
use thiserror::Error;

/// 上キャプションの既定値 (プレースホルダー)。
pub const DEFAULT_TOP_TEXT: &str = "TOP";
/// 下キャプションの既定値 (プレースホルダー)。
pub const DEFAULT_BOTTOM_TEXT: &str = "BOTTOM";

/// エディタの状態。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// 画像が選ばれていない。
    Empty,
    /// 画像が選ばれている (キャプションは既定値または編集済み)。
    ImageLoaded,
    /// 合成画像が作られた。
    Composed,
}

/// キャプション入力欄の識別子。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionField {
    Top,
    Bottom,
}

/// エディタ操作で発生する可能性のあるエラー。いずれも致命的ではありません。
#[derive(Debug, Error)]
pub enum EditorError {
    /// 画像が無い状態で合成・共有が要求された場合。
    #[error("画像が選択されていないため、ミームを作成できません")]
    MissingImage,

    /// 利用できない取得元 (カメラの無い端末など) が要求された場合。
    #[error("画像の取得元 {0:?} は利用できません")]
    SourceUnavailable(SourceKind),

    #[error("ミーム画像の合成に失敗しました: {0}")]
    Compose(#[from] ComposeError),
}

/// エディタの設定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub default_top_text: String,
    pub default_bottom_text: String,
    /// ビューポートを固定する場合の寸法。None なら画像の寸法に合わせる。
    pub viewport: Option<(u32, u32)>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_top_text: DEFAULT_TOP_TEXT.to_string(),
            default_bottom_text: DEFAULT_BOTTOM_TEXT.to_string(),
            viewport: None,
        }
    }
}

/// 共有操作の結果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareOutcome {
    /// 共有先が完了を通知したか。
    pub completed: bool,
    /// 共有後のセッション一覧の件数。
    pub session_len: usize,
}

/// ミームエディタ 1 画面分。
///
/// 画面の状態 (`EditorScene`) と合成コンポーネントを所有し、
/// ユーザー操作 (画像選択・キャプション編集・リセット・共有) に対応するメソッドを提供します。
/// すべての操作は 1 つのスレッドから順番に呼び出される前提です。
#[derive(Debug)]
pub struct MemeEditor {
    config: EditorConfig,
    scene: EditorScene,
    composer: MemeComposer,
    state: EditorState,
    composite: Option<RgbaImage>,
    share_presented: bool,
}

impl MemeEditor {
    pub fn new(config: EditorConfig, composer: MemeComposer) -> Self {
        let scene = EditorScene::new(
            config.viewport,
            config.default_top_text.clone(),
            config.default_bottom_text.clone(),
        );
        Self {
            config,
            scene,
            composer,
            state: EditorState::Empty,
            composite: None,
            share_presented: false,
        }
    }

    // --- ゲッターメソッド ---

    pub fn state(&self) -> EditorState {
        self.state
    }
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }
    pub fn scene(&self) -> &EditorScene {
        &self.scene
    }
    pub fn composer(&self) -> &MemeComposer {
        &self.composer
    }
    pub fn session(&self) -> &SessionList {
        self.composer.session()
    }
    /// 直近の合成画像 (`Composed` 状態のときのみ)。
    pub fn composite(&self) -> Option<&RgbaImage> {
        self.composite.as_ref()
    }
    pub fn is_share_presented(&self) -> bool {
        self.share_presented
    }

    pub fn caption(&self, field: CaptionField) -> &str {
        match field {
            CaptionField::Top => self.scene.top_text(),
            CaptionField::Bottom => self.scene.bottom_text(),
        }
    }

    /// 合成・共有ボタンが有効か (画像がある間だけ有効)。
    pub fn can_finalize(&self) -> bool {
        matches!(self.state, EditorState::ImageLoaded | EditorState::Composed)
    }

    /// カメラボタンが有効か。
    pub fn can_use_camera(&self, source: &dyn ImageSource) -> bool {
        source.is_available(SourceKind::Camera)
    }

    // --- 画像の取得 ---

    /// 取得元に画像を要求します。
    ///
    /// 結果はコールバックで 1 回だけ通知されます。キャンセルされた場合、状態は変わりません。
    pub fn request_image(
        &mut self,
        source: &mut dyn ImageSource,
        kind: SourceKind,
    ) -> Result<(), EditorError> {
        if !source.is_available(kind) {
            return Err(EditorError::SourceUnavailable(kind));
        }
        source.acquire(kind, Box::new(|outcome: Acquisition| self.on_image_acquired(outcome)));
        Ok(())
    }

    /// 画像取得の結果を反映します。
    pub fn on_image_acquired(&mut self, outcome: Acquisition) {
        match outcome {
            Acquisition::Picked(image) => {
                tracing::info!(
                    width = image.width(),
                    height = image.height(),
                    "画像を取得しました"
                );
                self.scene.set_source_image(Arc::new(image));
                self.composite = None;
                self.state = EditorState::ImageLoaded;
            }
            Acquisition::Cancelled => {
                tracing::debug!(state = ?self.state, "画像の取得がキャンセルされました");
            }
        }
    }

    // --- キャプションの編集 ---

    /// 入力欄の編集開始。プレースホルダーのままなら空にします。
    pub fn begin_editing(&mut self, field: CaptionField) {
        if self.is_placeholder(field) {
            self.set_caption(field, "");
        }
    }

    /// キャプションを設定します。合成済みの画像は古くなるため破棄し、`ImageLoaded` に戻します。
    pub fn set_caption(&mut self, field: CaptionField, text: impl Into<String>) {
        match field {
            CaptionField::Top => self.scene.set_top_text(text),
            CaptionField::Bottom => self.scene.set_bottom_text(text),
        }
        if self.state == EditorState::Composed {
            self.composite = None;
            self.state = EditorState::ImageLoaded;
        }
    }

    /// キャプションが既定値のまま (ユーザーが未入力) か。
    pub fn is_placeholder(&self, field: CaptionField) -> bool {
        match field {
            CaptionField::Top => self.scene.top_text() == self.config.default_top_text,
            CaptionField::Bottom => self.scene.bottom_text() == self.config.default_bottom_text,
        }
    }

    // --- リセット ---

    /// 起動直後の状態 (画像なし、既定のキャプション) に戻します。
    pub fn reset(&mut self) {
        self.scene.clear_source_image();
        self.scene.set_top_text(self.config.default_top_text.clone());
        self.scene.set_bottom_text(self.config.default_bottom_text.clone());
        self.composite = None;
        self.state = EditorState::Empty;
        tracing::debug!("エディタをリセットしました");
    }

    // --- 合成と共有 ---

    /// 画面全体を合成し、`Composed` 状態に遷移します。
    pub fn compose(&mut self) -> Result<&RgbaImage, EditorError> {
        if !self.can_finalize() {
            return Err(EditorError::MissingImage);
        }
        let region = self.scene.full_region();
        let composite = self.composer.compose(&mut self.scene, region)?;
        self.state = EditorState::Composed;
        Ok(self.composite.insert(composite))
    }

    /// 合成した画像を共有先へ渡し、完了した場合だけセッションに記録します。
    ///
    /// 完了・キャンセルにかかわらず、共有画面は閉じられます。
    pub fn share(&mut self, sink: &mut dyn ShareSink) -> Result<ShareOutcome, EditorError> {
        self.compose()?;
        let Some(composite) = self.composite.clone() else {
            return Err(EditorError::MissingImage);
        };

        self.share_presented = true;
        let mut completed: Option<bool> = None;
        sink.share(&composite, Box::new(|done: bool| completed = Some(done)));
        self.share_presented = false;

        let completed = completed.unwrap_or_else(|| {
            tracing::warn!("共有先が結果を通知しませんでした");
            false
        });

        if completed {
            let Some(source) = self.scene.source_image().map(Arc::clone) else {
                return Err(EditorError::MissingImage);
            };
            let top = self.scene.top_text().to_string();
            let bottom = self.scene.bottom_text().to_string();
            self.composer
                .finalize_and_record(top, bottom, source, composite);
        } else {
            tracing::info!("共有がキャンセルされたため、ミームは記録しません");
        }

        Ok(ShareOutcome {
            completed,
            session_len: self.composer.session().len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::overlay::OverlayStyle;
    use crate::domain::scene::{ChromeState, PLACEHOLDER_FILL};
    use image::Rgba;

    // --- テスト用の協力者 ---

    /// 用意した結果を順番に返す取得元。
    struct ScriptedSource {
        camera: bool,
        outcomes: Vec<Acquisition>,
        requests: usize,
    }

    impl ScriptedSource {
        fn new(outcomes: Vec<Acquisition>) -> Self {
            Self {
                camera: false,
                outcomes,
                requests: 0,
            }
        }
    }

    impl ImageSource for ScriptedSource {
        fn is_available(&self, kind: SourceKind) -> bool {
            kind == SourceKind::PhotoLibrary || self.camera
        }

        fn acquire<'a>(
            &mut self,
            _kind: SourceKind,
            on_complete: Box<dyn FnOnce(Acquisition) + 'a>,
        ) {
            self.requests += 1;
            let outcome = if self.outcomes.is_empty() {
                Acquisition::Cancelled
            } else {
                self.outcomes.remove(0)
            };
            on_complete(outcome);
        }
    }

    /// 常に同じ結果を返す共有先。受け取った画像を記録する。
    struct FixedSink {
        completed: bool,
        received: Vec<RgbaImage>,
    }

    impl ShareSink for FixedSink {
        fn share<'a>(&mut self, composite: &RgbaImage, on_complete: Box<dyn FnOnce(bool) + 'a>) {
            self.received.push(composite.clone());
            on_complete(self.completed);
        }
    }

    /// コールバックを呼ばない共有先。
    struct SilentSink;

    impl ShareSink for SilentSink {
        fn share<'a>(&mut self, _composite: &RgbaImage, _on_complete: Box<dyn FnOnce(bool) + 'a>) {}
    }

    fn editor() -> MemeEditor {
        let style = OverlayStyle::load(None).expect("組み込みフォントの読み込みに失敗");
        MemeEditor::new(
            EditorConfig::default(),
            MemeComposer::new(style, SessionList::new()),
        )
    }

    fn photo(color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(240, 180, Rgba(color))
    }

    fn sink(completed: bool) -> FixedSink {
        FixedSink {
            completed,
            received: Vec::new(),
        }
    }

    #[test]
    fn new_editor_starts_empty_with_placeholders() {
        let editor = editor();
        assert_eq!(editor.state(), EditorState::Empty);
        assert_eq!(editor.caption(CaptionField::Top), "TOP");
        assert_eq!(editor.caption(CaptionField::Bottom), "BOTTOM");
        assert!(editor.scene().source_image().is_none());
        assert!(!editor.can_finalize());
        assert!(editor.is_placeholder(CaptionField::Top));
    }

    #[test]
    fn picked_image_moves_to_image_loaded() {
        let mut editor = editor();
        let mut source = ScriptedSource::new(vec![Acquisition::Picked(photo([1, 2, 3, 255]))]);

        editor
            .request_image(&mut source, SourceKind::PhotoLibrary)
            .unwrap();

        assert_eq!(editor.state(), EditorState::ImageLoaded);
        assert!(editor.can_finalize());
        assert_eq!(editor.scene().viewport(), (240, 180));
    }

    #[test]
    fn share_records_exactly_one_meme() {
        let mut editor = editor();
        let photo_a = photo([10, 20, 30, 255]);
        let mut source = ScriptedSource::new(vec![Acquisition::Picked(photo_a.clone())]);
        editor
            .request_image(&mut source, SourceKind::PhotoLibrary)
            .unwrap();
        editor.set_caption(CaptionField::Top, "SO");
        editor.set_caption(CaptionField::Bottom, "DONE");

        assert_eq!(editor.session().len(), 0);
        let mut sink = sink(true);
        let outcome = editor.share(&mut sink).unwrap();

        assert_eq!(
            outcome,
            ShareOutcome {
                completed: true,
                session_len: 1
            }
        );
        assert_eq!(editor.state(), EditorState::Composed);
        let record = editor.session().last().unwrap();
        assert_eq!(record.top_text(), "SO");
        assert_eq!(record.bottom_text(), "DONE");
        assert_eq!(record.source_image().as_ref(), &photo_a);
        assert!(Arc::ptr_eq(
            record.source_image(),
            editor.scene().source_image().unwrap()
        ));
        assert_eq!(record.composite_image(), &sink.received[0]);
        assert_eq!(editor.composite(), Some(&sink.received[0]));
        assert!(!editor.is_share_presented());
    }

    #[test]
    fn share_without_image_is_rejected() {
        let mut editor = editor();
        let mut sink = sink(true);

        assert!(matches!(
            editor.share(&mut sink),
            Err(EditorError::MissingImage)
        ));
        assert!(matches!(editor.compose(), Err(EditorError::MissingImage)));
        assert_eq!(editor.session().len(), 0);
        assert!(sink.received.is_empty());
        assert_eq!(editor.state(), EditorState::Empty);
    }

    #[test]
    fn default_captions_are_rendered() {
        let mut editor = editor();
        let mut source = ScriptedSource::new(vec![Acquisition::Picked(photo([0, 128, 0, 255]))]);
        editor
            .request_image(&mut source, SourceKind::PhotoLibrary)
            .unwrap();

        let outcome = editor.share(&mut sink(true)).unwrap();
        assert!(outcome.completed);

        let record = editor.session().last().unwrap();
        assert_eq!(record.top_text(), "TOP");
        assert_eq!(record.bottom_text(), "BOTTOM");
        // キャプションが焼き込まれている
        let composite = record.composite_image();
        assert!(composite.pixels().any(|p| *p == Rgba([255, 255, 255, 255])));
        assert!(composite.pixels().any(|p| *p == Rgba([0, 0, 0, 255])));
    }

    #[test]
    fn cancelled_acquisition_keeps_state() {
        // 画像なしの状態でキャンセル
        let mut editor = editor();
        let mut source = ScriptedSource::new(vec![Acquisition::Cancelled]);
        editor
            .request_image(&mut source, SourceKind::PhotoLibrary)
            .unwrap();
        assert_eq!(editor.state(), EditorState::Empty);
        assert!(editor.scene().source_image().is_none());

        // 画像ありの状態でキャンセル
        let original = photo([5, 5, 5, 255]);
        let mut source = ScriptedSource::new(vec![
            Acquisition::Picked(original.clone()),
            Acquisition::Cancelled,
        ]);
        editor
            .request_image(&mut source, SourceKind::PhotoLibrary)
            .unwrap();
        editor.set_caption(CaptionField::Top, "KEEP");
        editor
            .request_image(&mut source, SourceKind::PhotoLibrary)
            .unwrap();

        assert_eq!(source.requests, 2);
        assert_eq!(editor.state(), EditorState::ImageLoaded);
        assert_eq!(editor.scene().source_image().unwrap().as_ref(), &original);
        assert_eq!(editor.caption(CaptionField::Top), "KEEP");
        assert_eq!(editor.session().len(), 0);
    }

    #[test]
    fn cancelled_share_composes_but_does_not_record() {
        let mut editor = editor();
        let mut source = ScriptedSource::new(vec![Acquisition::Picked(photo([1, 1, 1, 255]))]);
        editor
            .request_image(&mut source, SourceKind::PhotoLibrary)
            .unwrap();

        let mut sink = sink(false);
        let outcome = editor.share(&mut sink).unwrap();

        assert!(!outcome.completed);
        assert_eq!(outcome.session_len, 0);
        assert_eq!(sink.received.len(), 1);
        assert_eq!(editor.state(), EditorState::Composed);
        assert!(!editor.is_share_presented());
    }

    #[test]
    fn silent_sink_counts_as_not_completed() {
        let mut editor = editor();
        let mut source = ScriptedSource::new(vec![Acquisition::Picked(photo([1, 1, 1, 255]))]);
        editor
            .request_image(&mut source, SourceKind::PhotoLibrary)
            .unwrap();

        let outcome = editor.share(&mut SilentSink).unwrap();
        assert!(!outcome.completed);
        assert!(editor.session().is_empty());
        assert!(!editor.is_share_presented());
    }

    #[test]
    fn reset_from_any_state_returns_to_empty_defaults() {
        let mut editor = editor();
        let mut source = ScriptedSource::new(vec![
            Acquisition::Picked(photo([1, 2, 3, 255])),
            Acquisition::Picked(photo([4, 5, 6, 255])),
        ]);

        // ImageLoaded から
        editor
            .request_image(&mut source, SourceKind::PhotoLibrary)
            .unwrap();
        editor.set_caption(CaptionField::Top, "edited");
        editor.reset();
        assert_eq!(editor.state(), EditorState::Empty);
        assert_eq!(editor.caption(CaptionField::Top), "TOP");
        assert_eq!(editor.caption(CaptionField::Bottom), "BOTTOM");
        assert!(editor.scene().source_image().is_none());

        // Composed から
        editor
            .request_image(&mut source, SourceKind::PhotoLibrary)
            .unwrap();
        editor.set_caption(CaptionField::Bottom, "edited");
        editor.compose().unwrap();
        assert_eq!(editor.state(), EditorState::Composed);
        editor.reset();
        assert_eq!(editor.state(), EditorState::Empty);
        assert_eq!(editor.caption(CaptionField::Top), "TOP");
        assert_eq!(editor.caption(CaptionField::Bottom), "BOTTOM");
        assert!(editor.scene().source_image().is_none());
        assert!(editor.composite().is_none());

        // Empty から
        editor.reset();
        assert_eq!(editor.state(), EditorState::Empty);
    }

    #[test]
    fn compose_leaves_chrome_as_it_was() {
        let mut editor = editor();
        let mut source = ScriptedSource::new(vec![Acquisition::Picked(photo([1, 2, 3, 255]))]);
        editor
            .request_image(&mut source, SourceKind::PhotoLibrary)
            .unwrap();

        editor.compose().unwrap();
        assert_eq!(editor.scene().chrome(), ChromeState::VISIBLE);
        assert_eq!(editor.scene().background_fill(), PLACEHOLDER_FILL);
    }

    #[test]
    fn new_image_after_compose_returns_to_image_loaded() {
        let mut editor = editor();
        let mut source = ScriptedSource::new(vec![
            Acquisition::Picked(photo([1, 2, 3, 255])),
            Acquisition::Picked(photo([7, 8, 9, 255])),
        ]);
        editor
            .request_image(&mut source, SourceKind::PhotoLibrary)
            .unwrap();
        editor.compose().unwrap();

        editor
            .request_image(&mut source, SourceKind::PhotoLibrary)
            .unwrap();
        assert_eq!(editor.state(), EditorState::ImageLoaded);
        assert!(editor.composite().is_none());
    }

    #[test]
    fn editing_caption_after_compose_discards_stale_composite() {
        let mut editor = editor();
        let mut source = ScriptedSource::new(vec![Acquisition::Picked(photo([1, 2, 3, 255]))]);
        editor
            .request_image(&mut source, SourceKind::PhotoLibrary)
            .unwrap();
        let first = editor.compose().unwrap().clone();
        assert_eq!(editor.state(), EditorState::Composed);

        editor.set_caption(CaptionField::Top, "CHANGED");
        assert_eq!(editor.state(), EditorState::ImageLoaded);
        assert!(editor.composite().is_none());
        assert!(editor.can_finalize());

        let second = editor.compose().unwrap().clone();
        assert_ne!(first, second);
        assert_eq!(editor.composite(), Some(&second));
    }

    #[test]
    fn begin_editing_clears_only_placeholders() {
        let mut editor = editor();
        editor.begin_editing(CaptionField::Top);
        assert_eq!(editor.caption(CaptionField::Top), "");
        assert_eq!(editor.caption(CaptionField::Bottom), "BOTTOM");

        editor.set_caption(CaptionField::Bottom, "MINE");
        editor.begin_editing(CaptionField::Bottom);
        assert_eq!(editor.caption(CaptionField::Bottom), "MINE");
        assert!(!editor.is_placeholder(CaptionField::Bottom));
    }

    #[test]
    fn unavailable_camera_is_rejected_without_state_change() {
        let mut editor = editor();
        let mut source = ScriptedSource::new(vec![Acquisition::Picked(photo([1, 2, 3, 255]))]);

        assert!(!editor.can_use_camera(&source));
        assert!(matches!(
            editor.request_image(&mut source, SourceKind::Camera),
            Err(EditorError::SourceUnavailable(SourceKind::Camera))
        ));
        assert_eq!(source.requests, 0);
        assert_eq!(editor.state(), EditorState::Empty);

        source.camera = true;
        assert!(editor.can_use_camera(&source));
        editor.request_image(&mut source, SourceKind::Camera).unwrap();
        assert_eq!(editor.state(), EditorState::ImageLoaded);
    }

    #[test]
    fn session_grows_in_creation_order() {
        let mut editor = editor();
        let mut source = ScriptedSource::new(vec![
            Acquisition::Picked(photo([1, 2, 3, 255])),
            Acquisition::Picked(photo([4, 5, 6, 255])),
        ]);
        for top in ["first", "second"] {
            editor
                .request_image(&mut source, SourceKind::PhotoLibrary)
                .unwrap();
            editor.set_caption(CaptionField::Top, top);
            editor.share(&mut sink(true)).unwrap();
        }

        let tops: Vec<&str> = editor.session().iter().map(|r| r.top_text()).collect();
        assert_eq!(tops, vec!["first", "second"]);
    }
}
