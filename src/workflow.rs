//! アプリケーションのメインワークフローを定義するモジュール。
//!
//! このモジュールは、UI層（`cli`）とドメイン層（`domain`）を仲介し、
//! 入力画像ごとに「画像の選択 → キャプション入力 → 共有 (PNG 書き出し) → 記録」
//! というエディタ操作を順番に実行します。

use crate::cli::Args;
use meme_editor::domain::collaborators::{FileImageSource, FileShareSink, SourceKind};
use meme_editor::domain::composer::MemeComposer;
use meme_editor::domain::editor::{CaptionField, EditorConfig, MemeEditor};
use meme_editor::domain::overlay::OverlayStyle;
use meme_editor::domain::session_list::SessionList;
use meme_editor::error::AppError;
use std::fs;
use std::path::{Path, PathBuf};

// --- public な main 関数 ---

/// アプリケーションのメインロジックを実行します。
///
/// # 引数
/// * `args`: コマンドラインからパースされた引数 (`cli::Args`)。
///
/// # 戻り値
/// * `Ok(())`: 1 件以上のミームを作成できた場合。
/// * `Err(AppError)`: 処理中に回復不可能なエラーが発生した場合。
pub fn run(args: Args) -> Result<(), AppError> {
    // 1. キャプションのスタイルを準備
    let style = OverlayStyle::load(args.font_path.as_deref())?
        .with_font_size(args.font_size)
        .with_stroke_width(args.stroke_width);
    tracing::debug!(font = style.font().origin(), "キャプションのスタイルを準備しました");

    // 2. 出力ディレクトリが指定されていて存在しない場合は作成する
    if let Some(dir) = args.output_dir.as_deref() {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }

    // 3. エディタを作成 (セッション一覧はこの実行の間だけ保持される)
    let config = EditorConfig {
        viewport: args.viewport(),
        ..EditorConfig::default()
    };
    let mut editor = MemeEditor::new(config, MemeComposer::new(style, SessionList::new()));

    // 4. 入力画像ごとにミームを作成
    for input in &args.input_images {
        tracing::info!(input = %input.display(), "ミームの作成を開始します");
        if let Err(e) = process_image(&mut editor, input, &args) {
            // 特定の画像の処理に失敗しても、プログラム全体は止めずに次の画像へ進む。
            tracing::warn!(input = %input.display(), error = %e, "ミームの作成に失敗しました");
        }
    }

    // 5. 最終結果の判定
    let created = editor.session().len();
    if created == 0 {
        return Err(AppError::NoMemesCreated(format!(
            "{} 件の入力画像",
            args.input_images.len()
        )));
    }
    tracing::info!(created, "すべての処理が完了しました");
    Ok(())
}

// --- private なヘルパー関数 ---

/// 1 枚の画像についてエディタ操作を一通り実行します。
fn process_image(editor: &mut MemeEditor, input: &Path, args: &Args) -> Result<(), AppError> {
    // 前の画像の状態を持ち越さない
    editor.reset();

    let mut source = FileImageSource::open(input)?;
    tracing::debug!(path = %source.as_path().display(), "画像ファイルを読み込みました");
    editor.request_image(&mut source, SourceKind::PhotoLibrary)?;

    // 指定が既定値と同じなら、プレースホルダーのまま描画される
    for (field, text) in [(CaptionField::Top, &args.top), (CaptionField::Bottom, &args.bottom)] {
        editor.begin_editing(field);
        editor.set_caption(field, text.as_str());
    }

    let output_path = output_path_for(input, args.output_dir.as_deref());
    let mut sink = FileShareSink::new(&output_path);
    let outcome = editor.share(&mut sink)?;

    if !outcome.completed {
        return Err(match sink.take_error() {
            Some(e) => e.into(),
            None => AppError::NoMemesCreated(output_path.display().to_string()),
        });
    }

    tracing::info!(
        output = %sink.as_path().display(),
        session_len = outcome.session_len,
        "完了: ミーム画像を作成しました"
    );
    Ok(())
}

/// 出力ファイルのパスを構築します (例: /output/dir/photo_meme.png)。
fn output_path_for(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled");
    let dir = output_dir
        .or_else(|| input.parent())
        .unwrap_or_else(|| Path::new("."));
    dir.join(format!("{}_meme.png", stem))
}
