use clap::Parser;
use meme_editor::domain::editor::{DEFAULT_BOTTOM_TEXT, DEFAULT_TOP_TEXT};
use meme_editor::domain::overlay::style::MAX_STROKE_WIDTH;
use std::path::PathBuf;

/// 画像に上下のキャプションを重ねてミーム画像 (PNG) を作成するツール
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// ミームにする画像ファイルのパス (複数指定可)
    #[arg(required = true)]
    pub input_images: Vec<PathBuf>,

    /// 上のキャプション
    #[arg(short, long, default_value = DEFAULT_TOP_TEXT)]
    pub top: String,

    /// 下のキャプション
    #[arg(short, long, default_value = DEFAULT_BOTTOM_TEXT)]
    pub bottom: String,

    /// 出力先フォルダのパス (オプション: デフォルトは各入力画像と同じフォルダ)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// キャプションに使うTTF/OTFフォントファイルのパス (オプション: デフォルトは組み込みフォント)
    #[arg(short, long)]
    pub font_path: Option<PathBuf>,

    /// キャプションのフォントサイズ (px)。上限を超える値は上限に丸められます
    #[arg(long, default_value_t = 40.0)]
    pub font_size: f32,

    /// キャプションの縁取り幅 (px)
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(..=MAX_STROKE_WIDTH as i64))]
    pub stroke_width: u32,

    /// 画面 (キャプチャ領域) の幅。高さと一緒に指定した場合のみ有効
    #[arg(long, requires = "canvas_height", value_parser = canvas_range())]
    pub canvas_width: Option<u32>,

    /// 画面 (キャプチャ領域) の高さ。幅と一緒に指定した場合のみ有効
    #[arg(long, requires = "canvas_width", value_parser = canvas_range())]
    pub canvas_height: Option<u32>,

    /// ログレベル (環境変数 RUST_LOG が優先されます)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// 固定する画面サイズ (幅と高さの両方が指定された場合のみ)。
    pub fn viewport(&self) -> Option<(u32, u32)> {
        self.canvas_width.zip(self.canvas_height)
    }
}

/// 画面サイズの上限 (px)。
pub const MAX_CANVAS_SIZE: u32 = 8192;

fn canvas_range() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(1..=MAX_CANVAS_SIZE as i64)
}
