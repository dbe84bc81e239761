//! 画像に上下のキャプションを重ねてミーム画像を作るライブラリ。
//!
//! - `domain`: エディタの状態機械、画面の合成、セッション一覧
//! - `error`: アプリケーション全体のエラー型
//! - `logging`: `tracing` の初期化

pub mod domain;
pub mod error;
pub mod logging;
