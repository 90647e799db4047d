/*!
 * Authorization extractor
 *
 * Responsibility:
 * - Bearer token の検証と permission チェックを handler 実行前に行う
 * - HTTP / axum 依存は core に閉じ込め、permission の型定義は types に分離する
 *
 * Public API:
 * - Authorized<P>
 * - Permission と各 permission タグ型
 */

mod core;
mod types;

pub use self::core::Authorized;
pub use types::*;
