/*!
 * JSON body validation extractor
 *
 * Public API:
 * - ValidJson<T>
 * - JsonKeys / Combinator (request DTO が必須キーを宣言する)
 */

mod core;

pub use self::core::{Combinator, JsonKeys, ValidJson};
