/*
 * Responsibility
 * - middleware の公開インターフェース
 * - 認証/認可は route ごとの extractor (api::extractors::Authorized) 側
 */
pub mod cors;
pub mod http;
