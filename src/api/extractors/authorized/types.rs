/**
 * Responsibility
 *  - route ごとに要求する permission を型として宣言する
 *  - Authorized<P> の P に入るタグ型と、その permission 文字列
 *
 * 置かないもの
 *  - token 検証ロジック (services::auth)
 *  - extractor 実装 (core)
 */

/// A permission string that must appear in the token's `permissions` claim.
pub trait Permission: Send + Sync + 'static {
    const NAME: &'static str;
}

// drinks
pub enum GetDrinksDetail {}
impl Permission for GetDrinksDetail {
    const NAME: &'static str = "get:drinks-detail";
}

pub enum PostDrinks {}
impl Permission for PostDrinks {
    const NAME: &'static str = "post:drinks";
}

pub enum PatchDrinks {}
impl Permission for PatchDrinks {
    const NAME: &'static str = "patch:drinks";
}

pub enum DeleteDrinks {}
impl Permission for DeleteDrinks {
    const NAME: &'static str = "delete:drinks";
}
