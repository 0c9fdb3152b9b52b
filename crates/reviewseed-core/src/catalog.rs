//! Product and category keyword tables.
//!
//! The built-in tables describe the three demo products and the eight display
//! categories used when seeding the review store. Everything downstream takes
//! a `&Catalog`, so tests can swap in smaller tables.

use serde::{Deserialize, Serialize};

/// Category label returned when no category rule scores above zero.
pub const FALLBACK_CATEGORY: &str = "その他";

/// A product that sampled reviews are attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductConfig {
    pub id: String,
    pub slug: String,
    /// Default display category, used when inference finds nothing better.
    pub category: String,
    pub image: String,
    /// Substrings that mark a review as being about this product.
    pub keywords: Vec<String>,
}

impl ProductConfig {
    pub fn new(id: &str, slug: &str, category: &str, image: &str, keywords: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            slug: slug.to_string(),
            category: category.to_string(),
            image: image.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// A display category and the keywords that vote for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Static configuration for one import run. Order matters: products and
/// categories are scanned in list order and ties go to the earlier entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub products: Vec<ProductConfig>,
    pub categories: Vec<CategoryRule>,
}

impl Catalog {
    pub fn new(products: Vec<ProductConfig>, categories: Vec<CategoryRule>) -> Self {
        Self {
            products,
            categories,
        }
    }

    /// Look up a product by id.
    pub fn product(&self, id: &str) -> Option<&ProductConfig> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn product_ids(&self) -> impl Iterator<Item = &str> {
        self.products.iter().map(|p| p.id.as_str())
    }

    fn default_products() -> Vec<ProductConfig> {
        vec![
            ProductConfig::new(
                "prod-001",
                "wireless-earbuds-pro",
                "家電・カメラ",
                "https://images.unsplash.com/photo-1590658268037-6bf12165a8df?w=400",
                &["イヤホン", "ヘッドホン", "ワイヤレス", "音質", "ノイズ"],
            ),
            ProductConfig::new(
                "prod-002",
                "smart-watch-x1",
                "家電・カメラ",
                "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=400",
                &["スマートウォッチ", "腕時計", "心拍", "睡眠", "フィットネス"],
            ),
            ProductConfig::new(
                "prod-003",
                "mechanical-keyboard-rgb",
                "パソコン・周辺機器",
                "https://images.unsplash.com/photo-1587829741301-dc798b83add3?w=400",
                &["キーボード", "タイピング", "キー", "打鍵", "メカニカル"],
            ),
        ]
    }

    fn default_categories() -> Vec<CategoryRule> {
        vec![
            CategoryRule::new(
                "家電・カメラ",
                &[
                    "充電", "電源", "バッテリー", "イヤホン", "ヘッドホン", "スピーカー",
                    "カメラ", "レンズ", "テレビ", "冷蔵庫", "洗濯機",
                ],
            ),
            CategoryRule::new(
                "パソコン・周辺機器",
                &[
                    "キーボード", "マウス", "モニター", "PC", "パソコン", "ノート",
                    "タブレット", "USB", "ケーブル", "充電器",
                ],
            ),
            CategoryRule::new(
                "スマートフォン・タブレット",
                &[
                    "iPhone", "Android", "スマホ", "スマートフォン", "タブレット", "アプリ",
                    "画面", "タッチ",
                ],
            ),
            CategoryRule::new(
                "ホビー・ゲーム",
                &["ゲーム", "プレイ", "コントローラー", "ソフト", "フィギュア", "プラモデル"],
            ),
            CategoryRule::new(
                "本・雑誌・コミック",
                &["本", "書籍", "雑誌", "コミック", "マンガ", "小説"],
            ),
            CategoryRule::new(
                "食品・飲料",
                &["食べ", "飲み", "味", "おいしい", "まずい", "料理", "レシピ"],
            ),
            CategoryRule::new(
                "ファッション",
                &["服", "靴", "バッグ", "アクセサリー", "サイズ", "着用"],
            ),
            CategoryRule::new(
                "美容・健康",
                &["化粧", "スキンケア", "シャンプー", "歯磨き", "サプリメント"],
            ),
        ]
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(Self::default_products(), Self::default_categories())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_shape() {
        let catalog = Catalog::default();
        assert_eq!(catalog.products.len(), 3);
        assert_eq!(catalog.categories.len(), 8);
        let ids: Vec<&str> = catalog.product_ids().collect();
        assert_eq!(ids, vec!["prod-001", "prod-002", "prod-003"]);
    }

    #[test]
    fn test_product_lookup() {
        let catalog = Catalog::default();
        assert_eq!(
            catalog.product("prod-003").map(|p| p.slug.as_str()),
            Some("mechanical-keyboard-rgb")
        );
        assert!(catalog.product("prod-999").is_none());
    }
}
