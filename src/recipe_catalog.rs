/// A built-in recipe used as matching criteria for suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeTemplate {
    pub name: &'static str,
    pub base_ingredients: &'static [&'static str],
    pub match_keywords: &'static [&'static str],
    pub description: &'static str,
    pub difficulty: &'static str,
    pub cooking_time: &'static str,
    pub instructions: &'static [&'static str],
    pub tips: &'static str,
}

impl RecipeTemplate {
    /// True if any keyword occurs verbatim inside `item_name`.
    pub fn matches(&self, item_name: &str) -> bool {
        self.match_keywords.iter().any(|kw| item_name.contains(kw))
    }
}

// Catalog order is significant: ties in priority keep this order.
pub const RECIPE_CATALOG: &[RecipeTemplate] = &[
    RecipeTemplate {
        name: "香煎蛋餅",
        base_ingredients: &["雞蛋", "蔥", "麵粉"],
        match_keywords: &["蛋", "蔥", "餅"],
        description: "簡單美味的台式早餐",
        difficulty: "簡單",
        cooking_time: "15分鐘",
        instructions: &[
            "將雞蛋打散，加入切好的蔥花",
            "平底鍋刷油，倒入蛋液攤成薄餅",
            "小火煎至兩面金黃即可",
        ],
        tips: "可以加入一些胡椒粉增加香味",
    },
    RecipeTemplate {
        name: "牛奶吐司",
        base_ingredients: &["吐司", "鮮奶", "雞蛋"],
        match_keywords: &["吐司", "牛奶", "鮮奶", "蛋"],
        description: "香甜軟嫩的法式吐司",
        difficulty: "簡單",
        cooking_time: "10分鐘",
        instructions: &[
            "將牛奶和雞蛋打勻成蛋奶液",
            "吐司兩面沾滿蛋奶液",
            "平底鍋小火煎至兩面金黃",
        ],
        tips: "可以撒上肉桂粉或淋上蜂蜜",
    },
    RecipeTemplate {
        name: "蘋果沙拉",
        base_ingredients: &["蘋果"],
        match_keywords: &["蘋果", "水果"],
        description: "清爽健康的水果沙拉",
        difficulty: "簡單",
        cooking_time: "5分鐘",
        instructions: &["蘋果洗淨去核切片", "淋上檸檬汁防止氧化", "可加入優格或蜂蜜調味"],
        tips: "即將過期的蘋果做成沙拉是很好的選擇",
    },
    RecipeTemplate {
        name: "蔥花炒蛋",
        base_ingredients: &["雞蛋", "蔥"],
        match_keywords: &["蛋", "蔥"],
        description: "經典家常菜",
        difficulty: "簡單",
        cooking_time: "8分鐘",
        instructions: &[
            "雞蛋打散，加入鹽調味",
            "蔥洗淨切成蔥花",
            "熱鍋下油，倒入蛋液炒至半熟",
            "撒入蔥花繼續炒勻即可",
        ],
        tips: "火候不要太大，保持蛋的嫩滑",
    },
    RecipeTemplate {
        name: "簡易三明治",
        base_ingredients: &["吐司"],
        match_keywords: &["吐司", "麵包"],
        description: "快速營養的輕食",
        difficulty: "簡單",
        cooking_time: "5分鐘",
        instructions: &["吐司烤至微焦", "可夾入雞蛋、生菜等配料", "對切即可享用"],
        tips: "即將過期的吐司做成三明治是很棒的選擇",
    },
    RecipeTemplate {
        name: "香煎雞胸肉",
        base_ingredients: &["雞胸肉", "鹽", "胡椒"],
        match_keywords: &["雞胸", "雞肉"],
        description: "嫩滑香煎的蛋白質料理",
        difficulty: "簡單",
        cooking_time: "20分鐘",
        instructions: &[
            "雞胸肉用鹽和胡椒醃製15分鐘",
            "平底鍋刷油，中火煎雞胸肉",
            "每面煎5-7分鐘至金黃熟透",
        ],
        tips: "可以配搭蔬菜一起享用",
    },
    RecipeTemplate {
        name: "蒜香牛肉",
        base_ingredients: &["牛肉", "蒜頭", "醬油"],
        match_keywords: &["牛肉", "牛"],
        description: "香濃下飯的經典菜色",
        difficulty: "中等",
        cooking_time: "25分鐘",
        instructions: &["牛肉切片，用醬油醃製", "爆香蒜頭後下牛肉片炒至變色", "調味後即可起鍋"],
        tips: "牛肉不要炒太久以免變老",
    },
    RecipeTemplate {
        name: "辣椒炒蛋",
        base_ingredients: &["辣椒", "雞蛋"],
        match_keywords: &["辣椒", "蛋"],
        description: "香辣開胃的家常菜",
        difficulty: "簡單",
        cooking_time: "10分鐘",
        instructions: &["辣椒切段，雞蛋打散", "先炒雞蛋盛起備用", "爆香辣椒後加入雞蛋拌炒"],
        tips: "喜歡辣一點可以加多點辣椒",
    },
    RecipeTemplate {
        name: "蘋果沙拉",
        base_ingredients: &["蘋果", "生菜"],
        match_keywords: &["蘋果", "水果"],
        description: "清爽健康的水果沙拉",
        difficulty: "簡單",
        cooking_time: "5分鐘",
        instructions: &["蘋果洗淨切塊", "可搭配其他蔬菜", "淋上沙拉醬即可"],
        tips: "蘋果切好後可淋檸檬汁防氧化",
    },
    RecipeTemplate {
        name: "火腿炒蛋",
        base_ingredients: &["火腿", "雞蛋"],
        match_keywords: &["火腿", "蛋"],
        description: "經典的蛋白質組合",
        difficulty: "簡單",
        cooking_time: "8分鐘",
        instructions: &["火腿切丁，雞蛋打散", "先炒火腿至微焦", "倒入蛋液炒至凝固即可"],
        tips: "可以加點蔥花增加香味",
    },
];
