#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FundCategory {
    pub slug: &'static str,
    pub display_name: &'static str,
}

const CATEGORIES: &[FundCategory] = &[
    FundCategory {
        slug: "large-cap",
        display_name: "Large Cap",
    },
    FundCategory {
        slug: "mid-cap",
        display_name: "Mid Cap",
    },
    FundCategory {
        slug: "small-cap",
        display_name: "Small Cap",
    },
    FundCategory {
        slug: "flexi-cap",
        display_name: "Flexi Cap",
    },
    FundCategory {
        slug: "value",
        display_name: "Value",
    },
    FundCategory {
        slug: "contra",
        display_name: "Contra",
    },
    FundCategory {
        slug: "focused",
        display_name: "Focused",
    },
    FundCategory {
        slug: "elss",
        display_name: "ELSS",
    },
    FundCategory {
        slug: "multi-cap",
        display_name: "Multi Cap",
    },
    FundCategory {
        slug: "large-and-mid-cap",
        display_name: "Large & Mid Cap",
    },
    FundCategory {
        slug: "large-mid-cap",
        display_name: "Large & Mid Cap",
    },
    FundCategory {
        slug: "healthcare",
        display_name: "Healthcare",
    },
    FundCategory {
        slug: "banking-financial-services",
        display_name: "Banking & Financial Services",
    },
    FundCategory {
        slug: "technology",
        display_name: "Technology",
    },
    FundCategory {
        slug: "quant",
        display_name: "Quant",
    },
    FundCategory {
        slug: "infrastructure",
        display_name: "Infrastructure",
    },
    FundCategory {
        slug: "business-cycle",
        display_name: "Business Cycle",
    },
    FundCategory {
        slug: "esg",
        display_name: "ESG",
    },
    FundCategory {
        slug: "consumption",
        display_name: "Consumption",
    },
];

pub fn builtin_categories() -> &'static [FundCategory] {
    CATEGORIES
}

pub fn lookup_category(slug: &str) -> Option<&'static FundCategory> {
    CATEGORIES.iter().find(|c| c.slug == slug)
}
