//! Static lexicon tables used by the intent extractor.
//!
//! All tables are immutable, process-wide constants. Iteration order is
//! significant: the extractor assigns the first matching entry, so ties are
//! broken by declaration order, not relevance.

/// Industry labels with their keyword sets, checked in declaration order.
/// The first industry with any keyword substring hit wins.
pub const INDUSTRY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Food & Beverage",
        &[
            "food", "restaurant", "cafe", "coffee", "bakery", "dining", "kitchen", "catering",
            "pizza", "burger", "ice cream", "sweets", "mithai",
        ],
    ),
    (
        "Retail",
        &[
            "retail", "shop", "store", "boutique", "fashion", "clothing", "apparel", "garment",
            "footwear", "jewellery", "jewelry",
        ],
    ),
    (
        "Technology",
        &[
            "tech", "software", "it", "computer", "digital", "app", "saas", "web", "mobile",
            "startup",
        ],
    ),
    (
        "Health & Fitness",
        &[
            "gym", "fitness", "health", "yoga", "spa", "wellness", "clinic", "medical",
            "hospital", "pharmacy", "diagnostics",
        ],
    ),
    (
        "Education",
        &[
            "education", "school", "coaching", "tuition", "training", "academy", "learning",
            "preschool", "playschool", "college",
        ],
    ),
    (
        "Automotive",
        &[
            "auto", "car", "vehicle", "garage", "service center", "car wash", "automotive",
            "bike", "two wheeler",
        ],
    ),
    (
        "Beauty & Personal Care",
        &[
            "beauty", "salon", "parlour", "cosmetic", "skincare", "hair", "makeup", "grooming",
        ],
    ),
    (
        "Real Estate",
        &["real estate", "property", "construction", "builder", "housing"],
    ),
    (
        "Manufacturing",
        &["manufacturing", "factory", "production", "industrial"],
    ),
    (
        "Services",
        &[
            "service", "consulting", "agency", "professional", "cleaning", "laundry", "logistics",
        ],
    ),
    (
        "Hospitality",
        &["hotel", "resort", "travel", "tourism", "lodge", "guest house"],
    ),
];

/// Major Indian cities, lowercase. Checked before states: a city hit
/// suppresses state matching entirely.
pub const CITIES: &[&str] = &[
    "mumbai", "delhi", "bangalore", "bengaluru", "chennai", "hyderabad", "kolkata", "pune",
    "ahmedabad", "jaipur", "lucknow", "kanpur", "nagpur", "indore", "thane", "bhopal",
    "visakhapatnam", "patna", "vadodara", "ghaziabad", "ludhiana", "agra", "nashik", "faridabad",
    "meerut", "rajkot", "varanasi", "srinagar", "aurangabad", "dhanbad", "amritsar", "allahabad",
    "ranchi", "howrah", "coimbatore", "gwalior", "vijayawada", "jodhpur", "madurai", "raipur",
    "kota", "chandigarh", "guwahati", "solapur", "hubli", "dharwad", "mysore", "tiruchirappalli",
    "bareilly", "aligarh", "tiruppur", "moradabad", "jalandhar", "bhubaneswar", "salem",
    "warangal", "guntur", "bhiwandi", "saharanpur", "gorakhpur", "bikaner", "amravati", "noida",
    "gurgaon", "gurugram", "navi mumbai", "kochi", "cochin", "trivandrum", "thiruvananthapuram",
    "surat", "jamshedpur", "dehradun", "mangalore", "belgaum", "udaipur", "ajmer",
];

/// Indian states and union territories, lowercase.
pub const STATES: &[&str] = &[
    "maharashtra", "karnataka", "delhi", "tamil nadu", "telangana", "gujarat", "rajasthan",
    "uttar pradesh", "west bengal", "kerala", "madhya pradesh", "andhra pradesh", "punjab",
    "haryana", "bihar", "jharkhand", "odisha", "chhattisgarh", "assam", "uttarakhand",
    "himachal pradesh", "goa", "jammu", "kashmir",
];

/// Feature tags with their keyword sets. Unlike industry and location,
/// multiple features may accumulate on one query.
pub const FEATURE_KEYWORDS: &[(&str, &[&str])] = &[
    ("training", &["training", "trained", "support provided", "handholding"]),
    ("marketing_support", &["marketing", "advertising", "promotion", "branding"]),
    ("financing", &["financing", "loan", "emi", "payment plan"]),
    ("verified", &["verified", "trusted", "authentic", "genuine"]),
    ("profitable", &["profitable", "profit", "earning", "revenue generating"]),
    ("established", &["established", "running", "operational", "existing"]),
];

/// A currency unit recognized in amount expressions, with its regex
/// alternation and rupee multiplier.
pub struct AmountUnit {
    pub pattern: &'static str,
    pub multiplier: f64,
}

/// Amount units checked largest-first. Only the first unit that produces a
/// match is consumed by the extractor.
pub const AMOUNT_UNITS: &[AmountUnit] = &[
    AmountUnit {
        pattern: "crore|cr",
        multiplier: 10_000_000.0,
    },
    AmountUnit {
        pattern: "lakh|lac|l",
        multiplier: 100_000.0,
    },
    AmountUnit {
        pattern: "k|thousand",
        multiplier: 1_000.0,
    },
];

/// Qualifier words signalling an upper bound ("under 20 lakh").
pub const MAX_QUALIFIERS: &str = "under|below|less than|max|upto|up to|within";

/// Qualifier words signalling a lower bound ("above 5 crore").
pub const MIN_QUALIFIERS: &str = "above|over|more than|min|minimum|starting";

/// Sort-preference keyword groups. Exclusive: the first matching group wins.
pub const SORT_CHEAP: &[&str] = &["cheap", "affordable", "low cost", "budget"];
pub const SORT_PREMIUM: &[&str] = &["premium", "high end", "luxury"];
pub const SORT_NEWEST: &[&str] = &["new", "latest", "recent"];
pub const SORT_POPULAR: &[&str] = &["popular", "trending"];
