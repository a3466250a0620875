/// Application constants

pub const API_VERSION: &str = "v1";

// Class-label table for the disease model, one entry per output index.
// Labels are `<crop>___<disease>`; the `healthy` disease component marks a
// healthy classification.
pub const CLASS_LABELS: [&str; 38] = [
    "Apple___Apple_scab",
    "Apple___Black_rot",
    "Apple___Cedar_apple_rust",
    "Apple___healthy",
    "Blueberry___healthy",
    "Cherry_(including_sour)___Powdery_mildew",
    "Cherry_(including_sour)___healthy",
    "Corn_(maize)___Cercospora_leaf_spot Gray_leaf_spot",
    "Corn_(maize)___Common_rust_",
    "Corn_(maize)___Northern_Leaf_Blight",
    "Corn_(maize)___healthy",
    "Grape___Black_rot",
    "Grape___Esca_(Black_Measles)",
    "Grape___Leaf_blight_(Isariopsis_Leaf_Spot)",
    "Grape___healthy",
    "Orange___Haunglongbing_(Citrus_greening)",
    "Peach___Bacterial_spot",
    "Peach___healthy",
    "Pepper,_bell___Bacterial_spot",
    "Pepper,_bell___healthy",
    "Potato___Early_blight",
    "Potato___Late_blight",
    "Potato___healthy",
    "Raspberry___healthy",
    "Soybean___healthy",
    "Squash___Powdery_mildew",
    "Strawberry___Leaf_scorch",
    "Strawberry___healthy",
    "Tomato___Bacterial_spot",
    "Tomato___Early_blight",
    "Tomato___Late_blight",
    "Tomato___Leaf_Mold",
    "Tomato___Septoria_leaf_spot",
    "Tomato___Spider_mites Two-spotted_spider_mite",
    "Tomato___Target_Spot",
    "Tomato___Tomato_Yellow_Leaf_Curl_Virus",
    "Tomato___Tomato_mosaic_virus",
    "Tomato___healthy",
];

pub const CLASS_SEPARATOR: &str = "___";
pub const HEALTHY_SENTINEL: &str = "healthy";

// Advisory pipeline bounds
pub const MAX_RECOMMENDATIONS: usize = 6;
pub const MIN_RECOMMENDATION_CHARS: usize = 11;

// Generation parameters
pub const GENERATION_MODEL: &str = "llama-3.1-70b-versatile";
pub const GENERATION_TEMPERATURE: f64 = 0.7;
pub const GENERATION_MAX_TOKENS: u32 = 500;

// Market engine bounds
pub const MARKET_DEFAULT_LIMIT: u32 = 100;
pub const TRENDING_DEFAULT_LIMIT: usize = 10;
pub const TRENDING_SAMPLE_FLOOR: u32 = 200;
pub const TREND_VARIANCE_THRESHOLD: f64 = 5.0;
pub const PRICE_UNIT: &str = "quintal";

// Upload limits
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

// Outbound request timeouts
pub const CONNECT_TIMEOUT_SECS: u64 = 4;
pub const GENERATION_TIMEOUT_SECS: u64 = 20;
pub const MARKET_FETCH_TIMEOUT_SECS: u64 = 10;
pub const SCORER_TIMEOUT_SECS: u64 = 30;
