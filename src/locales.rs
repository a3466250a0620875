//! Localization table and fallback advisory bank.
//!
//! Static, read-only lookups resolved at compile time. Unrecognized language
//! codes always resolve to the English policy; callers never see an error
//! from this module.

/// Display name used inside generation prompts.
pub fn language_name(code: &str) -> &'static str {
    match code {
        "en" => "English",
        "hi" => "Hindi",
        "pa" => "Punjabi",
        "ta" => "Tamil",
        "te" => "Telugu",
        _ => "English",
    }
}

// Canned content exists for these; everything else degrades to English.
fn bank_language(code: &str) -> &'static str {
    match code {
        "hi" => "hi",
        _ => "en",
    }
}

fn humanize(label: &str) -> String {
    label.to_lowercase().replace('_', " ")
}

/// Canned treatment steps used when generation is unavailable or unusable.
pub fn fallback_recommendations(crop: &str, disease: &str, language: &str) -> Vec<String> {
    let crop = humanize(crop);
    let disease = humanize(disease);

    match bank_language(language) {
        "hi" => vec![
            format!("संक्रमित {crop} पौधे के हिस्सों को तुरंत हटा दें और नष्ट करें"),
            format!("{disease} के लिए उपयुक्त फफूंदनाशक या कीटनाशक लगाएं"),
            "पौधों के बीच वायु संचलन में सुधार करें".to_string(),
            "पत्तियों पर नमी कम करने के लिए ऊपरी सिंचाई से बचें".to_string(),
            "समान लक्षणों के लिए पड़ोसी पौधों की निगरानी करें".to_string(),
            "उपचार के लिए स्थानीय कृषि विस्तार अधिकारी से परामर्श करें".to_string(),
        ],
        _ => vec![
            format!("Remove and destroy infected {crop} plant parts immediately"),
            format!("Apply appropriate fungicide or pesticide for {disease}"),
            "Improve air circulation between plants".to_string(),
            "Avoid overhead watering to reduce moisture on leaves".to_string(),
            "Monitor neighboring plants for similar symptoms".to_string(),
            "Consult local agricultural extension officer for treatment".to_string(),
        ],
    }
}

/// Canned guidance for a healthy classification; bypasses generation.
pub fn healthy_recommendations(crop: &str, language: &str) -> Vec<String> {
    match bank_language(language) {
        "hi" => vec![
            format!("आपका {crop} पौधा स्वस्थ दिख रहा है!"),
            "नियमित सिंचाई और उर्वरक कार्यक्रम जारी रखें".to_string(),
            "पत्तियों के रंग या बनावट में किसी भी बदलाव पर नज़र रखें".to_string(),
            "उचित धूप और वायु संचलन सुनिश्चित करें".to_string(),
        ],
        _ => vec![
            format!("Your {crop} plant appears healthy!"),
            "Continue regular watering and fertilizing schedule".to_string(),
            "Monitor for any changes in leaf color or texture".to_string(),
            "Ensure proper sunlight and air circulation".to_string(),
        ],
    }
}

/// Canned chat reply used when generation is unavailable or empty.
pub fn fallback_answer(question: &str, language: &str) -> String {
    match bank_language(language) {
        "hi" => format!(
            "आपके प्रश्न \"{question}\" का उत्तर अभी तैयार नहीं किया जा सका। \
             कृपया स्थानीय कृषि विस्तार अधिकारी से संपर्क करें, और इस बीच संतुलित सिंचाई, \
             मिट्टी की जांच और प्रमाणित बीजों का उपयोग सुनिश्चित करें।"
        ),
        _ => format!(
            "I could not generate a detailed answer for \"{question}\" right now. \
             Please consult your local agricultural extension officer, and in the \
             meantime keep to balanced irrigation, get your soil tested, and use \
             certified seed."
        ),
    }
}
