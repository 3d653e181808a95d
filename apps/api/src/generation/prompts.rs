//! Prompt templates for product generation.
//!
//! Two templates: single species and seed mix. Both embed the full record
//! field list so the model's output schema matches `ProductRecord` exactly.
//! Placeholders (`{title}`, `{scientific_name}`, `{components}`) are replaced
//! by the builder functions before sending.

/// System prompt — enforces JSON-only output.
pub const GENERATION_SYSTEM: &str =
    "You are a botanical expert who creates detailed, accurate plant product information. \
     Always respond with valid JSON only.";

const SINGLE_PROMPT_TEMPLATE: &str = r#"You are a botanical expert creating detailed product information for native plant seeds.
Generate comprehensive information for this plant:

Title: {title}
Scientific Name: {scientific_name}

Please provide a complete JSON object with the following fields. Base your information on real botanical knowledge about this plant species:

Required fields:
- "Title": "{title}"
- "SKU": Generate appropriate SKU
- "Scientific Name / mix %": "{scientific_name}"
- "What is the? ( SEO Description 100-200 words) ": Write a compelling 100-200 word description highlighting the plant's characteristics, benefits, and uses
- "Sun Requirements (Full Sun, Full Sun to Partial Shade, Shade)": Specify sun requirements
- "Soil Preference": Describe soil preferences
- "Soil pH": Specify pH range
- "Days to Maturity": Time to maturity/bloom
- "Height when mature": Mature height range
- "Seeding rate": Recommended seeding rate
- "Planting Depth": Planting depth instructions
- "Why chose this product Title 1" through "Why chose this product Title 5": Create 5 compelling benefit titles
- "Why chose this product 1" through "Why chose this product 5": Corresponding benefit descriptions
- "Sun/Shade": Sun/shade requirements
- "Height when Mature": Mature height
- "Seeding Rate": Seeding rate
- "Uses": Primary uses
- "Color": Flower/foliage colors
- "Water": Water requirements
- "Native/Introduced": Native range
- "Life Form": Plant life form (annual, perennial, etc.)
- "Planting Guide Step 1" through "Planting Guide Step 4": 4-step planting guide
- "FAQ 1" through "FAQ 6": 6 frequently asked questions with answers
- "Main category": "Wildflower Seed"

Return ONLY the JSON object, no additional text. Ensure all information is botanically accurate and follows the format of existing products."#;

const MIX_PROMPT_TEMPLATE: &str = r#"You are a botanical expert creating detailed product information for native plant seed mixes.
Generate comprehensive information for this seed mix:

Title: {title}
Mix Components:
{components}

IMPORTANT: This is a SEED MIX containing multiple plant species. You need to:
1. Research the scientific names for each component plant
2. Create mix percentages that total 100%
3. Base all growing information on the combined characteristics of ALL components
4. Highlight the benefits of having multiple species together

Please provide a complete JSON object with the following fields:

Required fields:
- "Title": "{title}"
- "SKU": Generate appropriate SKU for seed mix
- "Scientific Name / mix %": Create a detailed mix breakdown with scientific names and percentages (e.g., "Yarrow 15%; California poppy 20%; Blue-eyed grass 10%; etc.")
- "What is the? ( SEO Description 100-200 words) ": Write a compelling 100-200 word description highlighting the mix's diversity, ecological benefits, and combined characteristics
- "Sun Requirements (Full Sun, Full Sun to Partial Shade, Shade)": Consider requirements of all components
- "Soil Preference": Describe soil preferences that work for all components
- "Soil pH": Specify pH range suitable for the mix
- "Days to Maturity": Bloom timing considering different species
- "Height when mature": Height range covering all components
- "Seeding rate": Recommended seeding rate for the mix
- "Planting Depth": Planting depth instructions for mixed seeds
- "Why chose this product Title 1" through "Why chose this product Title 5": Create 5 compelling benefit titles focusing on mix advantages
- "Why chose this product 1" through "Why chose this product 5": Corresponding benefit descriptions emphasizing diversity and ecological benefits
- "Sun/Shade": Sun/shade requirements for the mix
- "Height when Mature": Mature height range
- "Seeding Rate": Seeding rate for mix
- "Uses": Primary uses emphasizing mix benefits
- "Color": Describe the variety of colors from different species
- "Water": Water requirements suitable for all components
- "Native/Introduced": Native range covering all species
- "Life Form": Describe the mix composition (annual/perennial forbs, grasses, etc.)
- "Planting Guide Step 1" through "Planting Guide Step 4": 4-step planting guide for seed mixes
- "FAQ 1" through "FAQ 6": 6 frequently asked questions about seed mixes with answers
- "Main category": "Wildflower Seed"

Return ONLY the JSON object, no additional text. Ensure all information accounts for the diversity of species in the mix."#;

/// Builds the single-species instruction. Pins `Scientific Name / mix %`
/// verbatim to the supplied binomial.
pub fn build_single_prompt(title: &str, scientific_name: &str) -> String {
    SINGLE_PROMPT_TEMPLATE
        .replace("{title}", title)
        .replace("{scientific_name}", scientific_name)
}

/// Builds the mix instruction. Components become one bullet line each;
/// the template directs percentages summing to 100 and deriving every field
/// from the combined characteristics of all components.
pub fn build_mix_prompt(title: &str, components: &[String]) -> String {
    let components_text = components
        .iter()
        .map(|c| format!("- {c}"))
        .collect::<Vec<_>>()
        .join("\n");
    MIX_PROMPT_TEMPLATE
        .replace("{title}", title)
        .replace("{components}", &components_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_prompt_pins_scientific_name_verbatim() {
        let prompt = build_single_prompt("California Poppy", "Eschscholzia californica");
        assert!(prompt.contains(r#""Scientific Name / mix %": "Eschscholzia californica""#));
        assert!(prompt.contains(r#""Title": "California Poppy""#));
        assert!(!prompt.contains("{title}"));
        assert!(!prompt.contains("{scientific_name}"));
    }

    #[test]
    fn test_mix_prompt_lists_components_and_demands_100_percent() {
        let components = vec!["Yarrow".to_string(), "California Poppy".to_string()];
        let prompt = build_mix_prompt("Pollinator Mix", &components);
        assert!(prompt.contains("- Yarrow\n- California Poppy"));
        assert!(prompt.contains("total 100%"));
        assert!(prompt.contains("combined characteristics of ALL components"));
        assert!(!prompt.contains("{components}"));
    }

    #[test]
    fn test_both_prompts_cover_every_schema_field() {
        let single = build_single_prompt("California Poppy", "Eschscholzia californica");
        let mix = build_mix_prompt("Pollinator Mix", &["Yarrow".to_string()]);
        for field in [
            "\"Title\"",
            "\"SKU\"",
            "\"Scientific Name / mix %\"",
            "\"What is the? ( SEO Description 100-200 words) \"",
            "\"Soil pH\"",
            "\"Planting Guide Step 1\"",
            "\"FAQ 1\"",
            "\"Main category\"",
        ] {
            assert!(single.contains(field), "single prompt missing {field}");
            assert!(mix.contains(field), "mix prompt missing {field}");
        }
    }
}
