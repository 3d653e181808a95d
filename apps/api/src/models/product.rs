//! ProductRecord — the canonical product schema shared by the prompt
//! templates, the JSON store, and the document renderer.
//!
//! Field names are pinned to the upstream catalog schema with
//! `#[serde(rename)]`; several of them are awkward (one carries a trailing
//! space) but they are wire names, not display names. A record deserializes
//! only when every field is present, so a truncated generation response can
//! never become a stored record.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "SKU")]
    pub sku: String,
    /// One binomial name for single-species products, or a semicolon-separated
    /// `"<name> <pct>%"` breakdown for mixes. No stored discriminant — the
    /// content shape is the discriminant.
    #[serde(rename = "Scientific Name / mix %")]
    pub scientific_name_or_mix: String,
    // The trailing space is part of the upstream key.
    #[serde(rename = "What is the? ( SEO Description 100-200 words) ")]
    pub seo_description: String,

    #[serde(rename = "Sun Requirements (Full Sun, Full Sun to Partial Shade, Shade)")]
    pub sun_requirements: String,
    #[serde(rename = "Soil Preference")]
    pub soil_preference: String,
    #[serde(rename = "Soil pH")]
    pub soil_ph: String,
    #[serde(rename = "Days to Maturity")]
    pub days_to_maturity: String,
    #[serde(rename = "Height when mature")]
    pub height_when_mature: String,
    #[serde(rename = "Seeding rate")]
    pub seeding_rate: String,
    #[serde(rename = "Planting Depth")]
    pub planting_depth: String,

    #[serde(rename = "Why chose this product Title 1")]
    pub why_title_1: String,
    #[serde(rename = "Why chose this product Title 2")]
    pub why_title_2: String,
    #[serde(rename = "Why chose this product Title 3")]
    pub why_title_3: String,
    #[serde(rename = "Why chose this product Title 4")]
    pub why_title_4: String,
    #[serde(rename = "Why chose this product Title 5")]
    pub why_title_5: String,
    #[serde(rename = "Why chose this product 1")]
    pub why_body_1: String,
    #[serde(rename = "Why chose this product 2")]
    pub why_body_2: String,
    #[serde(rename = "Why chose this product 3")]
    pub why_body_3: String,
    #[serde(rename = "Why chose this product 4")]
    pub why_body_4: String,
    #[serde(rename = "Why chose this product 5")]
    pub why_body_5: String,

    // Summary duplicates of the growing-conditions fields; the upstream
    // catalog renders these in a second table.
    #[serde(rename = "Sun/Shade")]
    pub sun_shade: String,
    #[serde(rename = "Height when Mature")]
    pub mature_height: String,
    #[serde(rename = "Seeding Rate")]
    pub seeding_rate_summary: String,

    #[serde(rename = "Uses")]
    pub uses: String,
    #[serde(rename = "Color")]
    pub color: String,
    #[serde(rename = "Water")]
    pub water: String,
    #[serde(rename = "Native/Introduced")]
    pub native_introduced: String,
    #[serde(rename = "Life Form")]
    pub life_form: String,

    #[serde(rename = "Planting Guide Step 1")]
    pub planting_step_1: String,
    #[serde(rename = "Planting Guide Step 2")]
    pub planting_step_2: String,
    #[serde(rename = "Planting Guide Step 3")]
    pub planting_step_3: String,
    #[serde(rename = "Planting Guide Step 4")]
    pub planting_step_4: String,

    #[serde(rename = "FAQ 1")]
    pub faq_1: String,
    #[serde(rename = "FAQ 2")]
    pub faq_2: String,
    #[serde(rename = "FAQ 3")]
    pub faq_3: String,
    #[serde(rename = "FAQ 4")]
    pub faq_4: String,
    #[serde(rename = "FAQ 5")]
    pub faq_5: String,
    #[serde(rename = "FAQ 6")]
    pub faq_6: String,

    #[serde(rename = "Main category")]
    pub main_category: String,
}

/// One component of a mix breakdown parsed out of `Scientific Name / mix %`.
#[derive(Debug, Clone, PartialEq)]
pub struct MixComponent {
    pub name: String,
    pub percent: f64,
}

impl ProductRecord {
    /// Growing-conditions table rows (label, value), empty values skipped.
    pub fn growing_conditions(&self) -> Vec<(&'static str, &str)> {
        let rows = [
            ("Sun Requirements", self.sun_requirements.as_str()),
            ("Soil Preference", self.soil_preference.as_str()),
            ("Soil pH", self.soil_ph.as_str()),
            ("Days to Maturity", self.days_to_maturity.as_str()),
            ("Height when Mature", self.height_when_mature.as_str()),
            ("Seeding Rate", self.seeding_rate.as_str()),
            ("Planting Depth", self.planting_depth.as_str()),
        ];
        rows.into_iter().filter(|(_, v)| !v.is_empty()).collect()
    }

    /// Plant-characteristics table rows (label, value), empty values skipped.
    pub fn characteristics(&self) -> Vec<(&'static str, &str)> {
        let rows = [
            ("Sun/Shade", self.sun_shade.as_str()),
            ("Height when Mature", self.mature_height.as_str()),
            ("Seeding Rate", self.seeding_rate_summary.as_str()),
            ("Uses", self.uses.as_str()),
            ("Color", self.color.as_str()),
            ("Water", self.water.as_str()),
            ("Native/Introduced", self.native_introduced.as_str()),
            ("Life Form", self.life_form.as_str()),
        ];
        rows.into_iter().filter(|(_, v)| !v.is_empty()).collect()
    }

    /// The five "why choose this product" heading/body pairs, skipping pairs
    /// where either half is empty.
    pub fn why_choose(&self) -> Vec<(&str, &str)> {
        [
            (self.why_title_1.as_str(), self.why_body_1.as_str()),
            (self.why_title_2.as_str(), self.why_body_2.as_str()),
            (self.why_title_3.as_str(), self.why_body_3.as_str()),
            (self.why_title_4.as_str(), self.why_body_4.as_str()),
            (self.why_title_5.as_str(), self.why_body_5.as_str()),
        ]
        .into_iter()
        .filter(|(t, b)| !t.is_empty() && !b.is_empty())
        .collect()
    }

    pub fn planting_steps(&self) -> Vec<&str> {
        [
            self.planting_step_1.as_str(),
            self.planting_step_2.as_str(),
            self.planting_step_3.as_str(),
            self.planting_step_4.as_str(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect()
    }

    pub fn faqs(&self) -> Vec<&str> {
        [
            self.faq_1.as_str(),
            self.faq_2.as_str(),
            self.faq_3.as_str(),
            self.faq_4.as_str(),
            self.faq_5.as_str(),
            self.faq_6.as_str(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect()
    }

    /// Parses the mix form of `Scientific Name / mix %`.
    /// Returns `None` when the field does not look like a mix breakdown
    /// (i.e. the record is a single-species product).
    pub fn mix_breakdown(&self) -> Option<Vec<MixComponent>> {
        parse_mix_breakdown(&self.scientific_name_or_mix)
    }
}

/// Parses `"Yarrow 15%; California poppy 20%; ..."` into components.
/// Every semicolon-separated entry must end in `<number>%` or the whole
/// parse yields `None`.
pub fn parse_mix_breakdown(value: &str) -> Option<Vec<MixComponent>> {
    if !value.contains('%') {
        return None;
    }
    let mut components = Vec::new();
    for entry in value.split(';') {
        let entry = entry.trim().trim_end_matches('.');
        if entry.is_empty() {
            continue;
        }
        let (name, pct) = entry.rsplit_once(char::is_whitespace)?;
        let percent: f64 = pct.strip_suffix('%')?.parse().ok()?;
        components.push(MixComponent {
            name: name.trim().to_string(),
            percent,
        });
    }
    if components.is_empty() {
        None
    } else {
        Some(components)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};

    /// A complete record as the generation service would return it.
    pub fn sample_record_json(title: &str, scientific_name: &str) -> Value {
        json!({
            "Title": title,
            "SKU": "W-CP-0.25-LB",
            "Scientific Name / mix %": scientific_name,
            "What is the? ( SEO Description 100-200 words) ":
                "A drought-tolerant native wildflower prized for brilliant orange blooms.",
            "Sun Requirements (Full Sun, Full Sun to Partial Shade, Shade)": "Full Sun",
            "Soil Preference": "Well-drained sandy or loamy soil",
            "Soil pH": "6.0-8.0",
            "Days to Maturity": "55-75 days",
            "Height when mature": "12-18 inches",
            "Seeding rate": "4-8 lbs per acre",
            "Planting Depth": "1/16 inch, surface sown",
            "Why chose this product Title 1": "True Native Heritage",
            "Why chose this product Title 2": "Pollinator Magnet",
            "Why chose this product Title 3": "Drought Champion",
            "Why chose this product Title 4": "Effortless Reseeding",
            "Why chose this product Title 5": "Season-Long Color",
            "Why chose this product 1": "Sourced from wild native stands.",
            "Why chose this product 2": "Feeds native bees and beneficial insects.",
            "Why chose this product 3": "Thrives with no supplemental water once established.",
            "Why chose this product 4": "Self-sows reliably for returning color each spring.",
            "Why chose this product 5": "Blooms from early spring into midsummer.",
            "Sun/Shade": "Full Sun",
            "Height when Mature": "12-18 inches",
            "Seeding Rate": "4-8 lbs/acre",
            "Uses": "Meadows, borders, erosion control",
            "Color": "Orange",
            "Water": "Low",
            "Native/Introduced": "Native to western North America",
            "Life Form": "Annual forb",
            "Planting Guide Step 1": "Prepare a weed-free, lightly raked seedbed.",
            "Planting Guide Step 2": "Broadcast seed evenly over the surface.",
            "Planting Guide Step 3": "Press seed into soil; do not bury deeply.",
            "Planting Guide Step 4": "Water gently until germination, then taper off.",
            "FAQ 1": "When should I plant? Fall or early spring.",
            "FAQ 2": "Does it need fertilizer? No, it prefers lean soils.",
            "FAQ 3": "Will it come back? Yes, it reseeds readily.",
            "FAQ 4": "Is it deer resistant? Generally, yes.",
            "FAQ 5": "Can I grow it in containers? Yes, with good drainage.",
            "FAQ 6": "How long until bloom? About two months from germination.",
            "Main category": "Wildflower Seed"
        })
    }
}
